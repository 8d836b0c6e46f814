use std::sync::Arc;

use tracing::{info, instrument};

use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::validation::run_validation;
use ratingsapp_db::{RatingRepository, StoreError, UserRepository, constraints};
use ratingsapp_models::Rating;

use super::validation::{CREATE_STEPS, DELETE_STEPS, RatingDraft, UPDATE_STEPS};

#[derive(Clone)]
pub struct RatingService {
    ratings: Arc<dyn RatingRepository>,
    users: Arc<dyn UserRepository>,
}

impl RatingService {
    pub fn new(ratings: Arc<dyn RatingRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { ratings, users }
    }

    pub(super) fn ratings(&self) -> &dyn RatingRepository {
        self.ratings.as_ref()
    }

    pub(super) fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    /// Creates `rating` owned by `caller_id`, whatever `userId` the client sent.
    ///
    /// # Arguments
    ///
    /// * `caller_id` - The authenticated principal; `None` is refused as `unauthorized`
    /// * `rating` - The decoded request body
    ///
    /// # Returns
    ///
    /// Returns the stored rating with its id and server-side date.
    ///
    /// # Errors
    ///
    /// Returns a `validation_error` when a field rule fails or the caller already rated
    /// this target.
    #[instrument(skip(self, rating), fields(target = rating.target))]
    pub async fn create(&self, caller_id: Option<i64>, rating: Rating) -> Result<Rating, AppError> {
        let mut draft = RatingDraft::new(rating, caller_id);
        run_validation(self, &mut draft, CREATE_STEPS).await?;

        let mut rating = draft.rating;
        self.ratings
            .create(&mut rating)
            .await
            .map_err(translate_write)?;

        info!(rating_id = rating.id, user_id = rating.user_id, "rating created");
        Ok(rating)
    }

    /// Only the owner may update. The target of a stored rating never changes.
    #[instrument(skip(self, rating))]
    pub async fn update(
        &self,
        caller_id: Option<i64>,
        id: i64,
        mut rating: Rating,
    ) -> Result<Rating, AppError> {
        rating.id = id;
        let mut draft = RatingDraft::new(rating, caller_id);
        run_validation(self, &mut draft, UPDATE_STEPS).await?;

        self.ratings
            .update(&draft.rating)
            .await
            .map_err(translate_write)?;

        info!(rating_id = id, "rating updated");
        Ok(draft.rating)
    }

    /// The owner or an admin-role caller may delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Option<i64>, id: i64) -> Result<(), AppError> {
        let rating = Rating {
            id,
            ..Default::default()
        };
        let mut draft = RatingDraft::new(rating, caller_id);
        run_validation(self, &mut draft, DELETE_STEPS).await?;

        self.ratings.delete(id).await?;

        info!(rating_id = id, "rating deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Rating, AppError> {
        Ok(self.ratings.by_id(id).await?)
    }

    /// Every rating left on `target`, in id order.
    #[instrument(skip(self))]
    pub async fn list_by_target(&self, target: i64) -> Result<Vec<Rating>, AppError> {
        Ok(self.ratings.by_target(target).await?)
    }
}

fn translate_write(err: StoreError) -> AppError {
    match err {
        StoreError::Unique(constraint) if constraint == constraints::RATINGS_PKEY => {
            AppError::field("id", ErrorCode::IdTaken)
        }
        StoreError::Unique(constraint) if constraint == constraints::RATINGS_USER_ID_TARGET_KEY => {
            AppError::field("target", ErrorCode::IsDuplicate)
        }
        StoreError::ForeignKey(constraint) if constraint == constraints::RATINGS_USER_ID_FKEY => {
            AppError::field("userId", ErrorCode::ReferenceNotFound)
        }
        other => other.into(),
    }
}
