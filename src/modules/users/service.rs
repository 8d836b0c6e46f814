use std::sync::Arc;

use tracing::{info, instrument};

use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::password::PASSWORD_HASH_COST;
use ratingsapp_core::validation::run_validation;
use ratingsapp_db::{RoleRepository, StoreError, UserRepository, constraints};
use ratingsapp_models::User;

use super::validation::{CREATE_STEPS, DELETE_STEPS, UPDATE_STEPS, UserDraft};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    hash_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self::with_hash_cost(users, roles, PASSWORD_HASH_COST)
    }

    pub fn with_hash_cost(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        hash_cost: u32,
    ) -> Self {
        Self {
            users,
            roles,
            hash_cost,
        }
    }

    pub(super) fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub(super) fn roles(&self) -> &dyn RoleRepository {
        self.roles.as_ref()
    }

    pub(super) fn hash_cost(&self) -> u32 {
        self.hash_cost
    }

    /// Registers a principal.
    ///
    /// The email is normalized and the password is stored as a bcrypt hash.
    ///
    /// # Arguments
    ///
    /// * `user` - The decoded request body, with the plaintext password
    ///
    /// # Returns
    ///
    /// Returns the stored principal with its role attached and the password blanked.
    ///
    /// # Errors
    ///
    /// * `validation_error` - A field rule failed, the email is taken or the role is unknown
    /// * `server_error` - Hashing or storage failed
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        let mut draft = UserDraft::new(user);
        run_validation(self, &mut draft, CREATE_STEPS).await?;

        let mut user = draft.user;
        self.users
            .create(&mut user)
            .await
            .map_err(translate_write)?;

        info!(user_id = user.id, "principal created");
        self.get(user.id).await
    }

    /// Updates principal `id`. An empty password keeps the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `read_only` for the super-admin, `not_found` for an unknown id, and a
    /// `validation_error` when a field rule fails.
    #[instrument(skip(self, user))]
    pub async fn update(&self, id: i64, mut user: User) -> Result<User, AppError> {
        user.id = id;
        let mut draft = UserDraft::new(user);
        run_validation(self, &mut draft, UPDATE_STEPS).await?;

        self.users
            .update(&draft.user)
            .await
            .map_err(translate_write)?;

        info!(user_id = id, "principal updated");
        self.get(id).await
    }

    /// Deletes principal `id`. A principal that still owns ratings is `in_use`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut draft = UserDraft::new(User {
            id,
            ..Default::default()
        });
        run_validation(self, &mut draft, DELETE_STEPS).await?;

        self.users.delete(id).await.map_err(translate_delete)?;

        info!(user_id = id, "principal deleted");
        Ok(())
    }

    /// Fetches one principal with its role, password blanked.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        let user = self.users.by_id(id).await?;
        Ok(user.without_password())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, ids: Option<&[i64]>) -> Result<Vec<User>, AppError> {
        let users = self.users.by_ids(ids).await?;
        Ok(users.into_iter().map(User::without_password).collect())
    }
}

fn translate_write(err: StoreError) -> AppError {
    match err {
        StoreError::Unique(constraint) if constraint == constraints::USERS_PKEY => {
            AppError::field("id", ErrorCode::IdTaken)
        }
        StoreError::Unique(constraint) if constraint == constraints::USERS_EMAIL_KEY => {
            AppError::field("email", ErrorCode::IsDuplicate)
        }
        StoreError::ForeignKey(constraint) if constraint == constraints::USERS_ROLE_ID_FKEY => {
            AppError::field("roleId", ErrorCode::ReferenceNotFound)
        }
        other => other.into(),
    }
}

fn translate_delete(err: StoreError) -> AppError {
    match err {
        StoreError::ForeignKey(_) => ErrorCode::InUse.into(),
        other => other.into(),
    }
}
