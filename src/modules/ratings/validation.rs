//! Rating validation pipelines. Ownership and the write date are always
//! decided here, never by the client.

use async_trait::async_trait;

use ratingsapp_auth::gate;
use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::validation::{Scope, Validator};
use ratingsapp_db::StoreError;
use ratingsapp_models::{Rating, User};

use crate::utils::rules;

use super::service::RatingService;

#[derive(Debug)]
pub struct RatingDraft {
    pub rating: Rating,
    /// Id of the authenticated caller, if any.
    pub caller_id: Option<i64>,
    pub caller: Option<User>,
    pub stored: Option<Rating>,
}

impl RatingDraft {
    pub fn new(rating: Rating, caller_id: Option<i64>) -> Self {
        Self {
            rating,
            caller_id,
            caller: None,
            stored: None,
        }
    }

    fn caller_id(&self) -> Result<i64, AppError> {
        self.caller_id.ok_or_else(AppError::unauthorized)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RatingStep {
    IdReset,
    CallerPresent,
    CallerValid,
    TargetRequired,
    ScoreRequired,
    CommentLength,
    ExtraLength,
    TargetPositive,
    FetchCaller,
    FetchStored,
    OwnerOnly,
    OwnerOrAdmin,
    KeepTarget,
    ForceOwner,
    SetDate,
}

pub const CREATE_STEPS: &[RatingStep] = &[
    RatingStep::IdReset,
    RatingStep::CallerPresent,
    RatingStep::CallerValid,
    RatingStep::TargetRequired,
    RatingStep::ScoreRequired,
    RatingStep::CommentLength,
    RatingStep::ExtraLength,
    RatingStep::TargetPositive,
    RatingStep::FetchCaller,
    RatingStep::ForceOwner,
    RatingStep::SetDate,
];

pub const UPDATE_STEPS: &[RatingStep] = &[
    RatingStep::CallerPresent,
    RatingStep::CallerValid,
    RatingStep::ScoreRequired,
    RatingStep::CommentLength,
    RatingStep::ExtraLength,
    RatingStep::FetchCaller,
    RatingStep::FetchStored,
    RatingStep::OwnerOnly,
    RatingStep::KeepTarget,
    RatingStep::ForceOwner,
    RatingStep::SetDate,
];

pub const DELETE_STEPS: &[RatingStep] = &[
    RatingStep::CallerPresent,
    RatingStep::CallerValid,
    RatingStep::FetchCaller,
    RatingStep::FetchStored,
    RatingStep::OwnerOrAdmin,
];

#[async_trait]
impl Validator<RatingDraft> for RatingService {
    type Step = RatingStep;

    fn scope(&self, step: RatingStep) -> Scope {
        match step {
            RatingStep::TargetRequired | RatingStep::TargetPositive => Scope::Field("target"),
            RatingStep::ScoreRequired => Scope::Field("score"),
            RatingStep::CommentLength => Scope::Field("comment"),
            RatingStep::ExtraLength => Scope::Field("extra"),
            _ => Scope::Record,
        }
    }

    async fn check(&self, step: RatingStep, draft: &mut RatingDraft) -> Result<(), AppError> {
        match step {
            RatingStep::IdReset => draft.rating.id = 0,
            RatingStep::CallerPresent => {
                draft.caller_id()?;
            }
            RatingStep::CallerValid => {
                if draft.caller_id()? < 1 {
                    return Err(AppError::unauthorized());
                }
            }
            RatingStep::TargetRequired => {
                if draft.rating.target == 0 {
                    return Err(ErrorCode::Required.into());
                }
            }
            RatingStep::ScoreRequired => {
                if draft.rating.score == 0 {
                    return Err(ErrorCode::Required.into());
                }
            }
            RatingStep::CommentLength => {
                rules::max_len(&draft.rating.comment, rules::MAX_COMMENT_LEN)?;
            }
            RatingStep::ExtraLength => {
                let encoded = serde_json::to_string(&draft.rating.extra).map_err(AppError::internal)?;
                rules::max_len(&encoded, rules::MAX_EXTRA_LEN)?;
            }
            RatingStep::TargetPositive => {
                if draft.rating.target < 1 {
                    return Err(ErrorCode::Invalid.into());
                }
            }
            RatingStep::FetchCaller => {
                let caller = match self.users().by_id(draft.caller_id()?).await {
                    Ok(caller) => caller,
                    Err(StoreError::NotFound) => return Err(AppError::unauthorized()),
                    Err(err) => return Err(err.into()),
                };
                draft.caller = Some(caller);
            }
            RatingStep::FetchStored => {
                draft.stored = Some(self.ratings().by_id(draft.rating.id).await?);
            }
            RatingStep::OwnerOnly => {
                let stored = stored(draft)?;
                gate::ensure_rating_owner(stored.user_id, draft.caller_id()?)?;
            }
            RatingStep::OwnerOrAdmin => {
                let stored = stored(draft)?;
                let caller_role_id = draft
                    .caller
                    .as_ref()
                    .map(|caller| caller.role_id)
                    .unwrap_or_default();
                gate::ensure_rating_owner_or_admin(
                    stored.user_id,
                    draft.caller_id()?,
                    caller_role_id,
                )?;
            }
            RatingStep::KeepTarget => draft.rating.target = stored(draft)?.target,
            RatingStep::ForceOwner => draft.rating.user_id = draft.caller_id()?,
            RatingStep::SetDate => draft.rating.date = chrono::Utc::now().timestamp(),
        }
        Ok(())
    }
}

fn stored(draft: &RatingDraft) -> Result<&Rating, AppError> {
    draft
        .stored
        .as_ref()
        .ok_or_else(|| AppError::internal(anyhow::anyhow!("stored rating was not fetched")))
}
