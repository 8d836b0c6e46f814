//! Principal validation pipelines.

use async_trait::async_trait;

use ratingsapp_auth::gate;
use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::password::hash_password_with_cost;
use ratingsapp_core::validation::{Scope, Validator};
use ratingsapp_db::StoreError;
use ratingsapp_models::User;

use crate::utils::rules;

use super::service::UserService;

/// Candidate principal plus the stored record, once fetched.
#[derive(Debug)]
pub struct UserDraft {
    pub user: User,
    pub current: Option<User>,
}

impl UserDraft {
    pub fn new(user: User) -> Self {
        Self {
            user,
            current: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum UserStep {
    IdReset,
    FetchCurrent,
    NotSuperAdmin,
    FirstNameRequired,
    FirstNameLength,
    SettingsLength,
    PasswordRequired,
    PasswordLength,
    HashPassword,
    PreservePassword,
    EmailRequired,
    NormalizeEmail,
    EmailFormat,
    EmailNotTaken,
    RoleExists,
}

pub const CREATE_STEPS: &[UserStep] = &[
    UserStep::IdReset,
    UserStep::FirstNameRequired,
    UserStep::FirstNameLength,
    UserStep::SettingsLength,
    UserStep::PasswordRequired,
    UserStep::PasswordLength,
    UserStep::HashPassword,
    UserStep::EmailRequired,
    UserStep::NormalizeEmail,
    UserStep::EmailFormat,
    UserStep::EmailNotTaken,
    UserStep::RoleExists,
];

pub const UPDATE_STEPS: &[UserStep] = &[
    UserStep::FetchCurrent,
    UserStep::NotSuperAdmin,
    UserStep::FirstNameRequired,
    UserStep::FirstNameLength,
    UserStep::SettingsLength,
    UserStep::EmailRequired,
    UserStep::NormalizeEmail,
    UserStep::EmailFormat,
    UserStep::PasswordLength,
    UserStep::HashPassword,
    UserStep::PreservePassword,
    UserStep::EmailNotTaken,
    UserStep::RoleExists,
];

pub const DELETE_STEPS: &[UserStep] = &[UserStep::NotSuperAdmin];

#[async_trait]
impl Validator<UserDraft> for UserService {
    type Step = UserStep;

    fn scope(&self, step: UserStep) -> Scope {
        match step {
            UserStep::IdReset
            | UserStep::FetchCurrent
            | UserStep::NotSuperAdmin
            | UserStep::HashPassword
            | UserStep::PreservePassword => Scope::Record,
            UserStep::FirstNameRequired | UserStep::FirstNameLength => Scope::Field("firstName"),
            UserStep::SettingsLength => Scope::Field("settings"),
            UserStep::PasswordRequired | UserStep::PasswordLength => Scope::Field("password"),
            UserStep::EmailRequired
            | UserStep::NormalizeEmail
            | UserStep::EmailFormat
            | UserStep::EmailNotTaken => Scope::Field("email"),
            UserStep::RoleExists => Scope::Field("roleId"),
        }
    }

    async fn check(&self, step: UserStep, draft: &mut UserDraft) -> Result<(), AppError> {
        let user = &mut draft.user;
        match step {
            UserStep::IdReset => {
                user.id = 0;
                Ok(())
            }
            UserStep::FetchCurrent => {
                draft.current = Some(self.users().by_id(user.id).await?);
                Ok(())
            }
            UserStep::NotSuperAdmin => gate::ensure_user_mutable(user.id),
            UserStep::FirstNameRequired => rules::required(&user.first_name),
            UserStep::FirstNameLength => rules::min_len(&user.first_name, rules::MIN_FIRST_NAME_LEN),
            UserStep::SettingsLength => rules::max_len(&user.settings, rules::MAX_SETTINGS_LEN),
            UserStep::PasswordRequired => rules::required(&user.password),
            UserStep::PasswordLength => {
                if user.password.is_empty() {
                    return Ok(());
                }
                rules::min_len(&user.password, rules::MIN_PASSWORD_LEN)
            }
            UserStep::HashPassword => {
                if !user.password.is_empty() {
                    user.password = hash_password_with_cost(&user.password, self.hash_cost())?;
                }
                Ok(())
            }
            UserStep::PreservePassword => {
                if user.password.is_empty() {
                    if let Some(current) = &draft.current {
                        user.password = current.password.clone();
                    }
                }
                Ok(())
            }
            UserStep::EmailRequired => rules::required(&user.email),
            UserStep::NormalizeEmail => {
                user.email = rules::normalize_email(&user.email);
                Ok(())
            }
            UserStep::EmailFormat => {
                if rules::is_valid_email(&user.email) {
                    Ok(())
                } else {
                    Err(ErrorCode::Invalid.into())
                }
            }
            UserStep::EmailNotTaken => {
                let unchanged = draft
                    .current
                    .as_ref()
                    .is_some_and(|current| current.email == user.email);
                if unchanged {
                    return Ok(());
                }
                match self.users().by_email(&user.email).await {
                    Ok(other) if other.id != user.id => Err(ErrorCode::IsDuplicate.into()),
                    Ok(_) | Err(StoreError::NotFound) => Ok(()),
                    Err(err) => Err(err.into()),
                }
            }
            UserStep::RoleExists => match self.roles().by_id(user.role_id).await {
                Err(StoreError::NotFound) => Err(ErrorCode::ReferenceNotFound.into()),
                // storage enforces the reference on write
                _ => Ok(()),
            },
        }
    }
}
