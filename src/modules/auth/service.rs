use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use ratingsapp_auth::{TokenError, TokenKind, TokenPair, create_token_pair, verify_token};
use ratingsapp_config::JwtConfig;
use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::password::verify_password;
use ratingsapp_core::validation::{Scope, Validator, run_validation};
use ratingsapp_db::{StoreError, UserRepository};
use ratingsapp_models::User;

use crate::utils::rules;

/// Wait applied to every failed password login.
pub const FAILED_LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Credentials as submitted to the password grant.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy)]
pub enum LoginStep {
    EmailRequired,
    PasswordRequired,
    PasswordLength,
    NormalizeEmail,
    EmailFormat,
}

const LOGIN_STEPS: &[LoginStep] = &[
    LoginStep::EmailRequired,
    LoginStep::PasswordRequired,
    LoginStep::PasswordLength,
    LoginStep::NormalizeEmail,
    LoginStep::EmailFormat,
];

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_config: JwtConfig) -> Self {
        Self { users, jwt_config }
    }

    /// Password grant. Every failure except an internal one is reported as
    /// `unauthorized`, and every failure waits [`FAILED_LOGIN_DELAY`] first.
    ///
    /// # Arguments
    ///
    /// * `email` - Login as submitted; it is trimmed and lowercased before lookup
    /// * `password` - Plaintext password
    ///
    /// # Returns
    ///
    /// Returns the active principal, password blanked.
    ///
    /// # Errors
    ///
    /// * `credentials_not_provided` - Either value is empty; answered without delay
    /// * `unauthorized` - Any other refusal
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(ErrorCode::CredentialsNotProvided.into());
        }

        match self.check_credentials(email, password).await {
            Ok(user) => Ok(user),
            Err(err) => {
                tokio::time::sleep(FAILED_LOGIN_DELAY).await;
                match err {
                    AppError::Internal(err) => Err(AppError::Internal(err)),
                    other => {
                        debug!(reason = %other, "password login refused");
                        Err(AppError::unauthorized())
                    }
                }
            }
        }
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let mut credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        run_validation(self, &mut credentials, LOGIN_STEPS).await?;

        let user = match self.users.by_email(&credentials.email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AppError::unauthorized()),
            Err(err) => return Err(err.into()),
        };

        if !user.active {
            return Err(AppError::unauthorized());
        }
        if !verify_password(&credentials.password, &user.password)? {
            return Err(AppError::unauthorized());
        }

        Ok(user.without_password())
    }

    /// Refresh grant. The principal is looked up again, so a deactivated or
    /// deleted principal cannot refresh even with an unexpired token.
    ///
    /// # Errors
    ///
    /// Returns `credentials_not_provided` for an empty token and `unauthorized`
    /// for every other refusal.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<User, AppError> {
        if refresh_token.is_empty() {
            return Err(ErrorCode::CredentialsNotProvided.into());
        }
        self.principal_from_token(refresh_token, TokenKind::Refresh)
            .await
    }

    /// Resolves the principal behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` if the token is empty, fails verification, or names a
    /// principal that no longer exists or is inactive.
    #[instrument(skip_all)]
    pub async fn validate(&self, access_token: &str) -> Result<User, AppError> {
        if access_token.is_empty() {
            return Err(AppError::unauthorized());
        }
        self.principal_from_token(access_token, TokenKind::Access)
            .await
    }

    /// Mints a fresh access/refresh pair for `user`.
    pub fn issue_tokens(&self, user: &User) -> Result<TokenPair, AppError> {
        create_token_pair(user.id, user.role_id, &self.jwt_config).map_err(token_error)
    }

    async fn principal_from_token(&self, token: &str, kind: TokenKind) -> Result<User, AppError> {
        let claims = verify_token(token, kind, &self.jwt_config).map_err(token_error)?;
        let user_id = claims.user_id().ok_or_else(AppError::unauthorized)?;

        let user = match self.users.by_id(user_id).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                debug!(user_id, "token subject no longer exists");
                return Err(AppError::unauthorized());
            }
            Err(err) => return Err(err.into()),
        };

        if !user.active {
            debug!(user_id, "token subject is inactive");
            return Err(AppError::unauthorized());
        }

        Ok(user.without_password())
    }
}

fn token_error(err: TokenError) -> AppError {
    match err {
        TokenError::Expired => {
            debug!("token expired");
            AppError::unauthorized()
        }
        TokenError::Invalid => AppError::unauthorized(),
        TokenError::Encode(err) => {
            warn!(error = %err, "failed to sign token");
            AppError::internal(err)
        }
    }
}

#[async_trait]
impl Validator<Credentials> for AuthService {
    type Step = LoginStep;

    fn scope(&self, step: LoginStep) -> Scope {
        match step {
            LoginStep::EmailRequired | LoginStep::NormalizeEmail | LoginStep::EmailFormat => {
                Scope::Field("email")
            }
            LoginStep::PasswordRequired | LoginStep::PasswordLength => Scope::Field("password"),
        }
    }

    async fn check(&self, step: LoginStep, credentials: &mut Credentials) -> Result<(), AppError> {
        match step {
            LoginStep::EmailRequired => rules::required(&credentials.email),
            LoginStep::PasswordRequired => rules::required(&credentials.password),
            LoginStep::PasswordLength => {
                rules::min_len(&credentials.password, rules::MIN_PASSWORD_LEN)
            }
            LoginStep::NormalizeEmail => {
                credentials.email = rules::normalize_email(&credentials.email);
                Ok(())
            }
            LoginStep::EmailFormat => {
                if rules::is_valid_email(&credentials.email) {
                    Ok(())
                } else {
                    Err(ErrorCode::Invalid.into())
                }
            }
        }
    }
}
