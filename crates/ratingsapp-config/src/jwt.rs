use std::env;

use crate::ConfigError;

pub const JWT_SECRET_VAR: &str = "RATINGSAPP_JWT_SECRET";

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: 6 * 60 * 60,        // 6 hours
            refresh_token_expiry: 10 * 24 * 60 * 60, // 10 days
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var(JWT_SECRET_VAR).map_err(|_| ConfigError::Missing(JWT_SECRET_VAR))?;
        let config = Self::new(secret);
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: JWT_SECRET_VAR,
                reason: format!("secret must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}
