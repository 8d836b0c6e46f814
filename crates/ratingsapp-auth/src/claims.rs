//! Claim set shared by access and refresh tokens.

use serde::{Deserialize, Serialize};

use ratingsapp_config::JwtConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Value of the `iss` claim for this kind.
    pub const fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    /// Lifetime in seconds.
    pub fn lifetime(self, jwt_config: &JwtConfig) -> i64 {
        match self {
            TokenKind::Access => jwt_config.access_token_expiry,
            TokenKind::Refresh => jwt_config.refresh_token_expiry,
        }
    }
}

/// JWT claims.
///
/// - `sub`: principal id
/// - `iss`: token kind, see [`TokenKind::issuer`]
/// - `role_id`: role of the principal when the token was minted
/// - `exp` / `iat`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    #[serde(rename = "roleId")]
    pub role_id: i64,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    /// Principal id from the subject claim, `None` if it is not numeric.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
