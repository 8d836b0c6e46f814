//! Token minting and verification.
//!
//! Tokens are HS512-signed. A pair is minted from one principal snapshot: the
//! access token lives [`JwtConfig::access_token_expiry`] seconds and the refresh
//! token [`JwtConfig::refresh_token_expiry`] seconds. Nothing is persisted, so a
//! token stays valid until it expires or its principal is deactivated.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use ratingsapp_config::JwtConfig;

use crate::claims::{Claims, TokenKind};

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed token, wrong issuer or missing claims.
    #[error("token is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Body returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: String,
}

/// Signs a single token of the given kind for a principal.
///
/// # Arguments
///
/// * `user_id` - The principal's id, stored as the `sub` claim
/// * `role_id` - The principal's role at minting time
/// * `kind` - Selects the issuer and the lifetime
/// * `jwt_config` - JWT configuration containing the secret and expiry settings
///
/// # Returns
///
/// Returns the encoded JWT string.
///
/// # Errors
///
/// Returns [`TokenError::Encode`] if signing fails.
pub fn create_token(
    user_id: i64,
    role_id: i64,
    kind: TokenKind,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        iss: kind.issuer().to_string(),
        role_id,
        exp: now + kind.lifetime(jwt_config) as usize,
        iat: now,
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

/// Mints the access and refresh tokens returned by the token endpoint.
///
/// # Errors
///
/// Returns [`TokenError::Encode`] if either token fails to sign.
pub fn create_token_pair(
    user_id: i64,
    role_id: i64,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: create_token(user_id, role_id, TokenKind::Access, jwt_config)?,
        refresh_token: create_token(user_id, role_id, TokenKind::Refresh, jwt_config)?,
        expires_in: jwt_config.access_token_expiry,
        token_type: "bearer".to_string(),
    })
}

/// Verifies signature, expiry and that `iss` matches `expected`.
///
/// Expiry is compared against the current time with no leeway.
///
/// # Arguments
///
/// * `token` - The encoded JWT
/// * `expected` - The kind the caller accepts; the other kind is rejected
/// * `jwt_config` - JWT configuration containing the secret
///
/// # Returns
///
/// Returns the decoded [`Claims`].
///
/// # Errors
///
/// * [`TokenError::Expired`] - `exp` is in the past
/// * [`TokenError::Invalid`] - anything else that fails verification
pub fn verify_token(
    token: &str,
    expected: TokenKind,
    jwt_config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_issuer(&[expected.issuer()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
