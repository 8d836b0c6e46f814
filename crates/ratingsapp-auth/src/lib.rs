//! # Ratings App Auth
//!
//! Authentication and authorization primitives for the Ratings App API.
//!
//! - [`claims`]: Claim set carried by access and refresh tokens
//! - [`jwt`]: Token pair minting and issuer-scoped verification
//! - [`gate`]: Permission bitmask checks plus immutability and ownership rules
//!
//! # Token Kinds
//!
//! Both kinds share one claim layout. The `iss` claim (`"access"` or `"refresh"`)
//! is the only thing telling them apart, and [`verify_token`] rejects a token whose
//! issuer is not the expected one.
//!
//! # Example
//!
//! ```ignore
//! use ratingsapp_auth::{TokenKind, create_token_pair, verify_token};
//! use ratingsapp_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let pair = create_token_pair(user_id, role_id, &config)?;
//! let claims = verify_token(&pair.access_token, TokenKind::Access, &config)?;
//! ```

pub mod claims;
pub mod gate;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, TokenKind};
pub use jwt::{TokenError, TokenPair, create_token, create_token_pair, verify_token};
