//! # Ratings App Config
//!
//! Configuration types for the Ratings App API, loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`server`]: listen port and storage connection string
//!
//! # Example
//!
//! ```ignore
//! use ratingsapp_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use jwt::JwtConfig;
pub use server::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
