//! # Ratings App Models
//!
//! Domain models and DTOs for the Ratings App API.
//!
//! - [`users`]: Principals
//! - [`roles`]: Roles and their permission bitmask
//! - [`ratings`]: Ratings left by principals on numeric targets
//! - [`auth`]: Token endpoint request and response bodies
//! - [`query`]: Query string parameters of the list endpoints
//!
//! All resources use camelCase field names on the wire.

pub mod auth;
pub mod query;
pub mod ratings;
pub mod roles;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{GrantType, TokenPair, TokenRequest};
pub use query::{IdsQuery, RatingsQuery};
pub use ratings::Rating;
pub use roles::Role;
pub use users::User;
