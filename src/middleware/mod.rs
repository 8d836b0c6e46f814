//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: Bearer token authentication and permission extractors
//! - [`content_type`]: JSON content negotiation for the resource routes
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <access_token>`
//! 2. `AuthUser` verifies the token and loads the active principal with its role
//! 3. Permission extractors apply the AND rule over the role's bitmask
//! 4. Handler executes if all checks pass
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireWriteUsers};
//!
//! // any authenticated caller
//! async fn create_rating(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // callers whose role holds `writeUsers`
//! async fn create_user(RequireWriteUsers(auth_user): RequireWriteUsers) -> impl IntoResponse {
//!     /* ... */
//! }
//! ```

pub mod auth;
pub mod content_type;
