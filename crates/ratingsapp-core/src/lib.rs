//! # Ratings App Core
//!
//! Core types, errors, and utilities for the Ratings App API.
//!
//! This crate provides the foundational pieces every other crate builds on:
//!
//! - [`errors`]: Public error codes, field validation errors and the HTTP-facing [`AppError`]
//! - [`validation`]: The ordered validation pipeline shared by all resource services
//! - [`permissions`]: The role permission bitmask and its wire format
//! - [`system`]: Sentinel ids of the built-in principal and roles
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use ratingsapp_core::errors::{AppError, ErrorCode};
//! use ratingsapp_core::permissions::Permissions;
//!
//! let held = Permissions::READ_USERS | Permissions::WRITE_USERS;
//! assert!(held.contains(Permissions::READ_USERS));
//!
//! let error = AppError::from(ErrorCode::NotFound);
//! assert_eq!(error.code(), "not_found");
//! ```

pub mod errors;
pub mod password;
pub mod permissions;
pub mod system;
pub mod validation;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorCode, ValidationErrors};
pub use password::{hash_password, verify_password};
pub use permissions::Permissions;
pub use validation::{Scope, Validator, run_validation};
