//! Authorization gate.
//!
//! Permission bits decide whether a caller may use an operation at all. The
//! built-in principal and roles are then immutable for every caller, and ratings
//! are further restricted to their owner.

use ratingsapp_core::errors::AppError;
use ratingsapp_core::permissions::Permissions;
use ratingsapp_core::system::{ADMIN_ROLE_ID, SUPER_ADMIN_USER_ID, is_system_role};

/// Checks a caller's role permissions against what an operation requires.
///
/// Every required bit must be held. An empty `required` admits anyone.
///
/// # Arguments
///
/// * `held` - Permissions of the caller's role
/// * `required` - Permissions the operation demands
///
/// # Errors
///
/// Returns `forbidden` when any required bit is missing.
pub fn authorize(held: Permissions, required: Permissions) -> Result<(), AppError> {
    if held.contains(required) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

/// Whether the role id is the built-in `admin` role.
pub const fn is_super_admin(role_id: i64) -> bool {
    role_id == ADMIN_ROLE_ID
}

/// Refuses writes to the seeded super-admin principal.
///
/// # Errors
///
/// Returns `read_only` for [`SUPER_ADMIN_USER_ID`].
pub fn ensure_user_mutable(user_id: i64) -> Result<(), AppError> {
    if user_id == SUPER_ADMIN_USER_ID {
        return Err(AppError::read_only());
    }
    Ok(())
}

/// Refuses writes to the built-in `admin` and `user` roles.
///
/// # Errors
///
/// Returns `read_only` for either system role id.
pub fn ensure_role_mutable(role_id: i64) -> Result<(), AppError> {
    if is_system_role(role_id) {
        return Err(AppError::read_only());
    }
    Ok(())
}

/// Updates are reserved to the exact owner.
///
/// # Errors
///
/// Returns `read_only` when `caller_id` is not `owner_id`.
pub fn ensure_rating_owner(owner_id: i64, caller_id: i64) -> Result<(), AppError> {
    if owner_id != caller_id {
        return Err(AppError::read_only());
    }
    Ok(())
}

/// Deletes are allowed to the owner and to admin-role callers.
pub fn ensure_rating_owner_or_admin(
    owner_id: i64,
    caller_id: i64,
    caller_role_id: i64,
) -> Result<(), AppError> {
    if owner_id == caller_id || is_super_admin(caller_role_id) {
        return Ok(());
    }
    Err(AppError::read_only())
}
