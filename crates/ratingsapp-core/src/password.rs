use bcrypt::{hash, verify};

use crate::errors::AppError;

/// bcrypt work factor used for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, PASSWORD_HASH_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to hash password: {e}")))
}

/// Compares `password` against a bcrypt `hash` in constant time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to verify password: {e}")))
}
