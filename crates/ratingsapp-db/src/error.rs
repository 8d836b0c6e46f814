use ratingsapp_core::errors::AppError;

/// Names of the schema constraints. The in-memory store reports the same names.
pub mod constraints {
    pub const USERS_PKEY: &str = "users_pkey";
    pub const USERS_EMAIL_KEY: &str = "users_email_key";
    pub const USERS_ROLE_ID_FKEY: &str = "users_role_id_fkey";
    pub const ROLES_PKEY: &str = "roles_pkey";
    pub const ROLES_LABEL_KEY: &str = "roles_label_key";
    pub const RATINGS_PKEY: &str = "ratings_pkey";
    pub const RATINGS_USER_ID_FKEY: &str = "ratings_user_id_fkey";
    pub const RATINGS_USER_ID_TARGET_KEY: &str = "ratings_user_id_target_key";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint {0} violated")]
    Unique(String),
    #[error("foreign key constraint {0} violated")]
    ForeignKey(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::Unique(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKey(constraint);
            }
        }

        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.into()),
        }
    }
}

/// Fallback for failures a service did not translate into field errors. A
/// missing row is `not_found`, anything else is internal.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(),
            StoreError::Backend(err) => AppError::Internal(err),
            other => AppError::internal(anyhow::anyhow!(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratingsapp_core::errors::ErrorCode;

    #[test]
    fn test_untranslated_errors() {
        assert!(AppError::from(StoreError::NotFound).is(ErrorCode::NotFound));
        assert!(matches!(
            AppError::from(StoreError::Unique("users_email_key".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_row_not_found() {
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }
}
