use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use ratingsapp_core::errors::AppError;
use ratingsapp_core::permissions::Permissions;
use ratingsapp_models::User;

use crate::state::AppState;

/// Extractor that validates the bearer access token and loads the active
/// principal behind it, role included.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role_id(&self) -> i64 {
        self.0.role_id
    }

    /// Bits of the principal's role. A principal loaded without its role holds none.
    pub fn permissions(&self) -> Permissions {
        self.0
            .role
            .as_ref()
            .map_or(Permissions::NONE, |role| role.permissions)
    }

    pub fn has_permissions(&self, required: Permissions) -> bool {
        self.permissions().contains(required)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::unauthorized)?;

        let user = state.auth.validate(token.trim()).await?;

        Ok(AuthUser(user))
    }
}

/// Generates an extractor that authenticates the caller and then requires every
/// bit of the given permission set, rejecting with `forbidden` otherwise.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permissions:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = ratingsapp_core::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                ratingsapp_auth::gate::authorize(auth_user.permissions(), $permissions)?;

                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(RequireReadUsers, Permissions::READ_USERS);
require_permission!(RequireWriteUsers, Permissions::WRITE_USERS);

#[cfg(test)]
mod tests {
    use super::*;
    use ratingsapp_models::Role;

    fn user_with(permissions: Option<Permissions>) -> AuthUser {
        AuthUser(User {
            id: 5,
            role_id: 3,
            role: permissions.map(|permissions| Role {
                id: 3,
                label: "editors".into(),
                permissions,
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_has_permissions() {
        let user = user_with(Some(Permissions::READ_USERS | Permissions::READ_RATINGS));
        assert!(user.has_permissions(Permissions::READ_USERS));
        assert!(!user.has_permissions(Permissions::READ_USERS | Permissions::WRITE_USERS));
        assert!(user.has_permissions(Permissions::NONE));
    }

    #[test]
    fn test_missing_role_holds_nothing() {
        let user = user_with(None);
        assert_eq!(user.permissions(), Permissions::NONE);
        assert!(!user.has_permissions(Permissions::READ_USERS));
    }
}
