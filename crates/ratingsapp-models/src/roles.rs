use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ratingsapp_core::permissions::Permissions;

/// Named permission set assigned to principals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: i64,
    pub label: String,
    #[sqlx(try_from = "i64")]
    pub permissions: Permissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_as_names() {
        let role: Role =
            serde_json::from_str(r#"{"label":"editors","permissions":["readUsers","writeUsers"]}"#)
                .unwrap();
        assert_eq!(role.permissions, Permissions::READ_USERS | Permissions::WRITE_USERS);
    }

    #[test]
    fn test_unknown_permission_rejected() {
        let result = serde_json::from_str::<Role>(r#"{"label":"x","permissions":["flyPlanes"]}"#);
        assert!(result.is_err());
    }
}
