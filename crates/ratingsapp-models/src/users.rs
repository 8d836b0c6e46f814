use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ratingsapp_core::system::USER_ROLE_ID;

use crate::roles::Role;

/// A principal. `email` is the login identifier.
///
/// `password` is accepted on input and never serialized. Reads return it empty,
/// and storage holds the bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub active: bool,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role_id: i64,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Opaque client settings blob.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub settings: String,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            active: true,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            role_id: USER_ROLE_ID,
            role: None,
            settings: String::new(),
        }
    }
}

impl User {
    /// Drops the password hash before the principal leaves the service layer.
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}
