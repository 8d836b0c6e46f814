//! Built-in records created by the initial migration. They can never be modified
//! or deleted through the API.

/// The super-admin principal.
pub const SUPER_ADMIN_USER_ID: i64 = 1;

/// Role holding every permission bit.
pub const ADMIN_ROLE_ID: i64 = 1;

/// Default role of new principals, no permission bits.
pub const USER_ROLE_ID: i64 = 2;

pub const ADMIN_ROLE_LABEL: &str = "admin";
pub const USER_ROLE_LABEL: &str = "user";

pub const fn is_system_role(role_id: i64) -> bool {
    role_id == ADMIN_ROLE_ID || role_id == USER_ROLE_ID
}
