pub mod auth;
pub mod ratings;
pub mod roles;
pub mod users;
