//! Repository ports.
//!
//! Writes report constraint violations as [`StoreError::Unique`] or
//! [`StoreError::ForeignKey`] carrying the constraint name from
//! [`constraints`](crate::error::constraints). Reads of a single missing record
//! return [`StoreError::NotFound`]. List reads skip unknown ids.

use async_trait::async_trait;

use ratingsapp_models::{Rating, Role, User};

use crate::error::StoreError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts `user` and writes the assigned id back. An id of 0 lets storage pick.
    async fn create(&self, user: &mut User) -> Result<(), StoreError>;

    /// Overwrites every column, including the password hash.
    async fn update(&self, user: &User) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Principal with its role attached.
    async fn by_id(&self, id: i64) -> Result<User, StoreError>;

    /// `None` lists every principal.
    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<User>, StoreError>;

    /// Principal with its role attached. `email` must already be normalized.
    async fn by_email(&self, email: &str) -> Result<User, StoreError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, role: &mut Role) -> Result<(), StoreError>;

    async fn update(&self, role: &Role) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn by_id(&self, id: i64) -> Result<Role, StoreError>;

    /// `None` lists every role.
    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<Role>, StoreError>;
}

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn create(&self, rating: &mut Rating) -> Result<(), StoreError>;

    async fn update(&self, rating: &Rating) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn by_id(&self, id: i64) -> Result<Rating, StoreError>;

    async fn by_target(&self, target: i64) -> Result<Vec<Rating>, StoreError>;
}
