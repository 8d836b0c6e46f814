//! # Ratings App DB
//!
//! Storage for the Ratings App API.
//!
//! The services only see the repository ports in [`repository`]. Two adapters
//! implement them:
//!
//! - [`postgres`]: SQLx over a PostgreSQL pool, with constraints enforced by the schema
//! - [`memory`]: a single-lock in-memory store that emulates the same constraints,
//!   used by tests and by local runs without a database
//!
//! # Example
//!
//! ```ignore
//! use ratingsapp_db::{Repositories, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let repositories = Repositories::postgres(pool);
//! ```

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

// Re-export commonly used types at crate root
pub use error::{StoreError, constraints};
pub use memory::MemoryStore;
pub use repository::{RatingRepository, RoleRepository, UserRepository};
pub use sqlx::PgPool;

/// Repository handles shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub ratings: Arc<dyn RatingRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            roles: Arc::new(postgres::PgRoleRepository::new(pool.clone())),
            ratings: Arc::new(postgres::PgRatingRepository::new(pool)),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            roles: Arc::new(store.clone()),
            ratings: Arc::new(store),
        }
    }
}

/// Opens a PostgreSQL connection pool.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Applies the embedded schema migrations, including the seed records.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
