//! PostgreSQL adapters.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ratingsapp_models::{Rating, Role, User};

use crate::error::StoreError;
use crate::repository::{RatingRepository, RoleRepository, UserRepository};

const USER_WITH_ROLE: &str = r#"SELECT u.id, u.active, u.email, u.first_name, u.last_name,
    u.password, u.role_id, u.settings, r.label AS role_label, r.permissions AS role_permissions
    FROM users u JOIN roles r ON r.id = u.role_id"#;

const RATING_COLUMNS: &str =
    "id, active, anonymous, comment, date, extra, score, target, user_id";

#[derive(FromRow)]
struct UserRoleRow {
    #[sqlx(flatten)]
    user: User,
    role_label: String,
    role_permissions: i64,
}

impl From<UserRoleRow> for User {
    fn from(row: UserRoleRow) -> Self {
        let mut user = row.user;
        user.role = Some(Role {
            id: user.role_id,
            label: row.role_label,
            permissions: row.role_permissions.into(),
        });
        user
    }
}

fn affected(rows: u64) -> Result<(), StoreError> {
    if rows == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        let sql = if user.id == 0 {
            r#"INSERT INTO users (active, email, first_name, last_name, password, role_id, settings)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id"#
        } else {
            r#"INSERT INTO users (active, email, first_name, last_name, password, role_id, settings, id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id"#
        };

        let mut query = sqlx::query_as::<_, (i64,)>(sql)
            .bind(user.active)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password)
            .bind(user.role_id)
            .bind(&user.settings);
        if user.id != 0 {
            query = query.bind(user.id);
        }
        let (id,) = query.fetch_one(&self.pool).await?;

        user.id = id;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE users
            SET active = $2, email = $3, first_name = $4, last_name = $5,
                password = $6, role_id = $7, settings = $8
            WHERE id = $1"#,
        )
        .bind(user.id)
        .bind(user.active)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password)
        .bind(user.role_id)
        .bind(&user.settings)
        .execute(&self.pool)
        .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn by_id(&self, id: i64) -> Result<User, StoreError> {
        let row: UserRoleRow = sqlx::query_as(&format!("{USER_WITH_ROLE} WHERE u.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRoleRow> = match ids {
            Some(ids) => {
                sqlx::query_as(&format!("{USER_WITH_ROLE} WHERE u.id = ANY($1) ORDER BY u.id"))
                    .bind(ids)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(&format!("{USER_WITH_ROLE} ORDER BY u.id"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn by_email(&self, email: &str) -> Result<User, StoreError> {
        let row: UserRoleRow = sqlx::query_as(&format!("{USER_WITH_ROLE} WHERE u.email = $1"))
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}

#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn create(&self, role: &mut Role) -> Result<(), StoreError> {
        let sql = if role.id == 0 {
            "INSERT INTO roles (label, permissions) VALUES ($1, $2) RETURNING id"
        } else {
            "INSERT INTO roles (label, permissions, id) VALUES ($1, $2, $3) RETURNING id"
        };

        let mut query = sqlx::query_as::<_, (i64,)>(sql)
            .bind(&role.label)
            .bind(role.permissions.bits());
        if role.id != 0 {
            query = query.bind(role.id);
        }
        let (id,) = query.fetch_one(&self.pool).await?;

        role.id = id;
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE roles SET label = $2, permissions = $3 WHERE id = $1")
            .bind(role.id)
            .bind(&role.label)
            .bind(role.permissions.bits())
            .execute(&self.pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn by_id(&self, id: i64) -> Result<Role, StoreError> {
        let role: Role = sqlx::query_as("SELECT id, label, permissions FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(role)
    }

    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<Role>, StoreError> {
        let roles: Vec<Role> = match ids {
            Some(ids) => {
                sqlx::query_as(
                    "SELECT id, label, permissions FROM roles WHERE id = ANY($1) ORDER BY id",
                )
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT id, label, permissions FROM roles ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(roles)
    }
}

#[derive(Clone)]
pub struct PgRatingRepository {
    pool: PgPool,
}

impl PgRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    async fn create(&self, rating: &mut Rating) -> Result<(), StoreError> {
        let sql = if rating.id == 0 {
            r#"INSERT INTO ratings (active, anonymous, comment, date, extra, score, target, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id"#
        } else {
            r#"INSERT INTO ratings (active, anonymous, comment, date, extra, score, target, user_id, id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id"#
        };

        let mut query = sqlx::query_as::<_, (i64,)>(sql)
            .bind(rating.active)
            .bind(rating.anonymous)
            .bind(&rating.comment)
            .bind(rating.date)
            .bind(&rating.extra)
            .bind(rating.score)
            .bind(rating.target)
            .bind(rating.user_id);
        if rating.id != 0 {
            query = query.bind(rating.id);
        }
        let (id,) = query.fetch_one(&self.pool).await?;

        rating.id = id;
        Ok(())
    }

    async fn update(&self, rating: &Rating) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE ratings
            SET active = $2, anonymous = $3, comment = $4, date = $5, extra = $6,
                score = $7, target = $8, user_id = $9
            WHERE id = $1"#,
        )
        .bind(rating.id)
        .bind(rating.active)
        .bind(rating.anonymous)
        .bind(&rating.comment)
        .bind(rating.date)
        .bind(&rating.extra)
        .bind(rating.score)
        .bind(rating.target)
        .bind(rating.user_id)
        .execute(&self.pool)
        .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn by_id(&self, id: i64) -> Result<Rating, StoreError> {
        let rating: Rating = sqlx::query_as(&format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(rating)
    }

    async fn by_target(&self, target: i64) -> Result<Vec<Rating>, StoreError> {
        let ratings: Vec<Rating> = sqlx::query_as(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE target = $1 ORDER BY id"
        ))
        .bind(target)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }
}
