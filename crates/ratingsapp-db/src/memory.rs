//! In-memory adapters.
//!
//! One [`MemoryStore`] backs all three repository ports. Every write checks the
//! schema constraints and applies its change under the same write lock, so two
//! racing inserts of the same unique value resolve to one success and one
//! [`StoreError::Unique`].

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use ratingsapp_core::permissions::Permissions;
use ratingsapp_core::system::{
    ADMIN_ROLE_ID, ADMIN_ROLE_LABEL, SUPER_ADMIN_USER_ID, USER_ROLE_ID, USER_ROLE_LABEL,
};
use ratingsapp_models::{Rating, Role, User};

use crate::error::{StoreError, constraints};
use crate::repository::{RatingRepository, RoleRepository, UserRepository};

/// Login of the seeded super-admin principal.
pub const SEED_ADMIN_EMAIL: &str = "admin@admin.com";

/// Identity sequence of one table. Like a `BIGSERIAL` it only moves forward,
/// so the id of a deleted row is never handed out again.
struct Sequence(i64);

impl Default for Sequence {
    fn default() -> Self {
        Self(1)
    }
}

impl Sequence {
    /// Returns `id` when the caller picked one, otherwise the next value.
    fn assign(&mut self, id: i64) -> i64 {
        if id == 0 {
            let next = self.0;
            self.0 += 1;
            next
        } else {
            self.0 = self.0.max(id + 1);
            id
        }
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    ratings: BTreeMap<i64, Rating>,
    user_ids: Sequence,
    role_ids: Sequence,
    rating_ids: Sequence,
}

impl Tables {
    fn user_with_role(&self, user: &User) -> User {
        let mut user = user.clone();
        user.role = self.roles.get(&user.role_id).cloned();
        user
    }

    fn check_user(&self, user: &User) -> Result<(), StoreError> {
        if self
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email)
        {
            return Err(StoreError::Unique(constraints::USERS_EMAIL_KEY.into()));
        }
        if !self.roles.contains_key(&user.role_id) {
            return Err(StoreError::ForeignKey(constraints::USERS_ROLE_ID_FKEY.into()));
        }
        Ok(())
    }

    fn check_role(&self, role: &Role) -> Result<(), StoreError> {
        if self
            .roles
            .values()
            .any(|other| other.id != role.id && other.label == role.label)
        {
            return Err(StoreError::Unique(constraints::ROLES_LABEL_KEY.into()));
        }
        Ok(())
    }

    fn check_rating(&self, rating: &Rating) -> Result<(), StoreError> {
        if !self.users.contains_key(&rating.user_id) {
            return Err(StoreError::ForeignKey(constraints::RATINGS_USER_ID_FKEY.into()));
        }
        if self.ratings.values().any(|other| {
            other.id != rating.id && other.user_id == rating.user_id && other.target == rating.target
        }) {
            return Err(StoreError::Unique(constraints::RATINGS_USER_ID_TARGET_KEY.into()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the same seed records as the initial migration. The
    /// super-admin logs in as [`SEED_ADMIN_EMAIL`] with the password behind
    /// `admin_password_hash`.
    pub fn seeded(admin_password_hash: impl Into<String>) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write().unwrap_or_else(|e| e.into_inner());
            for role in [
                Role {
                    id: ADMIN_ROLE_ID,
                    label: ADMIN_ROLE_LABEL.into(),
                    permissions: Permissions::ALL,
                },
                Role {
                    id: USER_ROLE_ID,
                    label: USER_ROLE_LABEL.into(),
                    permissions: Permissions::NONE,
                },
            ] {
                tables.role_ids.assign(role.id);
                tables.roles.insert(role.id, role);
            }
            let admin = User {
                id: SUPER_ADMIN_USER_ID,
                active: true,
                email: SEED_ADMIN_EMAIL.into(),
                first_name: "Admin".into(),
                password: admin_password_hash.into(),
                role_id: ADMIN_ROLE_ID,
                ..Default::default()
            };
            tables.user_ids.assign(admin.id);
            tables.users.insert(admin.id, admin);
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        let mut tables = self.write();
        if user.id != 0 && tables.users.contains_key(&user.id) {
            return Err(StoreError::Unique(constraints::USERS_PKEY.into()));
        }
        tables.check_user(user)?;

        user.id = tables.user_ids.assign(user.id);
        let mut stored = user.clone();
        stored.role = None;
        tables.users.insert(stored.id, stored);
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        tables.check_user(user)?;

        let mut stored = user.clone();
        stored.role = None;
        tables.users.insert(stored.id, stored);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.ratings.values().any(|rating| rating.user_id == id) {
            return Err(StoreError::ForeignKey(constraints::RATINGS_USER_ID_FKEY.into()));
        }
        tables.users.remove(&id);
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<User, StoreError> {
        let tables = self.read();
        tables
            .users
            .get(&id)
            .map(|user| tables.user_with_role(user))
            .ok_or(StoreError::NotFound)
    }

    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<User>, StoreError> {
        let tables = self.read();
        Ok(tables
            .users
            .values()
            .filter(|user| ids.is_none_or(|ids| ids.contains(&user.id)))
            .map(|user| tables.user_with_role(user))
            .collect())
    }

    async fn by_email(&self, email: &str) -> Result<User, StoreError> {
        let tables = self.read();
        tables
            .users
            .values()
            .find(|user| user.email == email)
            .map(|user| tables.user_with_role(user))
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn create(&self, role: &mut Role) -> Result<(), StoreError> {
        let mut tables = self.write();
        if role.id != 0 && tables.roles.contains_key(&role.id) {
            return Err(StoreError::Unique(constraints::ROLES_PKEY.into()));
        }
        tables.check_role(role)?;

        role.id = tables.role_ids.assign(role.id);
        tables.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.roles.contains_key(&role.id) {
            return Err(StoreError::NotFound);
        }
        tables.check_role(role)?;

        tables.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.roles.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.users.values().any(|user| user.role_id == id) {
            return Err(StoreError::ForeignKey(constraints::USERS_ROLE_ID_FKEY.into()));
        }
        tables.roles.remove(&id);
        Ok(())
    }

    async fn by_id(&self, id: i64) -> Result<Role, StoreError> {
        self.read().roles.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn by_ids(&self, ids: Option<&[i64]>) -> Result<Vec<Role>, StoreError> {
        Ok(self
            .read()
            .roles
            .values()
            .filter(|role| ids.is_none_or(|ids| ids.contains(&role.id)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RatingRepository for MemoryStore {
    async fn create(&self, rating: &mut Rating) -> Result<(), StoreError> {
        let mut tables = self.write();
        if rating.id != 0 && tables.ratings.contains_key(&rating.id) {
            return Err(StoreError::Unique(constraints::RATINGS_PKEY.into()));
        }
        tables.check_rating(rating)?;

        rating.id = tables.rating_ids.assign(rating.id);
        tables.ratings.insert(rating.id, rating.clone());
        Ok(())
    }

    async fn update(&self, rating: &Rating) -> Result<(), StoreError> {
        let mut tables = self.write();
        if !tables.ratings.contains_key(&rating.id) {
            return Err(StoreError::NotFound);
        }
        tables.check_rating(rating)?;

        tables.ratings.insert(rating.id, rating.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.write()
            .ratings
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn by_id(&self, id: i64) -> Result<Rating, StoreError> {
        self.read().ratings.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn by_target(&self, target: i64) -> Result<Vec<Rating>, StoreError> {
        Ok(self
            .read()
            .ratings
            .values()
            .filter(|rating| rating.target == target)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user(email: &str) -> User {
        User {
            email: email.into(),
            first_name: "Test".into(),
            password: "hash".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_seeded_records() {
        let store = MemoryStore::seeded("hash");

        let admin = UserRepository::by_email(&store, SEED_ADMIN_EMAIL).await.unwrap();
        assert_eq!(admin.id, SUPER_ADMIN_USER_ID);
        let role = admin.role.unwrap();
        assert_eq!(role.label, "admin");
        assert_eq!(role.permissions, Permissions::ALL);

        let roles = RoleRepository::by_ids(&store, None).await.unwrap();
        assert_eq!(roles.len(), 2);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = MemoryStore::seeded("hash");
        let mut user = new_user("one@example.com");
        UserRepository::create(&store, &mut user).await.unwrap();
        assert_eq!(user.id, 2);

        let mut role = Role {
            label: "editors".into(),
            ..Default::default()
        };
        RoleRepository::create(&store, &mut role).await.unwrap();
        assert_eq!(role.id, 3);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let store = MemoryStore::seeded("hash");
        let mut first = new_user("first@example.com");
        UserRepository::create(&store, &mut first).await.unwrap();
        UserRepository::delete(&store, first.id).await.unwrap();

        let mut second = new_user("second@example.com");
        UserRepository::create(&store, &mut second).await.unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_sequence() {
        let store = MemoryStore::seeded("hash");
        let mut role = Role {
            id: 10,
            label: "reviewers".into(),
            ..Default::default()
        };
        RoleRepository::create(&store, &mut role).await.unwrap();

        let mut next = Role {
            label: "auditors".into(),
            ..Default::default()
        };
        RoleRepository::create(&store, &mut next).await.unwrap();
        assert_eq!(next.id, 11);
    }

    #[tokio::test]
    async fn test_user_constraints() {
        let store = MemoryStore::seeded("hash");

        let mut taken_id = new_user("x@example.com");
        taken_id.id = SUPER_ADMIN_USER_ID;
        assert!(matches!(
            UserRepository::create(&store, &mut taken_id).await,
            Err(StoreError::Unique(c)) if c == constraints::USERS_PKEY
        ));

        let mut duplicate = new_user(SEED_ADMIN_EMAIL);
        assert!(matches!(
            UserRepository::create(&store, &mut duplicate).await,
            Err(StoreError::Unique(c)) if c == constraints::USERS_EMAIL_KEY
        ));

        let mut orphan = new_user("orphan@example.com");
        orphan.role_id = 99;
        assert!(matches!(
            UserRepository::create(&store, &mut orphan).await,
            Err(StoreError::ForeignKey(c)) if c == constraints::USERS_ROLE_ID_FKEY
        ));
    }

    #[tokio::test]
    async fn test_role_in_use_cannot_be_deleted() {
        let store = MemoryStore::seeded("hash");
        assert!(matches!(
            RoleRepository::delete(&store, ADMIN_ROLE_ID).await,
            Err(StoreError::ForeignKey(_))
        ));
        assert!(matches!(
            RoleRepository::delete(&store, 42).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_rating_constraints() {
        let store = MemoryStore::seeded("hash");
        let mut rating = Rating {
            score: 3,
            target: 10,
            user_id: SUPER_ADMIN_USER_ID,
            extra: json!({}),
            ..Default::default()
        };
        RatingRepository::create(&store, &mut rating).await.unwrap();

        let mut again = Rating { id: 0, ..rating.clone() };
        assert!(matches!(
            RatingRepository::create(&store, &mut again).await,
            Err(StoreError::Unique(c)) if c == constraints::RATINGS_USER_ID_TARGET_KEY
        ));

        let mut orphan = Rating {
            id: 0,
            user_id: 77,
            target: 11,
            ..rating.clone()
        };
        assert!(matches!(
            RatingRepository::create(&store, &mut orphan).await,
            Err(StoreError::ForeignKey(c)) if c == constraints::RATINGS_USER_ID_FKEY
        ));

        // owner with ratings is referenced
        assert!(matches!(
            UserRepository::delete(&store, SUPER_ADMIN_USER_ID).await,
            Err(StoreError::ForeignKey(_))
        ));

        let listed = RatingRepository::by_target(&store, 10).await.unwrap();
        assert_eq!(listed, vec![rating]);
    }

    #[tokio::test]
    async fn test_by_ids_skips_unknown() {
        let store = MemoryStore::seeded("hash");
        let users = UserRepository::by_ids(&store, Some(&[1, 500])).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
    }

    #[tokio::test]
    async fn test_racing_duplicate_inserts() {
        let store = MemoryStore::seeded("hash");
        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut user = new_user("race@example.com");
                UserRepository::create(&store, &mut user).await
            }));
        }

        let mut ok = 0;
        let mut duplicate = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(StoreError::Unique(_)) => duplicate += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!((ok, duplicate), (1, 1));
    }
}
