//! User store: account reads and loyalty updates.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pixel_arcade_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Read and update users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID already exists.
    async fn insert(&self, user: User) -> Result<(), RepositoryError>;

    /// Replace a user's record (points, activation, profile).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn update(&self, user: User) -> Result<(), RepositoryError>;
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!(
                "user {} already exists",
                user.id
            )));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pixel_arcade_core::Email;

    use super::*;

    fn user(id: i32, points: i64) -> User {
        User {
            id: UserId::new(id),
            name: "Test User".to_owned(),
            email: Email::parse("test@example.com").unwrap(),
            is_active: true,
            points,
        }
    }

    #[tokio::test]
    async fn test_insert_get_update() {
        let store = MemoryUserStore::new();
        store.insert(user(1, 0)).await.unwrap();

        store.update(user(1, 250)).await.unwrap();
        let read_back = store.get(UserId::new(1)).await.unwrap().unwrap();
        assert_eq!(read_back.points, 250);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let store = MemoryUserStore::new();
        let err = store.update(user(9, 0)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_double_insert_is_a_conflict() {
        let store = MemoryUserStore::new();
        store.insert(user(1, 0)).await.unwrap();
        let err = store.insert(user(1, 0)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
