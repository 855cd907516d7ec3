use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::User;

/// IdentityStore
///
/// The contract the auth screens and the admin dashboard use to reach user
/// records. Every call is synchronous; the store is a local mock, not a
/// remote service.
pub trait IdentityStore: Send + Sync {
    /// Looks a user up by email (case-insensitive) or by username.
    fn find_user_by_email_or_username(&self, key: &str) -> Option<User>;

    fn get_user(&self, id: Uuid) -> Option<User>;

    fn list_users(&self) -> Vec<User>;

    /// Appends a new record. Uniqueness is checked by the caller.
    fn create_user(&self, user: User) -> User;

    /// Replaces the record with the same id. Returns false when no such record exists.
    fn update_user(&self, user: User) -> bool;
}

/// IdentityState
///
/// The shared handle to the identity store held by `AppState`.
pub type IdentityState = Arc<dyn IdentityStore>;

/// FixtureIdentityStore
///
/// In-memory store seeded from the fixtures document. Writes live only as
/// long as the process.
#[derive(Default)]
pub struct FixtureIdentityStore {
    users: RwLock<Vec<User>>,
}

impl FixtureIdentityStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IdentityStore for FixtureIdentityStore {
    fn find_user_by_email_or_username(&self, key: &str) -> Option<User> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.read()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(key) || u.username.eq_ignore_ascii_case(key))
            .cloned()
    }

    fn get_user(&self, id: Uuid) -> Option<User> {
        self.read().iter().find(|u| u.id == id).cloned()
    }

    fn list_users(&self) -> Vec<User> {
        self.read().clone()
    }

    fn create_user(&self, user: User) -> User {
        self.write().push(user.clone());
        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        user
    }

    fn update_user(&self, user: User) -> bool {
        let mut users = self.write();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }
}
