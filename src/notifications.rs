use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::Notification;

/// NotificationStore
///
/// Fixture-backed notifications. Read state changes live for the process only.
#[derive(Default)]
pub struct NotificationStore {
    items: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    pub fn new(items: Vec<Notification>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Notification>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Notification>> {
        self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The recipient's notifications, newest first.
    pub fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        let mut list: Vec<Notification> = self
            .read()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub fn unread_count(&self, user_id: Uuid) -> usize {
        self.read()
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count()
    }

    pub fn total_unread(&self) -> usize {
        self.read().iter().filter(|n| !n.is_read).count()
    }

    /// Marks one notification read. Returns false when it does not exist or
    /// belongs to someone else.
    pub fn mark_read(&self, id: Uuid, user_id: Uuid) -> bool {
        match self
            .write()
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    /// Returns how many notifications changed.
    pub fn mark_all_read(&self, user_id: Uuid) -> usize {
        let mut changed = 0;
        for n in self
            .write()
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        changed
    }

    pub fn push(&self, notification: Notification) {
        self.write().push(notification);
    }
}
