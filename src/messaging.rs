use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::MessagingError,
    models::{Conversation, ConversationSummary, Message},
};

pub const MAX_MESSAGE_LEN: usize = 2000;

/// MessageStore
///
/// Fixture-backed conversations. Only participants can see or post to a
/// conversation; for anyone else it does not exist.
#[derive(Default)]
pub struct MessageStore {
    conversations: RwLock<Vec<Conversation>>,
}

impl MessageStore {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: RwLock::new(conversations),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Conversation>> {
        self.conversations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Conversation>> {
        self.conversations
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inbox rows, most recent activity first. Empty conversations sort last.
    pub fn summaries_for(&self, user_id: Uuid) -> Vec<ConversationSummary> {
        let mut rows: Vec<ConversationSummary> = self
            .read()
            .iter()
            .filter(|c| c.includes(user_id))
            .map(|c| ConversationSummary {
                id: c.id,
                with: c
                    .participants
                    .iter()
                    .copied()
                    .filter(|p| *p != user_id)
                    .collect(),
                last_message: c.messages.last().map(|m| m.body.clone()),
                last_activity: c.last_activity(),
            })
            .collect();
        // Option orders None first, so compare reversed.
        rows.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        rows
    }

    pub fn conversation(&self, id: Uuid, user_id: Uuid) -> Result<Conversation, MessagingError> {
        self.read()
            .iter()
            .find(|c| c.id == id && c.includes(user_id))
            .cloned()
            .ok_or(MessagingError::ConversationNotFound)
    }

    pub fn send(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<Message, MessagingError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(MessagingError::EmptyMessage);
        }
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(MessagingError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }

        let mut conversations = self.write();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == conversation_id && c.includes(sender_id))
            .ok_or(MessagingError::ConversationNotFound)?;

        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            body: body.to_string(),
            sent_at,
        };
        conversation.messages.push(message.clone());
        Ok(message)
    }
}
