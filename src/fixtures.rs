use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    error::FixtureError,
    models::{CareerTip, Conversation, Notification, Roadmap, User},
};

const EMBEDDED: &str = include_str!("../fixtures/smartcareer.json");

/// Fixtures
///
/// The static JSON document every view reads its data from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub roadmaps: Vec<Roadmap>,
    #[serde(default)]
    pub career_tips: Vec<CareerTip>,
}

impl Fixtures {
    /// The document compiled into the crate.
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_json(EMBEDDED)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a fixtures document. Users that hold two
    /// approvals at once are rejected here instead of surfacing later.
    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_json::from_str(raw)?;
        if let Some(user) = fixtures.users.iter().find(|u| u.check_approvals().is_err()) {
            return Err(FixtureError::Invariant {
                username: user.username.clone(),
            });
        }
        Ok(fixtures)
    }
}
