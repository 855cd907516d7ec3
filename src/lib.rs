use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// --- Module Structure ---

// Core services.
pub mod auth;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod identity;
pub mod models;
pub mod session;
pub mod storage;
pub mod submission;
pub mod validation;

// Authorization: route guards, the route table and role switching.
pub mod guard;
pub mod role_switch;
pub mod routes;

// Data behind the dashboards.
pub mod career_tip;
pub mod messaging;
pub mod notifications;
pub mod roadmap;

// What the screens call.
pub mod handlers;

// --- Public Re-exports ---

pub use config::{AppConfig, Env};
pub use fixtures::Fixtures;
pub use identity::{FixtureIdentityStore, IdentityState, IdentityStore};
pub use session::{Session, SessionContext};
pub use storage::{BrowserStorage, FileStorage, MemoryStorage, StorageState};
pub use submission::{MockSubmission, SimulatedSubmission, SubmissionService, SubmissionState};

use crate::{
    messaging::MessageStore, models::CareerTip, notifications::NotificationStore,
    roadmap::RoadmapCatalog,
};

/// AppState
///
/// Every service a screen can reach, bundled once per tab. Cloning is cheap:
/// all members are shared handles.
#[derive(Clone)]
pub struct AppState {
    /// Mock identity store seeded from the fixtures.
    pub identity: IdentityState,
    /// localStorage: survives restarts.
    pub local: StorageState,
    /// sessionStorage: gone when the tab closes.
    pub session_storage: StorageState,
    /// The delayed fake round-trip used by forms.
    pub submissions: SubmissionState,
    pub notifications: Arc<NotificationStore>,
    pub messages: Arc<MessageStore>,
    pub roadmaps: Arc<RoadmapCatalog>,
    pub career_tips: Arc<Vec<CareerTip>>,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Splits a fixtures document into the stores and wires them to the
    /// given storage areas and submission service.
    pub fn from_fixtures(
        fixtures: Fixtures,
        local: StorageState,
        session_storage: StorageState,
        submissions: SubmissionState,
        config: AppConfig,
    ) -> Self {
        let Fixtures {
            users,
            notifications,
            conversations,
            roadmaps,
            career_tips,
        } = fixtures;

        Self {
            identity: Arc::new(FixtureIdentityStore::new(users)),
            local,
            session_storage,
            submissions,
            notifications: Arc::new(NotificationStore::new(notifications)),
            messages: Arc::new(MessageStore::new(conversations)),
            roadmaps: Arc::new(RoadmapCatalog::new(roadmaps)),
            career_tips: Arc::new(career_tips),
            config,
        }
    }
}

/// init_tracing
///
/// Installs the global subscriber. `RUST_LOG` wins; otherwise the crate logs at
/// debug. Local gets human-readable output, production gets JSON lines.
pub fn init_tracing(env: Env) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "smartcareer=debug".into());

    match env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
    }
}
