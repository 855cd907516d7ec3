use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

const LOCAL_TOKEN_SECRET: &str = "smartcareer-local-dev-secret";

// Upper bounds for the numeric settings. A token lifetime past ten years is
// a typo, and keeps `iat + ttl` far from overflow.
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
const MAX_SUBMIT_DELAY_MS: u64 = 10 * 60 * 1000;

/// AppConfig
///
/// Immutable configuration loaded once at startup and cloned into `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret fallbacks.
    pub env: Env,
    // HMAC secret used to sign and verify the `authToken` JWT.
    pub token_secret: String,
    // Optional fixtures document replacing the embedded one.
    pub fixtures_path: Option<PathBuf>,
    // File that plays the role of localStorage for the CLI tab.
    pub storage_path: PathBuf,
    // Token lifetime for a plain login.
    pub session_ttl: Duration,
    // Token lifetime when "remember me" is ticked.
    pub remember_ttl: Duration,
    // Delay of the fake form round-trip.
    pub submit_delay: Duration,
}

/// Env
///
/// Local development or production deployment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe values for tests: local env, known secret, no delay.
    fn default() -> Self {
        Self {
            env: Env::Local,
            token_secret: LOCAL_TOKEN_SECRET.to_string(),
            fixtures_path: None,
            storage_path: PathBuf::from(".smartcareer/local_storage.json"),
            session_ttl: Duration::from_secs(8 * 60 * 60),
            remember_ttl: Duration::from_secs(30 * 24 * 60 * 60),
            submit_delay: Duration::ZERO,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment. Production refuses to start
    /// without an explicit token secret.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let token_secret = match (env, env::var("SMARTCAREER_TOKEN_SECRET")) {
            (_, Ok(secret)) if !secret.is_empty() => secret,
            (Env::Production, _) => return Err(ConfigError::Missing("SMARTCAREER_TOKEN_SECRET")),
            (Env::Local, _) => LOCAL_TOKEN_SECRET.to_string(),
        };

        let defaults = Self::default();

        Ok(Self {
            env,
            token_secret,
            fixtures_path: env::var("SMARTCAREER_FIXTURES").ok().map(PathBuf::from),
            storage_path: env::var("SMARTCAREER_STORAGE")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            session_ttl: duration_var("SMARTCAREER_SESSION_TTL_SECS", MAX_TTL_SECS, Duration::from_secs)?
                .unwrap_or(defaults.session_ttl),
            remember_ttl: duration_var("SMARTCAREER_REMEMBER_TTL_SECS", MAX_TTL_SECS, Duration::from_secs)?
                .unwrap_or(defaults.remember_ttl),
            submit_delay: duration_var("SMARTCAREER_SUBMIT_DELAY_MS", MAX_SUBMIT_DELAY_MS, Duration::from_millis)?
                .unwrap_or(Duration::from_millis(1000)),
        })
    }
}

/// Reads a non-negative integer no larger than `max`, in the given unit.
fn duration_var(
    var: &'static str,
    max: u64,
    unit: fn(u64) -> Duration,
) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(n) if n <= max => Ok(Some(unit(n))),
            _ => Err(ConfigError::Invalid { var, value }),
        },
        Err(_) => Ok(None),
    }
}
