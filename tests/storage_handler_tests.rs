use smartcareer::{
    AppConfig, AppState, FileStorage, Fixtures, MemoryStorage, MockSubmission, SessionContext,
    StorageState, auth, handlers,
    models::{ApprovalStatus, LoginRequest, ProfileUpdate, Role, User},
    role_switch::{SwitchOutcome, SwitchTarget},
    storage::{BrowserStorage, keys},
};
use std::{sync::Arc, time::Duration};
use tempfile::tempdir;
use uuid::Uuid;

// --- Helper Functions ---

fn state_with(local: StorageState, session_storage: StorageState) -> AppState {
    AppState::from_fixtures(
        Fixtures::embedded().unwrap(),
        local,
        session_storage,
        Arc::new(MockSubmission::new()),
        AppConfig::default(),
    )
}

fn memory_state() -> AppState {
    state_with(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
}

fn login(state: &AppState, identifier: &str, password: &str, remember_me: bool) -> SessionContext {
    let mut session = SessionContext::signed_out();
    let req = LoginRequest {
        identifier: identifier.to_string(),
        password: password.to_string(),
        remember_me,
    };
    handlers::login(state, &mut session, &req).unwrap();
    session
}

fn stored_user(storage: &dyn BrowserStorage) -> User {
    serde_json::from_str(&storage.get(keys::USER).unwrap()).unwrap()
}

// --- Where credentials are written ---

#[test]
fn test_remembered_login_writes_local_storage() {
    let state = memory_state();
    let session = login(&state, "alice", "Student@123", true);

    assert_eq!(
        state.local.get(keys::AUTH_TOKEN).as_deref(),
        Some(session.current().unwrap().token.as_str())
    );
    assert_eq!(stored_user(state.local.as_ref()).username, "alice");
    assert_eq!(state.local.get(keys::REMEMBER_ME).as_deref(), Some("true"));
    assert_eq!(
        state.local.get(keys::REMEMBERED_EMAIL).as_deref(),
        Some("alice@smartcareer.dev")
    );
    assert!(state.session_storage.keys().is_empty());
}

#[test]
fn test_plain_login_writes_session_storage() {
    let state = memory_state();
    login(&state, "alice", "Student@123", false);

    assert!(state.session_storage.get(keys::AUTH_TOKEN).is_some());
    assert!(state.session_storage.get(keys::USER).is_some());
    assert_eq!(state.local.get(keys::AUTH_TOKEN), None);
    assert_eq!(state.local.get(keys::REMEMBER_ME).as_deref(), Some("false"));
    assert_eq!(state.local.get(keys::REMEMBERED_EMAIL), None);
    assert_eq!(handlers::remembered_email(&state), None);
}

#[test]
fn test_stored_user_has_no_password() {
    let state = memory_state();
    login(&state, "alice", "Student@123", true);

    let raw = state.local.get(keys::USER).unwrap();
    assert!(!raw.contains("Student@123"));
    assert!(!raw.contains("password"));
}

#[test]
fn test_plain_login_clears_previous_remembered_credentials() {
    let state = memory_state();
    login(&state, "alice", "Student@123", true);
    login(&state, "bob", "Mentor@123", false);

    assert_eq!(state.local.get(keys::AUTH_TOKEN), None);
    assert_eq!(state.local.get(keys::USER), None);
    assert_eq!(stored_user(state.session_storage.as_ref()).username, "bob");
}

// --- Restoring on mount ---

#[test]
fn test_restore_session_from_local_storage() {
    let state = memory_state();
    login(&state, "bob", "Mentor@123", true);

    let mut fresh = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut fresh).unwrap();

    assert_eq!(profile.username, "bob");
    assert_eq!(profile.role, Role::Mentor);
    assert!(fresh.current().unwrap().remember_me);
}

#[test]
fn test_restore_with_nothing_stored() {
    let state = memory_state();
    let mut session = SessionContext::signed_out();

    assert_eq!(handlers::restore_session(&state, &mut session), None);
    assert!(!session.is_authenticated());
}

#[test]
fn test_remembered_session_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    {
        let first = state_with(
            Arc::new(FileStorage::open(&path).unwrap()),
            Arc::new(MemoryStorage::new()),
        );
        login(&first, "carol", "Counsel@123", true);
    }

    // New process: same file, fresh sessionStorage.
    let second = state_with(
        Arc::new(FileStorage::open(&path).unwrap()),
        Arc::new(MemoryStorage::new()),
    );
    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&second, &mut session).unwrap();

    assert_eq!(profile.username, "carol");
    assert_eq!(handlers::remembered_email(&second).as_deref(), Some("carol@smartcareer.dev"));
}

#[test]
fn test_unremembered_session_ends_with_the_tab() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    {
        let first = state_with(
            Arc::new(FileStorage::open(&path).unwrap()),
            Arc::new(MemoryStorage::new()),
        );
        login(&first, "alice", "Student@123", false);
    }

    let second = state_with(
        Arc::new(FileStorage::open(&path).unwrap()),
        Arc::new(MemoryStorage::new()),
    );
    let mut session = SessionContext::signed_out();

    assert_eq!(handlers::restore_session(&second, &mut session), None);
}

#[test]
fn test_tampered_token_is_discarded() {
    let local = Arc::new(MemoryStorage::with_entries([
        (keys::AUTH_TOKEN, "not-a-token"),
        (keys::USER, "{}"),
        (keys::REMEMBER_ME, "true"),
    ]));
    let state = state_with(local, Arc::new(MemoryStorage::new()));
    let mut session = SessionContext::signed_out();

    assert_eq!(handlers::restore_session(&state, &mut session), None);
    assert!(!session.is_authenticated());
    assert_eq!(state.local.get(keys::AUTH_TOKEN), None);
    assert_eq!(state.local.get(keys::USER), None);
    // Only credentials are wiped.
    assert_eq!(state.local.get(keys::REMEMBER_ME).as_deref(), Some("true"));
}

#[test]
fn test_token_for_unknown_user_is_discarded() {
    let config = AppConfig::default();
    let token = auth::issue_token(Uuid::new_v4(), &config.token_secret, Duration::from_secs(60)).unwrap();
    let session_storage = Arc::new(MemoryStorage::with_entries([(keys::AUTH_TOKEN, token)]));
    let state = state_with(Arc::new(MemoryStorage::new()), session_storage);
    let mut session = SessionContext::signed_out();

    assert_eq!(handlers::restore_session(&state, &mut session), None);
    assert_eq!(state.session_storage.get(keys::AUTH_TOKEN), None);
}

// --- Logout ---

#[test]
fn test_logout_keeps_remembered_email() {
    let state = memory_state();
    let mut session = login(&state, "alice", "Student@123", true);

    handlers::logout(&state, &mut session).unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(state.local.get(keys::AUTH_TOKEN), None);
    assert_eq!(state.local.get(keys::USER), None);
    assert_eq!(
        handlers::remembered_email(&state).as_deref(),
        Some("alice@smartcareer.dev")
    );

    let mut fresh = SessionContext::signed_out();
    assert_eq!(handlers::restore_session(&state, &mut fresh), None);
}

#[test]
fn test_logout_when_signed_out_is_ok() {
    let state = memory_state();
    let mut session = SessionContext::signed_out();
    assert!(handlers::logout(&state, &mut session).is_ok());
}

// --- Switched roles in storage ---

#[test]
fn test_switched_role_is_restored() {
    let state = memory_state();
    let mut session = login(&state, "erin", "Student@456", true);

    let outcome = handlers::switch_role(&state, &mut session, SwitchTarget::Mentor);
    assert!(matches!(outcome, SwitchOutcome::Switched(_)));
    assert_eq!(stored_user(state.local.as_ref()).role, Some(Role::Mentor));

    let mut fresh = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut fresh).unwrap();
    assert_eq!(profile.role, Role::Mentor);
}

#[test]
fn test_blocked_switch_writes_nothing() {
    let state = memory_state();
    let mut session = login(&state, "carol", "Counsel@123", true);
    let before = state.local.get(keys::USER);

    let outcome = handlers::switch_role(&state, &mut session, SwitchTarget::Student);

    assert!(matches!(outcome, SwitchOutcome::Blocked(_)));
    assert_eq!(state.local.get(keys::USER), before);
}

#[test]
fn test_tampered_stored_role_is_ignored() {
    let state = memory_state();
    login(&state, "bob", "Mentor@123", true);

    // An approved mentor may not be a student, even by editing storage.
    let mut user = stored_user(state.local.as_ref());
    user.role = Some(Role::Student);
    state
        .local
        .set(keys::USER, &serde_json::to_string(&user).unwrap())
        .unwrap();

    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut session).unwrap();
    assert_eq!(profile.role, Role::Mentor);
}

#[test]
fn test_stored_admin_role_is_never_granted() {
    let state = memory_state();
    login(&state, "alice", "Student@123", true);

    let mut user = stored_user(state.local.as_ref());
    user.role = Some(Role::Admin);
    state
        .local
        .set(keys::USER, &serde_json::to_string(&user).unwrap())
        .unwrap();

    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut session).unwrap();
    assert_eq!(profile.role, Role::Student);
}

#[tokio::test]
async fn test_profile_edit_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    {
        let first = state_with(
            Arc::new(FileStorage::open(&path).unwrap()),
            Arc::new(MemoryStorage::new()),
        );
        let mut session = login(&first, "alice", "Student@123", true);
        let update = ProfileUpdate {
            name: Some("Alice Edited".to_string()),
            bio: Some("Learning Rust".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..ProfileUpdate::default()
        };
        handlers::update_profile(&first, &mut session, &update)
            .await
            .unwrap();
    }

    // The identity store is rebuilt from fixtures; the edit lives in storage.
    let second = state_with(
        Arc::new(FileStorage::open(&path).unwrap()),
        Arc::new(MemoryStorage::new()),
    );
    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&second, &mut session).unwrap();

    assert_eq!(profile.name, "Alice Edited");
    assert_eq!(profile.bio.as_deref(), Some("Learning Rust"));
    assert_eq!(profile.skills, vec!["Rust"]);
    assert_eq!(profile.headline.as_deref(), Some("Computer Science undergraduate"));
    assert_eq!(profile.role, Role::Student);
}

#[test]
fn test_stored_statuses_are_not_trusted() {
    let state = memory_state();
    login(&state, "erin", "Student@456", true);

    let mut user = stored_user(state.local.as_ref());
    user.mentor_status = ApprovalStatus::Approved;
    state
        .local
        .set(keys::USER, &serde_json::to_string(&user).unwrap())
        .unwrap();

    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut session).unwrap();
    assert_eq!(profile.mentor_status, ApprovalStatus::Pending);
}

#[test]
fn test_stale_local_token_falls_back_to_session_storage() {
    let state = memory_state();
    login(&state, "bob", "Mentor@123", false);
    state.local.set(keys::AUTH_TOKEN, "stale-token").unwrap();

    let mut session = SessionContext::signed_out();
    let profile = handlers::restore_session(&state, &mut session).unwrap();

    assert_eq!(profile.username, "bob");
    assert!(!session.current().unwrap().remember_me);
    assert_eq!(state.local.get(keys::AUTH_TOKEN), None);
    assert!(state.session_storage.get(keys::AUTH_TOKEN).is_some());
}
