//! UI event handlers.
//!
//! Each handler is what a screen runs when the user acts: it takes the shared
//! `AppState` and, when it needs to know who is signed in, the tab's
//! `SessionContext`. Failures come back as values for the screen to render.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{self, AuthUser},
    career_tip::{self, TipOfTheDay},
    error::{ApplicationError, AuthError, MessagingError, ProfileError, StorageError},
    models::{
        AdminDashboardStats, ApplicationKind, ApprovalStatus, Conversation, ConversationSummary,
        LoginRequest, Message, Notification, NotificationKind, ProfileUpdate, ReviewDecision,
        Role, Roadmap, SignupRequest, User, UserProfile,
    },
    role_switch::{self, SwitchOutcome, SwitchTarget},
    routes::{self, Navigation, Route},
    session::{Session, SessionContext},
    storage::{BrowserStorage, keys},
    submission::FormKind,
    validation,
};

/// LoginSuccess
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub profile: UserProfile,
    pub redirect_to: Route,
}

/// PasswordResetSent
///
/// The one answer to a reset request, whether or not the address is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetSent {
    pub email: String,
    pub message: String,
}

// --- Storage helpers ---

/// The storage area holding `user`/`authToken` for a session.
fn session_area(state: &AppState, remember_me: bool) -> &dyn BrowserStorage {
    if remember_me {
        state.local.as_ref()
    } else {
        state.session_storage.as_ref()
    }
}

fn clear_credentials(storage: &dyn BrowserStorage) -> Result<(), StorageError> {
    storage.remove(keys::USER)?;
    storage.remove(keys::AUTH_TOKEN)
}

/// Writes the session's user record where the session lives.
fn persist_session_user(state: &AppState, session: &Session) -> Result<(), StorageError> {
    let raw = serde_json::to_string(&session.user)?;
    session_area(state, session.remember_me).set(keys::USER, &raw)
}

// --- Authentication ---

/// login
///
/// Signs the tab in. A failed attempt touches neither the session nor storage.
pub fn login(
    state: &AppState,
    session: &mut SessionContext,
    req: &LoginRequest,
) -> Result<LoginSuccess, AuthError> {
    let user = match auth::authenticate(state.identity.as_ref(), req) {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(identifier = %req.identifier.trim(), error = %e, "login rejected");
            return Err(e);
        }
    };

    let ttl = if req.remember_me {
        state.config.remember_ttl
    } else {
        state.config.session_ttl
    };
    let token = auth::issue_token(user.id, &state.config.token_secret, ttl)?;
    let new_session = Session::new(user, token, req.remember_me);

    // Storage first: if it fails the tab stays as it was.
    let area = session_area(state, req.remember_me);
    let other = session_area(state, !req.remember_me);
    area.set(keys::USER, &serde_json::to_string(&new_session.user).map_err(StorageError::from)?)?;
    area.set(keys::AUTH_TOKEN, &new_session.token)?;
    clear_credentials(other)?;

    state
        .local
        .set(keys::REMEMBER_ME, if req.remember_me { "true" } else { "false" })?;
    if req.remember_me {
        state.local.set(keys::REMEMBERED_EMAIL, &new_session.user.email)?;
    } else {
        state.local.remove(keys::REMEMBERED_EMAIL)?;
    }

    let profile = UserProfile::from(&new_session.user);
    let redirect_to = Route::home_for(profile.role);
    tracing::info!(user_id = %profile.id, role = %profile.role, remember_me = req.remember_me, "login succeeded");

    if let Some(previous) = session.begin(new_session) {
        tracing::debug!(user_id = %previous.user.id, "previous session replaced");
    }

    Ok(LoginSuccess {
        profile,
        redirect_to,
    })
}

/// The email to pre-fill on the login screen, if the visitor ticked "remember me".
pub fn remembered_email(state: &AppState) -> Option<String> {
    match state.local.get(keys::REMEMBER_ME).as_deref() {
        Some("true") => state.local.get(keys::REMEMBERED_EMAIL),
        _ => None,
    }
}

/// restore_session
///
/// Runs on mount. Tries localStorage, then sessionStorage. A stored session
/// comes back when its token still verifies and its user still exists; a
/// stale one has its credentials wiped and the next area is tried.
pub fn restore_session(state: &AppState, session: &mut SessionContext) -> Option<UserProfile> {
    for remember_me in [true, false] {
        let area = session_area(state, remember_me);
        let Some(token) = area.get(keys::AUTH_TOKEN) else {
            continue;
        };

        match rebuild_session(state, token, remember_me) {
            Ok(restored) => {
                let profile = UserProfile::from(&restored.user);
                tracing::info!(user_id = %profile.id, role = %profile.role, remember_me, "session restored");
                session.begin(restored);
                return Some(profile);
            }
            Err(e) => {
                tracing::info!(error = %e, remember_me, "stored session discarded");
                if let Err(e) = clear_credentials(area) {
                    tracing::warn!(error = %e, "failed to clear stale credentials");
                }
            }
        }
    }
    None
}

fn rebuild_session(state: &AppState, token: String, remember_me: bool) -> Result<Session, AuthError> {
    let claims = auth::decode_token(&token, &state.config.token_secret)?;
    let mut user = state
        .identity
        .get_user(claims.sub)
        .ok_or(AuthError::UserNotFound)?;

    let stored = session_area(state, remember_me)
        .get(keys::USER)
        .and_then(|raw| serde_json::from_str::<User>(&raw).ok())
        .filter(|stored| stored.id == user.id);
    if let Some(stored) = stored {
        overlay_stored_user(&mut user, stored);
    }

    let started_at = chrono::DateTime::from_timestamp(claims.iat as i64, 0).unwrap_or_else(Utc::now);
    Ok(Session {
        user,
        token,
        remember_me,
        started_at,
    })
}

/// Carries the tab's own edits from the stored record onto the identity
/// record: profile fields always, the role only when the switch rules allow
/// reaching it. Credentials and approval statuses stay as the store says.
fn overlay_stored_user(user: &mut User, stored: User) {
    if let Some(role) = stored.role
        && role != user.effective_role()
        && let Ok(target) = SwitchTarget::try_from(role)
        && role_switch::evaluate(user, target).is_ok()
    {
        user.role = Some(role);
    }

    if !stored.name.trim().is_empty() {
        user.name = stored.name;
    }
    user.headline = stored.headline;
    user.bio = stored.bio;
    user.location = stored.location;
    user.skills = stored.skills;
}

/// logout
///
/// Ends the session and forgets the credentials. The remembered email stays.
pub fn logout(state: &AppState, session: &mut SessionContext) -> Result<(), AuthError> {
    clear_credentials(state.local.as_ref())?;
    clear_credentials(state.session_storage.as_ref())?;
    if let Some(ended) = session.end() {
        tracing::info!(user_id = %ended.user.id, "logged out");
    }
    Ok(())
}

/// signup
///
/// Registers a new student. Taken email/username are reported as field errors.
pub async fn signup(state: &AppState, req: &SignupRequest) -> Result<UserProfile, AuthError> {
    validation::validate_signup(req).map_err(AuthError::Validation)?;

    let mut taken = crate::error::FieldErrors::new();
    if state
        .identity
        .find_user_by_email_or_username(req.email.trim())
        .is_some()
    {
        taken.insert("email", "An account with this email already exists.".to_string());
    }
    if state
        .identity
        .find_user_by_email_or_username(req.username.trim())
        .is_some()
    {
        taken.insert("username", "This username is taken.".to_string());
    }
    if !taken.is_empty() {
        return Err(AuthError::Validation(taken));
    }

    state.submissions.submit(FormKind::Signup).await?;

    let user = state.identity.create_user(User {
        id: Uuid::new_v4(),
        username: req.username.trim().to_string(),
        email: req.email.trim().to_string(),
        password: req.password.clone(),
        name: req.name.trim().to_string(),
        role: Some(Role::Student),
        ..User::default()
    });
    Ok(UserProfile::from(&user))
}

/// request_password_reset
///
/// Only the address format is checked. Registered or not, the answer is the same.
pub async fn request_password_reset(
    state: &AppState,
    email: &str,
) -> Result<PasswordResetSent, AuthError> {
    validation::validate_reset_email(email).map_err(AuthError::Validation)?;
    state.submissions.submit(FormKind::PasswordReset).await?;

    let email = email.trim().to_string();
    tracing::info!("password reset requested");
    Ok(PasswordResetSent {
        message: format!(
            "If an account exists for {email}, a reset link has been sent."
        ),
        email,
    })
}

// --- Navigation & Roles ---

/// navigate
///
/// Opens `location` in the tab, applying its guard.
pub fn navigate(session: &SessionContext, location: &str) -> Navigation {
    let navigation = routes::resolve(location, session);
    if let Navigation::Redirect { from, to } = &navigation {
        tracing::debug!(from = from.path(), to = to.path(), "navigation redirected");
    }
    navigation
}

/// switch_role
///
/// Runs the role-switch machine and, on success, stores the new role with
/// the session. A storage failure is logged; the switch itself stands.
pub fn switch_role(
    state: &AppState,
    session: &mut SessionContext,
    target: SwitchTarget,
) -> SwitchOutcome {
    let outcome = role_switch::switch_role(session, target);
    if let (SwitchOutcome::Switched(_), Some(current)) = (&outcome, session.current())
        && let Err(e) = persist_session_user(state, current)
    {
        tracing::warn!(error = %e, "failed to store switched role");
    }
    outcome
}

// --- Profile ---

/// current_profile
///
/// The signed-in user as the profile page shows it, with the session's role.
pub fn current_profile(session: &SessionContext) -> Result<UserProfile, AuthError> {
    session
        .user()
        .map(UserProfile::from)
        .ok_or(AuthError::NotAuthenticated)
}

fn apply_update(user: &mut User, update: &ProfileUpdate) {
    fn optional(value: &str) -> Option<String> {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    if let Some(name) = &update.name {
        user.name = name.trim().to_string();
    }
    if let Some(headline) = &update.headline {
        user.headline = optional(headline);
    }
    if let Some(bio) = &update.bio {
        user.bio = optional(bio);
    }
    if let Some(location) = &update.location {
        user.location = optional(location);
    }
    if let Some(skills) = &update.skills {
        user.skills = skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
}

/// update_profile
///
/// Validates, waits for the simulated save, then updates both the identity
/// record and the live session.
pub async fn update_profile(
    state: &AppState,
    session: &mut SessionContext,
    update: &ProfileUpdate,
) -> Result<UserProfile, ProfileError> {
    let AuthUser { id, .. } =
        AuthUser::from_session(session).map_err(|_| ProfileError::NotAuthenticated)?;
    validation::validate_profile(update).map_err(ProfileError::Validation)?;

    state.submissions.submit(FormKind::ProfileUpdate).await?;

    let mut record = state.identity.get_user(id).ok_or(ProfileError::UserNotFound)?;
    apply_update(&mut record, update);
    if !state.identity.update_user(record.clone()) {
        return Err(ProfileError::UserNotFound);
    }

    let current = session.current_mut().ok_or(ProfileError::NotAuthenticated)?;
    // Keep the session's (possibly switched) role.
    record.role = current.user.role;
    current.user = record;
    persist_session_user(state, current)?;

    Ok(UserProfile::from(&current.user))
}

// --- Notifications ---

/// get_notifications
///
/// The signed-in user's notifications, newest first.
pub fn get_notifications(
    state: &AppState,
    session: &SessionContext,
) -> Result<Vec<Notification>, AuthError> {
    let AuthUser { id, .. } = AuthUser::from_session(session)?;
    Ok(state.notifications.for_user(id))
}

/// Unread count for the navbar badge.
pub fn unread_notification_count(
    state: &AppState,
    session: &SessionContext,
) -> Result<usize, AuthError> {
    let AuthUser { id, .. } = AuthUser::from_session(session)?;
    Ok(state.notifications.unread_count(id))
}

/// Returns false for unknown ids and for other users' notifications.
pub fn mark_notification_read(
    state: &AppState,
    session: &SessionContext,
    notification_id: Uuid,
) -> Result<bool, AuthError> {
    let AuthUser { id, .. } = AuthUser::from_session(session)?;
    Ok(state.notifications.mark_read(notification_id, id))
}

/// Marks every notification of the signed-in user read and returns how
/// many changed.
pub fn mark_all_notifications_read(
    state: &AppState,
    session: &SessionContext,
) -> Result<usize, AuthError> {
    let AuthUser { id, .. } = AuthUser::from_session(session)?;
    Ok(state.notifications.mark_all_read(id))
}

// --- Messaging ---

/// list_conversations
///
/// The inbox: one row per conversation the user takes part in, most recent
/// activity first.
pub fn list_conversations(
    state: &AppState,
    session: &SessionContext,
) -> Result<Vec<ConversationSummary>, MessagingError> {
    let AuthUser { id, .. } =
        AuthUser::from_session(session).map_err(|_| MessagingError::NotAuthenticated)?;
    Ok(state.messages.summaries_for(id))
}

/// Opens a conversation. Anyone who is not a participant gets
/// `ConversationNotFound`.
pub fn get_conversation(
    state: &AppState,
    session: &SessionContext,
    conversation_id: Uuid,
) -> Result<Conversation, MessagingError> {
    let AuthUser { id, .. } =
        AuthUser::from_session(session).map_err(|_| MessagingError::NotAuthenticated)?;
    state.messages.conversation(conversation_id, id)
}

/// send_message
///
/// Appends a message from the signed-in user. The body is trimmed and must be
/// non-empty and within `MAX_MESSAGE_LEN`.
pub fn send_message(
    state: &AppState,
    session: &SessionContext,
    conversation_id: Uuid,
    body: &str,
) -> Result<Message, MessagingError> {
    let AuthUser { id, .. } =
        AuthUser::from_session(session).map_err(|_| MessagingError::NotAuthenticated)?;
    state.messages.send(conversation_id, id, body, Utc::now())
}

// --- Roadmaps (public) ---

/// list_roadmaps
///
/// Public roadmap browser. Blank filters match everything.
pub fn list_roadmaps(
    state: &AppState,
    category: Option<&str>,
    query: Option<&str>,
) -> Vec<Roadmap> {
    state
        .roadmaps
        .search(category, query)
        .into_iter()
        .cloned()
        .collect()
}

/// One roadmap by its slug.
pub fn get_roadmap(state: &AppState, id: &str) -> Option<Roadmap> {
    state.roadmaps.get(id).cloned()
}

// --- Career Tip ---

/// The home page's tip for `today`, cached in local storage.
pub fn career_tip_of_the_day(
    state: &AppState,
    today: NaiveDate,
) -> Result<Option<TipOfTheDay>, StorageError> {
    career_tip::tip_of_the_day(state.local.as_ref(), &state.career_tips, today)
}

// --- Role Applications ---

/// apply_for_role
///
/// Moves the signed-in user's mentor or counsellor status to pending.
pub async fn apply_for_role(
    state: &AppState,
    session: &mut SessionContext,
    kind: ApplicationKind,
) -> Result<UserProfile, ApplicationError> {
    let AuthUser { id, role } =
        AuthUser::from_session(session).map_err(|_| ApplicationError::NotAuthenticated)?;
    if role == Role::Admin {
        return Err(ApplicationError::Forbidden);
    }

    let mut record = state.identity.get_user(id).ok_or(ApplicationError::UserNotFound)?;
    let (current, other) = match kind {
        ApplicationKind::Mentor => (record.mentor_status, record.counsellor_status),
        ApplicationKind::Counsellor => (record.counsellor_status, record.mentor_status),
    };
    if current != ApprovalStatus::None {
        return Err(ApplicationError::AlreadyApplied);
    }
    if other.is_approved() {
        return Err(ApplicationError::Conflict(crate::error::ApprovalConflict));
    }

    state.submissions.submit(FormKind::RoleApplication).await?;

    set_status(&mut record, kind, ApprovalStatus::Pending)?;
    if !state.identity.update_user(record.clone()) {
        return Err(ApplicationError::UserNotFound);
    }

    if let Some(current) = session.current_mut() {
        current.user.mentor_status = record.mentor_status;
        current.user.counsellor_status = record.counsellor_status;
        if let Err(e) = persist_session_user(state, current) {
            tracing::warn!(error = %e, "failed to store application status");
        }
    }

    tracing::info!(user_id = %id, ?kind, "role application submitted");
    Ok(UserProfile::from(&record))
}

fn set_status(
    user: &mut User,
    kind: ApplicationKind,
    status: ApprovalStatus,
) -> Result<(), ApplicationError> {
    match kind {
        ApplicationKind::Mentor => user.set_mentor_status(status)?,
        ApplicationKind::Counsellor => user.set_counsellor_status(status)?,
    }
    Ok(())
}

/// Users waiting for an admin decision.
pub fn pending_applications(
    state: &AppState,
    session: &SessionContext,
) -> Result<Vec<UserProfile>, ApplicationError> {
    AuthUser::require(session, Role::Admin).map_err(application_auth_error)?;
    Ok(state
        .identity
        .list_users()
        .iter()
        .filter(|u| {
            u.mentor_status == ApprovalStatus::Pending
                || u.counsellor_status == ApprovalStatus::Pending
        })
        .map(UserProfile::from)
        .collect())
}

/// review_application
///
/// Admin decision on a pending application. Approval never produces a user
/// approved as both mentor and counsellor. The applicant is notified.
pub fn review_application(
    state: &AppState,
    session: &SessionContext,
    user_id: Uuid,
    kind: ApplicationKind,
    decision: ReviewDecision,
) -> Result<UserProfile, ApplicationError> {
    let admin = AuthUser::require(session, Role::Admin).map_err(application_auth_error)?;

    let mut record = state
        .identity
        .get_user(user_id)
        .ok_or(ApplicationError::UserNotFound)?;
    let current = match kind {
        ApplicationKind::Mentor => record.mentor_status,
        ApplicationKind::Counsellor => record.counsellor_status,
    };
    if current != ApprovalStatus::Pending {
        return Err(ApplicationError::NoPendingApplication);
    }

    let next = match decision {
        ReviewDecision::Approve => ApprovalStatus::Approved,
        ReviewDecision::Reject => ApprovalStatus::None,
    };
    set_status(&mut record, kind, next)?;
    if !state.identity.update_user(record.clone()) {
        return Err(ApplicationError::UserNotFound);
    }

    let what = match kind {
        ApplicationKind::Mentor => "mentor",
        ApplicationKind::Counsellor => "counsellor",
    };
    let verdict = match decision {
        ReviewDecision::Approve => "approved",
        ReviewDecision::Reject => "not approved",
    };
    state.notifications.push(Notification {
        id: Uuid::new_v4(),
        user_id,
        kind: NotificationKind::Application,
        text: format!("Your {what} application was {verdict}."),
        is_read: false,
        created_at: Utc::now(),
    });

    tracing::info!(admin_id = %admin.id, %user_id, ?kind, ?decision, "application reviewed");
    Ok(UserProfile::from(&record))
}

fn application_auth_error(e: AuthError) -> ApplicationError {
    match e {
        AuthError::NotAuthenticated => ApplicationError::NotAuthenticated,
        _ => ApplicationError::Forbidden,
    }
}

// --- Admin ---

/// get_admin_stats
///
/// Dashboard counters. Admins only.
pub fn get_admin_stats(
    state: &AppState,
    session: &SessionContext,
) -> Result<AdminDashboardStats, AuthError> {
    AuthUser::require(session, Role::Admin)?;

    let users = state.identity.list_users();
    let count_role = |role: Role| users.iter().filter(|u| u.effective_role() == role).count();

    Ok(AdminDashboardStats {
        total_users: users.len(),
        students: count_role(Role::Student),
        mentors: count_role(Role::Mentor),
        counselors: count_role(Role::CareerCounselor),
        admins: count_role(Role::Admin),
        pending_mentor_applications: users
            .iter()
            .filter(|u| u.mentor_status == ApprovalStatus::Pending)
            .count(),
        pending_counsellor_applications: users
            .iter()
            .filter(|u| u.counsellor_status == ApprovalStatus::Pending)
            .count(),
        unread_notifications: state.notifications.total_unread(),
    })
}
