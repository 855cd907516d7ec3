use chrono::Utc;
use smartcareer::{
    Fixtures,
    error::{ApprovalConflict, FixtureError},
    models::{
        ApprovalStatus, Notification, NotificationKind, ProfileUpdate, Role, User, UserProfile,
    },
};
use uuid::Uuid;

// --- Roles ---

#[test]
fn test_role_accepts_counsellor_spellings() {
    for raw in [
        r#""career_counselor""#,
        r#""counselor""#,
        r#""counsellor""#,
        r#""career_counsellor""#,
    ] {
        let role: Role = serde_json::from_str(raw).unwrap();
        assert_eq!(role, Role::CareerCounselor, "{raw}");
    }

    assert_eq!("Career-Counsellor".parse::<Role>(), Ok(Role::CareerCounselor));
    assert!("superuser".parse::<Role>().is_err());
    // Serialization always uses the canonical name.
    assert_eq!(
        serde_json::to_string(&Role::CareerCounselor).unwrap(),
        r#""career_counselor""#
    );
}

#[test]
fn test_user_without_role_is_a_student() {
    let user: User = serde_json::from_str(
        r#"{"id":"00000000-0000-0000-0000-000000000042","username":"nora","email":"nora@example.com","name":"Nora"}"#,
    )
    .unwrap();

    assert_eq!(user.role, None);
    assert_eq!(user.effective_role(), Role::Student);
    assert_eq!(user.mentor_status, ApprovalStatus::None);
    assert_eq!(UserProfile::from(&user).role, Role::Student);
}

// --- Serialization ---

#[test]
fn test_user_password_is_never_serialized() {
    let user = User {
        id: Uuid::new_v4(),
        username: "secretive".to_string(),
        email: "s@example.com".to_string(),
        password: "Hunter2!x".to_string(),
        name: "S".to_string(),
        ..User::default()
    };

    let json = serde_json::to_string(&user).unwrap();

    assert!(!json.contains("Hunter2!x"));
    assert!(!json.contains("password"));
    assert!(json.contains(r#""mentorStatus":"none""#));
}

#[test]
fn test_notification_uses_type_key() {
    let notification = Notification {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        kind: NotificationKind::Mentorship,
        text: "New request".to_string(),
        is_read: false,
        created_at: Utc::now(),
    };

    let json = serde_json::to_string(&notification).unwrap();

    assert!(json.contains(r#""type":"mentorship""#));
    assert!(json.contains(r#""userId""#));
    assert!(!json.contains("kind"));
}

#[test]
fn test_profile_update_omits_unset_fields() {
    let update = ProfileUpdate {
        headline: Some("New headline".to_string()),
        ..ProfileUpdate::default()
    };

    let json = serde_json::to_string(&update).unwrap();

    assert_eq!(json, r#"{"headline":"New headline"}"#);
}

// --- Approval invariant ---

#[test]
fn test_second_approval_is_refused() {
    let mut user = User {
        mentor_status: ApprovalStatus::Approved,
        ..User::default()
    };

    assert_eq!(
        user.set_counsellor_status(ApprovalStatus::Approved),
        Err(ApprovalConflict)
    );
    assert_eq!(user.counsellor_status, ApprovalStatus::None);

    // Pending alongside an approval is allowed.
    assert!(user.set_counsellor_status(ApprovalStatus::Pending).is_ok());
    assert!(user.set_mentor_status(ApprovalStatus::None).is_ok());
    assert!(user.set_counsellor_status(ApprovalStatus::Approved).is_ok());
    assert!(user.check_approvals().is_ok());
}

// --- Fixtures ---

#[test]
fn test_embedded_fixtures_load() {
    let fixtures = Fixtures::embedded().unwrap();

    assert_eq!(fixtures.users.len(), 7);
    assert_eq!(fixtures.career_tips.len(), 5);
    assert!(fixtures.users.iter().all(|u| u.check_approvals().is_ok()));
    assert!(!fixtures.users[0].password.is_empty());
}

#[test]
fn test_fixtures_reject_double_approval() {
    let raw = r#"{
        "users": [{
            "id": "00000000-0000-0000-0000-000000000099",
            "username": "both",
            "email": "both@example.com",
            "name": "Both",
            "mentorStatus": "approved",
            "counsellorStatus": "approved"
        }]
    }"#;

    let result = Fixtures::from_json(raw);

    assert!(matches!(
        result,
        Err(FixtureError::Invariant { ref username }) if username == "both"
    ));
}

#[test]
fn test_fixtures_missing_sections_default_to_empty() {
    let fixtures = Fixtures::from_json("{}").unwrap();

    assert!(fixtures.users.is_empty());
    assert!(fixtures.roadmaps.is_empty());
}
