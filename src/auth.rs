use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AuthError,
    identity::IdentityStore,
    models::{LoginRequest, Role, User},
    session::{Session, SessionContext},
    validation,
};

/// Claims
///
/// Payload of the `authToken` kept in browser storage. The token only proves
/// which user signed in and until when; the role is always re-read from the
/// identity record.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id.
    pub sub: Uuid,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
}

/// issue_token
///
/// Signs an HS256 token for `user_id` valid for `ttl`. A `ttl` whose expiry
/// cannot be represented fails with `TokenLifetime`.
pub fn issue_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = usize::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| now.checked_add(secs))
        .ok_or(AuthError::TokenLifetime)?;
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(AuthError::TokenIssue)
}

/// decode_token
///
/// Verifies signature and expiry. Expiry is reported separately so the UI can
/// say "expired" rather than "invalid".
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}

/// authenticate
///
/// Checks a login form against the identity store. Validation comes first, then
/// lookup (`UserNotFound`), then the password (`InvalidCredentials`).
pub fn authenticate(identity: &dyn IdentityStore, req: &LoginRequest) -> Result<User, AuthError> {
    validation::validate_login(req).map_err(AuthError::Validation)?;

    let user = identity
        .find_user_by_email_or_username(&req.identifier)
        .ok_or(AuthError::UserNotFound)?;

    if user.password != req.password {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}

/// AuthUser
///
/// The resolved identity of the signed-in tab, as handlers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Resolves the current user or fails with `NotAuthenticated`.
    pub fn from_session(session: &SessionContext) -> Result<Self, AuthError> {
        session
            .current()
            .map(|s: &Session| Self {
                id: s.user.id,
                role: s.role(),
            })
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Resolves the current user and insists on `required`.
    pub fn require(session: &SessionContext, required: Role) -> Result<Self, AuthError> {
        let user = Self::from_session(session)?;
        if user.role != required {
            return Err(AuthError::Forbidden);
        }
        Ok(user)
    }
}
