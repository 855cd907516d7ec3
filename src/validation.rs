//! Local, synchronous form validation. Every failure is a field name mapped
//! to the inline text shown under that field.

use crate::{
    error::FieldErrors,
    models::{LoginRequest, ProfileUpdate, SignupRequest},
};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const HEADLINE_MAX_LEN: usize = 120;
pub const BIO_MAX_LEN: usize = 500;
pub const MAX_SKILLS: usize = 20;

/// Structural email check: `local@domain.tld`, no whitespace, a TLD of at
/// least two characters.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && !host.starts_with('.')
                && !host.ends_with('.')
                && tld.len() >= 2
                && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Password rules: minimum length plus one each of upper, lower, digit and symbol.
/// Returns the first rule broken.
pub fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters."
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain an uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain a lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a number.".to_string());
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err("Password must contain a special character.".to_string());
    }
    Ok(())
}

pub fn check_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(format!(
            "Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters."
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Username may only contain letters, numbers and underscores.".to_string());
    }
    Ok(())
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, label: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, format!("{label} is required."));
        return false;
    }
    true
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn validate_login(req: &LoginRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    required(&mut errors, "identifier", &req.identifier, "Email or username");
    required(&mut errors, "password", &req.password, "Password");
    finish(errors)
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    required(&mut errors, "name", &req.name, "Full name");

    if required(&mut errors, "username", &req.username, "Username")
        && let Err(msg) = check_username(req.username.trim())
    {
        errors.insert("username", msg);
    }

    if required(&mut errors, "email", &req.email, "Email") && !is_valid_email(&req.email) {
        errors.insert("email", "Please enter a valid email address.".to_string());
    }

    if required(&mut errors, "password", &req.password, "Password")
        && let Err(msg) = check_password(&req.password)
    {
        errors.insert("password", msg);
    }

    if req.confirm_password != req.password {
        errors.insert("confirmPassword", "Passwords do not match.".to_string());
    }

    if !req.accepted_terms {
        errors.insert(
            "acceptedTerms",
            "You must accept the Terms of Service and Privacy Policy.".to_string(),
        );
    }

    finish(errors)
}

pub fn validate_reset_email(email: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if required(&mut errors, "email", email, "Email") && !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address.".to_string());
    }
    finish(errors)
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(name) = &update.name {
        required(&mut errors, "name", name, "Full name");
    }
    if let Some(headline) = &update.headline
        && headline.chars().count() > HEADLINE_MAX_LEN
    {
        errors.insert(
            "headline",
            format!("Headline must be at most {HEADLINE_MAX_LEN} characters."),
        );
    }
    if let Some(bio) = &update.bio
        && bio.chars().count() > BIO_MAX_LEN
    {
        errors.insert("bio", format!("Bio must be at most {BIO_MAX_LEN} characters."));
    }
    if let Some(skills) = &update.skills
        && skills.iter().filter(|s| !s.trim().is_empty()).count() > MAX_SKILLS
    {
        errors.insert("skills", format!("List at most {MAX_SKILLS} skills."));
    }

    finish(errors)
}
