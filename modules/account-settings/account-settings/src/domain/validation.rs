//! Pure field validators. No I/O, no backend calls; every public operation
//! runs these before touching a port.

use std::collections::BTreeMap;

use super::fields::ProfileFields;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_BIO_LEN: usize = 160;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const USERNAME_MARKER: char = '@';
pub const MIN_PASSWORD_LEN: usize = 8;

/// Exact, case-sensitive token required to schedule account deletion.
pub const DELETION_CONFIRMATION_TOKEN: &str = "EXCLUIR";

/// Outcome of a validation pass: valid iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field, message.into());
        Self { errors }
    }

    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.values().next().map(String::as_str)
    }
}

#[must_use]
pub fn validate_name(name: &str) -> ValidationReport {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ValidationReport::fail(ProfileFields::FULL_NAME, "Name cannot be empty");
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return ValidationReport::fail(
            ProfileFields::FULL_NAME,
            format!("Name cannot exceed {MAX_NAME_LEN} characters"),
        );
    }
    ValidationReport::default()
}

/// Strip any existing leading markers and prepend exactly one, so repeated
/// normalization is stable.
#[must_use]
pub fn normalize_username(input: &str) -> String {
    let body = input.trim().trim_start_matches(USERNAME_MARKER);
    format!("{USERNAME_MARKER}{body}")
}

/// Validates the *normalized* form: marker + 3-30 chars of `[A-Za-z0-9_]`.
#[must_use]
pub fn validate_username(input: &str) -> ValidationReport {
    let normalized = normalize_username(input);
    let body = &normalized[USERNAME_MARKER.len_utf8()..];

    if body.len() < USERNAME_MIN_LEN || body.len() > USERNAME_MAX_LEN {
        return ValidationReport::fail(
            ProfileFields::USERNAME,
            format!("Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"),
        );
    }
    if !body.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return ValidationReport::fail(
            ProfileFields::USERNAME,
            "Username may only contain letters, digits and underscores",
        );
    }
    ValidationReport::default()
}

#[must_use]
pub fn validate_bio(bio: &str) -> ValidationReport {
    if bio.chars().count() > MAX_BIO_LEN {
        return ValidationReport::fail(
            ProfileFields::BIO,
            format!("Bio cannot exceed {MAX_BIO_LEN} characters"),
        );
    }
    ValidationReport::default()
}

/// `local@domain.tld` shape check. Deliverability is the backend's problem.
#[must_use]
pub fn validate_email(email: &str) -> ValidationReport {
    let invalid = || ValidationReport::fail(ProfileFields::EMAIL, "Enter a valid email address");

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return invalid();
    };
    if local.is_empty() || domain.is_empty() {
        return invalid();
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return invalid();
    }
    if email.contains(char::is_whitespace) {
        return invalid();
    }
    ValidationReport::default()
}

/// The five checks behind the password strength meter. Overall validity
/// requires all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordStrength {
    #[must_use]
    pub fn check(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= MIN_PASSWORD_LEN,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
            has_special: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.long_enough
            && self.has_uppercase
            && self.has_lowercase
            && self.has_digit
            && self.has_special
    }
}

#[must_use]
pub fn validate_password(password: &str) -> ValidationReport {
    let strength = PasswordStrength::check(password);
    if strength.is_valid() {
        return ValidationReport::default();
    }
    ValidationReport::fail(
        ProfileFields::NEW_PASSWORD,
        format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters and include uppercase, \
             lowercase, a digit and a special character"
        ),
    )
}

#[must_use]
pub fn validate_deletion_confirmation(text: &str) -> ValidationReport {
    if text == DELETION_CONFIRMATION_TOKEN {
        return ValidationReport::default();
    }
    ValidationReport::fail(
        ProfileFields::DELETION_CONFIRMATION,
        format!("Type {DELETION_CONFIRMATION_TOKEN} to confirm"),
    )
}
