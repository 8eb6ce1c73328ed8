//! Pre-submission form validation.
//!
//! Pure, synchronous gates that run before anything reaches the API gateway.
//! Failures come back keyed by field so the rendering layer can show inline
//! messages; the navigation reducer clears a field's message when that field
//! is next edited.

use crate::types::Role;
use std::collections::BTreeMap;

/// Field-keyed validation messages
///
/// Backed by a `BTreeMap` so iteration order is stable for display and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message for a field, replacing any prior one
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The message recorded for a field, if any
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Remove the message for a field (user started editing it)
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// True when no field has a message
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(field, message)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Minimum password length accepted by the auth service
pub const MIN_PASSWORD_LEN: usize = 6;

/// Simple `local@domain.tld` shape check
///
/// Intentionally loose (the service performs authoritative validation):
/// one `@`, a non-empty local part, and a domain containing an interior dot.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
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
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validate the login form
///
/// # Errors
///
/// Returns messages keyed by `email` / `password` when a field fails.
pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_plausible_email(email.trim()) {
        errors.insert("email", "Please enter a valid email");
    }

    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.len() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 6 characters");
    }

    errors.into_result()
}

/// Validate the registration form
///
/// # Errors
///
/// Returns messages keyed by `name` / `email` / `password` / `role` when a
/// field fails.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    role: Option<Role>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }

    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_plausible_email(email.trim()) {
        errors.insert("email", "Please enter a valid email");
    }

    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.len() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 6 characters");
    }

    if role.is_none() {
        errors.insert("role", "Role is required");
    }

    errors.into_result()
}

/// Validate the contact form
///
/// # Errors
///
/// Returns messages keyed by `name` / `email` / `subject` / `message` when a
/// field fails.
pub fn validate_contact(
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }

    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_plausible_email(email.trim()) {
        errors.insert("email", "Please enter a valid email");
    }

    if subject.trim().is_empty() {
        errors.insert("subject", "Subject is required");
    }

    if message.trim().is_empty() {
        errors.insert("message", "Message is required");
    }

    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_accepts_minimal_address() {
        assert!(is_plausible_email("a@b.co"));
        assert!(is_plausible_email("user.name@sub.example.com"));
    }

    #[test]
    fn email_shape_rejects_malformed_addresses() {
        assert!(!is_plausible_email("foo"));
        assert!(!is_plausible_email("foo@bar"));
        assert!(!is_plausible_email("@bar.com"));
        assert!(!is_plausible_email("a b@c.co"));
        assert!(!is_plausible_email("a@b@c.co"));
        assert!(!is_plausible_email("a@.co"));
    }

    #[test]
    fn login_password_length_boundary() {
        assert!(validate_login("a@b.co", "12345").is_err());
        assert!(validate_login("a@b.co", "123456").is_ok());
    }

    #[test]
    fn login_rejects_bad_email_with_field_keyed_message() {
        let errors = validate_login("foo", "123456").unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email"));
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login("", "").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn registration_requires_role() {
        let errors = validate_registration("Ada", "a@b.co", "123456", None).unwrap_err();
        assert_eq!(errors.get("role"), Some("Role is required"));

        assert!(validate_registration("Ada", "a@b.co", "123456", Some(Role::Student)).is_ok());
    }

    #[test]
    fn contact_requires_all_fields() {
        let errors = validate_contact("", "a@b.co", "", "").unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("subject"), Some("Subject is required"));
        assert_eq!(errors.get("message"), Some("Message is required"));
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn clearing_a_field_removes_only_that_message() {
        let mut errors = validate_login("", "").unwrap_err();
        errors.clear_field("email");
        assert!(errors.get("email").is_none());
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(!errors.is_empty());
    }
}
