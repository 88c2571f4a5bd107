//! Client-side form validation. Nothing here talks to the network; a form that fails validation
//! never produces a request.

use crate::social_client::api;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_CONTENT_LENGTH: usize = 280;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;

// Same shape as the usual HTML5 email check; the length limits are applied separately.
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    TooShort(usize),
    TooLong(usize),
    PasswordMismatch,
}

impl FieldError {
    pub fn message(&self, field: &str) -> String {
        let label = capitalize(field);
        match self {
            FieldError::Required => format!("{label} is required"),
            FieldError::InvalidEmail => "Please enter a valid email address".to_string(),
            FieldError::TooShort(min) => format!("{label} must be at least {min} characters"),
            FieldError::TooLong(max) => format!("{label} must be no more than {max} characters"),
            FieldError::PasswordMismatch => "Passwords do not match".to_string(),
        }
    }
}

/// Every failing field with its first error, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(&'static str, FieldError)>,
}

impl FormErrors {
    fn check(&mut self, field: &'static str, result: Option<FieldError>) {
        if let Some(error) = result {
            self.errors.push((field, error));
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn field(&self, name: &str) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, error)| *error)
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|(field, error)| error.message(field))
            .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().iter().join("; "))
    }
}

impl std::error::Error for FormErrors {}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn character_count(text: &str) -> usize {
    text.graphemes(true).count()
}

fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

fn email(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return required(value);
    }
    let local_length = value.split('@').next().map_or(0, str::len);
    let valid = value.len() <= 254 && local_length <= 64 && RE_EMAIL.is_match(value);
    (!valid).then_some(FieldError::InvalidEmail)
}

fn length_between(value: &str, min: Option<usize>, max: Option<usize>) -> Option<FieldError> {
    if value.is_empty() {
        return required(value);
    }
    let count = character_count(value);
    match (min, max) {
        (Some(min), _) if count < min => Some(FieldError::TooShort(min)),
        (_, Some(max)) if count > max => Some(FieldError::TooLong(max)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<api::LoginDto, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check("email", email(&self.email));
        errors.check(
            "password",
            length_between(&self.password, Some(MIN_PASSWORD_LENGTH), None),
        );
        errors.into_result(api::LoginDto {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<api::SignupDto, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check("email", email(&self.email));
        errors.check(
            "username",
            length_between(
                &self.username,
                Some(MIN_USERNAME_LENGTH),
                Some(MAX_USERNAME_LENGTH),
            ),
        );
        errors.check(
            "password",
            length_between(&self.password, Some(MIN_PASSWORD_LENGTH), None),
        );
        errors.check(
            "confirmPassword",
            required(&self.confirm_password).or_else(|| {
                (self.password != self.confirm_password).then_some(FieldError::PasswordMismatch)
            }),
        );
        errors.into_result(api::SignupDto {
            email: self.email.clone(),
            password: self.password.clone(),
            username: Some(self.username.clone()),
        })
    }
}

/// Body of a new tweet or comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub content: String,
}

impl ComposeForm {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    pub fn character_count(&self) -> usize {
        character_count(&self.content)
    }

    /// Negative once over the limit.
    pub fn remaining_characters(&self) -> i64 {
        MAX_CONTENT_LENGTH as i64 - self.character_count() as i64
    }

    pub fn is_over_limit(&self) -> bool {
        self.remaining_characters() < 0
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// The trimmed content, ready to send.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let trimmed = self.content.trim();
        let mut errors = FormErrors::default();
        errors.check(
            "content",
            length_between(trimmed, None, None)
                .or_else(|| self.is_over_limit().then_some(FieldError::TooLong(MAX_CONTENT_LENGTH))),
        );
        errors.into_result(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert_eq!(form.validate().unwrap().email, "alice@example.com");

        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("email"), Some(FieldError::InvalidEmail));
        assert_eq!(errors.field("password"), Some(FieldError::TooShort(6)));
        assert_eq!(
            errors.to_string(),
            "Please enter a valid email address; Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_login_form_required() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.messages(), vec!["Email is required", "Password is required"]);
    }

    #[test]
    fn test_signup_form() {
        let mut form = SignupForm {
            email: "bob@example.com".to_string(),
            username: "bo".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("username"), Some(FieldError::TooShort(3)));
        assert_eq!(errors.field("confirmPassword"), Some(FieldError::PasswordMismatch));
        assert_eq!(errors.field("email"), None);

        form.username = "bobby".to_string();
        form.confirm_password = "secret1".to_string();
        let dto = form.validate().unwrap();
        assert_eq!(dto.username.as_deref(), Some("bobby"));

        form.username = "x".repeat(21);
        assert_eq!(
            form.validate().unwrap_err().messages(),
            vec!["Username must be no more than 20 characters"]
        );
    }

    #[test]
    fn test_compose_limit() {
        let form = ComposeForm::new(&"a".repeat(MAX_CONTENT_LENGTH));
        assert_eq!(form.remaining_characters(), 0);
        assert!(form.can_submit());

        let form = ComposeForm::new(&"a".repeat(MAX_CONTENT_LENGTH + 1));
        assert!(form.is_over_limit());
        assert_eq!(
            form.validate().unwrap_err().field("content"),
            Some(FieldError::TooLong(MAX_CONTENT_LENGTH))
        );
    }

    #[test]
    fn test_compose_counts_graphemes_and_trims() {
        // one flag emoji is several code points but one character on screen
        let form = ComposeForm::new(&"🇯🇵".repeat(MAX_CONTENT_LENGTH));
        assert_eq!(form.character_count(), MAX_CONTENT_LENGTH);
        assert!(form.can_submit());

        assert_eq!(ComposeForm::new("  hi \n").validate().unwrap(), "hi");
        assert_eq!(
            ComposeForm::new("   ").validate().unwrap_err().field("content"),
            Some(FieldError::Required)
        );
    }
}
