use crate::social_client::error::ClientError;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const DUPLICATE_ACCOUNT: &str = "An account with this email already exists.";
pub const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

fn validation_message(err: &ClientError) -> Option<String> {
    err.api_error()
        .filter(|api_error| api_error.status_code == 400)
        .map(|api_error| api_error.message.joined(", "))
}

pub fn login_error_message(err: &ClientError) -> String {
    match err.status() {
        Some(401) => INVALID_CREDENTIALS.to_string(),
        Some(400) => validation_message(err).unwrap_or_else(|| UNEXPECTED.to_string()),
        _ => UNEXPECTED.to_string(),
    }
}

pub fn signup_error_message(err: &ClientError) -> String {
    match err.status() {
        Some(400) => validation_message(err).unwrap_or_else(|| UNEXPECTED.to_string()),
        Some(409) => DUPLICATE_ACCOUNT.to_string(),
        _ => UNEXPECTED.to_string(),
    }
}
