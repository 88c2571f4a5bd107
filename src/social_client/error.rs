use hyper::StatusCode;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("not signed in: no bearer token stored")]
    MissingToken,
    #[error("http transport failed: {0}")]
    Http(#[from] hyper::Error),
    #[error("could not build request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token storage: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(api_error) => Some(api_error.status_code),
            _ => None,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(api_error) => Some(api_error),
            _ => None,
        }
    }
}

/// Error payload of the backend, e.g. `{"statusCode":400,"message":["content too long"],"error":"Bad Request"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{status_code}: {message}")]
pub struct ApiError {
    pub status_code: u16,
    pub message: ApiMessage,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    One(String),
    Many(Vec<String>),
}

impl ApiMessage {
    pub fn joined(&self, separator: &str) -> String {
        match self {
            ApiMessage::One(message) => message.clone(),
            ApiMessage::Many(messages) => messages.iter().join(separator),
        }
    }
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined(", "))
    }
}

impl ApiError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            message: ApiMessage::One(message.to_string()),
            error: status.canonical_reason().map(str::to_string),
        }
    }

    /// NB: the HTTP status wins over whatever `statusCode` the body claims.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<ApiMessage>,
            error: Option<String>,
        }

        let fallback = status.canonical_reason().unwrap_or("Request failed");

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody { message, error }) => Self {
                status_code: status.as_u16(),
                message: message.unwrap_or_else(|| ApiMessage::One(fallback.to_string())),
                error: error.or_else(|| status.canonical_reason().map(str::to_string)),
            },
            Err(_) => Self::new(status, fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_array() {
        let body = br#"{"statusCode":400,"message":["email must be an email","password too short"],"error":"Bad Request"}"#;
        let error = ApiError::from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(error.status_code, 400);
        assert_eq!(
            error.message.joined(", "),
            "email must be an email, password too short"
        );
        assert_eq!(error.error.as_deref(), Some("Bad Request"));
    }

    #[test]
    fn test_message_string() {
        let body = br#"{"statusCode":401,"message":"Unauthorized"}"#;
        let error = ApiError::from_response(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error.message, ApiMessage::One("Unauthorized".to_string()));
        assert_eq!(error.to_string(), "401: Unauthorized");
    }

    #[test]
    fn test_unparsable_body() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(error.status_code, 502);
        assert_eq!(error.message.joined(", "), "Bad Gateway");
    }

    #[test]
    fn test_status_of_client_error() {
        let error = ClientError::from(ApiError::new(StatusCode::CONFLICT, "taken"));
        assert_eq!(error.status(), Some(409));
        assert_eq!(ClientError::MissingToken.status(), None);
    }
}
