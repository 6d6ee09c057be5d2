use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Nothing stored for the request; callers treat it as "start empty".
    NotFound,
    /// Session expired or access denied.
    Unauthorized,
    BadRequest,
    /// Any other network or server failure.
    Upstream,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Upstream => "upstream failure",
        };
        f.write_str(label)
    }
}

/// Tagged failure reported by a roster or squad provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ProviderError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    /// 401/403 are auth failures, 404 is "nothing stored", 400 is a rejected
    /// request and everything else is an upstream failure.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            400 => ErrorKind::BadRequest,
            _ => ErrorKind::Upstream,
        };
        Self::new(kind, message)
    }

    /// Builds an error from a failed HTTP response.
    ///
    /// The message is taken from the backend envelope (`errorMsg` first, then
    /// `message`), falling back to the status text. A body that is not JSON
    /// keeps the status classification with a generic message.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let envelope = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::warn!("unreadable error body for status {status}: {err}");
                return Self::from_status(
                    status,
                    format!("unreadable error response ({status} {status_text})"),
                );
            }
        };

        let message = envelope
            .error_msg
            .filter(|m| !m.is_empty())
            .or(envelope.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| {
                if status_text.is_empty() {
                    "unknown error".to_string()
                } else {
                    status_text.to_string()
                }
            });

        Self::from_status(status, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("slot `{slot}` does not exist in formation {formation}")]
    UnknownSlot { slot: String, formation: String },
    #[error("unknown formation `{0}`")]
    UnknownFormation(String),
    #[error("invalid formation template: {0}")]
    InvalidTemplate(String),
    #[error("no team selected")]
    NoTeamSelected,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::InvalidPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(ProviderError::from_status(401, "x").kind, ErrorKind::Unauthorized);
        assert_eq!(ProviderError::from_status(403, "x").kind, ErrorKind::Unauthorized);
        assert_eq!(ProviderError::from_status(404, "x").kind, ErrorKind::NotFound);
        assert_eq!(ProviderError::from_status(400, "x").kind, ErrorKind::BadRequest);
        assert_eq!(ProviderError::from_status(500, "x").kind, ErrorKind::Upstream);
        assert_eq!(ProviderError::from_status(502, "x").kind, ErrorKind::Upstream);
    }

    #[test]
    fn from_response_prefers_error_msg_over_message() {
        let body = r#"{"success":false,"status":400,"message":"generic","errorMsg":"formation missing"}"#;
        let err = ProviderError::from_response(400, "Bad Request", body);

        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.message, "formation missing");
    }

    #[test]
    fn from_response_falls_back_to_status_text() {
        let err = ProviderError::from_response(500, "Internal Server Error", r#"{"success":false}"#);
        assert_eq!(err.message, "Internal Server Error");

        let err = ProviderError::from_response(500, "", r#"{"errorMsg":""}"#);
        assert_eq!(err.message, "unknown error");
    }

    #[test]
    fn from_response_with_non_json_body_keeps_classification() {
        let err = ProviderError::from_response(403, "Forbidden", "<html>nope</html>");

        assert!(err.is_unauthorized());
        assert!(err.message.contains("403"));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = ProviderError::not_found("no squad");
        assert_eq!(err.to_string(), "not found: no squad");

        let wrapped: BoardError = err.into();
        assert_eq!(wrapped.to_string(), "not found: no squad");
    }
}
