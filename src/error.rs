//! Unified error types for the theme assistant.

use std::fmt;

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// Errors arising while decoding or validating a model tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Required fields are missing or carry the wrong JSON types.
    MalformedToolCall(String),
    /// The call names a command outside the protocol.
    UnknownCommand(String),
    /// The raw text could not be decoded as a command envelope at all.
    ParseFailure(String),
}

impl ProtocolError {
    /// Short chat-facing explanation shown instead of applying the call.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedToolCall(detail) | Self::ParseFailure(detail) => format!(
                "I couldn't apply that change because the generated command was invalid ({detail}). Please try rephrasing your request."
            ),
            Self::UnknownCommand(name) => {
                format!("I tried to run an unsupported command (`{name}`), so nothing was changed.")
            }
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToolCall(msg) => write!(f, "malformed tool call: {msg}"),
            Self::UnknownCommand(name) => write!(f, "unknown command: {name}"),
            Self::ParseFailure(msg) => write!(f, "parse failure: {msg}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the HTTP API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
    },
    /// The provider answered with a payload we could not interpret.
    InvalidResponse(String),
}

impl ApiError {
    /// Build a status error.
    pub fn status(code: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body,
            retry_after_secs,
        }
    }

    /// HTTP status code, when the error came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Server-provided `Retry-After` hint in seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// True when the request died on the client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(inner) if inner.is_timeout())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// TurnError
// ---------------------------------------------------------------------------

/// Failure of a single message round-trip through the model.
#[derive(Debug)]
pub enum TurnError {
    /// The model call exceeded the allotted wait.
    UpstreamTimeout,
    /// The model call failed for any other reason.
    UpstreamFailure(ApiError),
    /// Model returned no choices in the response.
    EmptyResponse,
}

impl TurnError {
    /// Short chat-facing failure message. Never includes provider bodies.
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamTimeout => {
                "The assistant took too long to answer. Your theme was not changed; please try again."
                    .to_string()
            }
            Self::UpstreamFailure(_) | Self::EmptyResponse => {
                "The assistant is unavailable right now. Your theme was not changed.".to_string()
            }
        }
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamTimeout => write!(f, "upstream timeout"),
            Self::UpstreamFailure(e) => write!(f, "upstream failure: {e}"),
            Self::EmptyResponse => write!(f, "model returned empty response"),
        }
    }
}

impl std::error::Error for TurnError {}

impl From<ApiError> for TurnError {
    fn from(e: ApiError) -> Self {
        if e.is_timeout() {
            Self::UpstreamTimeout
        } else {
            Self::UpstreamFailure(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display() {
        assert_eq!(
            ProtocolError::MalformedToolCall("missing `variables`".into()).to_string(),
            "malformed tool call: missing `variables`"
        );
        assert_eq!(
            ProtocolError::UnknownCommand("paint_it".into()).to_string(),
            "unknown command: paint_it"
        );
        assert_eq!(
            ProtocolError::ParseFailure("eof".into()).to_string(),
            "parse failure: eof"
        );
    }

    #[test]
    fn protocol_user_messages_mention_no_change() {
        let msg = ProtocolError::UnknownCommand("paint_it".into()).user_message();
        assert!(msg.contains("`paint_it`"), "got: {msg}");
        assert!(msg.contains("nothing was changed"), "got: {msg}");
        let msg = ProtocolError::ParseFailure("eof".into()).user_message();
        assert!(msg.contains("eof"), "got: {msg}");
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = ConfigError::from(io_err);
        let s = e.to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn api_status_helpers() {
        let err = ApiError::status(429, "slow down".into(), Some(3));
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.retry_after_secs(), Some(3));
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "status 429: slow down");
    }

    #[test]
    fn turn_error_hides_provider_details() {
        let err = TurnError::from(ApiError::status(500, "secret stack trace".into(), None));
        assert!(matches!(err, TurnError::UpstreamFailure(_)));
        assert!(!err.user_message().contains("secret"));
        assert!(TurnError::UpstreamTimeout
            .user_message()
            .contains("took too long"));
    }
}
