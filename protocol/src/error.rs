use crate::Map;

use serde::{Deserialize, Serialize};

/// An application error reported by a capability server.
///
/// The `code` is a short machine token; the `message` is meant for humans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map>,
}

impl Error {
    pub const CLIENT_ERROR: &str = "client_error";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const CAPABILITY_NOT_FOUND: &str = "capability_not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(Self::CLIENT_ERROR, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_INPUT, message)
    }

    pub fn capability_not_found(id: &str) -> Self {
        Self::new(Self::CAPABILITY_NOT_FOUND, format!("Unknown capability: {id}"))
    }

    pub fn with_details(mut self, details: Map) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{code}: {message}", code = self.code, message = self.message)
    }
}

impl std::error::Error for Error {}

/// A payload that could not be turned into a protocol value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response violates the success/error invariant (success: {success})")]
    Inconsistent { success: bool },
}

/// A caller-supplied value that breaks a protocol rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {name}: {reason}")]
pub struct Invalid {
    pub name: &'static str,
    pub reason: &'static str,
}

impl Invalid {
    pub fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }

    pub(crate) fn empty(name: &'static str) -> Self {
        Self::new(name, "must not be empty")
    }
}
