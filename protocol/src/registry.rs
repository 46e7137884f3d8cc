//! Payloads exchanged with the registry.
use crate::{Capability, Server};

use serde::{Deserialize, Serialize};

use std::fmt;

/// A capability addressed across servers.
///
/// Capability ids are only unique within their server, so any reference
/// leaving that server carries both halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRef {
    #[serde(alias = "server_id")]
    pub server_id: String,
    #[serde(alias = "capability_id")]
    pub capability_id: String,
}

impl CapabilityRef {
    pub fn new(server_id: impl Into<String>, capability_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            capability_id: capability_id.into(),
        }
    }
}

impl<S, C> From<(S, C)> for CapabilityRef
where
    S: Into<String>,
    C: Into<String>,
{
    fn from((server_id, capability_id): (S, C)) -> Self {
        Self::new(server_id, capability_id)
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server_id, self.capability_id)
    }
}

/// A capability search hit, paired with the server that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityMatch {
    pub capability: Capability,
    pub server: Server,
}

impl CapabilityMatch {
    /// The cross-server key of the matched capability, if the owning server
    /// has been assigned an id.
    pub fn key(&self) -> Option<CapabilityRef> {
        self.server
            .id
            .as_ref()
            .map(|server_id| CapabilityRef::new(server_id.clone(), self.capability.id.clone()))
    }
}

/// The body of a rating submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    pub server_id: String,
    pub score: f64,
    pub text: Option<String>,
}

/// The body of a new functionality request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalityDraft {
    pub description: String,
    pub use_case: String,
}

/// A backlog item asking the marketplace for a missing capability.
///
/// Only the registry moves it through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalityRequest {
    pub id: String,
    pub description: String,
    #[serde(default, alias = "use_case", deserialize_with = "crate::or_default")]
    pub use_case: String,
    #[serde(default, deserialize_with = "crate::or_default")]
    pub status: Status,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub votes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Implemented,
    Other(String),
}

impl Status {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<String> for Status {
    fn from(status: String) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            "implemented" => Self::Implemented,
            _ => Self::Other(status),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => "Pending".to_owned(),
            Status::Accepted => "Accepted".to_owned(),
            Status::Rejected => "Rejected".to_owned(),
            Status::Implemented => "Implemented".to_owned(),
            Status::Other(status) => status,
        }
    }
}
