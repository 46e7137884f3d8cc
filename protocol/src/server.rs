use crate::remix;
use crate::{Capability, Map, Value};

use serde::{Deserialize, Serialize};

/// A capability server as indexed by the registry.
///
/// The `url` is the invocation base of every capability in the list. This
/// holds for remixes too: a remix is invoked through its own `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Assigned by the registry on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, deserialize_with = "crate::or_default")]
    pub capabilities: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(
        default,
        deserialize_with = "crate::or_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub metadata: Map,
}

impl Server {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            url: url.into(),
            capabilities: Vec::new(),
            protocol_version: None,
            contact: None,
            rating: None,
            metadata: Map::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Whether the registry composed this server out of other servers.
    pub fn is_remix(&self) -> bool {
        self.metadata.get(remix::MARKER) == Some(&Value::Bool(true))
    }

    pub fn capability(&self, id: &str) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|capability| capability.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The aggregate rating of a server. Owned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub score: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "crate::or_default")]
    pub recent_reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The inclusive bounds of a rating score.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_a_registry_listing() {
        let server: Server = crate::decode(
            br#"{
                "id": "server-1",
                "name": "Advanced Image Processing API",
                "description": null,
                "url": "https://image.example.com",
                "capabilities": [
                    { "id": "ocr", "name": "OCR" },
                    { "id": "resize", "name": "Resize" }
                ],
                "protocol_version": "1.0",
                "contact": { "email": "ops@example.com" },
                "rating": { "score": 4.5, "count": 12, "recent_reviews": null },
                "metadata": { "tags": ["image"] }
            }"#,
        )
        .unwrap();

        assert_eq!(server.id.as_deref(), Some("server-1"));
        assert_eq!(server.capabilities.len(), 2);
        assert_eq!(server.capability("resize").map(|c| c.name.as_str()), Some("Resize"));
        assert_eq!(server.rating.as_ref().map(|r| r.score), Some(4.5));
        assert!(!server.is_remix());
    }

    #[test]
    fn it_omits_the_id_before_submission() {
        let json = serde_json::to_value(Server::new("Forecasts", "https://f.example.com")).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["capabilities"], serde_json::json!([]));
    }
}
