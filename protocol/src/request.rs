use crate::{Bytes, Map};

use serde::{Deserialize, Serialize};

/// An invocation of a single capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation id. Left empty, the client fills it before sending.
    #[serde(default, deserialize_with = "crate::or_default")]
    pub request_id: String,
    pub capability_id: String,
    #[serde(default, deserialize_with = "crate::or_default")]
    pub input: Map,
    /// Opaque credential material, forwarded untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Map>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map>,
}

impl Request {
    pub fn new(capability_id: impl Into<String>) -> Self {
        Self {
            request_id: String::new(),
            capability_id: capability_id.into(),
            input: Map::new(),
            auth: None,
            metadata: None,
        }
    }

    pub fn id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn input(mut self, input: Map) -> Self {
        self.input = input;
        self
    }

    pub fn auth(mut self, auth: Map) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn metadata(mut self, metadata: Map) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn serialize(&self) -> serde_json::Result<Bytes> {
        crate::encode(self)
    }
}
