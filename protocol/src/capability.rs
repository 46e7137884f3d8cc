use crate::{Map, Value};

use serde::{Deserialize, Serialize};

/// A machine-invocable function advertised by a capability server.
///
/// The `id` is only unique within the server that owns it. Use a
/// [`CapabilityRef`](crate::CapabilityRef) whenever a capability is referenced
/// outside of that server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// An opaque JSON Schema document. Validation is up to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    #[serde(
        default,
        deserialize_with = "crate::or_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub metadata: Map,
}

impl Capability {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            input_schema: None,
            output_schema: None,
            authentication: None,
            metadata: Map::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }
}

/// The credentials a capability expects in [`Request::auth`](crate::Request::auth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "crate::or_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub parameters: Map,
}

impl Authentication {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            parameters: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn it_tolerates_missing_and_unknown_fields() {
        let capability: Capability = crate::decode(
            br#"{"id": "ocr", "name": "OCR", "cost": 3, "description": null, "metadata": null}"#,
        )
        .unwrap();

        assert_eq!(capability, Capability::new("ocr", "OCR"));
    }

    #[test]
    fn it_renames_authentication_type() {
        let capability = Capability::new("forecast", "Forecast")
            .authentication(Authentication::new("api_key"))
            .input_schema(json!({ "type": "object" }));

        let json = serde_json::to_value(&capability).unwrap();

        assert_eq!(json["authentication"], json!({ "type": "api_key" }));
        assert_eq!(json["input_schema"], json!({ "type": "object" }));
        assert!(json.get("output_schema").is_none());
    }
}
