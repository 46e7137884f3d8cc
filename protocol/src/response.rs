use crate::{Bytes, DecodeError, Error, Map, Value};

use serde::{Deserialize, Serialize};

use std::fmt;

/// The reply to a [`Request`](crate::Request).
///
/// `success` is `true` exactly when `error` is `None`. The constructors keep
/// it that way and [`Response::deserialize`] rejects bodies that do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, deserialize_with = "crate::or_default")]
    pub request_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map>,
}

impl Response {
    pub fn success(request_id: impl Into<String>, output: Value) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            output: Some(output),
            error: None,
            metadata: None,
        }
    }

    pub fn failure(request_id: impl Into<String>, error: Error) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: None,
        }
    }

    /// Builds the client-side failure for a reply that carried no usable
    /// envelope.
    pub fn synthesize(request_id: impl Into<String>, status: u16, reason: impl fmt::Display) -> Self {
        Self::failure(
            request_id,
            Error::client(format!(
                "Failed to deserialize response from server. Status code: {status} ({reason})"
            )),
        )
    }

    pub fn with_metadata(mut self, metadata: Map) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn serialize(&self) -> serde_json::Result<Bytes> {
        crate::encode(self)
    }

    pub fn deserialize(json: &[u8]) -> Result<Self, DecodeError> {
        let response: Self = crate::decode(json)?;

        if response.success != response.error.is_none() {
            return Err(DecodeError::Inconsistent {
                success: response.success,
            });
        }

        Ok(response)
    }

    /// Splits the response into its output or its application error.
    pub fn into_result(self) -> Result<Option<Value>, Error> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.output),
        }
    }
}
