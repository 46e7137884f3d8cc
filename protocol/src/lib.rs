//! Wire types of the Agora capability protocol.
//!
//! Every type in this crate maps 1:1 to a JSON document exchanged with a
//! capability server or with the registry. Decoding is permissive: unknown
//! fields are ignored and missing optional fields become `None` or empty.
pub mod capability;
pub mod registry;
pub mod remix;
pub mod request;
pub mod response;
pub mod server;

mod error;

pub use capability::Capability;
pub use error::{DecodeError, Error, Invalid};
pub use registry::{CapabilityMatch, CapabilityRef, FunctionalityRequest};
pub use remix::Remix;
pub use request::Request;
pub use response::Response;
pub use server::{Rating, Review, Server};

pub use bytes::Bytes;
pub use serde_json::Value;

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};

/// An opaque JSON object, used for metadata, inputs and credentials.
pub type Map = serde_json::Map<String, Value>;

/// Decodes any protocol payload from raw JSON.
pub fn decode<T: DeserializeOwned>(json: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(json).map_err(DecodeError::Json)
}

/// Encodes any protocol payload into raw JSON.
pub fn encode<T: serde::Serialize>(value: &T) -> serde_json::Result<Bytes> {
    serde_json::to_vec(value).map(Bytes::from_owner)
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
