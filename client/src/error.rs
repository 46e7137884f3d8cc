use crate::protocol::{DecodeError, Invalid};

use std::io;

/// Everything that can go wrong before a [`Response`](crate::protocol::Response)
/// is in hand.
///
/// Application failures reported by a capability server are not errors here:
/// they come back as a `Response` with `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    InvalidArgument(#[from] Invalid),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No reply was received.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("undecodable body: {0}")]
    Decode(#[from] DecodeError),

    #[error("could not encode body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("operation was cancelled")]
    Cancelled,
}

impl Error {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
