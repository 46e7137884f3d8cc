//! The seam between the clients and the network.
use crate::protocol::Bytes;

pub use url::Url;

use futures::future::BoxFuture;

use std::io;

/// A request/reply transport.
///
/// Every call is a single round trip. An `Err` means no reply was received at
/// all; any reply, whatever its status, is returned as a [`Reply`].
pub trait Transport {
    fn get(&self, url: Url) -> Task;

    fn post(&self, url: Url, body: Bytes) -> Task;
}

pub type Task = BoxFuture<'static, io::Result<Reply>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Bytes,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
