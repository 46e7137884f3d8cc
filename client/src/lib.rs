//! Clients for capability servers and for the registry that indexes them.
//!
//! [`Client`] talks to a single capability server: it discovers what the
//! server offers and invokes it. [`Registry`] talks to the marketplace
//! registry: search, submission, ratings, remixes and functionality requests.
//! Both are thin, stateless wrappers around a [`Transport`]; every operation
//! is exactly one round trip and nothing is retried or cached.
pub use agora_protocol as protocol;

pub mod registry;
pub mod transport;

mod endpoint;
mod error;
#[cfg(feature = "http")]
mod http;

pub use error::{Error, Result};
#[cfg(feature = "http")]
pub use http::Http;
pub use registry::Registry;
pub use transport::Transport;

use crate::endpoint::{endpoint, require};
use crate::protocol::{Capability, Request, Response};
use crate::transport::Reply;

use futures::future::{self, Either};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use std::fmt;
use std::pin::pin;
use std::sync::Arc;

/// A client for capability servers.
///
/// The client is not bound to a server; every call names the server URL it
/// targets, so one client can drive any number of servers concurrently.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport + Send + Sync>,
}

impl Client {
    pub fn new(transport: impl Transport + Send + Sync + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    #[cfg(feature = "http")]
    pub fn http() -> Self {
        Self::new(Http::new())
    }

    /// Lists the capabilities a server advertises.
    pub async fn discover(&self, server_url: &str) -> Result<Vec<Capability>> {
        require("server_url", server_url)?;

        fetch(&*self.transport, endpoint(server_url, &["capabilities"])?).await
    }

    /// Fetches the description of a single capability.
    pub async fn describe(&self, server_url: &str, capability_id: &str) -> Result<Capability> {
        require("server_url", server_url)?;
        require("capability_id", capability_id)?;

        fetch(
            &*self.transport,
            endpoint(server_url, &["capabilities", capability_id])?,
        )
        .await
    }

    /// Invokes a capability.
    ///
    /// A request without a `request_id` is assigned a fresh one. Once the
    /// server replies, the result is always a [`Response`] correlated with
    /// that id, even if the reply was unusable: such replies turn into a
    /// `client_error` failure. Only a missing reply is an `Err`.
    pub async fn invoke(&self, server_url: &str, mut request: Request) -> Result<Response> {
        require("server_url", server_url)?;
        require("capability_id", &request.capability_id)?;

        if request.request_id.is_empty() {
            request.request_id = Uuid::new_v4().simple().to_string();
        }

        let url = endpoint(server_url, &["invoke", &request.capability_id])?;
        let body = request.serialize()?;

        log::debug!("POST {url} ({id})", id = request.request_id);

        let reply = self.transport.post(url, body).await?;

        Ok(correlate(&request.request_id, reply))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// Runs an operation until it completes or the token is cancelled.
///
/// A cancelled operation is dropped: the wait is abandoned and nothing is
/// sent again. If the token is already cancelled, the operation never starts.
pub async fn cancellable<T>(
    token: &CancellationToken,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    let cancelled = pin!(token.cancelled());
    let operation = pin!(operation);

    match future::select(cancelled, operation).await {
        Either::Left(((), _)) => Err(Error::Cancelled),
        Either::Right((result, _)) => result,
    }
}

fn correlate(request_id: &str, reply: Reply) -> Response {
    let mut response = match Response::deserialize(&reply.body) {
        Ok(response) => response,
        Err(error) => {
            log::warn!("unusable reply to {request_id} (status {}): {error}", reply.status);

            return Response::synthesize(request_id, reply.status, error);
        }
    };

    if response.request_id.is_empty() {
        response.request_id = request_id.to_owned();
    } else if response.request_id != request_id {
        log::warn!(
            "reply to {request_id} is correlated with {other}",
            other = response.request_id
        );

        return Response::failure(
            request_id,
            protocol::Error::client(format!(
                "Response correlation mismatch: sent {request_id}, received {other}",
                other = response.request_id
            )),
        );
    }

    response
}

async fn fetch<T: DeserializeOwned>(transport: &(dyn Transport + Send + Sync), url: Url) -> Result<T> {
    log::debug!("GET {url}");

    expect(transport.get(url).await?)
}

async fn submit<T: DeserializeOwned>(
    transport: &(dyn Transport + Send + Sync),
    url: Url,
    body: &impl Serialize,
) -> Result<T> {
    log::debug!("POST {url}");

    expect(transport.post(url, protocol::encode(body)?).await?)
}

fn expect<T: DeserializeOwned>(reply: Reply) -> Result<T> {
    if !reply.is_success() {
        return Err(Error::Status {
            status: reply.status,
            body: String::from_utf8_lossy(&reply.body).into_owned(),
        });
    }

    Ok(protocol::decode(&reply.body)?)
}

#[cfg(test)]
mod mock;
