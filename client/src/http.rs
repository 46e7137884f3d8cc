use crate::protocol::Bytes;
use crate::transport::{Reply, Task, Transport};

use futures::future::FutureExt;
use reqwest::header;
use reqwest::{Client, Error, Response, Url};

use std::io;

/// A [`Transport`] over HTTP, backed by a pooled [`reqwest::Client`].
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Debug, Clone, Default)]
pub struct Http {
    client: Client,
}

impl Http {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (timeouts, TLS, proxies...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for Http {
    fn get(&self, url: Url) -> Task {
        let client = self.client.clone();

        async move {
            let response = client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(to_error)?;

            read(response).await
        }
        .boxed()
    }

    fn post(&self, url: Url, body: Bytes) -> Task {
        let client = self.client.clone();

        async move {
            let response = client
                .post(url)
                .header(header::ACCEPT, "application/json")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(to_error)?;

            read(response).await
        }
        .boxed()
    }
}

async fn read(response: Response) -> io::Result<Reply> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(to_error)?;

    Ok(Reply { status, body })
}

fn to_error(error: Error) -> io::Error {
    if error.is_builder() {
        return io::Error::new(io::ErrorKind::InvalidInput, error.to_string());
    }

    if error.is_connect() {
        return io::Error::new(io::ErrorKind::ConnectionRefused, error.to_string());
    }

    if error.is_timeout() {
        return io::Error::new(io::ErrorKind::TimedOut, error.to_string());
    }

    io::Error::other(error.to_string())
}
