use crate::{Host, Method, Reply};

use http::StatusCode;
use http::header::{self, HeaderValue};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper_util::rt;
use hyper_util::server::conn::auto;
use tokio::net;
use tokio::task;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

impl Host {
    /// Binds the host to an address without serving yet.
    pub async fn bind(self, address: impl net::ToSocketAddrs) -> io::Result<Listener> {
        Ok(Listener {
            listener: net::TcpListener::bind(address).await?,
            host: Arc::new(self),
        })
    }

    /// Serves the host on an address until the listener fails.
    pub async fn serve(self, address: impl net::ToSocketAddrs) -> io::Result<()> {
        self.bind(address).await?.run().await
    }
}

/// A [`Host`] bound to a TCP socket.
#[derive(Debug)]
pub struct Listener {
    listener: net::TcpListener,
    host: Arc<Host>,
}

impl Listener {
    pub fn local_address(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, serving each one in its own task.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let stream = match self.listener.accept().await {
                Ok((stream, _address)) => rt::TokioIo::new(stream),
                Err(error) => {
                    log::error!("{error}");

                    return Err(error);
                }
            };

            let host = self.host.clone();

            drop(task::spawn(async move {
                let service = service_fn(|request| serve(request, host.clone()));

                if let Err(error) = auto::Builder::new(rt::TokioExecutor::new())
                    .serve_connection(stream, service)
                    .await
                {
                    log::error!("{error}");
                }
            }));
        }
    }
}

async fn serve(request: hyper::Request<Incoming>, host: Arc<Host>) -> Result<Response, hyper::Error> {
    let method = match request.method() {
        &http::Method::GET => Method::Get,
        &http::Method::POST => Method::Post,
        _ => Method::Other,
    };

    let path = request.uri().path().to_owned();
    let body = request.into_body().collect().await?.to_bytes();

    Ok(respond(host.handle(method, &path, &body).await))
}

fn respond(reply: Reply) -> Response {
    let mut response = match reply.body {
        Some(bytes) => {
            let mut response =
                Response::new(Full::new(bytes).map_err(|never| match never {}).boxed());

            let _ = response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );

            response
        }
        None => Response::new(Empty::<Bytes>::new().map_err(|never| match never {}).boxed()),
    };

    *response.status_mut() =
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    response
}

type Response = hyper::Response<BoxBody<Bytes, hyper::Error>>;
