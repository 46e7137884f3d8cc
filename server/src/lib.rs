//! A host for capability servers.
//!
//! [`Host`] owns the protocol side of a capability server: it advertises the
//! registered capabilities, decodes invocations, routes them to their handler
//! and wraps whatever comes back in a correlated
//! [`Response`](protocol::Response). What a capability actually does is up to
//! its handler.
pub use agora_protocol as protocol;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::Listener;

use crate::protocol::{Bytes, Capability, Request, Response, Value};

use futures::future::{BoxFuture, FutureExt};

use std::fmt;

type Handler =
    Box<dyn Fn(Request) -> BoxFuture<'static, Result<Value, protocol::Error>> + Send + Sync>;

/// A set of capabilities served under one base URL.
#[derive(Default)]
pub struct Host {
    capabilities: Vec<(Capability, Handler)>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability. A later registration with the same id
    /// replaces the earlier one.
    pub fn capability<F>(
        mut self,
        descriptor: Capability,
        handler: impl Fn(Request) -> F + Send + Sync + 'static,
    ) -> Self
    where
        F: Future<Output = Result<Value, protocol::Error>> + Send + 'static,
    {
        self.capabilities.retain(|(capability, _)| capability.id != descriptor.id);
        self.capabilities
            .push((descriptor, Box::new(move |request| handler(request).boxed())));

        self
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter().map(|(capability, _)| capability)
    }

    fn find(&self, id: &str) -> Option<&(Capability, Handler)> {
        self.capabilities
            .iter()
            .find(|(capability, _)| capability.id == id)
    }

    /// Answers a single protocol call.
    ///
    /// `path` is relative to the host base and may still be percent-encoded.
    pub async fn handle(&self, method: Method, path: &str, body: &[u8]) -> Reply {
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode_segment)
            .collect();

        match (method, segments.as_slice()) {
            (Method::Get, [capabilities]) if capabilities == "capabilities" => {
                Reply::json(200, &self.capabilities().collect::<Vec<_>>())
            }
            (Method::Get, [capabilities, id]) if capabilities == "capabilities" => {
                match self.find(id) {
                    Some((capability, _)) => Reply::json(200, capability),
                    None => Reply::json(404, &protocol::Error::capability_not_found(id)),
                }
            }
            (Method::Post, [invoke, id]) if invoke == "invoke" => self.invoke(id, body).await,
            (_, [capabilities, ..]) if capabilities == "capabilities" => Reply::empty(405),
            (_, [invoke, _]) if invoke == "invoke" => Reply::empty(405),
            _ => Reply::empty(404),
        }
    }

    async fn invoke(&self, id: &str, body: &[u8]) -> Reply {
        let mut request: Request = match protocol::decode(body) {
            Ok(request) => request,
            Err(error) => {
                log::debug!("rejected invocation of {id}: {error}");

                return Reply::response(
                    400,
                    &Response::failure("", protocol::Error::invalid_input(error.to_string())),
                );
            }
        };

        if request.capability_id.is_empty() {
            request.capability_id = id.to_owned();
        }

        let Some((_, handler)) = self.find(id) else {
            return Reply::response(
                404,
                &Response::failure(request.request_id, protocol::Error::capability_not_found(id)),
            );
        };

        let request_id = request.request_id.clone();

        log::debug!("invoking {id} ({request_id})");

        let response = match handler(request).await {
            Ok(output) => Response::success(request_id, output),
            Err(error) => Response::failure(request_id, error),
        };

        Reply::response(200, &response)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field(
                "capabilities",
                &self.capabilities().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

/// The status and JSON body answering a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Bytes>,
}

impl Reply {
    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn json(status: u16, value: &impl serde::Serialize) -> Self {
        match protocol::encode(value) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(error) => {
                log::error!("{error}");

                Self::empty(500)
            }
        }
    }

    fn response(status: u16, response: &Response) -> Self {
        Self::json(status, response)
    }
}

fn decode_segment(segment: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    async fn generate(request: Request) -> Result<Value, protocol::Error> {
        let prompt = request
            .input
            .get("prompt")
            .and_then(Value::as_str)
            .ok_or_else(|| protocol::Error::invalid_input("prompt is required"))?;

        Ok(json!({ "image_url": format!("https://img.example.com/{}.jpg", prompt.len()) }))
    }

    async fn summarize(_request: Request) -> Result<Value, protocol::Error> {
        Ok(json!({ "summary": "..." }))
    }

    fn host() -> Host {
        Host::new()
            .capability(
                Capability::new("image-generation", "Image Generation")
                    .input_schema(json!({ "prompt": { "type": "string" } })),
                generate,
            )
            .capability(
                Capability::new("text summarization", "Text Summarization"),
                summarize,
            )
    }

    fn decode<T: serde::de::DeserializeOwned>(reply: &Reply) -> T {
        protocol::decode(reply.body.as_ref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn it_lists_capabilities_in_registration_order() {
        let reply = host().handle(Method::Get, "/capabilities", b"").await;
        let capabilities: Vec<Capability> = decode(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(
            capabilities.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            ["image-generation", "text summarization"]
        );
    }

    #[tokio::test]
    async fn it_describes_encoded_ids() {
        let host = host();

        let found = host
            .handle(Method::Get, "/capabilities/text%20summarization", b"")
            .await;
        let missing = host.handle(Method::Get, "/capabilities/ocr", b"").await;

        assert_eq!(decode::<Capability>(&found).name, "Text Summarization");
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn it_keeps_malformed_escapes_literal() {
        let host = Host::new().capability(Capability::new("%+1", "Literal"), summarize);

        let found = host.handle(Method::Get, "/capabilities/%+1", b"").await;

        assert_eq!(found.status, 200);
        assert_eq!(decode::<Capability>(&found).id, "%+1");
    }

    #[tokio::test]
    async fn it_echoes_request_ids() {
        let body = Request::new("image-generation")
            .id("req-42")
            .input(json!({ "prompt": "sunset" }).as_object().cloned().unwrap())
            .serialize()
            .unwrap();

        let reply = host().handle(Method::Post, "/invoke/image-generation", &body).await;
        let response: Response = decode(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(response.request_id, "req-42");
        assert_eq!(
            response.output,
            Some(json!({ "image_url": "https://img.example.com/6.jpg" }))
        );
    }

    #[tokio::test]
    async fn it_reports_handler_failures_in_band() {
        let body = Request::new("image-generation").id("req-1").serialize().unwrap();

        let reply = host().handle(Method::Post, "/invoke/image-generation", &body).await;
        let response: Response = decode(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(
            response.into_result(),
            Err(protocol::Error::invalid_input("prompt is required"))
        );
    }

    #[tokio::test]
    async fn it_rejects_bad_invocations() {
        let host = host();

        let garbage = host.handle(Method::Post, "/invoke/image-generation", b"{").await;
        let unknown = host
            .handle(
                Method::Post,
                "/invoke/ocr",
                &Request::new("ocr").id("req-9").serialize().unwrap(),
            )
            .await;

        assert_eq!(garbage.status, 400);
        assert_eq!(
            decode::<Response>(&garbage).error.map(|error| error.code),
            Some(protocol::Error::INVALID_INPUT.to_owned())
        );

        assert_eq!(unknown.status, 404);
        assert_eq!(decode::<Response>(&unknown).request_id, "req-9");
    }

    #[tokio::test]
    async fn it_only_routes_protocol_paths() {
        let host = host();

        assert_eq!(host.handle(Method::Get, "/", b"").await.status, 404);
        assert_eq!(host.handle(Method::Post, "/capabilities", b"").await.status, 405);
        assert_eq!(host.handle(Method::Get, "/invoke/ocr", b"").await.status, 405);
    }

    #[test]
    fn it_replaces_duplicate_registrations() {
        let host = host().capability(
            Capability::new("image-generation", "Image Generation v2"),
            summarize,
        );

        assert_eq!(
            host.capabilities().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            ["Text Summarization", "Image Generation v2"]
        );
    }

    #[test]
    fn it_decodes_percent_escapes() {
        assert_eq!(decode_segment("a%20b%2Fc"), "a b/c");
        assert_eq!(decode_segment("100%"), "100%");
        assert_eq!(decode_segment("%zz"), "%zz");
        assert_eq!(decode_segment("%+1"), "%+1");
        assert_eq!(decode_segment("caf%C3%A9"), "café");
    }
}
