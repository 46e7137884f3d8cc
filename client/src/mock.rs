use crate::protocol::{Bytes, Request, Response, Value};
use crate::transport::{Reply, Task, Transport};

use futures::future::{self, FutureExt};
use url::Url;

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

/// An in-memory transport that records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    replies: VecDeque<Reply>,
    echo: bool,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub url: Url,
    pub body: Option<Bytes>,
}

impl Call {
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply. Replies are handed out in order.
    pub fn reply(self, status: u16, body: impl fmt::Display) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Reply::new(status, body.to_string()));

        self
    }

    /// Answers every invocation with a success that echoes its input.
    pub fn echo(self) -> Self {
        self.state.lock().unwrap().echo = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn respond(&self, method: &'static str, url: Url, body: Option<Bytes>) -> Task {
        let mut state = self.state.lock().unwrap();

        let reply = match (state.echo, &body) {
            (true, Some(body)) => Some(echo(body)),
            _ => state.replies.pop_front(),
        };

        state.calls.push(Call { method, url, body });

        future::ready(reply.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "no reply queued")
        }))
        .boxed()
    }
}

impl Transport for Mock {
    fn get(&self, url: Url) -> Task {
        self.respond("GET", url, None)
    }

    fn post(&self, url: Url, body: Bytes) -> Task {
        self.respond("POST", url, Some(body))
    }
}

fn echo(body: &Bytes) -> Reply {
    let request: Request = crate::protocol::decode(body).unwrap();
    let response = Response::success(request.request_id, Value::Object(request.input));

    Reply::new(200, response.serialize().unwrap())
}
