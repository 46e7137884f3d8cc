use agora::Host;
use agora::protocol::{self, Capability, Request, Value};

use serde_json::json;
use std::io;

#[tokio::main]
pub async fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let host = Host::new()
        .capability(
            Capability::new("say-hello", "Say Hello")
                .description("Says hello to someone")
                .input_schema(json!({ "name": { "type": "string" } })),
            say_hello,
        )
        .capability(
            Capability::new("add", "Add")
                .description("Adds two integers")
                .input_schema(json!({ "a": { "type": "integer" }, "b": { "type": "integer" } })),
            add,
        );

    host.serve("127.0.0.1:8080").await
}

async fn say_hello(request: Request) -> Result<Value, protocol::Error> {
    let name = request
        .input
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| protocol::Error::invalid_input("name is required"))?;

    Ok(json!({ "greeting": format!("Hello, {name}!") }))
}

async fn add(request: Request) -> Result<Value, protocol::Error> {
    let operand = |name: &str| {
        request
            .input
            .get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| protocol::Error::invalid_input(format!("{name} must be an integer")))
    };

    Ok(json!({ "sum": operand("a")? + operand("b")? }))
}
