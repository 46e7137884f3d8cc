use agora::client::registry::CapabilityQuery;
use agora::protocol::{Remix, Request};
use agora::{Client, Registry};

use serde_json::json;
use std::env;
use std::error::Error;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    // Run `cargo run --example host` first!
    let server = "http://127.0.0.1:8080";
    let client = Client::http();

    let capabilities = client.discover(server).await?;

    let hello = client
        .invoke(
            server,
            Request::new("say-hello").input(
                json!({ "name": "World" })
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            ),
        )
        .await?;

    dbg!(capabilities);
    dbg!(hello.into_result());

    if let Some(query) = env::args().nth(1) {
        let registry = Registry::http();
        let matches = registry
            .search_capabilities(&CapabilityQuery::new(query.as_str()).min_rating(4.0))
            .await?;

        let remix = Remix::new(format!("{query} remix"), "Top rated matches").matches(&matches)?;

        dbg!(registry.submit_remix(&remix).await?);
    }

    Ok(())
}
