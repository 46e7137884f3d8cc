//! Discover, invoke, rate and remix capabilities on the Agora marketplace.
pub use agora_protocol as protocol;

#[cfg(feature = "client")]
pub use agora_client as client;

#[cfg(feature = "server")]
pub use agora_server as server;

#[cfg(feature = "client")]
pub use client::{Client, Registry, cancellable};

#[cfg(feature = "server")]
pub use server::Host;
