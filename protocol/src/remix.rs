//! Composition of capabilities from several servers into one.
//!
//! A remix is a [`Server`](crate::Server) built by the registry out of
//! capabilities owned by other servers. It holds no behavior of its own: the
//! registry resolves every remixed capability back to its source whenever the
//! remix is fetched or invoked. Clients only describe which capabilities go
//! in and then treat the resulting server like any other.
use crate::{CapabilityMatch, CapabilityRef, Invalid};

use serde::{Deserialize, Serialize};

/// The metadata key the registry sets on composed servers.
pub const MARKER: &str = "is_remix";

/// The body of a remix creation.
///
/// Duplicates are kept as given and order carries no meaning; the registry
/// deduplicates and orders the result as it sees fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remix {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<CapabilityRef>,
}

impl Remix {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn capability(mut self, reference: impl Into<CapabilityRef>) -> Self {
        self.capabilities.push(reference.into());
        self
    }

    pub fn capabilities<R: Into<CapabilityRef>>(
        mut self,
        references: impl IntoIterator<Item = R>,
    ) -> Self {
        self.capabilities
            .extend(references.into_iter().map(Into::into));
        self
    }

    /// Adds the capabilities of a set of search hits.
    ///
    /// Fails if a hit belongs to a server without an id, since it could not
    /// be addressed by the registry.
    pub fn matches<'a>(
        mut self,
        matches: impl IntoIterator<Item = &'a CapabilityMatch>,
    ) -> Result<Self, Invalid> {
        for hit in matches {
            let key = hit
                .key()
                .ok_or(Invalid::new("capabilities", "search hit has no server id"))?;

            self.capabilities.push(key);
        }

        Ok(self)
    }

    /// Checks the rules the registry enforces on every remix.
    pub fn validate(&self) -> Result<(), Invalid> {
        if self.name.is_empty() {
            return Err(Invalid::empty("name"));
        }

        if self.capabilities.is_empty() {
            return Err(Invalid::new(
                "capabilities",
                "at least one capability must be included",
            ));
        }

        if self
            .capabilities
            .iter()
            .any(|reference| reference.server_id.is_empty() || reference.capability_id.is_empty())
        {
            return Err(Invalid::new(
                "capabilities",
                "server and capability ids must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Capability, Server};

    use serde_json::json;

    #[test]
    fn it_builds_the_registry_body() {
        let remix = Remix::new("Suite", "desc").capabilities([("s1", "c1"), ("s2", "c2")]);

        assert_eq!(
            serde_json::to_value(&remix).unwrap(),
            json!({
                "name": "Suite",
                "description": "desc",
                "capabilities": [
                    { "serverId": "s1", "capabilityId": "c1" },
                    { "serverId": "s2", "capabilityId": "c2" }
                ]
            })
        );
    }

    #[test]
    fn it_keeps_duplicates() {
        let remix = Remix::new("Twice", "")
            .capability(("s1", "c1"))
            .capability(("s1", "c1"));

        assert_eq!(remix.capabilities.len(), 2);
        assert_eq!(remix.validate(), Ok(()));
    }

    #[test]
    fn it_requires_a_name_and_a_capability() {
        assert_eq!(
            Remix::new("", "").capability(("s1", "c1")).validate(),
            Err(Invalid::empty("name"))
        );

        assert_eq!(
            Remix::new("Empty", "").validate().map_err(|error| error.name),
            Err("capabilities")
        );

        assert!(Remix::new("Half", "").capability(("", "c1")).validate().is_err());
    }

    #[test]
    fn it_collects_search_hits() {
        let mut server = Server::new("Lingua", "https://lingua.example.com");
        server.id = Some("server-7".to_owned());

        let hit = CapabilityMatch {
            capability: Capability::new("translate", "Translate"),
            server,
        };

        let remix = Remix::new("Language", "").matches([&hit]).unwrap();

        assert_eq!(
            remix.capabilities,
            [CapabilityRef::new("server-7", "translate")]
        );

        let orphan = CapabilityMatch {
            server: Server::new("Unlisted", "https://u.example.com"),
            ..hit
        };

        assert!(Remix::new("Language", "").matches([&orphan]).is_err());
    }
}
