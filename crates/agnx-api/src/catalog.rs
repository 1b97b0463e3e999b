//! Agent catalog seam for the listing endpoint.
//!
//! The agent registry (definition parsing, multi-tenant lookup, caching)
//! lives outside this crate. Handlers only need to enumerate what is
//! available, which is all [`AgentCatalog`] asks for.

use serde::{Deserialize, Serialize};

/// An agent as presented by the listing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Unique agent name.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Agent definition version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Read-only view over the agents known to the runtime.
pub trait AgentCatalog: Send + Sync {
    /// All agents, in a stable order.
    fn list(&self) -> Vec<AgentSummary>;
}

/// Catalog with no agents. Used until a registry is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl AgentCatalog for EmptyCatalog {
    fn list(&self) -> Vec<AgentSummary> {
        Vec::new()
    }
}
