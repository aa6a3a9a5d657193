use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use std::fmt::Debug;
use crate::dsl::WorkflowDocument;
use crate::error::Result;

pub mod http;

/// One entry of the remote engine's node type registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Boundary to the remote automation API.
///
/// Implementations must not cache or retry; both belong to the orchestrator.
#[async_trait]
pub trait AutomationApi: Send + Sync + Debug {
    async fn list_nodes(&self) -> Result<Vec<NodeCatalogEntry>>;

    /// Returns the server's canonical copy, which supersedes `document`.
    async fn create_workflow(&self, document: &WorkflowDocument) -> Result<WorkflowDocument>;
}

/// Case-insensitive search over display name and description.
pub fn filter_catalog<'a>(entries: &'a [NodeCatalogEntry], query: &str) -> Vec<&'a NodeCatalogEntry> {
    let needle = query.trim().to_lowercase();
    entries.iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.display_name.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle)
        })
        .collect()
}
