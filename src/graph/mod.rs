use serde::Serialize;
use crate::dsl::Position;

pub mod translate;

pub use translate::{translate, translate_document};

pub const INVALID_WORKFLOW: &str = "Invalid workflow data";
pub const NO_NODES: &str = "No nodes available in the workflow";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderNode {
    pub id: String,
    pub position: Position,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub output_port: usize,
    pub animated: bool,
}

/// Render-ready graph derived from a workflow payload. Has no identity of its own.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges with a source or target that is not a rendered node.
    pub fn dangling_edges(&self) -> Vec<&RenderEdge> {
        self.edges.iter()
            .filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none())
            .collect()
    }
}

/// The three mutually exclusive things a viewer can show.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewOutcome {
    Graph(RenderGraph),
    Empty(String),
    Error(String),
}
