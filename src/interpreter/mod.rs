use std::fmt::Debug;
use std::sync::Arc;
use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use crate::client::NodeCatalogEntry;
use crate::dsl::{ConnectionTarget, Position, WorkflowDocument, WorkflowNode};

pub mod rules;

pub const ENTRY_NODE_NAME: &str = "Start";
pub const ENTRY_NODE_TYPE: &str = "n8n-nodes-base.start";
pub const ENTRY_POSITION: Position = Position { x: 100.0, y: 300.0 };

const APPENDED_X: f64 = 300.0;
const APPENDED_Y: f64 = 300.0;
const APPENDED_SPACING: f64 = 150.0;

/// Node a matching rule appends to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFragment {
    pub name: String,
    pub kind: String,
    pub type_version: u32,
    pub parameters: Map<String, Value>,
}

/// One entry of the intent registry.
pub trait IntentRule: Send + Sync + Debug {
    fn name(&self) -> &str;
    /// `prompt` is already lowercased.
    fn matches(&self, prompt: &str) -> bool;
    fn fragment(&self) -> NodeFragment;
}

/// Rule matching when any of its keywords occurs in the prompt.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    name: String,
    keywords: Vec<String>,
    fragment: NodeFragment,
}

impl KeywordRule {
    pub fn new(name: &str, keywords: &[&str], fragment: NodeFragment) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            fragment,
        }
    }
}

impl IntentRule for KeywordRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, prompt: &str) -> bool {
        self.keywords.iter().any(|k| prompt.contains(k.as_str()))
    }

    fn fragment(&self) -> NodeFragment {
        self.fragment.clone()
    }
}

/// Maps a free-text prompt to a workflow document. Pure: no I/O, deterministic.
#[derive(Debug, Default)]
pub struct PromptInterpreter {
    rules: Vec<Arc<dyn IntentRule>>,
}

impl PromptInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_rules() -> Self {
        Self { rules: rules::builtin_rules() }
    }

    /// Rules are evaluated in registration order.
    pub fn register_rule(&mut self, rule: Arc<dyn IntentRule>) -> Result<()> {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(anyhow!("Duplicate intent rule: {}", rule.name()));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn interpret(&self, prompt: &str, catalog: &[NodeCatalogEntry]) -> WorkflowDocument {
        let mut document = WorkflowDocument::new(&format!("Workflow from prompt: {}", prompt));
        document.nodes.push(WorkflowNode {
            id: None,
            name: ENTRY_NODE_NAME.to_string(),
            kind: ENTRY_NODE_TYPE.to_string(),
            type_version: 1,
            parameters: Map::new(),
            position: ENTRY_POSITION,
        });

        let lowered = prompt.to_lowercase();
        let mut appended = 0usize;

        for rule in &self.rules {
            if !rule.matches(&lowered) {
                continue;
            }
            let fragment = rule.fragment();
            if !catalog.is_empty() && !catalog.iter().any(|entry| entry.name == fragment.kind) {
                warn!(rule = rule.name(), node_type = %fragment.kind, "Node type not in catalog");
            }

            let name = document.unique_node_name(&fragment.name);
            document.nodes.push(WorkflowNode {
                id: None,
                name: name.clone(),
                kind: fragment.kind,
                type_version: fragment.type_version,
                parameters: fragment.parameters,
                position: Position::new(APPENDED_X, APPENDED_Y + APPENDED_SPACING * appended as f64),
            });
            document.connect(ENTRY_NODE_NAME, 0, ConnectionTarget::main(&name));
            appended += 1;

            debug!(rule = rule.name(), node = %name, "Intent rule matched");
        }

        document
    }
}
