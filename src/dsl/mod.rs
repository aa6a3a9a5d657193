pub mod builder;
pub mod loader;

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

/// Connection group used by the engine for ordinary data flow.
pub const MAIN_CONNECTION: &str = "main";

/// Workflow document exchanged with the automation engine.
///
/// Never mutated after it has been published; a new attempt produces a new document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    /// Server-assigned, absent on documents that were never submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    /// Sparse adjacency: a missing key means no outgoing connections.
    #[serde(default)]
    pub connections: BTreeMap<String, NodeConnections>,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default)]
    pub tags: Vec<Value>,
    /// Any other field the server adds to its canonical copy (timestamps, version ids).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_version: u32,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub position: Position,
}

/// Canvas coordinates, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

/// Outgoing connections of one node, one inner list per output port.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeConnections {
    #[serde(default)]
    pub main: Vec<Vec<ConnectionTarget>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub port_type: String,
    pub index: u32,
}

impl ConnectionTarget {
    pub fn main(node: &str) -> Self {
        Self {
            node: node.to_string(),
            port_type: MAIN_CONNECTION.to_string(),
            index: 0,
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl WorkflowDocument {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            nodes: Vec::new(),
            connections: BTreeMap::new(),
            active: false,
            settings: empty_object(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn node(&self, name: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.node(name).is_some()
    }

    /// Wires `target` onto the given output port of `source`, creating the
    /// intermediate ports if the source has fewer outputs so far.
    pub fn connect(&mut self, source: &str, output_port: usize, target: ConnectionTarget) {
        let ports = &mut self.connections.entry(source.to_string()).or_default().main;
        if ports.len() <= output_port {
            ports.resize_with(output_port + 1, Vec::new);
        }
        ports[output_port].push(target);
    }

    /// Total number of connection targets across every port of every source.
    pub fn connection_count(&self) -> usize {
        self.connections
            .values()
            .flat_map(|c| c.main.iter())
            .map(|port| port.len())
            .sum()
    }

    /// Node names referenced by `connections` (as source or target) that are not in `nodes`.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for (source, conns) in &self.connections {
            if !self.has_node(source) && !missing.contains(source) {
                missing.push(source.clone());
            }
            for target in conns.main.iter().flatten() {
                if !self.has_node(&target.node) && !missing.contains(&target.node) {
                    missing.push(target.node.clone());
                }
            }
        }
        missing
    }

    /// Returns `base` if free, otherwise `base1`, `base2`, ... as the engine's editor does.
    pub fn unique_node_name(&self, base: &str) -> String {
        if !self.has_node(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{}{}", base, i))
            .find(|candidate| !self.has_node(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
