use serde_json::{Map, Value};
use tracing::debug;
use crate::dsl::{MAIN_CONNECTION, Position, WorkflowDocument};
use crate::graph::{INVALID_WORKFLOW, NO_NODES, RenderEdge, RenderGraph, RenderNode, UNEXPECTED_ERROR, ViewOutcome};

/// Converts any JSON payload into a view outcome. Total: never fails.
///
/// Checks run in order: not an object, carries `error`, has no nodes, and
/// only then is a graph built. Malformed node or connection entries are
/// skipped; connections naming unknown nodes still produce edges.
pub fn translate(input: &Value) -> ViewOutcome {
    let Some(object) = input.as_object() else {
        return ViewOutcome::Empty(INVALID_WORKFLOW.to_string());
    };

    if let Some(error) = object.get("error") {
        let message = error.as_str().unwrap_or(UNEXPECTED_ERROR);
        return ViewOutcome::Error(message.to_string());
    }

    let nodes = match object.get("nodes").and_then(Value::as_array) {
        Some(nodes) if !nodes.is_empty() => nodes,
        _ => return ViewOutcome::Empty(NO_NODES.to_string()),
    };

    let nodes: Vec<RenderNode> = nodes.iter().filter_map(render_node).collect();
    if nodes.is_empty() {
        return ViewOutcome::Empty(NO_NODES.to_string());
    }
    let edges = object.get("connections")
        .and_then(Value::as_object)
        .map(render_edges)
        .unwrap_or_default();

    ViewOutcome::Graph(RenderGraph { nodes, edges })
}

pub fn translate_document(document: &WorkflowDocument) -> ViewOutcome {
    match serde_json::to_value(document) {
        Ok(value) => translate(&value),
        Err(_) => ViewOutcome::Empty(INVALID_WORKFLOW.to_string()),
    }
}

fn render_node(node: &Value) -> Option<RenderNode> {
    let Some(name) = node.get("name").and_then(Value::as_str) else {
        debug!(node = %node, "Skipping node without a name");
        return None;
    };
    Some(RenderNode {
        id: name.to_string(),
        position: node.get("position").map(position).unwrap_or(Position::new(0.0, 0.0)),
        label: name.to_string(),
    })
}

/// Accepts `[x, y]` or `{x, y}`; anything else lands at the origin.
fn position(value: &Value) -> Position {
    let coords = match value {
        Value::Array(items) => (items.first(), items.get(1)),
        Value::Object(map) => (map.get("x"), map.get("y")),
        _ => (None, None),
    };
    let x = coords.0.and_then(Value::as_f64).unwrap_or(0.0);
    let y = coords.1.and_then(Value::as_f64).unwrap_or(0.0);
    Position::new(x, y)
}

fn render_edges(connections: &Map<String, Value>) -> Vec<RenderEdge> {
    let mut edges = Vec::new();
    for (source, groups) in connections {
        // Either the engine's `{ "main": [[...]] }` or a bare list of ports.
        let ports = match groups {
            Value::Array(ports) => ports,
            Value::Object(map) => match map.get(MAIN_CONNECTION).and_then(Value::as_array) {
                Some(ports) => ports,
                None => continue,
            },
            _ => continue,
        };

        for (port_index, port) in ports.iter().enumerate() {
            let Some(targets) = port.as_array() else { continue };
            for target in targets {
                let Some(target) = target.get("node").and_then(Value::as_str) else { continue };
                edges.push(RenderEdge {
                    id: format!("{}-{}-{}", source, target, port_index),
                    source: source.clone(),
                    target: target.to_string(),
                    output_port: port_index,
                    animated: true,
                });
            }
        }
    }
    edges
}
