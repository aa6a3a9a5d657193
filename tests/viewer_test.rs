use flowgen::graph::{RenderGraph, ViewOutcome};
use flowgen::viewer::{MessageKind, PLACEHOLDER, RenderSurface, TextSurface, ViewerShell};
use serde_json::json;

/// Records what the shell asked the surface to draw.
#[derive(Default)]
struct RecordingSurface {
    graphs: Vec<RenderGraph>,
    messages: Vec<(MessageKind, String)>,
}

impl RenderSurface for RecordingSurface {
    fn render_graph(&mut self, graph: &RenderGraph) -> anyhow::Result<()> {
        self.graphs.push(graph.clone());
        Ok(())
    }

    fn render_message(&mut self, kind: MessageKind, message: &str) -> anyhow::Result<()> {
        self.messages.push((kind, message.to_string()));
        Ok(())
    }
}

#[test]
fn test_shell_dispatches_each_outcome_once() {
    let mut shell = ViewerShell::new(RecordingSurface::default());

    shell.present(Some(&json!({ "error": "quota exceeded" }))).unwrap();
    shell.present(Some(&json!({ "nodes": [] }))).unwrap();
    let outcome = shell.present(Some(&json!({ "nodes": [{ "name": "Start", "position": [100, 300] }] }))).unwrap();
    assert!(matches!(outcome, ViewOutcome::Graph(_)));

    let surface = shell.into_surface();
    assert_eq!(surface.graphs.len(), 1);
    assert_eq!(surface.messages, vec![
        (MessageKind::Error, "quota exceeded".to_string()),
        (MessageKind::Empty, "No nodes available in the workflow".to_string()),
    ]);
}

#[test]
fn test_nothing_generated_shows_placeholder() {
    let mut shell = ViewerShell::new(RecordingSurface::default());
    let outcome = shell.present(None).unwrap();
    assert_eq!(outcome, ViewOutcome::Empty(PLACEHOLDER.to_string()));
    assert!(shell.surface().graphs.is_empty());
}

#[test]
fn test_text_surface_lists_nodes_and_edges() {
    let payload = json!({
        "nodes": [
            { "name": "Start", "position": [100, 300] },
            { "name": "HTTP Request", "position": [300, 300] }
        ],
        "connections": {
            "Start": { "main": [[{ "node": "HTTP Request", "type": "main", "index": 0 }, { "node": "Ghost", "type": "main", "index": 0 }]] }
        }
    });

    let mut shell = ViewerShell::new(TextSurface::new(Vec::new()));
    shell.present(Some(&payload)).unwrap();
    let text = String::from_utf8(shell.into_surface().into_inner()).unwrap();

    assert_eq!(text, "\
Workflow graph: 2 nodes, 2 edges
  [Start] at (100, 300)
  [HTTP Request] at (300, 300)
  Start -> HTTP Request (port 0) ~
  Start -> Ghost (port 0) ~ (dangling)
");
}

#[test]
fn test_text_surface_prefixes_errors() {
    let mut shell = ViewerShell::new(TextSurface::new(Vec::new()));
    shell.present(Some(&json!({ "error": "boom" }))).unwrap();
    let text = String::from_utf8(shell.into_surface().into_inner()).unwrap();
    assert_eq!(text, "Error: boom\n");
}
