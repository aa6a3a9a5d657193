use std::io::Write;
use anyhow::Result;
use serde_json::Value;
use crate::graph::{RenderGraph, ViewOutcome, translate};

pub const PLACEHOLDER: &str = "Your generated workflow will appear here.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Empty,
    Error,
}

/// The external graph rendering capability: draws nodes at their coordinates
/// joined by directed, optionally animated edges. Pan, zoom and fit-to-view
/// belong to the implementation.
pub trait RenderSurface {
    fn render_graph(&mut self, graph: &RenderGraph) -> Result<()>;
    fn render_message(&mut self, kind: MessageKind, message: &str) -> Result<()>;
}

/// Dispatches translator outcomes to a surface.
pub struct ViewerShell<S: RenderSurface> {
    surface: S,
}

impl<S: RenderSurface> ViewerShell<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn show(&mut self, outcome: &ViewOutcome) -> Result<()> {
        match outcome {
            ViewOutcome::Graph(graph) => self.surface.render_graph(graph),
            ViewOutcome::Empty(message) => self.surface.render_message(MessageKind::Empty, message),
            ViewOutcome::Error(message) => self.surface.render_message(MessageKind::Error, message),
        }
    }

    /// Translates `payload` and shows the result; `None` means nothing was generated yet.
    pub fn present(&mut self, payload: Option<&Value>) -> Result<ViewOutcome> {
        let outcome = match payload {
            Some(payload) => translate(payload),
            None => ViewOutcome::Empty(PLACEHOLDER.to_string()),
        };
        self.show(&outcome)?;
        Ok(outcome)
    }
}

/// Plain-text surface for terminals and logs.
pub struct TextSurface<W: Write> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    fn render_graph(&mut self, graph: &RenderGraph) -> Result<()> {
        writeln!(self.out, "Workflow graph: {} nodes, {} edges", graph.nodes.len(), graph.edges.len())?;
        for node in &graph.nodes {
            writeln!(self.out, "  [{}] at ({}, {})", node.label, node.position.x, node.position.y)?;
        }
        for edge in &graph.edges {
            let dangling = graph.node(&edge.source).is_none() || graph.node(&edge.target).is_none();
            writeln!(
                self.out,
                "  {} -> {} (port {}){}{}",
                edge.source,
                edge.target,
                edge.output_port,
                if edge.animated { " ~" } else { "" },
                if dangling { " (dangling)" } else { "" },
            )?;
        }
        Ok(())
    }

    fn render_message(&mut self, kind: MessageKind, message: &str) -> Result<()> {
        match kind {
            MessageKind::Empty => writeln!(self.out, "{}", message)?,
            MessageKind::Error => writeln!(self.out, "Error: {}", message)?,
        }
        Ok(())
    }
}
