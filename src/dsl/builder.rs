use crate::dsl::{ConnectionTarget, Position, WorkflowDocument, WorkflowNode};
use serde_json::{Map, Value};

pub struct DocumentBuilder {
    document: WorkflowDocument,
}

impl DocumentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            document: WorkflowDocument::new(name),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.document.id = Some(id.to_string());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.document.active = active;
        self
    }

    pub fn tag(mut self, tag: impl Into<Value>) -> Self {
        self.document.tags.push(tag.into());
        self
    }

    pub fn node(self, name: &str, kind: &str, type_version: u32) -> NodeBuilder {
        NodeBuilder {
            document_builder: self,
            name: name.to_string(),
            kind: kind.to_string(),
            type_version,
            parameters: Map::new(),
            position: Position::new(0.0, 0.0),
        }
    }

    /// Connects `source`'s first output port to `target`.
    pub fn connect(self, source: &str, target: &str) -> Self {
        self.connect_port(source, 0, target)
    }

    pub fn connect_port(mut self, source: &str, output_port: usize, target: &str) -> Self {
        self.document.connect(source, output_port, ConnectionTarget::main(target));
        self
    }

    pub fn build(self) -> WorkflowDocument {
        self.document
    }
}

pub struct NodeBuilder {
    document_builder: DocumentBuilder,
    name: String,
    kind: String,
    type_version: u32,
    parameters: Map<String, Value>,
    position: Position,
}

impl NodeBuilder {
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn build(mut self) -> DocumentBuilder {
        self.document_builder.document.nodes.push(WorkflowNode {
            id: None,
            name: self.name,
            kind: self.kind,
            type_version: self.type_version,
            parameters: self.parameters,
            position: self.position,
        });
        self.document_builder
    }
}
