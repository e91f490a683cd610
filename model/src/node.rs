//! Node payloads of the schema graph.

use aggraph_core::{EdgeAttrs, TreePath};
use aggraph_graph::{DirectedGraph, GraphEdge, GraphNode, Narrow};
use aggraph_registry::MemberType;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The graph every schema is stored in.
pub type SchemaGraph = DirectedGraph<SchemaNode, EdgeAttrs>;
/// Cursor over a schema graph node.
pub type Node<'g> = GraphNode<'g, SchemaNode, EdgeAttrs>;
/// Cursor over a schema graph edge.
pub type Edge<'g> = GraphEdge<'g, SchemaNode, EdgeAttrs>;

/// Which model a root aggregate tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    WriteModel,
    ReadModel,
    Command,
    ValueObject,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::WriteModel => "write-model",
            ModelKind::ReadModel => "read-model",
            ModelKind::Command => "command",
            ModelKind::ValueObject => "value-object",
        }
    }
}

/// Input width hint for text members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextWidth {
    /// Full-width character count.
    Zenkaku(u32),
    /// Half-width character count.
    Hankaku(u32),
}

/// Presentation of an enum member in forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumPresentation {
    Combo,
    Radio,
}

/// Payload of an aggregate node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub path: TreePath,
    /// Entity name used for generated types.
    pub name: String,
    /// Human readable label.
    pub display_name: Option<String>,
    pub db_name: Option<String>,
    /// Set on root aggregates only.
    pub model: Option<ModelKind>,
    pub has_lifecycle: bool,
    pub read_only: bool,
    /// Form step number.
    pub step: Option<i64>,
    /// No own member is flagged as display name.
    pub use_key_instead_of_name: bool,
}

impl Aggregate {
    pub fn new(path: TreePath, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
            display_name: None,
            db_name: None,
            model: None,
            has_lifecycle: false,
            read_only: false,
            step: None,
            use_key_instead_of_name: false,
        }
    }

    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = Some(model);
        self
    }

    /// Label for humans, falling back to the entity name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Options of a value member, shared by declared and inherited members.
#[derive(Debug, Clone)]
pub struct MemberOptions {
    pub name: String,
    pub member_type: Arc<dyn MemberType>,
    pub display_name: Option<String>,
    pub db_name: Option<String>,
    pub is_key: bool,
    pub is_display_name: bool,
    pub is_name_like: bool,
    pub is_required: bool,
    pub invisible_in_gui: bool,
    pub read_only: bool,
    pub width: Option<TextWidth>,
    pub enum_presentation: Option<EnumPresentation>,
}

impl MemberOptions {
    pub fn new(name: impl Into<String>, member_type: Arc<dyn MemberType>) -> Self {
        Self {
            name: name.into(),
            member_type,
            display_name: None,
            db_name: None,
            is_key: false,
            is_display_name: false,
            is_name_like: false,
            is_required: false,
            invisible_in_gui: false,
            read_only: false,
            width: None,
            enum_presentation: None,
        }
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self.is_required = true;
        self
    }

    pub fn display(mut self) -> Self {
        self.is_display_name = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// Payload of a scalar member node.
#[derive(Debug, Clone)]
pub struct ScalarMember {
    pub path: TreePath,
    pub options: MemberOptions,
}

/// Node payload: the two kinds of entities a schema graph holds.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Aggregate(Aggregate),
    Scalar(ScalarMember),
}

impl SchemaNode {
    pub fn path(&self) -> &TreePath {
        match self {
            SchemaNode::Aggregate(a) => &a.path,
            SchemaNode::Scalar(s) => &s.path,
        }
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaNode::Aggregate(a) => write!(f, "{}", a.name),
            SchemaNode::Scalar(s) => write!(f, "{}: {}", s.options.name, s.options.member_type.name()),
        }
    }
}

impl Narrow<Aggregate> for SchemaNode {
    const KIND: &'static str = "aggregate";

    fn narrow(&self) -> Option<&Aggregate> {
        match self {
            SchemaNode::Aggregate(a) => Some(a),
            SchemaNode::Scalar(_) => None,
        }
    }
}

impl Narrow<ScalarMember> for SchemaNode {
    const KIND: &'static str = "scalar member";

    fn narrow(&self) -> Option<&ScalarMember> {
        match self {
            SchemaNode::Scalar(s) => Some(s),
            SchemaNode::Aggregate(_) => None,
        }
    }
}
