// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed set of shader node operations.
//!
//! Each [`NodeKind`] declares its ports and how it turns already-compiled
//! input expressions into a GLSL expression. Traversal, sharing and type
//! conversion of inputs are handled by the compiler in `evaluation`.

mod constants;
pub(crate) mod custom;
mod inputs;
mod logic;
mod math;
mod matrices;
mod output;
mod parameters;
pub(crate) mod signature;
mod surface;
mod textures;
mod trigonometry;
mod vectors;

pub use constants::Constant;
pub use inputs::{InputQuery, TimeQuery};
pub use math::MathOp;
pub use matrices::MatrixOp;
pub use parameters::Parameter;
pub use surface::SurfaceOp;
pub use textures::TextureNode;
pub use trigonometry::TrigOp;
pub use vectors::VectorOp;

use crate::evaluation::{StagePass, Value};
use crate::node::{Node, NodeCategory};
use crate::port::{Port, PortType};
use serde::{Deserialize, Serialize};

/// A compiled input handed to a node's emission rule
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Arg {
    /// Expression, already converted to the port's declared type
    pub expr: String,
    /// Type of `expr`
    pub ty: PortType,
    /// Whether the value came from a link rather than a default
    pub connected: bool,
}

impl Arg {
    pub(crate) fn new(expr: impl Into<String>, ty: PortType, connected: bool) -> Self {
        Self {
            expr: expr.into(),
            ty,
            connected,
        }
    }
}

/// Expression produced by a node, before the sharing decision
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Emitted {
    pub expr: String,
    pub ty: PortType,
}

impl Emitted {
    pub(crate) fn new(expr: impl Into<String>, ty: PortType) -> Self {
        Self {
            expr: expr.into(),
            ty,
        }
    }
}

/// Whether a node's value is stored in a local
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sharing {
    /// Inline with exactly one outgoing link, otherwise a local
    Auto,
    /// Always a local
    Local,
    /// Always inline
    Inline,
}

/// Operation performed by a node, with its authored parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Material output; its inputs are the material channels
    Output,
    /// Literal constant
    Constant(Constant),
    /// Built-in shader input
    Input(InputQuery),
    /// Texture sampling
    Texture(TextureNode),
    /// Material parameter
    Parameter(Parameter),
    /// Arithmetic or intrinsic function
    Math(MathOp),
    /// Trigonometric function
    Trigonometry(TrigOp),
    /// Vector operation
    Vector(VectorOp),
    /// Matrix operation
    Matrix(MatrixOp),
    /// Surface helper
    Surface(SurfaceOp),
    /// Branch on the comparison of A and B
    If,
    /// Call of a user-defined function
    Custom {
        /// Function name in the [`FunctionLibrary`](crate::functions::FunctionLibrary)
        function: String,
    },
}

impl NodeKind {
    /// Stable type identifier used by the registry
    pub fn type_id(&self) -> String {
        match self {
            Self::Output => "MaterialOutput".to_string(),
            Self::Constant(c) => c.type_id().to_string(),
            Self::Input(q) => q.type_id().to_string(),
            Self::Texture(t) => t.type_id().to_string(),
            Self::Parameter(p) => p.type_id().to_string(),
            Self::Math(op) => op.type_id().to_string(),
            Self::Trigonometry(op) => op.type_id().to_string(),
            Self::Vector(op) => op.type_id().to_string(),
            Self::Matrix(op) => op.type_id().to_string(),
            Self::Surface(op) => op.type_id().to_string(),
            Self::If => "If".to_string(),
            Self::Custom { function } => function.clone(),
        }
    }

    /// Default display name
    pub fn display_name(&self) -> String {
        match self {
            Self::Output => "Material Output".to_string(),
            Self::Constant(c) => c.display_name().to_string(),
            Self::Parameter(p) => p.name().to_string(),
            other => other.type_id(),
        }
    }

    /// Category shown in node menus
    pub fn category(&self) -> NodeCategory {
        match self {
            Self::Output => NodeCategory::Output,
            Self::Constant(_) => NodeCategory::Constant,
            Self::Input(_) => NodeCategory::Input,
            Self::Texture(_) => NodeCategory::Texture,
            Self::Parameter(_) => NodeCategory::Parameter,
            Self::Math(_) => NodeCategory::Math,
            Self::Trigonometry(_) => NodeCategory::Trigonometry,
            Self::Vector(_) => NodeCategory::Vector,
            Self::Matrix(_) => NodeCategory::Matrix,
            Self::Surface(_) => NodeCategory::Surface,
            Self::If => NodeCategory::Logic,
            Self::Custom { .. } => NodeCategory::Custom,
        }
    }

    /// One-line description for node menus
    pub fn description(&self) -> String {
        match self {
            Self::Output => "Final material output".to_string(),
            Self::Constant(c) => format!("Constant {} value", c.display_name()),
            Self::Input(q) => q.description().to_string(),
            Self::Texture(t) => t.description().to_string(),
            Self::Parameter(_) => "Material parameter exposed as a uniform".to_string(),
            Self::Math(op) => format!("Math operation {}", op.type_id()),
            Self::Trigonometry(op) => format!("Trigonometric function {}", op.type_id()),
            Self::Vector(op) => format!("Vector operation {}", op.type_id()),
            Self::Matrix(op) => format!("Matrix operation {}", op.type_id()),
            Self::Surface(op) => op.description().to_string(),
            Self::If => "Selects A>B, A==B or A<B by comparing A with B".to_string(),
            Self::Custom { function } => format!("Calls the user function {function}"),
        }
    }

    /// Fresh input and output ports. Custom functions get their ports from the definition.
    pub fn ports(&self) -> (Vec<Port>, Vec<Port>) {
        match self {
            Self::Output => (output::material_inputs(), Vec::new()),
            Self::Constant(c) => (Vec::new(), c.outputs()),
            Self::Input(q) => (Vec::new(), q.outputs()),
            Self::Texture(t) => t.ports(),
            Self::Parameter(p) => (Vec::new(), p.outputs()),
            Self::Math(op) => op.signature().ports(),
            Self::Trigonometry(op) => op.signature().ports(),
            Self::Vector(op) => op.ports(),
            Self::Matrix(op) => op.ports(),
            Self::Surface(op) => op.ports(),
            Self::If => logic::ports(),
            Self::Custom { .. } => (Vec::new(), Vec::new()),
        }
    }

    /// Every built-in operation with default parameters, in menu order
    pub fn builtins() -> Vec<NodeKind> {
        let mut kinds = Vec::new();
        kinds.extend(Constant::defaults().into_iter().map(Self::Constant));
        kinds.extend(InputQuery::defaults().into_iter().map(Self::Input));
        kinds.extend(Parameter::defaults().into_iter().map(Self::Parameter));
        kinds.extend(TextureNode::defaults().into_iter().map(Self::Texture));
        kinds.extend(MathOp::ALL.into_iter().map(Self::Math));
        kinds.extend(TrigOp::ALL.into_iter().map(Self::Trigonometry));
        kinds.extend(VectorOp::defaults().into_iter().map(Self::Vector));
        kinds.extend(MatrixOp::ALL.into_iter().map(Self::Matrix));
        kinds.extend(SurfaceOp::defaults().into_iter().map(Self::Surface));
        kinds.push(Self::If);
        kinds
    }

    pub(crate) fn sharing(&self) -> Sharing {
        match self {
            Self::If => Sharing::Local,
            Self::Texture(TextureNode::Object { .. }) => Sharing::Inline,
            _ => Sharing::Auto,
        }
    }

    pub(crate) fn emit(&self, cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
        match self {
            Self::Output => None,
            Self::Constant(c) => Some(c.emit()),
            Self::Input(q) => Some(q.emit()),
            Self::Texture(t) => t.emit(cx, node, args),
            Self::Parameter(p) => p.emit(cx, node),
            Self::Math(op) => op.emit(cx, node, args),
            Self::Trigonometry(op) => op.signature().emit(cx, node, args),
            Self::Vector(op) => op.emit(cx, node, args),
            Self::Matrix(op) => op.emit(cx, args),
            Self::Surface(op) => op.emit(args),
            Self::If => logic::emit(cx, node, args),
            Self::Custom { function } => custom::emit(cx, node, function, args),
        }
    }

    /// Value seen through output port `output`.
    ///
    /// Channel outputs select one component of the node's shared value.
    pub(crate) fn project(&self, value: &Value, output: usize) -> Value {
        let channel = match self {
            Self::Texture(TextureNode::Object { .. }) => None,
            Self::Texture(_)
            | Self::Input(InputQuery::ScreenSize | InputQuery::ScreenPosition { .. }) => {
                output.checked_sub(1)
            }
            Self::Vector(VectorOp::Split) => Some(output),
            _ => None,
        };

        match channel.and_then(|c| [".x", ".y", ".z", ".w"].get(c)) {
            Some(swizzle) => Value::inline(format!("{}{}", value.handle, swizzle), PortType::Float),
            None => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_type_ids_are_unique() {
        let kinds = NodeKind::builtins();
        let mut ids: Vec<String> = kinds.iter().map(NodeKind::type_id).collect();
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_channel_projection() {
        let kind = NodeKind::Texture(TextureNode::Sample {
            path: "brick.png".to_string(),
        });
        let value = Value::inline("texture(texture0, _uv0)", PortType::Vector4);

        assert_eq!(kind.project(&value, 0), value);
        let green = kind.project(&value, 2);
        assert_eq!(green.handle.to_string(), "texture(texture0, _uv0).y");
        assert_eq!(green.ty, PortType::Float);
    }
}
