// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances of the shader graph.

use crate::catalog::NodeKind;
use crate::functions::FunctionDefinition;
use crate::port::{Port, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Literal constants
    Constant,
    /// Built-in shader inputs (camera, coordinates, time)
    Input,
    /// Material parameters exposed as uniforms
    Parameter,
    /// Texture sampling
    Texture,
    /// Arithmetic and intrinsic functions
    Math,
    /// Trigonometric functions
    Trigonometry,
    /// Vector operations
    Vector,
    /// Matrix operations
    Matrix,
    /// Comparisons and branches
    Logic,
    /// Surface helpers
    Surface,
    /// User-defined functions
    Custom,
    /// Material output
    Output,
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Operation performed by the node, including its authored parameters
    pub kind: NodeKind,
    /// Display name (can be customized)
    pub name: String,
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a node for a built-in operation
    pub fn new(kind: NodeKind) -> Self {
        let (inputs, outputs) = kind.ports();
        Self {
            id: NodeId::new(),
            name: kind.display_name(),
            kind,
            inputs,
            outputs,
        }
    }

    /// Create a node calling a custom function
    pub fn from_function(definition: &FunctionDefinition) -> Self {
        let (inputs, outputs) = crate::catalog::custom::ports(definition);
        Self {
            id: NodeId::new(),
            kind: NodeKind::Custom {
                function: definition.name.clone(),
            },
            name: definition.name.clone(),
            inputs,
            outputs,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get an input port by name
    pub fn input_named(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get an output port by name
    pub fn output_named(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Index of an output port
    pub fn output_index(&self, port_id: PortId) -> Option<usize> {
        self.outputs.iter().position(|p| p.id == port_id)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs
            .iter()
            .find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Whether this is the material output node
    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Constant, MathOp};
    use crate::port::PortType;

    #[test]
    fn test_ports_from_kind() {
        let node = Node::new(NodeKind::Math(MathOp::Add));
        assert_eq!(node.name, "Add");
        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.outputs.len(), 1);
        assert!(node.input_named("A").is_some_and(|p| p.required));

        let constant = Node::new(NodeKind::Constant(Constant::Float(2.0)));
        assert_eq!(constant.output(0).map(|p| p.port_type), Some(PortType::Float));
    }

    #[test]
    fn test_instances_have_distinct_port_ids() {
        let a = Node::new(NodeKind::Math(MathOp::Add));
        let b = Node::new(NodeKind::Math(MathOp::Add));
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert!(a.port(&b.inputs[0].id).is_none());
    }
}
