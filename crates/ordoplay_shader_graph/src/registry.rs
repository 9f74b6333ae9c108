// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type listing for editors.

use crate::catalog::NodeKind;
use crate::functions::{FunctionDefinition, FunctionLibrary};
use crate::node::{Node, NodeCategory, NodeId};
use crate::port::Port;
use serde::{Deserialize, Serialize};

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Operation with its default parameters
    pub kind: NodeKind,
    /// Default input ports
    pub inputs: Vec<Port>,
    /// Default output ports
    pub outputs: Vec<Port>,
}

impl NodeType {
    /// Describe a built-in operation
    pub fn from_kind(kind: NodeKind) -> Self {
        let (inputs, outputs) = kind.ports();
        Self {
            id: kind.type_id(),
            name: kind.display_name(),
            category: kind.category(),
            description: kind.description(),
            kind,
            inputs,
            outputs,
        }
    }

    /// Describe a custom function
    pub fn from_function(definition: &FunctionDefinition) -> Self {
        let node = Node::from_function(definition);
        Self {
            id: definition.name.clone(),
            name: node.name,
            category: NodeCategory::Custom,
            description: node.kind.description(),
            kind: node.kind,
            inputs: node.inputs,
            outputs: node.outputs,
        }
    }

    /// Create a node of this type with fresh node and port ids
    pub fn instantiate(&self) -> Node {
        Node {
            id: NodeId::new(),
            kind: self.kind.clone(),
            name: self.name.clone(),
            inputs: self.inputs.iter().map(Port::instantiate).collect(),
            outputs: self.outputs.iter().map(Port::instantiate).collect(),
        }
    }
}

/// Registry of available node types
#[derive(Debug, Default)]
pub struct NodeRegistry {
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type, replacing any type with the same id
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(NodeType::instantiate)
    }

    /// Register a node type for every function in `library`, returning how many were added
    pub fn register_functions(&mut self, library: &FunctionLibrary) -> usize {
        let mut count = 0;
        for definition in library.iter() {
            self.register(NodeType::from_function(definition));
            count += 1;
        }
        tracing::debug!("Registered {} custom function nodes", count);
        count
    }
}

/// Create a registry with every built-in material node
pub fn create_material_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    for kind in NodeKind::builtins() {
        registry.register(NodeType::from_kind(kind));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINT: &str = r#"(
        name: "Tint",
        inputs: [(name: "Color", type: Vector3)],
        outputs: [(name: "Output", type: Vector3)],
        code: "vec3 Tint(vec3 c) { return c * 0.5; }\n",
    )"#;

    #[test]
    fn test_material_registry() {
        let registry = create_material_registry();

        let add = registry.get("Add").unwrap();
        assert_eq!(add.category, NodeCategory::Math);
        assert_eq!(add.inputs.len(), 2);

        assert!(registry.get("MaterialOutput").is_none());
        assert!(registry.types_in_category(NodeCategory::Trigonometry).count() >= 12);
        assert_eq!(registry.types().count(), NodeKind::builtins().len());
    }

    #[test]
    fn test_create_node_has_fresh_ports() {
        let registry = create_material_registry();
        let first = registry.create_node("Add").unwrap();
        let second = registry.create_node("Add").unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.inputs[0].id, second.inputs[0].id);
        assert_eq!(first.inputs[0].name, second.inputs[0].name);
        assert!(registry.create_node("Nope").is_none());
    }

    #[test]
    fn test_register_functions() {
        let mut library = FunctionLibrary::new();
        library.insert(FunctionDefinition::from_ron(TINT).unwrap());

        let mut registry = create_material_registry();
        assert_eq!(registry.register_functions(&library), 1);

        let tint = registry.get("Tint").unwrap();
        assert_eq!(tint.category, NodeCategory::Custom);
        let node = tint.instantiate();
        assert_eq!(
            node.kind,
            NodeKind::Custom {
                function: "Tint".to_string()
            }
        );
        assert!(node.inputs[0].required);
    }
}
