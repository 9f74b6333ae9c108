// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph: nodes, links and the material output node.

use crate::catalog::NodeKind;
use crate::connection::{Connection, ConnectionId};
use crate::material::MaterialSettings;
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A material graph.
///
/// Always contains exactly one output node (the root), created with the graph
/// and never removable. Links never form a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Render state of the material
    #[serde(default)]
    pub material: MaterialSettings,
    /// Material output node
    root: NodeId,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a graph holding only the material output node
    pub fn new(name: impl Into<String>) -> Self {
        let root = Node::new(NodeKind::Output);
        let root_id = root.id;
        let mut nodes = IndexMap::new();
        nodes.insert(root_id, root);
        Self {
            name: name.into(),
            material: MaterialSettings::default(),
            root: root_id,
            nodes,
            connections: IndexMap::new(),
        }
    }

    /// ID of the material output node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The material output node
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its connections. The output node cannot be removed.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if node_id == self.root {
            return None;
        }
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link an output port to an input port
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source_node = self
            .nodes
            .get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self
            .nodes
            .get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        let source_port = source_node
            .port(&from_port)
            .ok_or(ConnectionError::PortNotFound(from_port))?;
        let target_port = target_node
            .port(&to_port)
            .ok_or(ConnectionError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output || !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }

        if !target_port.multi_connect && self.connections.values().any(|c| c.to_port == to_port) {
            return Err(ConnectionError::PortAlreadyConnected(to_port));
        }

        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }

        if self.reaches(to_node, from_node) {
            return Err(ConnectionError::CycleDetected);
        }

        let connection = Connection::new(from_node, from_port, to_node, to_port);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Link ports addressed by name
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let from = self
            .node(from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?
            .output_named(from_port)
            .ok_or_else(|| ConnectionError::PortNameNotFound(from_port.to_string()))?
            .id;
        let to = self
            .node(to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?
            .input_named(to_port)
            .ok_or_else(|| ConnectionError::PortNameNotFound(to_port.to_string()))?
            .id;
        self.connect(from_node, from, to_node, to)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections from a specific port
    pub fn connections_from(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from_port == port_id)
    }

    /// Get connections to a specific port
    pub fn connections_to(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to_port == port_id)
    }

    /// The link feeding an input port, if any
    pub fn incoming(&self, port_id: PortId) -> Option<&Connection> {
        self.connections_to(port_id).next()
    }

    /// Number of links leaving a node, summed over all of its outputs
    pub fn outgoing_count(&self, node_id: NodeId) -> usize {
        self.connections.values().filter(|c| c.is_from(node_id)).count()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Every node whose value depends on `node_id`, nearest first.
    ///
    /// Editors mark these dirty when `node_id` changes.
    pub fn downstream(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::from([node_id]);
        let mut queue = VecDeque::from([node_id]);
        let mut affected = Vec::new();

        while let Some(current) = queue.pop_front() {
            for connection in self.connections.values().filter(|c| c.is_from(current)) {
                if seen.insert(connection.to_node) {
                    affected.push(connection.to_node);
                    queue.push_back(connection.to_node);
                }
            }
        }
        affected
    }

    /// Whether following links forward from `start` arrives at `target`
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        start == target || self.downstream(start).contains(&target)
    }

    /// Get nodes in dependency order: producers before their consumers
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();
        let mut order = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id) {
                self.visit(*node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        temp_mark: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if temp_mark.contains(&node_id) {
            return Err(CycleError(node_id));
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Producers first
        for connection in self.connections_for_node(node_id) {
            if connection.feeds(node_id) {
                self.visit(connection.from_node, visited, temp_mark, order)?;
            }
        }

        temp_mark.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }

    /// Serialize the graph to RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize a graph from RON
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// No port with the given name on the node
    #[error("Port not found: {0}")]
    PortNameNotFound(String),

    /// Not an output-to-input link
    #[error("Incompatible port directions")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The link would close a cycle
    #[error("Connection would create a cycle")]
    CycleDetected,
}

/// Error when graph contains a cycle
#[derive(Debug, thiserror::Error)]
#[error("Graph contains a cycle through node {0:?}")]
pub struct CycleError(pub NodeId);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Constant, MathOp};

    fn constant(graph: &mut Graph, value: f32) -> NodeId {
        graph.add_node(Node::new(NodeKind::Constant(Constant::Float(value))))
    }

    #[test]
    fn test_new_graph_has_root() {
        let graph = Graph::new("Brick");
        let root = graph.root_node().unwrap();
        assert!(root.is_output());
        assert_eq!(root.inputs.len(), 8);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut graph = Graph::default();
        let root = graph.root();
        assert!(graph.remove_node(root).is_none());
        assert!(graph.root_node().is_some());
    }

    #[test]
    fn test_single_incoming_link_per_input() {
        let mut graph = Graph::default();
        let a = constant(&mut graph, 1.0);
        let b = constant(&mut graph, 2.0);
        let root = graph.root();

        graph.connect_named(a, "Value", root, "Metallic").unwrap();
        assert!(matches!(
            graph.connect_named(b, "Value", root, "Metallic"),
            Err(ConnectionError::PortAlreadyConnected(_))
        ));
        // Outputs fan out freely
        graph.connect_named(a, "Value", root, "Roughness").unwrap();
        assert_eq!(graph.outgoing_count(a), 2);
    }

    #[test]
    fn test_rejects_input_to_output() {
        let mut graph = Graph::default();
        let add = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let value = constant(&mut graph, 1.0);
        let input = graph.node(add).unwrap().inputs[0].id;
        let output = graph.node(value).unwrap().outputs[0].id;
        assert!(matches!(
            graph.connect(add, input, value, output),
            Err(ConnectionError::IncompatiblePorts)
        ));
    }

    #[test]
    fn test_rejects_cycles() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let b = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let c = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));

        assert!(matches!(
            graph.connect_named(a, "Output", a, "A"),
            Err(ConnectionError::SelfLoop)
        ));

        graph.connect_named(a, "Output", b, "A").unwrap();
        graph.connect_named(b, "Output", c, "A").unwrap();
        assert!(matches!(
            graph.connect_named(c, "Output", a, "A"),
            Err(ConnectionError::CycleDetected)
        ));
        assert!(graph.topological_order().is_ok());
    }

    #[test]
    fn test_remove_node_drops_links() {
        let mut graph = Graph::default();
        let a = constant(&mut graph, 1.0);
        let root = graph.root();
        graph.connect_named(a, "Value", root, "Opacity").unwrap();

        assert!(graph.remove_node(a).is_some());
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_downstream_and_order() {
        let mut graph = Graph::default();
        let a = constant(&mut graph, 1.0);
        let add = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let root = graph.root();
        graph.connect_named(a, "Value", add, "A").unwrap();
        graph.connect_named(add, "Output", root, "Metallic").unwrap();

        assert_eq!(graph.downstream(a), vec![add, root]);
        assert!(graph.downstream(root).is_empty());

        let order = graph.topological_order().unwrap();
        let position = |id| order.iter().position(|n| *n == id).unwrap();
        assert!(position(a) < position(add));
        assert!(position(add) < position(root));
    }

    #[test]
    fn test_ron_round_trip() {
        let mut graph = Graph::new("Round Trip");
        let a = constant(&mut graph, 0.25);
        let root = graph.root();
        graph.connect_named(a, "Value", root, "Roughness").unwrap();

        let text = graph.to_ron().unwrap();
        let loaded = Graph::from_ron(&text).unwrap();
        assert_eq!(loaded, graph);
        assert_eq!(loaded.root(), root);
    }

    #[test]
    fn test_cycle_in_loaded_graph_fails_compilation() {
        use crate::diagnostics::IgnoreDiagnostics;
        use crate::evaluation::{CompileError, Compiler};
        use crate::functions::FunctionLibrary;
        use crate::settings::CompilerSettings;

        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let b = graph.add_node(Node::new(NodeKind::Math(MathOp::Add)));
        let root = graph.root();
        graph.connect_named(a, "Output", b, "A").unwrap();
        graph.connect_named(b, "Output", root, "Metallic").unwrap();

        // Bypass `connect` the way a hand-edited file would
        let from_port = graph.node(b).unwrap().outputs[0].id;
        let to_port = graph.node(a).unwrap().inputs[0].id;
        let back = Connection::new(b, from_port, a, to_port);
        graph.connections.insert(back.id, back);

        assert!(graph.topological_order().is_err());

        let library = FunctionLibrary::new();
        let settings = CompilerSettings::default();
        let result = Compiler::new(&graph, &library, &settings).compile(&mut IgnoreDiagnostics);
        assert!(matches!(result, Err(CompileError::Cycle(_))));
    }
}
