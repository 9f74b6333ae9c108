// SPDX-License-Identifier: MIT OR Apache-2.0
//! Links carrying a value from a node output to a node input.

use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A link from a sender's output port to a receiver's input port.
///
/// An input port has at most one incoming link; an output may feed many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender node
    pub from_node: NodeId,
    /// Sender output port
    pub from_port: PortId,
    /// Receiver node
    pub to_node: NodeId,
    /// Receiver input port
    pub to_port: PortId,
}

impl Connection {
    /// Create a new connection
    pub fn new(from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Whether `node_id` is the sender
    pub fn is_from(&self, node_id: NodeId) -> bool {
        self.from_node == node_id
    }

    /// Whether `node_id` is the receiver
    pub fn feeds(&self, node_id: NodeId) -> bool {
        self.to_node == node_id
    }
}
