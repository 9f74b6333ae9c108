// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compile diagnostics reported against individual nodes.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Output was produced but may not behave as authored
    Warning,
    /// The node could not be compiled as authored; a default was substituted
    Error,
}

/// A message attached to the node that caused it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Offending node
    pub node: NodeId,
    /// Display name of the node at the time of compilation
    pub node_name: String,
    /// Severity
    pub severity: Severity,
    /// Human readable message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", level, self.node_name, self.message)
    }
}

/// Receiver for compile diagnostics
pub trait DiagnosticSink {
    /// Record a diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that drops diagnostics; they still reach the `tracing` output
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic {
            node: NodeId::new(),
            node_name: "If".to_string(),
            severity: Severity::Error,
            message: "Missing argument A>B".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "error: If: Missing argument A>B");

        let mut sink = Vec::new();
        sink.report(diagnostic.clone());
        assert_eq!(sink, vec![diagnostic]);
    }
}
