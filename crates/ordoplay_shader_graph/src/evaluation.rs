// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph compilation.
//!
//! Compilation walks from the material output back to the producers. Each
//! node is compiled at most once per stage: a node with exactly one outgoing
//! link is inlined into its consumer, any other node is written once as
//! `\t<type> local<N> = <expr>;` and referenced by name afterwards.
//!
//! Stages are compiled one after another, vertex first. Each stage starts
//! with an empty visit table and local counter; the resource tables are
//! shared so both stages agree on binding names.

use crate::assembler::{self, CompiledProgram};
use crate::bindings::ResourceBindings;
use crate::catalog::{Arg, Emitted, Sharing};
use crate::convert;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::functions::FunctionLibrary;
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use crate::port::{Port, PortId, PortType, Stage};
use crate::settings::CompilerSettings;
use std::collections::HashMap;
use std::fmt;

/// Where a compiled value lives in the generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Handle {
    /// Expression substituted at every use
    Inline(String),
    /// Index of a `local<N>` variable
    Local(u32),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(expr) => f.write_str(expr),
            Self::Local(index) => write!(f, "local{index}"),
        }
    }
}

/// A compiled node output
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Value {
    pub handle: Handle,
    pub ty: PortType,
}

impl Value {
    pub(crate) fn inline(expr: impl Into<String>, ty: PortType) -> Self {
        Self {
            handle: Handle::Inline(expr.into()),
            ty,
        }
    }
}

enum Visit {
    InProgress,
    /// `None` when the node failed and reported a diagnostic
    Done(Option<Value>),
}

/// Compiles a [`Graph`] into a [`CompiledProgram`]
pub struct Compiler<'a> {
    graph: &'a Graph,
    library: &'a FunctionLibrary,
    settings: &'a CompilerSettings,
}

impl<'a> Compiler<'a> {
    /// Create a compiler for `graph`, resolving custom nodes in `library`
    pub fn new(graph: &'a Graph, library: &'a FunctionLibrary, settings: &'a CompilerSettings) -> Self {
        Self {
            graph,
            library,
            settings,
        }
    }

    /// Compile the material output.
    ///
    /// Node-level problems are reported to `sink` and replaced by defaults;
    /// only cycles and binding exhaustion fail the compilation.
    pub fn compile(&self, sink: &mut dyn DiagnosticSink) -> Result<CompiledProgram, CompileError> {
        let root = self.graph.root_node().ok_or(CompileError::MissingRoot)?;
        self.run(sink, |pass| pass.material_outputs(root))
    }

    /// Compile a single node as a preview: its first output becomes the
    /// emissive color of an opaque material.
    pub fn compile_preview(
        &self,
        node_id: NodeId,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<CompiledProgram, CompileError> {
        let node = self
            .graph
            .node(node_id)
            .ok_or(CompileError::NodeNotFound(node_id))?;
        self.run(sink, |pass| match pass.stage {
            Stage::Vertex => Ok(()),
            Stage::Fragment => pass.preview(node),
        })
    }

    fn run<F>(&self, sink: &mut dyn DiagnosticSink, mut body: F) -> Result<CompiledProgram, CompileError>
    where
        F: FnMut(&mut StagePass<'_>) -> Result<(), CompileError>,
    {
        let mut bindings = ResourceBindings::new();
        let mut diagnostics = Vec::new();
        let mut statements = Vec::with_capacity(Stage::ALL.len());
        let mut outcome = Ok(());

        for stage in Stage::ALL {
            let mut pass = StagePass {
                graph: self.graph,
                library: self.library,
                settings: self.settings,
                stage,
                bindings: &mut bindings,
                diagnostics: &mut diagnostics,
                visits: HashMap::new(),
                depth: 0,
                code: String::new(),
            };
            if let Err(e) = body(&mut pass) {
                outcome = Err(e);
                break;
            }
            tracing::debug!(
                "Compiled {} stage of '{}' ({} locals)",
                stage.name(),
                self.graph.name,
                pass.depth
            );
            statements.push(pass.code);
        }

        for diagnostic in diagnostics {
            sink.report(diagnostic);
        }
        if let Err(e) = outcome {
            tracing::error!("Failed to compile '{}': {}", self.graph.name, e);
            return Err(e);
        }

        let mut statements = statements.into_iter();
        let vertex = statements.next().unwrap_or_default();
        let fragment = statements.next().unwrap_or_default();
        let program = assembler::assemble(
            vertex,
            fragment,
            &bindings,
            &self.graph.material,
            self.settings,
        )?;

        tracing::info!(
            "Compiled material '{}': {} uniforms, {} textures, {} functions",
            self.graph.name,
            program.uniforms.len(),
            program.textures.len(),
            program.functions.len()
        );
        Ok(program)
    }
}

/// State of one stage's compilation, handed to node emission rules
pub(crate) struct StagePass<'p> {
    graph: &'p Graph,
    library: &'p FunctionLibrary,
    settings: &'p CompilerSettings,
    pub(crate) stage: Stage,
    bindings: &'p mut ResourceBindings,
    diagnostics: &'p mut Vec<Diagnostic>,
    visits: HashMap<NodeId, Visit>,
    depth: u32,
    code: String,
}

impl<'p> StagePass<'p> {
    pub(crate) fn settings(&self) -> &'p CompilerSettings {
        self.settings
    }

    pub(crate) fn library(&self) -> &'p FunctionLibrary {
        self.library
    }

    pub(crate) fn bindings(&mut self) -> &mut ResourceBindings {
        self.bindings
    }

    /// Register a helper function as used by this stage
    pub(crate) fn add_function(&mut self, name: &str, body: &str) {
        self.bindings.add_function(name, body, self.stage);
    }

    /// Report a problem with `node`. Repeats from the other stage are dropped.
    pub(crate) fn report(&mut self, node: &Node, severity: Severity, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            node: node.id,
            node_name: node.name.clone(),
            severity,
            message: message.into(),
        };
        if self.diagnostics.contains(&diagnostic) {
            return;
        }
        tracing::warn!("{} ({} stage)", diagnostic, self.stage.name());
        self.diagnostics.push(diagnostic);
    }

    /// Convert `expr` between types, reporting pairs that have no conversion
    pub(crate) fn convert(&mut self, node: &Node, expr: &str, from: PortType, to: PortType) -> String {
        if !convert::is_supported(from, to) {
            let severity = if self.settings.strict_conversions {
                Severity::Error
            } else {
                Severity::Warning
            };
            self.report(
                node,
                severity,
                format!("Unsupported conversion from {} to {}", from.glsl(), to.glsl()),
            );
        }
        convert::convert(expr, from, to, 0)
    }

    /// Assign every material channel written in this stage.
    ///
    /// Assignments follow all local declarations.
    fn material_outputs(&mut self, root: &Node) -> Result<(), CompileError> {
        let stage = self.stage;
        let mut assignments = String::new();
        for port in root.inputs.iter().filter(|p| p.stage == Some(stage)) {
            let expr = match self.linked_value(port)? {
                Some(value) => self.convert(root, &value.handle.to_string(), value.ty, port.port_type),
                None => fallback(port).expr,
            };
            assignments.push_str(&format!("\t{} = {};\n", port.name.replace(' ', ""), expr));
        }
        self.code.push_str(&assignments);
        Ok(())
    }

    fn preview(&mut self, node: &Node) -> Result<(), CompileError> {
        let value = match node.outputs.first() {
            Some(port) => self.build(node.id, port.id)?,
            None => None,
        };
        let emissive = match value {
            Some(value) => self.convert(node, &value.handle.to_string(), value.ty, PortType::Vector3),
            None => PortType::Vector3.zero(),
        };
        self.code.push_str(&format!("\tEmissive = {emissive};\n\tOpacity = 1.0;\n"));
        Ok(())
    }

    fn linked_value(&mut self, port: &Port) -> Result<Option<Value>, CompileError> {
        let graph = self.graph;
        match graph.incoming(port.id) {
            Some(link) => self.build(link.from_node, link.from_port),
            None => Ok(None),
        }
    }

    /// Compile `node_id` and return the value seen through `port_id`
    fn build(&mut self, node_id: NodeId, port_id: PortId) -> Result<Option<Value>, CompileError> {
        let graph = self.graph;
        let node = graph.node(node_id).ok_or(CompileError::NodeNotFound(node_id))?;
        let output = node.output_index(port_id).unwrap_or(0);

        let value = match self.visits.get(&node_id) {
            Some(Visit::InProgress) => return Err(CompileError::Cycle(node_id)),
            Some(Visit::Done(value)) => value.clone(),
            None => {
                self.visits.insert(node_id, Visit::InProgress);
                let args = self.arguments(node)?;
                let value = node
                    .kind
                    .emit(self, node, &args)
                    .map(|emitted| self.share(node, emitted));
                self.visits.insert(node_id, Visit::Done(value.clone()));
                value
            }
        };
        Ok(value.map(|value| node.kind.project(&value, output)))
    }

    /// Compile every input of `node`, converted to the declared port types
    fn arguments(&mut self, node: &Node) -> Result<Vec<Arg>, CompileError> {
        let graph = self.graph;
        let mut args = Vec::with_capacity(node.inputs.len());
        for port in &node.inputs {
            let linked = graph.incoming(port.id).is_some();
            let arg = match self.linked_value(port)? {
                Some(value) => {
                    let ty = match port.port_type {
                        PortType::Void => value.ty,
                        declared => declared,
                    };
                    let expr = self.convert(node, &value.handle.to_string(), value.ty, ty);
                    Arg::new(expr, ty, true)
                }
                None => {
                    if port.required && !linked {
                        self.report(node, Severity::Error, format!("Missing argument {}", port.name));
                    }
                    fallback(port)
                }
            };
            args.push(arg);
        }
        Ok(args)
    }

    /// Inline the expression or write it to a new local
    fn share(&mut self, node: &Node, emitted: Emitted) -> Value {
        let inline = emitted.ty.is_texture()
            || match node.kind.sharing() {
                Sharing::Inline => true,
                Sharing::Local => false,
                Sharing::Auto => self.graph.outgoing_count(node.id) == 1,
            };
        if inline {
            return Value::inline(emitted.expr, emitted.ty);
        }

        let index = self.depth;
        self.depth += 1;
        self.code.push_str(&format!(
            "\t{} local{} = {};\n",
            emitted.ty.glsl(),
            index,
            emitted.expr
        ));
        Value {
            handle: Handle::Local(index),
            ty: emitted.ty,
        }
    }
}

/// Value of an unconnected input: its default, or the zero of its type
fn fallback(port: &Port) -> Arg {
    let declared = match port.port_type {
        PortType::Void => PortType::Float,
        ty => ty,
    };
    match &port.default_value {
        Some(value) => {
            let expr = value.to_glsl();
            match value.port_type() {
                PortType::Void => Arg::new(expr, declared, false),
                ty if port.port_type == PortType::Void => Arg::new(expr, ty, false),
                ty => Arg::new(convert::convert(&expr, ty, declared, 0), declared, false),
            }
        }
        None => Arg::new(declared.zero(), declared, false),
    }
}

/// Error that aborts compilation
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The graph has no material output node
    #[error("Graph has no material output node")]
    MissingRoot,

    /// A link references a node that is not in the graph
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A node was reached again while its own inputs were being compiled
    #[error("Graph contains a cycle through node {0:?}")]
    Cycle(NodeId),

    /// More bindings than `max_bindings` allows
    #[error("Binding space exhausted: {required} bindings needed, {available} available")]
    BindingExhausted {
        /// Bindings the program needs
        required: u32,
        /// Bindings configured as available
        available: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortValue;

    #[test]
    fn test_handle_display() {
        assert_eq!(Handle::Local(3).to_string(), "local3");
        assert_eq!(Handle::Inline("(a + b)".into()).to_string(), "(a + b)");
    }

    #[test]
    fn test_fallback_values() {
        let vector = Port::input("Color", PortType::Vector3).with_default(PortValue::Float(0.5));
        assert_eq!(fallback(&vector), Arg::new("vec3(0.5)", PortType::Vector3, false));

        let generic = Port::input("A", PortType::Void);
        assert_eq!(fallback(&generic), Arg::new("0.0", PortType::Float, false));

        let uv = Port::input("UV", PortType::Vector2)
            .with_default(PortValue::Expression("_uv0".into()));
        assert_eq!(fallback(&uv), Arg::new("_uv0", PortType::Vector2, false));

        let alpha = Port::input("Alpha", PortType::Void).with_default(PortValue::Float(0.5));
        assert_eq!(fallback(&alpha), Arg::new("0.5", PortType::Float, false));
    }
}
