// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material shader graph compiler for `OrdoPlay` Editor.
//!
//! A material is authored as a directed acyclic graph of typed operations
//! ending in a material output node. This crate compiles such a graph into
//! GLSL statement blocks for the vertex and fragment stages, together with
//! the resources those statements use.
//!
//! ## Architecture
//!
//! - [`graph`]: nodes, ports and links with connection validation
//! - [`catalog`]: the closed set of node operations and their emission rules
//! - [`evaluation`]: the per-stage traversal deciding between inlining and locals
//! - [`convert`]: conversions between port value types
//! - [`bindings`] and [`assembler`]: uniform, texture and function tables and
//!   the final per-stage source
//! - [`functions`]: user-defined GLSL functions loaded from RON
//!
//! ```no_run
//! use ordoplay_shader_graph::{Compiler, CompilerSettings, FunctionLibrary, Graph};
//!
//! let graph = Graph::new("Brick");
//! let library = FunctionLibrary::new();
//! let settings = CompilerSettings::default();
//! let mut diagnostics: Vec<ordoplay_shader_graph::Diagnostic> = Vec::new();
//! let program = Compiler::new(&graph, &library, &settings).compile(&mut diagnostics)?;
//! println!("{}", program.fragment.source);
//! # Ok::<(), ordoplay_shader_graph::CompileError>(())
//! ```

pub mod assembler;
pub mod bindings;
pub mod catalog;
pub mod connection;
pub mod convert;
pub mod diagnostics;
pub mod evaluation;
pub mod functions;
pub mod graph;
pub mod material;
pub mod node;
pub mod port;
pub mod registry;
pub mod settings;

pub use assembler::{CompiledProgram, StageProgram, TextureBinding};
pub use bindings::{ResourceBindings, TextureFlags};
pub use catalog::NodeKind;
pub use connection::{Connection, ConnectionId};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use evaluation::{CompileError, Compiler};
pub use functions::{FunctionDefinition, FunctionLibrary, LibraryError};
pub use graph::{ConnectionError, Graph};
pub use material::MaterialSettings;
pub use node::{Node, NodeCategory, NodeId};
pub use port::{Port, PortDirection, PortId, PortType, PortValue, Stage};
pub use registry::{create_material_registry, NodeRegistry, NodeType};
pub use settings::CompilerSettings;
