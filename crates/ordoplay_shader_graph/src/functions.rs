// SPDX-License-Identifier: MIT OR Apache-2.0
//! User-authored GLSL functions usable as graph nodes.
//!
//! Definitions are stored as RON, one per `*.mtlf.ron` file:
//!
//! ```ron
//! FunctionDefinition(
//!     name: "Tint",
//!     inputs: [
//!         (name: "Color", type: Vector3),
//!         (name: "Amount", type: Float, default: Some(Float(0.5))),
//!     ],
//!     outputs: [(name: "Result", type: Vector3)],
//!     code: "vec3 Tint(vec3 c, float k) { return c * k; }",
//! )
//! ```

use crate::port::{PortType, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File suffix of function definition files
pub const FUNCTION_EXTENSION: &str = ".mtlf.ron";

/// A typed function parameter or result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParam {
    /// Parameter name, used as the port name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: PortType,
    /// Value used when the port is left unconnected
    #[serde(default)]
    pub default: Option<PortValue>,
}

/// A custom function: signature plus GLSL definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name, also the name called from generated code
    pub name: String,
    /// Inputs in call-argument order
    #[serde(default)]
    pub inputs: Vec<FunctionParam>,
    /// Result of the call. Exactly one output is allowed.
    pub outputs: Vec<FunctionParam>,
    /// Full GLSL definition of the function
    pub code: String,
}

impl FunctionDefinition {
    /// Parse a definition from RON text
    pub fn from_ron(text: &str) -> Result<Self, LibraryError> {
        let definition: Self = ron::from_str(text).map_err(|e| LibraryError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check that the definition can be called from generated code
    pub fn validate(&self) -> Result<(), LibraryError> {
        let identifier = self
            .name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !identifier {
            return Err(LibraryError::InvalidDefinition(format!(
                "'{}' is not a valid function name",
                self.name
            )));
        }
        if self.outputs.is_empty() {
            return Err(LibraryError::InvalidDefinition(format!(
                "function '{}' has no outputs",
                self.name
            )));
        }
        if self.outputs.len() > 1 {
            return Err(LibraryError::InvalidDefinition(format!(
                "function '{}' returns more than one value",
                self.name
            )));
        }
        if self.code.trim().is_empty() {
            return Err(LibraryError::InvalidDefinition(format!(
                "function '{}' has no code",
                self.name
            )));
        }
        Ok(())
    }

    /// Type of the value returned by the call
    pub fn return_type(&self) -> PortType {
        self.outputs.first().map_or(PortType::Float, |o| o.ty)
    }
}

/// Collection of custom functions keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionLibrary {
    functions: IndexMap<String, FunctionDefinition>,
}

impl FunctionLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition
    pub fn insert(&mut self, definition: FunctionDefinition) {
        self.functions.insert(definition.name.clone(), definition);
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    /// All definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.functions.values()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Load one definition file into the library
    pub fn load_file(&mut self, path: &Path) -> Result<&FunctionDefinition, LibraryError> {
        let text = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = FunctionDefinition::from_ron(&text).map_err(|e| e.at(path))?;
        let name = definition.name.clone();
        self.insert(definition);
        self.functions
            .get(&name)
            .ok_or_else(|| LibraryError::InvalidDefinition(name))
    }

    /// Load every `*.mtlf.ron` file under `dir`, recursively.
    ///
    /// Files that fail to parse are skipped with a warning. Returns the number loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, LibraryError> {
        let mut loaded = 0;
        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| LibraryError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let is_definition = entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(FUNCTION_EXTENSION));
            if !is_definition {
                continue;
            }

            match self.load_file(entry.path()) {
                Ok(definition) => {
                    tracing::debug!("Loaded shader function '{}'", definition.name);
                    loaded += 1;
                }
                Err(e) => tracing::warn!("Skipping shader function: {}", e),
            }
        }
        tracing::info!("Loaded {} shader functions from {}", loaded, dir.display());
        Ok(loaded)
    }
}

/// Error while loading custom functions
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// RON could not be parsed
    #[error("Failed to parse function{}: {message}", .path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Parse {
        /// File being parsed, if any
        path: Option<PathBuf>,
        /// Parser message
        message: String,
    },

    /// Definition parsed but cannot be used
    #[error("Invalid function definition: {0}")]
    InvalidDefinition(String),
}

impl LibraryError {
    fn at(self, path: &Path) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}
