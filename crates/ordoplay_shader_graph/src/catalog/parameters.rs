// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material parameters, exposed to the renderer through the uniform block.

use super::Emitted;
use crate::diagnostics::Severity;
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::{Port, PortType, PortValue};
use serde::{Deserialize, Serialize};

/// A named, renderer-editable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameter {
    /// Scalar parameter
    Float {
        /// Uniform field name
        name: String,
        /// Initial value
        value: f32,
    },
    /// Vector or color parameter
    Vector {
        /// Uniform field name
        name: String,
        /// Initial value
        value: [f32; 4],
    },
}

impl Parameter {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::Float { .. } => "ParamFloat",
            Self::Vector { .. } => "ParamVector",
        }
    }

    /// Uniform field name
    pub fn name(&self) -> &str {
        match self {
            Self::Float { name, .. } | Self::Vector { name, .. } => name,
        }
    }

    fn value(&self) -> PortValue {
        match self {
            Self::Float { value, .. } => PortValue::Float(*value),
            Self::Vector { value, .. } => PortValue::Vector4(*value),
        }
    }

    pub(crate) fn outputs(&self) -> Vec<Port> {
        vec![Port::output("Value", self.value().port_type())]
    }

    pub(crate) fn emit(&self, cx: &mut StagePass<'_>, node: &Node) -> Option<Emitted> {
        let name = self.name();
        let identifier = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !identifier {
            cx.report(
                node,
                Severity::Error,
                format!("Invalid parameter name '{name}'"),
            );
            return None;
        }

        let value = self.value();
        let ty: PortType = value.port_type();
        cx.bindings().add_uniform(name, ty, value);
        Some(Emitted::new(format!("uni.{name}"), ty))
    }

    pub(crate) fn defaults() -> Vec<Parameter> {
        vec![
            Self::Float {
                name: "scalar".to_string(),
                value: 0.0,
            },
            Self::Vector {
                name: "color".to_string(),
                value: [1.0; 4],
            },
        ]
    }
}
