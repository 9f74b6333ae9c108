// SPDX-License-Identifier: MIT OR Apache-2.0
//! Surface shading helpers.

use super::{Arg, Emitted};
use crate::port::{format_float, Port, PortType, PortValue};
use serde::{Deserialize, Serialize};

/// A surface helper node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceOp {
    /// Schlick Fresnel term with F0 = 0.04
    Fresnel,
    /// Texture coordinates scrolling over time
    CoordPanner {
        /// Scroll speed in UV units per second
        speed: [f32; 2],
    },
}

impl SurfaceOp {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::Fresnel => "Fresnel",
            Self::CoordPanner { .. } => "CoordPanner",
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            Self::Fresnel => "View-angle dependent reflectance",
            Self::CoordPanner { .. } => "Scrolls texture coordinates over time",
        }
    }

    pub(crate) fn ports(&self) -> (Vec<Port>, Vec<Port>) {
        match self {
            Self::Fresnel => (
                vec![
                    Port::input("Normal", PortType::Vector3)
                        .with_default(PortValue::Expression("_n".to_string())),
                    Port::input("View Dir", PortType::Vector3)
                        .with_default(PortValue::Expression("_view".to_string())),
                    Port::input("Power", PortType::Float).with_default(PortValue::Float(5.0)),
                ],
                vec![Port::output("Output", PortType::Float)],
            ),
            Self::CoordPanner { .. } => (
                vec![Port::input("UV", PortType::Vector2)
                    .with_default(PortValue::Expression("_uv0".to_string()))],
                vec![Port::output("Output", PortType::Vector2)],
            ),
        }
    }

    pub(crate) fn emit(&self, args: &[Arg]) -> Option<Emitted> {
        match (self, args) {
            (Self::Fresnel, [normal, view, power]) => Some(Emitted::new(
                format!(
                    "(0.04 + (1.0 - 0.04) * pow(1.0 - dot({}, -{}), {}))",
                    normal.expr, view.expr, power.expr
                ),
                PortType::Float,
            )),
            (Self::CoordPanner { speed }, [uv]) => Some(Emitted::new(
                format!(
                    "({} + vec2({}, {}) * g.time)",
                    uv.expr,
                    format_float(speed[0]),
                    format_float(speed[1])
                ),
                PortType::Vector2,
            )),
            _ => None,
        }
    }

    pub(crate) fn defaults() -> Vec<SurfaceOp> {
        vec![Self::Fresnel, Self::CoordPanner { speed: [0.1, 0.0] }]
    }
}
