// SPDX-License-Identifier: MIT OR Apache-2.0
//! Literal constants.

use super::Emitted;
use crate::port::{Port, PortType, PortValue, IDENTITY3, IDENTITY4};
use serde::{Deserialize, Serialize};

/// A literal value node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    /// Float literal
    Float(f32),
    /// Integer literal
    Int(i32),
    /// 2D vector literal
    Vector2([f32; 2]),
    /// 3D vector literal
    Vector3([f32; 3]),
    /// 4D vector literal
    Vector4([f32; 4]),
    /// RGBA color
    Color([f32; 4]),
    /// 3x3 matrix, column-major
    Matrix3([f32; 9]),
    /// 4x4 matrix, column-major
    Matrix4([f32; 16]),
    /// π
    Pi,
    /// Euler's number
    Euler,
    /// Golden ratio
    GoldenRatio,
}

impl Constant {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::Float(_) => "ConstFloat",
            Self::Int(_) => "ConstInt",
            Self::Vector2(_) => "ConstVector2",
            Self::Vector3(_) => "ConstVector3",
            Self::Vector4(_) => "ConstVector4",
            Self::Color(_) => "ConstColor",
            Self::Matrix3(_) => "ConstMatrix3",
            Self::Matrix4(_) => "ConstMatrix4",
            Self::Pi => "ConstPi",
            Self::Euler => "ConstEuler",
            Self::GoldenRatio => "ConstGoldenRatio",
        }
    }

    pub(crate) fn display_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "Float",
            Self::Int(_) => "Int",
            Self::Vector2(_) => "Vector2",
            Self::Vector3(_) => "Vector3",
            Self::Vector4(_) => "Vector4",
            Self::Color(_) => "Color",
            Self::Matrix3(_) => "Matrix3",
            Self::Matrix4(_) => "Matrix4",
            Self::Pi => "PI",
            Self::Euler => "Euler",
            Self::GoldenRatio => "Golden Ratio",
        }
    }

    /// Type of the literal
    pub fn value_type(&self) -> PortType {
        match self {
            Self::Int(_) => PortType::Int,
            Self::Float(_) | Self::Pi | Self::Euler | Self::GoldenRatio => PortType::Float,
            Self::Vector2(_) => PortType::Vector2,
            Self::Vector3(_) => PortType::Vector3,
            Self::Vector4(_) | Self::Color(_) => PortType::Vector4,
            Self::Matrix3(_) => PortType::Matrix3,
            Self::Matrix4(_) => PortType::Matrix4,
        }
    }

    pub(crate) fn outputs(&self) -> Vec<Port> {
        let name = match self {
            Self::Color(_) => "Color",
            _ => "Value",
        };
        vec![Port::output(name, self.value_type())]
    }

    fn literal(&self) -> String {
        match self {
            Self::Float(v) => PortValue::Float(*v).to_glsl(),
            Self::Int(v) => PortValue::Int(*v).to_glsl(),
            Self::Vector2(v) => PortValue::Vector2(*v).to_glsl(),
            Self::Vector3(v) => PortValue::Vector3(*v).to_glsl(),
            Self::Vector4(v) | Self::Color(v) => PortValue::Vector4(*v).to_glsl(),
            Self::Matrix3(v) => PortValue::Matrix3(*v).to_glsl(),
            Self::Matrix4(v) => PortValue::Matrix4(*v).to_glsl(),
            Self::Pi => "3.141592653589793".to_string(),
            Self::Euler => "2.718281828459045".to_string(),
            Self::GoldenRatio => "1.618033988749895".to_string(),
        }
    }

    pub(crate) fn emit(&self) -> Emitted {
        Emitted::new(self.literal(), self.value_type())
    }

    pub(crate) fn defaults() -> Vec<Constant> {
        vec![
            Self::Float(0.0),
            Self::Int(0),
            Self::Vector2([0.0; 2]),
            Self::Vector3([0.0; 3]),
            Self::Vector4([0.0; 4]),
            Self::Color([1.0; 4]),
            Self::Matrix3(IDENTITY3),
            Self::Matrix4(IDENTITY4),
            Self::Pi,
            Self::Euler,
            Self::GoldenRatio,
        ]
    }
}
