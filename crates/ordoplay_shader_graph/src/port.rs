// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions and the value types that flow between shader nodes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Pipeline stage a material output channel is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl Stage {
    /// Stages in compilation order
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];

    /// Lower-case stage name
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

/// Value type carried by a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Generic input, adopts the type of whatever is connected
    Void,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector / Color
    Vector4,
    /// Matrix 3x3
    Matrix3,
    /// Matrix 4x4
    Matrix4,
    /// 2D texture sampler
    Texture2D,
    /// Cube map sampler
    TextureCube,
}

impl PortType {
    /// GLSL spelling of the type. `Void` renders as `float`.
    pub fn glsl(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Void | Self::Float => "float",
            Self::Vector2 => "vec2",
            Self::Vector3 => "vec3",
            Self::Vector4 => "vec4",
            Self::Matrix3 => "mat3",
            Self::Matrix4 => "mat4",
            Self::Texture2D => "sampler2D",
            Self::TextureCube => "samplerCube",
        }
    }

    /// Size of one value in bytes
    pub fn size(self) -> u32 {
        match self {
            Self::Void | Self::Texture2D | Self::TextureCube => 0,
            Self::Int | Self::Float => 4,
            Self::Vector2 => 8,
            Self::Vector3 => 12,
            Self::Vector4 => 16,
            Self::Matrix3 => 36,
            Self::Matrix4 => 64,
        }
    }

    /// std140 base alignment in bytes
    pub fn alignment(self) -> u32 {
        match self {
            Self::Void | Self::Texture2D | Self::TextureCube => 0,
            Self::Int | Self::Float => 4,
            Self::Vector2 => 8,
            Self::Vector3 | Self::Vector4 | Self::Matrix3 | Self::Matrix4 => 16,
        }
    }

    /// Bytes occupied inside a std140 block (matrix columns pad to 16)
    pub fn std140_extent(self) -> u32 {
        match self {
            Self::Matrix3 => 48,
            other => other.size(),
        }
    }

    /// Number of scalar components for scalar and vector types, 0 otherwise
    pub fn components(self) -> usize {
        match self {
            Self::Int | Self::Float => 1,
            Self::Vector2 => 2,
            Self::Vector3 => 3,
            Self::Vector4 => 4,
            _ => 0,
        }
    }

    /// Float vector type with `components` components (1 gives `Float`)
    pub fn vector(components: usize) -> Option<Self> {
        match components {
            1 => Some(Self::Float),
            2 => Some(Self::Vector2),
            3 => Some(Self::Vector3),
            4 => Some(Self::Vector4),
            _ => None,
        }
    }

    /// Whether this is one of the vector types
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Vector2 | Self::Vector3 | Self::Vector4)
    }

    /// Whether this is one of the matrix types
    pub fn is_matrix(self) -> bool {
        matches!(self, Self::Matrix3 | Self::Matrix4)
    }

    /// Whether this is a sampler type
    pub fn is_texture(self) -> bool {
        matches!(self, Self::Texture2D | Self::TextureCube)
    }

    /// GLSL literal for the zero value of this type.
    ///
    /// Samplers have no literal, so they fall back to `0.0` like `Void`.
    pub fn zero(self) -> String {
        match self {
            Self::Int => "0".to_string(),
            Self::Vector2 | Self::Vector3 | Self::Vector4 | Self::Matrix3 | Self::Matrix4 => {
                format!("{}(0.0)", self.glsl())
            }
            Self::Void | Self::Float | Self::Texture2D | Self::TextureCube => "0.0".to_string(),
        }
    }
}

/// A port on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name, unique within its node
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Declared value type
    pub port_type: PortType,
    /// Value used when the input is left unconnected
    pub default_value: Option<PortValue>,
    /// Whether an unconnected input is reported as a missing argument
    pub required: bool,
    /// Whether multiple connections are allowed
    pub multi_connect: bool,
    /// Stage this port is written in (material output channels only)
    #[serde(default)]
    pub stage: Option<Stage>,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
            required: false,
            multi_connect: false,
            stage: None,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
            required: false,
            multi_connect: true, // Outputs can fan out to any number of inputs
            stage: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Tag the port with the stage it is written in
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Copy of this port with a fresh ID
    pub fn instantiate(&self) -> Self {
        Self {
            id: PortId::new(),
            ..self.clone()
        }
    }

    /// Check if a connection to another port is valid.
    ///
    /// Types are not checked: mismatches are resolved by conversion at compile time.
    pub fn can_connect(&self, other: &Port) -> bool {
        self.direction != other.direction
    }
}

/// Column-major 4x4 identity
pub const IDENTITY4: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Column-major 3x3 identity
pub const IDENTITY3: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Value that can be stored in a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// 3x3 matrix, column-major
    Matrix3([f32; 9]),
    /// 4x4 matrix, column-major
    Matrix4([f32; 16]),
    /// Raw GLSL expression, e.g. a built-in such as `_uv0`
    Expression(String),
}

impl PortValue {
    /// Get the port type for this value. Raw expressions are `Void`.
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Int(_) => PortType::Int,
            Self::Float(_) => PortType::Float,
            Self::Vector2(_) => PortType::Vector2,
            Self::Vector3(_) => PortType::Vector3,
            Self::Vector4(_) => PortType::Vector4,
            Self::Matrix3(_) => PortType::Matrix3,
            Self::Matrix4(_) => PortType::Matrix4,
            Self::Expression(_) => PortType::Void,
        }
    }

    /// 4x4 identity matrix
    pub fn identity4() -> Self {
        Self::Matrix4(IDENTITY4)
    }

    /// GLSL literal for this value
    pub fn to_glsl(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format_float(*v),
            Self::Vector2(v) => constructor("vec2", v),
            Self::Vector3(v) => constructor("vec3", v),
            Self::Vector4(v) => constructor("vec4", v),
            Self::Matrix3(v) => constructor("mat3", v),
            Self::Matrix4(v) => constructor("mat4", v),
            Self::Expression(e) => e.clone(),
        }
    }
}

/// Format a float as a GLSL literal, always with a decimal point.
///
/// Magnitudes of 1e9 and above use exponent notation. GLSL has no literal
/// for NaN or infinity: NaN becomes `0.0` and infinities clamp to the
/// largest finite float.
pub fn format_float(value: f32) -> String {
    let value = match value {
        v if v.is_nan() => 0.0,
        v if v.is_infinite() => f32::MAX.copysign(v),
        v => v,
    };
    if value.abs() >= 1.0e9 {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !mantissa.contains('.') => format!("{mantissa}.0e{exponent}"),
            _ => text,
        }
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn constructor(name: &str, values: &[f32]) -> String {
    let args: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
    format!("{}({})", name, args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literals() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(0.04), "0.04");
        assert_eq!(format_float(1.0e10), "1.0e10");
        assert_eq!(format_float(3.0e9), "3.0e9");
        assert_eq!(format_float(-2.5e12), "-2.5e12");
        assert_eq!(format_float(f32::NAN), "0.0");
        assert_eq!(format_float(f32::INFINITY), format!("{:e}", f32::MAX));
        assert!(format_float(f32::NEG_INFINITY).starts_with("-3.4028235e38"));
        for value in [1.0e9, 4.0e20, f32::MAX, f32::MIN] {
            let literal = format_float(value);
            assert!(literal.contains('.'), "{literal}");
            assert_eq!(literal.parse::<f32>().unwrap(), value);
        }
    }

    #[test]
    fn test_value_literals() {
        assert_eq!(PortValue::Int(3).to_glsl(), "3");
        assert_eq!(PortValue::Vector3([1.0, 1.0, 1.0]).to_glsl(), "vec3(1.0, 1.0, 1.0)");
        assert_eq!(PortValue::Vector2([0.25, 2.0]).to_glsl(), "vec2(0.25, 2.0)");
        assert_eq!(
            PortValue::identity4().to_glsl(),
            "mat4(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)"
        );
        assert_eq!(PortValue::Expression("_uv0".into()).to_glsl(), "_uv0");
    }

    #[test]
    fn test_type_sizes() {
        assert_eq!(PortType::Float.size(), 4);
        assert_eq!(PortType::Vector3.size(), 12);
        assert_eq!(PortType::Matrix3.size(), 36);
        assert_eq!(PortType::Matrix4.size(), 64);
        assert_eq!(PortType::Texture2D.size(), 0);
        assert_eq!(PortType::Void.glsl(), "float");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(PortType::Int.zero(), "0");
        assert_eq!(PortType::Float.zero(), "0.0");
        assert_eq!(PortType::Vector3.zero(), "vec3(0.0)");
        assert_eq!(PortType::Matrix4.zero(), "mat4(0.0)");
    }

    #[test]
    fn test_ports_connect_by_direction() {
        let output = Port::output("Value", PortType::Float);
        let input = Port::input("A", PortType::Vector3);
        assert!(output.can_connect(&input));
        assert!(!input.can_connect(&Port::input("B", PortType::Float)));
    }
}
