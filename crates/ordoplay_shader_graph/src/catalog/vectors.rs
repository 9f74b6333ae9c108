// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector operations: geometric functions, packing and component selection.

use super::signature::{common, fixed, Form, Param, Signature, BINARY, UNARY};
use super::{Arg, Emitted};
use crate::diagnostics::Severity;
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::{Port, PortType};
use serde::{Deserialize, Serialize};

/// A vector operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorOp {
    /// Unit vector in the same direction
    Normalize,
    /// Euclidean length
    Length,
    /// Distance between two points
    Distance,
    /// Dot product
    DotProduct,
    /// Cross product of two 3D vectors
    CrossProduct,
    /// Reflect an incident vector about a normal
    Reflect,
    /// Refract an incident vector through a surface
    Refract,
    /// Concatenate two values into a wider vector
    Append,
    /// Separate a vector into its X/Y/Z/W components
    Split,
    /// Keep the selected channels
    Mask {
        /// Keep the first channel
        r: bool,
        /// Keep the second channel
        g: bool,
        /// Keep the third channel
        b: bool,
        /// Keep the fourth channel
        a: bool,
    },
    /// Reorder channels with a GLSL swizzle such as `zyx`
    Swizzle {
        /// Swizzle pattern, 1 to 4 characters from `xyzw` or `rgba`
        pattern: String,
    },
}

const CROSS: &[Param] = &[fixed("A", PortType::Vector3), fixed("B", PortType::Vector3)];
const REFLECT: &[Param] = &[common("I"), common("N")];
const REFRACT: &[Param] = &[common("I"), common("N"), fixed("Eta", PortType::Float).or(1.0)];

impl VectorOp {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::Normalize => "Normalize",
            Self::Length => "Length",
            Self::Distance => "Distance",
            Self::DotProduct => "DotProduct",
            Self::CrossProduct => "CrossProduct",
            Self::Reflect => "Reflect",
            Self::Refract => "Refract",
            Self::Append => "Append",
            Self::Split => "Split",
            Self::Mask { .. } => "Mask",
            Self::Swizzle { .. } => "Swizzle",
        }
    }

    fn signature(&self) -> Option<Signature> {
        let signature = match self {
            Self::Normalize => Signature::new(UNARY, Form::Call("normalize")),
            Self::Length => Signature::new(UNARY, Form::Call("length")).returning(PortType::Float),
            Self::Distance => Signature::new(BINARY, Form::Call("distance")).returning(PortType::Float),
            Self::DotProduct => Signature::new(BINARY, Form::Call("dot")).returning(PortType::Float),
            Self::CrossProduct => {
                Signature::new(CROSS, Form::Call("cross")).returning(PortType::Vector3)
            }
            Self::Reflect => Signature::new(REFLECT, Form::Call("reflect")),
            Self::Refract => Signature::new(REFRACT, Form::Call("refract")),
            _ => return None,
        };
        Some(signature)
    }

    pub(crate) fn ports(&self) -> (Vec<Port>, Vec<Port>) {
        if let Some(signature) = self.signature() {
            return signature.ports();
        }
        match self {
            Self::Append => (
                vec![
                    Port::input("A", PortType::Void).required(),
                    Port::input("B", PortType::Void).required(),
                ],
                vec![Port::output("Output", PortType::Void)],
            ),
            Self::Split => (
                vec![Port::input("Input", PortType::Void).required()],
                ["X", "Y", "Z", "W"]
                    .iter()
                    .map(|name| Port::output(*name, PortType::Float))
                    .collect(),
            ),
            _ => (
                vec![Port::input("Input", PortType::Void).required()],
                vec![Port::output("Output", PortType::Void)],
            ),
        }
    }

    pub(crate) fn emit(&self, cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
        if let Some(signature) = self.signature() {
            return signature.emit(cx, node, args);
        }
        match self {
            Self::Append => append(cx, node, args),
            Self::Split => {
                let (expr, ty) = as_vector(cx, node, args.first()?);
                Some(Emitted::new(expr, ty))
            }
            Self::Mask { r, g, b, a } => {
                let (expr, ty) = as_vector(cx, node, args.first()?);
                let channels: String = [(*r, 'x'), (*g, 'y'), (*b, 'z'), (*a, 'w')]
                    .iter()
                    .take(ty.components())
                    .filter(|(keep, _)| *keep)
                    .map(|(_, c)| *c)
                    .collect();
                select(cx, node, &expr, &channels)
            }
            Self::Swizzle { pattern } => {
                let (expr, ty) = as_vector(cx, node, args.first()?);
                if !valid_swizzle(pattern, ty.components()) {
                    cx.report(node, Severity::Error, format!("Invalid swizzle '{pattern}'"));
                    return None;
                }
                select(cx, node, &expr, pattern)
            }
            _ => None,
        }
    }

    pub(crate) fn defaults() -> Vec<VectorOp> {
        vec![
            Self::Normalize,
            Self::Length,
            Self::Distance,
            Self::DotProduct,
            Self::CrossProduct,
            Self::Reflect,
            Self::Refract,
            Self::Append,
            Self::Split,
            Self::Mask {
                r: true,
                g: true,
                b: true,
                a: true,
            },
            Self::Swizzle {
                pattern: "xyz".to_string(),
            },
        ]
    }
}

/// Every character from one component set, within the first `components`
fn valid_swizzle(pattern: &str, components: usize) -> bool {
    let within = |set: &str| {
        let set = &set[..components.min(set.len())];
        pattern.chars().all(|c| set.contains(c))
    };
    !pattern.is_empty() && (within("xyzw") || within("rgba"))
}

/// The argument as a float vector; scalars and matrices widen to `vec4`
fn as_vector(cx: &mut StagePass<'_>, node: &Node, arg: &Arg) -> (String, PortType) {
    if arg.ty.is_vector() {
        return (arg.expr.clone(), arg.ty);
    }
    let expr = cx.convert(node, &arg.expr, arg.ty, PortType::Vector4);
    (expr, PortType::Vector4)
}

fn select(cx: &mut StagePass<'_>, node: &Node, expr: &str, channels: &str) -> Option<Emitted> {
    match PortType::vector(channels.len()) {
        Some(ty) if !channels.is_empty() => Some(Emitted::new(format!("{expr}.{channels}"), ty)),
        _ => {
            cx.report(
                node,
                Severity::Error,
                format!("Cannot select {} channels", channels.len()),
            );
            None
        }
    }
}

fn append(cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
    let [a, b] = args else {
        return None;
    };
    let width = a.ty.components() + b.ty.components();
    let ty = match PortType::vector(width) {
        Some(ty) if a.ty.components() > 0 && b.ty.components() > 0 && width > 1 => ty,
        _ => {
            cx.report(
                node,
                Severity::Error,
                format!("Cannot append {} and {}", a.ty.glsl(), b.ty.glsl()),
            );
            return None;
        }
    };

    let mut operands = Vec::with_capacity(2);
    for arg in [a, b] {
        let operand = match arg.ty {
            PortType::Int => cx.convert(node, &arg.expr, PortType::Int, PortType::Float),
            _ => arg.expr.clone(),
        };
        operands.push(operand);
    }
    Some(Emitted::new(
        format!("{}({}, {})", ty.glsl(), operands[0], operands[1]),
        ty,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swizzle_patterns() {
        assert!(valid_swizzle("zyx", 3));
        assert!(valid_swizzle("bgra", 4));
        assert!(valid_swizzle("xxxx", 2));
        assert!(!valid_swizzle("xg", 4));
        assert!(!valid_swizzle("rgb", 2));
        assert!(!valid_swizzle("xq", 4));
        assert!(!valid_swizzle("", 4));
    }

    #[test]
    fn test_split_has_channel_outputs() {
        let (inputs, outputs) = VectorOp::Split.ports();
        assert_eq!(inputs.len(), 1);
        let names: Vec<&str> = outputs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["X", "Y", "Z", "W"]);
        assert!(outputs.iter().all(|p| p.port_type == PortType::Float));
    }
}
