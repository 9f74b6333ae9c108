// SPDX-License-Identifier: MIT OR Apache-2.0
//! Arithmetic operators and intrinsic math functions.

use super::signature::{common, Form, Param, Signature, BINARY, UNARY};
use super::{Arg, Emitted};
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::PortType;
use serde::{Deserialize, Serialize};

/// An arithmetic or intrinsic math operation
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Abs,
    Ceil,
    Floor,
    Fract,
    Round,
    Sign,
    Truncate,
    Exp,
    Exp2,
    Logarithm,
    Logarithm2,
    Logarithm10,
    SquareRoot,
    InverseSquareRoot,
    DDX,
    DDY,
    FWidth,
    Negate,
    OneMinus,
    Saturate,
    Min,
    Max,
    Power,
    Step,
    Fmod,
    Clamp,
    Mix,
    Smoothstep,
    InverseLerp,
    ScaleAndOffset,
}

const POWER: &[Param] = &[common("Base"), common("Exp")];
const STEP: &[Param] = &[common("Edge"), common("X")];
const CLAMP: &[Param] = &[common("X"), common("Min").or(0.0), common("Max").or(1.0)];
const MIX: &[Param] = &[common("A"), common("B"), common("Alpha").or(0.5)];
const SMOOTHSTEP: &[Param] = &[common("Edge0").or(0.0), common("Edge1").or(1.0), common("X")];
const INVERSE_LERP: &[Param] = &[common("A"), common("B"), common("X")];
const SCALE_AND_OFFSET: &[Param] = &[common("X"), common("Scale").or(1.0), common("Offset").or(0.0)];

impl MathOp {
    /// Every math operation in menu order
    pub const ALL: [MathOp; 34] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Abs,
        Self::Ceil,
        Self::Floor,
        Self::Fract,
        Self::Round,
        Self::Sign,
        Self::Truncate,
        Self::Exp,
        Self::Exp2,
        Self::Logarithm,
        Self::Logarithm2,
        Self::Logarithm10,
        Self::SquareRoot,
        Self::InverseSquareRoot,
        Self::DDX,
        Self::DDY,
        Self::FWidth,
        Self::Negate,
        Self::OneMinus,
        Self::Saturate,
        Self::Min,
        Self::Max,
        Self::Power,
        Self::Step,
        Self::Fmod,
        Self::Clamp,
        Self::Mix,
        Self::Smoothstep,
        Self::InverseLerp,
        Self::ScaleAndOffset,
    ];

    pub(crate) fn type_id(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Abs => "Abs",
            Self::Ceil => "Ceil",
            Self::Floor => "Floor",
            Self::Fract => "Fract",
            Self::Round => "Round",
            Self::Sign => "Sign",
            Self::Truncate => "Truncate",
            Self::Exp => "Exp",
            Self::Exp2 => "Exp2",
            Self::Logarithm => "Logarithm",
            Self::Logarithm2 => "Logarithm2",
            Self::Logarithm10 => "Logarithm10",
            Self::SquareRoot => "SquareRoot",
            Self::InverseSquareRoot => "InverseSquareRoot",
            Self::DDX => "DDX",
            Self::DDY => "DDY",
            Self::FWidth => "FWidth",
            Self::Negate => "Negate",
            Self::OneMinus => "OneMinus",
            Self::Saturate => "Saturate",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Power => "Power",
            Self::Step => "Step",
            Self::Fmod => "Fmod",
            Self::Clamp => "Clamp",
            Self::Mix => "Mix",
            Self::Smoothstep => "Smoothstep",
            Self::InverseLerp => "InverseLerp",
            Self::ScaleAndOffset => "ScaleAndOffset",
        }
    }

    pub(crate) fn signature(self) -> Signature {
        let call = |name| Signature::new(UNARY, Form::Call(name));
        let pattern = |pattern| Signature::new(UNARY, Form::Pattern(pattern));
        match self {
            Self::Add => Signature::new(BINARY, Form::Infix("+")),
            Self::Subtract => Signature::new(BINARY, Form::Infix("-")),
            Self::Multiply => Signature::new(BINARY, Form::Infix("*")),
            Self::Divide => Signature::new(BINARY, Form::Infix("/")),
            Self::Abs => call("abs"),
            Self::Ceil => call("ceil"),
            Self::Floor => call("floor"),
            Self::Fract => call("fract"),
            Self::Round => call("round"),
            Self::Sign => call("sign"),
            Self::Truncate => call("trunc"),
            Self::Exp => call("exp"),
            Self::Exp2 => call("exp2"),
            Self::Logarithm => call("log"),
            Self::Logarithm2 => call("log2"),
            Self::Logarithm10 => pattern("(log({0}) * 0.4342944819)"),
            Self::SquareRoot => call("sqrt"),
            Self::InverseSquareRoot => call("inversesqrt"),
            Self::DDX => call("dFdx"),
            Self::DDY => call("dFdy"),
            Self::FWidth => call("fwidth"),
            Self::Negate => pattern("(-{0})"),
            Self::OneMinus => pattern("(1.0 - {0})"),
            Self::Saturate => pattern("clamp({0}, 0.0, 1.0)"),
            Self::Min => Signature::new(BINARY, Form::Call("min")),
            Self::Max => Signature::new(BINARY, Form::Call("max")),
            Self::Power => Signature::new(POWER, Form::Call("pow")),
            Self::Step => Signature::new(STEP, Form::Call("step")),
            Self::Fmod => Signature::new(BINARY, Form::Call("mod")),
            Self::Clamp => Signature::new(CLAMP, Form::Call("clamp")),
            Self::Mix => Signature::new(MIX, Form::Call("mix")),
            Self::Smoothstep => Signature::new(SMOOTHSTEP, Form::Call("smoothstep")),
            Self::InverseLerp => {
                Signature::new(INVERSE_LERP, Form::Pattern("(({2} - {0}) / ({1} - {0}))"))
            }
            Self::ScaleAndOffset => {
                Signature::new(SCALE_AND_OFFSET, Form::Pattern("({0} * {1} + {2})"))
            }
        }
    }

    pub(crate) fn emit(self, cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
        // Matrix-vector products yield a vector of the matrix dimension
        if let (Self::Multiply, [a, b]) = (self, args) {
            let matrix = match (a.ty.is_matrix(), b.ty.is_matrix()) {
                (true, false) if b.ty.is_vector() => Some((a, b, true)),
                (false, true) if a.ty.is_vector() => Some((b, a, false)),
                _ => None,
            };
            if let Some((matrix, vector, matrix_first)) = matrix {
                let ty = match matrix.ty {
                    PortType::Matrix3 => PortType::Vector3,
                    _ => PortType::Vector4,
                };
                let vector = cx.convert(node, &vector.expr, vector.ty, ty);
                let expr = if matrix_first {
                    format!("({} * {})", matrix.expr, vector)
                } else {
                    format!("({} * {})", vector, matrix.expr)
                };
                return Some(Emitted::new(expr, ty));
            }
        }
        self.signature().emit(cx, node, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports() {
        let (inputs, outputs) = MathOp::Clamp.signature().ports();
        assert_eq!(inputs.len(), 3);
        assert!(inputs[0].required);
        assert!(!inputs[1].required);
        assert_eq!(outputs[0].port_type, PortType::Void);
    }

    #[test]
    fn test_all_is_complete() {
        let mut ids: Vec<&str> = MathOp::ALL.iter().map(|op| op.type_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MathOp::ALL.len());
    }
}
