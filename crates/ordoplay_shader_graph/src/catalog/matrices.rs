// SPDX-License-Identifier: MIT OR Apache-2.0
//! Matrix operations.

use super::{Arg, Emitted};
use crate::evaluation::StagePass;
use crate::port::{Port, PortType, PortValue};
use serde::{Deserialize, Serialize};

const EXTRACT_POSITION: &str = "vec4 ExtractPosition(mat4 m) {
    return vec4(m[3][0], m[3][1], m[3][2], m[3][3]);
}";

/// A matrix operation
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixOp {
    Determinant,
    Inverse,
    Transpose,
    MakeMatrix,
    ExtractPosition,
}

impl MatrixOp {
    /// Every matrix operation in menu order
    pub const ALL: [MatrixOp; 5] = [
        Self::Determinant,
        Self::Inverse,
        Self::Transpose,
        Self::MakeMatrix,
        Self::ExtractPosition,
    ];

    pub(crate) fn type_id(self) -> &'static str {
        match self {
            Self::Determinant => "Determinant",
            Self::Inverse => "Inverse",
            Self::Transpose => "Transpose",
            Self::MakeMatrix => "MakeMatrix",
            Self::ExtractPosition => "ExtractPosition",
        }
    }

    fn result_type(self) -> PortType {
        match self {
            Self::Determinant => PortType::Float,
            Self::Inverse | Self::Transpose | Self::MakeMatrix => PortType::Matrix4,
            Self::ExtractPosition => PortType::Vector4,
        }
    }

    pub(crate) fn ports(self) -> (Vec<Port>, Vec<Port>) {
        let inputs = match self {
            Self::MakeMatrix => (0..4)
                .map(|column| {
                    let mut value = [0.0; 4];
                    value[column] = 1.0;
                    Port::input(format!("Column{column}"), PortType::Vector4)
                        .with_default(PortValue::Vector4(value))
                })
                .collect(),
            _ => vec![Port::input("Matrix", PortType::Matrix4).with_default(PortValue::identity4())],
        };
        (inputs, vec![Port::output("Output", self.result_type())])
    }

    pub(crate) fn emit(self, cx: &mut StagePass<'_>, args: &[Arg]) -> Option<Emitted> {
        let operands: Vec<&str> = args.iter().map(|arg| arg.expr.as_str()).collect();
        let matrix = operands.first().copied().unwrap_or("mat4(1.0)");
        let expr = match self {
            Self::Determinant => format!("determinant({matrix})"),
            Self::Inverse => format!("inverse({matrix})"),
            Self::Transpose => format!("transpose({matrix})"),
            Self::MakeMatrix => format!("mat4({})", operands.join(", ")),
            Self::ExtractPosition => {
                cx.add_function("ExtractPosition", EXTRACT_POSITION);
                format!("ExtractPosition({matrix})")
            }
        };
        Some(Emitted::new(expr, self.result_type()))
    }
}
