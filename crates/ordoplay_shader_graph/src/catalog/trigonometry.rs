// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trigonometric functions.

use super::signature::{common, Form, Param, Signature, UNARY};
use serde::{Deserialize, Serialize};

/// A trigonometric function
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrigOp {
    Sine,
    Cosine,
    Tangent,
    ArcSine,
    ArcCosine,
    ArcTangent,
    ArcTangent2,
    SineHyperbolic,
    CosineHyperbolic,
    TangentHyperbolic,
    Degrees,
    Radians,
}

const ATAN2: &[Param] = &[common("Y"), common("X")];

impl TrigOp {
    /// Every trigonometric function in menu order
    pub const ALL: [TrigOp; 12] = [
        Self::Sine,
        Self::Cosine,
        Self::Tangent,
        Self::ArcSine,
        Self::ArcCosine,
        Self::ArcTangent,
        Self::ArcTangent2,
        Self::SineHyperbolic,
        Self::CosineHyperbolic,
        Self::TangentHyperbolic,
        Self::Degrees,
        Self::Radians,
    ];

    pub(crate) fn type_id(self) -> &'static str {
        match self {
            Self::Sine => "Sine",
            Self::Cosine => "Cosine",
            Self::Tangent => "Tangent",
            Self::ArcSine => "ArcSine",
            Self::ArcCosine => "ArcCosine",
            Self::ArcTangent => "ArcTangent",
            Self::ArcTangent2 => "ArcTangent2",
            Self::SineHyperbolic => "SineHyperbolic",
            Self::CosineHyperbolic => "CosineHyperbolic",
            Self::TangentHyperbolic => "TangentHyperbolic",
            Self::Degrees => "Degrees",
            Self::Radians => "Radians",
        }
    }

    pub(crate) fn signature(self) -> Signature {
        let name = match self {
            Self::Sine => "sin",
            Self::Cosine => "cos",
            Self::Tangent => "tan",
            Self::ArcSine => "asin",
            Self::ArcCosine => "acos",
            Self::ArcTangent => "atan",
            Self::ArcTangent2 => return Signature::new(ATAN2, Form::Call("atan")),
            Self::SineHyperbolic => "sinh",
            Self::CosineHyperbolic => "cosh",
            Self::TangentHyperbolic => "tanh",
            Self::Degrees => "degrees",
            Self::Radians => "radians",
        };
        Signature::new(UNARY, Form::Call(name))
    }
}
