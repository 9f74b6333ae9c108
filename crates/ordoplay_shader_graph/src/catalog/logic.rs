// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conditional branch.

use super::{Arg, Emitted};
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::{Port, PortType, PortValue};

/// Differences at or below this are treated as equal
const EPSILON: &str = "0.00001";

pub(crate) fn ports() -> (Vec<Port>, Vec<Port>) {
    let inputs = vec![
        Port::input("A", PortType::Float).required(),
        Port::input("B", PortType::Float).with_default(PortValue::Float(0.0)),
        Port::input("A>B", PortType::Void).required(),
        Port::input("A==B", PortType::Void),
        Port::input("A<B", PortType::Void).required(),
    ];
    (inputs, vec![Port::output("Output", PortType::Void)])
}

/// Selects `A>B` when `A >= B`, otherwise `A<B`. A connected `A==B` takes
/// over when the two are within [`EPSILON`].
pub(crate) fn emit(cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
    let [a, b, greater, equal, less] = args else {
        return None;
    };
    let ty = greater.ty;
    let less = cx.convert(node, &less.expr, less.ty, ty);

    let branch = format!("(({} >= {}) ? {} : {})", a.expr, b.expr, greater.expr, less);
    let expr = if equal.connected {
        let equal = cx.convert(node, &equal.expr, equal.ty, ty);
        format!(
            "((abs({} - {}) > {}) ? {} : {})",
            a.expr, b.expr, EPSILON, branch, equal
        )
    } else {
        branch
    };
    Some(Emitted::new(expr, ty))
}
