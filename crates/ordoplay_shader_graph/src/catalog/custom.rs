// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nodes calling functions from the [`FunctionLibrary`](crate::functions::FunctionLibrary).

use super::{Arg, Emitted};
use crate::diagnostics::Severity;
use crate::evaluation::StagePass;
use crate::functions::FunctionDefinition;
use crate::node::Node;
use crate::port::Port;

/// Ports mirroring the function signature. Inputs without a default are required.
pub(crate) fn ports(definition: &FunctionDefinition) -> (Vec<Port>, Vec<Port>) {
    let inputs = definition
        .inputs
        .iter()
        .map(|param| {
            let port = Port::input(param.name.as_str(), param.ty);
            match &param.default {
                Some(value) => port.with_default(value.clone()),
                None => port.required(),
            }
        })
        .collect();
    let outputs = definition
        .outputs
        .iter()
        .map(|param| Port::output(param.name.as_str(), param.ty))
        .collect();
    (inputs, outputs)
}

pub(crate) fn emit(cx: &mut StagePass<'_>, node: &Node, function: &str, args: &[Arg]) -> Option<Emitted> {
    let Some(definition) = cx.library().get(function) else {
        cx.report(node, Severity::Error, format!("Unknown function {function}"));
        return None;
    };
    if let Err(e) = definition.validate() {
        cx.report(node, Severity::Error, e.to_string());
        return None;
    }
    let ty = definition.return_type();
    let code = definition.code.clone();

    cx.add_function(function, &code);
    let operands: Vec<&str> = args.iter().map(|arg| arg.expr.as_str()).collect();
    Some(Emitted::new(format!("{}({})", function, operands.join(", ")), ty))
}
