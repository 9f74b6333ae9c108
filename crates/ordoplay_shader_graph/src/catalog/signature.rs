// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative signatures for operator and intrinsic nodes.

use super::{Arg, Emitted};
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::{Port, PortType, PortValue};

/// How an operand's type is chosen
#[derive(Debug, Clone, Copy)]
pub(crate) enum Operand {
    /// Converted to the operation's common type
    Common,
    /// Declared with a fixed type
    Fixed(PortType),
}

/// Result type of an operation
#[derive(Debug, Clone, Copy)]
pub(crate) enum Returns {
    /// Same as the common operand type
    Common,
    /// Always this type
    Fixed(PortType),
}

/// Shape of the generated expression
#[derive(Debug, Clone, Copy)]
pub(crate) enum Form {
    /// `(a <op> b)`
    Infix(&'static str),
    /// `name(a, b, ...)`
    Call(&'static str),
    /// Template with `{0}`, `{1}`, ... placeholders
    Pattern(&'static str),
}

/// One named operand
#[derive(Debug, Clone, Copy)]
pub(crate) struct Param {
    pub name: &'static str,
    pub operand: Operand,
    pub default: Option<f32>,
}

pub(crate) const fn common(name: &'static str) -> Param {
    Param {
        name,
        operand: Operand::Common,
        default: None,
    }
}

pub(crate) const fn fixed(name: &'static str, ty: PortType) -> Param {
    Param {
        name,
        operand: Operand::Fixed(ty),
        default: None,
    }
}

impl Param {
    pub(crate) const fn or(self, default: f32) -> Self {
        Param {
            default: Some(default),
            ..self
        }
    }
}

pub(crate) const UNARY: &[Param] = &[common("X")];
pub(crate) const BINARY: &[Param] = &[common("A"), common("B")];

/// Operands, expression shape and result type of an operation
#[derive(Debug, Clone, Copy)]
pub(crate) struct Signature {
    pub params: &'static [Param],
    pub form: Form,
    pub returns: Returns,
}

impl Signature {
    pub(crate) const fn new(params: &'static [Param], form: Form) -> Self {
        Self {
            params,
            form,
            returns: Returns::Common,
        }
    }

    pub(crate) const fn returning(self, ty: PortType) -> Self {
        Self {
            returns: Returns::Fixed(ty),
            ..self
        }
    }

    /// Input ports, plus a single `Output` port of `output_type`
    pub(crate) fn ports(&self) -> (Vec<Port>, Vec<Port>) {
        let inputs = self
            .params
            .iter()
            .map(|param| {
                let ty = match param.operand {
                    Operand::Common => PortType::Void,
                    Operand::Fixed(ty) => ty,
                };
                let port = Port::input(param.name, ty);
                match param.default {
                    Some(value) => port.with_default(PortValue::Float(value)),
                    None => port.required(),
                }
            })
            .collect();
        let output = match self.returns {
            Returns::Common => PortType::Void,
            Returns::Fixed(ty) => ty,
        };
        (inputs, vec![Port::output("Output", output)])
    }

    /// Type shared by the common operands: the first connected one, or `Float`.
    ///
    /// Intrinsic calls have no integer overloads, so `Int` is promoted there.
    pub(crate) fn common_type(&self, args: &[Arg]) -> PortType {
        let ty = self
            .params
            .iter()
            .zip(args)
            .find(|(param, arg)| matches!(param.operand, Operand::Common) && arg.connected)
            .map_or(PortType::Float, |(_, arg)| arg.ty);
        match (self.form, ty) {
            (Form::Infix(_), ty) => ty,
            (_, PortType::Int) => PortType::Float,
            (_, ty) => ty,
        }
    }

    pub(crate) fn emit(&self, cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
        let common = self.common_type(args);
        let mut operands = Vec::with_capacity(args.len());
        for (param, arg) in self.params.iter().zip(args) {
            let operand = match param.operand {
                Operand::Common => cx.convert(node, &arg.expr, arg.ty, common),
                Operand::Fixed(_) => arg.expr.clone(),
            };
            operands.push(operand);
        }
        let ty = match self.returns {
            Returns::Common => common,
            Returns::Fixed(ty) => ty,
        };
        Some(Emitted::new(self.form.apply(&operands), ty))
    }
}

impl Form {
    pub(crate) fn apply(&self, operands: &[String]) -> String {
        match self {
            Self::Infix(op) => format!(
                "({} {} {})",
                operand(operands, 0),
                op,
                operand(operands, 1)
            ),
            Self::Call(name) => format!("{}({})", name, operands.join(", ")),
            Self::Pattern(pattern) => fill(pattern, operands),
        }
    }
}

fn operand(operands: &[String], index: usize) -> &str {
    operands.get(index).map_or("0.0", String::as_str)
}

/// Substitute `{N}` placeholders
pub(crate) fn fill(pattern: &str, operands: &[String]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find('}').and_then(|end| Some((end, tail[..end].parse::<usize>().ok()?))) {
            Some((end, index)) => {
                out.push_str(operand(operands, index));
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        let operands = vec!["a".to_string(), "b".to_string(), "x".to_string()];
        assert_eq!(fill("(({2} - {0}) / ({1} - {0}))", &operands), "((x - a) / (b - a))");
        assert_eq!(fill("{ {9}", &operands), "{ 0.0");
    }

    #[test]
    fn test_forms() {
        let operands = vec!["a".to_string(), "b".to_string()];
        assert_eq!(Form::Infix("*").apply(&operands), "(a * b)");
        assert_eq!(Form::Call("max").apply(&operands), "max(a, b)");
    }

    #[test]
    fn test_common_type() {
        let signature = Signature::new(BINARY, Form::Call("max"));
        let args = vec![
            Arg::new("1.0", PortType::Float, false),
            Arg::new("v", PortType::Vector3, true),
        ];
        assert_eq!(signature.common_type(&args), PortType::Vector3);

        let ints = vec![Arg::new("i", PortType::Int, true), Arg::new("j", PortType::Int, true)];
        assert_eq!(signature.common_type(&ints), PortType::Float);
        let add = Signature::new(BINARY, Form::Infix("+"));
        assert_eq!(add.common_type(&ints), PortType::Int);
    }
}
