// SPDX-License-Identifier: MIT OR Apache-2.0
//! Widening a value and narrowing it back must preserve it.
//!
//! Generated conversions are evaluated by a small interpreter covering the
//! GLSL subset they produce: literals, `vecN`/`matN`/`int`/`float`
//! constructors and swizzles. Matrices are flattened column by column.

use ordoplay_shader_graph::convert::convert;
use ordoplay_shader_graph::{PortType, PortValue};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

struct Evaluator<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Evaluator<'a> {
    fn run(text: &'a str) -> Vec<f64> {
        let mut evaluator = Self {
            text: text.as_bytes(),
            pos: 0,
        };
        let value = evaluator.expr();
        assert_eq!(evaluator.pos, text.len(), "trailing input in {text}");
        value
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        let text = self.text;
        std::str::from_utf8(&text[start..self.pos]).unwrap()
    }

    fn expect(&mut self, byte: u8) {
        self.skip_spaces();
        assert_eq!(self.peek(), Some(byte), "at {}", self.pos);
        self.pos += 1;
    }

    fn expr(&mut self) -> Vec<f64> {
        self.skip_spaces();
        let mut value = match self.peek() {
            Some(c) if c == b'-' || c.is_ascii_digit() => {
                let literal = self.take_while(|c| c == b'-' || c == b'.' || c == b'e' || c.is_ascii_digit());
                vec![f64::from(literal.parse::<f32>().unwrap())]
            }
            _ => {
                let name = self.take_while(|c| c.is_ascii_alphanumeric());
                let args = self.arguments();
                match name {
                    "int" => vec![args[0].trunc()],
                    "float" => vec![args[0]],
                    "mat3" => matrix(3, &args),
                    "mat4" => matrix(4, &args),
                    _ => {
                        let size: usize = name.trim_start_matches("vec").parse().unwrap();
                        if args.len() == 1 {
                            vec![args[0]; size]
                        } else {
                            assert_eq!(args.len(), size, "{name} arguments");
                            args
                        }
                    }
                }
            }
        };

        while self.peek() == Some(b'.') {
            self.pos += 1;
            let swizzle = self.take_while(|c| b"xyzw".contains(&c));
            value = swizzle
                .bytes()
                .map(|c| value[b"xyzw".iter().position(|s| *s == c).unwrap()])
                .collect();
        }
        value
    }

    fn arguments(&mut self) -> Vec<f64> {
        self.expect(b'(');
        let mut components = self.expr();
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    components.extend(self.expr());
                }
                _ => break,
            }
        }
        self.expect(b')');
        components
    }
}

/// `matN` constructor: a scalar fills the diagonal, a smaller matrix is
/// embedded over the identity and a larger one is cut to its upper-left corner.
fn matrix(size: usize, args: &[f64]) -> Vec<f64> {
    if args.len() == size * size {
        return args.to_vec();
    }
    let (from, source): (usize, Vec<f64>) = match args.len() {
        1 => (size, (0..size * size).map(|i| if i % (size + 1) == 0 { args[0] } else { 0.0 }).collect()),
        9 => (3, args.to_vec()),
        16 => (4, args.to_vec()),
        n => panic!("mat{size} from {n} components"),
    };
    let mut result = Vec::with_capacity(size * size);
    for column in 0..size {
        for row in 0..size {
            result.push(if column < from && row < from {
                source[column * from + row]
            } else if column == row {
                1.0
            } else {
                0.0
            });
        }
    }
    result
}

fn value_of(ty: PortType, components: &[f32]) -> PortValue {
    match ty {
        PortType::Float => PortValue::Float(components[0]),
        PortType::Vector2 => PortValue::Vector2([components[0], components[1]]),
        PortType::Vector3 => PortValue::Vector3([components[0], components[1], components[2]]),
        _ => PortValue::Vector4([components[0], components[1], components[2], components[3]]),
    }
}

fn widening_pairs() -> impl Strategy<Value = (PortType, PortType)> {
    prop::sample::select(vec![
        (PortType::Float, PortType::Vector2),
        (PortType::Float, PortType::Vector3),
        (PortType::Float, PortType::Vector4),
        (PortType::Vector2, PortType::Vector3),
        (PortType::Vector2, PortType::Vector4),
        (PortType::Vector3, PortType::Vector4),
    ])
}

#[test]
fn test_evaluator() {
    assert_eq!(Evaluator::run("vec4(vec2(1.0, 2.0), 0.0, 1.0).yx"), vec![2.0, 1.0]);
    assert_eq!(Evaluator::run("int(float(-3))"), vec![-3.0]);
    assert_eq!(Evaluator::run("vec3(0.5).z"), vec![0.5]);
    assert_eq!(
        Evaluator::run("mat4(mat3(2.0))"),
        vec![2.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn test_matrix4_narrows_to_upper_left() {
    let values: Vec<f32> = (0..16u8).map(f32::from).collect();
    let mut columns = [0.0; 16];
    columns.copy_from_slice(&values);
    let narrowed = convert(&PortValue::Matrix4(columns).to_glsl(), PortType::Matrix4, PortType::Matrix3, 0);
    assert_eq!(
        Evaluator::run(&narrowed),
        vec![0.0, 1.0, 2.0, 4.0, 5.0, 6.0, 8.0, 9.0, 10.0]
    );
}

proptest! {
    #[test]
    fn test_widen_then_narrow_preserves_value(
        (from, to) in widening_pairs(),
        components in prop::array::uniform4(-1000.0f32..1000.0),
    ) {
        let original = value_of(from, &components);
        let widened = convert(&original.to_glsl(), from, to, 0);
        let narrowed = convert(&widened, to, from, 0);

        let result = Evaluator::run(&narrowed);
        prop_assert_eq!(result.len(), from.components());
        for (got, expected) in result.iter().zip(&components) {
            prop_assert!((got - f64::from(*expected)).abs() <= TOLERANCE, "{} != {}", got, expected);
        }
    }

    #[test]
    fn test_matrix3_through_matrix4(columns in prop::array::uniform9(-1000.0f32..1000.0)) {
        let original = PortValue::Matrix3(columns).to_glsl();
        let widened = convert(&original, PortType::Matrix3, PortType::Matrix4, 0);
        let narrowed = convert(&widened, PortType::Matrix4, PortType::Matrix3, 0);

        let expected: Vec<f64> = columns.iter().map(|c| f64::from(*c)).collect();
        prop_assert_eq!(Evaluator::run(&narrowed), expected);
    }

    #[test]
    fn test_int_through_float(value in -100_000i32..100_000) {
        let widened = convert(&PortValue::Int(value).to_glsl(), PortType::Int, PortType::Float, 0);
        let narrowed = convert(&widened, PortType::Float, PortType::Int, 0);
        prop_assert_eq!(Evaluator::run(&narrowed), vec![f64::from(value)]);
    }
}
