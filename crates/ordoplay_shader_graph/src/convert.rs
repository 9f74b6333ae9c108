// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between port value types.
//!
//! Every conversion is a `(prefix, suffix)` pair wrapped around the source
//! expression. Pairs missing from the table pass the expression through
//! unchanged; callers decide whether that deserves a diagnostic.

use crate::port::PortType;

/// Texture coordinate used when a sampler is narrowed to a value
pub const DEFAULT_UV: &str = "_uv0";

const COMPONENTS: [&str; 4] = [".x", ".y", ".z", ".w"];

/// Wrapper text converting `from` into `to`, or `None` when the pair is unsupported.
///
/// `component` picks the channel used when narrowing to a scalar.
pub fn template(from: PortType, to: PortType, component: u8) -> Option<(String, String)> {
    use PortType::*;

    if from == to || from == Void || to == Void {
        return Some((String::new(), String::new()));
    }

    let c = COMPONENTS[usize::from(component.min(3))];
    let (prefix, suffix) = match (to, from) {
        (Int, Float) => ("int(", ")".to_string()),
        (Int, Vector2 | Vector3 | Vector4) => ("int(", format!("{c})")),
        (Int, Matrix3 | Matrix4) => ("int(", format!("[0]{c})")),
        (Int, Texture2D) => ("int(texture(", format!(", {DEFAULT_UV}){c})")),

        (Float, Int) => ("float(", ")".to_string()),
        (Float, Vector2 | Vector3 | Vector4) => ("", c.to_string()),
        (Float, Matrix3 | Matrix4) => ("", format!("[0]{c}")),
        (Float, Texture2D) => ("texture(", format!(", {DEFAULT_UV}){c}")),

        (Vector2, Int) => ("vec2(float(", "))".to_string()),
        (Vector2, Float) => ("vec2(", ")".to_string()),
        (Vector2, Vector3 | Vector4) => ("", ".xy".to_string()),
        (Vector2, Matrix3 | Matrix4) => ("", "[0].xy".to_string()),
        (Vector2, Texture2D) => ("texture(", format!(", {DEFAULT_UV}).xy")),

        (Vector3, Int) => ("vec3(float(", "))".to_string()),
        (Vector3, Float) => ("vec3(", ")".to_string()),
        (Vector3, Vector2) => ("vec3(", ", 0.0)".to_string()),
        (Vector3, Vector4) => ("", ".xyz".to_string()),
        (Vector3, Matrix3 | Matrix4) => ("", "[0].xyz".to_string()),
        (Vector3, Texture2D) => ("texture(", format!(", {DEFAULT_UV}).xyz")),

        (Vector4, Int) => ("vec4(float(", "))".to_string()),
        (Vector4, Float) => ("vec4(", ")".to_string()),
        (Vector4, Vector2) => ("vec4(", ", 0.0, 1.0)".to_string()),
        (Vector4, Vector3) => ("vec4(", ", 1.0)".to_string()),
        (Vector4, Matrix3) => ("vec4(", "[0], 1.0)".to_string()),
        (Vector4, Matrix4) => ("", "[0]".to_string()),
        (Vector4, Texture2D) => ("texture(", format!(", {DEFAULT_UV})")),

        (Matrix3, Matrix4) => ("mat3(", ")".to_string()),
        (Matrix4, Matrix3) => ("mat4(", ")".to_string()),

        _ => return None,
    };
    Some((prefix.to_string(), suffix))
}

/// Whether `from` can be converted into `to`
pub fn is_supported(from: PortType, to: PortType) -> bool {
    template(from, to, 0).is_some()
}

/// Convert `expr` of type `from` into type `to`.
///
/// Unsupported pairs return `expr` unchanged.
pub fn convert(expr: &str, from: PortType, to: PortType, component: u8) -> String {
    match template(from, to, component) {
        Some((prefix, suffix)) => format!("{prefix}{expr}{suffix}"),
        None => expr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PortType::*;

    #[test]
    fn test_widening() {
        assert_eq!(convert("x", Float, Vector3, 0), "vec3(x)");
        assert_eq!(convert("x", Int, Vector2, 0), "vec2(float(x))");
        assert_eq!(convert("x", Vector2, Vector3, 0), "vec3(x, 0.0)");
        assert_eq!(convert("x", Vector2, Vector4, 0), "vec4(x, 0.0, 1.0)");
        assert_eq!(convert("x", Vector3, Vector4, 0), "vec4(x, 1.0)");
        assert_eq!(convert("m", Matrix3, Matrix4, 0), "mat4(m)");
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(convert("x", Vector4, Float, 0), "x.x");
        assert_eq!(convert("x", Vector4, Float, 2), "x.z");
        assert_eq!(convert("x", Vector3, Int, 1), "int(x.y)");
        assert_eq!(convert("x", Vector4, Vector3, 0), "x.xyz");
        assert_eq!(convert("m", Matrix4, Vector4, 0), "m[0]");
        assert_eq!(convert("m", Matrix3, Vector4, 0), "vec4(m[0], 1.0)");
        assert_eq!(convert("m", Matrix4, Float, 3), "m[0].w");
        assert_eq!(convert("m", Matrix4, Matrix3, 0), "mat3(m)");
    }

    #[test]
    fn test_texture_sources() {
        assert_eq!(convert("t", Texture2D, Vector4, 0), "texture(t, _uv0)");
        assert_eq!(convert("t", Texture2D, Vector3, 0), "texture(t, _uv0).xyz");
        assert_eq!(convert("t", Texture2D, Float, 0), "texture(t, _uv0).x");
        assert_eq!(convert("t", Texture2D, Int, 0), "int(texture(t, _uv0).x)");
    }

    #[test]
    fn test_identity_and_generic() {
        assert_eq!(convert("a + b", Vector3, Vector3, 0), "a + b");
        assert_eq!(convert("a", Void, Vector3, 0), "a");
        assert_eq!(convert("a", Vector3, Void, 0), "a");
    }

    #[test]
    fn test_unsupported_passes_through() {
        assert!(!is_supported(Vector3, Texture2D));
        assert!(!is_supported(TextureCube, Vector4));
        assert!(!is_supported(Float, Matrix4));
        assert_eq!(convert("v", Vector3, Texture2D, 0), "v");
    }
}
