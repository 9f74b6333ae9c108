// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resource tables collected while compiling a graph.
//!
//! One [`ResourceBindings`] is shared by every stage pass of a compilation so
//! that a texture or parameter used by both stages is declared once.

use crate::port::{PortType, PortValue, Stage};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// How a texture binding is sampled
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TextureFlags: u32 {
        /// Sampled as a cube map
        const CUBE = 1 << 0;
        /// Render target produced by the pipeline rather than an asset
        const TARGET = 1 << 1;
    }
}

/// A material parameter in the uniform block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformDecl {
    /// Field name inside the block
    pub name: String,
    /// Field type
    pub ty: PortType,
    /// Array element count
    pub count: u32,
    /// Initial value
    pub value: PortValue,
}

/// A uniform field with its computed std140 placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformField {
    /// Field name inside the block
    pub name: String,
    /// Field type
    pub ty: PortType,
    /// Byte offset from the start of the block
    pub offset: u32,
    /// Byte size of the value (`type size * count`)
    pub size: u32,
    /// Array element count
    pub count: u32,
    /// Initial value
    pub value: PortValue,
}

/// A texture referenced by the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureDecl {
    /// Asset path, or render-target name when `flags` contains `TARGET`
    pub source: String,
    /// Sampling flags
    pub flags: TextureFlags,
}

/// A helper function emitted ahead of the statements that call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperFunction {
    /// Function name
    pub name: String,
    /// Full GLSL definition
    pub body: String,
    /// Stages whose code calls the function
    pub stages: Vec<Stage>,
}

/// Deduplicating collector for uniforms, textures and helper functions
#[derive(Debug, Clone, Default)]
pub struct ResourceBindings {
    uniforms: IndexMap<String, UniformDecl>,
    textures: Vec<TextureDecl>,
    functions: IndexMap<String, HelperFunction>,
}

impl ResourceBindings {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a uniform, returning its index in the block.
    ///
    /// Re-declaring a name updates its type and value in place.
    pub fn add_uniform(&mut self, name: &str, ty: PortType, value: PortValue) -> usize {
        if let Some((index, _, decl)) = self.uniforms.get_full_mut(name) {
            decl.ty = ty;
            decl.value = value;
            return index;
        }
        let (index, _) = self.uniforms.insert_full(
            name.to_string(),
            UniformDecl {
                name: name.to_string(),
                ty,
                count: 1,
                value,
            },
        );
        index
    }

    /// Declare a texture, returning its index. Textures merge by source and flags.
    pub fn add_texture(&mut self, source: &str, flags: TextureFlags) -> usize {
        if let Some(index) = self
            .textures
            .iter()
            .position(|t| t.source == source && t.flags == flags)
        {
            return index;
        }
        self.textures.push(TextureDecl {
            source: source.to_string(),
            flags,
        });
        self.textures.len() - 1
    }

    /// Sampler name for the texture at `index`
    pub fn texture_name(&self, index: usize) -> String {
        match self.textures.get(index) {
            Some(texture) if texture.flags.contains(TextureFlags::TARGET) => texture.source.clone(),
            _ => format!("texture{index}"),
        }
    }

    /// Register a helper function for `stage`.
    ///
    /// Returns `true` on first registration; later bodies under the same name are ignored.
    pub fn add_function(&mut self, name: &str, body: &str, stage: Stage) -> bool {
        if let Some(existing) = self.functions.get_mut(name) {
            if !existing.stages.contains(&stage) {
                existing.stages.push(stage);
            }
            return false;
        }
        self.functions.insert(
            name.to_string(),
            HelperFunction {
                name: name.to_string(),
                body: body.to_string(),
                stages: vec![stage],
            },
        );
        true
    }

    /// Declared uniforms in insertion order
    pub fn uniforms(&self) -> impl Iterator<Item = &UniformDecl> {
        self.uniforms.values()
    }

    /// Declared textures in insertion order
    pub fn textures(&self) -> &[TextureDecl] {
        &self.textures
    }

    /// Registered helper functions in insertion order
    pub fn functions(&self) -> impl Iterator<Item = &HelperFunction> {
        self.functions.values()
    }

    /// Whether the uniform block has any fields
    pub fn has_uniforms(&self) -> bool {
        !self.uniforms.is_empty()
    }

    /// Uniform fields with std140 offsets
    pub fn uniform_fields(&self) -> Vec<UniformField> {
        let mut offset = 0u32;
        self.uniforms
            .values()
            .map(|decl| {
                let alignment = decl.ty.alignment().max(1);
                offset = offset.div_ceil(alignment) * alignment;
                let field = UniformField {
                    name: decl.name.clone(),
                    ty: decl.ty,
                    offset,
                    size: decl.ty.size() * decl.count,
                    count: decl.count,
                    value: decl.value.clone(),
                };
                offset += decl.ty.std140_extent() * decl.count;
                field
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_merge_by_name() {
        let mut bindings = ResourceBindings::new();
        assert_eq!(bindings.add_uniform("tint", PortType::Float, PortValue::Float(1.0)), 0);
        assert_eq!(bindings.add_uniform("scale", PortType::Float, PortValue::Float(2.0)), 1);
        assert_eq!(
            bindings.add_uniform("tint", PortType::Vector4, PortValue::Vector4([1.0; 4])),
            0
        );

        let tint = bindings.uniforms().next().unwrap();
        assert_eq!(tint.ty, PortType::Vector4);
        assert_eq!(tint.value, PortValue::Vector4([1.0; 4]));
        assert_eq!(bindings.uniforms().count(), 2);
    }

    #[test]
    fn test_textures_merge_by_source_and_flags() {
        let mut bindings = ResourceBindings::new();
        assert_eq!(bindings.add_texture("brick.png", TextureFlags::empty()), 0);
        assert_eq!(bindings.add_texture("brick.png", TextureFlags::empty()), 0);
        assert_eq!(bindings.add_texture("brick.png", TextureFlags::CUBE), 1);
        assert_eq!(bindings.add_texture("depthMap", TextureFlags::TARGET), 2);

        assert_eq!(bindings.texture_name(0), "texture0");
        assert_eq!(bindings.texture_name(1), "texture1");
        assert_eq!(bindings.texture_name(2), "depthMap");
    }

    #[test]
    fn test_first_function_body_wins() {
        let mut bindings = ResourceBindings::new();
        assert!(bindings.add_function("Tint", "first", Stage::Fragment));
        assert!(!bindings.add_function("Tint", "second", Stage::Vertex));
        assert!(!bindings.add_function("Tint", "third", Stage::Fragment));

        let function = bindings.functions().next().unwrap();
        assert_eq!(function.body, "first");
        assert_eq!(function.stages, vec![Stage::Fragment, Stage::Vertex]);
    }

    #[test]
    fn test_std140_offsets() {
        let mut bindings = ResourceBindings::new();
        bindings.add_uniform("a", PortType::Float, PortValue::Float(0.0));
        bindings.add_uniform("b", PortType::Vector3, PortValue::Vector3([0.0; 3]));
        bindings.add_uniform("c", PortType::Float, PortValue::Float(0.0));
        bindings.add_uniform("d", PortType::Vector2, PortValue::Vector2([0.0; 2]));
        bindings.add_uniform("e", PortType::Matrix4, PortValue::identity4());

        let offsets: Vec<u32> = bindings.uniform_fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 16, 28, 32, 48]);

        let sizes: Vec<u32> = bindings.uniform_fields().iter().map(|f| f.size).collect();
        assert_eq!(sizes, vec![4, 12, 4, 8, 64]);
    }
}
