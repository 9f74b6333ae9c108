// SPDX-License-Identifier: MIT OR Apache-2.0
//! Final program assembly.
//!
//! Binding slots are assigned here, after both stages have registered their
//! resources: the uniform block first when it has fields, then every texture
//! in registration order.

use crate::bindings::{HelperFunction, ResourceBindings, TextureFlags, UniformField};
use crate::evaluation::CompileError;
use crate::material::MaterialSettings;
use crate::port::Stage;
use crate::settings::CompilerSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Generated code of one shader stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgram {
    /// Stage the code belongs to
    pub stage: Stage,
    /// Local declarations followed by material channel assignments
    pub statements: String,
    /// Helper function definitions called by `statements`
    pub functions: String,
    /// Declarations, functions and statements concatenated
    pub source: String,
}

/// A texture with its assigned binding slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Binding slot
    pub binding: u32,
    /// Sampler name used in the generated code
    pub name: String,
    /// Asset path or render-target name
    pub source: String,
    /// Sampling flags
    pub flags: TextureFlags,
}

/// Result of compiling a material graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    /// Vertex stage
    pub vertex: StageProgram,
    /// Fragment stage
    pub fragment: StageProgram,
    /// Uniform block and sampler declarations shared by both stages
    pub layout: String,
    /// `#define` lines derived from the material settings
    pub defines: String,
    /// Binding slot of the uniform block, `None` when it has no fields
    pub uniform_binding: Option<u32>,
    /// Uniform block fields in declaration order
    pub uniforms: Vec<UniformField>,
    /// Textures in binding order
    pub textures: Vec<TextureBinding>,
    /// Helper functions in registration order
    pub functions: Vec<HelperFunction>,
}

impl CompiledProgram {
    /// Program of `stage`
    pub fn stage(&self, stage: Stage) -> &StageProgram {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    /// Uniform field by name
    pub fn uniform(&self, name: &str) -> Option<&UniformField> {
        self.uniforms.iter().find(|field| field.name == name)
    }

    /// Template pragmas substituted into the shader skeleton
    pub fn pragmas(&self) -> IndexMap<&'static str, String> {
        let mut pragmas = IndexMap::new();
        pragmas.insert("vertex", self.vertex.statements.clone());
        pragmas.insert("fragment", self.fragment.statements.clone());
        pragmas.insert("uniforms", self.layout.clone());
        pragmas.insert("vertexFunctions", self.vertex.functions.clone());
        pragmas.insert("fragmentFunctions", self.fragment.functions.clone());
        pragmas
    }
}

pub(crate) fn assemble(
    vertex: String,
    fragment: String,
    bindings: &ResourceBindings,
    material: &MaterialSettings,
    settings: &CompilerSettings,
) -> Result<CompiledProgram, CompileError> {
    let required = u32::from(bindings.has_uniforms()) + bindings.textures().len() as u32;
    if let Some(available) = settings.max_bindings {
        if required > available {
            return Err(CompileError::BindingExhausted { required, available });
        }
    }

    let mut next = settings.uniform_binding;
    let mut layout = String::new();
    let uniforms = bindings.uniform_fields();

    let uniform_binding = if uniforms.is_empty() {
        None
    } else {
        layout.push_str(&format!("layout(binding = {next}) uniform Uniforms {{\n"));
        for field in &uniforms {
            layout.push_str(&format!("\t{} {};\n", field.ty.glsl(), field.name));
        }
        layout.push_str("} uni;\n");
        next += 1;
        Some(next - 1)
    };

    let mut textures = Vec::with_capacity(bindings.textures().len());
    for (index, texture) in bindings.textures().iter().enumerate() {
        let name = bindings.texture_name(index);
        let sampler = if texture.flags.contains(TextureFlags::CUBE) {
            "samplerCube"
        } else {
            "sampler2D"
        };
        layout.push_str(&format!("layout(binding = {next}) uniform {sampler} {name};\n"));
        textures.push(TextureBinding {
            binding: next,
            name,
            source: texture.source.clone(),
            flags: texture.flags,
        });
        next += 1;
    }

    let functions: Vec<HelperFunction> = bindings.functions().cloned().collect();
    let stage_program = |stage: Stage, statements: String| {
        let code: String = functions
            .iter()
            .filter(|f| f.stages.contains(&stage))
            .map(|f| format!("{}\n", f.body))
            .collect();
        StageProgram {
            stage,
            source: format!("{layout}{code}{statements}"),
            functions: code,
            statements,
        }
    };

    let vertex = stage_program(Stage::Vertex, vertex);
    let fragment = stage_program(Stage::Fragment, fragment);

    Ok(CompiledProgram {
        vertex,
        fragment,
        layout,
        defines: material.defines(),
        uniform_binding,
        uniforms,
        textures,
        functions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortType, PortValue};

    #[test]
    fn test_layout_numbering() {
        let mut bindings = ResourceBindings::new();
        bindings.add_uniform("roughnessScale", PortType::Float, PortValue::Float(1.0));
        bindings.add_texture("brick.png", TextureFlags::empty());
        bindings.add_texture("sky.dds", TextureFlags::CUBE);

        let program = assemble(
            String::new(),
            String::new(),
            &bindings,
            &MaterialSettings::default(),
            &CompilerSettings::default(),
        )
        .unwrap();

        assert_eq!(
            program.layout,
            "layout(binding = 1) uniform Uniforms {\n\tfloat roughnessScale;\n} uni;\n\
             layout(binding = 2) uniform sampler2D texture0;\n\
             layout(binding = 3) uniform samplerCube texture1;\n"
        );
        assert_eq!(program.uniform_binding, Some(1));
        assert_eq!(program.textures[1].binding, 3);
    }

    #[test]
    fn test_textures_start_at_base_without_uniforms() {
        let mut bindings = ResourceBindings::new();
        bindings.add_texture("shadow", TextureFlags::TARGET);

        let program = assemble(
            String::new(),
            String::new(),
            &bindings,
            &MaterialSettings::default(),
            &CompilerSettings::default(),
        )
        .unwrap();

        assert_eq!(program.uniform_binding, None);
        assert_eq!(program.layout, "layout(binding = 1) uniform sampler2D shadow;\n");
    }

    #[test]
    fn test_functions_split_by_stage() {
        let mut bindings = ResourceBindings::new();
        bindings.add_function("Wave", "float Wave() { return 1.0; }", Stage::Vertex);
        bindings.add_function("Tint", "vec3 Tint() { return vec3(1.0); }", Stage::Fragment);

        let program = assemble(
            "\tPositionOffset = vec3(Wave());\n".to_string(),
            String::new(),
            &bindings,
            &MaterialSettings::default(),
            &CompilerSettings::default(),
        )
        .unwrap();

        assert_eq!(program.vertex.functions, "float Wave() { return 1.0; }\n");
        assert_eq!(program.fragment.functions, "vec3 Tint() { return vec3(1.0); }\n");
        assert_eq!(
            program.vertex.source,
            "float Wave() { return 1.0; }\n\tPositionOffset = vec3(Wave());\n"
        );

        let pragmas = program.pragmas();
        let keys: Vec<&str> = pragmas.keys().copied().collect();
        assert_eq!(
            keys,
            ["vertex", "fragment", "uniforms", "vertexFunctions", "fragmentFunctions"]
        );
    }

    #[test]
    fn test_binding_exhaustion() {
        let mut bindings = ResourceBindings::new();
        bindings.add_uniform("scale", PortType::Float, PortValue::Float(1.0));
        bindings.add_texture("a.png", TextureFlags::empty());
        let settings = CompilerSettings {
            max_bindings: Some(1),
            ..CompilerSettings::default()
        };

        let result = assemble(
            String::new(),
            String::new(),
            &bindings,
            &MaterialSettings::default(),
            &settings,
        );
        assert!(matches!(
            result,
            Err(CompileError::BindingExhausted {
                required: 2,
                available: 1
            })
        ));
    }
}
