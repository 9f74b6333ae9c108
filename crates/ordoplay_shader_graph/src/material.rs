// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material-level render settings stored alongside the graph.

use serde::{Deserialize, Serialize};

/// What the compiled material is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialType {
    /// Mesh surface
    #[default]
    Surface,
    /// Fullscreen post-process pass
    PostProcess,
    /// Light function
    LightFunction,
}

/// Blending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// No blending
    #[default]
    Opaque,
    /// Additive blending
    Additive,
    /// Alpha blending
    Translucent,
}

/// Lighting model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightModel {
    /// Emissive only
    Unlit,
    /// Standard PBR lighting
    #[default]
    Lit,
    /// Subsurface scattering
    Subsurface,
}

/// Render state of a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    /// Material usage
    pub material_type: MaterialType,
    /// Blending mode
    pub blend: BlendMode,
    /// Lighting model
    pub light_model: LightModel,
    /// Disable back-face culling
    pub double_sided: bool,
    /// Enable depth testing
    pub depth_test: bool,
    /// Enable depth writes
    pub depth_write: bool,
    /// Render as wireframe
    pub wireframe: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            material_type: MaterialType::Surface,
            blend: BlendMode::Opaque,
            light_model: LightModel::Lit,
            double_sided: false,
            depth_test: true,
            depth_write: true,
            wireframe: false,
        }
    }
}

impl MaterialSettings {
    /// Preprocessor block selecting blend mode and light model
    pub fn defines(&self) -> String {
        let blend = match self.blend {
            BlendMode::Opaque => "BLEND_OPAQUE",
            BlendMode::Additive => "BLEND_ADDITIVE",
            BlendMode::Translucent => "BLEND_TRANSLUCENT",
        };
        let model = match self.light_model {
            LightModel::Unlit => "MODEL_UNLIT",
            LightModel::Lit => "MODEL_LIT",
            LightModel::Subsurface => "MODEL_SUBSURFACE",
        };
        format!("#define {blend} 1\n#define {model} 1\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_defines() {
        assert_eq!(
            MaterialSettings::default().defines(),
            "#define BLEND_OPAQUE 1\n#define MODEL_LIT 1\n"
        );
    }

    #[test]
    fn test_translucent_unlit_defines() {
        let settings = MaterialSettings {
            blend: BlendMode::Translucent,
            light_model: LightModel::Unlit,
            ..MaterialSettings::default()
        };
        assert_eq!(
            settings.defines(),
            "#define BLEND_TRANSLUCENT 1\n#define MODEL_UNLIT 1\n"
        );
    }
}
