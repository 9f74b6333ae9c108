// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compiler configuration, persisted as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// First binding slot; the uniform block takes it, textures follow
    pub uniform_binding: u32,
    /// Number of binding slots available, unlimited when `None`
    pub max_bindings: Option<u32>,
    /// Report unsupported type conversions as errors instead of warnings
    pub strict_conversions: bool,
    /// Texture coordinate used by samplers with no UV input connected
    pub default_uv: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            uniform_binding: 1,
            max_bindings: None,
            strict_conversions: false,
            default_uv: crate::convert::DEFAULT_UV.to_string(),
        }
    }
}

impl CompilerSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.uniform_binding, 1);
        assert_eq!(settings.max_bindings, None);
        assert!(!settings.strict_conversions);
        assert_eq!(settings.default_uv, "_uv0");
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings: CompilerSettings = ron::from_str("(max_bindings: Some(4))").unwrap();
        assert_eq!(settings.max_bindings, Some(4));
        assert_eq!(settings.uniform_binding, 1);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "ordoplay_shader_settings_{}.ron",
            uuid::Uuid::new_v4()
        ));
        let settings = CompilerSettings {
            uniform_binding: 3,
            strict_conversions: true,
            ..CompilerSettings::default()
        };
        settings.save(&path).unwrap();
        let loaded = CompilerSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }
}
