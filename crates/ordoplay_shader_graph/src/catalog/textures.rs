// SPDX-License-Identifier: MIT OR Apache-2.0
//! Texture sampling nodes.

use super::{Arg, Emitted};
use crate::bindings::TextureFlags;
use crate::diagnostics::Severity;
use crate::evaluation::StagePass;
use crate::node::Node;
use crate::port::{Port, PortType};
use serde::{Deserialize, Serialize};

/// A node reading from a texture binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureNode {
    /// Sample a 2D texture asset
    Sample {
        /// Asset path
        path: String,
    },
    /// Sample a render target produced by the pipeline
    RenderTarget {
        /// Render target name
        target: String,
    },
    /// Sample a cube map asset
    Cube {
        /// Asset path
        path: String,
    },
    /// Pass the sampler itself to a function input
    Object {
        /// Asset path
        path: String,
    },
}

impl TextureNode {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::Sample { .. } => "TextureSample",
            Self::RenderTarget { .. } => "RenderTargetSample",
            Self::Cube { .. } => "TextureSampleCube",
            Self::Object { .. } => "TextureObject",
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            Self::Sample { .. } => "Samples a 2D texture",
            Self::RenderTarget { .. } => "Samples a pipeline render target",
            Self::Cube { .. } => "Samples a cube map",
            Self::Object { .. } => "Texture sampler for function inputs",
        }
    }

    fn source(&self) -> (&str, TextureFlags) {
        match self {
            Self::Sample { path } | Self::Object { path } => (path, TextureFlags::empty()),
            Self::RenderTarget { target } => (target, TextureFlags::TARGET),
            Self::Cube { path } => (path, TextureFlags::CUBE),
        }
    }

    pub(crate) fn ports(&self) -> (Vec<Port>, Vec<Port>) {
        let coordinates = match self {
            Self::Object { .. } => {
                return (Vec::new(), vec![Port::output("Texture", PortType::Texture2D)]);
            }
            Self::Cube { .. } => Port::input("Direction", PortType::Vector3),
            _ => Port::input("UV", PortType::Vector2),
        };
        let outputs = vec![
            Port::output("RGBA", PortType::Vector4),
            Port::output("R", PortType::Float),
            Port::output("G", PortType::Float),
            Port::output("B", PortType::Float),
            Port::output("A", PortType::Float),
        ];
        (vec![coordinates], outputs)
    }

    pub(crate) fn emit(&self, cx: &mut StagePass<'_>, node: &Node, args: &[Arg]) -> Option<Emitted> {
        let (source, flags) = self.source();
        if source.is_empty() {
            cx.report(node, Severity::Error, "Missing texture");
            return None;
        }

        let index = cx.bindings().add_texture(source, flags);
        let sampler = cx.bindings().texture_name(index);
        if let Self::Object { .. } = self {
            return Some(Emitted::new(sampler, PortType::Texture2D));
        }

        let coordinates = match args.first() {
            Some(arg) if arg.connected => arg.expr.clone(),
            _ => match self {
                Self::Cube { .. } => format!("vec3({}, 1.0)", cx.settings().default_uv),
                _ => cx.settings().default_uv.clone(),
            },
        };
        Some(Emitted::new(
            format!("texture({sampler}, {coordinates})"),
            PortType::Vector4,
        ))
    }

    pub(crate) fn defaults() -> Vec<TextureNode> {
        vec![
            Self::Sample { path: String::new() },
            Self::RenderTarget {
                target: String::new(),
            },
            Self::Cube { path: String::new() },
            Self::Object { path: String::new() },
        ]
    }
}
