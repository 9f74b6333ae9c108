// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in inputs provided by the engine's shader templates.

use super::Emitted;
use crate::port::{format_float, Port, PortType};
use serde::{Deserialize, Serialize};

/// Which time value to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeQuery {
    /// Seconds since start
    Time,
    /// Seconds since the previous frame
    DeltaTime,
    /// Sine of the time
    SinTime,
    /// Cosine of the time
    CosTime,
}

/// A built-in shader input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputQuery {
    /// World-space camera position
    CameraPosition,
    /// World-space camera target
    CameraDirection,
    /// Screen size as (width, height, 1/width, 1/height)
    ScreenSize,
    /// Fragment coordinate, optionally divided by the screen size
    ScreenPosition {
        /// Divide by the screen size
        normalized: bool,
    },
    /// Camera projection matrix
    ProjectionMatrix,
    /// Mesh texture coordinate set
    TexCoord {
        /// UV set index
        index: u8,
    },
    /// Clip-space position remapped to [0, 1]
    ProjectionCoord,
    /// World-space position
    WorldPosition,
    /// World-space normal
    WorldNormal,
    /// World-space tangent
    WorldTangent,
    /// World-space bitangent
    WorldBitangent,
    /// Time value, multiplied by `scale`
    Time {
        /// Time value to read
        query: TimeQuery,
        /// Multiplier applied to the time
        scale: f32,
    },
}

impl InputQuery {
    pub(crate) fn type_id(&self) -> &'static str {
        match self {
            Self::CameraPosition => "CameraPosition",
            Self::CameraDirection => "CameraDirection",
            Self::ScreenSize => "ScreenSize",
            Self::ScreenPosition { .. } => "ScreenPosition",
            Self::ProjectionMatrix => "ProjectionMatrix",
            Self::TexCoord { .. } => "TexCoord",
            Self::ProjectionCoord => "ProjectionCoord",
            Self::WorldPosition => "WorldPosition",
            Self::WorldNormal => "WorldNormal",
            Self::WorldTangent => "WorldTangent",
            Self::WorldBitangent => "WorldBitangent",
            Self::Time { query, .. } => match query {
                TimeQuery::Time => "Time",
                TimeQuery::DeltaTime => "DeltaTime",
                TimeQuery::SinTime => "SinTime",
                TimeQuery::CosTime => "CosTime",
            },
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            Self::CameraPosition | Self::CameraDirection | Self::ProjectionMatrix => {
                "Camera property"
            }
            Self::ScreenSize | Self::ScreenPosition { .. } => "Screen-space value",
            Self::TexCoord { .. } | Self::ProjectionCoord => "Texture coordinates",
            Self::WorldPosition | Self::WorldNormal | Self::WorldTangent | Self::WorldBitangent => {
                "World-space surface attribute"
            }
            Self::Time { .. } => "Time value, optionally scaled",
        }
    }

    fn value_type(&self) -> PortType {
        match self {
            Self::ScreenSize | Self::ScreenPosition { .. } => PortType::Vector4,
            Self::ProjectionMatrix => PortType::Matrix4,
            Self::TexCoord { .. } => PortType::Vector2,
            Self::Time { .. } => PortType::Float,
            _ => PortType::Vector3,
        }
    }

    pub(crate) fn outputs(&self) -> Vec<Port> {
        let channels: &[&str] = match self {
            Self::ScreenSize => &["Width", "Height", "1/Width", "1/Height"],
            Self::ScreenPosition { .. } => &["X", "Y", "Z", "W"],
            _ => &[],
        };
        std::iter::once(Port::output("Output", self.value_type()))
            .chain(channels.iter().map(|name| Port::output(*name, PortType::Float)))
            .collect()
    }

    pub(crate) fn emit(&self) -> Emitted {
        let expr = match self {
            Self::CameraPosition => "g.cameraPosition.xyz".to_string(),
            Self::CameraDirection => "g.cameraTarget.xyz".to_string(),
            Self::ScreenSize => "g.cameraScreen".to_string(),
            Self::ScreenPosition { normalized: false } => "gl_FragCoord".to_string(),
            Self::ScreenPosition { normalized: true } => "(gl_FragCoord / g.cameraScreen)".to_string(),
            Self::ProjectionMatrix => "g.projection".to_string(),
            Self::TexCoord { index } => format!("_uv{index}"),
            Self::ProjectionCoord => "(0.5 * (_vertex.xyz / _vertex.w) + 0.5)".to_string(),
            Self::WorldPosition => "_vertex.xyz".to_string(),
            Self::WorldNormal => "_n".to_string(),
            Self::WorldTangent => "_t".to_string(),
            Self::WorldBitangent => "_b".to_string(),
            Self::Time { query, scale } => time(*query, *scale),
        };
        Emitted::new(expr, self.value_type())
    }

    pub(crate) fn defaults() -> Vec<InputQuery> {
        let mut queries = vec![
            Self::CameraPosition,
            Self::CameraDirection,
            Self::ScreenSize,
            Self::ScreenPosition { normalized: false },
            Self::ProjectionMatrix,
            Self::TexCoord { index: 0 },
            Self::ProjectionCoord,
            Self::WorldPosition,
            Self::WorldNormal,
            Self::WorldTangent,
            Self::WorldBitangent,
        ];
        for query in [
            TimeQuery::Time,
            TimeQuery::DeltaTime,
            TimeQuery::SinTime,
            TimeQuery::CosTime,
        ] {
            queries.push(Self::Time { query, scale: 1.0 });
        }
        queries
    }
}

fn time(query: TimeQuery, scale: f32) -> String {
    let base = match query {
        TimeQuery::DeltaTime => "g.deltaTime",
        _ => "g.time",
    };
    let scaled = if scale == 1.0 {
        base.to_string()
    } else {
        format!("{} * {}", base, format_float(scale))
    };
    match query {
        TimeQuery::Time | TimeQuery::DeltaTime if scale == 1.0 => scaled,
        TimeQuery::Time | TimeQuery::DeltaTime => format!("({scaled})"),
        TimeQuery::SinTime => format!("sin({scaled})"),
        TimeQuery::CosTime => format!("cos({scaled})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scaling() {
        let time = |query, scale| InputQuery::Time { query, scale }.emit().expr;
        assert_eq!(time(TimeQuery::Time, 1.0), "g.time");
        assert_eq!(time(TimeQuery::Time, 2.0), "(g.time * 2.0)");
        assert_eq!(time(TimeQuery::DeltaTime, 0.5), "(g.deltaTime * 0.5)");
        assert_eq!(time(TimeQuery::SinTime, 1.0), "sin(g.time)");
        assert_eq!(time(TimeQuery::CosTime, 3.0), "cos(g.time * 3.0)");
    }

    #[test]
    fn test_screen_outputs() {
        let outputs = InputQuery::ScreenSize.outputs();
        assert_eq!(outputs.len(), 5);
        assert_eq!(outputs[0].port_type, PortType::Vector4);
        assert_eq!(outputs[3].name, "1/Width");

        let coord = InputQuery::ScreenPosition { normalized: true }.emit();
        assert_eq!(coord.expr, "(gl_FragCoord / g.cameraScreen)");
    }
}
