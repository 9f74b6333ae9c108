// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material output channels.

use crate::port::{Port, PortType, PortValue, Stage};

/// Inputs of the material output node, in assignment order
pub(crate) fn material_inputs() -> Vec<Port> {
    let channel = |name: &str, ty, default, stage| {
        Port::input(name, ty).with_default(default).with_stage(stage)
    };
    vec![
        channel("Diffuse", PortType::Vector3, PortValue::Vector3([1.0, 1.0, 1.0]), Stage::Fragment),
        channel("Emissive", PortType::Vector3, PortValue::Vector3([0.0, 0.0, 0.0]), Stage::Fragment),
        channel("Normal", PortType::Vector3, PortValue::Vector3([0.5, 0.5, 1.0]), Stage::Fragment),
        channel("Metallic", PortType::Float, PortValue::Float(0.0), Stage::Fragment),
        channel("Roughness", PortType::Float, PortValue::Float(0.0), Stage::Fragment),
        channel("Opacity", PortType::Float, PortValue::Float(1.0), Stage::Fragment),
        channel("IOR", PortType::Float, PortValue::Float(1.0), Stage::Fragment),
        channel("Position Offset", PortType::Vector3, PortValue::Vector3([0.0, 0.0, 0.0]), Stage::Vertex),
    ]
}
