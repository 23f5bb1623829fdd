use glam::Vec3;
use oasis_common::{NodeId, Transform};
use oasis_scene::{SceneError, SceneGraph};
use std::f32::consts::TAU;

/// Per-frame cosmetic motion owned by a world's content.
///
/// Decorations only move nodes. They never touch the registry and never
/// affect what a pointer resolves to beyond the nodes' new placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    /// Uniform scale breathing around the base transform.
    Pulse {
        node: NodeId,
        base: Transform,
        amplitude: f32,
        rate: f32,
    },
    /// Irregular brightness-style dip, expressed as a slight shrink.
    Flicker {
        node: NodeId,
        base: Transform,
        rate: f32,
    },
    /// Vertical bob above the base position.
    Bob {
        node: NodeId,
        base: Transform,
        height: f32,
        rate: f32,
        phase: f32,
    },
}

impl Decoration {
    pub fn node(&self) -> NodeId {
        match *self {
            Self::Pulse { node, .. } | Self::Flicker { node, .. } | Self::Bob { node, .. } => node,
        }
    }

    /// Transform at `t` seconds after the world became active.
    pub fn transform_at(&self, t: f32) -> Transform {
        match *self {
            Self::Pulse {
                base,
                amplitude,
                rate,
                ..
            } => {
                let s = 1.0 + amplitude * (TAU * rate * t).sin();
                base.with_scale(base.scale * s)
            }
            Self::Flicker { base, rate, .. } => {
                // Two incommensurate waves so the dips do not look periodic.
                let wave = (TAU * rate * t).sin() * (TAU * rate * 2.3 * t).sin();
                let s = if wave < -0.6 { 0.97 } else { 1.0 };
                base.with_scale(base.scale * s)
            }
            Self::Bob {
                base,
                height,
                rate,
                phase,
                ..
            } => {
                let lift = height * (0.5 + 0.5 * (TAU * rate * t + phase).sin());
                Transform {
                    position: base.position + Vec3::Y * lift,
                    ..base
                }
            }
        }
    }

    pub fn apply(&self, scene: &mut dyn SceneGraph, t: f32) -> Result<(), SceneError> {
        scene.set_transform(self.node(), self.transform_at(t))
    }
}
