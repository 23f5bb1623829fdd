//! The three standard worlds. Each module exposes `world()`, the descriptor
//! registered in [`WorldCatalog::standard`](crate::WorldCatalog::standard).

pub mod arcade;
pub mod race;
pub mod social;

use glam::Vec3;
use oasis_common::{Color, NodeId, Transform, WorldId};
use oasis_interact::Interactable;
use oasis_scene::NodeSpec;

use crate::decor::Decoration;
use crate::error::WorldBuildError;
use crate::world::BuildContext;

/// A flat floor slab with its top face at y = 0. Not interactive.
pub(crate) fn floor(
    ctx: &mut BuildContext<'_>,
    half_width: f32,
    half_depth: f32,
    color: Color,
) -> Result<NodeId, WorldBuildError> {
    ctx.spawn(
        NodeSpec::new("floor")
            .at(Vec3::new(0.0, -0.05, 0.0))
            .with_box(Vec3::new(half_width, 0.05, half_depth))
            .with_color(color),
    )
}

/// A doorway that loads `target` when clicked. Its id is `<world>/portal-<target>`.
pub(crate) fn portal(
    ctx: &mut BuildContext<'_>,
    position: Vec3,
    target: WorldId,
    color: Color,
) -> Result<NodeId, WorldBuildError> {
    let label = format!("portal-{target}");
    let frame = ctx.spawn(
        NodeSpec::new(label.clone())
            .at(position)
            .with_box(Vec3::new(1.5, 2.0, 0.2))
            .with_color(color),
    )?;
    let surface = ctx.spawn(
        NodeSpec::new("portal-surface")
            .child_of(frame)
            .with_box(Vec3::new(1.2, 1.7, 0.25))
            .with_color(Color::WHITE),
    )?;
    ctx.decorate(Decoration::Pulse {
        node: surface,
        base: Transform::default(),
        amplitude: 0.04,
        rate: 0.8,
    });

    let id = format!("{}/{label}", ctx.world());
    let world = ctx.world();
    let title = target.title();
    ctx.register(
        Interactable::new(id, world, frame, move |commands| {
            commands.load_world(target.name());
        })
        .on_hover_enter(move |commands| commands.notify_for(format!("Portal to {title}"), 1500)),
    )?;
    Ok(frame)
}

/// Lowercase, dash-separated form of a display name: "Q*BERT" -> "q-bert".
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
