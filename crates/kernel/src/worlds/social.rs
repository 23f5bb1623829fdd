use glam::Vec3;
use oasis_common::{Color, Pose, Transform, WorldId};
use oasis_scene::{CameraPose, NodeSpec};

use super::{floor, portal};
use crate::decor::Decoration;
use crate::error::WorldBuildError;
use crate::world::{BuildContext, World};

pub const SPAWN: Pose = Pose {
    position: Vec3::new(0.0, 0.0, 10.0),
    yaw: 0.0,
};

pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 10.0, 20.0);

/// Centers of the four seating areas.
pub const SEATING_AREAS: [Vec3; 4] = [
    Vec3::new(-8.0, 0.0, -8.0),
    Vec3::new(8.0, 0.0, -8.0),
    Vec3::new(-8.0, 0.0, 8.0),
    Vec3::new(8.0, 0.0, 8.0),
];

pub const ARCADE_PORTAL: Vec3 = Vec3::new(-15.0, 2.0, -4.0);
pub const RACE_PORTAL: Vec3 = Vec3::new(15.0, 2.0, -4.0);

pub fn world() -> World {
    World::new(
        WorldId::Social,
        CameraPose::look_at(CAMERA_EYE, Vec3::ZERO),
        SPAWN,
        build,
    )
}

fn build(ctx: &mut BuildContext<'_>) -> Result<(), WorldBuildError> {
    floor(ctx, 20.0, 20.0, Color::from_hex(0x006600))?;

    let fountain = ctx.spawn(
        NodeSpec::new("fountain")
            .at(Vec3::new(0.0, 0.25, 0.0))
            .with_box(Vec3::new(3.0, 0.25, 3.0))
            .with_color(Color::from_hex(0x0077ff)),
    )?;
    let water = ctx.spawn(
        NodeSpec::new("fountain-water")
            .child_of(fountain)
            .at(Vec3::new(0.0, 0.05, 0.0))
            .with_box(Vec3::new(2.5, 0.25, 2.5))
            .with_color(Color::from_hex(0x00aaff)),
    )?;
    ctx.decorate(Decoration::Pulse {
        node: water,
        base: Transform::from_position(Vec3::new(0.0, 0.05, 0.0)),
        amplitude: 0.03,
        rate: 0.5,
    });
    ctx.interactable("fountain", fountain, |commands| {
        commands.notify("You toss a coin into the fountain.");
    })?;

    for (i, center) in SEATING_AREAS.into_iter().enumerate() {
        seating_area(ctx, i + 1, center)?;
    }

    portal(ctx, ARCADE_PORTAL, WorldId::Arcade, Color::from_hex(0xff00ff))?;
    portal(ctx, RACE_PORTAL, WorldId::Race, Color::from_hex(0xff0000))?;
    Ok(())
}

/// A round platform with four seats around it.
fn seating_area(ctx: &mut BuildContext<'_>, n: usize, center: Vec3) -> Result<(), WorldBuildError> {
    let platform = ctx.spawn(
        NodeSpec::new(format!("seating-{n}"))
            .at(center + Vec3::new(0.0, 0.1, 0.0))
            .with_box(Vec3::new(3.0, 0.1, 3.0))
            .with_color(Color::from_hex(0x333333)),
    )?;
    for k in 0..4 {
        let angle = k as f32 * std::f32::consts::FRAC_PI_2;
        ctx.spawn(
            NodeSpec::new("seat")
                .child_of(platform)
                .at(Vec3::new(angle.cos() * 2.0, 0.35, angle.sin() * 2.0))
                .with_box(Vec3::new(0.5, 0.25, 0.5))
                .with_color(Color::from_hex(0x888888)),
        )?;
    }
    ctx.interactable(&format!("seating-{n}"), platform, |commands| {
        commands.notify("You take a seat.");
    })?;
    Ok(())
}
