use glam::Vec3;
use oasis_common::{Color, NodeId, Pose, Transform, WorldId};
use oasis_scene::{CameraPose, NodeSpec};

use super::{floor, portal};
use crate::decor::Decoration;
use crate::error::WorldBuildError;
use crate::world::{BuildContext, World};

pub const SPAWN: Pose = Pose {
    position: Vec3::new(0.0, 0.0, 30.0),
    yaw: 0.0,
};

pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 5.0, 35.0);

pub const OPPONENTS: usize = 6;
pub const PLAYER_CAR: Vec3 = Vec3::new(0.0, 0.5, 30.0);
pub const START_LINE: Vec3 = Vec3::new(0.0, 0.01, -30.0);
pub const SOCIAL_PORTAL: Vec3 = Vec3::new(-22.0, 2.0, 20.0);

pub const START_MESSAGE: &str = "Race starting in 3... 2... 1... GO!";

/// Grid slot of opponent `i`, side by side ahead of the player.
pub fn opponent_slot(i: usize) -> Vec3 {
    Vec3::new(-15.0 + i as f32 * 6.0, 0.5, 25.0)
}

pub fn world() -> World {
    World::new(
        WorldId::Race,
        CameraPose::look_at(CAMERA_EYE, Vec3::ZERO),
        SPAWN,
        build,
    )
}

fn build(ctx: &mut BuildContext<'_>) -> Result<(), WorldBuildError> {
    floor(ctx, 60.0, 60.0, Color::from_hex(0x228822))?;
    ctx.spawn(
        NodeSpec::new("track")
            .at(Vec3::new(0.0, 0.0, 0.0))
            .with_box(Vec3::new(20.0, 0.01, 45.0))
            .with_color(Color::from_hex(0x333333)),
    )?;

    for i in 0..OPPONENTS {
        let car = race_car(ctx, &format!("car-{}", i + 1), opponent_slot(i), Color::WHITE, i)?;
        ctx.interactable(&format!("car-{}", i + 1), car, |commands| {
            commands.notify("Selected opponent vehicle");
        })?;
    }
    let player = race_car(ctx, "player-car", PLAYER_CAR, Color::from_hex(0xff0000), OPPONENTS)?;
    ctx.interactable("player-car", player, |commands| {
        commands.notify("Selected your vehicle");
    })?;

    let line = ctx.spawn(
        NodeSpec::new("start-line")
            .at(START_LINE)
            .with_box(Vec3::new(10.0, 0.05, 1.0))
            .with_color(Color::WHITE),
    )?;
    ctx.spawn(
        NodeSpec::new("start-gantry")
            .child_of(line)
            .at(Vec3::new(0.0, 5.0, 0.0))
            .with_box(Vec3::new(10.0, 0.5, 0.2))
            .with_color(Color::BLACK),
    )?;
    ctx.interactable("start-line", line, |commands| {
        commands.notify(START_MESSAGE);
    })?;

    portal(ctx, SOCIAL_PORTAL, WorldId::Social, Color::from_hex(0x0077ff))?;
    Ok(())
}

fn race_car(
    ctx: &mut BuildContext<'_>,
    label: &str,
    position: Vec3,
    color: Color,
    index: usize,
) -> Result<NodeId, WorldBuildError> {
    let body = ctx.spawn(
        NodeSpec::new(label)
            .at(position)
            .with_box(Vec3::new(1.5, 0.5, 3.0))
            .with_color(color),
    )?;
    ctx.spawn(
        NodeSpec::new("cabin")
            .child_of(body)
            .at(Vec3::new(0.0, 0.5, -0.5))
            .with_box(Vec3::new(1.0, 0.5, 1.0))
            .with_color(Color::from_hex(0x333333)),
    )?;
    ctx.decorate(Decoration::Bob {
        node: body,
        base: Transform::from_position(position),
        height: 0.05,
        rate: 4.0,
        phase: index as f32 * 0.7,
    });
    Ok(body)
}
