use glam::Vec3;
use oasis_common::{Color, Pose, Transform, WorldId};
use oasis_scene::{CameraPose, NodeSpec};

use super::{floor, portal, slug};
use crate::decor::Decoration;
use crate::error::WorldBuildError;
use crate::world::{BuildContext, World};

pub const SPAWN: Pose = Pose {
    position: Vec3::new(0.0, 0.0, 15.0),
    yaw: 0.0,
};

pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 10.0, 20.0);

/// A cabinet on the arcade floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cabinet {
    pub game: &'static str,
    pub color: u32,
    pub x: f32,
    pub z: f32,
}

const fn cabinet(game: &'static str, color: u32, x: f32, z: f32) -> Cabinet {
    Cabinet { game, color, x, z }
}

pub const CABINETS: [Cabinet; 15] = [
    cabinet("JOUST", 0xff0000, -10.0, -10.0),
    cabinet("PAC-MAN", 0xffff00, -5.0, -10.0),
    cabinet("SPACE INVADERS", 0x00ff00, 0.0, -10.0),
    cabinet("DONKEY KONG", 0xff6600, 5.0, -10.0),
    cabinet("GALAGA", 0x00ffff, 10.0, -10.0),
    cabinet("FROGGER", 0x00ff00, -10.0, 0.0),
    cabinet("DEFENDER", 0xff00ff, -5.0, 0.0),
    cabinet("ASTEROIDS", 0xffffff, 0.0, 0.0),
    cabinet("CENTIPEDE", 0xff0000, 5.0, 0.0),
    cabinet("DIG DUG", 0xffff00, 10.0, 0.0),
    cabinet("TEMPEST", 0xff00ff, -10.0, 10.0),
    cabinet("MISSILE COMMAND", 0x00ffff, -5.0, 10.0),
    cabinet("Q*BERT", 0xff6600, 0.0, 10.0),
    cabinet("BURGERTIME", 0xffff00, 5.0, 10.0),
    cabinet("ROBOTRON", 0xff0000, 10.0, 10.0),
];

const NEON_SIGNS: [(&str, u32, Vec3); 3] = [
    ("ARCADE", 0xff00ff, Vec3::new(0.0, 5.0, -15.0)),
    ("HIGH SCORES", 0x00ffff, Vec3::new(-15.0, 5.0, 0.0)),
    ("PLAYER 1", 0xffff00, Vec3::new(15.0, 5.0, 0.0)),
];

pub const SOCIAL_PORTAL: Vec3 = Vec3::new(-16.0, 2.0, 14.0);

pub fn world() -> World {
    World::new(
        WorldId::Arcade,
        CameraPose::look_at(CAMERA_EYE, Vec3::ZERO),
        SPAWN,
        build,
    )
}

fn build(ctx: &mut BuildContext<'_>) -> Result<(), WorldBuildError> {
    floor(ctx, 20.0, 20.0, Color::from_hex(0x333333))?;
    for cabinet in CABINETS {
        build_cabinet(ctx, cabinet)?;
    }
    for (text, color, position) in NEON_SIGNS {
        let sign = ctx.spawn(
            NodeSpec::new(format!("neon-{}", slug(text)))
                .at(position)
                .with_box(Vec3::new(text.len() as f32 * 0.25, 0.5, 0.1))
                .with_color(Color::from_hex(color)),
        )?;
        ctx.decorate(Decoration::Flicker {
            node: sign,
            base: Transform::from_position(position),
            rate: 1.5,
        });
    }
    portal(ctx, SOCIAL_PORTAL, WorldId::Social, Color::from_hex(0x00ff66))?;
    Ok(())
}

fn build_cabinet(ctx: &mut BuildContext<'_>, cabinet: Cabinet) -> Result<(), WorldBuildError> {
    let name = slug(cabinet.game);
    let color = Color::from_hex(cabinet.color);
    let body = ctx.spawn(
        NodeSpec::new(format!("cabinet-{name}"))
            .at(Vec3::new(cabinet.x, 1.5, cabinet.z))
            .with_box(Vec3::new(1.0, 1.5, 0.5))
            .with_color(Color::from_hex(0x222222)),
    )?;
    ctx.spawn(
        NodeSpec::new("screen")
            .child_of(body)
            .at(Vec3::new(0.0, 0.3, 0.51))
            .with_box(Vec3::new(0.9, 0.6, 0.01))
            .with_color(color),
    )?;
    ctx.spawn(
        NodeSpec::new("controls")
            .child_of(body)
            .at(Vec3::new(0.0, -0.7, 0.6))
            .with_box(Vec3::new(0.9, 0.1, 0.25))
            .with_color(Color::from_hex(0x111111)),
    )?;
    ctx.spawn(
        NodeSpec::new("marquee")
            .child_of(body)
            .at(Vec3::new(0.0, 1.35, 0.45))
            .with_box(Vec3::new(0.9, 0.15, 0.05))
            .with_color(color),
    )?;

    let game = cabinet.game;
    ctx.interactable(&format!("cabinet-{name}"), body, move |commands| {
        commands.notify(format!("Starting {game}..."));
        commands.start_mini_game(game);
    })?;
    Ok(())
}
