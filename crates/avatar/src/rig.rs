//! Avatar rig: the scene nodes that make up the avatar's body.
//!
//! Every option enum maps to exactly one construction function, so adding
//! a variant fails to compile until its geometry exists.

use glam::{Quat, Vec3};
use oasis_common::{Color, NodeId, Pose, Transform};
use oasis_scene::{NodeSpec, SceneError, SceneGraph};

use crate::animation::PoseParams;
use crate::config::{Accessory, AvatarConfig, BodyType, HeadDetail, HeadType};

/// Which part of the body a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartSlot {
    Torso,
    Head,
    HeadDetail,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Thruster,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tint {
    Primary,
    Secondary,
    Fixed(Color),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PartSpec {
    slot: PartSlot,
    label: &'static str,
    offset: Vec3,
    half_extents: Vec3,
    tint: Tint,
}

const fn part(
    slot: PartSlot,
    label: &'static str,
    offset: Vec3,
    half_extents: Vec3,
    tint: Tint,
) -> PartSpec {
    PartSpec {
        slot,
        label,
        offset,
        half_extents,
        tint,
    }
}

/// Body parts plus the attachment points other parts hang from.
struct BodyFrame {
    parts: Vec<PartSpec>,
    neck: Vec3,
    back: Vec3,
    right_hand: Vec3,
    left_hand: Vec3,
}

fn limbs(arm_x: f32, arm_y: f32, arm: Vec3, leg_x: f32, leg_y: f32, leg: Vec3) -> Vec<PartSpec> {
    vec![
        part(PartSlot::LeftArm, "left_arm", Vec3::new(-arm_x, arm_y, 0.0), arm, Tint::Primary),
        part(PartSlot::RightArm, "right_arm", Vec3::new(arm_x, arm_y, 0.0), arm, Tint::Primary),
        part(PartSlot::LeftLeg, "left_leg", Vec3::new(-leg_x, leg_y, 0.0), leg, Tint::Secondary),
        part(PartSlot::RightLeg, "right_leg", Vec3::new(leg_x, leg_y, 0.0), leg, Tint::Secondary),
    ]
}

fn frame(torso_y: f32, torso: Vec3, arm_x: f32, arm_y: f32, limbs: Vec<PartSpec>) -> BodyFrame {
    let mut parts = vec![part(PartSlot::Torso, "torso", Vec3::new(0.0, torso_y, 0.0), torso, Tint::Primary)];
    parts.extend(limbs);
    BodyFrame {
        parts,
        neck: Vec3::new(0.0, torso_y + torso.y, 0.0),
        back: Vec3::new(0.0, torso_y + torso.y * 0.3, torso.z),
        right_hand: Vec3::new(arm_x, arm_y - 0.35, 0.0),
        left_hand: Vec3::new(-arm_x, arm_y - 0.35, 0.0),
    }
}

fn humanoid_body() -> BodyFrame {
    let l = limbs(0.55, 1.15, Vec3::new(0.1, 0.35, 0.1), 0.2, 0.4, Vec3::new(0.12, 0.4, 0.12));
    frame(1.1, Vec3::new(0.4, 0.3, 0.2), 0.55, 1.15, l)
}

fn mech_body() -> BodyFrame {
    let l = limbs(0.8, 1.2, Vec3::new(0.18, 0.4, 0.18), 0.3, 0.45, Vec3::new(0.18, 0.45, 0.18));
    frame(1.25, Vec3::new(0.55, 0.35, 0.35), 0.8, 1.2, l)
}

fn slim_body() -> BodyFrame {
    let l = limbs(0.42, 1.2, Vec3::new(0.07, 0.4, 0.07), 0.15, 0.45, Vec3::new(0.09, 0.45, 0.09));
    frame(1.2, Vec3::new(0.3, 0.3, 0.15), 0.42, 1.2, l)
}

fn heavy_body() -> BodyFrame {
    let l = limbs(0.85, 1.05, Vec3::new(0.2, 0.35, 0.2), 0.3, 0.35, Vec3::new(0.22, 0.35, 0.22));
    frame(1.05, Vec3::new(0.6, 0.35, 0.4), 0.85, 1.05, l)
}

fn floating_body() -> BodyFrame {
    let arm = Vec3::new(0.09, 0.3, 0.09);
    let mut parts = vec![
        part(PartSlot::LeftArm, "left_arm", Vec3::new(-0.5, 1.45, 0.0), arm, Tint::Primary),
        part(PartSlot::RightArm, "right_arm", Vec3::new(0.5, 1.45, 0.0), arm, Tint::Primary),
        part(
            PartSlot::Thruster,
            "thruster",
            Vec3::new(0.0, 0.75, 0.0),
            Vec3::new(0.2, 0.1, 0.2),
            Tint::Fixed(Color::from_hex(0x00ffff)),
        ),
    ];
    let mut body = frame(1.4, Vec3::new(0.35, 0.35, 0.25), 0.5, 1.45, Vec::new());
    body.parts.append(&mut parts);
    body
}

fn body_frame(body: BodyType) -> BodyFrame {
    match body {
        BodyType::Humanoid => humanoid_body(),
        BodyType::Mech => mech_body(),
        BodyType::Slim => slim_body(),
        BodyType::Heavy => heavy_body(),
        BodyType::Floating => floating_body(),
    }
}

/// Head parts sitting on `neck`, and the height of the head's top.
fn head_parts(head: HeadType, neck: Vec3) -> (Vec<PartSpec>, f32) {
    let (half, extra): (Vec3, Vec<PartSpec>) = match head {
        HeadType::Human => (Vec3::new(0.22, 0.25, 0.22), Vec::new()),
        HeadType::Robot => (Vec3::new(0.3, 0.28, 0.3), Vec::new()),
        HeadType::Alien => (Vec3::new(0.26, 0.36, 0.24), Vec::new()),
        HeadType::Animal => {
            let ear = Vec3::new(0.06, 0.1, 0.04);
            let top = neck.y + 0.5;
            (
                Vec3::new(0.27, 0.25, 0.3),
                vec![
                    part(PartSlot::Head, "left_ear", Vec3::new(-0.18, top + 0.08, 0.0), ear, Tint::Secondary),
                    part(PartSlot::Head, "right_ear", Vec3::new(0.18, top + 0.08, 0.0), ear, Tint::Secondary),
                ],
            )
        }
        HeadType::Fantasy => (Vec3::new(0.24, 0.3, 0.24), Vec::new()),
    };
    let center = neck + Vec3::new(0.0, half.y, 0.0);
    let mut parts = vec![part(PartSlot::Head, "head", center, half, Tint::Secondary)];
    parts.extend(extra);
    (parts, center.y + half.y)
}

fn detail_parts(detail: HeadDetail, head_top: f32) -> Vec<PartSpec> {
    let band_y = head_top - 0.2;
    match detail {
        HeadDetail::Default => Vec::new(),
        HeadDetail::Visor => vec![part(
            PartSlot::HeadDetail,
            "visor",
            Vec3::new(0.0, band_y, -0.28),
            Vec3::new(0.24, 0.06, 0.03),
            Tint::Fixed(Color::from_hex(0x33ffff)),
        )],
        HeadDetail::Horns => {
            let horn = Vec3::new(0.05, 0.15, 0.05);
            let bone = Tint::Fixed(Color::from_hex(0xeeeecc));
            vec![
                part(PartSlot::HeadDetail, "left_horn", Vec3::new(-0.16, head_top + 0.12, 0.0), horn, bone),
                part(PartSlot::HeadDetail, "right_horn", Vec3::new(0.16, head_top + 0.12, 0.0), horn, bone),
            ]
        }
        HeadDetail::Antenna => vec![
            part(
                PartSlot::HeadDetail,
                "antenna",
                Vec3::new(0.0, head_top + 0.2, 0.0),
                Vec3::new(0.02, 0.2, 0.02),
                Tint::Fixed(Color::from_hex(0xaaaaaa)),
            ),
            part(
                PartSlot::HeadDetail,
                "antenna_tip",
                Vec3::new(0.0, head_top + 0.42, 0.0),
                Vec3::splat(0.05),
                Tint::Fixed(Color::from_hex(0xff0000)),
            ),
        ],
        HeadDetail::Hat => vec![
            part(
                PartSlot::HeadDetail,
                "hat_brim",
                Vec3::new(0.0, head_top + 0.02, 0.0),
                Vec3::new(0.35, 0.02, 0.35),
                Tint::Primary,
            ),
            part(
                PartSlot::HeadDetail,
                "hat_crown",
                Vec3::new(0.0, head_top + 0.17, 0.0),
                Vec3::new(0.22, 0.15, 0.22),
                Tint::Primary,
            ),
        ],
    }
}

fn accessory_parts(accessory: Accessory, body: &BodyFrame) -> Vec<PartSpec> {
    let metal = Tint::Fixed(Color::from_hex(0xcccccc));
    match accessory {
        Accessory::None => Vec::new(),
        Accessory::Jetpack => {
            let tank = Vec3::new(0.1, 0.25, 0.1);
            let back = body.back + Vec3::new(0.0, 0.0, 0.12);
            vec![
                part(PartSlot::Accessory, "jetpack_left", back + Vec3::new(-0.13, 0.0, 0.0), tank, metal),
                part(PartSlot::Accessory, "jetpack_right", back + Vec3::new(0.13, 0.0, 0.0), tank, metal),
            ]
        }
        Accessory::Sword => vec![part(
            PartSlot::Accessory,
            "sword",
            body.right_hand + Vec3::new(0.0, 0.0, -0.45),
            Vec3::new(0.03, 0.04, 0.45),
            metal,
        )],
        Accessory::Shield => vec![part(
            PartSlot::Accessory,
            "shield",
            body.left_hand + Vec3::new(-0.12, 0.2, 0.0),
            Vec3::new(0.03, 0.3, 0.25),
            Tint::Secondary,
        )],
        Accessory::Cape => vec![part(
            PartSlot::Accessory,
            "cape",
            Vec3::new(0.0, body.neck.y - 0.55, body.back.z + 0.05),
            Vec3::new(0.4, 0.55, 0.02),
            Tint::Fixed(Color::from_hex(0x880000)),
        )],
    }
}

fn rig_parts(config: &AvatarConfig) -> Vec<PartSpec> {
    let body = body_frame(config.body_type);
    let (head, head_top) = head_parts(config.head_type, body.neck);
    let detail = detail_parts(config.head_detail, head_top);
    let accessory = accessory_parts(config.accessory, &body);
    let mut parts = body.parts;
    parts.extend(head);
    parts.extend(detail);
    parts.extend(accessory);
    parts
}

/// A node created for one rig part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigNode {
    pub slot: PartSlot,
    pub label: &'static str,
    pub node: NodeId,
    base: Transform,
}

/// The avatar's nodes in the scene, all under one root.
#[derive(Debug, Clone)]
pub struct AvatarRig {
    root: NodeId,
    parts: Vec<RigNode>,
}

impl AvatarRig {
    /// Create the rig for `config` with its root at `pose`.
    pub fn build(
        scene: &mut dyn SceneGraph,
        config: &AvatarConfig,
        pose: Pose,
    ) -> Result<Self, SceneError> {
        let root = scene.create_node(NodeSpec::new("avatar").with_transform(pose.to_transform()))?;
        let mut parts = Vec::new();
        for spec in rig_parts(config) {
            let color = match spec.tint {
                Tint::Primary => config.primary_color,
                Tint::Secondary => config.secondary_color,
                Tint::Fixed(color) => color,
            };
            let base = Transform::from_position(spec.offset);
            let created = scene.create_node(
                NodeSpec::new(spec.label)
                    .child_of(root)
                    .with_transform(base)
                    .with_box(spec.half_extents)
                    .with_color(color),
            );
            match created {
                Ok(node) => parts.push(RigNode {
                    slot: spec.slot,
                    label: spec.label,
                    node,
                    base,
                }),
                Err(e) => {
                    scene.remove_node(root);
                    return Err(e);
                }
            }
        }
        Ok(Self { root, parts })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn parts(&self) -> &[RigNode] {
        &self.parts
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.parts.iter().map(|p| p.label).collect()
    }

    pub fn nodes_in(&self, slot: PartSlot) -> Vec<NodeId> {
        self.parts
            .iter()
            .filter(|p| p.slot == slot)
            .map(|p| p.node)
            .collect()
    }

    /// Remove every rig node from the scene.
    pub fn clear(self, scene: &mut dyn SceneGraph) -> bool {
        scene.remove_node(self.root)
    }

    /// Place the root at `pose` and apply the animation pose parameters.
    pub fn apply(
        &self,
        scene: &mut dyn SceneGraph,
        pose: Pose,
        params: &PoseParams,
    ) -> Result<(), SceneError> {
        let root = Transform::from_position(pose.position + Vec3::new(0.0, params.lift, 0.0))
            .with_rotation(Quat::from_rotation_y(pose.yaw + params.sway));
        scene.set_transform(self.root, root)?;
        for part in &self.parts {
            let pitch = match part.slot {
                PartSlot::LeftArm | PartSlot::RightLeg => params.limb_swing,
                PartSlot::RightArm | PartSlot::LeftLeg => -params.limb_swing,
                _ => continue,
            };
            scene.set_transform(part.node, part.base.with_rotation(Quat::from_rotation_x(pitch)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasis_scene::MemoryScene;

    fn config(body: BodyType, head: HeadType, detail: HeadDetail, accessory: Accessory) -> AvatarConfig {
        AvatarConfig {
            body_type: body,
            head_type: head,
            head_detail: detail,
            accessory,
            ..AvatarConfig::default()
        }
    }

    #[test]
    fn default_rig_has_body_head_and_limbs() {
        let mut scene = MemoryScene::new();
        let rig = AvatarRig::build(&mut scene, &AvatarConfig::default(), Pose::default()).unwrap();
        let labels = rig.labels();
        for label in ["torso", "head", "left_arm", "right_arm", "left_leg", "right_leg"] {
            assert!(labels.contains(&label), "missing {label}");
        }
        assert_eq!(scene.node_count(), rig.parts().len() + 1);
        assert_eq!(scene.parent(rig.parts()[0].node), Some(rig.root()));
    }

    #[test]
    fn every_option_combination_builds() {
        for &body in BodyType::ALL {
            for &head in HeadType::ALL {
                for &detail in HeadDetail::ALL {
                    for &accessory in Accessory::ALL {
                        let mut scene = MemoryScene::new();
                        let rig = AvatarRig::build(
                            &mut scene,
                            &config(body, head, detail, accessory),
                            Pose::default(),
                        )
                        .unwrap();
                        assert_eq!(rig.nodes_in(PartSlot::Torso).len(), 1);
                        assert_eq!(rig.nodes_in(PartSlot::Accessory).is_empty(), accessory == Accessory::None);
                        assert_eq!(rig.nodes_in(PartSlot::HeadDetail).is_empty(), detail == HeadDetail::Default);
                        assert!(rig.clear(&mut scene));
                        assert_eq!(scene.node_count(), 0);
                    }
                }
            }
        }
    }

    #[test]
    fn floating_body_has_no_legs() {
        let mut scene = MemoryScene::new();
        let rig = AvatarRig::build(
            &mut scene,
            &config(BodyType::Floating, HeadType::Robot, HeadDetail::Default, Accessory::None),
            Pose::default(),
        )
        .unwrap();
        assert!(rig.nodes_in(PartSlot::LeftLeg).is_empty());
        assert_eq!(rig.nodes_in(PartSlot::Thruster).len(), 1);
    }

    #[test]
    fn parts_take_config_colors() {
        let mut scene = MemoryScene::new();
        let cfg = AvatarConfig::default();
        let rig = AvatarRig::build(&mut scene, &cfg, Pose::default()).unwrap();
        let torso = rig.nodes_in(PartSlot::Torso)[0];
        let head = rig.nodes_in(PartSlot::Head)[0];
        assert_eq!(scene.color(torso), Some(cfg.primary_color));
        assert_eq!(scene.color(head), Some(cfg.secondary_color));
    }

    #[test]
    fn apply_lifts_root_and_swings_limbs() {
        let mut scene = MemoryScene::new();
        let rig = AvatarRig::build(&mut scene, &AvatarConfig::default(), Pose::default()).unwrap();
        let pose = Pose::new(Vec3::new(0.0, 0.0, 10.0), 0.0);
        let params = PoseParams {
            lift: 0.75,
            limb_swing: 0.5,
            ..PoseParams::default()
        };
        rig.apply(&mut scene, pose, &params).unwrap();

        let root = scene.transform(rig.root()).unwrap();
        assert_eq!(root.position, Vec3::new(0.0, 0.75, 10.0));
        let arm = scene.transform(rig.nodes_in(PartSlot::LeftArm)[0]).unwrap();
        assert!((arm.rotation.angle_between(Quat::IDENTITY) - 0.5).abs() < 1e-4);
        let torso = scene.transform(rig.nodes_in(PartSlot::Torso)[0]).unwrap();
        assert_eq!(torso.rotation, Quat::IDENTITY);
    }
}
