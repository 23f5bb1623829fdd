use glam::Vec3;
use oasis_avatar::AnimationMode;
use oasis_common::{NodeId, WorldId};
use oasis_interact::InteractableId;
use oasis_scene::SceneGraph;
use std::fmt;

use crate::manager::TransitionState;
use crate::session::Session;

/// Read-only queries against a running session, for tooling and logs.
pub struct SessionInspector;

impl SessionInspector {
    pub fn summary<S: SceneGraph>(session: &Session<S>) -> SessionSummary {
        let manager = session.manager();
        SessionSummary {
            state: manager.state(),
            interactables: manager.registry().len(),
            scene_nodes: session.scene().node_count(),
            avatar_mode: session.avatar().mode(),
            avatar_position: session.avatar().pose().position,
            modal_open: session.is_modal_open(),
            fade_alpha: manager.fade().alpha(),
        }
    }

    /// Registered interactables in id order.
    pub fn interactables<S: SceneGraph>(session: &Session<S>) -> Vec<InteractableInfo> {
        session
            .manager()
            .registry()
            .iter()
            .map(|i| InteractableInfo {
                id: i.id.clone(),
                world: i.world,
                node: i.node,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub state: TransitionState,
    pub interactables: usize,
    pub scene_nodes: usize,
    pub avatar_mode: AnimationMode,
    pub avatar_position: Vec3,
    pub modal_open: bool,
    pub fade_alpha: f32,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.avatar_position;
        write!(
            f,
            "Session: state={} interactables={} nodes={} avatar={} at ({:.2}, {:.2}, {:.2}) modal={} fade={:.2}",
            self.state,
            self.interactables,
            self.scene_nodes,
            self.avatar_mode,
            p.x,
            p.y,
            p.z,
            self.modal_open,
            self.fade_alpha,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractableInfo {
    pub id: InteractableId,
    pub world: WorldId,
    pub node: NodeId,
}

impl fmt::Display for InteractableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] node={}", self.id, self.world, self.node.short())
    }
}
