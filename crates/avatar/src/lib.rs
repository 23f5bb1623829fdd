//! Avatar: customization, scene rig and the Idle/Walk/Jump state machine.
//!
//! # Invariants
//! - The animation state is exactly one of Idle, Walk or Jump.
//! - A jump ends `jump_duration` after it began, whatever the input.
//! - Changing the config rebuilds the rig but never the animation state.
//! - A stored config either loads exactly or is replaced by the default.

mod animation;
mod config;
mod controller;
mod rig;

pub use animation::{
    AnimationMode, AnimationState, AnimationStateError, AnimationTuning, Animator, PoseParams,
};
pub use config::{
    AVATAR_CONFIG_KEY, Accessory, AvatarConfig, BodyType, HeadDetail, HeadType,
    PersistConfigError, UnknownOption,
};
pub use controller::{AvatarController, AvatarSettings, INVALID_CONFIG_NOTICE};
pub use rig::{AvatarRig, PartSlot, RigNode};
