//! Shared types for the oasis workspace.
//!
//! Scene node ids, world ids, transforms, poses, colors, rays and boxes, plus
//! the narrow traits through which the core talks to notification and
//! mini-game collaborators.

mod notify;
mod types;

pub use notify::{
    DEFAULT_NOTIFICATION_MS, LaunchLog, LogLauncher, LogNotifier, MiniGameLauncher, Notification,
    NotificationLog, NotificationSink,
};
pub use types::{
    Aabb, Color, ColorParseError, NodeId, Pose, Ray, Transform, UnknownWorld, WorldId,
};
