use oasis_common::{NotificationSink, Pose, DEFAULT_NOTIFICATION_MS};
use oasis_input::{Action, InputState};
use oasis_persist::PersistenceAdapter;
use oasis_scene::{SceneError, SceneGraph};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationMode, AnimationStateError, AnimationTuning, Animator};
use crate::config::{AVATAR_CONFIG_KEY, AvatarConfig, PersistConfigError};
use crate::rig::AvatarRig;

/// Message shown when a stored config had to be replaced by the default.
pub const INVALID_CONFIG_NOTICE: &str = "Saved avatar could not be read. Using the default avatar.";

/// Movement and animation tuning for the avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub tuning: AnimationTuning,
    /// Units per second while walking.
    pub walk_speed: f32,
    /// Radians per second while turning.
    pub turn_rate: f32,
    /// Key the config is persisted under.
    pub storage_key: String,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            tuning: AnimationTuning::default(),
            walk_speed: 5.0,
            turn_rate: 2.0,
            storage_key: AVATAR_CONFIG_KEY.to_string(),
        }
    }
}

/// Owns the avatar's customization, animation state and scene rig.
///
/// Animation runs independently of which world is active: world
/// transitions only move the avatar with `place`.
#[derive(Debug)]
pub struct AvatarController {
    config: AvatarConfig,
    animator: Animator,
    settings: AvatarSettings,
    pose: Pose,
    rig: Option<AvatarRig>,
    warned_invalid: bool,
    notification_ms: u64,
}

impl AvatarController {
    pub fn new(settings: AvatarSettings) -> Self {
        Self {
            config: AvatarConfig::default(),
            animator: Animator::new(settings.tuning),
            settings,
            pose: Pose::default(),
            rig: None,
            warned_invalid: false,
            notification_ms: DEFAULT_NOTIFICATION_MS,
        }
    }

    /// How long notices raised by the controller stay on screen.
    pub fn with_notification_ms(mut self, duration_ms: u64) -> Self {
        self.notification_ms = duration_ms;
        self
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    pub fn settings(&self) -> &AvatarSettings {
        &self.settings
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn mode(&self) -> AnimationMode {
        self.animator.mode()
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn rig(&self) -> Option<&AvatarRig> {
        self.rig.as_ref()
    }

    /// Build the rig in `scene`, replacing any rig already attached.
    pub fn attach(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        self.rebuild(scene)
    }

    /// Remove the rig from the scene. Returns whether one was attached.
    pub fn detach(&mut self, scene: &mut dyn SceneGraph) -> bool {
        match self.rig.take() {
            Some(rig) => rig.clear(scene),
            None => false,
        }
    }

    /// Replace the config and rebuild the rig if one is attached. The
    /// animation state is left as it was.
    pub fn set_config(
        &mut self,
        config: AvatarConfig,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), SceneError> {
        self.config = config;
        if self.rig.is_some() {
            self.rebuild(scene)?;
        }
        Ok(())
    }

    /// Teleport to `pose`.
    pub fn place(&mut self, pose: Pose, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        self.pose = pose;
        self.sync_rig(scene)
    }

    /// Advance animation and movement by `dt` seconds.
    ///
    /// Translation and turning only happen in Walk; a jump holds position
    /// until it lands.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        scene: &mut dyn SceneGraph,
    ) -> Result<AnimationMode, SceneError> {
        let mode = self.animator.step(
            f64::from(dt),
            input.movement_asserted(),
            input.just_pressed(Action::Jump),
        );
        if mode == AnimationMode::Walk {
            self.pose.yaw += self.settings.turn_rate * dt * input.turn_axis();
            let step = self.settings.walk_speed * dt * input.movement_axis();
            self.pose.position += self.pose.forward() * step;
        }
        self.sync_rig(scene)?;
        Ok(mode)
    }

    /// Force a mode by name. Unknown names leave the state untouched.
    pub fn play_animation(&mut self, name: &str) -> Result<AnimationMode, AnimationStateError> {
        let mode: AnimationMode = name.parse()?;
        self.animator.force(mode);
        Ok(mode)
    }

    pub fn save(&self, store: &mut dyn PersistenceAdapter) -> Result<(), PersistConfigError> {
        self.config.save(store, &self.settings.storage_key)?;
        tracing::debug!(key = %self.settings.storage_key, "avatar config saved");
        Ok(())
    }

    /// Load the stored config and apply it. Missing data yields the default
    /// silently; unreadable data yields the default and one notification.
    pub fn load(
        &mut self,
        store: &dyn PersistenceAdapter,
        notifier: &dyn NotificationSink,
        scene: &mut dyn SceneGraph,
    ) -> AvatarConfig {
        let config = match AvatarConfig::load(store, &self.settings.storage_key) {
            Ok(Some(config)) => config,
            Ok(None) => AvatarConfig::default(),
            Err(e) => {
                tracing::warn!(error = %e, "stored avatar config rejected, using default");
                if !self.warned_invalid {
                    self.warned_invalid = true;
                    notifier.display(INVALID_CONFIG_NOTICE, self.notification_ms);
                }
                AvatarConfig::default()
            }
        };
        if let Err(e) = self.set_config(config, scene) {
            tracing::warn!(error = %e, "avatar rig rebuild failed");
        }
        config
    }

    fn rebuild(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        if let Some(old) = self.rig.take() {
            old.clear(scene);
        }
        let rig = AvatarRig::build(scene, &self.config, self.pose)?;
        tracing::info!(
            body = %self.config.body_type,
            head = %self.config.head_type,
            detail = %self.config.head_detail,
            accessory = %self.config.accessory,
            parts = rig.parts().len(),
            "avatar rig built"
        );
        self.rig = Some(rig);
        self.sync_rig(scene)
    }

    fn sync_rig(&self, scene: &mut dyn SceneGraph) -> Result<(), SceneError> {
        match &self.rig {
            Some(rig) => rig.apply(scene, self.pose, &self.animator.pose()),
            None => Ok(()),
        }
    }
}

impl Default for AvatarController {
    fn default() -> Self {
        Self::new(AvatarSettings::default())
    }
}
