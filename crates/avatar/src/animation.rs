use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// The three animation modes. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    Idle,
    Walk,
    Jump,
}

impl AnimationMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request for an animation that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no animation named '{0}'")]
pub struct AnimationStateError(pub String);

impl FromStr for AnimationMode {
    type Err = AnimationStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "walk" => Ok(Self::Walk),
            "jump" => Ok(Self::Jump),
            _ => Err(AnimationStateError(s.to_string())),
        }
    }
}

/// Current mode and when it was entered, in animator clock seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub mode: AnimationMode,
    pub entered_at: f64,
}

/// Pose parameters derived from the animation state. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseParams {
    /// Body yaw offset in radians (idle sway).
    pub sway: f32,
    /// Limb pitch in radians; arms and legs swing in opposite phase.
    pub limb_swing: f32,
    /// Vertical offset above ground (jump arc).
    pub lift: f32,
}

/// Timing and amplitude of each mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Seconds from jump entry to landing.
    pub jump_duration: f64,
    /// Apex height of the jump arc.
    pub jump_height: f32,
    pub idle_sway_amplitude: f32,
    /// Idle sway cycles per second.
    pub idle_sway_rate: f32,
    pub walk_swing_amplitude: f32,
    /// Limb swing cycles per second.
    pub walk_swing_rate: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            jump_duration: 0.5,
            jump_height: 1.0,
            idle_sway_amplitude: 0.05,
            idle_sway_rate: 0.5,
            walk_swing_amplitude: 0.5,
            walk_swing_rate: 2.0,
        }
    }
}

/// The Idle/Walk/Jump state machine.
///
/// Time only advances through `step`, so every transition lands on an
/// exact clock value: a jump entered at `t` ends at exactly
/// `t + jump_duration`.
#[derive(Debug, Clone)]
pub struct Animator {
    state: AnimationState,
    clock: f64,
    tuning: AnimationTuning,
}

impl Animator {
    pub fn new(tuning: AnimationTuning) -> Self {
        Self {
            state: AnimationState {
                mode: AnimationMode::Idle,
                entered_at: 0.0,
            },
            clock: 0.0,
            tuning,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn mode(&self) -> AnimationMode {
        self.state.mode
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn tuning(&self) -> &AnimationTuning {
        &self.tuning
    }

    /// Seconds spent in the current mode.
    pub fn elapsed(&self) -> f64 {
        self.clock - self.state.entered_at
    }

    /// Advance the clock and evaluate transitions.
    ///
    /// `moving` is whether forward/back is held; `jump_edge` is whether jump
    /// went down since the last step.
    pub fn step(&mut self, dt: f64, moving: bool, jump_edge: bool) -> AnimationMode {
        self.clock += dt.max(0.0);

        if self.state.mode == AnimationMode::Jump {
            let landing = self.state.entered_at + self.tuning.jump_duration;
            if self.clock < landing {
                return AnimationMode::Jump;
            }
            let next = if moving {
                AnimationMode::Walk
            } else {
                AnimationMode::Idle
            };
            self.enter(next, landing);
            return next;
        }

        if jump_edge {
            self.enter(AnimationMode::Jump, self.clock);
        } else if moving && self.state.mode != AnimationMode::Walk {
            self.enter(AnimationMode::Walk, self.clock);
        } else if !moving && self.state.mode != AnimationMode::Idle {
            self.enter(AnimationMode::Idle, self.clock);
        }
        self.state.mode
    }

    /// Switch mode immediately, bypassing input rules. Re-entering the
    /// current mode restarts it.
    pub fn force(&mut self, mode: AnimationMode) {
        self.enter(mode, self.clock);
    }

    pub fn pose(&self) -> PoseParams {
        let t = self.elapsed();
        let tuning = &self.tuning;
        match self.state.mode {
            AnimationMode::Idle => PoseParams {
                sway: tuning.idle_sway_amplitude
                    * (TAU * tuning.idle_sway_rate as f64 * t).sin() as f32,
                ..PoseParams::default()
            },
            AnimationMode::Walk => PoseParams {
                limb_swing: tuning.walk_swing_amplitude
                    * (TAU * tuning.walk_swing_rate as f64 * t).sin() as f32,
                ..PoseParams::default()
            },
            AnimationMode::Jump => {
                let s = if tuning.jump_duration > 0.0 {
                    (t / tuning.jump_duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                PoseParams {
                    lift: (4.0 * tuning.jump_height as f64 * s * (1.0 - s)) as f32,
                    ..PoseParams::default()
                }
            }
        }
    }

    fn enter(&mut self, mode: AnimationMode, at: f64) {
        tracing::trace!(from = %self.state.mode, to = %mode, at, "animation transition");
        self.state = AnimationState {
            mode,
            entered_at: at,
        };
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimationTuning::default())
    }
}
