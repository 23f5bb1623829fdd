use std::collections::HashSet;

use crate::action::Action;

/// Held actions plus the actions that went down this frame.
///
/// `press` reports an edge only when the action was not already held, so
/// key repeat from the platform never produces a second edge. Edges are
/// cleared by `end_frame`.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns true on the not-held to held edge.
    pub fn press(&mut self, action: Action) -> bool {
        let edge = self.held.insert(action);
        if edge {
            self.pressed.insert(action);
        }
        edge
    }

    /// Record a key-up. Returns true if the action was held.
    pub fn release(&mut self, action: Action) -> bool {
        self.held.remove(&action)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Whether forward or back is held.
    pub fn movement_asserted(&self) -> bool {
        self.is_held(Action::MoveForward) || self.is_held(Action::MoveBack)
    }

    /// +1 forward, -1 back, 0 for neither or both.
    pub fn movement_axis(&self) -> f32 {
        axis(self.is_held(Action::MoveForward), self.is_held(Action::MoveBack))
    }

    /// +1 left, -1 right, 0 for neither or both.
    pub fn turn_axis(&self) -> f32 {
        axis(self.is_held(Action::TurnLeft), self.is_held(Action::TurnRight))
    }

    /// Clear this frame's edges. Held actions stay held.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Drop everything, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_edge_triggered() {
        let mut input = InputState::new();
        assert!(input.press(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
        // Key repeat while held is not a new edge.
        assert!(!input.press(Action::Jump));

        input.end_frame();
        assert!(input.is_held(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));
        assert!(!input.press(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));

        input.release(Action::Jump);
        assert!(input.press(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn movement_axis_cancels() {
        let mut input = InputState::new();
        assert!(!input.movement_asserted());
        input.press(Action::MoveForward);
        assert_eq!(input.movement_axis(), 1.0);
        input.press(Action::MoveBack);
        assert_eq!(input.movement_axis(), 0.0);
        assert!(input.movement_asserted());
        input.release(Action::MoveForward);
        assert_eq!(input.movement_axis(), -1.0);
    }

    #[test]
    fn turn_axis_signs() {
        let mut input = InputState::new();
        input.press(Action::TurnLeft);
        assert_eq!(input.turn_axis(), 1.0);
        input.release(Action::TurnLeft);
        input.press(Action::TurnRight);
        assert_eq!(input.turn_axis(), -1.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.reset();
        assert!(!input.is_held(Action::MoveForward));
        assert!(!input.just_pressed(Action::MoveForward));
    }
}
