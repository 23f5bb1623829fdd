use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A logical input action.
///
/// The core consumes actions, never raw key codes. Bindings from physical
/// keys live in [`KeyBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    MoveForward,
    MoveBack,
    TurnLeft,
    TurnRight,
    Jump,
    Interact,
    ToggleMenu,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Jump,
        Action::Interact,
        Action::ToggleMenu,
    ];

    /// Forward and back drive walking; turning alone does not.
    pub fn is_movement(self) -> bool {
        matches!(self, Self::MoveForward | Self::MoveBack)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "move-forward",
            Self::MoveBack => "move-back",
            Self::TurnLeft => "turn-left",
            Self::TurnRight => "turn-right",
            Self::Jump => "jump",
            Self::Interact => "interact",
            Self::ToggleMenu => "toggle-menu",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps physical key names (lowercase, e.g. `w`, `arrowup`, `space`) to
/// actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            keys: BTreeMap::new(),
        };
        for (key, action) in [
            ("w", Action::MoveForward),
            ("arrowup", Action::MoveForward),
            ("s", Action::MoveBack),
            ("arrowdown", Action::MoveBack),
            ("a", Action::TurnLeft),
            ("arrowleft", Action::TurnLeft),
            ("d", Action::TurnRight),
            ("arrowright", Action::TurnRight),
            ("space", Action::Jump),
            ("e", Action::Interact),
            ("enter", Action::Interact),
            ("escape", Action::ToggleMenu),
        ] {
            bindings.bind(key, action);
        }
        bindings
    }
}

impl KeyBindings {
    /// Bindings with nothing bound.
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Bind a key, replacing any previous binding for it.
    pub fn bind(&mut self, key: &str, action: Action) -> Option<Action> {
        self.keys.insert(normalize_key(key), action)
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.keys.remove(&normalize_key(key))
    }

    pub fn resolve(&self, key: &str) -> Option<Action> {
        self.keys.get(&normalize_key(key)).copied()
    }

    /// Keys bound to an action, in key order.
    pub fn keys_for(&self, action: Action) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        other => other.trim().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_actions() {
        assert!(Action::MoveForward.is_movement());
        assert!(Action::MoveBack.is_movement());
        assert!(!Action::TurnLeft.is_movement());
        assert!(!Action::Jump.is_movement());
    }

    #[test]
    fn default_bindings_cover_every_action() {
        let bindings = KeyBindings::default();
        for action in Action::ALL {
            assert!(!bindings.keys_for(action).is_empty(), "{action} unbound");
        }
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.resolve("W"), Some(Action::MoveForward));
        assert_eq!(bindings.resolve("ArrowLeft"), Some(Action::TurnLeft));
        assert_eq!(bindings.resolve(" "), Some(Action::Jump));
        assert_eq!(bindings.resolve("Escape"), Some(Action::ToggleMenu));
        assert_eq!(bindings.resolve("q"), None);
    }

    #[test]
    fn rebind_replaces() {
        let mut bindings = KeyBindings::empty();
        assert_eq!(bindings.bind("j", Action::Jump), None);
        assert_eq!(bindings.bind("J", Action::Interact), Some(Action::Jump));
        assert_eq!(bindings.resolve("j"), Some(Action::Interact));
        assert_eq!(bindings.unbind("j"), Some(Action::Interact));
        assert_eq!(bindings.resolve("j"), None);
    }
}
