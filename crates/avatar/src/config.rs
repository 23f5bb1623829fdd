use oasis_common::Color;
use oasis_persist::{PersistError, PersistenceAdapter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known key the avatar config is stored under.
pub const AVATAR_CONFIG_KEY: &str = "oasis.avatar.config";

/// Error for a customization option name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Closed option enums: lowercase names on the wire, `ALL` for UIs and
/// exhaustive tests.
macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == lower)
                    .ok_or_else(|| UnknownOption { kind: $kind, value: s.to_string() })
            }
        }
    };
}

option_enum!(
    /// Overall body silhouette.
    BodyType, "body type", {
        Humanoid => "humanoid",
        Mech => "mech",
        Slim => "slim",
        Heavy => "heavy",
        Floating => "floating",
    }
);

option_enum!(
    /// Head shape.
    HeadType, "head type", {
        Human => "human",
        Robot => "robot",
        Alien => "alien",
        Animal => "animal",
        Fantasy => "fantasy",
    }
);

option_enum!(
    /// Decoration attached to the head.
    HeadDetail, "head detail", {
        Default => "default",
        Visor => "visor",
        Horns => "horns",
        Antenna => "antenna",
        Hat => "hat",
    }
);

option_enum!(
    /// Item carried or worn on the body.
    Accessory, "accessory", {
        None => "none",
        Jetpack => "jetpack",
        Sword => "sword",
        Shield => "shield",
        Cape => "cape",
    }
);

/// The avatar's visual customization. Persisted verbatim as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AvatarConfig {
    pub body_type: BodyType,
    pub head_type: HeadType,
    pub head_detail: HeadDetail,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub accessory: Accessory,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            body_type: BodyType::Humanoid,
            head_type: HeadType::Human,
            head_detail: HeadDetail::Default,
            primary_color: Color::from_hex(0xff3366),
            secondary_color: Color::from_hex(0x3366ff),
            accessory: Accessory::None,
        }
    }
}

/// Why a stored config could not be used.
#[derive(Debug, thiserror::Error)]
pub enum PersistConfigError {
    #[error("stored avatar config is invalid: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("avatar config storage failed: {0}")]
    Storage(#[from] PersistError),
}

impl AvatarConfig {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a stored record. Unknown option names, malformed
    /// colors, missing or extra fields are all rejected.
    pub fn from_json(json: &str) -> Result<Self, PersistConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, store: &mut dyn PersistenceAdapter, key: &str) -> Result<(), PersistConfigError> {
        store.set(key, &self.to_json()?)?;
        Ok(())
    }

    /// Read the stored config. `Ok(None)` when nothing is stored.
    pub fn load(store: &dyn PersistenceAdapter, key: &str) -> Result<Option<Self>, PersistConfigError> {
        match store.get(key)? {
            Some(json) => Self::from_json(&json).map(Some),
            None => Ok(None),
        }
    }
}
