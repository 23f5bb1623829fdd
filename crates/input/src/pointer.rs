use glam::Vec2;

/// A pointer sample in device-independent coordinates.
///
/// `ndc` is in [-1, 1] on both axes with +Y up. `click` marks the sample
/// that carries a click trigger; the others only drive hover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub ndc: Vec2,
    pub click: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PointerError {
    #[error("viewport has zero size ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
}

impl PointerEvent {
    /// Pointer move without a click. Coordinates are clamped into range.
    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            ndc: Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE),
            click: false,
        }
    }

    pub fn clicked(x: f32, y: f32) -> Self {
        Self {
            click: true,
            ..Self::moved(x, y)
        }
    }

    /// Convert window pixels (origin top-left, +Y down) to a pointer sample.
    pub fn from_pixels(
        px: f32,
        py: f32,
        width: f32,
        height: f32,
        click: bool,
    ) -> Result<Self, PointerError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PointerError::EmptyViewport { width, height });
        }
        let event = Self::moved(px / width * 2.0 - 1.0, 1.0 - py / height * 2.0);
        Ok(Self { click, ..event })
    }
}
