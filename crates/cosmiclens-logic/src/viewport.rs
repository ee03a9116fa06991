//! Pan/zoom view transform over the scene.
//!
//! Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`. The pan offset is a parallax
//! shift derived from the pointer position, at most ±`PARALLAX_RANGE / 2`
//! percent on each axis.

use serde::{Deserialize, Serialize};

use crate::scene::{Position, SCENE_EXTENT};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 4.0;
/// Zoom change per wheel unit.
pub const WHEEL_SENSITIVITY: f64 = 0.001;
/// Wheel changes at or below this are not worth a zoom cue.
pub const AUDIBLE_ZOOM_STEP: f64 = 0.01;
/// Full parallax sweep in scene percent.
pub const PARALLAX_RANGE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub offset: Position,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Position::default(),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the zoom by `amount`. Returns true if the zoom changed.
    pub fn zoom_by(&mut self, amount: f64) -> bool {
        let next = clamp_zoom(self.zoom + amount);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    /// Apply a wheel delta (positive = scroll down = zoom out).
    ///
    /// Returns true when the change is large enough to cue feedback.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        let prev = self.zoom;
        self.zoom = clamp_zoom(prev - delta_y * WHEEL_SENSITIVITY);
        (self.zoom - prev).abs() > AUDIBLE_ZOOM_STEP
    }

    /// Update the parallax offset from a pointer position in a `width × height` surface.
    pub fn point_at(&mut self, pointer_x: f64, pointer_y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.offset = Position::new(
            (pointer_x / width - 0.5) * PARALLAX_RANGE,
            (pointer_y / height - 0.5) * PARALLAX_RANGE,
        );
    }

    /// Map a scene position to screen percent, scaling about the centre.
    pub fn project(&self, p: Position) -> Position {
        let centre = SCENE_EXTENT / 2.0;
        Position::new(
            centre + (p.x - centre) * self.zoom + self.offset.x,
            centre + (p.y - centre) * self.zoom + self.offset.y,
        )
    }

    /// Inverse of [`Viewport::project`].
    pub fn unproject(&self, screen: Position) -> Position {
        let centre = SCENE_EXTENT / 2.0;
        Position::new(
            centre + (screen.x - self.offset.x - centre) / self.zoom,
            centre + (screen.y - self.offset.y - centre) / self.zoom,
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_zoom(z: f64) -> f64 {
    z.clamp(MIN_ZOOM, MAX_ZOOM)
}
