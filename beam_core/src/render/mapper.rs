//! Engineering ⇄ screen coordinate mapping
//!
//! The beam runs horizontally between two fixed margins on a fixed baseline:
//!
//! ```text
//! x_px = margin + position * scale
//! scale = (viewport_width - 2 * margin) / beam_length
//! ```

use serde::{Deserialize, Serialize};

use crate::model::MIN_BEAM_LENGTH;
use crate::style::StylePolicy;

/// Smallest drawable beam span in pixels (guards tiny viewports)
const MIN_SPAN_PX: f64 = 1.0;

/// Size of the drawing container (px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pure mapping for one (viewport, beam length) pair.
///
/// Rebuilt whenever the viewport or the beam length changes; holds no other
/// state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    margin: f64,
    baseline_y: f64,
    beam_length: f64,
    scale: f64,
}

impl CoordinateMapper {
    /// Mapper for a beam of `beam_length` drawn in `viewport`.
    ///
    /// Non-positive lengths are clamped to [`MIN_BEAM_LENGTH`].
    pub fn new(viewport: Viewport, beam_length: f64, style: &StylePolicy) -> Self {
        let beam_length = if beam_length.is_finite() {
            beam_length.max(MIN_BEAM_LENGTH)
        } else {
            MIN_BEAM_LENGTH
        };
        let span_px = (viewport.width - 2.0 * style.margin).max(MIN_SPAN_PX);
        Self {
            margin: style.margin,
            baseline_y: style.baseline_y,
            beam_length,
            scale: span_px / beam_length,
        }
    }

    /// Pixels per meter
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn beam_length(&self) -> f64 {
        self.beam_length
    }

    /// Fixed vertical position of the beam line
    pub fn baseline_y(&self) -> f64 {
        self.baseline_y
    }

    /// Engineering position (m) to screen x (px)
    pub fn to_screen_x(&self, position: f64) -> f64 {
        self.margin + position * self.scale
    }

    /// Screen x (px) to engineering position (m); inverse of [`Self::to_screen_x`]
    pub fn to_screen_position(&self, x: f64) -> f64 {
        (x - self.margin) / self.scale
    }

    /// Engineering length (m) to screen length (px)
    pub fn length_to_screen(&self, length: f64) -> f64 {
        length * self.scale
    }

    pub fn beam_start_x(&self) -> f64 {
        self.to_screen_x(0.0)
    }

    pub fn beam_end_x(&self) -> f64 {
        self.to_screen_x(self.beam_length)
    }

    /// Snap a position to `increment` and clamp it onto the beam
    pub fn snap(&self, position: f64, increment: f64) -> f64 {
        let snapped = if increment > 0.0 {
            (position / increment).round() * increment
        } else {
            position
        };
        snapped.clamp(0.0, self.beam_length)
    }
}
