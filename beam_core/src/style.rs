//! # Style Policy
//!
//! Every constant the renderer draws with: layout (margin, baseline, grid),
//! glyph sizes, colors, fill and offset policy, transition timing and unit
//! labels. One policy replaces the diverging per-version renderer constants;
//! variants are expressed as settings ([`LoadOffset`], [`LoadFill`]).
//!
//! Policies are plain serde structs with `#[serde(default)]`, so a JSON file
//! only needs the fields it overrides:
//!
//! ```rust
//! use beam_core::style::{LoadFill, StylePolicy, UnitSystem};
//!
//! let style = StylePolicy::from_json(r#"{ "max_height": 80.0, "fill": "solid", "units": "imperial" }"#).unwrap();
//! assert_eq!(style.max_height, 80.0);
//! assert_eq!(style.fill, LoadFill::Solid);
//! assert_eq!(style.margin, StylePolicy::default().margin);
//! assert_eq!(style.units, UnitSystem::Imperial);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DiagramError, DiagramResult};
use crate::model::LoadKind;
use crate::render::geometry::Color;

/// Smallest spacing between repeated lines (grid, hatching, arrows) in px
pub const MIN_SPACING: f64 = 1.0;

// ============================================================================
// Units
// ============================================================================

/// Unit labels printed next to magnitudes and positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// kN, kN/m, kN·m, m
    #[default]
    Metric,
    /// k, k/ft, k-ft, ft
    Imperial,
}

impl UnitSystem {
    pub fn force(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kN",
            UnitSystem::Imperial => "k",
        }
    }

    pub fn line_load(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kN/m",
            UnitSystem::Imperial => "k/ft",
        }
    }

    pub fn moment(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kN·m",
            UnitSystem::Imperial => "k-ft",
        }
    }

    pub fn length(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// Unit suffix for a load kind's magnitude
    pub fn load_unit(&self, kind: LoadKind) -> &'static str {
        match kind {
            LoadKind::Point => self.force(),
            LoadKind::Distributed => self.line_load(),
            LoadKind::Moment => self.moment(),
        }
    }
}

// ============================================================================
// Policies
// ============================================================================

/// Gap between the beam line and the load glyph's beam-side end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoadOffset {
    /// Constant gap in pixels, whatever the load height
    Fixed { gap: f64 },
    /// Gap grows with the load height, capped at `max`
    Capped { fraction: f64, max: f64 },
}

impl LoadOffset {
    pub fn gap_for(&self, height: f64) -> f64 {
        match *self {
            LoadOffset::Fixed { gap } => gap,
            LoadOffset::Capped { fraction, max } => (height * fraction).min(max),
        }
    }
}

/// How distributed-load bands are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFill {
    /// Vertical opacity ramp (one gradient resource per glyph)
    Gradient,
    /// Flat translucent fill
    Solid,
}

/// Dimension lines drawn under and over the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionStyle {
    pub visible: bool,
    /// Distance of the supports/beam-ends line below the beam (px)
    pub permanent_offset: f64,
    /// Distance of the all-points line below the beam (px)
    pub detailed_offset: f64,
    /// Distance of the selected/hovered element's line above the beam (px)
    pub temporary_offset: f64,
    /// Full height of a tick across the dimension line (px)
    pub tick: f64,
    pub text_size: f64,
    /// Gap between a dimension line and its label (px)
    pub text_gap: f64,
    pub permanent_color: Color,
    pub detailed_color: Color,
    pub temporary_color: Color,
}

impl Default for DimensionStyle {
    fn default() -> Self {
        Self {
            visible: true,
            permanent_offset: 85.0,
            detailed_offset: 55.0,
            temporary_offset: 85.0,
            tick: 6.0,
            text_size: 10.0,
            text_gap: 3.0,
            permanent_color: Color::from_rgb8(0x00, 0x8b, 0x8b),
            detailed_color: Color::from_rgb8(0x8a, 0x2b, 0xe2),
            temporary_color: Color::from_rgb8(0xff, 0x45, 0x00),
        }
    }
}

/// Complete rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePolicy {
    // Layout
    /// Left/right margin between viewport edge and beam ends (px)
    pub margin: f64,
    /// Fixed vertical position of the beam line (px)
    pub baseline_y: f64,
    pub grid_size: f64,
    pub grid_color: Color,

    // Beam
    pub beam_color: Color,
    pub beam_width: f64,

    // Loads
    /// Height of the largest load of each kind (px)
    pub max_height: f64,
    pub offset: LoadOffset,
    pub fill: LoadFill,
    pub arrow_size: f64,
    /// How far a point-load shaft runs into its arrowhead (px)
    pub arrow_overlap: f64,
    /// Target spacing of interior arrows on distributed loads (px)
    pub arrow_spacing: f64,
    pub load_line_width: f64,
    pub moment_radius: f64,
    /// Opacity of the gradient ramp at the beam side
    pub gradient_near_opacity: f32,
    /// Opacity of the gradient ramp away from the beam
    pub gradient_far_opacity: f32,
    pub point_color: Color,
    pub distributed_color: Color,
    pub moment_color: Color,

    // Supports
    pub support_size: f64,
    pub hatch_spacing: f64,
    pub support_color: Color,
    pub hatch_color: Color,

    // Text
    pub label_size: f64,
    pub label_gap: f64,
    pub units: UnitSystem,

    pub dimensions: DimensionStyle,

    // Interaction
    pub highlight_color: Color,
    pub hover_color: Color,
    /// Extra slop around glyph bounds when hit-testing (px)
    pub hit_tolerance: f64,
    /// Engineering snap increment for pointer placement (m)
    pub snap_increment: f64,

    // Animation
    pub transition_ms: u64,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            margin: 50.0,
            baseline_y: 150.0,
            grid_size: 20.0,
            grid_color: Color::BLACK.with_alpha(0.1),

            beam_color: Color::from_rgb8(0x66, 0x66, 0x66),
            beam_width: 3.0,

            max_height: 60.0,
            offset: LoadOffset::Fixed { gap: 10.0 },
            fill: LoadFill::Gradient,
            arrow_size: 8.0,
            arrow_overlap: 3.0,
            arrow_spacing: 40.0,
            load_line_width: 2.0,
            moment_radius: 14.0,
            gradient_near_opacity: 0.3,
            gradient_far_opacity: 0.8,
            point_color: Color::from_rgb8(0xe5, 0x3e, 0x3e),
            distributed_color: Color::from_rgb8(0x2b, 0x6c, 0xb0),
            moment_color: Color::from_rgb8(0x2f, 0x85, 0x5a),

            support_size: 20.0,
            hatch_spacing: 5.0,
            support_color: Color::from_rgb8(0x64, 0x74, 0x8b),
            hatch_color: Color::WHITE,

            label_size: 12.0,
            label_gap: 5.0,
            units: UnitSystem::Metric,
            dimensions: DimensionStyle::default(),

            highlight_color: Color::from_rgb8(0x31, 0x82, 0xce),
            hover_color: Color::from_rgb8(0x63, 0xb3, 0xed),
            hit_tolerance: 4.0,
            snap_increment: 0.1,

            transition_ms: 300,
        }
    }
}

impl StylePolicy {
    /// Parse a (partial) policy from JSON and validate it
    pub fn from_json(json: &str) -> DiagramResult<Self> {
        let style: StylePolicy = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    /// Reject sizes the renderer cannot draw with.
    ///
    /// Every length must be finite; sizes must be positive and spacings that
    /// drive line counts at least [`MIN_SPACING`].
    pub fn validate(&self) -> DiagramResult<()> {
        let finite = [
            ("margin", self.margin),
            ("baseline_y", self.baseline_y),
            ("arrow_overlap", self.arrow_overlap),
            ("label_gap", self.label_gap),
            ("hit_tolerance", self.hit_tolerance),
            ("snap_increment", self.snap_increment),
            ("dimensions.permanent_offset", self.dimensions.permanent_offset),
            ("dimensions.detailed_offset", self.dimensions.detailed_offset),
            ("dimensions.temporary_offset", self.dimensions.temporary_offset),
            ("dimensions.text_gap", self.dimensions.text_gap),
        ];
        for (field, value) in finite {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, value, "must be finite and non-negative"));
            }
        }

        let positive = [
            ("beam_width", self.beam_width),
            ("max_height", self.max_height),
            ("arrow_size", self.arrow_size),
            ("load_line_width", self.load_line_width),
            ("moment_radius", self.moment_radius),
            ("support_size", self.support_size),
            ("label_size", self.label_size),
            ("dimensions.tick", self.dimensions.tick),
            ("dimensions.text_size", self.dimensions.text_size),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, value, "must be finite and positive"));
            }
        }

        let spacings = [
            ("grid_size", self.grid_size),
            ("arrow_spacing", self.arrow_spacing),
            ("hatch_spacing", self.hatch_spacing),
        ];
        for (field, value) in spacings {
            if !value.is_finite() || value < MIN_SPACING {
                return Err(invalid(field, value, &format!("must be at least {} px", MIN_SPACING)));
            }
        }

        match self.offset {
            LoadOffset::Fixed { gap } if !gap.is_finite() || gap < 0.0 => {
                return Err(invalid("offset.gap", gap, "must be finite and non-negative"));
            }
            LoadOffset::Capped { fraction, max }
                if !fraction.is_finite() || fraction < 0.0 || !max.is_finite() || max < 0.0 =>
            {
                return Err(invalid("offset", fraction, "fraction and max must be finite and non-negative"));
            }
            _ => {}
        }

        for (field, value) in [
            ("gradient_near_opacity", self.gradient_near_opacity),
            ("gradient_far_opacity", self.gradient_far_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, f64::from(value), "must be within 0..=1"));
            }
        }
        Ok(())
    }

    /// Load a (partial) policy from a JSON file
    pub fn from_json_file(path: &Path) -> DiagramResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DiagramError::config(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json).map_err(|e| DiagramError::config(path.display().to_string(), e.to_string()))
    }

    /// Base color for a load kind
    pub fn load_color(&self, kind: LoadKind) -> Color {
        match kind {
            LoadKind::Point => self.point_color,
            LoadKind::Distributed => self.distributed_color,
            LoadKind::Moment => self.moment_color,
        }
    }

    pub fn transition_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.transition_ms)
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> DiagramError {
    DiagramError::invalid_input(field, value.to_string(), reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_constants() {
        let style = StylePolicy::default();
        assert_eq!(style.max_height, 60.0);
        assert_eq!(style.margin, 50.0);
        assert_eq!(style.transition_duration().as_millis(), 300);
    }

    #[test]
    fn test_offset_policies() {
        assert_eq!(LoadOffset::Fixed { gap: 10.0 }.gap_for(60.0), 10.0);
        let capped = LoadOffset::Capped { fraction: 0.25, max: 12.0 };
        assert_eq!(capped.gap_for(20.0), 5.0);
        assert_eq!(capped.gap_for(60.0), 12.0);
    }

    #[test]
    fn test_partial_json_and_offset_mode() {
        let style = StylePolicy::from_json(r#"{ "offset": { "mode": "capped", "fraction": 0.5, "max": 8.0 } }"#).unwrap();
        assert_eq!(style.offset, LoadOffset::Capped { fraction: 0.5, max: 8.0 });
        assert_eq!(style.fill, LoadFill::Gradient);
    }

    #[test]
    fn test_bad_json_is_error() {
        let err = StylePolicy::from_json("{ \"max_height\": \"tall\" }").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_validate_rejects_degenerate_spacing() {
        let err = StylePolicy::from_json(r#"{ "grid_size": 1e-7 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("grid_size"));

        let err = StylePolicy::from_json(r#"{ "hatch_spacing": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("hatch_spacing"));

        let err = StylePolicy::from_json(r#"{ "dimensions": { "tick": -1.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("dimensions.tick"));

        assert!(StylePolicy::default().validate().is_ok());
        let style = StylePolicy {
            max_height: f64::INFINITY,
            ..StylePolicy::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = StylePolicy::from_json_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(UnitSystem::Metric.load_unit(LoadKind::Point), "kN");
        assert_eq!(UnitSystem::Imperial.load_unit(LoadKind::Distributed), "k/ft");
        assert_eq!(UnitSystem::Imperial.length(), "ft");
    }
}
