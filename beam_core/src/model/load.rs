//! Loads applied along the beam
//!
//! Magnitudes are signed: negative loads push down into the beam, positive
//! loads push up. For moments, negative is clockwise.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clamp_position, MIN_EXTENT};
use crate::errors::{DiagramError, DiagramResult};

// ============================================================================
// Load Kind
// ============================================================================

/// How a load is applied to the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LoadKind {
    /// Concentrated force at a single position (kN)
    Point,
    /// Uniform force over an extent of the beam (kN/m)
    Distributed,
    /// Applied moment at a single position (kN·m)
    Moment,
}

impl LoadKind {
    pub const ALL: [LoadKind; 3] = [LoadKind::Point, LoadKind::Distributed, LoadKind::Moment];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadKind::Point => "Point",
            LoadKind::Distributed => "Distributed",
            LoadKind::Moment => "Moment",
        }
    }

    /// Wire/JSON code
    pub fn code(&self) -> &'static str {
        match self {
            LoadKind::Point => "point",
            LoadKind::Distributed => "distributed",
            LoadKind::Moment => "moment",
        }
    }

    /// Whether this kind needs an extent along the beam
    pub fn requires_extent(&self) -> bool {
        matches!(self, LoadKind::Distributed)
    }
}

impl FromStr for LoadKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(LoadKind::Point),
            "distributed" | "udl" => Ok(LoadKind::Distributed),
            "moment" => Ok(LoadKind::Moment),
            other => Err(DiagramError::unknown_kind("load", other)),
        }
    }
}

impl TryFrom<String> for LoadKind {
    type Error = DiagramError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LoadKind> for String {
    fn from(kind: LoadKind) -> Self {
        kind.code().to_string()
    }
}

impl std::fmt::Display for LoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Load
// ============================================================================

/// A single load on the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub kind: LoadKind,

    /// Distance from the left end (m); start of the span for distributed loads
    pub position: f64,

    /// Signed magnitude; the sign encodes direction
    pub magnitude: f64,

    /// Length along the beam (m), distributed loads only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<f64>,
}

impl Load {
    /// Create a new point load
    pub fn point(magnitude: f64, position: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: LoadKind::Point,
            position,
            magnitude,
            extent: None,
        }
    }

    /// Create a new distributed load starting at `position`
    pub fn distributed(magnitude: f64, position: f64, extent: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: LoadKind::Distributed,
            position,
            magnitude,
            extent: Some(extent),
        }
    }

    /// Create a new applied moment
    pub fn moment(magnitude: f64, position: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: LoadKind::Moment,
            position,
            magnitude,
            extent: None,
        }
    }

    /// Set the magnitude and return self (builder pattern)
    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// End of the loaded span (m); equals `position` for point-like loads
    pub fn end_position(&self) -> f64 {
        self.position + self.extent.unwrap_or(0.0)
    }

    /// True when the load pushes down into the beam
    pub fn is_downward(&self) -> bool {
        self.magnitude < 0.0
    }

    /// Copy clamped onto a beam of `length`
    ///
    /// Positions land in `[0, length]`. A distributed extent is floored to
    /// [`MIN_EXTENT`] and shortened so the span ends on the beam.
    pub fn clamped(&self, length: f64) -> Load {
        let magnitude = if self.magnitude.is_finite() { self.magnitude } else { 0.0 };

        if !self.kind.requires_extent() {
            return Load {
                position: clamp_position(self.position, length),
                magnitude,
                extent: None,
                ..self.clone()
            };
        }

        let min_extent = MIN_EXTENT.min(length);
        let mut extent = match self.extent {
            Some(e) if e.is_finite() => e.max(min_extent),
            _ => min_extent,
        };
        extent = extent.min(length);

        let mut position = clamp_position(self.position, length);
        if position + extent > length {
            let shortened = length - position;
            if shortened >= min_extent {
                extent = shortened;
            } else {
                position = length - extent;
            }
        }

        Load {
            position,
            magnitude,
            extent: Some(extent),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> DiagramResult<()> {
        if !self.position.is_finite() {
            return Err(DiagramError::invalid_input(
                "load.position",
                self.position.to_string(),
                "Position must be a finite number",
            ));
        }
        if !self.magnitude.is_finite() {
            return Err(DiagramError::invalid_input(
                "load.magnitude",
                self.magnitude.to_string(),
                "Magnitude must be a finite number",
            ));
        }
        if self.kind.requires_extent() {
            match self.extent {
                Some(e) if e.is_finite() && e > 0.0 => {}
                other => {
                    return Err(DiagramError::invalid_input(
                        "load.extent",
                        format!("{:?}", other),
                        "Distributed loads need a positive extent",
                    ))
                }
            }
        }
        Ok(())
    }
}
