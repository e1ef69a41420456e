//! Beam Model
//!
//! The structural model consumed by the renderer: a beam of fixed length with
//! supports and loads positioned along it (meters from the left end).
//!
//! # Overview
//!
//! - [`BeamModel`] - The beam and everything attached to it
//! - [`Support`] / [`SupportKind`] - Pin, roller and fixed restraints
//! - [`Load`] / [`LoadKind`] - Point, distributed and moment loads
//! - [`ElementRef`] / [`Element`] - Typed references used by selection
//!
//! # Example
//!
//! ```
//! use beam_core::model::{BeamModel, Load, Support, SupportKind};
//!
//! let beam = BeamModel::new("B-1", 12.0)
//!     .with_support(Support::new(SupportKind::Pin, 0.0))
//!     .with_support(Support::new(SupportKind::Roller, 12.0))
//!     .with_load(Load::point(-4.0, 6.0));
//!
//! assert_eq!(beam.supports.len(), 2);
//! assert!(beam.validate().is_ok());
//! ```

pub mod load;
pub mod support;

pub use load::{Load, LoadKind};
pub use support::{Support, SupportKind};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DiagramError, DiagramResult};

/// Smallest beam length the renderer will divide by (m)
pub const MIN_BEAM_LENGTH: f64 = 1e-6;

/// Smallest extent a distributed load is drawn with (m)
pub const MIN_EXTENT: f64 = 1e-3;

// ============================================================================
// Beam Model
// ============================================================================

/// A single beam with its supports and loads.
///
/// Owned by the [`crate::store::ModelStore`]; the renderer only ever reads a
/// snapshot of it per update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamModel {
    /// Unique identifier for this beam
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// User label (e.g. "B-1")
    #[serde(default)]
    pub label: String,

    /// Beam length (m)
    pub length: f64,

    #[serde(default)]
    pub supports: Vec<Support>,

    #[serde(default)]
    pub loads: Vec<Load>,
}

impl BeamModel {
    /// Create an empty beam
    pub fn new(label: impl Into<String>, length: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            length,
            supports: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Simply supported 20 m demo beam with one point load and one UDL
    pub fn sample() -> Self {
        BeamModel::new("Sample Beam", 20.0)
            .with_support(Support::new(SupportKind::Pin, 0.0))
            .with_support(Support::new(SupportKind::Roller, 20.0))
            .with_load(Load::point(-5.0, 10.0))
            .with_load(Load::distributed(-2.0, 5.0, 10.0))
    }

    /// Add a support and return self (builder pattern)
    pub fn with_support(mut self, support: Support) -> Self {
        self.supports.push(support);
        self
    }

    /// Add a load and return self (builder pattern)
    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    /// Beam length guarded against zero/negative/non-finite values
    pub fn effective_length(&self) -> f64 {
        if self.length.is_finite() {
            self.length.max(MIN_BEAM_LENGTH)
        } else {
            MIN_BEAM_LENGTH
        }
    }

    /// Get a support by ID
    pub fn support(&self, id: Uuid) -> Option<&Support> {
        self.supports.iter().find(|s| s.id == id)
    }

    /// Get a load by ID
    pub fn load(&self, id: Uuid) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == id)
    }

    /// Look up any element by ID
    pub fn element(&self, id: Uuid) -> Option<Element> {
        self.support(id)
            .cloned()
            .map(Element::Support)
            .or_else(|| self.load(id).cloned().map(Element::Load))
    }

    /// Check whether a support or load with this ID exists
    pub fn contains(&self, id: Uuid) -> bool {
        self.support(id).is_some() || self.load(id).is_some()
    }

    /// All support and load IDs, supports first
    pub fn element_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.supports
            .iter()
            .map(|s| s.id)
            .chain(self.loads.iter().map(|l| l.id))
    }

    /// Copy of this model with every position and extent clamped onto the beam
    pub fn clamped(&self) -> BeamModel {
        let length = self.effective_length();
        BeamModel {
            id: self.id,
            label: self.label.clone(),
            length,
            supports: self.supports.iter().map(|s| s.clamped(length)).collect(),
            loads: self.loads.iter().map(|l| l.clamped(length)).collect(),
        }
    }

    /// Parse and validate a model from JSON
    pub fn from_json(json: &str) -> DiagramResult<Self> {
        let beam: BeamModel = serde_json::from_str(json)?;
        beam.validate()?;
        Ok(beam)
    }

    /// Load a model from a JSON file
    pub fn from_json_file(path: &std::path::Path) -> DiagramResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DiagramError::config(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json)
    }

    /// Validate the model for the store boundary
    ///
    /// Rejects what the renderer cannot sensibly clamp: a non-positive or
    /// non-finite length, non-finite numbers, distributed loads without a
    /// positive extent, and duplicate element IDs.
    pub fn validate(&self) -> DiagramResult<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(DiagramError::invalid_input(
                "length",
                self.length.to_string(),
                "Beam length must be positive",
            ));
        }
        for support in &self.supports {
            support.validate()?;
        }
        for load in &self.loads {
            load.validate()?;
        }

        let mut seen = std::collections::HashSet::new();
        for id in self.element_ids() {
            if !seen.insert(id) {
                return Err(DiagramError::invalid_input("id", id.to_string(), "Duplicate element id"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Element References
// ============================================================================

/// Typed reference to a support or load by ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum ElementRef {
    Support(Uuid),
    Load(Uuid),
}

impl ElementRef {
    pub fn id(&self) -> Uuid {
        match self {
            ElementRef::Support(id) | ElementRef::Load(id) => *id,
        }
    }
}

/// A full support or load, as handed to the property editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Support(Support),
    Load(Load),
}

impl Element {
    pub fn id(&self) -> Uuid {
        match self {
            Element::Support(s) => s.id,
            Element::Load(l) => l.id,
        }
    }

    pub fn element_ref(&self) -> ElementRef {
        match self {
            Element::Support(s) => ElementRef::Support(s.id),
            Element::Load(l) => ElementRef::Load(l.id),
        }
    }

    /// Short description for status lines and panels
    pub fn describe(&self) -> String {
        match self {
            Element::Support(s) => format!("{} support @ {:.2} m", s.kind.display_name(), s.position),
            Element::Load(l) => format!("{} load {:.2} @ {:.2} m", l.kind.display_name(), l.magnitude, l.position),
        }
    }
}

/// Clamp a coordinate onto `[0, length]`, mapping non-finite input to 0
pub(crate) fn clamp_position(position: f64, length: f64) -> f64 {
    if position.is_finite() {
        position.clamp(0.0, length)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_beam() {
        let beam = BeamModel::sample();
        assert_eq!(beam.length, 20.0);
        assert_eq!(beam.supports.len(), 2);
        assert_eq!(beam.loads.len(), 2);
        assert!(beam.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let beam = BeamModel::new("Bad", 0.0);
        let err = beam.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let load = Load::point(-1.0, 2.0);
        let beam = BeamModel::new("Dup", 10.0)
            .with_load(load.clone())
            .with_load(load);
        assert!(beam.validate().is_err());
    }

    #[test]
    fn test_effective_length_guards_zero() {
        let beam = BeamModel::new("Zero", 0.0);
        assert_eq!(beam.effective_length(), MIN_BEAM_LENGTH);
        let beam = BeamModel::new("NaN", f64::NAN);
        assert_eq!(beam.effective_length(), MIN_BEAM_LENGTH);
    }

    #[test]
    fn test_clamped_model_keeps_ids() {
        let beam = BeamModel::new("Clamp", 10.0)
            .with_support(Support::new(SupportKind::Fixed, 12.0))
            .with_load(Load::point(-3.0, -1.0));
        let clamped = beam.clamped();

        assert_eq!(clamped.supports[0].id, beam.supports[0].id);
        assert_eq!(clamped.supports[0].position, 10.0);
        assert_eq!(clamped.loads[0].position, 0.0);
    }

    #[test]
    fn test_element_lookup() {
        let beam = BeamModel::sample();
        let support_id = beam.supports[0].id;
        let load_id = beam.loads[0].id;

        assert!(matches!(beam.element(support_id), Some(Element::Support(_))));
        assert!(matches!(beam.element(load_id), Some(Element::Load(_))));
        assert!(beam.element(Uuid::new_v4()).is_none());
        assert_eq!(beam.element_ids().count(), 4);
    }

    #[test]
    fn test_model_json_roundtrip() {
        let beam = BeamModel::sample();
        let json = serde_json::to_string_pretty(&beam).unwrap();
        assert!(json.contains("\"distributed\""));
        assert!(json.contains("\"pin\""));

        let parsed: BeamModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, beam);
    }

    #[test]
    fn test_model_json_rejects_unknown_kind() {
        let json = r#"{
            "length": 10.0,
            "supports": [{ "id": "00000000-0000-0000-0000-000000000001", "kind": "hinge", "position": 0.0 }]
        }"#;
        let err = serde_json::from_str::<BeamModel>(json).unwrap_err();
        assert!(err.to_string().contains("hinge"));
    }

    #[test]
    fn test_from_json_validates() {
        let beam = BeamModel::from_json(&serde_json::to_string(&BeamModel::sample()).unwrap()).unwrap();
        assert_eq!(beam.loads.len(), 2);

        let err = BeamModel::from_json(r#"{ "length": 0.0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
