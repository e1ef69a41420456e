//! # Model Store
//!
//! Holds the beams of the current session, which one is active, and the
//! current selection. Every mutation publishes a new immutable snapshot:
//! beams are kept behind `Arc` and modified copy-on-write, so a
//! [`ModelSnapshot`] handed to the renderer can never change underneath it.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::model::{BeamModel, Load};
//! use beam_core::store::ModelStore;
//!
//! let mut store = ModelStore::new();
//! store.add_beam(BeamModel::new("B-1", 10.0)).unwrap();
//!
//! let before = store.active_beam().unwrap();
//! store.add_load(Load::point(-3.0, 5.0)).unwrap();
//! let after = store.active_beam().unwrap();
//!
//! assert!(after.version > before.version);
//! assert!(before.beam.loads.is_empty());
//! assert_eq!(after.beam.loads.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{DiagramError, DiagramResult};
use crate::model::{BeamModel, Element, ElementRef, Load, Support};

/// Immutable view of the active beam at one store version
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    /// Store version this snapshot was taken at (monotonic)
    pub version: u64,

    /// When the store was last modified
    pub modified: DateTime<Utc>,

    pub beam: Arc<BeamModel>,
}

/// Session model store (beams, active beam, selection)
#[derive(Debug, Clone)]
pub struct ModelStore {
    /// All beams, keyed by UUID
    beams: HashMap<Uuid, Arc<BeamModel>>,

    /// Insertion order for listing
    order: Vec<Uuid>,

    active: Option<Uuid>,
    selected: Option<ElementRef>,
    version: u64,
    modified: DateTime<Utc>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self {
            beams: HashMap::new(),
            order: Vec::new(),
            active: None,
            selected: None,
            version: 0,
            modified: Utc::now(),
        }
    }

    /// Current store version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Beams in insertion order
    pub fn beams(&self) -> impl Iterator<Item = &BeamModel> {
        self.order.iter().filter_map(|id| self.beams.get(id)).map(|b| b.as_ref())
    }

    pub fn active_beam_id(&self) -> Option<Uuid> {
        self.active
    }

    /// Snapshot of the active beam, if any
    pub fn active_beam(&self) -> Option<ModelSnapshot> {
        let beam = self.active.and_then(|id| self.beams.get(&id))?;
        Some(ModelSnapshot {
            version: self.version,
            modified: self.modified,
            beam: Arc::clone(beam),
        })
    }

    /// Add a beam and make it active.
    ///
    /// Returns the beam's UUID.
    pub fn add_beam(&mut self, beam: BeamModel) -> DiagramResult<Uuid> {
        beam.validate()?;
        if self.beams.contains_key(&beam.id) {
            return Err(DiagramError::invalid_input("beam.id", beam.id.to_string(), "Duplicate beam id"));
        }
        let id = beam.id;
        self.beams.insert(id, Arc::new(beam));
        self.order.push(id);
        self.active = Some(id);
        self.selected = None;
        self.touch();
        Ok(id)
    }

    /// Switch the active beam (clears the selection)
    pub fn set_active_beam(&mut self, id: Uuid) -> DiagramResult<()> {
        if !self.beams.contains_key(&id) {
            return Err(DiagramError::not_found(id));
        }
        if self.active != Some(id) {
            self.active = Some(id);
            self.selected = None;
            self.touch();
        }
        Ok(())
    }

    /// Remove a beam; if it was active, no beam is active afterwards
    pub fn remove_beam(&mut self, id: Uuid) -> DiagramResult<BeamModel> {
        let beam = self.beams.remove(&id).ok_or_else(|| DiagramError::not_found(id))?;
        self.order.retain(|b| *b != id);
        if self.active == Some(id) {
            self.active = None;
            self.selected = None;
        }
        self.touch();
        Ok(Arc::unwrap_or_clone(beam))
    }

    /// Change the active beam's length
    pub fn set_beam_length(&mut self, length: f64) -> DiagramResult<()> {
        if !length.is_finite() || length <= 0.0 {
            return Err(DiagramError::invalid_input(
                "length",
                length.to_string(),
                "Beam length must be positive",
            ));
        }
        self.active_mut()?.length = length;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------------

    pub fn add_load(&mut self, load: Load) -> DiagramResult<()> {
        load.validate()?;
        let beam = self.active_mut()?;
        if beam.contains(load.id) {
            return Err(DiagramError::invalid_input("load.id", load.id.to_string(), "Duplicate element id"));
        }
        beam.loads.push(load);
        self.touch();
        Ok(())
    }

    /// Replace the load with the same ID
    pub fn update_load(&mut self, load: Load) -> DiagramResult<()> {
        load.validate()?;
        let beam = self.active_mut()?;
        let slot = beam
            .loads
            .iter_mut()
            .find(|l| l.id == load.id)
            .ok_or_else(|| DiagramError::not_found(load.id))?;
        *slot = load;
        self.touch();
        Ok(())
    }

    pub fn remove_load(&mut self, id: Uuid) -> DiagramResult<Load> {
        let beam = self.active_mut()?;
        let pos = beam
            .loads
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| DiagramError::not_found(id))?;
        let removed = beam.loads.remove(pos);
        self.clear_selection_of(id);
        self.touch();
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Supports
    // ------------------------------------------------------------------------

    pub fn add_support(&mut self, support: Support) -> DiagramResult<()> {
        support.validate()?;
        let beam = self.active_mut()?;
        if beam.contains(support.id) {
            return Err(DiagramError::invalid_input(
                "support.id",
                support.id.to_string(),
                "Duplicate element id",
            ));
        }
        beam.supports.push(support);
        self.touch();
        Ok(())
    }

    /// Replace the support with the same ID
    pub fn update_support(&mut self, support: Support) -> DiagramResult<()> {
        support.validate()?;
        let beam = self.active_mut()?;
        let slot = beam
            .supports
            .iter_mut()
            .find(|s| s.id == support.id)
            .ok_or_else(|| DiagramError::not_found(support.id))?;
        *slot = support;
        self.touch();
        Ok(())
    }

    pub fn remove_support(&mut self, id: Uuid) -> DiagramResult<Support> {
        let beam = self.active_mut()?;
        let pos = beam
            .supports
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DiagramError::not_found(id))?;
        let removed = beam.supports.remove(pos);
        self.clear_selection_of(id);
        self.touch();
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Elements & selection
    // ------------------------------------------------------------------------

    /// Remove whichever support or load the reference points at
    pub fn remove_element(&mut self, element: ElementRef) -> DiagramResult<Element> {
        match element {
            ElementRef::Support(id) => self.remove_support(id).map(Element::Support),
            ElementRef::Load(id) => self.remove_load(id).map(Element::Load),
        }
    }

    /// Full element from the active beam
    pub fn element(&self, element: ElementRef) -> Option<Element> {
        let beam = self.active.and_then(|id| self.beams.get(&id))?;
        match element {
            ElementRef::Support(id) => beam.support(id).cloned().map(Element::Support),
            ElementRef::Load(id) => beam.load(id).cloned().map(Element::Load),
        }
    }

    /// Set (or clear) the selected element.
    ///
    /// The reference must exist on the active beam.
    pub fn set_selected_element(&mut self, element: Option<ElementRef>) -> DiagramResult<()> {
        if let Some(element) = element {
            if self.element(element).is_none() {
                return Err(DiagramError::not_found(element.id()));
            }
        }
        self.selected = element;
        Ok(())
    }

    pub fn selected_element(&self) -> Option<ElementRef> {
        self.selected
    }

    fn clear_selection_of(&mut self, id: Uuid) {
        if self.selected.map(|s| s.id()) == Some(id) {
            self.selected = None;
        }
    }

    /// Mutable access to the active beam, copying it if a snapshot still holds it
    fn active_mut(&mut self) -> DiagramResult<&mut BeamModel> {
        let id = self.active.ok_or(DiagramError::NoActiveBeam)?;
        let beam = self.beams.get_mut(&id).ok_or(DiagramError::NoActiveBeam)?;
        Ok(Arc::make_mut(beam))
    }

    /// Bump the version and the modified timestamp.
    fn touch(&mut self) {
        self.version += 1;
        self.modified = Utc::now();
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        ModelStore::new()
    }
}
