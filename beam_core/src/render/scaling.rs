//! Relative magnitude scaling per load kind
//!
//! Heights are relative within a kind-group, never absolute: the largest
//! `|magnitude|` of each kind is drawn at `max_height` and the others in
//! proportion. Adding, editing or removing any load of a kind can therefore
//! change every height of that kind, which is why the engine is rebuilt from
//! the full load set each cycle and exposes [`ScalingEngine::changed_groups`].
//!
//! ```text
//! max_mag(kind) = max |m| over loads of kind   (1 if none or all zero)
//! height        = min(|m| / max_mag(kind) * max_height, max_height)
//! ```

use std::collections::BTreeMap;

use crate::model::{Load, LoadKind};

/// Substitute maximum for empty or all-zero kind-groups
const DEFAULT_MAX_MAGNITUDE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingEngine {
    max_height: f64,
    /// Maximum |magnitude| per kind present in the load set
    maxima: BTreeMap<LoadKind, f64>,
    /// Number of loads per kind
    counts: BTreeMap<LoadKind, usize>,
}

impl ScalingEngine {
    /// Build the engine from the full set of loads currently rendered
    pub fn new<'a>(loads: impl IntoIterator<Item = &'a Load>, max_height: f64) -> Self {
        let mut maxima = BTreeMap::new();
        let mut counts = BTreeMap::new();
        for load in loads {
            let magnitude = if load.magnitude.is_finite() { load.magnitude.abs() } else { 0.0 };
            let max = maxima.entry(load.kind).or_insert(0.0_f64);
            *max = max.max(magnitude);
            *counts.entry(load.kind).or_insert(0) += 1;
        }
        Self {
            max_height,
            maxima,
            counts,
        }
    }

    /// Engine for an empty load set
    pub fn empty(max_height: f64) -> Self {
        Self::new(std::iter::empty(), max_height)
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Largest |magnitude| of `kind`, or 1 when the group is empty or all zero
    pub fn max_magnitude(&self, kind: LoadKind) -> f64 {
        match self.maxima.get(&kind) {
            Some(&max) if max > 0.0 => max,
            _ => DEFAULT_MAX_MAGNITUDE,
        }
    }

    /// Number of loads of `kind` in the set
    pub fn group_size(&self, kind: LoadKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Rendered height (px) for a load of `kind` with `magnitude`
    pub fn height_of(&self, magnitude: f64, kind: LoadKind) -> f64 {
        if !magnitude.is_finite() {
            return 0.0;
        }
        (magnitude.abs() / self.max_magnitude(kind) * self.max_height).min(self.max_height)
    }

    /// Kinds whose scaling reference differs between `self` and `previous`
    pub fn changed_groups(&self, previous: &ScalingEngine) -> Vec<LoadKind> {
        LoadKind::ALL
            .iter()
            .copied()
            .filter(|kind| {
                self.max_magnitude(*kind) != previous.max_magnitude(*kind)
                    || self.max_height != previous.max_height
            })
            .collect()
    }
}
