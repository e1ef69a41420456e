//! Gradient paint resources
//!
//! Each distributed-load glyph owns exactly one gradient while it exists.
//! Re-rendering a glyph allocates a fresh id and retires the old one in the
//! same call; removing the glyph retires its id. The live set is therefore
//! always the set of distributed entries currently on screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::{Color, GradientId};

/// Which way the opacity ramp runs across the band, from the beam side out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientAxis {
    /// Band sits above the beam: near stop at the bottom edge
    BottomToTop,
    /// Band sits below the beam: near stop at the top edge
    TopToBottom,
}

/// Vertical two-stop opacity ramp, relative to the filled shape's box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDef {
    pub id: GradientId,
    pub color: Color,
    /// Opacity on the beam side
    pub near_opacity: f32,
    /// Opacity on the far side
    pub far_opacity: f32,
    pub axis: GradientAxis,
}

impl GradientDef {
    /// Color at the near (`0.0`) and far (`1.0`) stop
    pub fn stops(&self) -> [(f32, Color); 2] {
        [
            (0.0, self.color.with_alpha(self.near_opacity)),
            (1.0, self.color.with_alpha(self.far_opacity)),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct GradientRegistry {
    next_id: u64,
    live: BTreeMap<GradientId, GradientDef>,
}

impl GradientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new gradient and return its never-reused id
    pub fn allocate(&mut self, color: Color, near_opacity: f32, far_opacity: f32, axis: GradientAxis) -> GradientId {
        self.next_id += 1;
        let id = GradientId(self.next_id);
        self.live.insert(
            id,
            GradientDef {
                id,
                color,
                near_opacity,
                far_opacity,
                axis,
            },
        );
        tracing::trace!(%id, "gradient allocated");
        id
    }

    /// Drop a gradient; returns false if it was not live
    pub fn retire(&mut self, id: GradientId) -> bool {
        let removed = self.live.remove(&id).is_some();
        if removed {
            tracing::trace!(%id, "gradient retired");
        }
        removed
    }

    pub fn get(&self, id: GradientId) -> Option<&GradientDef> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live definitions in allocation order
    pub fn defs(&self) -> Vec<GradientDef> {
        self.live.values().copied().collect()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut registry = GradientRegistry::new();
        let a = registry.allocate(Color::BLACK, 0.3, 0.8, GradientAxis::BottomToTop);
        assert!(registry.retire(a));
        let b = registry.allocate(Color::BLACK, 0.3, 0.8, GradientAxis::BottomToTop);
        assert_ne!(a, b);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut registry = GradientRegistry::new();
        let id = registry.allocate(Color::WHITE, 0.3, 0.8, GradientAxis::TopToBottom);
        assert!(registry.retire(id));
        assert!(!registry.retire(id));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_stops_follow_opacities() {
        let mut registry = GradientRegistry::new();
        let color = Color::from_rgb8(0x2b, 0x6c, 0xb0);
        let id = registry.allocate(color, 0.3, 0.8, GradientAxis::BottomToTop);
        let [(near_at, near), (far_at, far)] = registry.get(id).unwrap().stops();
        assert_eq!((near_at, far_at), (0.0, 1.0));
        assert_eq!(near.a, 0.3);
        assert_eq!(far.a, 0.8);
        assert_eq!(near.r, color.r);
    }
}
