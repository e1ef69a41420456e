//! Rendering engine
//!
//! Leaf-first: [`mapper`] and [`scaling`] turn engineering values into
//! pixels, [`glyph`] builds geometry, [`scene`] keeps the retained scene in
//! step with model snapshots, and [`selection`] maps pointer input back onto
//! model elements. [`Diagram`] ties scene and selection together so one
//! [`Diagram::sync`] call is one full update cycle.

pub mod dimension;
pub mod geometry;
pub mod glyph;
pub mod gradient;
pub mod grid;
pub mod mapper;
pub mod scaling;
pub mod scene;
pub mod selection;
pub mod transition;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use dimension::DimensionLayer;
pub use geometry::{Bounds, Color, GradientId, Paint, Point, Primitive, Stroke, TextAnchor};
pub use glyph::{Glyph, GlyphFactory, GlyphKind};
pub use gradient::{GradientAxis, GradientDef, GradientRegistry};
pub use mapper::{CoordinateMapper, Viewport};
pub use scaling::ScalingEngine;
pub use scene::{SceneEntry, SceneFrame, SceneManager, UpdateReport};
pub use selection::{Hit, SelectionChange, SelectionLayer};

use crate::errors::DiagramResult;
use crate::model::Element;
use crate::store::ModelStore;
use crate::style::StylePolicy;

/// Outcome of one [`Diagram::sync`] cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub scene: UpdateReport,
    /// Set when the cycle moved or cleared the selection
    pub selection: Option<SelectionChange>,
}

/// Scene plus selection behind one update entry point
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    scene: SceneManager,
    selection: SelectionLayer,
}

impl Diagram {
    pub fn new(style: StylePolicy) -> Self {
        Self {
            scene: SceneManager::new(style),
            selection: SelectionLayer::new(),
        }
    }

    pub fn style(&self) -> &StylePolicy {
        self.scene.style()
    }

    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionLayer {
        &self.selection
    }

    pub fn resize(&mut self, viewport: Viewport, now: Duration) -> UpdateReport {
        self.scene.resize(viewport, now)
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.scene.set_grid_visible(visible);
    }

    pub fn grid_visible(&self) -> bool {
        self.scene.grid().is_visible()
    }

    pub fn set_dimensions_visible(&mut self, visible: bool) {
        self.scene.set_dimensions_visible(visible);
    }

    pub fn dimensions_visible(&self) -> bool {
        self.scene.dimensions().is_visible()
    }

    /// Pull the store's active beam into the scene and reconcile selection
    pub fn sync(&mut self, store: &mut ModelStore, now: Duration) -> SyncReport {
        let scene = self.scene.apply(store.active_beam().as_ref(), now);
        let selection = self.selection.reconcile(self.scene.model(), store);
        SyncReport { scene, selection }
    }

    pub fn frame(&self, now: Duration) -> SceneFrame {
        self.scene
            .frame(now, self.selection.highlight_id(), self.selection.hover_id())
    }

    /// Drop finished transitions; call from the animation tick
    pub fn settle(&mut self, now: Duration) {
        self.scene.settle(now);
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.scene.is_animating(now)
    }

    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.selection.hit_test(&self.scene, point)
    }

    /// Engineering position under a screen point, clamped onto the beam
    pub fn position_at(&self, point: Point) -> Option<f64> {
        let mapper = self.scene.mapper()?;
        Some(mapper.to_screen_position(point.x).clamp(0.0, mapper.beam_length()))
    }

    /// Update the hovered element; `None` means the pointer left the canvas.
    /// Returns whether the frame needs redrawing.
    pub fn on_pointer_move(&mut self, point: Option<Point>) -> bool {
        match point {
            Some(point) => self.selection.on_pointer_move(&self.scene, point),
            None => self.selection.clear_hover(),
        }
    }

    pub fn on_pointer_down(&mut self, point: Point, store: &mut ModelStore) -> DiagramResult<Option<SelectionChange>> {
        self.selection.on_pointer_down(&self.scene, point, store)
    }

    pub fn request_delete(&mut self, store: &mut ModelStore) -> DiagramResult<Option<Element>> {
        self.selection.request_delete(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BeamModel, ElementRef, Load};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn ready() -> (ModelStore, Diagram) {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut diagram = Diagram::default();
        diagram.resize(Viewport::new(800.0, 300.0), Duration::ZERO);
        diagram.sync(&mut store, Duration::ZERO);
        (store, diagram)
    }

    #[test]
    fn test_delete_selected_clears_highlight_same_cycle() {
        let (mut store, mut diagram) = ready();
        let change = diagram.on_pointer_down(Point::new(400.0, 100.0), &mut store).unwrap();
        let selected = change.unwrap().current.unwrap().id();
        assert!(diagram.frame(ms(0)).glyphs.iter().any(|g| g.element.id() == selected));

        diagram.request_delete(&mut store).unwrap();
        let cycle = diagram.sync(&mut store, ms(10));

        assert_eq!(cycle.scene.removed, vec![selected]);
        assert!(diagram.selection().highlight_id().is_none());
        assert!(store.selected_element().is_none());
        assert!(diagram.frame(ms(10)).glyphs.iter().all(|g| g.element.id() != selected));
    }

    #[test]
    fn test_external_removal_reported_as_selection_change() {
        let (mut store, mut diagram) = ready();
        diagram.on_pointer_down(Point::new(50.0, 160.0), &mut store).unwrap();
        let pin = store.selected_element().unwrap();
        assert!(matches!(pin, ElementRef::Support(_)));

        store.remove_element(pin).unwrap();
        let cycle = diagram.sync(&mut store, ms(10));
        let change = cycle.selection.unwrap();
        assert_eq!(change.previous.map(|e| e.id()), Some(pin.id()));
        assert!(change.current.is_none());
    }

    #[test]
    fn test_frame_highlights_selection() {
        let (mut store, mut diagram) = ready();
        diagram.on_pointer_down(Point::new(400.0, 100.0), &mut store).unwrap();
        let id = diagram.selection().highlight_id().unwrap();
        let highlight = diagram.style().highlight_color;

        let frame = diagram.frame(ms(0));
        let glyph = frame.glyphs.iter().find(|g| g.element.id() == id).unwrap();
        let text_color = glyph.primitives.iter().find_map(|p| match p {
            Primitive::Text { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(text_color, Some(highlight));
    }

    #[test]
    fn test_hover_shows_temporary_dimensions() {
        let (_, mut diagram) = ready();
        let resting = diagram.frame(ms(0)).dimensions.len();

        assert!(diagram.on_pointer_move(Some(Point::new(400.0, 100.0))));
        let hovered = diagram.frame(ms(0));
        assert!(hovered.dimensions.len() > resting);
        let id = diagram.selection().hover_id().unwrap();
        let glyph = hovered.glyphs.iter().find(|g| g.element.id() == id).unwrap();
        assert!(glyph.primitives.iter().any(|p| matches!(
            p,
            Primitive::Text { color, .. } if *color == diagram.style().hover_color
        )));

        assert!(diagram.on_pointer_move(None));
        assert_eq!(diagram.frame(ms(0)).dimensions.len(), resting);

        diagram.set_dimensions_visible(false);
        assert!(!diagram.dimensions_visible());
        assert!(diagram.frame(ms(0)).dimensions.is_empty());
    }

    #[test]
    fn test_animation_runs_then_settles() {
        let (mut store, mut diagram) = ready();
        store.add_load(Load::point(-10.0, 15.0)).unwrap();
        diagram.sync(&mut store, ms(1000));
        assert!(diagram.is_animating(ms(1100)));
        assert!(!diagram.is_animating(ms(1300)));

        diagram.settle(ms(1300));
        assert_eq!(diagram.scene().len(), 5);
        // Settled entries no longer animate, whatever the clock says
        assert!(!diagram.is_animating(ms(1000)));
    }

    #[test]
    fn test_position_at_clamps() {
        let (_, diagram) = ready();
        assert_eq!(diagram.position_at(Point::new(400.0, 0.0)), Some(10.0));
        assert_eq!(diagram.position_at(Point::new(-100.0, 0.0)), Some(0.0));
        assert_eq!(diagram.position_at(Point::new(5000.0, 0.0)), Some(20.0));
    }
}
