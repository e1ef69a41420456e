//! Decorative background grid
//!
//! Independent of the model: torn down and rebuilt wholesale whenever the
//! viewport changes or visibility is toggled.

use super::geometry::{Point, Primitive, Stroke};
use super::mapper::Viewport;
use crate::style::StylePolicy;

/// Upper bound on grid lines per rebuild
pub const MAX_GRID_LINES: usize = 10_000;

#[derive(Debug, Clone, Default)]
pub struct GridLayer {
    visible: bool,
    lines: Vec<Primitive>,
    /// Bumped on every rebuild
    generation: u64,
}

impl GridLayer {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lines(&self) -> &[Primitive] {
        &self.lines
    }

    /// Toggle visibility and rebuild for `viewport`
    pub fn set_visible(&mut self, visible: bool, viewport: Option<Viewport>, style: &StylePolicy) {
        self.visible = visible;
        self.rebuild(viewport, style);
    }

    /// Discard every line and regenerate for `viewport`
    pub fn rebuild(&mut self, viewport: Option<Viewport>, style: &StylePolicy) {
        self.lines.clear();
        self.generation += 1;

        let Some(viewport) = viewport else {
            return;
        };
        if !self.visible {
            return;
        }

        let counts = line_count(viewport.width, style.grid_size).zip(line_count(viewport.height, style.grid_size));
        let Some((columns, rows)) = counts.filter(|(c, r)| c + r + 2 <= MAX_GRID_LINES) else {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                grid_size = style.grid_size,
                "grid skipped: too many lines"
            );
            return;
        };

        let stroke = Stroke::new(style.grid_color, 1.0);
        self.lines.reserve(columns + rows + 2);

        for i in 0..=columns {
            let x = i as f64 * style.grid_size;
            self.lines.push(Primitive::Line {
                from: Point::new(x, 0.0),
                to: Point::new(x, viewport.height),
                stroke,
            });
        }
        for j in 0..=rows {
            let y = j as f64 * style.grid_size;
            self.lines.push(Primitive::Line {
                from: Point::new(0.0, y),
                to: Point::new(viewport.width, y),
                stroke,
            });
        }
        tracing::trace!(lines = self.lines.len(), generation = self.generation, "grid rebuilt");
    }
}

/// Whole spacings in `extent`, or `None` when either is not a finite positive size
fn line_count(extent: f64, spacing: f64) -> Option<usize> {
    if !(extent.is_finite() && spacing.is_finite() && extent >= 0.0 && spacing > 0.0) {
        return None;
    }
    let count = (extent / spacing).floor();
    (count <= MAX_GRID_LINES as f64).then_some(count as usize)
}
