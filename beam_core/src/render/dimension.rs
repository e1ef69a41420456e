//! Dimension lines
//!
//! Three measured lines annotate the beam:
//!
//! ```text
//!        |<-- 10.00 m -->|<- 5.00 m ->|        temporary (focus element)
//!   ─────────────────────────────────────────  baseline
//!   |<- 5.00 m ->|<-- 5.00 m -->|              detailed (every position)
//!   |<--------------- 20.00 m ------------->|  permanent (ends and supports)
//! ```
//!
//! The permanent and detailed lines depend only on the model and the layout,
//! so they are rebuilt with the scene. The temporary line follows the
//! selected (else hovered) element and is built per frame.

use super::geometry::{Color, Point, Primitive, Stroke, TextAnchor};
use super::mapper::CoordinateMapper;
use crate::model::{BeamModel, Element};
use crate::style::StylePolicy;

/// Rough glyph advance as a fraction of the font size
const CHAR_WIDTH: f64 = 0.6;
/// Two positions closer than this (m) are the same point
const SAME_POSITION: f64 = 0.01;

/// Smallest segment a line will measure
#[derive(Debug, Clone, Copy)]
struct MinSegment {
    meters: f64,
    pixels: f64,
}

const PERMANENT_MIN: MinSegment = MinSegment {
    meters: 1e-3,
    pixels: 1.0,
};
const DETAILED_MIN: MinSegment = MinSegment {
    meters: 1e-2,
    pixels: 10.0,
};

#[derive(Debug, Clone, Default)]
pub struct DimensionLayer {
    visible: bool,
    lines: Vec<Primitive>,
}

impl DimensionLayer {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            lines: Vec::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Permanent and detailed lines
    pub fn lines(&self) -> &[Primitive] {
        &self.lines
    }

    pub fn set_visible(&mut self, visible: bool, layout: Option<(&BeamModel, &CoordinateMapper)>, style: &StylePolicy) {
        self.visible = visible;
        self.rebuild(layout, style);
    }

    /// Regenerate the permanent and detailed lines for a clamped model
    pub fn rebuild(&mut self, layout: Option<(&BeamModel, &CoordinateMapper)>, style: &StylePolicy) {
        self.lines.clear();
        let Some((model, mapper)) = layout else {
            return;
        };
        if !self.visible {
            return;
        }
        let dims = &style.dimensions;
        let unit = style.units.length();

        let permanent = sorted_positions(
            [0.0, mapper.beam_length()]
                .into_iter()
                .chain(model.supports.iter().map(|s| s.position)),
        );
        let permanent_segments: Vec<(f64, f64)> = segments(&permanent, mapper, PERMANENT_MIN).collect();
        let y = mapper.baseline_y() + dims.permanent_offset;
        let line = LineStyle::new(dims.permanent_color, 1.0, style);
        for (a, b) in &permanent_segments {
            line.segment(&mut self.lines, mapper, *a, *b, y, unit);
        }

        let detailed = sorted_positions(
            permanent.iter().copied().chain(
                model
                    .loads
                    .iter()
                    .flat_map(|l| [l.position, l.end_position()]),
            ),
        );
        let y = mapper.baseline_y() + dims.detailed_offset;
        let line = LineStyle::new(dims.detailed_color, 0.75, style);
        for (a, b) in segments(&detailed, mapper, DETAILED_MIN) {
            let duplicate = permanent_segments
                .iter()
                .any(|(pa, pb)| (pa - a).abs() < SAME_POSITION && (pb - b).abs() < SAME_POSITION);
            if !duplicate {
                line.segment(&mut self.lines, mapper, a, b, y, unit);
            }
        }
        tracing::trace!(primitives = self.lines.len(), "dimension lines rebuilt");
    }

    /// Line above the beam measuring `element` against its nearest anchors
    /// (beam ends and supports). Empty while the layer is hidden.
    pub fn temporary(
        &self,
        model: &BeamModel,
        mapper: &CoordinateMapper,
        element: &Element,
        style: &StylePolicy,
    ) -> Vec<Primitive> {
        let mut out = Vec::new();
        if !self.visible {
            return out;
        }
        let dims = &style.dimensions;
        let (start, end) = match element {
            Element::Support(s) => (s.position, s.position),
            Element::Load(l) => (l.position, l.end_position()),
        };
        let anchors = sorted_positions(
            [0.0, mapper.beam_length()]
                .into_iter()
                .chain(model.supports.iter().map(|s| s.position)),
        );
        let left = anchors.iter().copied().filter(|a| *a <= start).fold(0.0, f64::max);
        let right = anchors
            .iter()
            .copied()
            .filter(|a| *a >= end)
            .fold(mapper.beam_length(), f64::min);

        let y = mapper.baseline_y() - dims.temporary_offset;
        let line = LineStyle::new(dims.temporary_color, 1.0, style);
        let baseline = mapper.baseline_y();
        let mut marks = vec![start];
        if end - start > PERMANENT_MIN.meters {
            marks.push(end);
        }
        for position in marks {
            let x = mapper.to_screen_x(position);
            out.push(Primitive::Line {
                from: Point::new(x, baseline),
                to: Point::new(x, y),
                stroke: line.stroke,
            });
        }

        let points = [left, start, end, right];
        for (a, b) in segments(&points, mapper, PERMANENT_MIN) {
            line.segment(&mut out, mapper, a, b, y, style.units.length());
        }
        out
    }
}

struct LineStyle {
    stroke: Stroke,
    tick: f64,
    text_size: f64,
    text_gap: f64,
}

impl LineStyle {
    fn new(color: Color, width: f64, style: &StylePolicy) -> Self {
        Self {
            stroke: Stroke::new(color, width),
            tick: style.dimensions.tick,
            text_size: style.dimensions.text_size,
            text_gap: style.dimensions.text_gap,
        }
    }

    /// Line with end ticks, and a centered label when it fits
    fn segment(&self, out: &mut Vec<Primitive>, mapper: &CoordinateMapper, a: f64, b: f64, y: f64, unit: &str) {
        let (xa, xb) = (mapper.to_screen_x(a), mapper.to_screen_x(b));
        let half = self.tick / 2.0;
        out.push(Primitive::Line {
            from: Point::new(xa, y),
            to: Point::new(xb, y),
            stroke: self.stroke,
        });
        for x in [xa, xb] {
            out.push(Primitive::Line {
                from: Point::new(x, y - half),
                to: Point::new(x, y + half),
                stroke: self.stroke,
            });
        }

        let content = format!("{:.2} {}", b - a, unit);
        let estimated = content.chars().count() as f64 * self.text_size * CHAR_WIDTH;
        if estimated <= xb - xa {
            out.push(Primitive::Text {
                content,
                position: Point::new((xa + xb) / 2.0, y - self.text_gap - self.text_size / 2.0),
                size: self.text_size,
                color: self.stroke.color,
                anchor: TextAnchor::Middle,
            });
        }
    }
}

/// Finite positions sorted ascending with near-duplicates merged
fn sorted_positions(positions: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = positions.into_iter().filter(|p| p.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|b, a| (*b - *a).abs() < PERMANENT_MIN.meters);
    sorted
}

/// Consecutive pairs long enough to measure
fn segments<'a>(
    points: &'a [f64],
    mapper: &'a CoordinateMapper,
    min: MinSegment,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    points.windows(2).filter_map(move |pair| {
        let (a, b) = (pair[0], pair[1]);
        let long_enough = b - a > min.meters && mapper.length_to_screen(b - a) > min.pixels;
        long_enough.then_some((a, b))
    })
}
