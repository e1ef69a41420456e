//! # Glyph Factory
//!
//! Pure geometry for supports and loads. Nothing here mutates the model; the
//! factory reads positions through the [`CoordinateMapper`], heights through
//! the [`ScalingEngine`] and every size and color from the [`StylePolicy`].
//!
//! ## Direction
//!
//! The sign of a load's magnitude is its direction. Negative magnitudes are
//! drawn above the beam with arrows pointing down at it, positive magnitudes
//! below the beam with arrows pointing up.
//!
//! ```text
//!        5.0 kN             2.0 kN/m
//!          |            ┌──────────────┐
//!          |            │░░░░░░░░░░░░░░│  <- gradient band
//!          V            V   V   V   V  V
//!   ─────────────────────────────────────  baseline
//!   /\                                 O
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Color, GradientId, Paint, Point, Primitive, Stroke, TextAnchor};
use super::gradient::{GradientAxis, GradientRegistry};
use super::mapper::CoordinateMapper;
use super::scaling::ScalingEngine;
use crate::model::{Element, ElementRef, Load, LoadKind, Support, SupportKind};
use crate::style::{LoadFill, StylePolicy};

/// Arrowhead half-width as a fraction of its length
const ARROW_HALF_WIDTH: f64 = 0.67;
/// Angular length of the moment arc
const MOMENT_SWEEP: f64 = 4.0 * PI / 3.0;
/// Outline opacity of distributed-load bands
const BAND_STROKE_ALPHA: f32 = 0.7;
/// Upper bound on hatch lines in one fixed support
pub const MAX_HATCH_LINES: usize = 64;
/// Upper bound on interior arrows in one distributed band
pub const MAX_INTERIOR_ARROWS: usize = 512;

// ============================================================================
// Glyph
// ============================================================================

/// Kind of model element a glyph depicts (also its scaling group for loads)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "kind", rename_all = "snake_case")]
pub enum GlyphKind {
    Support(SupportKind),
    Load(LoadKind),
}

/// Rendered geometry of one model element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub element: ElementRef,
    pub kind: GlyphKind,
    pub primitives: Vec<Primitive>,
    /// Gradient resource owned by this glyph (distributed loads only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientId>,
}

impl Glyph {
    /// Extent of the drawn shapes, labels excluded
    pub fn bounds(&self) -> Option<Bounds> {
        self.primitives
            .iter()
            .filter_map(Primitive::bounds)
            .reduce(Bounds::union)
    }

    /// Blend toward `to`.
    ///
    /// Primitives pair up by index, so builders put every variable-length
    /// run last. Parts only present in `to` fade in with `t`; parts only
    /// present in `self` fade out and are gone at `t = 1`. Identity and paint
    /// resources come from `to`.
    pub fn interpolate(&self, to: &Glyph, t: f64) -> Glyph {
        let t = t.clamp(0.0, 1.0);
        let mut primitives: Vec<Primitive> = to
            .primitives
            .iter()
            .enumerate()
            .map(|(i, target)| match self.primitives.get(i) {
                Some(from) => from.lerp(target, t),
                None => {
                    let mut fresh = target.clone();
                    fresh.fade(t as f32);
                    fresh
                }
            })
            .collect();
        if t < 1.0 {
            primitives.extend(self.primitives.iter().skip(to.primitives.len()).map(|stale| {
                let mut stale = stale.clone();
                stale.fade((1.0 - t) as f32);
                stale
            }));
        }
        Glyph {
            element: to.element,
            kind: to.kind,
            primitives,
            gradient: to.gradient,
        }
    }

    /// Copy with every solid color replaced by `color`
    pub fn highlighted(&self, color: Color) -> Glyph {
        let mut glyph = self.clone();
        for primitive in &mut glyph.primitives {
            primitive.recolor(color);
        }
        glyph
    }
}

// ============================================================================
// Factory
// ============================================================================

pub struct GlyphFactory<'a> {
    mapper: &'a CoordinateMapper,
    scaling: &'a ScalingEngine,
    style: &'a StylePolicy,
}

impl<'a> GlyphFactory<'a> {
    pub fn new(mapper: &'a CoordinateMapper, scaling: &'a ScalingEngine, style: &'a StylePolicy) -> Self {
        Self { mapper, scaling, style }
    }

    /// The beam itself, from position 0 to the full length
    pub fn beam_line(&self) -> Primitive {
        let y = self.mapper.baseline_y();
        Primitive::Line {
            from: Point::new(self.mapper.beam_start_x(), y),
            to: Point::new(self.mapper.beam_end_x(), y),
            stroke: Stroke::new(self.style.beam_color, self.style.beam_width),
        }
    }

    pub fn build(&self, element: &Element, gradients: &mut GradientRegistry) -> Glyph {
        match element {
            Element::Support(support) => self.support(support),
            Element::Load(load) => self.load(load, gradients),
        }
    }

    pub fn support(&self, support: &Support) -> Glyph {
        let style = self.style;
        let x = self.mapper.to_screen_x(support.position);
        let y = self.mapper.baseline_y();
        let size = style.support_size;
        let half = size / 2.0;
        let fill = Paint::Solid(style.support_color);

        let mut primitives = match support.kind {
            SupportKind::Pin => vec![Primitive::Polygon {
                points: vec![Point::new(x, y), Point::new(x + half, y + size), Point::new(x - half, y + size)],
                fill,
            }],
            SupportKind::Roller => vec![Primitive::Circle {
                center: Point::new(x, y + half),
                radius: half,
                fill,
            }],
            SupportKind::Fixed => {
                let mut parts = vec![Primitive::Rect {
                    origin: Point::new(x - half, y),
                    width: size,
                    height: size,
                    fill,
                    stroke: None,
                }];
                if let Some((count, spacing)) = hatch_layout(size, style.hatch_spacing) {
                    parts.extend((0..=count).map(|i| {
                        let hx = x - half + i as f64 * spacing;
                        Primitive::Line {
                            from: Point::new(hx, y),
                            to: Point::new(hx, y + size),
                            stroke: Stroke::new(style.hatch_color, 1.0),
                        }
                    }));
                }
                parts
            }
        };

        let label_size = (style.label_size - 2.0).max(1.0);
        primitives.push(Primitive::Text {
            content: format!("{:.1} {}", support.position, style.units.length()),
            position: Point::new(x, y + size + style.label_gap + label_size / 2.0),
            size: label_size,
            color: style.support_color,
            anchor: TextAnchor::Middle,
        });

        Glyph {
            element: ElementRef::Support(support.id),
            kind: GlyphKind::Support(support.kind),
            primitives,
            gradient: None,
        }
    }

    /// Build a load glyph. Distributed loads with gradient fill allocate a
    /// fresh gradient; retiring the previous one is the caller's job.
    pub fn load(&self, load: &Load, gradients: &mut GradientRegistry) -> Glyph {
        let mut gradient = None;
        let primitives = match load.kind {
            LoadKind::Point => self.point_load(load),
            LoadKind::Distributed => self.distributed_load(load, gradients, &mut gradient),
            LoadKind::Moment => self.moment_load(load),
        };
        Glyph {
            element: ElementRef::Load(load.id),
            kind: GlyphKind::Load(load.kind),
            primitives,
            gradient,
        }
    }

    /// -1 above the beam, +1 below
    fn side(load: &Load) -> f64 {
        if load.is_downward() {
            -1.0
        } else {
            1.0
        }
    }

    fn label(&self, load: &Load, position: Point, color: Color) -> Primitive {
        let magnitude = if load.magnitude.is_finite() { load.magnitude.abs() } else { 0.0 };
        Primitive::Text {
            content: format!("{:.1} {}", magnitude, self.style.units.load_unit(load.kind)),
            position,
            size: self.style.label_size,
            color,
            anchor: TextAnchor::Middle,
        }
    }

    fn point_load(&self, load: &Load) -> Vec<Primitive> {
        let style = self.style;
        let side = Self::side(load);
        let color = style.load_color(load.kind);
        let height = self.scaling.height_of(load.magnitude, load.kind);

        let x = self.mapper.to_screen_x(load.position);
        let tip_y = self.mapper.baseline_y() + side * style.offset.gap_for(height);
        let far_y = tip_y + side * height;

        vec![
            Primitive::Line {
                from: Point::new(x, tip_y + side * style.arrow_overlap),
                to: Point::new(x, far_y),
                stroke: Stroke::new(color, style.load_line_width),
            },
            arrowhead(Point::new(x, tip_y), (0.0, -side), style.arrow_size, color),
            self.label(
                load,
                Point::new(x, far_y + side * (style.label_gap + style.label_size / 2.0)),
                color,
            ),
        ]
    }

    fn distributed_load(
        &self,
        load: &Load,
        gradients: &mut GradientRegistry,
        gradient: &mut Option<GradientId>,
    ) -> Vec<Primitive> {
        let style = self.style;
        let side = Self::side(load);
        let color = style.load_color(load.kind);
        let height = self.scaling.height_of(load.magnitude, load.kind);

        let x0 = self.mapper.to_screen_x(load.position);
        let width = self.mapper.length_to_screen(load.extent.unwrap_or(0.0)).max(0.0);
        let x1 = x0 + width;
        let tip_y = self.mapper.baseline_y() + side * style.offset.gap_for(height);
        let far_y = tip_y + side * height;

        let fill = match style.fill {
            LoadFill::Gradient => {
                let axis = if side < 0.0 {
                    GradientAxis::BottomToTop
                } else {
                    GradientAxis::TopToBottom
                };
                let id = gradients.allocate(color, style.gradient_near_opacity, style.gradient_far_opacity, axis);
                *gradient = Some(id);
                Paint::Gradient(id)
            }
            LoadFill::Solid => {
                Paint::Solid(color.with_alpha((style.gradient_near_opacity + style.gradient_far_opacity) / 2.0))
            }
        };

        // Fixed parts first; the interior arrow run varies with the width
        let mut primitives = vec![
            Primitive::Rect {
                origin: Point::new(x0, tip_y.min(far_y)),
                width,
                height,
                fill,
                stroke: Some(Stroke::new(color.with_alpha(BAND_STROKE_ALPHA), 1.0)),
            },
            arrowhead(Point::new(x0, tip_y), (0.0, -side), style.arrow_size, color),
            arrowhead(Point::new(x1, tip_y), (0.0, -side), style.arrow_size, color),
            self.label(
                load,
                Point::new(
                    (x0 + x1) / 2.0,
                    far_y + side * (style.label_gap + style.label_size / 2.0),
                ),
                color,
            ),
        ];

        let count = interior_arrow_count(width, style.arrow_spacing);
        for i in 1..=count {
            let x = x0 + i as f64 * width / (count + 1) as f64;
            primitives.push(Primitive::Line {
                from: Point::new(x, tip_y + side * style.arrow_overlap),
                to: Point::new(x, far_y),
                stroke: Stroke::new(color, style.load_line_width / 2.0),
            });
            primitives.push(arrowhead(Point::new(x, tip_y), (0.0, -side), style.arrow_size, color));
        }
        primitives
    }

    fn moment_load(&self, load: &Load) -> Vec<Primitive> {
        let style = self.style;
        let color = style.load_color(load.kind);
        let center = Point::new(self.mapper.to_screen_x(load.position), self.mapper.baseline_y());
        let radius = style.moment_radius;

        // Opening centered below the beam; positive screen angles run clockwise
        let clockwise = load.is_downward();
        let gap_half = (2.0 * PI - MOMENT_SWEEP) / 2.0;
        let (start, sweep) = if clockwise {
            (FRAC_PI_2 + gap_half, MOMENT_SWEEP)
        } else {
            (FRAC_PI_2 - gap_half, -MOMENT_SWEEP)
        };
        let end = start + sweep;
        let end_point = Point::new(center.x + radius * end.cos(), center.y + radius * end.sin());
        let turn = sweep.signum();
        let tangent = (-end.sin() * turn, end.cos() * turn);
        let tip = Point::new(
            end_point.x + tangent.0 * style.arrow_size / 2.0,
            end_point.y + tangent.1 * style.arrow_size / 2.0,
        );

        vec![
            Primitive::Arc {
                center,
                radius,
                start_angle: start,
                sweep_angle: sweep,
                stroke: Stroke::new(color, style.load_line_width),
            },
            arrowhead(tip, tangent, style.arrow_size, color),
            Primitive::Circle {
                center,
                radius: (radius * 0.2).max(2.0),
                fill: Paint::Solid(color),
            },
            self.label(
                load,
                Point::new(center.x, center.y - radius - style.label_gap - style.label_size / 2.0),
                color,
            ),
        ]
    }
}

/// Interior arrows of a distributed band of `width` px
pub fn interior_arrow_count(width: f64, spacing: f64) -> usize {
    let fitted = if spacing > 0.0 && width.is_finite() {
        (width / spacing).floor().clamp(0.0, MAX_INTERIOR_ARROWS as f64) as usize
    } else {
        0
    };
    fitted.max(2)
}

/// Hatch line count (gaps) and spacing across a support of `size` px.
///
/// Spacing widens so no more than [`MAX_HATCH_LINES`] lines are drawn.
fn hatch_layout(size: f64, spacing: f64) -> Option<(usize, f64)> {
    if !(size.is_finite() && spacing.is_finite() && size > 0.0 && spacing > 0.0) {
        return None;
    }
    let gaps = MAX_HATCH_LINES - 1;
    if (size / spacing).floor() >= gaps as f64 {
        return Some((gaps, size / gaps as f64));
    }
    Some(((size / spacing).floor() as usize, spacing))
}

/// Filled triangle with its point at `tip`, pointing along unit `direction`
fn arrowhead(tip: Point, direction: (f64, f64), size: f64, color: Color) -> Primitive {
    let (dx, dy) = direction;
    let base = Point::new(tip.x - dx * size, tip.y - dy * size);
    let half = size * ARROW_HALF_WIDTH;
    let (nx, ny) = (-dy * half, dx * half);
    Primitive::Polygon {
        points: vec![tip, Point::new(base.x + nx, base.y + ny), Point::new(base.x - nx, base.y - ny)],
        fill: Paint::Solid(color),
    }
}
