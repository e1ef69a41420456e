//! Scene primitives
//!
//! Renderer-agnostic vector geometry in screen space (pixels, y grows
//! downward). Front-ends walk these primitives and issue the matching draw
//! calls; the core never touches a drawing API.

use serde::{Deserialize, Serialize};

// ============================================================================
// Points & Bounds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Box spanning two corners in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing all points, `None` if there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Bounds::from_corners(first, first), |b, p| b.include(*p)))
    }

    pub fn include(self, p: Point) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    pub fn union(self, other: Bounds) -> Bounds {
        self.include(other.min).include(other.max)
    }

    pub fn inflate(self, by: f64) -> Bounds {
        Bounds {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(self.max, 0.5)
    }
}

// ============================================================================
// Color & Paint
// ============================================================================

/// RGBA color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);

    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, to: Color, t: f64) -> Color {
        let t = t as f32;
        Color {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }

    /// `#rrggbb` string, as used in exported frames
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b))
    }
}

/// Handle to a gradient resource owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradientId(pub u64);

impl std::fmt::Display for GradientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "load-gradient-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Paint {
    Solid(Color),
    Gradient(GradientId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

// ============================================================================
// Primitives
// ============================================================================

/// One drawable element of a glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Closed, filled polygon
    Polygon {
        points: Vec<Point>,
        fill: Paint,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        fill: Paint,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Paint,
    },
    /// Open arc; angles in radians, screen space (positive sweep is clockwise)
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        stroke: Stroke,
    },
    /// Label; `position` is the anchor point, text is centered on it vertically
    Text {
        content: String,
        position: Point,
        size: f64,
        color: Color,
        anchor: TextAnchor,
    },
}

impl Primitive {
    /// Geometric extent; labels are excluded so they never widen hit areas
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Primitive::Line { from, to, .. } => Some(Bounds::from_corners(*from, *to)),
            Primitive::Polygon { points, .. } => Bounds::from_points(points),
            Primitive::Rect {
                origin, width, height, ..
            } => Some(Bounds::from_corners(
                *origin,
                Point::new(origin.x + width, origin.y + height),
            )),
            Primitive::Circle { center, radius, .. } | Primitive::Arc { center, radius, .. } => {
                Some(Bounds::from_corners(
                    Point::new(center.x - radius, center.y - radius),
                    Point::new(center.x + radius, center.y + radius),
                ))
            }
            Primitive::Text { .. } => None,
        }
    }

    /// Interpolate toward `to`.
    ///
    /// Only structurally matching primitives (same variant, same point count)
    /// blend; anything else resolves to the target. Paint resources and label
    /// text always come from the target.
    pub fn lerp(&self, to: &Primitive, t: f64) -> Primitive {
        match (self, to) {
            (
                Primitive::Line { from: f0, to: t0, stroke: s0 },
                Primitive::Line { from: f1, to: t1, stroke: s1 },
            ) => Primitive::Line {
                from: f0.lerp(*f1, t),
                to: t0.lerp(*t1, t),
                stroke: lerp_stroke(*s0, *s1, t),
            },
            (Primitive::Polygon { points: p0, .. }, Primitive::Polygon { points: p1, fill })
                if p0.len() == p1.len() =>
            {
                Primitive::Polygon {
                    points: p0.iter().zip(p1).map(|(a, b)| a.lerp(*b, t)).collect(),
                    fill: lerp_paint(self.fill(), *fill, t),
                }
            }
            (
                Primitive::Rect {
                    origin: o0,
                    width: w0,
                    height: h0,
                    ..
                },
                Primitive::Rect {
                    origin: o1,
                    width: w1,
                    height: h1,
                    fill,
                    stroke,
                },
            ) => Primitive::Rect {
                origin: o0.lerp(*o1, t),
                width: lerp(*w0, *w1, t),
                height: lerp(*h0, *h1, t),
                fill: lerp_paint(self.fill(), *fill, t),
                stroke: *stroke,
            },
            (
                Primitive::Circle {
                    center: c0, radius: r0, ..
                },
                Primitive::Circle {
                    center: c1,
                    radius: r1,
                    fill,
                },
            ) => Primitive::Circle {
                center: c0.lerp(*c1, t),
                radius: lerp(*r0, *r1, t),
                fill: lerp_paint(self.fill(), *fill, t),
            },
            (
                Primitive::Arc {
                    center: c0,
                    radius: r0,
                    start_angle: a0,
                    sweep_angle: s0,
                    stroke: k0,
                },
                Primitive::Arc {
                    center: c1,
                    radius: r1,
                    start_angle: a1,
                    sweep_angle: s1,
                    stroke: k1,
                },
            ) => Primitive::Arc {
                center: c0.lerp(*c1, t),
                radius: lerp(*r0, *r1, t),
                start_angle: lerp(*a0, *a1, t),
                sweep_angle: lerp(*s0, *s1, t),
                stroke: lerp_stroke(*k0, *k1, t),
            },
            (
                Primitive::Text {
                    position: p0, size: z0, color: c0, ..
                },
                Primitive::Text {
                    content,
                    position: p1,
                    size: z1,
                    color: c1,
                    anchor,
                },
            ) => Primitive::Text {
                content: content.clone(),
                position: p0.lerp(*p1, t),
                size: lerp(*z0, *z1, t),
                color: c0.lerp(*c1, t),
                anchor: *anchor,
            },
            _ => to.clone(),
        }
    }

    /// Replace every solid color with `color` (selection highlight)
    pub fn recolor(&mut self, color: Color) {
        match self {
            Primitive::Line { stroke, .. } | Primitive::Arc { stroke, .. } => {
                stroke.color = Color { a: stroke.color.a, ..color };
            }
            Primitive::Polygon { fill, .. } | Primitive::Circle { fill, .. } => recolor_paint(fill, color),
            Primitive::Rect { fill, stroke, .. } => {
                recolor_paint(fill, color);
                if let Some(stroke) = stroke {
                    stroke.color = Color { a: stroke.color.a, ..color };
                }
            }
            Primitive::Text { color: c, .. } => *c = color,
        }
    }

    /// Multiply every alpha by `factor` (fade-in of newly appearing parts)
    pub fn fade(&mut self, factor: f32) {
        let scale = |c: &mut Color| c.a *= factor;
        match self {
            Primitive::Line { stroke, .. } | Primitive::Arc { stroke, .. } => scale(&mut stroke.color),
            Primitive::Polygon { fill, .. } | Primitive::Circle { fill, .. } => {
                if let Paint::Solid(c) = fill {
                    scale(c);
                }
            }
            Primitive::Rect { fill, stroke, .. } => {
                if let Paint::Solid(c) = fill {
                    scale(c);
                }
                if let Some(stroke) = stroke {
                    scale(&mut stroke.color);
                }
            }
            Primitive::Text { color, .. } => scale(color),
        }
    }

    fn fill(&self) -> Option<Paint> {
        match self {
            Primitive::Polygon { fill, .. } | Primitive::Rect { fill, .. } | Primitive::Circle { fill, .. } => {
                Some(*fill)
            }
            _ => None,
        }
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_stroke(a: Stroke, b: Stroke, t: f64) -> Stroke {
    Stroke {
        color: a.color.lerp(b.color, t),
        width: lerp(a.width, b.width, t),
    }
}

fn lerp_paint(from: Option<Paint>, to: Paint, t: f64) -> Paint {
    match (from, to) {
        (Some(Paint::Solid(a)), Paint::Solid(b)) => Paint::Solid(a.lerp(b, t)),
        _ => to,
    }
}

fn recolor_paint(paint: &mut Paint, color: Color) {
    if let Paint::Solid(c) = paint {
        *c = Color { a: c.a, ..color };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_and_inflate() {
        let b = Bounds::from_corners(Point::new(10.0, 20.0), Point::new(0.0, 0.0));
        assert_eq!(b.min, Point::new(0.0, 0.0));
        assert!(b.contains(Point::new(5.0, 5.0)));
        assert!(!b.contains(Point::new(11.0, 5.0)));
        assert!(b.inflate(2.0).contains(Point::new(11.0, 5.0)));
    }

    #[test]
    fn test_line_lerp_midpoint() {
        let stroke = Stroke::new(Color::BLACK, 2.0);
        let a = Primitive::Line { from: Point::new(0.0, 0.0), to: Point::new(0.0, 10.0), stroke };
        let b = Primitive::Line { from: Point::new(0.0, 0.0), to: Point::new(0.0, 30.0), stroke };

        match a.lerp(&b, 0.5) {
            Primitive::Line { to, .. } => assert!((to.y - 20.0).abs() < 1e-9),
            other => panic!("unexpected primitive {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_lerp_takes_target() {
        let a = Primitive::Circle { center: Point::new(0.0, 0.0), radius: 4.0, fill: Paint::Solid(Color::BLACK) };
        let b = Primitive::Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
            fill: Paint::Solid(Color::WHITE),
        };
        assert_eq!(a.lerp(&b, 0.1), b);
    }

    #[test]
    fn test_recolor_keeps_gradient() {
        let mut rect = Primitive::Rect {
            origin: Point::new(0.0, 0.0),
            width: 5.0,
            height: 5.0,
            fill: Paint::Gradient(GradientId(3)),
            stroke: Some(Stroke::new(Color::BLACK.with_alpha(0.7), 1.0)),
        };
        rect.recolor(Color::WHITE);
        match rect {
            Primitive::Rect { fill, stroke, .. } => {
                assert_eq!(fill, Paint::Gradient(GradientId(3)));
                assert_eq!(stroke.unwrap().color, Color::WHITE.with_alpha(0.7));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_text_has_no_bounds() {
        let text = Primitive::Text {
            content: "5.0 kN".to_string(),
            position: Point::new(0.0, 0.0),
            size: 12.0,
            color: Color::BLACK,
            anchor: TextAnchor::Middle,
        };
        assert!(text.bounds().is_none());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_rgb8(0xe5, 0x3e, 0x3e).to_hex(), "#e53e3e");
        assert_eq!(GradientId(7).to_string(), "load-gradient-7");
    }
}
