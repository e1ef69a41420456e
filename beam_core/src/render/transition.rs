//! Eased glyph transitions
//!
//! Time is supplied by the caller as a [`Duration`] since some fixed origin,
//! so transitions never read a clock and never block an update. A new target
//! arriving mid-flight replaces the transition, starting from whatever is
//! currently displayed.

use std::time::Duration;

use super::glyph::Glyph;

/// Cubic ease-in-out on `t ∈ [0, 1]`
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    from: Glyph,
    to: Glyph,
    started: Duration,
    duration: Duration,
}

impl Transition {
    pub fn new(from: Glyph, to: Glyph, started: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Displayed geometry at `now`
    pub fn sample(&self, now: Duration) -> Glyph {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.interpolate(&self.to, ease_cubic_in_out(t))
    }

    pub fn target(&self) -> &Glyph {
        &self.to
    }

    pub fn into_target(self) -> Glyph {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::model::{ElementRef, LoadKind};
    use crate::render::geometry::{Color, Point, Primitive, Stroke};
    use crate::render::glyph::GlyphKind;

    fn shaft(id: Uuid, top: f64) -> Glyph {
        Glyph {
            element: ElementRef::Load(id),
            kind: GlyphKind::Load(LoadKind::Point),
            primitives: vec![Primitive::Line {
                from: Point::new(0.0, 140.0),
                to: Point::new(0.0, top),
                stroke: Stroke::new(Color::BLACK, 2.0),
            }],
            gradient: None,
        }
    }

    fn top_of(glyph: &Glyph) -> f64 {
        match glyph.primitives[0] {
            Primitive::Line { to, .. } => to.y,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_easing_endpoints_and_symmetry() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        let a = ease_cubic_in_out(0.25);
        let b = ease_cubic_in_out(0.75);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.1) < 0.1);
    }

    #[test]
    fn test_sample_over_time() {
        let id = Uuid::new_v4();
        let ms = Duration::from_millis;
        let tr = Transition::new(shaft(id, 80.0), shaft(id, 110.0), ms(1000), ms(300));

        assert_eq!(top_of(&tr.sample(ms(1000))), 80.0);
        assert!((top_of(&tr.sample(ms(1150))) - 95.0).abs() < 1e-9);
        assert_eq!(top_of(&tr.sample(ms(1300))), 110.0);
        assert!(tr.is_finished(ms(1400)));
        assert!(!tr.is_finished(ms(1299)));
        // Clock earlier than the start clamps to the beginning
        assert_eq!(top_of(&tr.sample(ms(10))), 80.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let id = Uuid::new_v4();
        let tr = Transition::new(shaft(id, 80.0), shaft(id, 110.0), Duration::ZERO, Duration::ZERO);
        assert_eq!(top_of(&tr.sample(Duration::ZERO)), 110.0);
        assert_eq!(top_of(tr.target()), 110.0);
    }
}
