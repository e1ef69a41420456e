//! Canvas program for the beam scene
//!
//! Walks a [`SceneFrame`] and issues the matching iced canvas calls. Pointer
//! presses, cursor motion (and the cursor leaving) and the Delete key are
//! published back to the app; the canvas also reports its size so the
//! diagram can lay out for it.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, gradient, path, Action, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{keyboard, mouse, Color, Element, Length, Point, Radians, Rectangle, Renderer, Size, Theme};
use uuid::Uuid;

use beam_core::render::{self as scene, GradientAxis, GradientDef, Paint, Primitive, SceneFrame, TextAnchor};

use crate::Message;

/// Canvas showing one scene frame
pub struct BeamCanvas<'a> {
    frame: &'a SceneFrame,
    /// Selected element and the color its gradients are tinted with
    highlight: Option<(Uuid, scene::Color)>,
    /// Hovered element, tinted unless it is also selected
    hover: Option<(Uuid, scene::Color)>,
}

pub fn view_canvas<'a>(
    frame: &'a SceneFrame,
    highlight: Option<(Uuid, scene::Color)>,
    hover: Option<(Uuid, scene::Color)>,
) -> Element<'a, Message> {
    Canvas::new(BeamCanvas { frame, highlight, hover })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

impl canvas::Program<Message> for BeamCanvas<'_> {
    /// Whether the cursor was last seen over the canvas
    type State = bool;

    fn update(
        &self,
        inside: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let size = bounds.size();
        let known = self.frame.viewport.map(|v| Size::new(v.width as f32, v.height as f32));
        if known != Some(size) {
            return Some(Action::publish(Message::CanvasResized(size)));
        }

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                Some(Action::publish(Message::CanvasPressed(position)).and_capture())
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => match cursor.position_in(bounds) {
                Some(position) => {
                    *inside = true;
                    Some(Action::publish(Message::CursorMoved(position)))
                }
                None if *inside => {
                    *inside = false;
                    Some(Action::publish(Message::CursorLeft))
                }
                None => None,
            },
            canvas::Event::Mouse(mouse::Event::CursorLeft) if *inside => {
                *inside = false;
                Some(Action::publish(Message::CursorLeft))
            }
            canvas::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Delete),
                ..
            }) => Some(Action::publish(Message::DeleteSelected)),
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let gradients = &self.frame.gradients;

        for line in &self.frame.grid {
            draw_primitive(&mut frame, line, gradients, None);
        }
        if let Some(beam) = &self.frame.beam {
            draw_primitive(&mut frame, beam, gradients, None);
        }
        for glyph in &self.frame.glyphs {
            let tint = [self.highlight, self.hover]
                .into_iter()
                .flatten()
                .find(|(id, _)| *id == glyph.element.id())
                .map(|(_, color)| color);
            for primitive in &glyph.primitives {
                draw_primitive(&mut frame, primitive, gradients, tint);
            }
        }
        for line in &self.frame.dimensions {
            draw_primitive(&mut frame, line, gradients, None);
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(&self, _state: &Self::State, bounds: Rectangle, cursor: mouse::Cursor) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

// ============================================================================
// Primitive translation
// ============================================================================

fn draw_primitive(frame: &mut Frame, primitive: &Primitive, gradients: &[GradientDef], tint: Option<scene::Color>) {
    match primitive {
        Primitive::Line { from, to, stroke } => {
            let line = Path::line(point(*from), point(*to));
            frame.stroke(&line, to_stroke(*stroke));
        }
        Primitive::Polygon { points, fill } => {
            let Some(bounds) = scene::Bounds::from_points(points) else {
                return;
            };
            let polygon = Path::new(|builder| {
                let mut iter = points.iter();
                if let Some(first) = iter.next() {
                    builder.move_to(point(*first));
                    for p in iter {
                        builder.line_to(point(*p));
                    }
                    builder.close();
                }
            });
            frame.fill(&polygon, to_fill(*fill, bounds, gradients, tint));
        }
        Primitive::Rect {
            origin,
            width,
            height,
            fill,
            stroke,
        } => {
            let rect = Path::rectangle(point(*origin), Size::new(*width as f32, *height as f32));
            let bounds = scene::Bounds::from_corners(
                *origin,
                scene::Point::new(origin.x + width, origin.y + height),
            );
            frame.fill(&rect, to_fill(*fill, bounds, gradients, tint));
            if let Some(stroke) = stroke {
                frame.stroke(&rect, to_stroke(*stroke));
            }
        }
        Primitive::Circle { center, radius, fill } => {
            let circle = Path::circle(point(*center), *radius as f32);
            let bounds = scene::Bounds::from_corners(
                scene::Point::new(center.x - radius, center.y - radius),
                scene::Point::new(center.x + radius, center.y + radius),
            );
            frame.fill(&circle, to_fill(*fill, bounds, gradients, tint));
        }
        Primitive::Arc {
            center,
            radius,
            start_angle,
            sweep_angle,
            stroke,
        } => {
            let arc = Path::new(|builder| {
                builder.arc(path::Arc {
                    center: point(*center),
                    radius: *radius as f32,
                    start_angle: Radians(*start_angle as f32),
                    end_angle: Radians((start_angle + sweep_angle) as f32),
                });
            });
            frame.stroke(&arc, to_stroke(*stroke));
        }
        Primitive::Text {
            content,
            position,
            size,
            color,
            anchor,
        } => {
            let align_x = match anchor {
                TextAnchor::Start => Horizontal::Left,
                TextAnchor::Middle => Horizontal::Center,
                TextAnchor::End => Horizontal::Right,
            };
            frame.fill_text(Text {
                content: content.clone(),
                position: point(*position),
                color: to_color(*color),
                size: iced::Pixels(*size as f32),
                align_x: align_x.into(),
                align_y: Vertical::Center,
                ..Text::default()
            });
        }
    }
}

fn point(p: scene::Point) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

fn to_color(c: scene::Color) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

fn to_stroke(stroke: scene::Stroke) -> Stroke<'static> {
    Stroke::default()
        .with_color(to_color(stroke.color))
        .with_width(stroke.width as f32)
}

/// Solid paints map directly; gradients become an absolute linear gradient
/// spanning the shape's box along the resource's axis.
fn to_fill(paint: Paint, bounds: scene::Bounds, gradients: &[GradientDef], tint: Option<scene::Color>) -> canvas::Fill {
    let id = match paint {
        Paint::Solid(color) => return to_color(color).into(),
        Paint::Gradient(id) => id,
    };
    let Some(def) = gradients.iter().find(|g| g.id == id) else {
        tracing::warn!(%id, "gradient not in frame; leaving shape unfilled");
        return Color::TRANSPARENT.into();
    };

    let x = bounds.center().x;
    let (near, far) = match def.axis {
        GradientAxis::BottomToTop => (bounds.max.y, bounds.min.y),
        GradientAxis::TopToBottom => (bounds.min.y, bounds.max.y),
    };
    let base = tint.unwrap_or(def.color);
    let linear = def.stops().into_iter().fold(
        gradient::Linear::new(point(scene::Point::new(x, near)), point(scene::Point::new(x, far))),
        |linear, (offset, color)| linear.add_stop(offset, to_color(base.with_alpha(color.a))),
    );
    canvas::Gradient::Linear(linear).into()
}
