use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, LineCap, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Size};
use log::warn;

use crate::Message;
use crate::draw::{Surface, palette};
use crate::session::{Mode, Session};

#[derive(Debug, Clone)]
pub enum EditorMessage {
    Pressed(Point),
    Moved(Point),
    Released(Point),
    /// The button went up, or the pointer left, away from the canvas
    PointerLost,
    Cancel,
    SetMode(Mode),
    /// Palette tag, one of `"and"`, `"or"`, `"not"`
    AddGate(&'static str),
    Resized,
    Rescaled(f32),
}

impl Session {
    pub fn update(&mut self, message: EditorMessage) {
        match message {
            EditorMessage::Pressed(at) => self.pointer_pressed(at),
            EditorMessage::Moved(at) => self.pointer_moved(at),
            EditorMessage::Released(at) => self.pointer_released(at),
            EditorMessage::PointerLost => self.pointer_lost(),
            EditorMessage::Cancel => self.cancel_wire(),
            EditorMessage::SetMode(mode) => self.set_mode(mode),
            EditorMessage::AddGate(tag) => {
                if let Err(err) = self.add_gate_by_tag(tag) {
                    warn!("{err}");
                }
            }
            EditorMessage::Resized => self.resized(),
            EditorMessage::Rescaled(ratio) => self.set_ratio(ratio),
        }
    }
}

/// [`Surface`] painting into an iced canvas frame. Editor coordinates are
/// device pixels; the frame works in logical pixels.
pub struct FrameSurface<'a> {
    frame: &'a mut Frame,
    ratio: f32,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut Frame, ratio: f32) -> Self {
        Self { frame, ratio }
    }

    fn to_frame(&self, point: Point) -> Point {
        Point::new(point.x / self.ratio, point.y / self.ratio)
    }
}

impl Surface for FrameSurface<'_> {
    fn clear(&mut self) {
        let size = self.frame.size();
        self.frame.fill_rectangle(Point::ORIGIN, size, palette::BACKGROUND);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let disc = Path::circle(self.to_frame(center), radius / self.ratio);
        self.frame.fill(&disc, color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let line = Path::line(self.to_frame(from), self.to_frame(to));
        self.frame.stroke(
            &line,
            Stroke::default()
                .with_color(color)
                .with_width(width / self.ratio)
                .with_line_cap(LineCap::Round),
        );
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color) {
        let size = Size::new(size.width / self.ratio, size.height / self.ratio);
        self.frame.fill_rectangle(self.to_frame(top_left), size, color);
    }

    fn fill_text(&mut self, content: &str, position: Point, size: f32, color: Color) {
        self.frame.fill_text(Text {
            content: content.to_string(),
            position: self.to_frame(position),
            color,
            size: iced::Pixels(size / self.ratio),
            ..Text::default()
        });
    }
}

impl canvas::Program<Message> for Session {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let content = self.display().cache().draw(renderer, bounds.size(), |frame| {
            let mut surface = FrameSurface::new(frame, self.ratio());
            self.display().redraw(self.circuit(), &mut surface);
        });
        vec![content]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let publish = |msg| Some(canvas::Action::publish(Message::Editor(msg)));

        match event {
            iced::Event::Keyboard(iced::keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                use iced::keyboard::Key;

                if modifiers.control() || modifiers.alt() {
                    return None;
                }
                match key.as_ref() {
                    Key::Named(iced::keyboard::key::Named::Escape) => publish(EditorMessage::Cancel),
                    Key::Character("e") => publish(EditorMessage::SetMode(Mode::Edit)),
                    Key::Character("x") => publish(EditorMessage::SetMode(Mode::Erase)),
                    Key::Character("a") => publish(EditorMessage::AddGate("and")),
                    Key::Character("o") => publish(EditorMessage::AddGate("or")),
                    Key::Character("n") => publish(EditorMessage::AddGate("not")),
                    _ => None,
                }
            }
            iced::Event::Window(iced::window::Event::Resized(_)) => publish(EditorMessage::Resized),
            iced::Event::Window(iced::window::Event::Rescaled(factor)) => {
                publish(EditorMessage::Rescaled(*factor))
            }
            iced::Event::Mouse(mouse_event) => {
                let Some(cursor_position) = cursor.position_in(bounds) else {
                    // A press that started on the canvas must not outlive the button
                    return match mouse_event {
                        mouse::Event::ButtonReleased(mouse::Button::Left) | mouse::Event::CursorLeft => {
                            publish(EditorMessage::PointerLost)
                        }
                        _ => None,
                    };
                };
                match mouse_event {
                    mouse::Event::ButtonPressed(mouse::Button::Left) => {
                        publish(EditorMessage::Pressed(cursor_position))
                    }
                    mouse::Event::ButtonReleased(mouse::Button::Left) => {
                        publish(EditorMessage::Released(cursor_position))
                    }
                    mouse::Event::CursorMoved { .. } => publish(EditorMessage::Moved(cursor_position)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        let Some(pos) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        let pos = Point::new(pos.x * self.ratio(), pos.y * self.ratio());

        if self.dragging().is_some() {
            return mouse::Interaction::Grabbing;
        }
        match self.mode() {
            Mode::Erase => {
                if self.circuit().node_at(pos).is_some() {
                    mouse::Interaction::NotAllowed
                } else {
                    mouse::Interaction::default()
                }
            }
            Mode::Edit => {
                if self.snap_target(pos).is_some() {
                    mouse::Interaction::Crosshair
                } else if self.circuit().node_at(pos).is_some() {
                    mouse::Interaction::Grab
                } else {
                    mouse::Interaction::default()
                }
            }
        }
    }
}
