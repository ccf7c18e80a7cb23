//! Rendering seam between the editor core and whatever paints the canvas.

use iced::{Color, Point, Size};

use crate::circuit::Circuit;

/// The drawing primitives the editor needs from a 2D surface.
///
/// All coordinates are in device pixels.
pub trait Surface {
    /// Wipe the entire surface.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color);

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color);

    fn fill_text(&mut self, content: &str, position: Point, size: f32, color: Color);
}

/// Anything that can render itself onto a [`Surface`].
///
/// Items look up the objects they reference (ports of a wire, ports of a
/// node) through the circuit arena.
pub trait Drawable {
    fn draw(&self, circuit: &Circuit, surface: &mut dyn Surface);
}

// Color palette - breadboard at night
pub mod palette {
    use iced::Color;

    pub const BACKGROUND: Color = Color::from_rgb(0.075, 0.075, 0.085);

    pub const NODE_BG: Color = Color::from_rgb(0.15, 0.15, 0.18);
    pub const NODE_BORDER: Color = Color::from_rgb(0.30, 0.30, 0.36);
    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.92, 0.92, 0.94);

    // Warm amber for outputs, cool cyan for inputs
    pub const PORT_OUTPUT: Color = Color::from_rgb(0.92, 0.65, 0.25);
    pub const PORT_INPUT: Color = Color::from_rgb(0.30, 0.75, 0.85);

    pub const LIVE_WIRE: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.45);
    pub const COMMITTED_WIRE: Color = Color::from_rgb(0.35, 0.75, 0.45);
}
