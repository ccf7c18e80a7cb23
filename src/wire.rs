use iced::Color;

use crate::circuit::{Circuit, PortId};
use crate::draw::{Drawable, Surface, palette};

pub const LIVE_WIRE_WIDTH: f32 = 2.0;
pub const COMMITTED_WIRE_WIDTH: f32 = 4.0;

/// A straight segment between two ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub pt1: PortId,
    pub pt2: PortId,
    pub color: Color,
    pub thickness: f32,
}

impl Wire {
    /// The rubber-band wire, collapsed onto a single endpoint.
    pub fn live(cursor: PortId) -> Self {
        Self {
            pt1: cursor,
            pt2: cursor,
            color: palette::LIVE_WIRE,
            thickness: LIVE_WIRE_WIDTH,
        }
    }

    /// Freeze this wire into a committed one ending at `end` instead of
    /// its own trailing endpoint, in the fixed committed style.
    pub fn snapshot(&self, end: PortId) -> Self {
        Self {
            pt1: self.pt1,
            pt2: end,
            color: palette::COMMITTED_WIRE,
            thickness: COMMITTED_WIRE_WIDTH,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.pt1 == self.pt2
    }

    /// The endpoint opposite `port`, if `port` is one of the two.
    pub fn other_end(&self, port: PortId) -> Option<PortId> {
        if self.pt1 == port {
            Some(self.pt2)
        } else if self.pt2 == port {
            Some(self.pt1)
        } else {
            None
        }
    }
}

impl Drawable for Wire {
    fn draw(&self, circuit: &Circuit, surface: &mut dyn Surface) {
        let (Some(start), Some(end)) = (circuit.port(self.pt1), circuit.port(self.pt2)) else {
            return;
        };
        start.draw(circuit, surface);
        end.draw(circuit, surface);
        // A round cap would turn a zero-length segment into a stray dot
        if start.position != end.position {
            surface.stroke_line(start.position, end.position, self.thickness, self.color);
        }
    }
}
