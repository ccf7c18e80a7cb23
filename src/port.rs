use iced::{Color, Point};

use crate::circuit::{Circuit, NodeId, WireId};
use crate::draw::{Drawable, Surface};

pub const PORT_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// A connection endpoint.
///
/// Ports created by a node keep a `node` back-reference for the node's
/// lifetime. Transient ports (the live wire's cursor end) have none.
#[derive(Debug, Clone)]
pub struct Port {
    pub position: Point,
    pub radius: f32,
    pub color: Color,
    pub node: Option<NodeId>,
    /// Committed wires terminating here
    wires: Vec<WireId>,
}

impl Port {
    pub fn new(position: Point, radius: f32, color: Color, node: Option<NodeId>) -> Self {
        Self {
            position,
            radius,
            color,
            node,
            wires: Vec::new(),
        }
    }

    /// An invisible endpoint that still takes part in geometry.
    pub fn anchor(position: Point) -> Self {
        Self::new(position, 0.0, Color::TRANSPARENT, None)
    }

    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    pub(crate) fn attach(&mut self, wire: WireId) {
        if !self.wires.contains(&wire) {
            self.wires.push(wire);
        }
    }

    pub(crate) fn detach(&mut self, wire: WireId) {
        self.wires.retain(|&w| w != wire);
    }

    pub(crate) fn take_wires(&mut self) -> Vec<WireId> {
        std::mem::take(&mut self.wires)
    }
}

impl Drawable for Port {
    fn draw(&self, _circuit: &Circuit, surface: &mut dyn Surface) {
        if self.radius > 0.0 {
            surface.fill_circle(self.position, self.radius, self.color);
        }
    }
}
