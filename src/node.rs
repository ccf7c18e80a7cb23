use iced::{Point, Rectangle, Size};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::circuit::{Circuit, PortId};
use crate::draw::{Drawable, Surface, palette};
use crate::port::PortDirection;

pub const NODE_WIDTH: f32 = 90.0;
pub const NODE_MIN_HEIGHT: f32 = 48.0;
pub const PORT_PITCH: f32 = 24.0;
/// How far ports sit outside the node's left/right edge
pub const PORT_OFFSET: f32 = 4.0;
const BORDER: f32 = 1.5;
const LABEL_SIZE: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Not,
    /// Circuit entry terminal, a single output
    Start,
    /// Circuit exit terminal, a single input
    End,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown gate type {0:?}")]
pub struct UnknownGate(pub String);

/// Tags the palette buttons hand to the node factory
pub const PALETTE: [&str; 3] = ["and", "or", "not"];

impl GateKind {
    /// Number of (input, output) ports
    pub fn arity(self) -> (usize, usize) {
        match self {
            GateKind::And | GateKind::Or => (2, 1),
            GateKind::Not => (1, 1),
            GateKind::Start => (0, 1),
            GateKind::End => (1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Start => "IN",
            GateKind::End => "OUT",
        }
    }

    /// Truth table of the gate. Missing inputs read as low.
    #[allow(dead_code)]
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        let input = |i: usize| inputs.get(i).copied().unwrap_or(false);
        match self {
            GateKind::And => input(0) && input(1),
            GateKind::Or => input(0) || input(1),
            GateKind::Not => !input(0),
            GateKind::Start => false,
            GateKind::End => input(0),
        }
    }
}

impl FromStr for GateKind {
    type Err = UnknownGate;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "and" => Ok(GateKind::And),
            "or" => Ok(GateKind::Or),
            "not" => Ok(GateKind::Not),
            other => Err(UnknownGate(other.to_string())),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct LogicNode {
    pub kind: GateKind,
    /// Top-left corner of the glyph
    pub position: Point,
    pub inputs: Vec<PortId>,
    pub outputs: Vec<PortId>,
}

impl LogicNode {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn size(&self) -> Size {
        node_size(self.kind)
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position, self.size())
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Ports of one side, in layout order
    pub fn ports(&self, direction: PortDirection) -> &[PortId] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    pub fn all_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }

    /// Where the `index`-th port of a side sits for the current anchor.
    pub fn port_position(&self, direction: PortDirection, index: usize) -> Point {
        port_position(self.bounds(), direction, index, self.ports(direction).len())
    }
}

pub fn node_size(kind: GateKind) -> Size {
    let (inputs, outputs) = kind.arity();
    let rows = inputs.max(outputs) as f32;
    Size::new(NODE_WIDTH, (rows * PORT_PITCH).max(NODE_MIN_HEIGHT))
}

/// Ports are spread evenly along the edge, pushed slightly outward.
pub fn port_position(bounds: Rectangle, direction: PortDirection, index: usize, count: usize) -> Point {
    let x = match direction {
        PortDirection::Input => bounds.x - PORT_OFFSET,
        PortDirection::Output => bounds.x + bounds.width + PORT_OFFSET,
    };
    let y = bounds.y + bounds.height * (index as f32 + 1.0) / (count as f32 + 1.0);
    Point::new(x, y)
}

impl Drawable for LogicNode {
    fn draw(&self, circuit: &Circuit, surface: &mut dyn Surface) {
        let size = self.size();

        surface.fill_rect(
            Point::new(self.position.x - BORDER, self.position.y - BORDER),
            Size::new(size.width + 2.0 * BORDER, size.height + 2.0 * BORDER),
            palette::NODE_BORDER,
        );
        surface.fill_rect(self.position, size, palette::NODE_BG);

        // Roughly centered, glyph widths are not measured
        let label = self.label();
        let text_width = label.len() as f32 * LABEL_SIZE * 0.6;
        surface.fill_text(
            label,
            Point::new(
                self.position.x + (size.width - text_width) / 2.0,
                self.position.y + (size.height - LABEL_SIZE) / 2.0,
            ),
            LABEL_SIZE,
            palette::TEXT_PRIMARY,
        );

        for port in self.all_ports().filter_map(|id| circuit.port(id)) {
            port.draw(circuit, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_tags() {
        assert!(PALETTE.iter().all(|tag| tag.parse::<GateKind>().is_ok()));
        assert_eq!("and".parse(), Ok(GateKind::And));
        assert_eq!("or".parse(), Ok(GateKind::Or));
        assert_eq!("not".parse(), Ok(GateKind::Not));
        assert_eq!(
            "xor".parse::<GateKind>(),
            Err(UnknownGate("xor".to_string()))
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(GateKind::And.arity(), (2, 1));
        assert_eq!(GateKind::Or.arity(), (2, 1));
        assert_eq!(GateKind::Not.arity(), (1, 1));
    }

    #[test]
    fn test_truth_tables() {
        assert!(GateKind::And.evaluate(&[true, true]));
        assert!(!GateKind::And.evaluate(&[true, false]));
        assert!(GateKind::Or.evaluate(&[false, true]));
        assert!(!GateKind::Or.evaluate(&[false, false]));
        assert!(GateKind::Not.evaluate(&[false]));
        assert!(GateKind::Not.evaluate(&[]));
    }

    #[test]
    fn test_ports_spread_along_edges() {
        let bounds = Rectangle::new(Point::new(100.0, 100.0), Size::new(90.0, 60.0));

        let first = port_position(bounds, PortDirection::Input, 0, 2);
        let second = port_position(bounds, PortDirection::Input, 1, 2);
        assert_eq!(first, Point::new(96.0, 120.0));
        assert_eq!(second, Point::new(96.0, 140.0));

        let out = port_position(bounds, PortDirection::Output, 0, 1);
        assert_eq!(out, Point::new(194.0, 130.0));
    }

    #[test]
    fn test_node_height_grows_with_ports() {
        assert_eq!(node_size(GateKind::Not).height, NODE_MIN_HEIGHT);
        assert_eq!(node_size(GateKind::And).height, NODE_MIN_HEIGHT);
        assert!(node_size(GateKind::And).width > 0.0);
    }
}
