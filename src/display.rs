//! The ordered list of everything visible on the canvas.

use iced::widget::canvas::Cache;

use crate::circuit::{Circuit, NodeId, WireId};
use crate::draw::{Drawable, Surface};

/// Handle to a drawable object in the circuit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Node(NodeId),
    Wire(WireId),
}

/// Items render in insertion order, so later items cover earlier ones.
///
/// Every mutation clears the retained geometry cache, which makes the
/// canvas repaint the whole list on the next frame.
pub struct DisplayList {
    items: Vec<Item>,
    cache: Cache,
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cache: Cache::new(),
        }
    }

    pub fn draw(&mut self, item: Item) {
        self.items.push(item);
        self.invalidate();
    }

    pub fn remove(&mut self, item: Item) {
        if let Some(index) = self.items.iter().position(|&i| i == item) {
            self.items.remove(index);
        }
        self.invalidate();
    }

    #[cfg(test)]
    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Drop the retained frame so the next draw repaints everything.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Clear the surface and paint every item in order. Items whose
    /// object is gone from the arena are skipped.
    pub fn redraw(&self, circuit: &Circuit, surface: &mut dyn Surface) {
        surface.clear();
        for item in &self.items {
            match *item {
                Item::Node(id) => {
                    if let Some(node) = circuit.node(id) {
                        node.draw(circuit, surface);
                    }
                }
                Item::Wire(id) => {
                    if let Some(wire) = circuit.wire(id) {
                        wire.draw(circuit, surface);
                    }
                }
            }
        }
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::{Primitive, RecordingSurface};
    use crate::node::GateKind;
    use crate::port::{PORT_RADIUS, Port};
    use crate::wire::Wire;
    use iced::{Color, Point};

    #[test]
    fn test_remove_is_by_identity_and_tolerates_absent() {
        let mut list = DisplayList::new();
        list.draw(Item::Node(NodeId(1)));
        list.draw(Item::Wire(WireId(2)));
        list.remove(Item::Wire(WireId(3)));
        assert_eq!(list.items().len(), 2);

        list.remove(Item::Node(NodeId(1)));
        assert_eq!(list.items(), &[Item::Wire(WireId(2))]);
        assert!(!list.contains(Item::Node(NodeId(1))));
    }

    #[test]
    fn test_redraw_clears_then_paints_in_order() {
        let mut circuit = Circuit::default();
        let a = circuit.insert_port(Port::new(Point::new(1.0, 2.0), PORT_RADIUS, Color::WHITE, None));
        let b = circuit.insert_port(Port::new(Point::new(40.0, 2.0), PORT_RADIUS, Color::WHITE, None));
        let wire = circuit.insert_wire(Wire::live(a).snapshot(b));
        let node = circuit.insert_node(GateKind::Not, Point::new(10.0, 10.0));

        let mut list = DisplayList::new();
        list.draw(Item::Wire(wire));
        list.draw(Item::Node(node));

        let mut surface = RecordingSurface::default();
        list.redraw(&circuit, &mut surface);

        assert_eq!(surface.primitives[0], Primitive::Clear);
        assert!(matches!(surface.primitives[1], Primitive::Circle { .. }));
        assert!(matches!(surface.primitives[2], Primitive::Circle { .. }));
        assert!(matches!(surface.primitives[3], Primitive::Line { .. }));
        assert!(matches!(surface.primitives[4], Primitive::Rect { .. }));
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut circuit = Circuit::default();
        let node = circuit.insert_node(GateKind::And, Point::new(10.0, 10.0));
        let mut list = DisplayList::new();
        list.draw(Item::Node(node));
        list.draw(Item::Wire(WireId(404)));

        let mut surface = RecordingSurface::default();
        list.redraw(&circuit, &mut surface);
        let first = surface.primitives.clone();
        list.redraw(&circuit, &mut surface);

        assert_eq!(surface.primitives, first);
        assert_eq!(surface.clears, 2);
    }
}
