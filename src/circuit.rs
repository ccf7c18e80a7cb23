//! Arena owning every node, port and wire of the canvas.
//!
//! Objects refer to each other by id only. Port → wire and port → node
//! links are plain id fields, so removing an object never leaves a
//! dangling borrow, only an id that no longer resolves.

use iced::{Color, Point, Rectangle};
use std::collections::HashMap;
use std::ops::Index;

use crate::draw::palette;
use crate::node::{GateKind, LogicNode, node_size, port_position};
use crate::port::{PORT_RADIUS, Port, PortDirection};
use crate::wire::Wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub u32);

#[derive(Debug, Default)]
pub struct Circuit {
    nodes: HashMap<NodeId, LogicNode>,
    ports: HashMap<PortId, Port>,
    wires: HashMap<WireId, Wire>,
    next_id: u32,
}

impl Circuit {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&LogicNode> {
        self.nodes.get(&id)
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(&id)
    }

    pub fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.get_mut(&id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    pub fn wire_mut(&mut self, id: WireId) -> Option<&mut Wire> {
        self.wires.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LogicNode)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    #[cfg(test)]
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().map(|(&id, wire)| (id, wire))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Owning node of a port, `None` for transient endpoints.
    pub fn owner(&self, port: PortId) -> Option<NodeId> {
        self.ports.get(&port).and_then(|p| p.node)
    }

    pub fn insert_port(&mut self, port: Port) -> PortId {
        let id = PortId(self.next_id());
        self.ports.insert(id, port);
        id
    }

    pub fn remove_port(&mut self, id: PortId) -> Option<Port> {
        self.ports.remove(&id)
    }

    pub fn insert_wire(&mut self, wire: Wire) -> WireId {
        let id = WireId(self.next_id());
        self.wires.insert(id, wire);
        id
    }

    /// Drop a wire and clear it from both endpoints' wire lists.
    pub fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let wire = self.wires.remove(&id)?;
        for end in [wire.pt1, wire.pt2] {
            if let Some(port) = self.ports.get_mut(&end) {
                port.detach(id);
            }
        }
        Some(wire)
    }

    /// Create a node with its full set of ports laid out around `position`.
    pub fn insert_node(&mut self, kind: GateKind, position: Point) -> NodeId {
        let id = NodeId(self.next_id());
        let (input_count, output_count) = kind.arity();
        let bounds = Rectangle::new(position, node_size(kind));

        let inputs = self.spawn_ports(id, bounds, PortDirection::Input, input_count);
        let outputs = self.spawn_ports(id, bounds, PortDirection::Output, output_count);

        self.nodes.insert(
            id,
            LogicNode {
                kind,
                position,
                inputs,
                outputs,
            },
        );
        id
    }

    fn spawn_ports(
        &mut self,
        owner: NodeId,
        bounds: Rectangle,
        direction: PortDirection,
        count: usize,
    ) -> Vec<PortId> {
        let color: Color = match direction {
            PortDirection::Input => palette::PORT_INPUT,
            PortDirection::Output => palette::PORT_OUTPUT,
        };
        (0..count)
            .map(|index| {
                let at = port_position(bounds, direction, index, count);
                self.insert_port(Port::new(at, PORT_RADIUS, color, Some(owner)))
            })
            .collect()
    }

    /// Detach a node from the arena. Its ports and wires are left for the
    /// caller to tear down.
    pub fn remove_node(&mut self, id: NodeId) -> Option<LogicNode> {
        self.nodes.remove(&id)
    }

    /// Move a node's anchor and recompute its port positions.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.position = position;
        let node = &self.nodes[&id];
        for direction in [PortDirection::Input, PortDirection::Output] {
            for (index, port_id) in node.ports(direction).iter().enumerate() {
                let at = node.port_position(direction, index);
                if let Some(port) = self.ports.get_mut(port_id) {
                    port.position = at;
                }
            }
        }
        true
    }

    /// Topmost node whose body contains `point`.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.contains(point))
            .map(|(&id, _)| id)
            .max()
    }

    /// Closest committed wire within `tolerance` of `point`, skipping `except`.
    pub fn wire_at(&self, point: Point, tolerance: f32, except: WireId) -> Option<WireId> {
        self.wires
            .iter()
            .filter(|&(&id, _)| id != except)
            .filter_map(|(&id, wire)| {
                let a = self.ports.get(&wire.pt1)?.position;
                let b = self.ports.get(&wire.pt2)?.position;
                Some((id, distance_to_segment(point, a, b)))
            })
            .filter(|&(_, dist)| dist <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl Index<WireId> for Circuit {
    type Output = Wire;

    fn index(&self, id: WireId) -> &Wire {
        &self.wires[&id]
    }
}

/// Minimum distance from a point to a line segment.
fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq == 0.0 {
        return point.distance(a);
    }

    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_node_creates_owned_ports() {
        let mut circuit = Circuit::default();
        let id = circuit.insert_node(GateKind::And, Point::new(10.0, 10.0));
        let node = circuit.node(id).unwrap();
        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.outputs.len(), 1);
        for port in node.all_ports() {
            assert_eq!(circuit.owner(port), Some(id));
        }
    }

    #[test]
    fn test_move_node_relayouts_ports() {
        let mut circuit = Circuit::default();
        let id = circuit.insert_node(GateKind::Not, Point::new(0.0, 0.0));
        let output = circuit.node(id).unwrap().outputs[0];
        let before = circuit.port(output).unwrap().position;

        assert!(circuit.move_node(id, Point::new(50.0, 20.0)));
        let after = circuit.port(output).unwrap().position;
        assert_eq!(after, Point::new(before.x + 50.0, before.y + 20.0));

        assert!(!circuit.move_node(NodeId(999), Point::ORIGIN));
    }

    #[test]
    fn test_remove_wire_detaches_endpoints() {
        let mut circuit = Circuit::default();
        let a = circuit.insert_port(Port::anchor(Point::new(0.0, 0.0)));
        let b = circuit.insert_port(Port::anchor(Point::new(10.0, 0.0)));
        let wire = circuit.insert_wire(Wire::live(a).snapshot(b));
        circuit.port_mut(a).unwrap().attach(wire);
        circuit.port_mut(b).unwrap().attach(wire);

        assert!(circuit.remove_wire(wire).is_some());
        assert!(circuit.port(a).unwrap().wires().is_empty());
        assert!(circuit.port(b).unwrap().wires().is_empty());
        assert!(circuit.remove_wire(wire).is_none());
    }

    #[test]
    fn test_wire_hit_test() {
        let mut circuit = Circuit::default();
        let a = circuit.insert_port(Port::anchor(Point::new(0.0, 0.0)));
        let b = circuit.insert_port(Port::anchor(Point::new(100.0, 0.0)));
        let wire = circuit.insert_wire(Wire::live(a).snapshot(b));

        assert_eq!(circuit.wire_at(Point::new(50.0, 3.0), 6.0, WireId(u32::MAX)), Some(wire));
        assert_eq!(circuit.wire_at(Point::new(50.0, 30.0), 6.0, WireId(u32::MAX)), None);
        assert_eq!(circuit.wire_at(Point::new(50.0, 3.0), 6.0, wire), None);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(distance_to_segment(p, Point::ORIGIN, Point::ORIGIN), 5.0);
    }
}
