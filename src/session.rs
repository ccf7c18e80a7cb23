//! The editor session: sole owner of the circuit, the connection registry
//! and the display list.
//!
//! Every public method runs to completion with all invariants restored,
//! so a redraw can happen between any two calls.

use iced::{Point, Vector};
use log::{debug, info};

use crate::circuit::{Circuit, NodeId, PortId, WireId};
use crate::config::Config;
use crate::display::{DisplayList, Item};
use crate::layout;
use crate::node::{GateKind, UnknownGate};
use crate::port::{Port, PortDirection};
use crate::registry::Registry;
use crate::wire::Wire;

/// Pointer travel (device pixels) under which a press/release is a click
pub const CLICK_SLOP: f32 = 3.0;
/// How close an erase press must land to a wire to hit it
pub const WIRE_HIT_TOLERANCE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Edit,
    Erase,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    moved: bool,
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    node: NodeId,
    /// Node anchor relative to the pointer at grab time
    offset: Vector,
}

pub struct Session {
    pub(crate) circuit: Circuit,
    pub(crate) registry: Registry,
    pub(crate) display: DisplayList,
    /// The rubber-band wire; its `pt2` is always `cursor`
    pub(crate) live: WireId,
    pub(crate) cursor: PortId,
    pub(crate) snap_radius: f32,
    mode: Mode,
    ratio: f32,
    press: Option<Press>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let mut circuit = Circuit::default();
        let cursor = circuit.insert_port(Port::anchor(Point::ORIGIN));
        let live = circuit.insert_wire(Wire::live(cursor));

        let mut display = DisplayList::new();
        display.draw(Item::Wire(live));

        let mut session = Self {
            circuit,
            registry: Registry::default(),
            display,
            live,
            cursor,
            snap_radius: config.snap_radius,
            mode: Mode::Edit,
            ratio: config.device_pixel_ratio,
            press: None,
        };

        if config.seed_terminals {
            session.add_node_at(GateKind::Start, layout::start_terminal_position());
            session.add_node_at(GateKind::End, layout::end_terminal_position());
        }
        session
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn live_wire(&self) -> &Wire {
        // Created with the session and never removed
        &self.circuit[self.live]
    }

    #[cfg(test)]
    pub fn live_wire_id(&self) -> WireId {
        self.live
    }

    /// Current position of the live wire's free end.
    #[cfg(test)]
    pub fn cursor_position(&self) -> Point {
        self.circuit
            .port(self.cursor)
            .map(|port| port.position)
            .unwrap_or(Point::ORIGIN)
    }

    /// Committed wires only.
    #[cfg(test)]
    pub fn committed_wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        let live = self.live;
        self.circuit.wires().filter(move |&(id, _)| id != live)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.press = None;
        if mode == Mode::Erase {
            self.cancel_wire();
        }
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        if ratio > 0.0 {
            self.ratio = ratio;
            self.display.invalidate();
        }
    }

    /// The canvas changed size. Only the surface is reset, not the graph.
    pub fn resized(&self) {
        self.display.invalidate();
    }

    fn scale(&self, raw: Point) -> Point {
        Point::new(raw.x * self.ratio, raw.y * self.ratio)
    }

    /// Node factory behind the palette.
    pub fn add_gate(&mut self, kind: GateKind) -> NodeId {
        let position = layout::spawn_position(&self.circuit);
        self.add_node_at(kind, position)
    }

    pub fn add_gate_by_tag(&mut self, tag: &str) -> Result<NodeId, UnknownGate> {
        let kind = tag.parse()?;
        Ok(self.add_gate(kind))
    }

    pub fn add_node_at(&mut self, kind: GateKind, position: Point) -> NodeId {
        let id = self.circuit.insert_node(kind, position);
        if let Some(node) = self.circuit.node(id) {
            for &port in &node.inputs {
                self.registry.register(port, PortDirection::Input);
            }
            for &port in &node.outputs {
                self.registry.register(port, PortDirection::Output);
            }
        }
        self.display.draw(Item::Node(id));
        info!(
            "Added {} node {:?} at ({}, {}), {} on canvas",
            kind,
            id,
            position.x,
            position.y,
            self.circuit.node_count()
        );
        id
    }

    /// Move a node's anchor. Its ports follow immediately.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        let moved = self.circuit.move_node(id, position);
        if moved {
            self.display.invalidate();
        }
        moved
    }

    /// Remove a node together with every wire touching its ports.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.circuit.remove_node(id) else {
            return false;
        };
        self.display.remove(Item::Node(id));

        let live_start = self.live_wire().pt1;
        if node.all_ports().any(|port| port == live_start) {
            self.rearm_live_wire();
        }

        for port_id in node.all_ports() {
            let wires = self
                .circuit
                .port_mut(port_id)
                .map(|port| port.take_wires())
                .unwrap_or_default();
            for wire_id in wires {
                if let Some(wire) = self.circuit.remove_wire(wire_id) {
                    self.display.remove(Item::Wire(wire_id));
                    if let Some(far) = wire.other_end(port_id) {
                        self.release_if_unused(far);
                    }
                }
            }
            self.registry.evict(port_id);
            self.circuit.remove_port(port_id);
        }

        if self.press.and_then(|p| p.drag).is_some_and(|d| d.node == id) {
            self.press = None;
        }
        info!("Deleted {} node {:?}", node.kind, id);
        true
    }

    /// Remove a committed wire and free endpoints that no longer anchor one.
    pub fn delete_wire(&mut self, id: WireId) -> bool {
        if id == self.live {
            return false;
        }
        let Some(wire) = self.circuit.remove_wire(id) else {
            return false;
        };
        self.display.remove(Item::Wire(id));
        self.release_if_unused(wire.pt1);
        self.release_if_unused(wire.pt2);
        info!("Deleted wire {:?}", id);
        true
    }

    /// Move a connected port back to free once nothing anchors there. The
    /// start of an in-progress wire still counts as anchored.
    pub(crate) fn release_if_unused(&mut self, port: PortId) {
        let unused = self
            .circuit
            .port(port)
            .is_some_and(|p| p.wires().is_empty());
        let drawing_from = !self.live_wire().is_collapsed() && self.live_wire().pt1 == port;
        if unused && !drawing_from {
            self.registry.release(port);
        }
    }

    pub fn pointer_pressed(&mut self, raw: Point) {
        let pos = self.scale(raw);
        match self.mode {
            Mode::Erase => {
                if let Some(node) = self.circuit.node_at(pos) {
                    self.delete_node(node);
                } else if let Some(wire) = self.circuit.wire_at(pos, WIRE_HIT_TOLERANCE, self.live) {
                    self.delete_wire(wire);
                }
                self.cancel_wire();
                self.press = None;
            }
            Mode::Edit => {
                let drag = self.circuit.node_at(pos).and_then(|node| {
                    let anchor = self.circuit.node(node)?.position;
                    Some(Drag {
                        node,
                        offset: anchor - pos,
                    })
                });
                self.press = Some(Press {
                    origin: pos,
                    moved: false,
                    drag,
                });
            }
        }
    }

    pub fn pointer_moved(&mut self, raw: Point) {
        let pos = self.scale(raw);

        if let Some(press) = self.press.as_mut() {
            if press.origin.distance(pos) > CLICK_SLOP {
                press.moved = true;
            }
        }
        if let Some(drag) = self.press.and_then(|p| p.drag) {
            if !self.move_node(drag.node, pos + drag.offset) {
                // Node went away mid-drag
                if let Some(press) = self.press.as_mut() {
                    press.drag = None;
                }
            }
        }

        if self.mode == Mode::Edit {
            self.track(pos);
        }
        self.display.invalidate();
    }

    pub fn pointer_released(&mut self, raw: Point) {
        let pos = self.scale(raw);
        let Some(press) = self.press.take() else {
            return;
        };
        if !press.moved && self.mode == Mode::Edit {
            self.click(pos);
        }
    }

    /// The pointer went up or away off the canvas. Any press in flight is
    /// dropped without counting as a click.
    pub fn pointer_lost(&mut self) {
        if let Some(press) = self.press.take() {
            debug!("Press from ({}, {}) ended off canvas", press.origin.x, press.origin.y);
        }
    }

    /// Whether a node is currently being dragged.
    pub fn dragging(&self) -> Option<NodeId> {
        self.press.and_then(|p| p.drag).map(|d| d.node)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::PortState;

    pub fn bare_session() -> Session {
        Session::new(&Config {
            seed_terminals: false,
            ..Config::default()
        })
    }

    pub fn port_at(session: &Session, port: PortId) -> Point {
        session.circuit().port(port).unwrap().position
    }

    /// Every node port is tracked once, in the set matching its side and
    /// whether it anchors something, and committed wires are known to
    /// both of their endpoints.
    pub fn assert_invariants(session: &Session) {
        let live = session.live_wire();
        let drawing_from = (!live.is_collapsed()).then_some(live.pt1);
        let mut tracked = 0;

        for (_, node) in session.circuit().nodes() {
            for direction in [PortDirection::Input, PortDirection::Output] {
                for &port in node.ports(direction) {
                    tracked += 1;
                    let anchored = !session.circuit().port(port).unwrap().wires().is_empty()
                        || drawing_from == Some(port);
                    let expected = if anchored {
                        PortState::Connected
                    } else {
                        PortState::Free
                    };
                    assert_eq!(session.registry().state(port), Some((direction, expected)));
                }
            }
        }
        assert_eq!(session.registry().len(), tracked);

        for (id, wire) in session.committed_wires() {
            assert!(session.circuit().port(wire.pt1).unwrap().wires().contains(&id));
            assert!(session.circuit().port(wire.pt2).unwrap().wires().contains(&id));
            assert_ne!(
                session.circuit().owner(wire.pt1),
                session.circuit().owner(wire.pt2)
            );
            assert!(session.display().contains(Item::Wire(id)));
        }
        for port in session.circuit().nodes().flat_map(|(_, n)| n.inputs.clone()) {
            assert!(session.circuit().port(port).unwrap().wires().len() <= 1);
        }
    }

    #[test]
    fn test_new_session_seeds_terminals() {
        let session = Session::new(&Config::default());
        assert_eq!(session.circuit().node_count(), 2);
        assert_eq!(session.registry().len(), 2);
        assert!(session.live_wire().is_collapsed());
        assert_invariants(&session);
    }

    #[test]
    fn test_add_gate_registers_free_ports() {
        let mut session = bare_session();
        let id = session.add_gate_by_tag("and").unwrap();
        let node = session.circuit().node(id).unwrap();

        for &port in &node.inputs {
            assert_eq!(
                session.registry().state(port),
                Some((PortDirection::Input, PortState::Free))
            );
        }
        assert_eq!(
            session.registry().state(node.outputs[0]),
            Some((PortDirection::Output, PortState::Free))
        );
        assert!(session.display().contains(Item::Node(id)));
        assert!(session.add_gate_by_tag("nand").is_err());
        assert_invariants(&session);
    }

    #[test]
    fn test_drag_moves_node_and_ports() {
        let mut session = bare_session();
        let id = session.add_node_at(GateKind::Not, Point::new(100.0, 100.0));
        let output = session.circuit().node(id).unwrap().outputs[0];
        let before = port_at(&session, output);

        session.pointer_pressed(Point::new(110.0, 110.0));
        assert_eq!(session.dragging(), Some(id));
        session.pointer_moved(Point::new(160.0, 130.0));
        session.pointer_released(Point::new(160.0, 130.0));

        assert_eq!(session.circuit().node(id).unwrap().position, Point::new(150.0, 120.0));
        assert_eq!(port_at(&session, output), Point::new(before.x + 50.0, before.y + 20.0));
        assert_eq!(session.dragging(), None);
    }

    #[test]
    fn test_drag_of_deleted_node_is_noop() {
        let mut session = bare_session();
        let id = session.add_node_at(GateKind::Not, Point::new(100.0, 100.0));
        session.pointer_pressed(Point::new(110.0, 110.0));
        assert!(session.delete_node(id));

        session.pointer_moved(Point::new(200.0, 200.0));
        session.pointer_released(Point::new(200.0, 200.0));
        assert!(session.circuit().node(id).is_none());
        assert_invariants(&session);
    }

    #[test]
    fn test_pointer_is_scaled_by_ratio() {
        let mut session = bare_session();
        session.set_ratio(2.0);
        session.pointer_moved(Point::new(50.0, 25.0));
        assert_eq!(session.cursor_position(), Point::new(100.0, 50.0));

        session.set_ratio(0.0);
        assert_eq!(session.ratio(), 2.0);
    }

    #[test]
    fn test_erase_press_deletes_node() {
        let mut session = bare_session();
        let id = session.add_node_at(GateKind::And, Point::new(100.0, 100.0));
        session.set_mode(Mode::Erase);
        session.pointer_pressed(Point::new(120.0, 120.0));

        assert!(session.circuit().node(id).is_none());
        assert!(!session.display().contains(Item::Node(id)));
        assert_eq!(session.registry().len(), 0);
        assert_invariants(&session);
    }

    #[test]
    fn test_live_wire_cannot_be_deleted() {
        let mut session = bare_session();
        let live = session.live_wire_id();
        assert!(!session.delete_wire(live));
        assert!(session.display().contains(Item::Wire(live)));
    }
}
