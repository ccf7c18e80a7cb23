//! Snap-and-commit protocol of the live wire.
//!
//! While idle the live wire is collapsed onto its cursor endpoint and
//! clicks look for an output to start from. While drawing, `pt1` is the
//! chosen output and clicks look for an input on another node to finish
//! on. Committing snapshots the live wire and collapses it again.

use iced::Point;
use log::{debug, info};

use crate::circuit::PortId;
use crate::display::Item;
use crate::port::PortDirection;
use crate::session::{Mode, Session};
use crate::snap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireState {
    Idle,
    Drawing,
}

impl Session {
    pub fn wire_state(&self) -> WireState {
        if self.live_wire().is_collapsed() {
            WireState::Idle
        } else {
            WireState::Drawing
        }
    }

    /// The output the in-progress wire starts from.
    pub fn wire_start(&self) -> Option<PortId> {
        match self.wire_state() {
            WireState::Idle => None,
            WireState::Drawing => Some(self.live_wire().pt1),
        }
    }

    /// Port the live wire would attach to for a pointer at `pointer`.
    pub fn snap_target(&self, pointer: Point) -> Option<PortId> {
        match self.wire_start() {
            None => snap::nearest_port(
                &self.circuit,
                &self.registry,
                pointer,
                PortDirection::Output,
                self.snap_radius,
                None,
                |_| true,
            ),
            // A driven input can't take the wire, so it must not hide a
            // free one that is also in reach
            Some(start) => snap::nearest_port(
                &self.circuit,
                &self.registry,
                pointer,
                PortDirection::Input,
                self.snap_radius,
                self.circuit.owner(start),
                |port| !self.registry.is_connected(port),
            ),
        }
    }

    /// Primary click at a device position. Returns whether the click
    /// changed anything.
    pub fn click(&mut self, pos: Point) -> bool {
        if self.mode() != Mode::Edit {
            return false;
        }
        match self.wire_state() {
            WireState::Idle => self.begin_wire(pos),
            WireState::Drawing => self.commit_wire(pos),
        }
    }

    fn begin_wire(&mut self, pos: Point) -> bool {
        let Some(start) = self.snap_target(pos) else {
            debug!("No output within reach of ({}, {})", pos.x, pos.y);
            return false;
        };
        if let Some(live) = self.circuit.wire_mut(self.live) {
            live.pt1 = start;
        }
        // Already connected outputs stay put, they fan out
        self.registry.connect(start);
        self.track(pos);
        debug!("Drawing from {:?}", start);
        true
    }

    fn commit_wire(&mut self, pos: Point) -> bool {
        let Some(end) = self.snap_target(pos) else {
            debug!("No input within reach of ({}, {})", pos.x, pos.y);
            return false;
        };
        if self.registry.is_connected(end) {
            debug!("Input {:?} is already driven", end);
            return false;
        }

        let committed = self.live_wire().snapshot(end);
        let start = committed.pt1;
        let id = self.circuit.insert_wire(committed);
        for port in [start, end] {
            if let Some(port) = self.circuit.port_mut(port) {
                port.attach(id);
            }
        }
        self.registry.connect(end);
        self.display.draw(Item::Wire(id));

        let at = self.circuit.port(end).map(|p| p.position).unwrap_or(pos);
        self.rearm_live_wire();
        self.place_cursor(at);
        info!("Wired {:?} -> {:?} as {:?}", start, end, id);
        true
    }

    /// Abandon the in-progress wire. Its start output goes back to free
    /// unless it already drives a committed wire.
    pub fn cancel_wire(&mut self) {
        let Some(start) = self.wire_start() else {
            return;
        };
        self.rearm_live_wire();
        self.release_if_unused(start);
        debug!("Cancelled wire from {:?}", start);
    }

    /// Collapse the live wire onto its own cursor endpoint.
    pub(crate) fn rearm_live_wire(&mut self) {
        let cursor = self.cursor;
        if let Some(live) = self.circuit.wire_mut(self.live) {
            live.pt1 = cursor;
            live.pt2 = cursor;
        }
        self.display.invalidate();
    }

    /// Rubber-band the live wire's free end: onto the nearest eligible
    /// port, or exactly onto the pointer when none is in reach.
    pub fn track(&mut self, pointer: Point) {
        let at = self
            .snap_target(pointer)
            .and_then(|port| self.circuit.port(port))
            .map(|port| port.position)
            .unwrap_or(pointer);
        self.place_cursor(at);
    }

    fn place_cursor(&mut self, at: Point) {
        if let Some(cursor) = self.circuit.port_mut(self.cursor) {
            cursor.position = at;
        }
        self.display.invalidate();
    }
}
