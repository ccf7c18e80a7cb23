use iced::Point;

use crate::circuit::{Circuit, NodeId, PortId};
use crate::port::PortDirection;
use crate::registry::Registry;

/// Nearest tracked port of `role` within `radius` of `pointer`.
///
/// Ports owned by `exclude` and ports `accepts` turns down are never
/// returned, so they cannot shadow an eligible port further away. On equal
/// distances the first candidate in registry order wins.
pub fn nearest_port(
    circuit: &Circuit,
    registry: &Registry,
    pointer: Point,
    role: PortDirection,
    radius: f32,
    exclude: Option<NodeId>,
    accepts: impl Fn(PortId) -> bool,
) -> Option<PortId> {
    let mut best: Option<(PortId, f32)> = None;

    for id in registry.candidates(role) {
        let Some(port) = circuit.port(id) else {
            continue;
        };
        if (exclude.is_some() && port.node == exclude) || !accepts(id) {
            continue;
        }
        let dist = pointer.distance(port.position);
        if dist > radius {
            continue;
        }
        if best.is_none_or(|(_, closest)| dist < closest) {
            best = Some((id, dist));
        }
    }

    best.map(|(id, _)| id)
}
