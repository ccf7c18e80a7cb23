//! Connection state of every node port.
//!
//! Four disjoint sets partition the ports owned by nodes. Which set a port
//! sits in decides whether it is an input or an output and whether it is
//! currently anchoring a committed wire.

use std::collections::BTreeSet;

use crate::circuit::PortId;
use crate::port::PortDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Free,
    Connected,
}

#[derive(Debug, Default)]
pub struct Registry {
    free_inputs: BTreeSet<PortId>,
    connected_inputs: BTreeSet<PortId>,
    free_outputs: BTreeSet<PortId>,
    connected_outputs: BTreeSet<PortId>,
}

impl Registry {
    fn sets_mut(&mut self, direction: PortDirection) -> (&mut BTreeSet<PortId>, &mut BTreeSet<PortId>) {
        match direction {
            PortDirection::Input => (&mut self.free_inputs, &mut self.connected_inputs),
            PortDirection::Output => (&mut self.free_outputs, &mut self.connected_outputs),
        }
    }

    fn sets(&self, direction: PortDirection) -> (&BTreeSet<PortId>, &BTreeSet<PortId>) {
        match direction {
            PortDirection::Input => (&self.free_inputs, &self.connected_inputs),
            PortDirection::Output => (&self.free_outputs, &self.connected_outputs),
        }
    }

    /// Start tracking a freshly created node port as free.
    pub fn register(&mut self, port: PortId, direction: PortDirection) {
        self.evict(port);
        self.sets_mut(direction).0.insert(port);
    }

    /// Stop tracking a port entirely. Returns whether it was tracked.
    pub fn evict(&mut self, port: PortId) -> bool {
        // Disjointness means at most one of these removes anything
        self.free_inputs.remove(&port)
            | self.connected_inputs.remove(&port)
            | self.free_outputs.remove(&port)
            | self.connected_outputs.remove(&port)
    }

    /// Move a free port to its connected set. No-op for connected or
    /// untracked ports.
    pub fn connect(&mut self, port: PortId) -> bool {
        let Some((direction, PortState::Free)) = self.state(port) else {
            return false;
        };
        let (free, connected) = self.sets_mut(direction);
        free.remove(&port);
        connected.insert(port)
    }

    /// Move a connected port back to its free set.
    pub fn release(&mut self, port: PortId) -> bool {
        let Some((direction, PortState::Connected)) = self.state(port) else {
            return false;
        };
        let (free, connected) = self.sets_mut(direction);
        connected.remove(&port);
        free.insert(port)
    }

    pub fn state(&self, port: PortId) -> Option<(PortDirection, PortState)> {
        [PortDirection::Input, PortDirection::Output]
            .into_iter()
            .find_map(|direction| {
                let (free, connected) = self.sets(direction);
                if free.contains(&port) {
                    Some((direction, PortState::Free))
                } else if connected.contains(&port) {
                    Some((direction, PortState::Connected))
                } else {
                    None
                }
            })
    }

    pub fn is_connected(&self, port: PortId) -> bool {
        matches!(self.state(port), Some((_, PortState::Connected)))
    }

    /// Every tracked port of a role, free ones first, each set in id order.
    pub fn candidates(&self, direction: PortDirection) -> impl Iterator<Item = PortId> + '_ {
        let (free, connected) = self.sets(direction);
        free.iter().chain(connected.iter()).copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.free_inputs.len()
            + self.connected_inputs.len()
            + self.free_outputs.len()
            + self.connected_outputs.len()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, direction: PortDirection, state: PortState) -> usize {
        let (free, connected) = self.sets(direction);
        match state {
            PortState::Free => free.len(),
            PortState::Connected => connected.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_connect_release() {
        let mut registry = Registry::default();
        registry.register(PortId(1), PortDirection::Output);
        assert_eq!(registry.state(PortId(1)), Some((PortDirection::Output, PortState::Free)));

        assert!(registry.connect(PortId(1)));
        assert!(!registry.connect(PortId(1)));
        assert_eq!(
            registry.state(PortId(1)),
            Some((PortDirection::Output, PortState::Connected))
        );

        assert!(registry.release(PortId(1)));
        assert!(!registry.release(PortId(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_untracked_ports_do_not_migrate() {
        let mut registry = Registry::default();
        assert!(!registry.connect(PortId(9)));
        assert!(!registry.release(PortId(9)));
        assert_eq!(registry.state(PortId(9)), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_evict_removes_from_any_set() {
        let mut registry = Registry::default();
        registry.register(PortId(1), PortDirection::Input);
        registry.register(PortId(2), PortDirection::Input);
        registry.connect(PortId(2));

        assert!(registry.evict(PortId(1)));
        assert!(registry.evict(PortId(2)));
        assert!(!registry.evict(PortId(2)));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_candidates_list_free_then_connected() {
        let mut registry = Registry::default();
        for id in [5, 3, 4] {
            registry.register(PortId(id), PortDirection::Input);
        }
        registry.register(PortId(8), PortDirection::Output);
        registry.connect(PortId(3));

        let inputs: Vec<_> = registry.candidates(PortDirection::Input).collect();
        assert_eq!(inputs, vec![PortId(4), PortId(5), PortId(3)]);
        assert_eq!(registry.count(PortDirection::Input, PortState::Connected), 1);
    }
}
