use iced::Point;

use crate::circuit::Circuit;
use crate::node::{NODE_MIN_HEIGHT, NODE_WIDTH};

const SPAWN_X: f32 = 320.0;
const SPAWN_Y: f32 = 80.0;
const SPAWN_STEP: f32 = 30.0;
const MAX_ATTEMPTS: usize = 40;

// Terminals sit on either side of the spawn column
const START_TERMINAL: Point = Point::new(60.0, 200.0);
const END_TERMINAL: Point = Point::new(680.0, 200.0);

/// Where the next gate from the palette appears.
///
/// New gates cascade diagonally from the spawn point until they no longer
/// sit on top of an existing node.
pub fn spawn_position(circuit: &Circuit) -> Point {
    find_non_overlapping_position(circuit, Point::new(SPAWN_X, SPAWN_Y))
}

pub fn start_terminal_position() -> Point {
    START_TERMINAL
}

pub fn end_terminal_position() -> Point {
    END_TERMINAL
}

fn find_non_overlapping_position(circuit: &Circuit, mut pos: Point) -> Point {
    for _ in 0..MAX_ATTEMPTS {
        let overlaps = circuit.nodes().any(|(_, node)| {
            let dx = (node.position.x - pos.x).abs();
            let dy = (node.position.y - pos.y).abs();
            dx < NODE_WIDTH * 0.5 && dy < NODE_MIN_HEIGHT * 0.5
        });
        if !overlaps {
            break;
        }
        pos.x += SPAWN_STEP;
        pos.y += SPAWN_STEP;
    }
    pos
}
