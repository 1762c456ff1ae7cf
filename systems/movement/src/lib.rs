#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that validates player steps against the room layout.

use log::trace;
use treasure_room_core::{Direction, Grid, Position};

/// Resolution of a single step request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// The destination is a wall; the player stays put.
    Blocked,
    /// The player may enter the contained tile.
    Enter(Position),
}

/// Pure system that turns a direction into a validated destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementController;

impl MovementController {
    /// Resolves a one-tile step from `from` toward `direction`.
    ///
    /// The candidate is clamped to the grid so a step past the outer edge keeps
    /// that axis unchanged. Any candidate that is not floor is blocked, which
    /// covers a clamped step since the outer edge is all wall.
    #[must_use]
    pub fn resolve(&self, grid: &Grid, from: Position, direction: Direction) -> Step {
        let candidate = from.step_within(direction, grid.width(), grid.height());
        if !grid.is_walkable(candidate) {
            trace!("step {direction:?} from {from} blocked at {candidate}");
            return Step::Blocked;
        }
        Step::Enter(candidate)
    }
}
