#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Treasure Room engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters translate input into
//! [`Command`] values, the world executes them via its `apply` entry point and
//! reports what happened as [`Event`] values. The room layout itself is the
//! immutable [`Grid`]; the player and rewards are an occupancy overlay owned by
//! the world and never stamped into the grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner shown as the window title when the experience boots.
pub const WELCOME_BANNER: &str = "Not Quite A Roguelike (Yet)";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance a single step in the specified direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: Position,
        /// Tile the player occupies after completing the move.
        to: Position,
    },
    /// Reports that a move was rejected because the destination is not walkable.
    MoveBlocked {
        /// Tile the player remains on.
        at: Position,
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that the player picked up a reward.
    RewardCollected {
        /// Reward that was removed from the room.
        reward: Reward,
        /// Score after the reward value was added.
        score: u64,
    },
    /// Announces that the reward set was regenerated after the last pickup.
    RewardsRespawned {
        /// Number of rewards placed by the new batch.
        count: usize,
    },
}

/// Result of a single movement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The player entered the requested tile.
    Moved,
    /// The requested tile is not walkable; nothing changed.
    Blocked,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Location of a single tile expressed as column (`x`) and row (`y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Offsets the position one tile in `direction`, clamped to a
    /// `width` x `height` area.
    ///
    /// A step that would leave the area keeps that axis unchanged; there is no
    /// wraparound.
    #[must_use]
    pub const fn step_within(self, direction: Direction, width: u32, height: u32) -> Self {
        let Self { x, y } = self;
        match direction {
            Direction::Up if y > 0 => Self::new(x, y - 1),
            Direction::Down if y + 1 < height => Self::new(x, y + 1),
            Direction::Left if x > 0 => Self::new(x - 1, y),
            Direction::Right if x + 1 < width => Self::new(x + 1, y),
            _ => self,
        }
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Classification of a grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable perimeter tile.
    Wall,
    /// Walkable interior tile.
    Floor,
}

/// Types of rewards that can be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RewardKind {
    /// Common reward placed in bulk.
    Normal,
    /// Single high-value reward placed once per batch.
    Special,
}

/// Point values awarded per reward kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardValues {
    /// Points awarded for a [`RewardKind::Normal`] reward.
    pub normal: u32,
    /// Points awarded for a [`RewardKind::Special`] reward.
    pub special: u32,
}

impl RewardValues {
    /// Returns the configured value for `kind`.
    #[must_use]
    pub const fn value_of(&self, kind: RewardKind) -> u32 {
        match kind {
            RewardKind::Normal => self.normal,
            RewardKind::Special => self.special,
        }
    }
}

impl Default for RewardValues {
    fn default() -> Self {
        Self {
            normal: 10,
            special: 25,
        }
    }
}

/// Collectible item resting on a floor tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    position: Position,
    kind: RewardKind,
    value: u32,
}

impl Reward {
    /// Creates a reward of `kind` worth `value` points at `position`.
    #[must_use]
    pub const fn new(position: Position, kind: RewardKind, value: u32) -> Self {
        Self {
            position,
            kind,
            value,
        }
    }

    /// Tile the reward rests on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Kind of the reward.
    #[must_use]
    pub const fn kind(&self) -> RewardKind {
        self.kind
    }

    /// Points awarded when the reward is collected.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

/// What currently rests on a tile, layered over the immutable grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Nothing but the underlying tile.
    Empty,
    /// The player glyph.
    Player,
    /// An uncollected reward of the contained kind.
    Reward(RewardKind),
}

impl Occupant {
    /// Overlays the player and an optional reward onto `position`.
    ///
    /// `reward` is whatever reward rests on `position`; the player wins when
    /// both share the tile.
    #[must_use]
    pub fn resolve(position: Position, player: Position, reward: Option<&Reward>) -> Self {
        if position == player {
            return Self::Player;
        }
        reward.map_or(Self::Empty, |reward| Self::Reward(reward.kind()))
    }
}

/// Read-only capture of the game state used by adapters for presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    grid: Grid,
    player: Position,
    rewards: Vec<Reward>,
    score: u64,
}

impl Snapshot {
    /// Captures a snapshot; rewards are stored in position order.
    #[must_use]
    pub fn new(grid: Grid, player: Position, mut rewards: Vec<Reward>, score: u64) -> Self {
        rewards.sort_by_key(|reward| reward.position());
        Self {
            grid,
            player,
            rewards,
            score,
        }
    }

    /// Room layout.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tile occupied by the player.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Uncollected rewards in position order.
    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Points collected so far.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Resolves the occupancy overlay at `position`.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Occupant {
        let reward = self
            .rewards
            .binary_search_by_key(&position, |reward| reward.position())
            .ok()
            .map(|index| &self.rewards[index]);
        Occupant::resolve(position, self.player, reward)
    }
}

/// Errors raised by grid queries and construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The queried position lies outside the grid.
    #[error("position {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Position that was queried.
        position: Position,
        /// Width of the grid.
        width: u32,
        /// Height of the grid.
        height: u32,
    },
    /// The requested dimensions leave no interior floor.
    #[error("a {width}x{height} room has no interior floor; both sides must be at least 3")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Fixed rectangular room: a ring of walls around floor tiles.
///
/// The layout never changes after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Smallest side length that still leaves an interior tile.
    pub const MIN_SIDE: u32 = 3;

    /// Creates a `width` x `height` room.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns in the room.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the room.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `position` lies within `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() < self.width && position.y() < self.height
    }

    /// Reports whether `position` lies on the outer ring of the room.
    #[must_use]
    pub const fn is_border(&self, position: Position) -> bool {
        self.contains(position)
            && (position.x() == 0
                || position.y() == 0
                || position.x() == self.width - 1
                || position.y() == self.height - 1)
    }

    /// Classifies the tile at `position`.
    pub fn kind_at(&self, position: Position) -> Result<TileKind, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        }

        if self.is_border(position) {
            Ok(TileKind::Wall)
        } else {
            Ok(TileKind::Floor)
        }
    }

    /// Reports whether the tile at `position` is floor. Positions outside the
    /// grid are never walkable.
    #[must_use]
    pub fn is_walkable(&self, position: Position) -> bool {
        matches!(self.kind_at(position), Ok(TileKind::Floor))
    }

    /// Iterates every tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Iterates the floor tiles in row-major order.
    pub fn interior(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (1..self.height - 1).flat_map(move |y| (1..width - 1).map(move |x| Position::new(x, y)))
    }

    /// Iterates the wall tiles in row-major order.
    pub fn border(&self) -> impl Iterator<Item = Position> {
        let grid = *self;
        self.cells().filter(move |position| grid.is_border(*position))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Direction, Grid, GridError, Occupant, Position, Reward, RewardKind, RewardValues,
        Snapshot, TileKind,
    };

    #[test]
    fn snapshot_overlays_player_and_rewards() {
        let grid = Grid::new(10, 10).expect("grid");
        let snapshot = Snapshot::new(
            grid,
            Position::new(3, 3),
            vec![
                Reward::new(Position::new(6, 2), RewardKind::Special, 25),
                Reward::new(Position::new(4, 3), RewardKind::Normal, 10),
            ],
            35,
        );

        assert_eq!(snapshot.occupant(Position::new(3, 3)), Occupant::Player);
        assert_eq!(
            snapshot.occupant(Position::new(4, 3)),
            Occupant::Reward(RewardKind::Normal)
        );
        assert_eq!(
            snapshot.occupant(Position::new(6, 2)),
            Occupant::Reward(RewardKind::Special)
        );
        assert_eq!(snapshot.occupant(Position::new(5, 5)), Occupant::Empty);
        assert_eq!(snapshot.rewards()[0].position(), Position::new(4, 3));
    }

    #[test]
    fn border_tiles_are_walls_and_interior_is_floor() {
        let grid = Grid::new(30, 20).expect("grid");

        assert_eq!(grid.kind_at(Position::new(0, 0)), Ok(TileKind::Wall));
        assert_eq!(grid.kind_at(Position::new(29, 5)), Ok(TileKind::Wall));
        assert_eq!(grid.kind_at(Position::new(7, 19)), Ok(TileKind::Wall));
        assert_eq!(grid.kind_at(Position::new(1, 1)), Ok(TileKind::Floor));
        assert_eq!(grid.kind_at(Position::new(28, 18)), Ok(TileKind::Floor));
    }

    #[test]
    fn border_and_interior_partition_the_room() {
        let grid = Grid::new(30, 20).expect("grid");

        assert_eq!(grid.interior().count(), 28 * 18);
        assert_eq!(grid.border().count(), 30 * 20 - 28 * 18);
        assert!(grid.border().all(|cell| !grid.is_walkable(cell)));
        assert!(grid.interior().all(|cell| grid.is_walkable(cell)));
    }

    #[test]
    fn out_of_bounds_queries_fail() {
        let grid = Grid::new(30, 20).expect("grid");
        let outside = Position::new(30, 3);

        assert_eq!(
            grid.kind_at(outside),
            Err(GridError::OutOfBounds {
                position: outside,
                width: 30,
                height: 20,
            })
        );
        assert!(!grid.is_walkable(outside));
    }

    #[test]
    fn rooms_without_interior_are_rejected() {
        assert_eq!(
            Grid::new(2, 10),
            Err(GridError::InvalidDimensions {
                width: 2,
                height: 10
            })
        );
        assert!(Grid::new(3, 3).is_ok());
    }

    #[test]
    fn steps_are_clamped_to_the_area() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step_within(Direction::Up, 5, 5), corner);
        assert_eq!(corner.step_within(Direction::Left, 5, 5), corner);
        assert_eq!(
            corner.step_within(Direction::Right, 5, 5),
            Position::new(1, 0)
        );

        let far = Position::new(4, 4);
        assert_eq!(far.step_within(Direction::Down, 5, 5), far);
        assert_eq!(far.step_within(Direction::Right, 5, 5), far);
        assert_eq!(far.step_within(Direction::Up, 5, 5), Position::new(4, 3));
    }

    #[test]
    fn player_hides_a_reward_on_the_same_tile() {
        let origin = Position::new(3, 3);
        let reward = Reward::new(origin, RewardKind::Special, 25);
        assert_eq!(
            Occupant::resolve(origin, origin, Some(&reward)),
            Occupant::Player
        );
        assert_eq!(
            Occupant::resolve(origin, Position::new(1, 1), Some(&reward)),
            Occupant::Reward(RewardKind::Special)
        );
        assert_eq!(
            Occupant::resolve(origin, Position::new(1, 1), None),
            Occupant::Empty
        );
    }

    #[test]
    fn default_reward_values_match_the_legend() {
        let values = RewardValues::default();
        assert_eq!(values.value_of(RewardKind::Normal), 10);
        assert_eq!(values.value_of(RewardKind::Special), 25);
    }

    #[test]
    fn reward_survives_bincode() {
        let reward = Reward::new(Position::new(4, 3), RewardKind::Special, 25);
        let bytes = bincode::serialize(&reward).expect("serialize");
        let restored: Reward = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, reward);
    }
}
