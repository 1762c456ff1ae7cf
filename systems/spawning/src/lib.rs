#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reward spawning system that places collectible batches on free floor tiles.
//!
//! A batch holds a random number of [`RewardKind::Normal`] rewards followed by
//! exactly one [`RewardKind::Special`] reward. Positions are drawn uniformly
//! from a placement band inset from the walls, rejecting tiles that are
//! already taken or hold the player. The random source is always supplied by
//! the caller so that batches are reproducible under a fixed seed.

use std::{collections::BTreeSet, iter, ops::Range};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use treasure_room_core::{Grid, Position, Reward, RewardKind, RewardValues};

const DEFAULT_NORMAL_MIN: u32 = 10;
const DEFAULT_NORMAL_MAX: u32 = 19;
const DEFAULT_MARGIN: u32 = 2;
const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fewest normal rewards placed per batch.
    pub normal_min: u32,
    /// Most normal rewards placed per batch (inclusive).
    pub normal_max: u32,
    /// Points assigned to each reward kind.
    pub values: RewardValues,
    /// Distance kept from the grid edge; positions are drawn from
    /// `[margin, width - margin) x [margin, height - margin)`.
    pub margin: u32,
    /// Rejection-sampling draws allowed per reward before falling back to an
    /// exhaustive pick among the remaining free tiles.
    pub max_attempts: u32,
}

impl Config {
    /// Checks that the configuration describes a satisfiable batch.
    pub fn validate(&self) -> Result<(), SpawnError> {
        if self.normal_min > self.normal_max {
            return Err(SpawnError::InvalidConfig(
                "normal_min must not exceed normal_max",
            ));
        }
        if self.margin == 0 {
            return Err(SpawnError::InvalidConfig(
                "margin must keep rewards off the wall ring",
            ));
        }
        if self.max_attempts == 0 {
            return Err(SpawnError::InvalidConfig(
                "max_attempts must allow at least one draw",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normal_min: DEFAULT_NORMAL_MIN,
            normal_max: DEFAULT_NORMAL_MAX,
            values: RewardValues::default(),
            margin: DEFAULT_MARGIN,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Failures reported while building a reward batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The placement band cannot hold the requested batch.
    #[error("cannot place {requested} rewards: only {available} free tiles in the placement band")]
    SpawnSpaceExhausted {
        /// Rewards the batch asked for.
        requested: usize,
        /// Free tiles available in the placement band.
        available: usize,
    },
    /// The spawner configuration is unusable.
    #[error("invalid spawn configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Pure system that produces reward batches for a room.
#[derive(Clone, Debug)]
pub struct RewardSpawner {
    config: Config,
}

impl RewardSpawner {
    /// Creates a new spawner using the supplied configuration.
    pub fn new(config: Config) -> Result<Self, SpawnError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Number of tiles in the placement band that could hold a reward while
    /// the player stands on `player`.
    #[must_use]
    pub fn placement_capacity(&self, grid: &Grid, player: Position) -> usize {
        self.free_cells(grid, &BTreeSet::from([player])).len()
    }

    /// Draws a fresh batch of rewards on distinct free tiles, never on `player`.
    pub fn spawn<R>(
        &self,
        grid: &Grid,
        player: Position,
        rng: &mut R,
    ) -> Result<Vec<Reward>, SpawnError>
    where
        R: Rng + ?Sized,
    {
        let normal_count = rng.gen_range(self.config.normal_min..=self.config.normal_max);
        let requested = normal_count as usize + 1;

        let mut taken = BTreeSet::from([player]);
        let available = self.free_cells(grid, &taken).len();
        if requested > available {
            return Err(SpawnError::SpawnSpaceExhausted {
                requested,
                available,
            });
        }

        let (columns, rows) = self.band(grid);
        let kinds = iter::repeat(RewardKind::Normal)
            .take(normal_count as usize)
            .chain(iter::once(RewardKind::Special));

        let mut rewards = Vec::with_capacity(requested);
        for kind in kinds {
            let position = self
                .draw_position(grid, &columns, &rows, &taken, rng)
                .ok_or(SpawnError::SpawnSpaceExhausted {
                    requested,
                    available,
                })?;
            let _ = taken.insert(position);
            rewards.push(Reward::new(
                position,
                kind,
                self.config.values.value_of(kind),
            ));
        }

        debug!(
            "spawned {} rewards ({} normal, 1 special) avoiding player at {}",
            rewards.len(),
            normal_count,
            player
        );
        Ok(rewards)
    }

    fn draw_position<R>(
        &self,
        grid: &Grid,
        columns: &Range<u32>,
        rows: &Range<u32>,
        taken: &BTreeSet<Position>,
        rng: &mut R,
    ) -> Option<Position>
    where
        R: Rng + ?Sized,
    {
        if columns.is_empty() || rows.is_empty() {
            return None;
        }

        for _ in 0..self.config.max_attempts {
            let candidate = Position::new(
                rng.gen_range(columns.clone()),
                rng.gen_range(rows.clone()),
            );
            if grid.is_walkable(candidate) && !taken.contains(&candidate) {
                return Some(candidate);
            }
        }

        let free = self.free_cells(grid, taken);
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    fn free_cells(&self, grid: &Grid, taken: &BTreeSet<Position>) -> Vec<Position> {
        let (columns, rows) = self.band(grid);
        rows.flat_map(|y| columns.clone().map(move |x| Position::new(x, y)))
            .filter(|cell| grid.is_walkable(*cell) && !taken.contains(cell))
            .collect()
    }

    fn band(&self, grid: &Grid) -> (Range<u32>, Range<u32>) {
        let margin = self.config.margin;
        (
            margin..grid.width().saturating_sub(margin),
            margin..grid.height().saturating_sub(margin),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_inset_by_margin() {
        let spawner = RewardSpawner::new(Config::default()).expect("spawner");
        let grid = Grid::new(30, 20).expect("grid");
        let (columns, rows) = spawner.band(&grid);
        assert_eq!(columns, 2..28);
        assert_eq!(rows, 2..18);
    }

    #[test]
    fn band_collapses_on_tiny_rooms() {
        let spawner = RewardSpawner::new(Config::default()).expect("spawner");
        let grid = Grid::new(3, 3).expect("grid");
        let (columns, rows) = spawner.band(&grid);
        assert!(columns.is_empty());
        assert!(rows.is_empty());
    }
}
