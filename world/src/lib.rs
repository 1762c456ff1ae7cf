#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Treasure Room.
//!
//! The [`World`] owns the immutable room layout, the player position, the set
//! of uncollected rewards, the score and the random source used for respawns.
//! Every mutation flows through [`apply`]; adapters observe the state through
//! the read-only [`query`] module.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use treasure_room_core::{
    Command, Direction, Event, Grid, GridError, MoveOutcome, Position, Reward, WELCOME_BANNER,
};
use treasure_room_system_movement::{MovementController, Step};
use treasure_room_system_spawning::{self as spawning, RewardSpawner, SpawnError};

const DEFAULT_WIDTH: u32 = 30;
const DEFAULT_HEIGHT: u32 = 20;
const DEFAULT_PLAYER_START: Position = Position::new(3, 3);
const DEFAULT_SEED: u64 = 0x7e55_0c1d_2012_1216;

/// Construction parameters for a [`World`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of columns in the room, walls included.
    pub width: u32,
    /// Number of rows in the room, walls included.
    pub height: u32,
    /// Tile the player occupies when the game starts.
    pub player_start: Position,
    /// Reward batch parameters.
    pub spawn: spawning::Config,
    /// Seed for the respawn random source. `None` selects a fixed default.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            player_start: DEFAULT_PLAYER_START,
            spawn: spawning::Config::default(),
            seed: None,
        }
    }
}

/// Failures raised while building or mutating the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The room layout is invalid or was queried out of bounds.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A reward batch could not be produced.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    /// The configured start position is not a floor tile.
    #[error("player start {position} is not a floor tile")]
    InvalidStart {
        /// Offending start position.
        position: Position,
    },
    /// A seeded reward would break reward placement rules.
    #[error("reward at {position} overlaps a wall, the player or another reward")]
    InvalidReward {
        /// Offending reward position.
        position: Position,
    },
}

/// Represents the authoritative Treasure Room game state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    player: Position,
    rewards: BTreeMap<Position, Reward>,
    score: u64,
    spawner: RewardSpawner,
    movement: MovementController,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with the player at the configured start and a freshly
    /// spawned reward batch.
    pub fn new(config: &GameConfig) -> Result<Self, WorldError> {
        let mut world = Self::empty(config)?;
        let batch = world
            .spawner
            .spawn(&world.grid, world.player, &mut world.rng)?;
        world.replace_rewards(batch);
        debug!(
            "world ready: {}x{} room, player at {}, {} rewards",
            world.grid.width(),
            world.grid.height(),
            world.player,
            world.rewards.len()
        );
        Ok(world)
    }

    /// Creates a world whose initial rewards are provided by the caller
    /// instead of the spawner. Later respawns still use the spawner.
    pub fn with_rewards(config: &GameConfig, rewards: Vec<Reward>) -> Result<Self, WorldError> {
        let mut world = Self::empty(config)?;
        for reward in rewards {
            let position = reward.position();
            if !world.grid.is_walkable(position)
                || position == world.player
                || world.rewards.contains_key(&position)
            {
                return Err(WorldError::InvalidReward { position });
            }
            let _ = world.rewards.insert(position, reward);
        }

        if world.rewards.is_empty() {
            let batch = world
                .spawner
                .spawn(&world.grid, world.player, &mut world.rng)?;
            world.replace_rewards(batch);
        }
        Ok(world)
    }

    /// Attempts to move the player one tile toward `direction`.
    ///
    /// Either the whole transition (move, pickup, respawn) happens or the
    /// world is left untouched.
    pub fn try_move(&mut self, direction: Direction) -> Result<MoveOutcome, WorldError> {
        let mut events = Vec::new();
        apply(self, Command::MovePlayer { direction }, &mut events)
    }

    fn empty(config: &GameConfig) -> Result<Self, WorldError> {
        let grid = Grid::new(config.width, config.height)?;
        if !grid.is_walkable(config.player_start) {
            return Err(WorldError::InvalidStart {
                position: config.player_start,
            });
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            player: config.player_start,
            rewards: BTreeMap::new(),
            score: 0,
            spawner: RewardSpawner::new(config.spawn)?,
            movement: MovementController,
            rng: ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED)),
        })
    }

    fn replace_rewards(&mut self, batch: Vec<Reward>) {
        self.rewards = batch
            .into_iter()
            .map(|reward| (reward.position(), reward))
            .collect();
    }

    fn move_player(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<MoveOutcome, WorldError> {
        let from = self.player;
        let to = match self.movement.resolve(&self.grid, from, direction) {
            Step::Blocked => {
                out_events.push(Event::MoveBlocked {
                    at: from,
                    direction,
                });
                return Ok(MoveOutcome::Blocked);
            }
            Step::Enter(to) => to,
        };

        let collected = self.rewards.get(&to).copied();
        // The replacement batch is drawn before committing so that a spawn
        // failure leaves the world untouched.
        let respawn = match collected {
            Some(_) if self.rewards.len() == 1 => {
                Some(self.spawner.spawn(&self.grid, to, &mut self.rng)?)
            }
            _ => None,
        };

        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });

        if let Some(reward) = collected {
            let _ = self.rewards.remove(&to);
            self.score = self.score.saturating_add(u64::from(reward.value()));
            info!(
                "collected {:?} reward worth {} at {}, score {}",
                reward.kind(),
                reward.value(),
                to,
                self.score
            );
            out_events.push(Event::RewardCollected {
                reward,
                score: self.score,
            });
        }

        if let Some(batch) = respawn {
            self.replace_rewards(batch);
            debug!("respawned {} rewards", self.rewards.len());
            out_events.push(Event::RewardsRespawned {
                count: self.rewards.len(),
            });
        }

        debug_assert!(
            !self.rewards.contains_key(&self.player),
            "a reward shares the player's tile at {}",
            self.player
        );
        debug_assert!(!self.rewards.is_empty(), "reward set left empty");

        Ok(MoveOutcome::Moved)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<MoveOutcome, WorldError> {
    match command {
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use treasure_room_core::{Occupant, Position, Reward, Snapshot};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Tile currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> Position {
        world.player
    }

    /// Points collected so far.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Iterates the uncollected rewards in position order.
    pub fn rewards(world: &World) -> impl Iterator<Item = &Reward> {
        world.rewards.values()
    }

    /// Resolves what rests on `position` on top of the room layout.
    #[must_use]
    pub fn occupant(world: &World, position: Position) -> Occupant {
        Occupant::resolve(position, world.player, world.rewards.get(&position))
    }

    /// Captures everything an adapter needs to draw a frame.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        Snapshot::new(
            world.grid,
            world.player,
            world.rewards.values().copied().collect(),
            world.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasure_room_core::RewardKind;

    #[test]
    fn new_world_places_player_at_start_with_rewards() {
        let world = World::new(&GameConfig::default()).expect("world");

        assert_eq!(query::player(&world), Position::new(3, 3));
        assert_eq!(query::score(&world), 0);
        let count = query::rewards(&world).count();
        assert!((11..=20).contains(&count), "unexpected batch size {count}");
        assert_eq!(query::welcome_banner(&world), "Not Quite A Roguelike (Yet)");
    }

    #[test]
    fn start_on_wall_is_rejected() {
        let config = GameConfig {
            player_start: Position::new(0, 4),
            ..GameConfig::default()
        };
        assert_eq!(
            World::new(&config).err(),
            Some(WorldError::InvalidStart {
                position: Position::new(0, 4)
            })
        );
    }

    #[test]
    fn seeded_rewards_must_not_overlap() {
        let config = GameConfig::default();
        let duplicate = Reward::new(Position::new(5, 5), RewardKind::Normal, 10);
        assert_eq!(
            World::with_rewards(&config, vec![duplicate, duplicate]).err(),
            Some(WorldError::InvalidReward {
                position: Position::new(5, 5)
            })
        );

        let on_player = Reward::new(Position::new(3, 3), RewardKind::Normal, 10);
        assert!(World::with_rewards(&config, vec![on_player]).is_err());

        let on_wall = Reward::new(Position::new(0, 3), RewardKind::Normal, 10);
        assert!(World::with_rewards(&config, vec![on_wall]).is_err());
    }

    #[test]
    fn same_seed_builds_identical_worlds() {
        let config = GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        };
        let first = World::new(&config).expect("world");
        let second = World::new(&config).expect("world");
        assert_eq!(query::snapshot(&first), query::snapshot(&second));
    }

    #[test]
    fn occupant_query_agrees_with_snapshot() {
        let world = World::new(&GameConfig::default()).expect("world");
        let snapshot = query::snapshot(&world);
        for position in snapshot.grid().cells() {
            assert_eq!(
                query::occupant(&world, position),
                snapshot.occupant(position),
                "overlay differs at {position}"
            );
        }
    }

    #[test]
    fn config_parses_from_partial_toml() {
        let config: GameConfig = toml::from_str(
            r#"
            width = 12
            seed = 7

            [player_start]
            x = 2
            y = 2

            [spawn]
            normal_min = 1
            normal_max = 2
            "#,
        )
        .expect("parse");

        assert_eq!(config.width, 12);
        assert_eq!(config.height, 20);
        assert_eq!(config.player_start, Position::new(2, 2));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.spawn.normal_max, 2);
        assert_eq!(config.spawn.margin, 2);
        assert_eq!(config.spawn.values.special, 25);
    }
}
