#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Treasure Room in a terminal.

mod config;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use treasure_room_rendering::{CellMetrics, Palette, Presentation, RenderingBackend, Scene};
use treasure_room_world::{query, World};

use crate::{
    config::Overrides,
    terminal::{TerminalBackend, TerminalEvents, TerminalGuard},
};

/// Collect the `$` scattered around a walled room.
#[derive(Debug, Parser)]
#[command(name = "treasure-room", version)]
struct CliArgs {
    /// TOML file with game configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for reward placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Room width in tiles, walls included.
    #[arg(long)]
    width: Option<u32>,
    /// Room height in tiles, walls included.
    #[arg(long)]
    height: Option<u32>,
    /// Draw without ANSI colors.
    #[arg(long)]
    plain: bool,
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Treasure Room command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let config = config::resolve(
        args.config.as_deref(),
        Overrides {
            seed: args.seed,
            width: args.width,
            height: args.height,
        },
    )?;
    info!(
        "starting {}x{} room with seed {:?}",
        config.width, config.height, config.seed
    );

    let mut world = World::new(&config).context("failed to build the room")?;
    let values = config.spawn.values;
    let metrics = CellMetrics::default();
    let palette = Palette::default();
    let render = move |world: &World| {
        Scene::from_snapshot(&query::snapshot(world), values, metrics, &palette)
    };

    let presentation = Presentation::new(
        query::welcome_banner(&world),
        palette.background,
        render(&world),
    );
    let backend = TerminalBackend::new(TerminalEvents, io::stdout().lock(), !args.plain);

    {
        let _guard = TerminalGuard::enter()?;
        backend.run(presentation, |input, scene| {
            if let Some(direction) = input.direction {
                let _ = world.try_move(direction)?;
                *scene = render(&world);
            }
            Ok(())
        })?;
    }

    info!("final score {}", query::score(&world));
    println!("Final score: {}", query::score(&world));
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    let _ = builder.filter_level(level).parse_default_env();
    let _ = builder.try_init();
}
