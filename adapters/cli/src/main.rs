#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Crawl run.
//!
//! The run is generated from `--seed`, optionally shaped by a TOML file passed
//! through `--config`, and driven by the `--moves` script where `U`, `R`, `D`
//! and `L` step the player and `.` skips a turn without input.

mod render;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crawl_core::{
    Command, Direction, GenerationConfig, PlayerStats, DEFAULT_PLAYER_HEALTH,
    DEFAULT_PLAYER_STRENGTH,
};
use crawl_world::{self as world, query, World, WorldError};
use log::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "crawl")]
#[command(about = "Plays a deterministic turn-based dungeon crawl")]
#[command(version)]
struct Cli {
    /// Seed driving generation and combat
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Move script: U, R, D, L step the player, '.' waits without input
    #[arg(short, long, default_value = "")]
    moves: String,

    /// TOML file with generation settings; unspecified fields keep defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting player health
    #[arg(long, default_value_t = DEFAULT_PLAYER_HEALTH)]
    health: i32,

    /// Starting player strength
    #[arg(long, default_value_t = DEFAULT_PLAYER_STRENGTH)]
    strength: i32,

    /// Print the map after every turn instead of only at the end
    #[arg(long)]
    show_turns: bool,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Crawl command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    let script = parse_moves(&cli.moves)?;
    let player = PlayerStats::new(cli.health, cli.strength);
    let mut world = World::initialize(config, cli.seed, Some(player))
        .with_context(|| format!("failed to start a run with seed {}", cli.seed))?;

    println!("{}", render::render(&world));
    play(&mut world, &script, cli.show_turns)?;
    if !cli.show_turns {
        println!("\n{}", render::render(&world));
    }
    Ok(())
}

fn play(world: &mut World, script: &[Option<Direction>], show_turns: bool) -> Result<()> {
    let mut events = Vec::new();
    for (turn, input) in script.iter().enumerate() {
        let Some(direction) = *input else {
            debug!("turn {turn}: no input");
            continue;
        };

        events.clear();
        match world::apply(world, Command::MovePlayer { direction }, &mut events) {
            Ok(()) => {}
            Err(WorldError::RunOver) => {
                info!("run is over after {turn} turns");
                break;
            }
            Err(error) => {
                return Err(error).with_context(|| format!("turn {turn} ({direction:?}) failed"));
            }
        }

        for event in &events {
            info!("turn {turn}: {}", render::describe(event));
        }
        if show_turns {
            println!("\n{}", render::render(world));
        }
    }

    if let Some(stats) = query::player_stats(world) {
        info!(
            "finished on floor {} with {} gold and {} keys",
            query::floor(world),
            stats.gold,
            stats.keys
        );
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GenerationConfig> {
    let Some(path) = path else {
        return Ok(GenerationConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: GenerationConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

fn parse_moves(script: &str) -> Result<Vec<Option<Direction>>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c.to_ascii_uppercase() {
            'U' => Ok(Some(Direction::Up)),
            'R' => Ok(Some(Direction::Right)),
            'D' => Ok(Some(Direction::Down)),
            'L' => Ok(Some(Direction::Left)),
            '.' => Ok(None),
            other => bail!("unknown move '{other}'; expected U, R, D, L or '.'"),
        })
        .collect()
}

fn init_logging(verbosity: u8) {
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    let _ = builder.filter_level(base_level).parse_env("RUST_LOG");
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_script_accepts_letters_and_waits() {
        assert_eq!(
            parse_moves("Ur d.,L").expect("valid script"),
            vec![
                Some(Direction::Up),
                Some(Direction::Right),
                Some(Direction::Down),
                None,
                Some(Direction::Left),
            ]
        );
    }

    #[test]
    fn unknown_moves_are_rejected() {
        let error = parse_moves("RX").expect_err("X is not a move");
        assert!(error.to_string().contains("unknown move 'X'"));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: GenerationConfig = toml::from_str(
            "room_attempts = 30\n\n[size]\nwidth = 40\nheight = 20\n",
        )
        .expect("valid toml");

        assert_eq!(config.room_attempts, 30);
        assert_eq!(config.size.width(), 40);
        assert_eq!(config.size.height(), 20);
        assert_eq!(config.enemies, GenerationConfig::default().enemies);
    }

    #[test]
    fn scripted_run_is_repeatable() {
        let script = parse_moves("RRDDLLUU..RDLU").expect("valid script");
        let run = || {
            let mut world =
                World::initialize(GenerationConfig::default(), 12, None).expect("valid");
            play(&mut world, &script, false).expect("turns resolve");
            render::render(&world)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::parse_from(["crawl", "--seed", "5", "--moves", "RRD", "-vv"]);
        assert_eq!(cli.seed, 5);
        assert_eq!(cli.moves, "RRD");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.health, 100);
        assert!(cli.config.is_none());
    }
}
