//! # Delve Main Entry Point
//!
//! Headless driver: generates a seeded world, descends to the requested
//! floor, lets the monsters act for a number of turns and prints the result.

use clap::Parser;
use delve::{
    Action, AiConfig, ContentCatalog, DelveError, DelveResult, GameMap, GameState,
    GenerationConfig, PlayerAction, Position, StairDirection, TileKind,
};
use log::{error, info, warn};
use std::path::PathBuf;

/// Command line arguments for the Delve simulator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Generate roguelike floors and watch the monsters think")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Floor to descend to before simulating (0 is the surface)
    #[arg(short, long, default_value_t = 1)]
    floor: u32,

    /// Turns to simulate with the player standing still
    #[arg(short, long, default_value_t = 0)]
    turns: u32,

    /// JSON file with generation settings; overrides --seed
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);
    info!("Starting Delve v{}", delve::VERSION);

    if let Err(err) = run(&args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .init();
    }
}

fn run(args: &Args) -> DelveResult<()> {
    let config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::new(args.seed.unwrap_or_else(rand::random)),
    };
    info!("Using seed {}", config.seed);

    let mut state = GameState::new(config, ContentCatalog::standard(), AiConfig::default())?;

    while state.current_map()?.floor < args.floor {
        descend(&mut state)?;
    }

    for _ in 0..args.turns {
        if !state.player()?.is_alive() {
            warn!("The player died on turn {}", state.turn_number);
            break;
        }
        let events = state.perform_player_action(PlayerAction::Act(Action::Wait))?;
        for event in events {
            info!("turn {}: {:?}", state.turn_number, event);
        }
    }

    let map = state.current_map()?;
    println!(
        "Floor {} after {} turns ({} living agents)",
        map.floor,
        state.turn_number,
        map.living_agents().count()
    );
    println!("{}", render_ascii(map));
    Ok(())
}

/// Walks the player onto the stairs down and takes them.
fn descend(state: &mut GameState) -> DelveResult<()> {
    let player_id = state.player_id;
    let map = state.current_map_mut()?;
    let stairs = map
        .downstairs_location
        .ok_or_else(|| DelveError::GenerationFailed(format!("floor {} has no way down", map.floor)))?;
    map.require_agent_mut(player_id)?.position = stairs;
    state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down))?;
    Ok(())
}

fn render_ascii(map: &GameMap) -> String {
    let mut rows: Vec<Vec<char>> = (0..map.height() as i32)
        .map(|y| {
            (0..map.width() as i32)
                .map(|x| {
                    map.grid
                        .get(Position::new(x, y))
                        .map_or(' ', |tile| tile_char(tile.kind))
                })
                .collect()
        })
        .collect();

    for entry in map.render_list() {
        if let Some(cell) = rows
            .get_mut(entry.position.y as usize)
            .and_then(|row| row.get_mut(entry.position.x as usize))
        {
            *cell = entry.glyph;
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn tile_char(kind: TileKind) -> char {
    match kind {
        TileKind::Wall => '#',
        TileKind::Floor => '.',
        TileKind::SurfaceFloor => '"',
        TileKind::DownStairs => '>',
        TileKind::UpStairs => '<',
    }
}
