mod config;
mod driver;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use twenty48_grid::Game;

use config::Config;
use driver::View;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Board side length (overrides the config file)
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// Play this move list instead of reading stdin, e.g. "LLURD" or "left,up"
    #[arg(long, value_name = "MOVES")]
    moves: Option<String>,

    /// Mark open cells with "**" when drawing the board
    #[arg(long)]
    show_open: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut cfg = match &args.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)
                .map_err(|e| anyhow!("failed to load config {}: {e}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(size) = args.size {
        cfg.size = size;
    }
    cfg.validate().map_err(|e| anyhow!("invalid configuration: {e}"))?;

    let seed = cfg.seed.unwrap_or_else(rand::random);
    info!("board {}x{}, seed {}", cfg.size, cfg.size, seed);

    let mut game = Game::seeded(cfg.size, seed).with_spawn_on_unchanged(cfg.spawn_on_unchanged);
    game.start(cfg.initial_tiles).context("failed to place opening tiles")?;

    let view = View { show_open: args.show_open };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match &args.moves {
        Some(script) => {
            let moves = driver::parse_moves(script).context("invalid --moves")?;
            driver::play_script(&mut game, &moves, view, &mut out)?
        }
        None => driver::play_interactive(&mut game, io::stdin().lock(), view, &mut out)?,
    };

    info!(
        "Finished: {} moves, score {}, highest tile {}",
        summary.moves, summary.score, summary.highest_tile
    );
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    }
    Ok(())
}
