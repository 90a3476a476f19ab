use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use twenty48_grid::{EngineError, Game, Move, RunSummary};

use crate::render::{render, render_open_cells};

/// How the board is echoed between turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct View {
    pub show_open: bool,
}

impl View {
    fn draw<R: Rng, W: Write>(&self, game: &Game<R>, out: &mut W) -> Result<()> {
        let board = game.board();
        let grid = if self.show_open {
            render_open_cells(board)
        } else {
            render(board)
        };
        writeln!(out, "{grid}score: {}", board.score())?;
        Ok(())
    }
}

/// Split a scripted move list. Accepts `LLUR`, `l,l,u,r` or `left up`.
pub fn parse_moves(script: &str) -> Result<Vec<Move>, EngineError> {
    let mut moves = Vec::new();
    for token in script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.parse::<Move>() {
            Ok(m) => moves.push(m),
            Err(_) => {
                for ch in token.chars() {
                    moves.push(ch.to_string().parse()?);
                }
            }
        }
    }
    Ok(moves)
}

/// Play a fixed list of moves, stopping early on loss.
pub fn play_script<R: Rng, W: Write>(
    game: &mut Game<R>,
    moves: &[Move],
    view: View,
    out: &mut W,
) -> Result<RunSummary> {
    view.draw(game, out)?;
    for &dir in moves {
        if turn(game, dir, view, out)? {
            break;
        }
    }
    Ok(game.summary())
}

/// Interactive loop: one move per input line, `q` to quit.
pub fn play_interactive<R: Rng, I: BufRead, W: Write>(
    game: &mut Game<R>,
    input: I,
    view: View,
    out: &mut W,
) -> Result<RunSummary> {
    view.draw(game, out)?;
    write!(out, "move (L/R/U/D, q to quit): ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line.context("failed to read move")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            info!("quit after {} moves", game.moves());
            break;
        }
        match line.parse::<Move>() {
            Ok(dir) => {
                if turn(game, dir, view, out)? {
                    break;
                }
            }
            Err(e) => warn!("{e}"),
        }
        write!(out, "move (L/R/U/D, q to quit): ")?;
        out.flush()?;
    }
    Ok(game.summary())
}

/// One turn plus output. Returns true once the game is lost.
fn turn<R: Rng, W: Write>(game: &mut Game<R>, dir: Move, view: View, out: &mut W) -> Result<bool> {
    let outcome = game
        .step(dir)
        .with_context(|| format!("move {dir} rejected"))?;
    if !outcome.changed {
        info!("{dir} did not move any tile");
    }
    view.draw(game, out)?;
    if outcome.lost {
        writeln!(out, "game over! final score: {}", game.board().score())?;
    }
    Ok(outcome.lost)
}
