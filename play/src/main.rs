use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use pipewright::{Game, GameConfig, Grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod logging;

/// Turn pipe tiles until flow runs from IN to OUT.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = GameConfig::default().rows)]
    rows: usize,
    #[arg(long, default_value_t = GameConfig::default().cols)]
    cols: usize,
    /// Seed for reproducible levels
    #[arg(long)]
    seed: Option<u64>,
    /// Generation attempts before giving up on a level
    #[arg(long, default_value_t = GameConfig::default().max_generation_attempts)]
    attempts: usize,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose).context("could not set up logging")?;

    let config = GameConfig {
        rows: args.rows,
        cols: args.cols,
        max_generation_attempts: args.attempts,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(config, rng).context("could not build a level")?;
    game.on_win(|_| println!("*** flow restored! `n` for a new level, `q` to quit ***"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    draw(game.grid());

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => {
                game.restart().context("could not build a level")?;
                draw(game.grid());
            }
            input => match parse_move(input) {
                Some((row, col)) => {
                    game.rotate_tile(row, col);
                    draw(game.grid());
                }
                None => println!("enter `row col` to turn a tile, `n` for a new level or `q` to quit"),
            },
        }
    }

    Ok(())
}

/// Parse `row col`, also accepting a comma between the two.
fn parse_move(input: &str) -> Option<(usize, usize)> {
    let mut parts = input.split(|c: char| c == ',' || c.is_whitespace()).filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    match parts.next() {
        None => Some((row, col)),
        Some(_) => None,
    }
}

fn draw(grid: &Grid) {
    let (entry, exit) = grid.anchors();
    println!(
        "IN  at {:?} on the {:?} side, OUT at {:?} on the {:?} side",
        entry.location(),
        entry.side(),
        exit.location(),
        exit.side()
    );

    let pipes = grid.to_string();
    let lit = grid.lit_map();
    for (row, (pipe_row, lit_row)) in pipes.lines().zip(lit.lines()).enumerate() {
        println!("{row:>3}  {pipe_row}   {lit_row}");
    }
}
