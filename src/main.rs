//! Othello engine command line
//!
//! Analyze a position, let the engine play itself, or print the default
//! configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use othello::eval::Evaluator;
use othello::rules::{apply_move, is_terminal, pass, piece_counts, winner};
use othello::{Board, Budget, Difficulty, Disc, Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "othello")]
#[command(about = "Othello/Reversi search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the best move for a position
    Analyze {
        /// Board file (grid of . B W, optional side line); default is the start position
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Board side for the start position
        #[arg(short, long, default_value_t = 8)]
        size: usize,

        /// Side to move (black or white); defaults to the board's side
        #[arg(short, long)]
        player: Option<Disc>,

        /// Show the evaluation breakdown of the position
        #[arg(long)]
        breakdown: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Let the engine play both sides
    Selfplay {
        /// Board side
        #[arg(short, long, default_value_t = 8)]
        size: usize,

        /// Stop after this many plies
        #[arg(long, default_value_t = 300)]
        max_plies: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print the default configuration as TOML
    Config,
}

#[derive(Args)]
struct EngineArgs {
    /// Difficulty (easy, medium, hard)
    #[arg(short, long, default_value = "hard")]
    difficulty: Difficulty,

    /// Override the phase depth bound
    #[arg(long)]
    depth: Option<i8>,

    /// Override the phase time budget in milliseconds
    #[arg(short, long)]
    time_ms: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root search threads
    #[arg(long)]
    threads: Option<usize>,
}

impl EngineArgs {
    fn engine(&self) -> Result<Engine> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        Engine::new(config).context("invalid engine configuration")
    }

    fn budget(&self) -> Budget {
        Budget {
            depth: self.depth,
            time: self.time_ms.map(Duration::from_millis),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Analyze {
            board,
            size,
            player,
            breakdown,
            engine,
        } => analyze(board.as_deref(), size, player, breakdown, &engine),
        Command::Selfplay {
            size,
            max_plies,
            engine,
        } => selfplay(size, max_plies, &engine),
        Command::Config => {
            print!("{}", EngineConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn load_board(path: Option<&Path>, size: usize) -> Result<Board> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading board {}", path.display()))?;
            Board::parse(&text).with_context(|| format!("parsing board {}", path.display()))
        }
        None => Ok(Board::new(size)?),
    }
}

fn analyze(
    path: Option<&Path>,
    size: usize,
    player: Option<Disc>,
    show_breakdown: bool,
    args: &EngineArgs,
) -> Result<()> {
    let board = load_board(path, size)?;
    let player = player.unwrap_or_else(|| board.side_to_move());
    if player == Disc::Empty {
        bail!("player must be black or white");
    }
    let mut engine = args.engine()?;

    println!("{board}");
    let decision =
        engine.find_best_move_with_budget(&board, player, args.difficulty, args.budget())?;

    match decision.best_move {
        Some(pos) => println!("Best move for {}: {pos}", player.name()),
        None => println!("{} has no legal move", player.name()),
    }
    println!("Phase: {} ({})", decision.phase, decision.difficulty);
    println!("Score: {}", decision.score);
    if let Some(margin) = decision.proven_margin() {
        println!("Proven result: {margin:+} discs");
    }
    if let Some(category) = decision.category {
        println!("Move: {category}");
    }
    for threat in &decision.threats {
        let replies: Vec<String> = threat
            .replies
            .iter()
            .map(|r| {
                let what = if r.takes_corner { "corner" } else { "flips" };
                format!("{} ({what} {}, {})", r.reply, r.flips, r.severity)
            })
            .collect();
        println!("Careful with {}: {}", threat.candidate, replies.join(", "));
    }
    println!(
        "Depth {}, {} nodes in {:?}{}{}",
        decision.depth,
        decision.nodes,
        decision.elapsed,
        if decision.timed_out { ", out of time" } else { "" },
        if decision.used_fallback { ", greedy fallback" } else { "" }
    );
    println!(
        "Cutoffs {} (first move {:.1}%), TT hits {:.1}%",
        decision.stats.beta_cutoffs,
        decision.stats.first_move_rate() * 100.0,
        decision.stats.tt_score_rate() * 100.0
    );

    if show_breakdown {
        let params = engine.config().parameters(decision.phase);
        let evaluator = Evaluator::new(params.weights, &params.positional, board.size());
        println!("{:#?}", evaluator.breakdown(&board, player));
    }
    Ok(())
}

fn selfplay(size: usize, max_plies: usize, args: &EngineArgs) -> Result<()> {
    let mut board = Board::new(size)?;
    let mut engine = args.engine()?;

    for ply in 1..=max_plies {
        if is_terminal(&board) {
            break;
        }
        let side = board.side_to_move();
        let decision = engine.find_best_move_with_budget(&board, side, args.difficulty, args.budget())?;
        match decision.best_move {
            Some(pos) => {
                let (next, flipped) = apply_move(&board, pos)?;
                println!(
                    "{ply:3}. {:5} {pos} flips {:2}  score {:8}  depth {}",
                    side.name(),
                    flipped.len(),
                    decision.score,
                    decision.depth
                );
                board = next;
            }
            None => {
                println!("{ply:3}. {:5} passes", side.name());
                pass(&mut board);
            }
        }
    }

    println!("{board}");
    let (black, white) = piece_counts(&board);
    match winner(&board) {
        Some(Disc::Empty) => println!("Draw {black}-{white}"),
        Some(side) => println!("{} wins {black}-{white}", side.name()),
        None => println!("Stopped after {max_plies} plies at {black}-{white}"),
    }
    Ok(())
}
