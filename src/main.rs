//! gridboard: move and attack generation on an N×N board.
//!
//! ## Usage
//!
//! - `gridboard` - Run the demo
//! - `gridboard shell` - Read board commands from stdin
//! - `gridboard moves --kind rook --at 3,3 --blocker 3,6` - Print a piece's reachable squares
//!
//! Set `RUST_LOG=debug` to see board mutations on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gridboard::board::{Board, BoardConfig};
use gridboard::color::Color;
use gridboard::constants::{
    DEFAULT_COLOR_EVEN, DEFAULT_COLOR_ODD, DEFAULT_PIECE_SCALE, DEFAULT_RESOLUTION, DEFAULT_SIZE,
};
use gridboard::position::Position;
use gridboard::rules::{Archetype, OccupiedTargets};
use gridboard::shell::{Shell, format_positions};

/// gridboard: move and attack generation on an N×N board
#[derive(Parser)]
#[command(name = "gridboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    board: BoardArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct BoardArgs {
    /// Squares along each edge
    #[arg(long, global = true, default_value_t = DEFAULT_RESOLUTION)]
    resolution: i32,

    /// Physical edge length of the board
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: f64,

    /// Color of squares with odd x+y (name or #rrggbb[aa])
    #[arg(long, global = true, default_value_t = DEFAULT_COLOR_ODD)]
    odd: Color,

    /// Color of squares with even x+y
    #[arg(long, global = true, default_value_t = DEFAULT_COLOR_EVEN)]
    even: Color,

    /// Fraction of a square covered by piece imagery, clamped to [0, 1]
    #[arg(long, global = true, default_value_t = DEFAULT_PIECE_SCALE)]
    piece_scale: f64,

    /// Knights and kings skip occupied squares
    #[arg(long, global = true)]
    exclude_occupied: bool,
}

impl BoardArgs {
    fn config(&self) -> BoardConfig {
        BoardConfig {
            resolution: self.resolution,
            size: self.size,
            color_odd: self.odd,
            color_even: self.even,
            piece_scale: self.piece_scale,
        }
    }

    fn targets(&self) -> OccupiedTargets {
        if self.exclude_occupied {
            OccupiedTargets::Exclude
        } else {
            OccupiedTargets::Include
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read board commands from stdin and answer on stdout
    Shell,
    /// Print the squares one piece can reach
    Moves {
        /// Piece kind (rook/tower, bishop, queen, knight, king, pawn)
        #[arg(long)]
        kind: Archetype,
        /// Square of the piece, as x,y
        #[arg(long)]
        at: Position,
        /// Squares holding blocking pieces, as x,y
        #[arg(long = "blocker")]
        blockers: Vec<Position>,
        /// Additional blockers scattered at random
        #[arg(long, default_value_t = 0)]
        random: usize,
        /// Seed for random blockers
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Shell) => {
            let mut shell = Shell::with_targets(cli.board.config(), cli.board.targets())
                .context("failed to create board")?;
            shell.run().context("shell i/o failed")?;
        }
        Some(Commands::Moves {
            kind,
            at,
            blockers,
            random,
            seed,
        }) => run_moves(&cli.board, kind, at, &blockers, random, seed)?,
        Some(Commands::Demo) | None => run_demo(&cli.board)?,
    }
    Ok(())
}

fn run_moves(
    args: &BoardArgs,
    kind: Archetype,
    at: Position,
    blockers: &[Position],
    random: usize,
    seed: u64,
) -> Result<()> {
    let mut board = args.config().build().context("failed to create board")?;
    let mover = board
        .place_piece(Arc::new(kind.kind_with("", args.targets())), at)
        .with_context(|| format!("cannot place {kind} at {at}"))?;

    let pawn = Arc::new(Archetype::Pawn.kind(""));
    for &pos in blockers {
        board
            .place_piece(Arc::clone(&pawn), pos)
            .with_context(|| format!("cannot place blocker at {pos}"))?;
    }
    let mut rng = fastrand::Rng::with_seed(seed);
    for _ in 0..random {
        let Some(pos) = board.random_empty_position(&mut rng) else {
            break;
        };
        board.place_piece(Arc::clone(&pawn), pos)?;
    }

    let moves = board.valid_moves(&mover)?;
    let attacks = board.attacking_positions(&mover)?;
    print!("{}", board.render_text(&moves));
    println!("moves:   {}", format_positions(&moves));
    println!("attacks: {}", format_positions(&attacks));
    Ok(())
}

fn run_demo(args: &BoardArgs) -> Result<()> {
    println!("gridboard: move generation on an N×N board\n");
    let mut board: Board = args.config().build().context("failed to create board")?;
    if board.resolution() < 8 {
        anyhow::bail!("the demo needs a board of at least 8x8");
    }

    let rook = Arc::new(Archetype::Rook.kind("rook.png"));
    let knight = Arc::new(Archetype::Knight.kind_with("knight.png", args.targets()));
    let pawn = Arc::new(Archetype::Pawn.kind("pawn.png"));

    println!("=== Rook ray stops at a blocker ===");
    let r = board.place_piece(rook, Position::new(3, 3))?;
    board.place_piece(Arc::clone(&pawn), Position::new(3, 6))?;
    let moves = board.valid_moves(&r)?;
    print!("{}", board.render_text(&moves));
    println!("attacks: {}\n", format_positions(&board.attacking_positions(&r)?));

    println!("=== Knight in the corner ===");
    let n = board.place_piece(knight, Position::new(0, 0))?;
    println!("moves: {}\n", format_positions(&board.valid_moves(&n)?));

    println!("=== Speculative move ===");
    let what_if = board.speculate(&r, Position::new(5, 3))?;
    print!("{what_if}");
    println!("original still has the rook at {:?}", board.position_of(&r));

    let highlight = Color::rgba(0, 64, 0, 0);
    println!("\n=== Highlight fills ===");
    for (pos, fill) in board.highlight_valid_moves(&r, highlight)?.iter().take(3) {
        println!("{pos} -> {fill}");
    }
    Ok(())
}
