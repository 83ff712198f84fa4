//! Line-oriented text shell over a single board.
//!
//! Each input line is one command, optionally preceded by a numeric id.
//! A response starts with `=` on success or `?` on failure, followed by the
//! echoed id and the response text, and ends with a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `new <resolution>` - Replace the board with an empty one
//! - `place <kind> <x,y>` - Place a rook/bishop/queen/knight/king/pawn
//! - `move <x,y> <x,y>` - Move the piece on the first square to the second
//! - `remove <x,y>` - Remove the piece on a square
//! - `moves <x,y>` - List the squares the piece on a square can reach
//! - `attacks <x,y>` - List the occupied squares among those moves
//! - `color <x,y>` - Checkerboard color of a square
//! - `highlight <x,y> <color>` - Composited fill of a highlighted square
//! - `empty` - List empty squares
//! - `show` - Print the board
//!
//! ## Example
//!
//! ```ignore
//! use gridboard::shell::Shell;
//! let mut shell = Shell::new(BoardConfig::default())?;
//! shell.run()?;
//! ```

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::board::{Board, BoardConfig, BoardError};
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::rules::{Archetype, OccupiedTargets};

const KNOWN_COMMANDS: &[&str] = &[
    "attacks",
    "color",
    "empty",
    "highlight",
    "known_command",
    "list_commands",
    "move",
    "moves",
    "name",
    "new",
    "place",
    "quit",
    "remove",
    "show",
    "version",
];

/// Shell state: the board and the kinds placed on it.
pub struct Shell {
    config: BoardConfig,
    targets: OccupiedTargets,
    board: Board,
    /// One shared kind per archetype
    kinds: HashMap<Archetype, Arc<PieceKind>>,
}

impl Shell {
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        Self::with_targets(config, OccupiedTargets::default())
    }

    /// A shell whose knights and kings treat occupied targets per `targets`.
    pub fn with_targets(config: BoardConfig, targets: OccupiedTargets) -> Result<Self, BoardError> {
        let board = config.build()?;
        Ok(Self {
            config,
            targets,
            board,
            kinds: HashMap::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!(command = %command, error = %message, "command failed");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional leading numeric id from the rest of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn kind(&mut self, archetype: Archetype) -> Arc<PieceKind> {
        let targets = self.targets;
        self.kinds
            .entry(archetype)
            .or_insert_with(|| {
                let asset = format!("{}.png", archetype.name());
                Arc::new(archetype.kind_with(asset, targets))
            })
            .clone()
    }

    fn piece_on(&self, arg: &str) -> Result<Piece, String> {
        let pos = parse_pos(arg)?;
        self.board
            .piece_at(pos)
            .cloned()
            .ok_or_else(|| format!("no piece at {pos}"))
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        debug!(command, ?args, "execute");
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(message) => (false, message),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = arg(args, 0)?.to_lowercase();
                Ok(KNOWN_COMMANDS.contains(&cmd.as_str()).to_string())
            }

            "quit" => Ok(String::new()),

            "new" => {
                let resolution = arg(args, 0)?
                    .parse::<i32>()
                    .map_err(|_| "invalid resolution".to_string())?;
                let config = BoardConfig {
                    resolution,
                    ..self.config.clone()
                };
                self.board = config.build().map_err(|e| e.to_string())?;
                self.config = config;
                Ok(String::new())
            }

            "place" => {
                let archetype = arg(args, 0)?
                    .parse::<Archetype>()
                    .map_err(|e| e.to_string())?;
                let pos = parse_pos(arg(args, 1)?)?;
                let kind = self.kind(archetype);
                let piece = self.board.place_piece(kind, pos).map_err(|e| e.to_string())?;
                Ok(piece.to_string())
            }

            "move" => {
                let piece = self.piece_on(arg(args, 0)?)?;
                let to = parse_pos(arg(args, 1)?)?;
                self.board.move_piece(&piece, to).map_err(|e| e.to_string())?;
                Ok(String::new())
            }

            "remove" => {
                let piece = self.piece_on(arg(args, 0)?)?;
                self.board.remove_piece(&piece).map_err(|e| e.to_string())?;
                Ok(String::new())
            }

            "moves" => {
                let piece = self.piece_on(arg(args, 0)?)?;
                let moves = self.board.valid_moves(&piece).map_err(|e| e.to_string())?;
                Ok(format_positions(&moves))
            }

            "attacks" => {
                let piece = self.piece_on(arg(args, 0)?)?;
                let attacks = self
                    .board
                    .attacking_positions(&piece)
                    .map_err(|e| e.to_string())?;
                Ok(format_positions(&attacks))
            }

            "color" => {
                let pos = parse_pos(arg(args, 0)?)?;
                let color = self.board.color_of_square(pos).map_err(|e| e.to_string())?;
                Ok(color.to_string())
            }

            "highlight" => {
                let pos = parse_pos(arg(args, 0)?)?;
                let color = arg(args, 1)?
                    .parse::<Color>()
                    .map_err(|e| e.to_string())?;
                let fill = self
                    .board
                    .apply_highlight(pos, color)
                    .map_err(|e| e.to_string())?;
                Ok(fill.to_string())
            }

            "empty" => Ok(format_positions(&self.board.empty_positions())),

            "show" => Ok(format!("\n{}", self.board)),

            _ => Err(format!("unknown command: {command}")),
        }
    }
}

fn arg<'a>(args: &[&'a str], i: usize) -> Result<&'a str, String> {
    args.get(i).copied().ok_or_else(|| "missing argument".to_string())
}

fn parse_pos(s: &str) -> Result<Position, String> {
    s.parse::<Position>().map_err(|e| e.to_string())
}

/// Positions as space-separated `(x,y)` pairs.
pub fn format_positions(positions: &[Position]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
