//! Go Text Protocol (GTP) implementation.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements enough of GTP version 2 to play against the rules
//! engine from a graphical interface like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Any size from 1 to 25
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Set komi
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Generate and play a move for the given color
//! - `undo` - Take back the last move
//! - `showboard` - Print the board
//!
//! ## Example
//!
//! ```ignore
//! use gostate::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(19);
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::board::{Color, Move};
use crate::constants::{DEFAULT_KOMI, MAX_SIZE, MIN_SIZE};
use crate::player::{Player, RandomPlayer};
use crate::position::Position;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    pos: Position,
    komi: f32,
    player: RandomPlayer,
}

impl GtpEngine {
    pub fn new(size: usize) -> Self {
        Self::with_player(size, RandomPlayer::new())
    }

    pub fn with_player(size: usize, player: RandomPlayer) -> Self {
        Self {
            pos: Position::new(size),
            komi: DEFAULT_KOMI,
            player,
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(stdout, "{prefix}{id_str} {message}\n\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        debug!("gtp: {command} {}", args.join(" "));
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => {
                        self.pos = Position::new(size);
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.pos = Position::new(self.pos.size());
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f32>() {
                    Ok(komi) => {
                        self.komi = komi;
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let color: Color = match color.parse() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                let mv = match Move::parse(vertex, self.pos.size()) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                self.play_as(color, mv)
            }

            "genmove" => {
                let Some(color) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let color: Color = match color.parse() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                let mut trial = self.turn_for(color);
                let mv = self.player.get_move(&trial);
                match trial.do_move(mv) {
                    Ok(_) => {
                        self.pos = trial;
                        (true, mv.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => {
                let history = self.pos.history();
                let Some((_, earlier)) = history.split_last() else {
                    return (false, "cannot undo".to_string());
                };
                match Position::replay(self.pos.size(), earlier) {
                    Ok(pos) => {
                        self.pos = pos;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.pos)),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Play `mv` for `color`. A move out of turn is preceded by a pass so the
    /// colors line up. Nothing changes unless the move itself is legal.
    fn play_as(&mut self, color: Color, mv: Move) -> (bool, String) {
        let mut trial = self.turn_for(color);
        match trial.do_move(mv) {
            Ok(_) => {
                self.pos = trial;
                (true, String::new())
            }
            Err(_) => (false, "illegal move".to_string()),
        }
    }

    /// A copy of the position with `color` to move, passing for the other
    /// side if needed.
    fn turn_for(&self, color: Color) -> Position {
        let mut pos = self.pos.copy();
        if color != pos.current_player() {
            warn!("{color} to play out of turn, inserting a pass");
            // A pass is always legal.
            let _ = pos.do_move(Move::Pass);
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = GtpEngine::new(9);
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "gostate");
    }

    #[test]
    fn test_known_command() {
        let mut engine = GtpEngine::new(9);

        let (success, response) = engine.execute("known_command", &["undo"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["unknown_cmd"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = GtpEngine::new(9);

        let (success, _) = engine.execute("boardsize", &["13"]);
        assert!(success);
        assert_eq!(engine.position().size(), 13);

        let (success, _) = engine.execute("boardsize", &["26"]);
        assert!(!success);
        let (success, _) = engine.execute("boardsize", &["0"]);
        assert!(!success);
    }

    #[test]
    fn test_komi() {
        let mut engine = GtpEngine::new(9);
        assert_eq!(engine.komi(), DEFAULT_KOMI);
        let (success, _) = engine.execute("komi", &["6.5"]);
        assert!(success);
        assert_eq!(engine.komi(), 6.5);
        let (success, _) = engine.execute("komi", &["lots"]);
        assert!(!success);
    }

    #[test]
    fn test_play_undo_and_clear() {
        let mut engine = GtpEngine::new(9);

        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);
        assert_eq!(engine.position().stone_at((3, 3)), Some(Color::Black));

        let (success, _) = engine.execute("play", &["white", "D4"]);
        assert!(!success);
        assert_eq!(engine.position().turns_played(), 1);

        let (success, _) = engine.execute("undo", &[]);
        assert!(success);
        assert_eq!(engine.position().turns_played(), 0);

        let (success, _) = engine.execute("undo", &[]);
        assert!(!success);

        engine.execute("play", &["b", "C3"]);
        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.position().turns_played(), 0);
    }

    #[test]
    fn test_play_out_of_turn_inserts_pass() {
        let mut engine = GtpEngine::new(9);
        let (success, _) = engine.execute("play", &["white", "E5"]);
        assert!(success);
        assert_eq!(engine.position().history(), &[Move::Pass, Move::Play((4, 4))]);
        assert_eq!(engine.position().current_player(), Color::Black);
    }

    #[test]
    fn test_rejected_out_of_turn_move_changes_nothing() {
        // White A1 would be suicide between Black A2 and B1.
        let mut engine = GtpEngine::new(5);
        for (color, vertex) in [("b", "A2"), ("w", "E5"), ("b", "B1"), ("w", "E3")] {
            let (success, _) = engine.execute("play", &[color, vertex]);
            assert!(success);
        }
        assert_eq!(engine.position().current_player(), Color::Black);
        let before = engine.position().history().to_vec();

        let (success, response) = engine.execute("play", &["w", "A1"]);
        assert!(!success);
        assert_eq!(response, "illegal move");
        assert_eq!(engine.position().history(), before.as_slice());
        assert_eq!(engine.position().current_player(), Color::Black);
        assert_eq!(engine.position().stone_at((0, 0)), None);
    }

    #[test]
    fn test_genmove_out_of_turn() {
        let mut engine = GtpEngine::with_player(9, RandomPlayer::with_seed(5));
        let (success, response) = engine.execute("genmove", &["w"]);
        assert!(success);
        let mv = Move::parse(&response, 9).unwrap();
        assert_eq!(engine.position().history(), &[Move::Pass, mv]);
        assert_eq!(engine.position().current_player(), Color::Black);
    }

    #[test]
    fn test_genmove_plays_for_color() {
        let mut engine = GtpEngine::with_player(9, RandomPlayer::with_seed(3));
        let (success, response) = engine.execute("genmove", &["b"]);
        assert!(success);
        let mv = Move::parse(&response, 9).unwrap();
        assert_eq!(engine.position().last_move(), Some(mv));
        assert_eq!(engine.position().current_player(), Color::White);
    }
}
