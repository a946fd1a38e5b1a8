use std::io::{self, BufRead, Write};
use std::time::Duration;

use log::{debug, warn};

use crate::board::cozy::Position;
use crate::board::GameBoard;
use crate::bot::{Bot, MinimaxBot};
use crate::config::EngineConfig;
use crate::error::EngineError;

const DEFAULT_BUDGET: Duration = Duration::from_secs(1);

pub struct UciEngine {
    pos: Position,
    bot: MinimaxBot,
}

impl UciEngine {
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self { pos: Position::startpos(), bot: MinimaxBot::new(cfg)? })
    }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name PlyBot")?;
        writeln!(out, "id author PlyBot Team")?;
        writeln!(out, "option name Depth type spin default {} min 1 max 8", self.bot.searcher().params().depth)?;
        writeln!(out, "uciok")
    }

    fn cmd_setoption(&mut self, args: &str) {
        // setoption name Depth value N
        let mut tokens = args.split_whitespace();
        let (mut name, mut value) = (None, None);
        while let Some(tok) = tokens.next() {
            match tok {
                "name" => name = tokens.next(),
                "value" => value = tokens.next(),
                _ => {}
            }
        }
        match (name, value.and_then(|v| v.parse::<u32>().ok())) {
            (Some(n), Some(d)) if n.eq_ignore_ascii_case("depth") && d >= 1 => self.bot.searcher_mut().set_depth(d),
            _ => warn!("ignoring setoption {args}"),
        }
    }

    pub fn cmd_position(&mut self, args: &str) -> Result<(), EngineError> {
        // 'position startpos [moves ...]' | 'position fen <6 fields> [moves ...]'
        let mut tokens = args.split_whitespace();
        let mut pos = match tokens.next() {
            Some("startpos") => Position::startpos(),
            Some("fen") => {
                let fen_fields: Vec<&str> = tokens.by_ref().take(6).collect();
                Position::from_fen(&fen_fields.join(" "))?
            }
            _ => return Err(EngineError::Fen { fen: args.to_string(), reason: "expected startpos or fen".into() }),
        };
        if let Some("moves") = tokens.next() {
            for m in tokens { pos.make_move_uci(m)?; }
        }
        self.pos = pos;
        Ok(())
    }

    /// Budget handed to `think`: `movetime`, else a fortieth of our clock.
    fn parse_budget(&self, args: &str) -> (Duration, Option<u32>) {
        let mut budget = DEFAULT_BUDGET;
        let mut depth = None;
        let white = self.pos.board().side_to_move() == cozy_chess::Color::White;
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            let next = tokens.clone().next();
            let val = next.and_then(|s| s.parse::<u64>().ok());
            match (tok, val) {
                ("depth", _) => match next.and_then(|s| s.parse::<u32>().ok()) {
                    Some(d) => depth = Some(d),
                    None => { warn!("ignoring go depth {}", next.unwrap_or("")); continue; }
                },
                ("movetime", Some(ms)) => budget = Duration::from_millis(ms),
                ("wtime", Some(ms)) if white => budget = Duration::from_millis(ms / 40),
                ("btime", Some(ms)) if !white => budget = Duration::from_millis(ms / 40),
                _ => continue,
            }
            tokens.next();
        }
        (budget, depth)
    }

    pub fn cmd_go(&mut self, args: &str) -> Result<String, EngineError> {
        let (budget, depth) = self.parse_budget(args);
        let saved = self.bot.searcher().params().depth;
        if let Some(d) = depth.filter(|&d| d >= 1) { self.bot.searcher_mut().set_depth(d); }
        let res = self.bot.think(&mut self.pos, budget);
        self.bot.searcher_mut().set_depth(saved);
        match res {
            Ok(mv) => Ok(self.pos.move_to_uci(mv)),
            Err(EngineError::NoLegalMoves { .. }) => Ok("0000".to_string()),
            Err(e) => Err(e),
        }
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }
            debug!("uci <- {line}");
            match line {
                "uci" => self.cmd_uci(&mut out)?,
                "isready" => writeln!(out, "readyok")?,
                "ucinewgame" => self.pos = Position::startpos(),
                "quit" => break,
                "stop" => {}
                _ => {
                    if let Some(rest) = line.strip_prefix("position ") {
                        if let Err(e) = self.cmd_position(rest) { warn!("{e}"); }
                    } else if let Some(rest) = line.strip_prefix("setoption ") {
                        self.cmd_setoption(rest);
                    } else if line == "go" || line.starts_with("go ") {
                        match self.cmd_go(line.trim_start_matches("go")) {
                            Ok(best) => writeln!(out, "bestmove {best}")?,
                            Err(e) => { warn!("{e}"); writeln!(out, "bestmove 0000")?; }
                        }
                    } else {
                        debug!("unknown command: {line}");
                    }
                }
            }
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_fen_with_moves() {
        let mut e = UciEngine::new(EngineConfig::reference().with_depth(1)).unwrap();
        e.cmd_position("fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1 e8c8").unwrap();
        assert_eq!(e.position().fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn illegal_move_keeps_previous_position() {
        let mut e = UciEngine::new(EngineConfig::reference().with_depth(1)).unwrap();
        e.cmd_position("startpos moves e2e4").unwrap();
        let before = e.position().fen();
        assert!(e.cmd_position("startpos moves e2e5").is_err());
        assert_eq!(e.position().fen(), before);
    }

    #[test]
    fn go_depth_overrides_once() {
        let mut e = UciEngine::new(EngineConfig::reference().with_depth(3)).unwrap();
        e.cmd_position("fen 6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
        assert_eq!(e.cmd_go(" depth 2 movetime 50").unwrap(), "e1e8");
        assert_eq!(e.bot.searcher().params().depth, 3);
    }

    #[test]
    fn go_depth_out_of_range_is_ignored() {
        let e = UciEngine::new(EngineConfig::reference().with_depth(2)).unwrap();
        assert_eq!(e.parse_budget(" depth 4294967297 movetime 50"), (Duration::from_millis(50), None));
        assert_eq!(e.parse_budget(" depth 3"), (DEFAULT_BUDGET, Some(3)));
    }

    #[test]
    fn go_in_mated_position_returns_null_move() {
        let mut e = UciEngine::new(EngineConfig::reference().with_depth(1)).unwrap();
        e.cmd_position("fen R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(e.cmd_go("").unwrap(), "0000");
    }
}
