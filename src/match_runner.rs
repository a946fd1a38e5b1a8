use std::path::Path;
use std::time::Duration;

use cozy_chess::{Color, GameStatus};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::cozy::Position;
use crate::board::GameBoard;
use crate::bot::{Bot, FirstOptionBot, MinimaxBot, RandomBot};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::openings::{get_openings, Opening};

/// A bot description that can be instantiated once per game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotKind {
    Minimax {
        #[serde(default)]
        config: EngineConfig,
    },
    FirstOption,
    Random { seed: u64 },
}

impl BotKind {
    /// `game` perturbs the random seed so each game differs but replays identically.
    pub fn build(&self, game: u64) -> Result<Box<dyn Bot<Position> + Send>, EngineError> {
        let bot: Box<dyn Bot<Position> + Send> = match self {
            BotKind::Minimax { config } => Box::new(MinimaxBot::new(*config)?),
            BotKind::FirstOption => Box::new(FirstOptionBot),
            BotKind::Random { seed } => Box::new(RandomBot::new(seed ^ game.wrapping_mul(0x9E37_79B9_7F4A_7C15))),
        };
        Ok(bot)
    }

    pub fn label(&self) -> String {
        match self {
            BotKind::Minimax { config } => format!("minimax-d{}", config.search.depth),
            BotKind::FirstOption => "first-option".to_string(),
            BotKind::Random { seed } => format!("random-{seed}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchParams {
    pub games: usize,
    pub max_plies: usize,
    /// Handed to every `think` call.
    pub budget: Duration,
    pub threads: usize,
    pub use_openings: bool,
    pub progress: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self { games: 2, max_plies: 200, budget: Duration::from_secs(1), threads: 1, use_openings: true, progress: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate,
    /// Stalemate or fifty-move rule.
    Draw,
    PlyCap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub opening: Option<String>,
    pub moves: Vec<String>,
    /// 1 white win, 0 draw, -1 black win.
    pub result: i8,
    pub termination: Termination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSummary {
    pub a: String,
    pub b: String,
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,
    pub games: Vec<GameRecord>,
}

impl MatchSummary {
    pub fn score_a(&self) -> f64 { self.a_wins as f64 + 0.5 * self.draws as f64 }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), EngineError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Plays one game from `pos` until mate, draw or `max_plies` moves.
pub fn play_game<'a>(
    white: &mut (dyn Bot<Position> + 'a),
    black: &mut (dyn Bot<Position> + 'a),
    mut pos: Position,
    max_plies: usize,
    budget: Duration,
) -> Result<GameRecord, EngineError> {
    let mut record = GameRecord {
        white: white.name().to_string(),
        black: black.name().to_string(),
        opening: None,
        moves: Vec::new(),
        result: 0,
        termination: Termination::PlyCap,
    };
    loop {
        match pos.status() {
            GameStatus::Won => {
                record.result = if pos.side_to_move() == Color::White { -1 } else { 1 };
                record.termination = Termination::Checkmate;
                break;
            }
            GameStatus::Drawn => { record.termination = Termination::Draw; break; }
            GameStatus::Ongoing => {}
        }
        if record.moves.len() >= max_plies { break; }
        let mover = if pos.side_to_move() == Color::White { &mut *white } else { &mut *black };
        let mv = mover.think(&mut pos, budget)?;
        record.moves.push(pos.move_to_uci(mv));
        pos.play(mv);
    }
    Ok(record)
}

/// Plays `params.games` games between `a` and `b`, alternating colors. With
/// openings enabled, consecutive game pairs share an opening.
pub fn run_match(a: &BotKind, b: &BotKind, params: &MatchParams) -> Result<MatchSummary, EngineError> {
    let openings: Vec<Opening> = if params.use_openings { get_openings() } else { Vec::new() };
    let pb = if params.progress { ProgressBar::new(params.games as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games {msg}").unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.threads.max(1))
        .build()
        .map_err(|e| EngineError::Config(format!("thread pool: {e}")))?;

    info!("match {} vs {}: {} games, {} threads", a.label(), b.label(), params.games, params.threads.max(1));
    let games: Vec<(bool, GameRecord)> = pool.install(|| {
        (0..params.games)
            .into_par_iter()
            .map(|i| -> Result<(bool, GameRecord), EngineError> {
                let a_white = i % 2 == 0;
                let mut bot_a = a.build(i as u64)?;
                let mut bot_b = b.build(i as u64)?;
                let opening = if openings.is_empty() { None } else { Some(&openings[(i / 2) % openings.len()]) };
                let start = match opening { Some(o) => o.position()?, None => Position::startpos() };
                let (white, black) = if a_white { (&mut bot_a, &mut bot_b) } else { (&mut bot_b, &mut bot_a) };
                let mut rec = play_game(white.as_mut(), black.as_mut(), start, params.max_plies, params.budget)?;
                rec.opening = opening.map(|o| o.name.clone());
                pb.inc(1);
                Ok((a_white, rec))
            })
            .collect::<Result<Vec<_>, EngineError>>()
    })?;
    pb.finish_and_clear();

    let mut summary = MatchSummary { a: a.label(), b: b.label(), ..MatchSummary::default() };
    for (a_white, rec) in games {
        let a_result = if a_white { rec.result } else { -rec.result };
        match a_result {
            1 => summary.a_wins += 1,
            -1 => summary.b_wins += 1,
            _ => summary.draws += 1,
        }
        summary.games.push(rec);
    }
    info!("match {} vs {}: +{} -{} ={}", summary.a, summary.b, summary.a_wins, summary.b_wins, summary.draws);
    Ok(summary)
}
