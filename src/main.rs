use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plybot::board::GameBoard;
use plybot::match_runner::{run_match, BotKind, MatchParams};
use plybot::perft::perft;
use plybot::search::Searcher;
use plybot::uci::UciEngine;
use plybot::{EngineConfig, Position};

#[derive(Parser, Debug)]
#[command(name = "plybot", author, version, about = "Fixed-depth minimax chess bot", long_about = None)]
struct Args {
    /// Engine configuration (JSON); defaults to the reference settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the search depth in plies
    #[arg(long, global = true)]
    depth: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Speak UCI on stdin/stdout (default)
    Uci,
    /// Pick a move for one position
    Think {
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
        /// Time budget in milliseconds (reported, not enforced)
        #[arg(long, default_value_t = 1000)]
        movetime: u64,
    },
    /// Play games between two bots
    Match {
        /// Opponent: minimax | material | first | random
        #[arg(long, default_value = "first")]
        opponent: String,
        #[arg(long, default_value_t = 10)]
        games: usize,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        #[arg(long, default_value_t = 1)]
        threads: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Start every game from the initial position
        #[arg(long, default_value_t = false)]
        no_openings: bool,
        /// Write the summary as JSON
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(value_name = "DEPTH")]
        depth: u32,
        #[arg(long, default_value = "startpos")]
        fen: String,
    },
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::reference(),
    };
    if let Some(d) = args.depth { cfg = cfg.with_depth(d); }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_position(fen: &str) -> Result<Position> {
    if fen == "startpos" { return Ok(Position::startpos()); }
    Position::from_fen(fen).context("parsing --fen")
}

fn opponent_kind(name: &str, cfg: EngineConfig, seed: u64) -> Result<BotKind> {
    Ok(match name {
        "minimax" => BotKind::Minimax { config: cfg },
        "material" => BotKind::Minimax { config: EngineConfig::material_only().with_depth(cfg.search.depth) },
        "first" => BotKind::FirstOption,
        "random" => BotKind::Random { seed },
        other => anyhow::bail!("unknown opponent '{other}': use minimax, material, first or random"),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = load_config(&args)?;

    match args.command.unwrap_or(Command::Uci) {
        Command::Uci => {
            let mut engine = UciEngine::new(cfg)?;
            engine.run_loop()?;
        }
        Command::Think { fen, movetime } => {
            let mut pos = parse_position(&fen)?;
            let mut searcher = Searcher::new(cfg.search, cfg.eval);
            let t0 = Instant::now();
            let res = searcher.choose_move(&mut pos, Duration::from_millis(movetime))?;
            let dt = t0.elapsed().as_secs_f64();
            println!(
                "bestmove {} score {} nodes {} leaves {} terminals {} time {:.3}s",
                pos.move_to_uci(res.bestmove), res.score, res.nodes, res.leaves, res.terminals, dt
            );
        }
        Command::Match { opponent, games, max_plies, threads, seed, no_openings, json_out } => {
            let ours = BotKind::Minimax { config: cfg };
            let theirs = opponent_kind(&opponent, cfg, seed)?;
            let params = MatchParams {
                games,
                max_plies,
                threads,
                use_openings: !no_openings,
                progress: true,
                ..MatchParams::default()
            };
            let summary = run_match(&ours, &theirs, &params)?;
            println!(
                "{} vs {}: +{} -{} ={} (score {:.1}/{})",
                summary.a, summary.b, summary.a_wins, summary.b_wins, summary.draws, summary.score_a(), games
            );
            if let Some(path) = json_out {
                summary.write_json(&path).with_context(|| format!("writing {}", path.display()))?;
            }
        }
        Command::Perft { depth, fen } => {
            let mut pos = parse_position(&fen)?;
            let t0 = Instant::now();
            let nodes = perft(&mut pos, depth);
            let dt = t0.elapsed().as_secs_f64();
            let nps = if dt > 0.0 { nodes as f64 / dt } else { f64::INFINITY };
            println!("nodes: {} elapsed: {:.3}s nps: {:.0}", nodes, dt, nps);
        }
    }
    Ok(())
}
