use clap::{Parser, ValueEnum};
use draw_poker::agents::{BotProfile, HeuristicAgent, PlayerAgent, RandomAgent, TimeoutAgent};
use draw_poker::config::GameConfig;
use draw_poker::events::LogSink;
use draw_poker::game::Game;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentChoice {
    Random,
    Heuristic,
}

/// Play a session of five-card draw between bots.
#[derive(Debug, Parser)]
#[command(name = "draw-poker", version, about)]
struct Args {
    /// TOML config file (overrides DRAW_POKER_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of players at the table
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=8))]
    players: u8,
    /// Stop after this many rounds
    #[arg(long)]
    rounds: Option<u32>,
    /// Seed for the deck and the bots
    #[arg(long)]
    seed: Option<u64>,
    /// Which bot plays every seat
    #[arg(long, value_enum, default_value_t = AgentChoice::Heuristic)]
    agent: AgentChoice,
}

fn build_agent(choice: AgentChoice, name: &str, seed: Option<u64>, timeout: Duration) -> Box<dyn PlayerAgent> {
    match choice {
        AgentChoice::Random => Box::new(TimeoutAgent::new(RandomAgent::new(seed), timeout)),
        AgentChoice::Heuristic => {
            let mut profile = BotProfile::default();
            if let Some(seed) = seed {
                profile = profile.with_seed(seed);
            }
            Box::new(TimeoutAgent::new(HeuristicAgent::new(name, profile), timeout))
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
    let args = Args::parse();

    let mut config = match GameConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if args.rounds.is_some() {
        config.max_rounds = args.rounds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let timeout = Duration::from_millis(config.decision_timeout_ms);
    let seats = (1..=args.players)
        .map(|i| {
            let name = format!("Player{i}");
            let seed = config.seed.map(|s| s.wrapping_add(u64::from(i)));
            let agent = build_agent(args.agent, &name, seed, timeout);
            (name, agent)
        })
        .collect();

    info!("draw-poker {}: {} players, {:?} agents", draw_poker::VERSION, args.players, args.agent);
    let mut game = match Game::new(config, seats, LogSink) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    match game.play() {
        Ok(summary) => {
            print!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
