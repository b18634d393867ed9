use battl_engine::api::{self, MatchConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simulate-many")]
#[command(about = "Monte Carlo sim: many AI-versus-AI matches")]
struct Args {
    /// Optional JSON or YAML match config; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of matches
    #[arg(long, default_value_t = 100)]
    trials: u32,

    #[arg(long)]
    map: Option<String>,

    #[arg(long)]
    scenario: Option<String>,

    /// RNG base seed (match i uses seed+i)
    #[arg(long)]
    seed: Option<u64>,

    /// Difficulty 1..=3 for player 1
    #[arg(long)]
    p1: Option<u8>,

    /// Difficulty 1..=3 for player 2
    #[arg(long)]
    p2: Option<u8>,

    /// Turn limit per match; reaching it is a draw
    #[arg(long)]
    max_turns: Option<u32>,

    /// Emit JSON instead of the text summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut cfg = match args.config.as_ref() {
        Some(path) => MatchConfig::from_path(path)?,
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(map) = args.map {
        cfg.map = map;
    }
    if let Some(scenario) = args.scenario {
        cfg.scenario = scenario;
    }
    if let Some(d) = args.p1 {
        cfg.difficulties[0] = d;
    }
    if let Some(d) = args.p2 {
        cfg.difficulties[1] = d;
    }
    if let Some(turns) = args.max_turns {
        cfg.max_turns = turns;
    }

    info!(trials = args.trials, seed = cfg.seed, "running batch");
    let stats = api::simulate_many(&cfg, args.trials)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let rate = |n: u32| {
        if stats.samples == 0 {
            0.0
        } else {
            f64::from(n) / f64::from(stats.samples) * 100.0
        }
    };
    println!("simulate-many results");
    println!("---------------------");
    println!("matches:            {}", stats.samples);
    println!("map / scenario:     {} / {}", cfg.map, cfg.scenario);
    println!(
        "difficulty:         {} vs {}",
        cfg.difficulties[0], cfg.difficulties[1]
    );
    println!();
    println!("player 1 wins:      {:.1}%", rate(stats.player0_wins));
    println!("player 2 wins:      {:.1}%", rate(stats.player1_wins));
    println!("draws:              {:.1}%", rate(stats.draws));
    println!("avg turns:          {:.2}", stats.avg_turns);

    Ok(())
}
