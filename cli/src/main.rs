use anyhow::{bail, Context};
use battl_engine::{
    api::{self, MatchConfig},
    content, Action, AdMode, CharacterId, ClassId, Dice, GameState,
};
use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use std::{fs, path::Path, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Adv {
    Normal,
    Advantage,
    Disadvantage,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a d20 multiple times with optional advantage/disadvantage
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Advantage mode
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// List the built-in maps and scenarios
    Maps,
    /// Print the class and ability tables
    Classes {
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Create a fresh match state (JSON on stdout)
    New {
        #[arg(long, default_value = "default")]
        map: String,
        #[arg(long, default_value = "skirmish")]
        scenario: String,
        /// Write the state here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the cells a character may move to
    Moves {
        /// Path to a saved state
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        character: String,
    },
    /// List the cells a character may aim an ability at
    Attacks {
        /// Path to a saved state
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        character: String,
        /// 0 = standard, 1 = special
        #[arg(long, default_value_t = 0)]
        ability: usize,
    },
    /// Apply one action (JSON) to a saved state and print the result
    Apply {
        /// Path to a saved state
        #[arg(long)]
        state: PathBuf,
        /// Action as JSON, e.g. {"type":"end_turn","character_id":"mage1"}
        #[arg(long)]
        action: String,
        /// RNG seed for determinism (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Overwrite the state file on success
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Run one AI-versus-AI match
    Simulate {
        /// JSON or YAML match config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        map: Option<String>,
        #[arg(long)]
        scenario: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Difficulty 1..=3 for player 1
        #[arg(long)]
        p1: Option<u8>,
        /// Difficulty 1..=3 for player 2
        #[arg(long)]
        p2: Option<u8>,
        #[arg(long)]
        max_turns: Option<u32>,
        /// Print the full result as JSON instead of the log
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Parser)]
#[command(name = "battl")]
#[command(about = "Tactical grid combat harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_mode(a: Adv) -> AdMode {
    match a {
        Adv::Normal => AdMode::Normal,
        Adv::Advantage => AdMode::Advantage,
        Adv::Disadvantage => AdMode::Disadvantage,
    }
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_state(path: &Path) -> anyhow::Result<GameState> {
    let text = read_text_auto(path)?;
    GameState::from_json(&text).with_context(|| format!("invalid state in {}", path.display()))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { seed, adv, rolls } => {
            let mode = to_mode(adv);
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", dice.d20(mode));
            }
        }
        Cmd::Maps => {
            for (id, text) in content::builtin_maps() {
                let map = content::parse_map(text)?;
                let rows = map.grid.len();
                let cols = map.grid.first().map_or(0, Vec::len);
                println!("map {id}: {} ({rows}x{cols}) {}", map.name, map.description);
            }
            for (id, text) in content::builtin_scenarios() {
                let scenario = content::parse_scenario(text)?;
                println!(
                    "scenario {id}: {} ({} characters) {}",
                    scenario.name,
                    scenario.roster.len(),
                    scenario.description
                );
            }
        }
        Cmd::Classes { json } => {
            if json {
                let tables: Vec<_> = ClassId::ALL
                    .iter()
                    .map(|c| serde_json::json!({ "class": c.definition(), "abilities": c.abilities() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for class in ClassId::ALL {
                    let d = class.definition();
                    println!(
                        "{}: move={} attack={:+} AC={} save={:+} HP={} (+{} vs {})",
                        d.name,
                        d.move_range,
                        d.attack_bonus,
                        d.armor_class,
                        d.save_bonus,
                        d.max_health,
                        d.bonus_amount,
                        d.bonus_against
                    );
                    for (i, a) in class.abilities().iter().enumerate() {
                        println!(
                            "  [{i}] {}: range={} radius={} damage={} save DC={}",
                            a.display_name, a.range, a.radius, a.damage, a.save_difficulty
                        );
                    }
                }
            }
        }
        Cmd::New { map, scenario, out } => {
            let state = content::new_match(&map, &scenario)?;
            let json = state.to_json()?;
            match out {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Cmd::Moves { state, character } => {
            let state = load_state(&state)?;
            let id = CharacterId::from(character.as_str());
            if state.character(&id).is_none() {
                bail!("character {character} not found");
            }
            for cell in state.valid_moves(&id) {
                println!("{} {}", cell, cell.label());
            }
        }
        Cmd::Attacks {
            state,
            character,
            ability,
        } => {
            let state = load_state(&state)?;
            let id = CharacterId::from(character.as_str());
            if state.character(&id).is_none() {
                bail!("character {character} not found");
            }
            for option in state.valid_attacks(&id, ability) {
                match option.target_id {
                    Some(target) => println!("{} {} {}", option.position, option.position.label(), target),
                    None => println!("{} {}", option.position, option.position.label()),
                }
            }
        }
        Cmd::Apply {
            state: path,
            action,
            seed,
            write,
        } => {
            let state = load_state(&path)?;
            let action = Action::from_json(&action)?;
            let mut dice = seed.map_or_else(Dice::from_entropy, Dice::from_seed);
            let result = action.apply(&state, &mut dice);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                bail!("action rejected: {}", result.message);
            }
            if write {
                fs::write(&path, result.new_state.to_json()?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "state written");
            }
        }
        Cmd::Simulate {
            config,
            map,
            scenario,
            seed,
            p1,
            p2,
            max_turns,
            json,
        } => {
            let mut cfg = match config {
                Some(path) => MatchConfig::from_path(&path)?,
                None => MatchConfig::default(),
            };
            if let Some(map) = map {
                cfg.map = map;
            }
            if let Some(scenario) = scenario {
                cfg.scenario = scenario;
            }
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if let Some(d) = p1 {
                cfg.difficulties[0] = d;
            }
            if let Some(d) = p2 {
                cfg.difficulties[1] = d;
            }
            if let Some(turns) = max_turns {
                cfg.max_turns = turns;
            }
            info!(map = %cfg.map, scenario = %cfg.scenario, seed = cfg.seed, "simulating match");
            let result = api::simulate_match(&cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for line in &result.log {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}
