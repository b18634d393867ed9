use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::action::{Action, ActionResult};
use crate::ai;
use crate::character::Player;
use crate::content::new_match;
use crate::state::GameState;
use crate::Dice;

const DEFAULT_MAX_TURNS: u32 = 100;
// Guards against a strategy that never ends its turn.
const MAX_ACTIONS_PER_TURN: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MatchConfig {
    pub map: String,
    pub scenario: String,
    pub seed: u64,
    /// AI difficulty for player 0 and player 1, each 1..=3.
    pub difficulties: [u8; 2],
    pub max_turns: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            map: "default".to_string(),
            scenario: "skirmish".to_string(),
            seed: 0,
            difficulties: [2, 2],
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl MatchConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read match config: {}", path.display()))?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let cfg = if is_yaml {
            serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse match config YAML: {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse match config JSON: {}", path.display()))?
        };
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchResult {
    /// `None` when the turn limit ran out first.
    pub winner: Option<Player>,
    pub turns: u32,
    pub actions: u32,
    pub survivors: [usize; 2],
    pub log: Vec<String>,
    pub final_state: GameState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchStats {
    pub samples: u32,
    pub player0_wins: u32,
    pub player1_wins: u32,
    pub draws: u32,
    pub avg_turns: f64,
}

/// Play one AI-versus-AI match to a winner or the turn limit.
pub fn simulate_match(cfg: &MatchConfig) -> Result<MatchResult> {
    let state = new_match(&cfg.map, &cfg.scenario)
        .with_context(|| format!("failed to set up map '{}' with '{}'", cfg.map, cfg.scenario))?;
    play_out(state, cfg)
}

/// Continue an existing state under AI control.
pub fn play_out(mut state: GameState, cfg: &MatchConfig) -> Result<MatchResult> {
    let mut dice = Dice::from_seed(cfg.seed);
    let mut logs = Vec::new();
    let mut actions = 0u32;
    let mut actions_this_turn = 0u32;

    logs.push(format!(
        "[START] map={} scenario={} seed={} difficulty={}/{}",
        cfg.map, cfg.scenario, cfg.seed, cfg.difficulties[0], cfg.difficulties[1]
    ));
    logs.push(format!("[TURN] {}, turn {}", state.current_player, state.current_turn));

    while state.current_turn <= cfg.max_turns && !state.is_over() {
        let player = state.current_player;
        let difficulty = cfg.difficulties[player.index()];
        let action = if actions_this_turn >= MAX_ACTIONS_PER_TURN {
            forced_end_turn(&state)?
        } else {
            match ai::choose_action(&state, difficulty, &mut dice) {
                Some(action) => action,
                None => bail!("{} has no characters", player),
            }
        };

        let result = action.apply(&state, &mut dice);
        let result = if result.success {
            result
        } else {
            warn!(message = %result.message, "strategy proposed an illegal action; ending turn");
            logs.push(format!("[SKIP] {}: {}", player, result.message));
            let fallback = forced_end_turn(&state)?.apply(&state, &mut dice);
            if !fallback.success {
                bail!("could not end the turn for {}: {}", player, fallback.message);
            }
            fallback
        };

        actions += 1;
        actions_this_turn += 1;
        logs.extend(result.log);
        state = result.new_state;
        if state.current_player != player {
            actions_this_turn = 0;
        }
    }

    let winner = state.check_winner();
    let survivors = [
        state.living_characters(Player::Zero).count(),
        state.living_characters(Player::One).count(),
    ];
    let turns = state.current_turn.min(cfg.max_turns);
    logs.push(format!(
        "[END] winner={} turns={} actions={} survivors={}/{}",
        winner.map_or_else(|| "draw".to_string(), |p| p.to_string()),
        turns,
        actions,
        survivors[0],
        survivors[1]
    ));
    info!(?winner, turns, actions, "match finished");

    Ok(MatchResult {
        winner,
        turns,
        actions,
        survivors,
        log: logs,
        final_state: state,
    })
}

/// Run `samples` matches, the i-th seeded with `cfg.seed + i`.
pub fn simulate_many(cfg: &MatchConfig, samples: u32) -> Result<MatchStats> {
    let mut stats = MatchStats {
        samples,
        ..MatchStats::default()
    };
    let mut total_turns = 0u64;
    for i in 0..samples {
        let run = MatchConfig {
            seed: cfg.seed.wrapping_add(u64::from(i)),
            ..cfg.clone()
        };
        let result = simulate_match(&run)?;
        total_turns += u64::from(result.turns);
        match result.winner {
            Some(Player::Zero) => stats.player0_wins += 1,
            Some(Player::One) => stats.player1_wins += 1,
            None => stats.draws += 1,
        }
    }
    if samples > 0 {
        stats.avg_turns = total_turns as f64 / f64::from(samples);
    }
    Ok(stats)
}

/// Apply `actions` in order, stopping after the first failure.
pub fn run_operations(state: &GameState, actions: &[Action], dice: &mut Dice) -> Vec<ActionResult> {
    let mut results = Vec::with_capacity(actions.len());
    let mut current = state.clone();
    for action in actions {
        let result = action.apply(&current, dice);
        let failed = !result.success;
        current = result.new_state.clone();
        results.push(result);
        if failed {
            break;
        }
    }
    results
}

fn forced_end_turn(state: &GameState) -> Result<Action> {
    let character = state
        .player_characters(state.current_player)
        .next()
        .with_context(|| format!("{} has no characters", state.current_player))?;
    Ok(Action::EndTurn {
        character_id: character.id.clone(),
    })
}
