use battl_engine::api::{run_operations, simulate_many, simulate_match, MatchConfig};
use battl_engine::content::new_match;
use battl_engine::{Action, Dice, Player, Position};

fn duel(seed: u64) -> MatchConfig {
    MatchConfig {
        scenario: "duel".to_string(),
        map: "small_arena".to_string(),
        seed,
        ..MatchConfig::default()
    }
}

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn defaults() {
    let cfg = MatchConfig::default();
    assert_eq!(cfg.map, "default");
    assert_eq!(cfg.scenario, "skirmish");
    assert_eq!(cfg.difficulties, [2, 2]);
    assert_eq!(cfg.max_turns, 100);
}

#[test]
fn match_runs_to_an_end() {
    init_logs();
    let result = simulate_match(&duel(2025)).unwrap();
    assert!(result.turns >= 1 && result.turns <= 100);
    assert!(result.actions > 0);
    assert_eq!(result.winner, result.final_state.check_winner());
    assert!(result.log.first().unwrap().starts_with("[START]"));
    assert!(result.log.last().unwrap().starts_with("[END]"));
    match result.winner {
        Some(Player::Zero) => assert_eq!(result.survivors[1], 0),
        Some(Player::One) => assert_eq!(result.survivors[0], 0),
        None => assert!(result.survivors.iter().all(|&n| n > 0)),
    }
}

#[test]
fn same_seed_same_match() {
    let a = simulate_match(&duel(9)).unwrap();
    let b = simulate_match(&duel(9)).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.final_state, b.final_state);
}

#[test]
fn turn_limit_is_respected() {
    let cfg = MatchConfig {
        max_turns: 1,
        ..MatchConfig::default()
    };
    let result = simulate_match(&cfg).unwrap();
    assert!(result.turns <= 1);
    if result.winner.is_none() {
        assert_eq!(result.final_state.current_turn, 2);
    }
}

#[test]
fn unknown_map_is_an_error() {
    let cfg = MatchConfig {
        map: "moon".to_string(),
        ..MatchConfig::default()
    };
    assert!(simulate_match(&cfg).is_err());
}

#[test]
fn many_matches_are_tallied() {
    let stats = simulate_many(&duel(100), 5).unwrap();
    assert_eq!(stats.samples, 5);
    assert_eq!(stats.player0_wins + stats.player1_wins + stats.draws, 5);
    assert!(stats.avg_turns >= 1.0);
}

#[test]
fn operations_stop_at_the_first_failure() {
    let state = new_match("default", "skirmish").unwrap();
    let actions = vec![
        Action::Move {
            character_id: "mage1".into(),
            target_position: Position::new(2, 4),
        },
        Action::Move {
            character_id: "mage1".into(),
            target_position: Position::new(2, 5),
        },
        Action::EndTurn {
            character_id: "mage1".into(),
        },
    ];
    let results = run_operations(&state, &actions, &mut Dice::from_seed(1));
    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].new_state, results[0].new_state);
}

#[test]
fn config_loads_from_yaml_and_json() {
    let dir = std::env::temp_dir();
    let yaml = dir.join(format!("battl-match-{}.yaml", std::process::id()));
    std::fs::write(&yaml, "scenario: duel\nseed: 9\ndifficulties: [3, 1]\n").unwrap();
    let cfg = MatchConfig::from_path(&yaml).unwrap();
    assert_eq!(cfg.scenario, "duel");
    assert_eq!(cfg.seed, 9);
    assert_eq!(cfg.difficulties, [3, 1]);
    assert_eq!(cfg.map, "default");

    let json = dir.join(format!("battl-match-{}.json", std::process::id()));
    std::fs::write(&json, r#"{"map":"river_crossing","max_turns":20}"#).unwrap();
    let cfg = MatchConfig::from_path(&json).unwrap();
    assert_eq!(cfg.map, "river_crossing");
    assert_eq!(cfg.max_turns, 20);
    assert_eq!(cfg.scenario, "skirmish");

    std::fs::remove_file(yaml).ok();
    std::fs::remove_file(json).ok();
    assert!(MatchConfig::from_path(dir.join("battl-missing.json")).is_err());
}
