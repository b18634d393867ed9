use battl_engine::{
    Action, ActionError, ActionOutcome, AttackTarget, Battlefield, CharacterSpec, ClassId, Dice,
    ErrorKind, GameState, Player, Position,
};

fn spec(id: &str, class: ClassId, player: Player, x: i32, y: i32) -> CharacterSpec {
    CharacterSpec {
        id: id.into(),
        name: id.to_string(),
        class,
        player,
        position: Position::new(x, y),
        health: None,
    }
}

fn field(roster: Vec<CharacterSpec>) -> GameState {
    GameState::new(Battlefield::open(5, 5).unwrap(), roster).unwrap()
}

fn fighter_vs_ranger() -> GameState {
    field(vec![
        spec("fighter", ClassId::Fighter, Player::Zero, 1, 1),
        spec("ranger", ClassId::Ranger, Player::One, 3, 3),
    ])
}

fn mv(id: &str, x: i32, y: i32) -> Action {
    Action::Move {
        character_id: id.into(),
        target_position: Position::new(x, y),
    }
}

fn shoot(id: &str, target: &str, ability_index: usize) -> Action {
    Action::Attack {
        character_id: id.into(),
        target: AttackTarget::Character(target.into()),
        ability_index,
    }
}

fn end_turn(id: &str) -> Action {
    Action::EndTurn {
        character_id: id.into(),
    }
}

#[test]
fn move_then_end_turn() {
    let mut dice = Dice::from_seed(1);
    let state = fighter_vs_ranger();

    let moved = mv("fighter", 2, 2).apply(&state, &mut dice);
    assert!(moved.success, "{}", moved.message);
    assert_eq!(moved.message, "Move successful");
    let fighter = moved.new_state.character(&"fighter".into()).unwrap();
    assert_eq!(fighter.position, Position::new(2, 2));
    assert!(fighter.has_moved);
    assert_eq!(
        moved.outcome,
        Some(ActionOutcome::Moved {
            from: Position::new(1, 1),
            to: Position::new(2, 2)
        })
    );

    let far = mv("fighter", 10, 10).apply(&moved.new_state, &mut dice);
    assert!(!far.success);
    assert_eq!(far.new_state, moved.new_state);
    assert_eq!(far.error.as_ref().map(ActionError::kind), Some(ErrorKind::IllegalMove));

    let ended = end_turn("fighter").apply(&moved.new_state, &mut dice);
    assert!(ended.success);
    assert_eq!(ended.message, "Player 2's turn");
    let next = &ended.new_state;
    assert_eq!(next.current_player, Player::One);
    assert!(next.character(&"fighter".into()).unwrap().has_moved);
    let ranger = next.character(&"ranger".into()).unwrap();
    assert!(!ranger.has_moved && !ranger.has_attacked);
}

#[test]
fn rejected_moves_leave_state_untouched() {
    let mut dice = Dice::from_seed(1);
    let state = fighter_vs_ranger();
    let cases = [
        (mv("fighter", 10, 10), ErrorKind::IllegalMove),
        (mv("fighter", 3, 3), ErrorKind::IllegalMove),
        (mv("fighter", 1, 1), ErrorKind::IllegalMove),
        (mv("ranger", 3, 2), ErrorKind::InvalidActor),
        (mv("nobody", 0, 0), ErrorKind::InvalidActor),
    ];
    for (action, kind) in cases {
        let result = action.apply(&state, &mut dice);
        assert!(!result.success, "{action:?}");
        assert_eq!(result.new_state, state);
        assert!(result.log.is_empty());
        assert_eq!(result.error.map(|e| e.kind()), Some(kind), "{action:?}");
    }
}

#[test]
fn second_move_in_a_turn_is_rejected() {
    let mut dice = Dice::from_seed(1);
    let state = fighter_vs_ranger();
    let once = mv("fighter", 2, 1).apply(&state, &mut dice);
    let twice = mv("fighter", 2, 2).apply(&once.new_state, &mut dice);
    assert!(once.success);
    assert!(!twice.success);
}

#[test]
fn quick_shot_hits_and_spends_only_the_standard_action() {
    let mut state = fighter_vs_ranger();
    state.current_player = Player::One;
    let mut dice = Dice::from_scripted(vec![18]);

    let result = shoot("ranger", "fighter", 0).apply(&state, &mut dice);
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Hit! 4 damage dealt");
    assert_eq!(result.new_state.character(&"fighter".into()).unwrap().health, 26);
    let ranger = result.new_state.character(&"ranger".into()).unwrap();
    assert!(ranger.has_attacked);
    assert!(!ranger.has_moved);
    assert!(!ranger.has_completed_turn());

    let again = shoot("ranger", "fighter", 0).apply(&result.new_state, &mut dice);
    assert_eq!(again.error, Some(ActionError::AlreadyAttacked("ranger".into())));
}

#[test]
fn aimed_shot_allows_a_save_and_spends_the_move() {
    let mut state = fighter_vs_ranger();
    state.current_player = Player::One;
    let mut dice = Dice::from_scripted(vec![18, 20]);

    let result = shoot("ranger", "fighter", 1).apply(&state, &mut dice);
    assert!(result.success);
    assert_eq!(result.message, "Hit! 4 damage dealt (save for half damage)");
    let ranger = result.new_state.character(&"ranger".into()).unwrap();
    assert!(ranger.has_attacked && ranger.has_moved);
    assert!(ranger.has_completed_turn());
}

#[test]
fn miss_is_reported() {
    let mut state = fighter_vs_ranger();
    state.current_player = Player::One;
    let mut dice = Dice::from_scripted(vec![1]);
    let result = shoot("ranger", "fighter", 0).apply(&state, &mut dice);
    assert!(result.success);
    assert_eq!(result.message, "Miss!");
    assert_eq!(result.new_state.character(&"fighter".into()).unwrap().health, 30);
}

#[test]
fn defeating_the_last_enemy_ends_the_match() {
    let mut roster = vec![
        spec("fighter", ClassId::Fighter, Player::Zero, 1, 1),
        spec("ranger", ClassId::Ranger, Player::One, 3, 3),
    ];
    roster[0].health = Some(4);
    let mut state = field(roster);
    state.current_player = Player::One;
    let mut dice = Dice::from_scripted(vec![18]);

    let result = shoot("ranger", "fighter", 0).apply(&state, &mut dice);
    assert_eq!(result.message, "Hit! 4 damage dealt - fighter defeated!");
    assert_eq!(result.new_state.check_winner(), Some(Player::One));
    assert_eq!(result.log.last().map(String::as_str), Some("[END] Player 2 wins"));

    let after = end_turn("ranger").apply(&result.new_state, &mut dice);
    assert_eq!(after.error, Some(ActionError::MatchOver));
}

fn blast_field() -> GameState {
    field(vec![
        spec("mage", ClassId::Mage, Player::Zero, 0, 0),
        spec("fighter2", ClassId::Fighter, Player::One, 2, 2),
        spec("ranger2", ClassId::Ranger, Player::One, 3, 2),
        spec("fighter1", ClassId::Fighter, Player::Zero, 2, 3),
    ])
}

#[test]
fn fire_blast_hits_every_enemy_in_the_radius() {
    let state = blast_field();
    // fighter2: hit, failed save; ranger2: hit, passed save.
    let mut dice = Dice::from_scripted(vec![10, 2, 10, 19]);
    let action = Action::Attack {
        character_id: "mage".into(),
        target: AttackTarget::Cell(Position::new(2, 2)),
        ability_index: 1,
    };
    let result = action.apply(&state, &mut dice);
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Hit! 11 damage dealt (save for half damage)");

    let next = &result.new_state;
    assert_eq!(next.character(&"fighter2".into()).unwrap().health, 22);
    assert_eq!(next.character(&"ranger2".into()).unwrap().health, 22);
    assert_eq!(next.character(&"fighter1".into()).unwrap().health, 30);
    let mage = next.character(&"mage".into()).unwrap();
    assert!(mage.has_attacked && mage.has_moved);

    let Some(ActionOutcome::Ability(outcome)) = result.outcome else {
        panic!("expected an ability outcome");
    };
    assert_eq!(outcome.reports.len(), 2);
    assert_eq!(outcome.center, Position::new(2, 2));
}

#[test]
fn area_aimed_at_a_character_centres_on_their_cell() {
    let state = blast_field();
    let mut dice = Dice::from_scripted(vec![10, 2, 10, 19]);
    let action = Action::Attack {
        character_id: "mage".into(),
        target: AttackTarget::Character("fighter2".into()),
        ability_index: 1,
    };
    let result = action.apply(&state, &mut dice);
    assert!(result.success);
    assert_eq!(result.message, "Hit! 11 damage dealt (save for half damage)");
}

#[test]
fn empty_area_still_spends_the_actions() {
    let state = blast_field();
    let mut dice = Dice::from_seed(3);
    let action = Action::Attack {
        character_id: "mage".into(),
        target: AttackTarget::Cell(Position::new(0, 4)),
        ability_index: 1,
    };
    let result = action.apply(&state, &mut dice);
    assert!(result.success);
    assert_eq!(result.message, "No targets in the area");
    let mage = result.new_state.character(&"mage".into()).unwrap();
    assert!(mage.has_attacked && mage.has_moved);
}

#[test]
fn single_target_needs_an_enemy_in_range() {
    let state = blast_field();
    let mut dice = Dice::from_seed(3);
    let cases = [
        Action::Attack {
            character_id: "mage".into(),
            target: AttackTarget::Cell(Position::new(0, 4)),
            ability_index: 0,
        },
        Action::Attack {
            character_id: "mage".into(),
            target: AttackTarget::Character("fighter1".into()),
            ability_index: 0,
        },
        Action::Attack {
            character_id: "mage".into(),
            target: AttackTarget::Character("fighter2".into()),
            ability_index: 4,
        },
    ];
    for action in cases {
        let result = action.apply(&state, &mut dice);
        assert!(!result.success, "{action:?}");
        assert_eq!(result.new_state, state);
        assert_eq!(result.error.map(|e| e.kind()), Some(ErrorKind::IllegalAttack));
    }
}

#[test]
fn validate_agrees_with_apply() {
    let state = blast_field();
    let ok = Action::Attack {
        character_id: "mage".into(),
        target: AttackTarget::Character("fighter2".into()),
        ability_index: 0,
    };
    assert_eq!(ok.validate(&state), Ok(()));
    assert!(mv("mage", 4, 4).validate(&state).is_err());
    assert_eq!(
        end_turn("fighter2").validate(&state),
        Err(ActionError::NotYourTurn("fighter2".into()))
    );
}

#[test]
fn actions_decode_from_json() {
    let action = Action::from_json(
        r#"{"type":"attack","character_id":"mage","target":{"cell":{"x":2,"y":2}},"ability_index":1}"#,
    )
    .unwrap();
    assert_eq!(
        action,
        Action::Attack {
            character_id: "mage".into(),
            target: AttackTarget::Cell(Position::new(2, 2)),
            ability_index: 1,
        }
    );

    let shot = Action::from_json(
        r#"{"type":"attack","character_id":"ranger","target":{"character":"mage2"}}"#,
    )
    .unwrap();
    assert_eq!(shot, shoot("ranger", "mage2", 0));

    let unknown = Action::from_json(r#"{"type":"teleport","character_id":"mage"}"#).unwrap_err();
    assert_eq!(unknown, ActionError::InvalidActionType("teleport".to_string()));
    assert_eq!(unknown.kind(), ErrorKind::InvalidActionType);

    let malformed = Action::from_json(r#"{"type":"move"}"#).unwrap_err();
    assert!(matches!(malformed, ActionError::MalformedAction(_)));
    assert_eq!(malformed.kind(), ErrorKind::InvalidActionType);
}

#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[test]
fn validating_an_attack_resolves_nothing() {
    let mut state = fighter_vs_ranger();
    state.current_player = Player::One;
    let aimed = shoot("ranger", "fighter", 1);

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        assert_eq!(aimed.validate(&state), Ok(()));
    });
    assert!(!captured.text().contains("ability resolved"), "{}", captured.text());

    let (ability, option) = battl_engine::combat::plan_ability(
        &state,
        &"ranger".into(),
        1,
        &AttackTarget::Character("fighter".into()),
    )
    .unwrap();
    assert_eq!(ability.display_name, "Aimed Shot");
    assert_eq!(option.position, Position::new(1, 1));
    assert_eq!(option.target_id, Some("fighter".into()));

    // The same scripted rolls give the same outcome whether or not the
    // action was validated first.
    let plain = aimed.apply(&state, &mut Dice::from_scripted(vec![18, 20]));
    let validated = {
        let mut dice = Dice::from_scripted(vec![18, 20]);
        assert!(aimed.validate(&state).is_ok());
        aimed.apply(&state, &mut dice)
    };
    assert!(plain.success);
    assert_eq!(plain.message, validated.message);
    assert_eq!(plain.new_state, validated.new_state);

    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        assert!(aimed.apply(&state, &mut Dice::from_scripted(vec![18, 20])).success);
    });
    assert!(captured.text().contains("ability resolved"));
}
