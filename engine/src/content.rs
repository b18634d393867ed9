use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::battlefield::MapDefinition;
use crate::character::CharacterSpec;
use crate::error::ContentError;
use crate::state::GameState;

/// Starting roster for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub roster: Vec<CharacterSpec>,
}

pub fn builtin_maps() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("default", include_str!("../content/maps/default.yaml")),
        ("small_arena", include_str!("../content/maps/small_arena.yaml")),
        ("river_crossing", include_str!("../content/maps/river_crossing.yaml")),
    ])
}

pub fn builtin_scenarios() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("skirmish", include_str!("../content/scenarios/skirmish.json")),
        ("duel", include_str!("../content/scenarios/duel.json")),
    ])
}

pub fn parse_map(yaml: &str) -> Result<MapDefinition, ContentError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn parse_scenario(json: &str) -> Result<Scenario, ContentError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_map(id: &str) -> Result<MapDefinition, ContentError> {
    let text = builtin_maps()
        .get(id)
        .copied()
        .ok_or_else(|| ContentError::UnknownMap(id.to_string()))?;
    parse_map(text)
}

pub fn load_scenario(id: &str) -> Result<Scenario, ContentError> {
    let text = builtin_scenarios()
        .get(id)
        .copied()
        .ok_or_else(|| ContentError::UnknownScenario(id.to_string()))?;
    parse_scenario(text)
}

/// Fresh match state for a built-in map and scenario.
pub fn new_match(map_id: &str, scenario_id: &str) -> Result<GameState, ContentError> {
    let map = load_map(map_id)?;
    let scenario = load_scenario(scenario_id)?;
    GameState::new(map.to_battlefield()?, scenario.roster)
}
