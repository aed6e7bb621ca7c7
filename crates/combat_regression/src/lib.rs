//! Helpers for deterministic combat regression tests.

use adventure_core::{
    Action, Archetype, CombatError, CombatReport, CombatResolver, CombatRules, Player,
    ScriptedActions, SimulationRng,
};
use serde_json::json;

pub const DEFAULT_SEED: u64 = 42;

/// Enough swings to finish any stock fight against the demo hero.
const MAX_TURNS: usize = 64;

/// Demo hero attacks `archetype` every turn until one side falls.
pub fn seeded_encounter(seed: u64, archetype: Archetype) -> Result<CombatReport, CombatError> {
    let mut player = Player::demo_hero();
    let mut actions = ScriptedActions::new([Action::Attack; MAX_TURNS]);
    CombatResolver::new(CombatRules::default(), SimulationRng::new(seed))
        .resolve(&mut player, Some(archetype.spawn()), &mut actions)
}

/// Compact trace of a seeded goblin fight: per-turn damage and the outcome.
pub fn sample_encounter(seed: u64) -> Result<serde_json::Value, CombatError> {
    let report = seeded_encounter(seed, Archetype::Goblin)?;
    let blows: Vec<_> = report
        .log
        .iter()
        .map(|record| {
            json!({
                "turn": record.turn,
                "player_health": record.player_health,
                "monster_health": record.monster_health,
            })
        })
        .collect();
    Ok(json!({
        "seed": seed,
        "outcome": report.outcome,
        "turns": report.turns,
        "damage_dealt": report.damage_dealt,
        "damage_taken": report.damage_taken,
        "blows": blows,
    }))
}
