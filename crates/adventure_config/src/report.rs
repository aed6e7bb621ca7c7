use std::fs;
use std::path::Path;

use adventure_core::{CombatReport, CombatState, Player};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Everything that happened in one run of the game, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub id: String,
    pub timestamp: String,
    pub seed: u64,
    pub player: Player,
    pub encounters: Vec<CombatReport>,
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn new(id: impl Into<String>, seed: u64, player: Player, encounters: Vec<CombatReport>) -> Self {
        let summary = summarize_encounters(&encounters);
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            seed,
            player,
            encounters,
            summary,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&data)
            .with_context(|| format!("{} is not a session report", path.display()))?;
        Ok(report)
    }
}

/// Default run id, e.g. `run-20260418T101500`.
pub fn default_run_id() -> String {
    format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S"))
}

fn summarize_encounters(encounters: &[CombatReport]) -> SessionSummary {
    let count = |state| encounters.iter().filter(|e| e.outcome == state).count() as u32;
    SessionSummary {
        victories: count(CombatState::PlayerWon),
        defeats: count(CombatState::PlayerLost),
        escapes: count(CombatState::PlayerFled),
        gold_earned: encounters
            .iter()
            .filter_map(|e| e.rewards)
            .map(|r| r.gold)
            .sum(),
        experience_earned: encounters
            .iter()
            .filter_map(|e| e.rewards)
            .map(|r| r.experience)
            .sum(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub victories: u32,
    pub defeats: u32,
    pub escapes: u32,
    pub gold_earned: u32,
    pub experience_earned: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::{Action, CombatResolver, CombatRules, Monster, ScriptedActions, ScriptedDice};

    fn fight(actions: &[Action], dice: ScriptedDice, player: &mut Player) -> CombatReport {
        let monster = Monster::new("Bat", 8, 2..=2, 5..=5, 4).unwrap();
        CombatResolver::new(CombatRules::default(), dice)
            .resolve(player, Some(monster), &mut ScriptedActions::new(actions.iter().copied()))
            .unwrap()
    }

    #[test]
    fn summary_counts_outcomes_and_rewards() {
        let mut player = Player::demo_hero();
        let won = fight(&[Action::Attack], ScriptedDice::new().with_rolls([9]), &mut player);
        let fled = fight(&[Action::Flee], ScriptedDice::new().with_units([0.0]), &mut player);
        let report = SessionReport::new("run-test", 42, player, vec![won, fled]);

        assert_eq!(
            SessionSummary {
                victories: 1,
                defeats: 0,
                escapes: 1,
                gold_earned: 5,
                experience_earned: 4,
            },
            report.summary
        );
        assert_eq!(105, report.player.gold());
    }

    #[test]
    fn report_survives_a_round_trip_on_disk() {
        let dir = std::env::temp_dir().join(format!("adventure-report-{}", std::process::id()));
        let path = dir.join("nested").join("session.json");
        let report = SessionReport::new("run-disk", 7, Player::demo_hero(), Vec::new());
        report.write_to(&path).unwrap();

        let loaded = SessionReport::read_from(&path).unwrap();
        assert_eq!("run-disk", loaded.id);
        assert_eq!(7, loaded.seed);
        assert_eq!(SessionSummary::default(), loaded.summary);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn run_ids_carry_a_timestamp() {
        let id = default_run_id();
        assert!(id.starts_with("run-"));
        assert_eq!("run-".len() + 15, id.len());
    }
}
