use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), RulesError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RulesError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Tunables for the combat loop. Defaults are the stock game values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    pub base_damage: i32,
    pub damage_variance: i32,
    pub critical_chance: f64,
    pub critical_multiplier: i32,
    pub flee_chance: f64,
    pub potion_heal: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            base_damage: 10,
            damage_variance: 3,
            critical_chance: 0.20,
            critical_multiplier: 2,
            flee_chance: 0.30,
            potion_heal: 30,
        }
    }
}

impl CombatRules {
    pub fn attack_range(&self) -> RangeInclusive<i32> {
        (self.base_damage - self.damage_variance)..=(self.base_damage + self.damage_variance)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        check_range("combat.base_damage", self.base_damage.into(), 0.0..=10_000.0)?;
        check_range(
            "combat.damage_variance",
            self.damage_variance.into(),
            0.0..=f64::from(self.base_damage),
        )?;
        check_range("combat.critical_chance", self.critical_chance, 0.0..=1.0)?;
        check_range(
            "combat.critical_multiplier",
            self.critical_multiplier.into(),
            1.0..=100.0,
        )?;
        check_range("combat.flee_chance", self.flee_chance, 0.0..=1.0)?;
        check_range("combat.potion_heal", self.potion_heal.into(), 0.0..=10_000.0)?;
        Ok(())
    }
}
