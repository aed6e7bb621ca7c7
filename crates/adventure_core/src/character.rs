//! Character creation: name checks, attribute point allocation, starting
//! gold and the class suggestion shown on the character sheet.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::player::{Player, PlayerError};
use crate::rng::Dice;
use crate::rules::{check_range, RulesError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,
    #[error("name is too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("cannot allocate {requested} points, only {remaining} left")]
    Exceeds { requested: u32, remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationRules {
    pub total_points: u32,
    pub base_health: i32,
    pub base_mana: i32,
    pub health_per_point: i32,
    pub mana_per_point: i32,
    /// Inclusive `[min, max]` purse at the start of the adventure.
    pub starting_gold: [i32; 2],
    pub starting_potions: u32,
    pub max_name_len: usize,
}

impl Default for CreationRules {
    fn default() -> Self {
        Self {
            total_points: 20,
            base_health: 80,
            base_mana: 30,
            health_per_point: 5,
            mana_per_point: 3,
            starting_gold: [50, 100],
            starting_potions: 3,
            max_name_len: 20,
        }
    }
}

impl CreationRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        check_range("character.total_points", self.total_points.into(), 0.0..=1_000.0)?;
        check_range("character.base_health", self.base_health.into(), 1.0..=100_000.0)?;
        check_range("character.base_mana", self.base_mana.into(), 0.0..=100_000.0)?;
        check_range("character.health_per_point", self.health_per_point.into(), 0.0..=100.0)?;
        check_range("character.mana_per_point", self.mana_per_point.into(), 0.0..=100.0)?;
        let [low, high] = self.starting_gold;
        if low < 0 || low > high {
            return Err(RulesError::Invalid {
                field: "character.starting_gold",
                reason: format!("[{low}, {high}] is not a valid range"),
            });
        }
        if self.max_name_len == 0 {
            return Err(RulesError::Invalid {
                field: "character.max_name_len",
                reason: "must allow at least one character".into(),
            });
        }
        Ok(())
    }
}

/// Trims the name and checks its length in characters.
pub fn validate_name(raw: &str, max_len: usize) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    let len = name.chars().count();
    if len > max_len {
        return Err(NameError::TooLong { len, max: max_len });
    }
    Ok(name.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Health,
    Mana,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Health => f.write_str("Health"),
            Attribute::Mana => f.write_str("Mana"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributeAllocation {
    rules: CreationRules,
    health_points: u32,
    mana_points: u32,
}

impl AttributeAllocation {
    pub fn new(rules: CreationRules) -> Self {
        Self {
            rules,
            health_points: 0,
            mana_points: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.rules.total_points - self.health_points - self.mana_points
    }

    pub fn points(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Health => self.health_points,
            Attribute::Mana => self.mana_points,
        }
    }

    pub fn allocate(&mut self, attribute: Attribute, points: u32) -> Result<(), AllocationError> {
        let remaining = self.remaining();
        if points > remaining {
            return Err(AllocationError::Exceeds {
                requested: points,
                remaining,
            });
        }
        match attribute {
            Attribute::Health => self.health_points += points,
            Attribute::Mana => self.mana_points += points,
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.health_points = 0;
        self.mana_points = 0;
    }

    // Point totals are bounded by `total_points`, which validation caps well
    // inside `i32`.
    pub fn health(&self) -> i32 {
        self.rules.base_health + self.health_points as i32 * self.rules.health_per_point
    }

    pub fn mana(&self) -> i32 {
        self.rules.base_mana + self.mana_points as i32 * self.rules.mana_per_point
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Balanced,
}

impl CharacterClass {
    pub fn suggest(health: i32, mana: i32) -> Self {
        if health > 120 {
            CharacterClass::Warrior
        } else if mana > 45 {
            CharacterClass::Mage
        } else {
            CharacterClass::Balanced
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Balanced => "Balanced",
        };
        f.write_str(label)
    }
}

pub fn roll_starting_gold<D: Dice + ?Sized>(rules: &CreationRules, dice: &mut D) -> u32 {
    let [low, high] = rules.starting_gold;
    u32::try_from(dice.roll(low..=high)).unwrap_or(0)
}

/// Everything chosen during creation, ready to become a [`Player`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub health: i32,
    pub mana: i32,
    pub gold: u32,
    pub class: CharacterClass,
}

impl CharacterSheet {
    pub fn new(name: String, allocation: &AttributeAllocation, gold: u32) -> Self {
        let (health, mana) = (allocation.health(), allocation.mana());
        Self {
            name,
            health,
            mana,
            gold,
            class: CharacterClass::suggest(health, mana),
        }
    }

    pub fn into_player(self, starting_potions: u32) -> Result<Player, PlayerError> {
        let player = Player::new(self.name, self.health, self.mana)?
            .with_gold(self.gold)
            .with_potions(starting_potions);
        info!(
            target: "adventure_core.character",
            name = player.name(),
            health = player.max_health(),
            mana = player.max_mana(),
            gold = player.gold(),
            class = %self.class,
            "character created"
        );
        Ok(player)
    }
}
