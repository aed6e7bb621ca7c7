use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::Dice;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonsterError {
    #[error("monster name cannot be empty")]
    EmptyName,
    #[error("monster health must be positive, got {0}")]
    NonPositiveHealth(i32),
    #[error("damage range {min}..={max} is invalid")]
    InvalidDamage { min: i32, max: i32 },
    #[error("gold reward range {min}..={max} is invalid")]
    InvalidReward { min: i32, max: i32 },
}

/// The three stock monster templates, from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Goblin,
    Orc,
    Troll,
}

struct Template {
    health: i32,
    damage: RangeInclusive<i32>,
    gold_reward: RangeInclusive<i32>,
    experience: u32,
    weight: f64,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Goblin, Archetype::Orc, Archetype::Troll];

    fn template(self) -> Template {
        match self {
            Archetype::Goblin => Template {
                health: 30,
                damage: 3..=8,
                gold_reward: 10..=25,
                experience: 15,
                weight: 0.50,
            },
            Archetype::Orc => Template {
                health: 50,
                damage: 5..=12,
                gold_reward: 20..=40,
                experience: 30,
                weight: 0.35,
            },
            Archetype::Troll => Template {
                health: 80,
                damage: 8..=15,
                gold_reward: 40..=60,
                experience: 50,
                weight: 0.15,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Goblin => "Goblin",
            Archetype::Orc => "Orc",
            Archetype::Troll => "Troll",
        }
    }

    /// Encounter weight; the weights of [`Archetype::ALL`] sum to one.
    pub fn weight(self) -> f64 {
        self.template().weight
    }

    pub fn spawn(self) -> Monster {
        let Template {
            health,
            damage,
            gold_reward,
            experience,
            ..
        } = self.template();
        Monster {
            name: self.name().to_owned(),
            health,
            max_health: health,
            min_damage: *damage.start(),
            max_damage: *damage.end(),
            gold_reward: (*gold_reward.start(), *gold_reward.end()),
            experience,
        }
    }

    /// Weighted pick using a single unit draw against the cumulative weights.
    pub fn random<D: Dice + ?Sized>(dice: &mut D) -> Self {
        let draw = dice.unit();
        let mut cumulative = 0.0;
        for archetype in Self::ALL {
            cumulative += archetype.weight();
            if draw < cumulative {
                return archetype;
            }
        }
        Archetype::Troll
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single encounter's opponent. Built fresh per fight and dropped after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    name: String,
    health: i32,
    max_health: i32,
    min_damage: i32,
    max_damage: i32,
    gold_reward: (i32, i32),
    experience: u32,
}

impl Monster {
    pub fn new(
        name: impl Into<String>,
        max_health: i32,
        damage: RangeInclusive<i32>,
        gold_reward: RangeInclusive<i32>,
        experience: u32,
    ) -> Result<Self, MonsterError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MonsterError::EmptyName);
        }
        if max_health <= 0 {
            return Err(MonsterError::NonPositiveHealth(max_health));
        }
        let (min_damage, max_damage) = (*damage.start(), *damage.end());
        if min_damage < 0 || min_damage > max_damage {
            return Err(MonsterError::InvalidDamage {
                min: min_damage,
                max: max_damage,
            });
        }
        let (min_gold, max_gold) = (*gold_reward.start(), *gold_reward.end());
        if min_gold < 0 || min_gold > max_gold {
            return Err(MonsterError::InvalidReward {
                min: min_gold,
                max: max_gold,
            });
        }
        Ok(Self {
            name,
            health: max_health,
            max_health,
            min_damage,
            max_damage,
            gold_reward: (min_gold, max_gold),
            experience,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn displayed_health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn damage_range(&self) -> RangeInclusive<i32> {
        self.min_damage..=self.max_damage
    }

    pub fn gold_reward(&self) -> RangeInclusive<i32> {
        self.gold_reward.0..=self.gold_reward.1
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }
}
