use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("player name cannot be empty")]
    EmptyName,
    #[error("max health must be positive, got {0}")]
    NonPositiveMaxHealth(i32),
    #[error("max mana cannot be negative, got {0}")]
    NegativeMaxMana(i32),
    #[error("health {health} must be between 1 and max health {max}")]
    HealthOutOfRange { health: i32, max: i32 },
}

/// The hero. Health is never clamped when damage lands, so it can sit below
/// zero once a fight is lost; use [`Player::displayed_health`] for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    health: i32,
    max_health: i32,
    mana: i32,
    max_mana: i32,
    gold: u32,
    experience: u32,
    health_potions: u32,
}

impl Player {
    /// Creates a player at full health and mana with an empty purse.
    pub fn new(name: impl Into<String>, max_health: i32, max_mana: i32) -> Result<Self, PlayerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlayerError::EmptyName);
        }
        if max_health <= 0 {
            return Err(PlayerError::NonPositiveMaxHealth(max_health));
        }
        if max_mana < 0 {
            return Err(PlayerError::NegativeMaxMana(max_mana));
        }
        Ok(Self {
            name,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            gold: 0,
            experience: 0,
            health_potions: 0,
        })
    }

    /// The stock hero used by the combat demo.
    pub fn demo_hero() -> Self {
        Self {
            name: "Hero".to_owned(),
            health: 100,
            max_health: 100,
            mana: 50,
            max_mana: 50,
            gold: 100,
            experience: 0,
            health_potions: 3,
        }
    }

    pub fn with_health(mut self, health: i32) -> Result<Self, PlayerError> {
        if health <= 0 || health > self.max_health {
            return Err(PlayerError::HealthOutOfRange {
                health,
                max: self.max_health,
            });
        }
        self.health = health;
        Ok(self)
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn with_potions(mut self, potions: u32) -> Self {
        self.health_potions = potions;
        self
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

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn max_mana(&self) -> i32 {
        self.max_mana
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn health_potions(&self) -> u32 {
        self.health_potions
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        debug!(target: "adventure_core.player", name = %self.name, amount, health = self.health, "player took damage");
    }

    /// Drinks one potion, healing at most `heal` without passing max health.
    /// Returns the amount restored, or `None` when the pack is empty.
    pub fn drink_potion(&mut self, heal: i32) -> Option<i32> {
        if self.health_potions == 0 {
            return None;
        }
        let restored = heal.min(self.max_health - self.health).max(0);
        self.health += restored;
        self.health_potions -= 1;
        debug!(
            target: "adventure_core.player",
            restored,
            health = self.health,
            potions_left = self.health_potions,
            "potion used"
        );
        Some(restored)
    }

    pub fn award(&mut self, gold: u32, experience: u32) {
        self.gold = self.gold.saturating_add(gold);
        self.experience = self.experience.saturating_add(experience);
        info!(target: "adventure_core.player", gold = self.gold, experience = self.experience, "rewards granted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_full() {
        let player = Player::new("Ayla", 120, 36).unwrap();
        assert_eq!(120, player.health());
        assert_eq!(36, player.mana());
        assert_eq!(0, player.gold());
        assert_eq!(0, player.health_potions());
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(Err(PlayerError::EmptyName), Player::new("  ", 10, 0));
        assert_eq!(Err(PlayerError::NonPositiveMaxHealth(0)), Player::new("x", 0, 0));
        assert_eq!(Err(PlayerError::NegativeMaxMana(-1)), Player::new("x", 10, -1));
        assert_eq!(
            Err(PlayerError::HealthOutOfRange { health: 11, max: 10 }),
            Player::new("x", 10, 0).and_then(|p| p.with_health(11))
        );
    }

    #[test]
    fn damage_is_not_clamped_but_display_is() {
        let mut player = Player::demo_hero().with_health(3).unwrap();
        player.take_damage(5);
        assert_eq!(-2, player.health());
        assert_eq!(0, player.displayed_health());
        assert!(player.is_defeated());
    }

    #[test]
    fn potion_never_overheals() {
        let mut player = Player::demo_hero().with_health(90).unwrap();
        assert_eq!(Some(10), player.drink_potion(30));
        assert_eq!(100, player.health());
        assert_eq!(2, player.health_potions());
    }

    #[test]
    fn empty_pack_has_no_effect() {
        let mut player = Player::demo_hero().with_potions(0).with_health(40).unwrap();
        assert_eq!(None, player.drink_potion(30));
        assert_eq!(40, player.health());
    }

    #[test]
    fn awards_accumulate() {
        let mut player = Player::demo_hero();
        player.award(12, 15);
        player.award(3, 30);
        assert_eq!(115, player.gold());
        assert_eq!(45, player.experience());
    }
}
