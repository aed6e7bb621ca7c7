//! Core rules for the text adventure: character creation, turn-based combat
//! and the number-guessing warm-up. Console I/O lives in the CLI crate.

pub mod character;
pub mod combat;
pub mod guessing;
pub mod input;
pub mod monster;
pub mod player;
pub mod rng;
pub mod rules;

pub use character::{
    validate_name, Attribute, AttributeAllocation, CharacterClass, CharacterSheet, CreationRules,
};
pub use combat::{
    Action, ActionEffect, ActionSource, CombatError, CombatReport, CombatResolver, CombatState,
    MonsterStrike, Rewards, ScriptedActions, TurnRecord, TurnView,
};
pub use guessing::{GuessingGame, GuessingRules, Verdict};
pub use monster::{Archetype, Monster};
pub use player::Player;
pub use rng::{Dice, ScriptedDice, SimulationRng};
pub use rules::{CombatRules, RulesError};
