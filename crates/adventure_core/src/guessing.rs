//! The number-guessing warm-up.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::{parse_quantity, InputError};
use crate::rng::Dice;
use crate::rules::RulesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessingRules {
    pub min: u32,
    pub max: u32,
    pub secret: u32,
    /// Ignore `secret` and draw one from the dice instead.
    pub random_secret: bool,
    pub attempts: u32,
}

impl Default for GuessingRules {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            secret: 7,
            random_secret: false,
            attempts: 1,
        }
    }
}

impl GuessingRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min > self.max || self.max > i32::MAX as u32 {
            return Err(RulesError::Invalid {
                field: "guessing.max",
                reason: format!("{}..={} is not a valid range", self.min, self.max),
            });
        }
        if !self.random_secret && !(self.min..=self.max).contains(&self.secret) {
            return Err(RulesError::Invalid {
                field: "guessing.secret",
                reason: format!("{} is outside {}..={}", self.secret, self.min, self.max),
            });
        }
        if self.attempts == 0 {
            return Err(RulesError::Invalid {
                field: "guessing.attempts",
                reason: "at least one attempt is required".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    TooLow,
    TooHigh,
    Correct,
}

#[derive(Debug, Clone)]
pub struct GuessingGame {
    secret: u32,
    min: u32,
    max: u32,
    attempts_left: u32,
    solved: bool,
}

impl GuessingGame {
    /// Expects rules that passed [`GuessingRules::validate`].
    pub fn new<D: Dice + ?Sized>(rules: &GuessingRules, dice: &mut D) -> Self {
        let secret = if rules.random_secret {
            let rolled = dice.roll(rules.min as i32..=rules.max as i32);
            u32::try_from(rolled).unwrap_or(rules.min)
        } else {
            rules.secret
        };
        Self {
            secret,
            min: rules.min,
            max: rules.max,
            attempts_left: rules.attempts,
            solved: false,
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn secret(&self) -> u32 {
        self.secret
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn is_over(&self) -> bool {
        self.solved || self.attempts_left == 0
    }

    pub fn parse_guess(&self, text: &str) -> Result<u32, InputError> {
        parse_quantity(text, self.min..=self.max)
    }

    pub fn guess(&mut self, value: u32) -> Verdict {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        let verdict = match value.cmp(&self.secret) {
            Ordering::Less => Verdict::TooLow,
            Ordering::Greater => Verdict::TooHigh,
            Ordering::Equal => Verdict::Correct,
        };
        self.solved |= verdict == Verdict::Correct;
        debug!(target: "adventure_core.guessing", value, ?verdict, attempts_left = self.attempts_left, "guess");
        verdict
    }
}
