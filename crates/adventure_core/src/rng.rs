//! Randomness sources. Every random decision the rules make goes through
//! [`Dice`] so fights can be replayed from a seed or scripted in tests.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 42;

/// Environment variable consulted for a replay seed.
pub const SEED_ENV: &str = "ADVENTURE_SEED";

/// Unit draw returned by [`ScriptedDice`] once its queue is empty. It sits
/// above every configured probability, so it never crits and never flees.
const EXHAUSTED_UNIT: f64 = 0.999;

pub trait Dice {
    /// Uniform integer in the inclusive range.
    fn roll(&mut self, range: RangeInclusive<i32>) -> i32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, range: RangeInclusive<i32>) -> i32 {
        (**self).roll(range)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

/// Seeded [`StdRng`] that remembers its seed for replay.
#[derive(Clone, Debug)]
pub struct SimulationRng {
    seed: u64,
    rng: StdRng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks a fresh seed from OS entropy. The seed is still recorded so the
    /// session can be replayed later.
    pub fn from_entropy() -> Self {
        let seed = StdRng::from_entropy().gen();
        Self::new(seed)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var(SEED_ENV)
            .ok()
            .and_then(|val| val.trim().parse().ok())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SimulationRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Dice for SimulationRng {
    fn roll(&mut self, range: RangeInclusive<i32>) -> i32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.gen_range(range)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays queued values in order. Rolls are clamped into the requested
/// range; an empty queue yields the range minimum.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    units: VecDeque<f64>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn push_roll(&mut self, roll: i32) {
        self.rolls.push_back(roll);
    }

    pub fn push_unit(&mut self, unit: f64) {
        self.units.push_back(unit);
    }

    /// True once every queued value has been consumed.
    pub fn is_drained(&self) -> bool {
        self.rolls.is_empty() && self.units.is_empty()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, range: RangeInclusive<i32>) -> i32 {
        let (low, high) = (*range.start(), *range.end());
        match self.rolls.pop_front() {
            Some(value) if low <= high => value.clamp(low, high),
            _ => low,
        }
    }

    fn unit(&mut self) -> f64 {
        self.units
            .pop_front()
            .map(|value| value.clamp(0.0, EXHAUSTED_UNIT))
            .unwrap_or(EXHAUSTED_UNIT)
    }
}
