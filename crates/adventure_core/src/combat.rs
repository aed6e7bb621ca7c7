//! Turn-based combat between the player and a single monster.
//!
//! A turn is the player's action followed, unless the fight ends first, by
//! the monster's attack. The loop runs until the monster falls, the player
//! falls, or the player escapes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::monster::{Archetype, Monster};
use crate::player::Player;
use crate::rng::Dice;
use crate::rules::CombatRules;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("{0} is too wounded to fight")]
    PlayerDefeated(String),
    #[error("{0} is already slain")]
    MonsterDefeated(String),
    #[error("no action supplied for turn {turn}")]
    ActionsExhausted { turn: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    Defend,
    Potion,
    Flee,
    /// Anything that is not a menu entry. Costs the turn.
    Hesitate,
}

impl Action {
    pub const MENU: [Action; 4] = [Action::Attack, Action::Defend, Action::Potion, Action::Flee];

    /// Maps a menu choice (`1`-`4`) to an action.
    pub fn from_choice(input: &str) -> Self {
        match input.trim() {
            "1" => Action::Attack,
            "2" => Action::Defend,
            "3" => Action::Potion,
            "4" => Action::Flee,
            _ => Action::Hesitate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Attack => "Attack",
            Action::Defend => "Defend",
            Action::Potion => "Use Potion",
            Action::Flee => "Try to Flee",
            Action::Hesitate => "Hesitate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    Ongoing,
    PlayerWon,
    PlayerLost,
    PlayerFled,
}

impl CombatState {
    pub fn is_terminal(self) -> bool {
        self != CombatState::Ongoing
    }
}

/// What the player's action did this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEffect {
    Hit { damage: i32, critical: bool },
    Braced,
    Healed { amount: i32, potions_left: u32 },
    NoPotion,
    Escaped,
    EscapeBlocked,
    Hesitated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStrike {
    pub rolled: i32,
    pub applied: i32,
    pub defended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub action: Action,
    pub effect: ActionEffect,
    pub strike: Option<MonsterStrike>,
    pub player_health: i32,
    pub monster_health: i32,
    pub state: CombatState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub gold: u32,
    pub experience: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub monster: Monster,
    pub outcome: CombatState,
    pub turns: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
    pub rewards: Option<Rewards>,
    pub log: Vec<TurnRecord>,
}

impl CombatReport {
    pub fn victory(&self) -> bool {
        self.outcome == CombatState::PlayerWon
    }

    /// Average damage dealt per turn, reported for victories only.
    pub fn damage_per_turn(&self) -> Option<f64> {
        if !self.victory() || self.turns == 0 {
            return None;
        }
        Some(f64::from(self.damage_dealt) / f64::from(self.turns))
    }
}

/// Read-only snapshot handed to the action source before each turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub turn: u32,
    pub player: &'a Player,
    pub monster: &'a Monster,
}

/// Supplies the player's decisions. Returning `None` means no further input
/// will arrive and the fight is abandoned.
pub trait ActionSource {
    fn next_action(&mut self, view: &TurnView<'_>) -> Option<Action>;

    /// Called once per resolved turn, after both sides have acted.
    fn turn_resolved(&mut self, _record: &TurnRecord) {}
}

impl<S: ActionSource + ?Sized> ActionSource for &mut S {
    fn next_action(&mut self, view: &TurnView<'_>) -> Option<Action> {
        (**self).next_action(view)
    }

    fn turn_resolved(&mut self, record: &TurnRecord) {
        (**self).turn_resolved(record)
    }
}

/// Replays a fixed list of actions, for non-interactive runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedActions {
    actions: VecDeque<Action>,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Parses menu choices separated by commas or whitespace, e.g. `"1,1,2 3"`.
    pub fn from_choices(choices: &str) -> Self {
        Self::new(
            choices
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(Action::from_choice),
        )
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionSource for ScriptedActions {
    fn next_action(&mut self, _view: &TurnView<'_>) -> Option<Action> {
        self.actions.pop_front()
    }
}

pub struct CombatResolver<D> {
    rules: CombatRules,
    dice: D,
}

impl<D: Dice> CombatResolver<D> {
    pub fn new(rules: CombatRules, dice: D) -> Self {
        Self { rules, dice }
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    pub fn into_dice(self) -> D {
        self.dice
    }

    /// Fights `monster`, or a weighted random archetype when none is given.
    /// The player is updated in place, including rewards on victory.
    pub fn resolve<S: ActionSource + ?Sized>(
        &mut self,
        player: &mut Player,
        monster: Option<Monster>,
        actions: &mut S,
    ) -> Result<CombatReport, CombatError> {
        if player.is_defeated() {
            return Err(CombatError::PlayerDefeated(player.name().to_owned()));
        }
        let mut monster = match monster {
            Some(monster) => monster,
            None => Archetype::random(&mut self.dice).spawn(),
        };
        if monster.is_defeated() {
            return Err(CombatError::MonsterDefeated(monster.name().to_owned()));
        }

        info!(
            target: "adventure_core.combat",
            player = player.name(),
            monster = monster.name(),
            "combat started"
        );

        let mut state = CombatState::Ongoing;
        let mut turns = 0u32;
        let mut damage_dealt = 0;
        let mut damage_taken = 0;
        let mut log = Vec::new();

        while state == CombatState::Ongoing {
            turns += 1;
            let view = TurnView {
                turn: turns,
                player: &*player,
                monster: &monster,
            };
            let Some(action) = actions.next_action(&view) else {
                warn!(target: "adventure_core.combat", turn = turns, "action source ran dry");
                return Err(CombatError::ActionsExhausted { turn: turns });
            };

            let effect = self.player_acts(action, player, &mut monster);
            if let ActionEffect::Hit { damage, .. } = effect {
                damage_dealt += damage;
            }

            let mut strike = None;
            if effect == ActionEffect::Escaped {
                state = CombatState::PlayerFled;
            } else if monster.is_defeated() {
                state = CombatState::PlayerWon;
            } else {
                let hit = self.monster_strike(&monster, effect == ActionEffect::Braced);
                player.take_damage(hit.applied);
                damage_taken += hit.applied;
                strike = Some(hit);
                if player.is_defeated() {
                    state = CombatState::PlayerLost;
                }
            }

            let record = TurnRecord {
                turn: turns,
                action,
                effect,
                strike,
                player_health: player.health(),
                monster_health: monster.health(),
                state,
            };
            debug!(target: "adventure_core.combat", ?record, "turn resolved");
            actions.turn_resolved(&record);
            log.push(record);
        }

        let rewards = if state == CombatState::PlayerWon {
            let gold = u32::try_from(self.dice.roll(monster.gold_reward())).unwrap_or(0);
            let experience = monster.experience();
            player.award(gold, experience);
            Some(Rewards { gold, experience })
        } else {
            None
        };

        info!(
            target: "adventure_core.combat",
            outcome = ?state,
            turns,
            damage_dealt,
            damage_taken,
            "combat finished"
        );

        Ok(CombatReport {
            monster,
            outcome: state,
            turns,
            damage_dealt,
            damage_taken,
            rewards,
            log,
        })
    }

    fn player_acts(&mut self, action: Action, player: &mut Player, monster: &mut Monster) -> ActionEffect {
        match action {
            Action::Attack => {
                let mut damage = self.dice.roll(self.rules.attack_range());
                let critical = self.dice.chance(self.rules.critical_chance);
                if critical {
                    damage *= self.rules.critical_multiplier;
                }
                monster.take_damage(damage);
                ActionEffect::Hit { damage, critical }
            }
            Action::Defend => ActionEffect::Braced,
            Action::Potion => match player.drink_potion(self.rules.potion_heal) {
                Some(amount) => ActionEffect::Healed {
                    amount,
                    potions_left: player.health_potions(),
                },
                None => ActionEffect::NoPotion,
            },
            Action::Flee => {
                if self.dice.chance(self.rules.flee_chance) {
                    ActionEffect::Escaped
                } else {
                    ActionEffect::EscapeBlocked
                }
            }
            Action::Hesitate => ActionEffect::Hesitated,
        }
    }

    fn monster_strike(&mut self, monster: &Monster, defended: bool) -> MonsterStrike {
        let rolled = self.dice.roll(monster.damage_range());
        let applied = if defended { rolled / 2 } else { rolled };
        MonsterStrike {
            rolled,
            applied,
            defended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedDice;

    fn practice_dummy(health: i32, damage: i32) -> Monster {
        Monster::new("Dummy", health, damage..=damage, 4..=9, 7).unwrap()
    }

    fn resolver(dice: ScriptedDice) -> CombatResolver<ScriptedDice> {
        CombatResolver::new(CombatRules::default(), dice)
    }

    #[test]
    fn menu_choices_map_to_actions() {
        assert_eq!(Action::Attack, Action::from_choice(" 1 "));
        assert_eq!(Action::Flee, Action::from_choice("4"));
        assert_eq!(Action::Hesitate, Action::from_choice("attack"));
        assert_eq!(Action::Hesitate, Action::from_choice(""));
    }

    #[test]
    fn scripted_choices_parse_mixed_separators() {
        let mut actions = ScriptedActions::from_choices("1,2 3,,9");
        assert_eq!(4, actions.remaining());
        let player = Player::demo_hero();
        let monster = practice_dummy(5, 0);
        let view = TurnView {
            turn: 1,
            player: &player,
            monster: &monster,
        };
        let got: Vec<_> = std::iter::from_fn(|| actions.next_action(&view)).collect();
        assert_eq!(
            vec![Action::Attack, Action::Defend, Action::Potion, Action::Hesitate],
            got
        );
    }

    #[test]
    fn one_blow_victory_skips_the_monster_turn() {
        let dice = ScriptedDice::new().with_rolls([10, 6]).with_units([0.5]);
        let mut player = Player::demo_hero();
        let mut actions = ScriptedActions::new([Action::Attack]);
        let report = resolver(dice)
            .resolve(&mut player, Some(practice_dummy(5, 0)), &mut actions)
            .unwrap();

        assert!(report.victory());
        assert_eq!(1, report.turns);
        assert_eq!(10, report.damage_dealt);
        assert_eq!(0, report.damage_taken);
        assert_eq!(-5, report.monster.health());
        assert_eq!(None, report.log[0].strike);
        assert_eq!(Some(Rewards { gold: 6, experience: 7 }), report.rewards);
        assert_eq!(106, player.gold());
        assert_eq!(7, player.experience());
        assert_eq!(Some(10.0), report.damage_per_turn());
    }

    #[test]
    fn critical_hit_doubles_damage() {
        let dice = ScriptedDice::new().with_rolls([13]).with_units([0.1]);
        let mut player = Player::demo_hero();
        let report = resolver(dice)
            .resolve(
                &mut player,
                Some(practice_dummy(26, 0)),
                &mut ScriptedActions::new([Action::Attack]),
            )
            .unwrap();
        assert_eq!(
            ActionEffect::Hit {
                damage: 26,
                critical: true
            },
            report.log[0].effect
        );
        assert!(report.victory());
    }

    #[test]
    fn defending_halves_with_floor_and_can_still_lose() {
        let mut player = Player::demo_hero().with_health(1).unwrap();
        let report = resolver(ScriptedDice::new())
            .resolve(
                &mut player,
                Some(practice_dummy(40, 5)),
                &mut ScriptedActions::new([Action::Defend]),
            )
            .unwrap();

        assert_eq!(CombatState::PlayerLost, report.outcome);
        assert_eq!(
            Some(MonsterStrike {
                rolled: 5,
                applied: 2,
                defended: true
            }),
            report.log[0].strike
        );
        assert_eq!(-1, player.health());
        assert_eq!(0, player.displayed_health());
        assert_eq!(None, report.rewards);
        assert_eq!(None, report.damage_per_turn());
    }

    #[test]
    fn defending_lasts_a_single_turn() {
        let mut player = Player::demo_hero();
        let err = resolver(ScriptedDice::new())
            .resolve(
                &mut player,
                Some(practice_dummy(40, 7)),
                &mut ScriptedActions::new([Action::Defend, Action::Hesitate]),
            )
            .unwrap_err();
        assert_eq!(CombatError::ActionsExhausted { turn: 3 }, err);
        assert_eq!(100 - 3 - 7, player.health());
    }

    #[test]
    fn successful_flee_ends_without_counter_attack() {
        let dice = ScriptedDice::new().with_units([0.29]);
        let mut player = Player::demo_hero().with_health(55).unwrap();
        let report = resolver(dice)
            .resolve(
                &mut player,
                Some(practice_dummy(40, 9)),
                &mut ScriptedActions::new([Action::Flee]),
            )
            .unwrap();

        assert_eq!(CombatState::PlayerFled, report.outcome);
        assert_eq!(1, report.turns);
        assert_eq!(55, player.health());
        assert_eq!(40, report.monster.health());
        assert_eq!(None, report.rewards);
        assert_eq!(100, player.gold());
        assert_eq!(None, report.damage_per_turn());
    }

    #[test]
    fn failed_flee_lets_the_monster_strike() {
        let dice = ScriptedDice::new().with_units([0.3, 0.1]);
        let mut player = Player::demo_hero();
        let report = resolver(dice)
            .resolve(
                &mut player,
                Some(practice_dummy(40, 9)),
                &mut ScriptedActions::new([Action::Flee, Action::Flee]),
            )
            .unwrap();

        assert_eq!(CombatState::PlayerFled, report.outcome);
        assert_eq!(2, report.turns);
        assert_eq!(ActionEffect::EscapeBlocked, report.log[0].effect);
        assert_eq!(9, report.damage_taken);
        assert_eq!(91, player.health());
    }

    #[test]
    fn potion_heals_up_to_max_and_monster_still_acts() {
        let mut player = Player::demo_hero().with_health(85).unwrap();
        let err = resolver(ScriptedDice::new())
            .resolve(
                &mut player,
                Some(practice_dummy(40, 4)),
                &mut ScriptedActions::new([Action::Potion, Action::Potion]),
            )
            .unwrap_err();

        assert_eq!(CombatError::ActionsExhausted { turn: 3 }, err);
        // 85 + 15 - 4 = 96, then + 4 - 4 = 96
        assert_eq!(96, player.health());
        assert_eq!(1, player.health_potions());
    }

    #[test]
    fn empty_pack_wastes_the_turn() {
        struct Effects {
            seen: Vec<ActionEffect>,
            script: ScriptedActions,
        }
        impl ActionSource for Effects {
            fn next_action(&mut self, view: &TurnView<'_>) -> Option<Action> {
                self.script.next_action(view)
            }
            fn turn_resolved(&mut self, record: &TurnRecord) {
                self.seen.push(record.effect);
            }
        }

        let mut player = Player::demo_hero().with_potions(0);
        let mut effects = Effects {
            seen: Vec::new(),
            script: ScriptedActions::new([Action::Potion]),
        };
        let err = resolver(ScriptedDice::new())
            .resolve(&mut player, Some(practice_dummy(40, 4)), &mut effects)
            .unwrap_err();
        assert_eq!(CombatError::ActionsExhausted { turn: 2 }, err);
        assert_eq!(vec![ActionEffect::NoPotion], effects.seen);
        assert_eq!(96, player.health());
        assert_eq!(0, player.health_potions());
    }

    #[test]
    fn hesitation_still_draws_a_counter_attack() {
        let mut player = Player::demo_hero().with_health(3).unwrap();
        let report = resolver(ScriptedDice::new())
            .resolve(
                &mut player,
                Some(practice_dummy(40, 3)),
                &mut ScriptedActions::from_choices("x"),
            )
            .unwrap();
        assert_eq!(ActionEffect::Hesitated, report.log[0].effect);
        assert_eq!(CombatState::PlayerLost, report.outcome);
        assert_eq!(0, player.health());
    }

    #[test]
    fn random_monster_is_drawn_when_none_supplied() {
        let dice = ScriptedDice::new().with_units([0.9]);
        let mut player = Player::demo_hero();
        let err = resolver(dice)
            .resolve(
                &mut player,
                None,
                &mut ScriptedActions::new([Action::Flee]),
            )
            .unwrap_err();
        // Flee draw falls back to the exhausted unit and fails, so the
        // troll swings once before input runs out.
        assert_eq!(CombatError::ActionsExhausted { turn: 2 }, err);
        assert_eq!(92, player.health());
    }

    #[test]
    fn defeated_player_cannot_start_a_fight() {
        let mut player = Player::demo_hero().with_health(2).unwrap();
        player.take_damage(2);
        let err = resolver(ScriptedDice::new())
            .resolve(&mut player, Some(practice_dummy(5, 0)), &mut ScriptedActions::default())
            .unwrap_err();
        assert_eq!(CombatError::PlayerDefeated("Hero".into()), err);
    }

    #[test]
    fn refused_fight_leaves_the_dice_untouched() {
        let mut player = Player::demo_hero().with_health(1).unwrap();
        player.take_damage(1);
        let mut fight = resolver(ScriptedDice::new().with_units([0.9]));
        let err = fight
            .resolve(&mut player, None, &mut ScriptedActions::default())
            .unwrap_err();
        assert_eq!(CombatError::PlayerDefeated("Hero".into()), err);
        assert!(!fight.into_dice().is_drained());
    }

    #[test]
    fn observer_sees_every_turn() {
        struct Recorder {
            seen: Vec<u32>,
            script: ScriptedActions,
        }
        impl ActionSource for Recorder {
            fn next_action(&mut self, view: &TurnView<'_>) -> Option<Action> {
                assert!(!view.monster.is_defeated());
                self.script.next_action(view)
            }
            fn turn_resolved(&mut self, record: &TurnRecord) {
                self.seen.push(record.turn);
            }
        }

        let dice = ScriptedDice::new().with_rolls([7, 3, 7, 3, 7]);
        let mut recorder = Recorder {
            seen: Vec::new(),
            script: ScriptedActions::new([Action::Attack; 3]),
        };
        let mut player = Player::demo_hero();
        let report = resolver(dice)
            .resolve(&mut player, Some(practice_dummy(21, 3)), &mut recorder)
            .unwrap();
        assert!(report.victory());
        assert_eq!(vec![1, 2, 3], recorder.seen);
        assert_eq!(21, report.damage_dealt);
        assert_eq!(6, report.damage_taken);
        assert_eq!(report.log.last().map(|r| r.state), Some(CombatState::PlayerWon));
    }
}
