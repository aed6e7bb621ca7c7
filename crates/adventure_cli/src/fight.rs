use std::io::{self, BufRead, Write};

use adventure_core::{
    Action, ActionEffect, ActionSource, CombatReport, CombatState, Player, TurnRecord, TurnView,
};
use tracing::warn;

use crate::console::Console;

/// Interactive action source: shows status and the menu, reads a choice,
/// and narrates each resolved turn.
pub struct ConsoleActions<'c, R, W> {
    console: &'c mut Console<R, W>,
    monster: String,
    pause_between_turns: bool,
}

impl<'c, R: BufRead, W: Write> ConsoleActions<'c, R, W> {
    pub fn new(console: &'c mut Console<R, W>) -> Self {
        Self {
            console,
            monster: String::new(),
            pause_between_turns: true,
        }
    }

    #[cfg(test)]
    pub fn without_pauses(mut self) -> Self {
        self.pause_between_turns = false;
        self
    }

    fn show_turn(&mut self, view: &TurnView<'_>) -> io::Result<Option<Action>> {
        let (player, monster) = (view.player, view.monster);
        if view.turn == 1 {
            self.console
                .banner(&format!("COMBAT: {} vs {}", player.name(), monster.name()))?;
            self.console.blank()?;
            self.console.say(format!("A wild {} appears!", monster.name()))?;
        }
        self.console.blank()?;
        self.console.say(format!(
            "{} HP: {}/{} | MP: {}/{}",
            player.name(),
            player.displayed_health(),
            player.max_health(),
            player.mana(),
            player.max_mana()
        ))?;
        self.console.say(format!(
            "{} HP: {}/{}",
            monster.name(),
            monster.displayed_health(),
            monster.max_health()
        ))?;
        self.console.blank()?;
        self.console.say("--- Your Turn ---")?;
        for (index, action) in Action::MENU.iter().enumerate() {
            self.console.say(format!("{}. {}", index + 1, action.label()))?;
        }
        let choice = self.console.prompt("\nChoose action (1-4): ")?;
        Ok(choice.map(|text| Action::from_choice(&text)))
    }

    fn narrate(&mut self, record: &TurnRecord) -> io::Result<()> {
        let monster = self.monster.clone();
        self.console.blank()?;
        match record.effect {
            ActionEffect::Hit { damage, critical } => {
                if critical {
                    self.console.say("*** CRITICAL HIT! ***")?;
                }
                self.console
                    .say(format!("You attack {monster} for {damage} damage!"))?;
            }
            ActionEffect::Braced => {
                self.console.say("You brace yourself for the next attack!")?;
                self.console.say("Incoming damage will be reduced by 50%.")?;
            }
            ActionEffect::Healed {
                amount,
                potions_left,
            } => {
                self.console
                    .say(format!("You drink a health potion and restore {amount} HP!"))?;
                self.console
                    .say(format!("Health potions remaining: {potions_left}"))?;
            }
            ActionEffect::NoPotion => {
                self.console.say("You don't have any health potions!")?;
                self.console.say("You fumble in your pack but find nothing!")?;
            }
            ActionEffect::Escaped => {
                self.console
                    .say(format!("You successfully escaped from the {monster}!"))?;
            }
            ActionEffect::EscapeBlocked => {
                self.console.say(format!(
                    "You couldn't escape! The {monster} blocks your path!"
                ))?;
            }
            ActionEffect::Hesitated => {
                self.console
                    .say("Invalid action! You hesitate and lose your turn!")?;
            }
        }

        if let Some(strike) = record.strike {
            self.console.blank()?;
            self.console.say(format!("--- {monster}'s Turn ---"))?;
            if strike.defended {
                self.console.say("Your defense absorbs some of the attack!")?;
            }
            self.console
                .say(format!("{monster} attacks for {} damage!", strike.applied))?;
        }

        if record.state == CombatState::Ongoing && self.pause_between_turns {
            self.console.prompt("\nPress Enter to continue...")?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> ActionSource for ConsoleActions<'_, R, W> {
    fn next_action(&mut self, view: &TurnView<'_>) -> Option<Action> {
        self.monster = view.monster.name().to_owned();
        match self.show_turn(view) {
            Ok(action) => action,
            Err(err) => {
                warn!(target: "adventure_cli.fight", %err, "console unavailable");
                None
            }
        }
    }

    fn turn_resolved(&mut self, record: &TurnRecord) {
        if let Err(err) = self.narrate(record) {
            warn!(target: "adventure_cli.fight", %err, "failed to narrate turn");
        }
    }
}

pub fn print_outcome<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    report: &CombatReport,
) -> io::Result<()> {
    let monster = report.monster.name();
    console.blank()?;
    console.rule('=')?;
    match report.outcome {
        CombatState::PlayerWon => {
            console.say("VICTORY!")?;
            console.blank()?;
            console.say(format!("You defeated the {monster}!"))?;
            if let Some(rewards) = report.rewards {
                console.say(format!("You earned {} gold!", rewards.gold))?;
                console.say(format!("You gained {} experience!", rewards.experience))?;
            }
            console.blank()?;
            console.say("--- Combat Statistics ---")?;
            console.say(format!("Turns survived: {}", report.turns))?;
            console.say(format!("Total damage dealt: {}", report.damage_dealt))?;
            console.say(format!("Total damage taken: {}", report.damage_taken))?;
            if let Some(average) = report.damage_per_turn() {
                console.say(format!("Damage per turn: {average:.1}"))?;
            }
        }
        CombatState::PlayerLost => {
            console.say("YOU HAVE BEEN DEFEATED!")?;
            console.blank()?;
            console.say(format!("The {monster} stands victorious over you."))?;
            console.blank()?;
            console.say("=== GAME OVER ===")?;
        }
        CombatState::PlayerFled => {
            console.say("You escaped from combat!")?;
        }
        CombatState::Ongoing => {}
    }
    Ok(())
}

pub fn print_player_status<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    player: &Player,
) -> io::Result<()> {
    console.blank()?;
    console.say("Final Player Status:")?;
    console.say(format!(
        "Health: {}/{}",
        player.displayed_health(),
        player.max_health()
    ))?;
    console.say(format!("Gold: {}", player.gold()))?;
    console.say(format!("Experience: {}", player.experience()))?;
    console.say(format!("Health potions: {}", player.health_potions()))
}
