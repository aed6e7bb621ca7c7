use std::io::{BufRead, Write};

use adventure_core::{Dice, GuessingGame, GuessingRules, Verdict};
use anyhow::Result;

use crate::console::Console;

/// Plays one round and returns the last verdict.
pub fn play_guessing<R: BufRead, W: Write, D: Dice + ?Sized>(
    console: &mut Console<R, W>,
    rules: &GuessingRules,
    dice: &mut D,
) -> Result<Verdict> {
    let mut game = GuessingGame::new(rules, dice);

    console.rule('=')?;
    console.say("   Welcome to the Guessing Game!")?;
    console.rule('=')?;
    console.say(format!(
        "I am thinking of a number between {} and {}.",
        game.min(),
        game.max()
    ))?;
    console.blank()?;

    let name = console.ask("What is your name? ")?;
    let name = name.trim();
    console.say(format!("Hello, {name}! Let's play!"))?;

    let mut verdict = Verdict::TooLow;
    while !game.is_over() {
        console.blank()?;
        let answer = console.ask("What is your guess? ")?;
        let value = match game.parse_guess(&answer) {
            Ok(value) => value,
            Err(err) => {
                console.say(format!("Error: {err}."))?;
                continue;
            }
        };
        verdict = game.guess(value);
        console.blank()?;
        match verdict {
            Verdict::Correct => console.say(format!("Amazing! You got it, {name}!"))?,
            Verdict::TooLow => console.say("Too low! Try a bigger number next time.")?,
            Verdict::TooHigh => console.say("Too high! Try a smaller number next time.")?,
        }
        if game.attempts_left() > 0 && verdict != Verdict::Correct {
            console.say(format!("Attempts left: {}", game.attempts_left()))?;
        }
    }

    console.say(format!("The secret number was {}.", game.secret()))?;
    console.blank()?;
    console.say("Thanks for playing!")?;
    Ok(verdict)
}
