use std::io::{BufRead, Write};

use adventure_core::character::roll_starting_gold;
use adventure_core::input::parse_quantity;
use adventure_core::{
    validate_name, Attribute, AttributeAllocation, CharacterSheet, CreationRules, Dice, Player,
};
use anyhow::Result;

use crate::console::Console;

/// Walks the player through naming, point allocation and starting gold.
pub fn create_character<R: BufRead, W: Write, D: Dice + ?Sized>(
    console: &mut Console<R, W>,
    rules: &CreationRules,
    dice: &mut D,
) -> Result<Player> {
    console.banner("     WELCOME TO THE REALM OF ADVENTURE!")?;
    console.say("\n  Your journey begins with character creation...\n")?;

    let name = choose_name(console, rules)?;
    let allocation = allocate_points(console, rules)?;

    let gold = roll_starting_gold(rules, dice);
    console.blank()?;
    console.rule('-')?;
    console.say("STARTING WEALTH")?;
    console.rule('-')?;
    console.say("\nYou search your pockets and count your gold...")?;
    console.say(format!("You start your adventure with {gold} gold pieces!"))?;

    let sheet = CharacterSheet::new(name, &allocation, gold);
    print_sheet(console, &sheet)?;
    Ok(sheet.into_player(rules.starting_potions)?)
}

fn choose_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    rules: &CreationRules,
) -> Result<String> {
    loop {
        let raw = console.ask("Enter your hero's name: ")?;
        let name = match validate_name(&raw, rules.max_name_len) {
            Ok(name) => name,
            Err(err) => {
                console.say(format!("Error: {err}. Please try again.\n"))?;
                continue;
            }
        };
        console.say(format!("\nYou have chosen the name: {name}"))?;
        if console.confirm("Is this correct? (yes/no): ")? {
            return Ok(name);
        }
        console.say("\nLet's try again.\n")?;
    }
}

fn allocate_points<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    rules: &CreationRules,
) -> Result<AttributeAllocation> {
    let mut allocation = AttributeAllocation::new(*rules);

    console.blank()?;
    console.rule('-')?;
    console.say("ATTRIBUTE ALLOCATION")?;
    console.rule('-')?;
    console.say(format!("\nYou have {} points to allocate.", rules.total_points))?;
    console.say(format!(
        "Starting Stats - Health: {}, Mana: {}",
        rules.base_health, rules.base_mana
    ))?;
    console.say(format!(
        "\nEach point in Health adds {} HP",
        rules.health_per_point
    ))?;
    console.say(format!("Each point in Mana adds {} MP", rules.mana_per_point))?;
    console.say("\nChoose wisely! Warriors need health, mages need mana.\n")?;

    loop {
        if allocation.remaining() == 0 {
            return Ok(allocation);
        }
        console.say(format!("\nPoints Remaining: {}", allocation.remaining()))?;
        console.say(format!("Current Health: {}", allocation.health()))?;
        console.say(format!("Current Mana: {}", allocation.mana()))?;
        console.say("\nAllocate points to:")?;
        console.say(format!("1. Health (+{} HP per point)", rules.health_per_point))?;
        console.say(format!("2. Mana (+{} MP per point)", rules.mana_per_point))?;
        console.say("3. Review and Confirm")?;

        let choice = console.ask("\nEnter choice (1-3): ")?;
        let attribute = match choice.trim() {
            "1" => Attribute::Health,
            "2" => Attribute::Mana,
            "3" => {
                match review(console, &allocation)? {
                    Review::Accept => return Ok(allocation),
                    Review::KeepAllocating => {}
                    Review::Reset => allocation.reset(),
                }
                continue;
            }
            _ => {
                console.say("\nInvalid choice. Please enter 1, 2, or 3.")?;
                continue;
            }
        };

        let remaining = allocation.remaining();
        console.say(format!(
            "\nYou can allocate up to {remaining} points to {attribute}."
        ))?;
        let answer = console.ask(&format!("How many points? (0-{remaining}): "))?;
        let points = match parse_quantity(&answer, 0..=remaining) {
            Ok(points) => points,
            Err(err) => {
                console.say(format!("Error: {err}."))?;
                continue;
            }
        };
        if let Err(err) = allocation.allocate(attribute, points) {
            console.say(format!("Error: {err}."))?;
            continue;
        }
        console.say(format!("\nAllocated {points} points to {attribute}!"))?;
    }
}

enum Review {
    Accept,
    KeepAllocating,
    Reset,
}

fn review<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    allocation: &AttributeAllocation,
) -> Result<Review> {
    let remaining = allocation.remaining();
    if remaining > 0 {
        console.say(format!(
            "\nWarning: You still have {remaining} unallocated points!"
        ))?;
        if !console.confirm("Finish anyway? (yes/no): ")? {
            return Ok(Review::KeepAllocating);
        }
    }
    console.blank()?;
    console.say("=".repeat(40))?;
    console.say("FINAL ATTRIBUTES")?;
    console.say("=".repeat(40))?;
    console.say(format!("Health: {} HP", allocation.health()))?;
    console.say(format!("Mana: {} MP", allocation.mana()))?;
    console.say(format!("Unallocated Points: {remaining}"))?;
    if console.confirm("\nConfirm these stats? (yes/no): ")? {
        return Ok(Review::Accept);
    }
    console.say("\nResetting allocation...\n")?;
    Ok(Review::Reset)
}

fn print_sheet<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    sheet: &CharacterSheet,
) -> Result<()> {
    console.banner("CHARACTER CREATION COMPLETE!")?;
    console.say(format!("    Name:   {}", sheet.name))?;
    console.say(format!("    Health: {} HP", sheet.health))?;
    console.say(format!("    Mana:   {} MP", sheet.mana))?;
    console.say(format!("    Gold:   {} gold", sheet.gold))?;
    console.say(format!("    Class:  {}", sheet.class))?;
    console.rule('=')?;
    console.say("\nYour adventure is about to begin...")?;
    Ok(())
}
