mod console;
mod creation;
mod fight;
mod guess;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use adventure_config::{default_run_id, AdventureConfig, SessionReport};
use adventure_core::input::parse_confirmation;
use adventure_core::{
    Archetype, CombatReport, CombatResolver, CombatState, Player, ScriptedActions, SimulationRng,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use console::Console;
use fight::{print_outcome, print_player_status, ConsoleActions};

#[derive(Parser)]
#[command(version, about = "A small text adventure: character creation, combat and a guessing game")]
struct Cli {
    /// TOML file overriding the stock rules.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for every random roll; also read from ADVENTURE_SEED.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guess the secret number.
    Guess,
    /// Create a character and print the sheet.
    Create,
    /// Send the demo hero into a single fight.
    Fight(FightArgs),
    /// Create a character, then fight until defeat or retirement.
    Play,
    /// Run a fight from scripted menu choices and print the JSON report.
    Simulate(SimulateArgs),
    /// Summarize a saved session report.
    Report(ReportArgs),
}

#[derive(Args)]
struct FightArgs {
    /// Opponent; a weighted random monster when omitted.
    #[arg(long, value_enum)]
    monster: Option<MonsterKind>,
}

#[derive(Args)]
struct SimulateArgs {
    /// Menu choices separated by commas, e.g. `1,1,2,3`.
    #[arg(long)]
    actions: String,
    #[arg(long, value_enum)]
    monster: Option<MonsterKind>,
    /// Starting health of the demo hero.
    #[arg(long)]
    health: Option<i32>,
    #[arg(long)]
    potions: Option<u32>,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum MonsterKind {
    Goblin,
    Orc,
    Troll,
}

impl From<MonsterKind> for Archetype {
    fn from(kind: MonsterKind) -> Self {
        match kind {
            MonsterKind::Goblin => Archetype::Goblin,
            MonsterKind::Orc => Archetype::Orc,
            MonsterKind::Troll => Archetype::Troll,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AdventureConfig::load(cli.config.as_deref())?;
    init_tracing(&config);

    let mut rng = config.simulation_rng(cli.seed);
    info!(target: "adventure_cli", seed = rng.seed(), "session starting");

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    match cli.command {
        Commands::Guess => handle_guess(&mut console, &config, &mut rng),
        Commands::Create => handle_create(&mut console, &config, &mut rng),
        Commands::Fight(args) => handle_fight(&mut console, &config, &mut rng, args),
        Commands::Play => handle_play(&mut console, &config, &mut rng),
        Commands::Simulate(args) => handle_simulate(&config, &mut rng, args),
        Commands::Report(args) => handle_report(args),
    }
}

/// `RUST_LOG` wins, then `[telemetry] trace_filter`, then warnings only.
/// Logs go to stderr so they never interleave with prompts.
fn init_tracing(config: &AdventureConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.trace_filter().unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn handle_guess<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &AdventureConfig,
    rng: &mut SimulationRng,
) -> Result<()> {
    guess::play_guessing(console, &config.guessing, rng)?;
    Ok(())
}

fn handle_create<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &AdventureConfig,
    rng: &mut SimulationRng,
) -> Result<()> {
    let player = creation::create_character(console, &config.character, rng)?;
    console.say(format!("\nWelcome, {}!", player.name()))?;
    console.say(format!(
        "HP: {}/{}",
        player.health(),
        player.max_health()
    ))?;
    console.say(format!("MP: {}/{}", player.mana(), player.max_mana()))?;
    console.say(format!("Gold: {}", player.gold()))?;
    Ok(())
}

fn handle_fight<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &AdventureConfig,
    rng: &mut SimulationRng,
    args: FightArgs,
) -> Result<()> {
    let seed = rng.seed();
    let mut player = Player::demo_hero();
    let monster = args.monster.map(|kind| Archetype::from(kind).spawn());

    let fight = {
        let mut actions = ConsoleActions::new(console);
        CombatResolver::new(config.combat, &mut *rng).resolve(&mut player, monster, &mut actions)
    };
    let (encounters, outcome) = match fight {
        Ok(report) => {
            print_outcome(console, &report)?;
            print_player_status(console, &player)?;
            (vec![report], Ok(()))
        }
        Err(err) => (Vec::new(), Err(err.into())),
    };
    save_session(config, seed, player, encounters)?;
    outcome
}

fn handle_play<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &AdventureConfig,
    rng: &mut SimulationRng,
) -> Result<()> {
    let seed = rng.seed();
    let mut player = creation::create_character(console, &config.character, rng)?;
    let mut encounters: Vec<CombatReport> = Vec::new();

    let outcome = run_encounters(console, config, rng, &mut player, &mut encounters);
    if let Err(err) = &outcome {
        warn!(target: "adventure_cli", %err, finished = encounters.len(), "session cut short");
    }
    print_player_status(console, &player)?;
    save_session(config, seed, player, encounters)?;
    outcome
}

/// Fights random monsters until the player falls or stops. Finished
/// encounters are pushed as they complete; closed input at the continue
/// prompt counts as stopping.
fn run_encounters<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &AdventureConfig,
    rng: &mut SimulationRng,
    player: &mut Player,
    encounters: &mut Vec<CombatReport>,
) -> Result<()> {
    loop {
        let report = {
            let mut actions = ConsoleActions::new(console);
            CombatResolver::new(config.combat, &mut *rng).resolve(player, None, &mut actions)?
        };
        print_outcome(console, &report)?;
        let outcome = report.outcome;
        encounters.push(report);

        if outcome == CombatState::PlayerLost {
            return Ok(());
        }
        let answer = console.prompt("\nContinue your adventure? (yes/no): ")?;
        if !answer.as_deref().is_some_and(parse_confirmation) {
            return Ok(());
        }
    }
}

fn handle_simulate(config: &AdventureConfig, rng: &mut SimulationRng, args: SimulateArgs) -> Result<()> {
    let mut player = Player::demo_hero();
    if let Some(health) = args.health {
        player = player.with_health(health)?;
    }
    if let Some(potions) = args.potions {
        player = player.with_potions(potions);
    }
    let monster = args.monster.map(|kind| Archetype::from(kind).spawn());
    let mut actions = ScriptedActions::from_choices(&args.actions);

    let report = CombatResolver::new(config.combat, &mut *rng)
        .resolve(&mut player, monster, &mut actions)
        .context("scripted fight did not finish")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let report = SessionReport::read_from(&args.input)?;
    let summary = &report.summary;
    println!(
        "Report {} ({}) seed {} -> {} won, {} lost, {} fled; {} gold, {} xp",
        report.id,
        report.timestamp,
        report.seed,
        summary.victories,
        summary.defeats,
        summary.escapes,
        summary.gold_earned,
        summary.experience_earned
    );
    Ok(())
}

fn save_session(
    config: &AdventureConfig,
    seed: u64,
    player: Player,
    encounters: Vec<CombatReport>,
) -> Result<()> {
    let Some(report_cfg) = config.report.as_ref() else {
        return Ok(());
    };
    let report = SessionReport::new(default_run_id(), seed, player, encounters);
    report.write_to(&report_cfg.path)?;
    println!("Report written to {}", report_cfg.path.display());
    Ok(())
}
