//! Headless duel runner.
//!
//! Plays one battle between a scripted player and the random opponent,
//! printing every notification the core publishes.
//!
//! ```text
//! cargo run --bin duel -- --seed 7 --max-turns 4
//! RUST_LOG=card_duel=debug cargo run --bin duel
//! ```

use std::path::PathBuf;

use clap::Parser;

use card_duel::cards::{CardCatalog, SlotId};
use card_duel::core::{BattleConfig, BattleError, GameRng};
use card_duel::events::{BattleEvent, EventKind};
use card_duel::session::BattleSession;

#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(about = "Run a scripted card duel against the random opponent")]
struct Args {
    /// Random seed for reproducible runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with battle settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Turn limit (overrides the config file)
    #[arg(long)]
    max_turns: Option<u32>,

    /// Chance the scripted player uses a skill each turn
    #[arg(long, default_value_t = 0.5)]
    skill_chance: f64,
}

fn load_config(args: &Args) -> Result<BattleConfig, BattleError> {
    let mut config = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .map_err(|e| BattleError::Config(format!("{}: {e}", path.display())))?;
            BattleConfig::from_toml_str(&source)?
        }
        None => BattleConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(turns) = args.max_turns {
        config.max_turns = turns;
    }
    if !(0.0..=1.0).contains(&args.skill_chance) {
        return Err(BattleError::Config(format!(
            "skill chance must be between 0 and 1, got {}",
            args.skill_chance
        )));
    }
    config.validate()?;
    Ok(config)
}

fn print_events(session: &BattleSession) {
    let bus = session.bus();
    bus.subscribe(EventKind::HealthChanged, |event| {
        if let BattleEvent::HealthChanged {
            player_health,
            opponent_health,
        } = event
        {
            println!("  health      player {player_health:>4} | ai {opponent_health:>4}");
        }
        Ok(())
    });
    bus.subscribe(EventKind::SkillsDisplayed, |event| {
        if let BattleEvent::SkillsDisplayed {
            player_description,
            opponent_description,
        } = event
        {
            println!("  skills      player [{player_description}] | ai [{opponent_description}]");
        }
        Ok(())
    });
    bus.subscribe(EventKind::OpponentCardCommitted, |event| {
        if let BattleEvent::OpponentCardCommitted { card } = event {
            println!("  ai plays    {card}");
        }
        Ok(())
    });
    bus.subscribe(EventKind::TurnResolved, |event| {
        if let BattleEvent::TurnResolved {
            turn,
            player_damage,
            opponent_damage,
        } = event
        {
            println!("  turn {turn}      dealt {player_damage} | took {opponent_damage}");
        }
        Ok(())
    });
    bus.subscribe(EventKind::GameFinished, |event| {
        if let BattleEvent::GameFinished { message } = event {
            println!("\n{message}");
        }
        Ok(())
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!(seed = config.seed, max_turns = config.max_turns, "starting duel");

    let session = BattleSession::standard(&config)?;
    print_events(&session);

    let deck = CardCatalog::standard();
    let mut rng = GameRng::new(config.seed).for_context("player");

    session.start()?;
    let slot = SlotId::new(0);
    let mut outcome = None;

    for round in 1..=config.max_turns {
        let Some(card) = deck.random_card(&mut rng) else {
            return Err(BattleError::EmptyCatalog.into());
        };
        println!("\nround {round}: player plays {card}");

        session.request(BattleEvent::CardPlacedOnTarget { slot, card });
        if rng.gen_bool(args.skill_chance) {
            session.request(BattleEvent::UseSkillRequested);
        }
        session.request(BattleEvent::EndTurnRequested);

        outcome = session.advance(config.settle_delay())?;
        if outcome.is_some() {
            break;
        }
    }

    match outcome {
        Some(outcome) => tracing::info!(winner = ?outcome.winner, "duel finished"),
        None => tracing::warn!("duel ended without a result"),
    }
    Ok(())
}
