//! Event manager demo entry point.
//!
//! Builds an [`EventManager`] from `events.ini` (or defaults), subscribes a
//! few game-style listeners and plays a short scripted scene:
//!
//! 1. Score and damage events reach the scoreboard and health listeners
//! 2. A faulty listener panics on heavy damage; the others still run
//! 3. The scoreboard unsubscribes, then damage listeners are cleared
//! 4. Everything is cleared and a last trigger reaches nobody
//!
//! With `sink = channel` the collected diagnostics are printed at the end.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --config ./events.ini
//! ```

use clap::Parser;
use eventmanager::{EventManager, EventManagerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// Typed event manager demo
#[derive(Parser)]
#[command(version, about = "Plays a short scene through the typed event manager.")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./events.ini")]
    config: PathBuf,

    /// Disable diagnostics regardless of the configuration file.
    #[arg(long)]
    no_diagnostics: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

#[derive(Debug, Clone, Copy)]
struct PlayerScored {
    points: i32,
}

#[derive(Debug, Clone, Copy)]
struct PlayerDamaged {
    amount: i32,
}

#[derive(Debug, Clone, Copy)]
struct GamePaused;

const HEAVY_DAMAGE: i32 = 50;
const START_HEALTH: i32 = 100;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EventManagerConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if cli.no_diagnostics {
        config.diagnostics = false;
    }

    // Early-exit: persist the effective configuration
    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    let (events, reports) = EventManager::from_config(&config);

    let score = Arc::new(AtomicI32::new(0));
    let health = Arc::new(AtomicI32::new(START_HEALTH));

    let scoreboard = {
        let score = score.clone();
        events.listen(move |e: PlayerScored| {
            score.fetch_add(e.points, Ordering::SeqCst);
        })
    };
    events.listen(|e: PlayerScored| println!("HUD: +{} points", e.points));
    events.listen(|e: PlayerDamaged| {
        if e.amount > HEAVY_DAMAGE {
            panic!("screen shake buffer overflow at {} damage", e.amount);
        }
    });
    {
        let health = health.clone();
        events.listen(move |e: PlayerDamaged| {
            health.fetch_sub(e.amount, Ordering::SeqCst);
        });
    }
    events.listen(|_: GamePaused| println!("HUD: paused"));

    log::info!("Registered {} event kinds", events.kind_count());

    events.trigger_event(PlayerScored { points: 10 });
    events.trigger_event(PlayerScored { points: 25 });
    events.trigger_event(PlayerDamaged { amount: 20 });
    events.trigger_event(PlayerDamaged { amount: 75 });
    println!(
        "score={} health={}",
        score.load(Ordering::SeqCst),
        health.load(Ordering::SeqCst)
    );

    events.unsubscribe(&scoreboard);
    events.trigger_event(PlayerScored { points: 1000 });
    println!("score after unsubscribe={}", score.load(Ordering::SeqCst));

    events.clear_event::<PlayerDamaged>();
    events.trigger_event(PlayerDamaged { amount: 5 });
    println!("health after clear={}", health.load(Ordering::SeqCst));

    events.trigger_event(GamePaused);
    events.clear_all_events();
    events.trigger_event(GamePaused);
    log::info!("Registry empty: {}", events.is_empty());

    if let Some(rx) = reports {
        for diagnostic in rx.try_iter() {
            println!("diagnostic: {}", diagnostic);
        }
    }
}
