//! Headless crawler skirmish
//!
//! Assembles two crawlers from def names, then alternates power ticks and
//! volleys until one side is destroyed or the round limit is reached.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crawler_core::combat::DamageReport;
use crawler_core::core::{set_config, ActorId, Commodity, EngineConfig, Result, SimRng, Terrain};
use crawler_core::crawler::Crawler;
use crawler_core::segments::DefCatalog;

const DEFAULT_LOADOUT: &str =
    "Reactor,Treads,Autocannon,Laser,Armor Plate,Shield Emitter,Cargo Hold,Crew Quarters";

/// Crawler Skirmish - two crawlers trade fire until one falls
#[derive(Parser, Debug)]
#[command(name = "crawler-skirmish")]
#[command(about = "Run a headless skirmish between two crawlers")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum rounds before calling a draw
    #[arg(long, default_value_t = 40)]
    rounds: u32,

    /// Simulated seconds between volleys
    #[arg(long, default_value_t = 15)]
    tick_seconds: u64,

    /// Extra segment catalog (TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Engine config overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Red loadout: comma-separated def names (derived names allowed)
    #[arg(long, default_value = DEFAULT_LOADOUT)]
    red: String,

    /// Blue loadout
    #[arg(long, default_value = DEFAULT_LOADOUT)]
    blue: String,

    /// Crew aboard each crawler
    #[arg(long, default_value_t = 20)]
    crew: u32,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct RoundSummary {
    round: u32,
    red_shots: usize,
    blue_shots: usize,
    damage_to_red: i64,
    damage_to_blue: i64,
    red_crew: u32,
    blue_crew: u32,
    red_charge: f32,
    blue_charge: f32,
}

fn assemble(
    catalog: &mut DefCatalog,
    id: u128,
    name: &str,
    loadout: &str,
    seed: u64,
    crew: u32,
) -> Result<Crawler> {
    let mut crawler = Crawler::new(ActorId::from_u128(id), name, seed, crew);
    for def_name in loadout.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let def = catalog.resolve(def_name)?;
        crawler.install(def);
    }
    crawler.supplies.add(Commodity::Fuel, 500.0);
    crawler.supplies.add(Commodity::Slugs, 200.0);
    crawler.supplies.add(Commodity::Rockets, 40.0);
    Ok(crawler)
}

fn describe(report: &DamageReport) -> String {
    let landed = report
        .outcomes
        .iter()
        .filter(|o| o.absorption.damage > 0)
        .count();
    format!(
        "{}/{} hits for {} damage, {} crew lost",
        landed,
        report.outcomes.len(),
        report.total_damage,
        report.crew_lost
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crawler_core=info")),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = EngineConfig::load(path)?;
        if set_config(config).is_err() {
            tracing::warn!("Engine config already initialized, ignoring {}", path.display());
        }
    }

    let mut catalog = DefCatalog::builtin()?;
    if let Some(path) = &args.catalog {
        catalog.load_file(path)?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = SimRng::new(seed);
    let mut red = assemble(&mut catalog, 1, "Red", &args.red, rng.child_seed(), args.crew)?;
    let mut blue = assemble(&mut catalog, 2, "Blue", &args.blue, rng.child_seed(), args.crew)?;
    let json = args.format == "json";

    if !json {
        println!("=== CRAWLER SKIRMISH (seed {}) ===", seed);
        for crawler in [&red, &blue] {
            let eval = crawler.evaluate_move(Terrain::Rough);
            println!(
                "{}: speed {:.1} on rough ground{}",
                crawler.name,
                eval.speed,
                eval.note.map(|n| format!(" ({})", n)).unwrap_or_default()
            );
        }
        println!();
    }

    let tick = Duration::from_secs(args.tick_seconds);
    for round in 1..=args.rounds {
        red.tick(tick);
        blue.tick(tick);

        let red_fire = red.create_fire();
        let blue_fire = blue.create_fire();
        let to_blue = blue.receive_fire(&mut red, &red_fire);
        let to_red = red.receive_fire(&mut blue, &blue_fire);

        if json {
            let summary = RoundSummary {
                round,
                red_shots: red_fire.len(),
                blue_shots: blue_fire.len(),
                damage_to_red: to_red.total_damage,
                damage_to_blue: to_blue.total_damage,
                red_crew: red.crew,
                blue_crew: blue.crew,
                red_charge: red.total_charge(),
                blue_charge: blue.total_charge(),
            };
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            println!("Round {}", round);
            println!("  Red -> Blue: {}", describe(&to_blue));
            println!("  Blue -> Red: {}", describe(&to_red));
        }

        if red.is_destroyed() || blue.is_destroyed() {
            break;
        }
    }

    if !json {
        let outcome = match (red.is_destroyed(), blue.is_destroyed()) {
            (true, true) => "Mutual destruction",
            (false, true) => "Red wins",
            (true, false) => "Blue wins",
            (false, false) => "Draw",
        };
        println!();
        println!("{}", outcome);
        println!();
        print!("{}", red);
        print!("{}", blue);
    }

    Ok(())
}
