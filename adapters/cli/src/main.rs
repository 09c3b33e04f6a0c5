#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Mystic Towers session.

mod layout_transfer;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use mystic_towers_core::{
    BalanceConfig, Command, Event, SessionOutcome, TileCoord, TowerKind,
};
use mystic_towers_simulation::{
    FrameClock, Simulation, SimulationConfig, DEFAULT_RNG_SEED, TARGET_FRAME,
};
use mystic_towers_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::layout_transfer::{LayoutTower, TowerLayout};

#[derive(Debug, Parser)]
#[command(name = "mystic-towers", about = "Runs a headless Mystic Towers session")]
struct CliArgs {
    /// Seed of the paired-spawn RNG.
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    seed: u64,
    /// Stop once this many waves have been completed.
    #[arg(long)]
    waves: Option<u32>,
    /// Tower layout in the `towers:v1:<payload>` format.
    #[arg(long)]
    layout: Option<String>,
    /// Tower to place before the first wave, e.g. `cannon@4,12`.
    #[arg(long = "tower", value_name = "KIND@COL,ROW", value_parser = parse_tower)]
    towers: Vec<LayoutTower>,
    /// TOML file overriding the default balance tables.
    #[arg(long, value_name = "FILE")]
    balance: Option<PathBuf>,
    /// Upper bound on simulated time in seconds.
    #[arg(long, default_value_t = 3600.0)]
    max_seconds: f32,
    /// Game speed multiplier applied to every frame.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Log per-entity lifecycle events.
    #[arg(long)]
    verbose: bool,
    /// Print the placed towers as a layout string and exit.
    #[arg(long)]
    print_layout: bool,
}

/// Totals gathered while the session runs.
#[derive(Clone, Copy, Debug, Default)]
struct SessionTally {
    kills: u32,
    leaks: u32,
    shots: u32,
    simulated: Duration,
}

impl SessionTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.simulated += *dt,
                Event::MonsterKilled { .. } => self.kills += 1,
                Event::MonsterReachedBase { .. } => self.leaks += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Mystic Towers command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose)?;

    let balance = match &args.balance {
        Some(path) => load_balance(path)?,
        None => BalanceConfig::default(),
    };
    ensure!(
        args.max_seconds > 0.0,
        "--max-seconds must be a positive number of seconds"
    );
    let budget = Duration::try_from_secs_f32(args.max_seconds)
        .context("--max-seconds is out of range")?;
    ensure!(
        args.speed.is_finite() && args.speed > 0.0,
        "--speed must be a positive multiplier"
    );

    let mut towers = Vec::new();
    if let Some(layout) = &args.layout {
        let layout = TowerLayout::decode(layout).context("failed to decode --layout")?;
        if (layout.columns, layout.rows) != (balance.grid.columns, balance.grid.rows) {
            bail!(
                "layout was captured on a {}x{} grid but the balance uses {}x{}",
                layout.columns,
                layout.rows,
                balance.grid.columns,
                balance.grid.rows
            );
        }
        towers.extend(layout.towers);
    }
    towers.extend(args.towers.iter().copied());

    let mut simulation = Simulation::new(SimulationConfig {
        balance,
        rng_seed: args.seed,
    });
    place_towers(&mut simulation, &towers);

    if args.print_layout {
        println!("{}", capture_layout(&simulation).encode()?);
        return Ok(());
    }

    let mut clock = FrameClock::new();
    clock.set_speed(args.speed);
    let tally = run_session(&mut simulation, clock.frame_dt(TARGET_FRAME), budget, args.waves);
    print_summary(&simulation, &tally);
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!(error))
        .context("failed to install the tracing subscriber")
}

fn load_balance(path: &PathBuf) -> Result<BalanceConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read balance file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse balance file {}", path.display()))
}

fn place_towers(simulation: &mut Simulation, towers: &[LayoutTower]) {
    let commands: Vec<Command> = towers
        .iter()
        .map(|tower| Command::PlaceTower {
            kind: tower.kind,
            tile: tower.tile,
        })
        .collect();
    for event in simulation.step(Duration::ZERO, &commands) {
        if let Event::TowerPlacementRejected { kind, tile, reason } = event {
            warn!(
                ?kind,
                column = tile.column(),
                row = tile.row(),
                %reason,
                "skipping tower"
            );
        }
    }
}

fn capture_layout(simulation: &Simulation) -> TowerLayout {
    let world = simulation.world();
    let grid = &query::balance(world).grid;
    TowerLayout {
        columns: grid.columns,
        rows: grid.rows,
        towers: query::tower_view(world)
            .iter()
            .map(|tower| LayoutTower {
                kind: tower.kind,
                tile: tower.tile,
            })
            .collect(),
    }
}

fn run_session(
    simulation: &mut Simulation,
    dt: Duration,
    budget: Duration,
    waves: Option<u32>,
) -> SessionTally {
    let mut tally = SessionTally::default();

    while simulation.outcome() == SessionOutcome::Ongoing && tally.simulated < budget {
        let world = simulation.world();
        let mut input = Vec::new();
        if !query::wave_in_progress(world) {
            if waves.is_some_and(|limit| query::wave(world) >= limit) {
                break;
            }
            input.push(Command::StartWave);
        }
        tally.record(simulation.step(dt, &input));
    }

    if simulation.outcome() == SessionOutcome::Ongoing && tally.simulated >= budget {
        info!(seconds = budget.as_secs_f32(), "simulated time budget exhausted");
    }
    tally
}

fn print_summary(simulation: &Simulation, tally: &SessionTally) {
    let world = simulation.world();
    println!("outcome: {:?}", simulation.outcome());
    println!("wave: {}", query::wave(world));
    println!("gold: {}", query::gold(world).get());
    println!("base hp: {}", query::base_health(world).get());
    println!("towers: {}", query::tower_view(world).iter().count());
    println!(
        "kills: {} leaks: {} shots: {}",
        tally.kills, tally.leaks, tally.shots
    );
    println!("simulated: {:.1}s", tally.simulated.as_secs_f32());
}

fn parse_tower(value: &str) -> Result<LayoutTower, String> {
    let (kind, tile) = value
        .split_once('@')
        .ok_or_else(|| format!("expected KIND@COL,ROW, got '{value}'"))?;
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "cannon" => TowerKind::Cannon,
        "water" => TowerKind::Water,
        "fire" => TowerKind::Fire,
        other => return Err(format!("unknown tower kind '{other}'")),
    };
    let (column, row) = tile
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW, got '{tile}'"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    Ok(LayoutTower {
        kind,
        tile: TileCoord::new(column, row),
    })
}
