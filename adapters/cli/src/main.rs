#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that routes, plans and simulates pellet mazes.

mod coords;
mod generate;
mod settings;
mod simulation;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use pellet_maze_core::{CellCoord, PelletState};
use pellet_maze_system_agent::Agent;
use pellet_maze_system_pellet_planner::{PelletPlanner, PlanStats};
use pellet_maze_system_router::GridRouter;
use pellet_maze_world::{query, World};
use serde::Serialize;

use crate::{
    coords::parse_cell,
    generate::{generate_layout, GenerateOptions},
    settings::{Settings, StrategyName},
};

#[derive(Debug, Parser)]
#[command(name = "pellet-maze", version, about = "Route, plan and simulate pellet mazes")]
struct Cli {
    /// TOML settings file with optional `[planner]` and `[agent]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a shortest route between two cells.
    Route {
        /// Layout file to load.
        #[arg(long)]
        layout: PathBuf,
        /// Destination cell as COLUMN,ROW.
        #[arg(long, value_parser = parse_cell)]
        to: CellCoord,
        /// Start cell as COLUMN,ROW; defaults to the agent.
        #[arg(long, value_parser = parse_cell)]
        from: Option<CellCoord>,
    },
    /// Print the cheapest order for collecting every pellet.
    Plan {
        /// Layout file to load.
        #[arg(long)]
        layout: PathBuf,
        /// Use the nearest-pellet-first order instead of the optimal search.
        #[arg(long)]
        greedy: bool,
        /// Emit the plan as JSON.
        #[arg(long)]
        json: bool,
        /// Expanded-state limit; zero removes the limit.
        #[arg(long)]
        expansion_limit: Option<usize>,
    },
    /// Let the agent collect pellets one step per tick.
    Run {
        /// Layout file to load.
        #[arg(long)]
        layout: PathBuf,
        /// Planning strategy; defaults to the settings file.
        #[arg(long, value_enum)]
        strategy: Option<StrategyName>,
        /// Upper bound on simulated ticks.
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,
        /// Print the board after every tick.
        #[arg(long)]
        show: bool,
        /// Expanded-state limit; zero removes the limit.
        #[arg(long)]
        expansion_limit: Option<usize>,
    },
    /// Print a random layout generated from a seed.
    Generate {
        /// Number of columns.
        #[arg(long, default_value_t = 12)]
        columns: u32,
        /// Number of rows.
        #[arg(long, default_value_t = 8)]
        rows: u32,
        /// Number of pellets.
        #[arg(long, default_value_t = 6)]
        pellets: usize,
        /// Number of wall cells.
        #[arg(long, default_value_t = 16)]
        walls: usize,
        /// Seed for the layout generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Debug, Serialize)]
struct PlanReport {
    start: CellCoord,
    cost: u32,
    greedy: bool,
    order: Vec<CellCoord>,
    steps: Vec<CellCoord>,
    expansions: usize,
    generated: usize,
    cache_sources: usize,
    cache_hits: u64,
    budget_exhausted: bool,
}

impl PlanReport {
    fn new(
        start: CellCoord,
        cost: u32,
        greedy: bool,
        order: Vec<CellCoord>,
        steps: Vec<CellCoord>,
        stats: PlanStats,
    ) -> Self {
        Self {
            start,
            cost,
            greedy,
            order,
            steps,
            expansions: stats.expansions(),
            generated: stats.generated(),
            cache_sources: stats.cache_sources(),
            cache_hits: stats.cache_hits(),
            budget_exhausted: stats.budget_exhausted(),
        }
    }
}

/// Entry point for the pellet maze command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let settings = Settings::load(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Route { layout, to, from } => route(&mut out, &layout, from, to),
        Commands::Plan {
            layout,
            greedy,
            json,
            expansion_limit,
        } => {
            let mut planner = PelletPlanner::new(settings.planner_config(expansion_limit));
            plan(&mut out, &layout, &mut planner, greedy, json)
        }
        Commands::Run {
            layout,
            strategy,
            max_ticks,
            show,
            expansion_limit,
        } => {
            let strategy = strategy.unwrap_or(settings.agent.strategy);
            let mut agent = Agent::new(strategy.into(), settings.planner_config(expansion_limit));
            run(&mut out, &layout, &mut agent, max_ticks, show)
        }
        Commands::Generate {
            columns,
            rows,
            pellets,
            walls,
            seed,
        } => {
            let layout = generate_layout(GenerateOptions {
                columns,
                rows,
                pellets,
                walls,
                seed,
            })
            .context("failed to generate layout")?;
            out.write_all(layout.as_bytes())?;
            Ok(())
        }
    }
}

fn init_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        let _ = builder.filter_level(level);
    }
    builder.init();
}

fn load_world(path: &Path) -> Result<World> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    World::from_layout(&contents).with_context(|| format!("invalid layout {}", path.display()))
}

fn route<W: Write>(
    out: &mut W,
    layout: &Path,
    from: Option<CellCoord>,
    to: CellCoord,
) -> Result<()> {
    let world = load_world(layout)?;
    let grid = query::grid(&world);
    let from = from.unwrap_or_else(|| query::agent_cell(&world));

    let Some(path) = GridRouter::new().route(&grid, from, to) else {
        bail!("{} is unreachable from {}", cell_label(to), cell_label(from));
    };

    writeln!(out, "cost: {}", path.cost())?;
    writeln!(out, "cells: {}", cell_list(path.states().into_iter().copied()))?;
    Ok(())
}

fn plan<W: Write>(
    out: &mut W,
    layout: &Path,
    planner: &mut PelletPlanner,
    greedy: bool,
    json: bool,
) -> Result<()> {
    let world = load_world(layout)?;
    let grid = query::grid(&world);
    let initial = PelletState::new(query::agent_cell(&world), query::pellet_cells(&world));

    let path = if greedy {
        planner.plan_greedy(&grid, &initial)
    } else {
        planner.plan(&grid, &initial)
    };
    let Some(path) = path else {
        bail!("no order collects every pellet; at least one pellet is unreachable");
    };
    let stats = planner.last_stats();
    let steps = planner
        .route_through(&grid, &path)
        .context("planned pellet order has no walkable route")?;
    let order: Vec<CellCoord> = path
        .states()
        .into_iter()
        .skip(1)
        .map(|state| state.position())
        .collect();

    let report = PlanReport::new(initial.position(), path.cost(), greedy, order, steps, stats);
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "cost: {}", report.cost)?;
    writeln!(out, "order: {}", cell_list(report.order.iter().copied()))?;
    writeln!(out, "steps: {}", cell_list(report.steps.iter().copied()))?;
    writeln!(
        out,
        "search: {} expansions, {} generated, {} sources flooded, {} cache hits{}",
        report.expansions,
        report.generated,
        report.cache_sources,
        report.cache_hits,
        if report.budget_exhausted {
            ", budget exhausted"
        } else {
            ""
        }
    )?;
    Ok(())
}

fn run<W: Write>(
    out: &mut W,
    layout: &Path,
    agent: &mut Agent,
    max_ticks: u64,
    show: bool,
) -> Result<()> {
    let mut world = load_world(layout)?;
    if show {
        write!(out, "{}", query::render(&world))?;
    }

    let outcome = simulation::simulate(&mut world, agent, max_ticks, |world| {
        if show {
            writeln!(out, "tick {}", query::tick(world))?;
            write!(out, "{}", query::render(world))?;
        }
        Ok(())
    })?;

    writeln!(
        out,
        "{} after {} ticks: {} moves, {} pellets left, {} plans",
        if outcome.cleared { "cleared" } else { "stopped" },
        outcome.ticks,
        outcome.moves,
        outcome.remaining,
        agent.replans()
    )?;
    Ok(())
}

fn cell_label(cell: CellCoord) -> String {
    format!("{},{}", cell.column(), cell.row())
}

fn cell_list(cells: impl Iterator<Item = CellCoord>) -> String {
    cells.map(cell_label).collect::<Vec<_>>().join(" ")
}
