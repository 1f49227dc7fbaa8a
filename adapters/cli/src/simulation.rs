//! Tick loop that lets the agent play a loaded world.

use anyhow::Result;
use pellet_maze_core::{Command, Event};
use pellet_maze_system_agent::Agent;
use pellet_maze_world::{apply, query, World};

/// Summary of a finished simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) ticks: u64,
    pub(crate) moves: u64,
    pub(crate) remaining: usize,
    pub(crate) cleared: bool,
}

/// Drives the world and the agent tick by tick.
///
/// Stops once the board is cleared, the agent has nothing left to do, or
/// `max_ticks` ticks have elapsed. `observe` runs after every tick.
pub(crate) fn simulate<F>(
    world: &mut World,
    agent: &mut Agent,
    max_ticks: u64,
    mut observe: F,
) -> Result<Outcome>
where
    F: FnMut(&World) -> Result<()>,
{
    let mut outcome = Outcome {
        ticks: 0,
        moves: 0,
        remaining: query::pellet_count(world),
        cleared: query::pellet_count(world) == 0,
    };
    let mut events = Vec::new();
    let mut commands = Vec::new();

    while !outcome.cleared && outcome.ticks < max_ticks {
        apply(world, Command::Tick, &mut events);
        outcome.ticks += 1;

        agent.handle(&events, &query::grid(world), &mut commands);
        events.clear();
        if commands.is_empty() {
            log::info!(
                "agent idle at tick {} with {} pellets left",
                query::tick(world),
                query::pellet_count(world)
            );
            break;
        }

        for command in commands.drain(..) {
            apply(world, command, &mut events);
        }
        for event in &events {
            match event {
                Event::AgentMoved { .. } => outcome.moves += 1,
                Event::BoardCleared => outcome.cleared = true,
                _ => {}
            }
        }

        observe(world)?;
    }

    outcome.remaining = query::pellet_count(world);
    Ok(outcome)
}
