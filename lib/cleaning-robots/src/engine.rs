/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Stepping the robots and keeping score.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::ConfigurationError;
use crate::grid::{Condition, GridState, Position, START_POSITION};
use crate::offsets::{OffsetSource, RandomOffsets};
use crate::{Float, Int};

/// Counters kept while the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Completed steps.
    pub elapsed_steps: Int,

    /// Successful robot relocations, over all robots and steps.
    pub total_moves: u64,

    /// Dirty cells left, recounted after every step.
    pub remaining_dirty: usize,

    /// Dirty cells at setup.
    pub initial_dirty: usize,
}

/// What a finished run reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Steps taken before the run stopped.
    pub elapsed_steps: Int,

    /// Share of all cells that are not dirty, from 0 to 100.
    pub cleaned_percentage: Float,

    /// Successful robot relocations.
    pub total_moves: u64,
}

/// Whether the simulation has stopped, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Keep stepping.
    NotTerminal,

    /// No dirty cell is left.
    AllClean,

    /// The step limit was reached with dirt left.
    StepLimitReached,
}

impl Termination {
    /// True for both stop reasons.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Termination::NotTerminal)
    }
}

/// Owns the robots, the grid and the metrics, and advances the simulation one step at a time.
///
/// Within a step robots act one after the other in index order, each against the grid as left by
/// the robots before it. A robot on a dirty cell cleans it and stays. Otherwise it draws a random
/// in-bounds neighbour (possibly its own cell) and moves there if no robot is on it.
#[derive(Debug, Clone)]
pub struct SimulationEngine<_Source: OffsetSource = RandomOffsets> {
    config: SimulationConfig,
    grid: GridState,
    robots: Vec<Position>,
    source: _Source,
    metrics: SimulationMetrics,
}

impl SimulationEngine {
    /// Set up a run with a PCG generator seeded from `config.seed`.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        Self::new(config, crate::Rng::seed_from_u64(config.seed))
    }
}

impl<_Rng: rand::Rng> SimulationEngine<RandomOffsets<_Rng>> {
    /// Set up a run. `floor(p_dirty * m * n)` distinct cells are made dirty at random, then every
    /// robot is placed on the start cell. The same generator then drives the robots' moves.
    pub fn new(config: SimulationConfig, mut rng: _Rng) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let dirt = random_dirt_layout(&config, &mut rng);
        Self::with_layout(config, &dirt, RandomOffsets::new(rng))
    }
}

impl<_Source: OffsetSource> SimulationEngine<_Source> {
    /// Set up a run with the dirty cells given explicitly instead of drawn at random.
    /// `config.p_dirty` is still validated but otherwise ignored.
    pub fn with_layout(
        config: SimulationConfig,
        dirt: &[Position],
        source: _Source,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let mut grid = GridState::new(config.m, config.n)?;
        for &position in dirt {
            grid.place_dirt(position)?;
        }

        let robots = vec![START_POSITION; config.n_robots as usize];
        for &robot in &robots {
            grid.place_robot(robot);
        }

        let remaining_dirty = grid.remaining_dirty();
        info!(
            m = config.m,
            n = config.n,
            robots = robots.len(),
            dirty = remaining_dirty,
            t_max = config.t_max,
            "simulation set up"
        );

        Ok(Self {
            config,
            grid,
            robots,
            source,
            metrics: SimulationMetrics {
                elapsed_steps: 0,
                total_moves: 0,
                remaining_dirty,
                initial_dirty: remaining_dirty,
            },
        })
    }

    /// The configuration this run was set up with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current grid.
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Current robot positions, in acting order.
    pub fn robots(&self) -> &[Position] {
        &self.robots
    }

    /// Current counters.
    pub fn metrics(&self) -> SimulationMetrics {
        self.metrics
    }

    /// The offset source driving the robots.
    pub fn source(&self) -> &_Source {
        &self.source
    }

    /// Stop condition, evaluated against the metrics of the last completed step (or of setup).
    pub fn termination(&self) -> Termination {
        if self.metrics.remaining_dirty == 0 {
            Termination::AllClean
        } else if self.metrics.elapsed_steps >= self.config.t_max {
            Termination::StepLimitReached
        } else {
            Termination::NotTerminal
        }
    }

    /// Let every robot act once, recount the dirt and return the stop condition. Does nothing
    /// once the simulation has stopped.
    pub fn step(&mut self) -> Termination {
        let termination = self.termination();
        if termination.is_terminal() {
            debug!(?termination, "step requested after simulation stopped");
            return termination;
        }

        for robot in 0..self.robots.len() {
            self.act(robot);
        }
        self.metrics.elapsed_steps += 1;

        let remaining_dirty = self.grid.remaining_dirty();
        debug_assert!(remaining_dirty <= self.metrics.remaining_dirty);
        self.metrics.remaining_dirty = remaining_dirty;

        debug!(
            step = self.metrics.elapsed_steps,
            remaining_dirty,
            total_moves = self.metrics.total_moves,
            "step complete"
        );
        self.termination()
    }

    /// Step until the simulation stops, then report.
    pub fn run(&mut self) -> SimulationReport {
        self.run_with_observer(|_| {})
    }

    /// Step until the simulation stops, then report. `observe` sees the engine once after setup
    /// and once after every step, e.g. to draw a frame.
    pub fn run_with_observer<F>(&mut self, mut observe: F) -> SimulationReport
    where
        F: FnMut(&Self),
    {
        observe(self);
        while !self.termination().is_terminal() {
            self.step();
            observe(self);
        }
        self.end()
    }

    /// Share of all cells that are not dirty, from 0 to 100.
    pub fn cleaned_percentage(&self) -> Float {
        let total = self.grid.total_cells() as Float;
        (total - self.metrics.remaining_dirty as Float) / total * 100.0
    }

    /// Final report.
    pub fn end(&self) -> SimulationReport {
        let report = SimulationReport {
            elapsed_steps: self.metrics.elapsed_steps,
            cleaned_percentage: self.cleaned_percentage(),
            total_moves: self.metrics.total_moves,
        };
        info!(
            elapsed_steps = report.elapsed_steps,
            cleaned_percentage = report.cleaned_percentage,
            total_moves = report.total_moves,
            termination = ?self.termination(),
            "simulation ended"
        );
        report
    }

    fn act(&mut self, robot: usize) {
        let from = self.robots[robot];
        let to = propose_destination(&self.grid, from, &mut self.source);

        if self.grid.is_dirty(from) {
            self.grid.set_condition(from, Condition::RobotPresent);
            trace!(robot, %from, "cleaned");
        } else if !self.grid.is_occupied_by_robot(to) {
            self.grid.move_entity(from, to);
            self.grid.set_condition(to, Condition::RobotPresent);
            self.grid.set_condition(from, Condition::Clean);
            self.robots[robot] = to;
            self.metrics.total_moves += 1;
            trace!(robot, %from, %to, "moved");
        } else {
            trace!(robot, %from, %to, "blocked");
        }
    }
}

/// Draw offsets until one lands inside the grid. Terminates because staying put is always in
/// bounds and is drawn with nonzero probability.
fn propose_destination<_Source: OffsetSource>(
    grid: &GridState,
    from: Position,
    source: &mut _Source,
) -> Position {
    loop {
        let candidate = from.offset(source.next_offset());
        if grid.in_bounds(candidate) {
            return candidate;
        }
    }
}

fn random_dirt_layout<_Rng: rand::Rng>(
    config: &SimulationConfig,
    rng: &mut _Rng,
) -> Vec<Position> {
    let positions: Vec<Position> = (0..config.m)
        .flat_map(|x| (0..config.n).map(move |y| Position::new(x, y)))
        .collect();
    positions
        .choose_multiple(rng, config.dirty_count())
        .copied()
        .collect()
}
