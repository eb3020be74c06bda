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

//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::grid::START_POSITION;
use crate::{Float, Int};

/// Parameters for one simulation run. Keys are camelCase when (de)serialized, e.g. `nRobots`,
/// and any key left out falls back to [`SimulationConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Grid height.
    pub m: Int,

    /// Grid width.
    pub n: Int,

    /// Number of robots. All of them start on the same cell.
    pub n_robots: Int,

    /// Fraction of the `m * n` cells that start dirty.
    pub p_dirty: Float,

    /// Maximum number of steps before the run is stopped.
    pub t_max: Int,

    /// Seed for dirt placement and robot moves.
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a config with the default seed.
    pub fn new(m: Int, n: Int, n_robots: Int, p_dirty: Float, t_max: Int) -> Self {
        Self {
            m,
            n,
            n_robots,
            p_dirty,
            t_max,
            ..Self::default()
        }
    }

    /// Same parameters, different seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Reject configurations that cannot be simulated.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.m <= 0 || self.n <= 0 {
            return Err(ConfigurationError::NonPositiveDimensions {
                height: self.m,
                width: self.n,
            });
        }
        if self.n_robots < 0 {
            return Err(ConfigurationError::NegativeRobotCount(self.n_robots));
        }
        // NaN fails the range check as well.
        if !(0.0..=1.0).contains(&self.p_dirty) {
            return Err(ConfigurationError::DirtyFractionOutOfRange(self.p_dirty));
        }
        if self.t_max < 0 {
            return Err(ConfigurationError::NegativeStepLimit(self.t_max));
        }
        if self.n_robots > 0 && (START_POSITION.x >= self.m || START_POSITION.y >= self.n) {
            return Err(ConfigurationError::StartOutOfBounds {
                start: START_POSITION,
                height: self.m,
                width: self.n,
            });
        }
        Ok(())
    }

    /// Total number of cells, `m * n`.
    pub fn total_cells(&self) -> usize {
        self.m.max(0) as usize * self.n.max(0) as usize
    }

    /// Number of cells that start dirty, `floor(p_dirty * m * n)`.
    pub fn dirty_count(&self) -> usize {
        (self.p_dirty * self.total_cells() as Float).floor() as usize
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            m: 5,
            n: 5,
            n_robots: 15,
            p_dirty: 0.6,
            t_max: 50,
            seed: 42,
        }
    }
}
