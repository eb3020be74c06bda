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

#![warn(missing_docs)]

//! Cleaning robots in a dirty room.
//!
//! A fixed-size, non-wrapping grid starts with some cells dirty and every robot stacked on the
//! same start cell. Each step, every robot in turn either cleans the cell it stands on or tries a
//! random one-cell move. The run stops when no dirt remains or the step limit is reached.
//!
//! The [`GridState`] holds cell conditions and occupancy, the [`SimulationEngine`] owns the robots
//! and the metrics and applies the decision rule.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod offsets;

pub use config::SimulationConfig;
pub use engine::{SimulationEngine, SimulationMetrics, SimulationReport, Termination};
pub use error::ConfigurationError;
pub use grid::{Condition, GridState, Position, START_POSITION};
pub use offsets::{Offset, OffsetSource, RandomOffsets, ScriptedOffsets};

/// Integer type used for grid dimensions, robot counts and step counts.
pub type Int = i32;

/// Floating point type used for fractions and percentages.
pub type Float = f64;

/// Default random number generator. Seedable, so runs are reproducible.
pub type Rng = rand_pcg::Pcg64;

/// Hash map used for position-keyed lookups.
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
