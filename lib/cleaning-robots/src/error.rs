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

//! Errors raised while setting up a simulation.

use crate::grid::Position;
use crate::{Float, Int};

/// A simulation was configured with values it cannot run with. Always raised at setup, before
/// any step is taken.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Height or width is zero or negative.
    #[error("grid dimensions must be positive, got {height}x{width}")]
    NonPositiveDimensions {
        /// Requested height (`m`).
        height: Int,
        /// Requested width (`n`).
        width: Int,
    },

    /// Robot count is negative.
    #[error("robot count must not be negative: {0}")]
    NegativeRobotCount(Int),

    /// Dirty fraction is not in `[0, 1]`.
    #[error("dirty fraction must be within [0, 1]: {0}")]
    DirtyFractionOutOfRange(Float),

    /// Step limit is negative.
    #[error("step limit must not be negative: {0}")]
    NegativeStepLimit(Int),

    /// Robots were requested but the shared start cell is outside the grid.
    #[error("start position {start} is outside the {height}x{width} grid")]
    StartOutOfBounds {
        /// The fixed start position.
        start: Position,
        /// Grid height.
        height: Int,
        /// Grid width.
        width: Int,
    },

    /// An explicitly placed dirty cell is outside the grid.
    #[error("dirty cell {0} is outside the grid")]
    DirtOutOfBounds(Position),

    /// The same position was given twice as a dirty cell.
    #[error("dirty cell {0} placed twice")]
    DuplicateDirt(Position),
}
