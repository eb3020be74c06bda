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

//! Sources of candidate robot moves.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Int;

/// A one-cell displacement. Each component is in `{-1, 0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Change in `x`.
    pub dx: Int,
    /// Change in `y`.
    pub dy: Int,
}

impl Offset {
    /// Stay in place. Always lands in bounds.
    pub const STAY: Offset = Offset { dx: 0, dy: 0 };

    /// Create an offset.
    pub const fn new(dx: Int, dy: Int) -> Self {
        Self { dx, dy }
    }
}

/// Yields candidate offsets for robot moves. The engine keeps asking until a candidate lands
/// inside the grid.
pub trait OffsetSource {
    /// Next candidate.
    fn next_offset(&mut self) -> Offset;
}

/// Draws `dx` and `dy` independently and uniformly from `{-1, 0, 1}`.
#[derive(Debug, Clone)]
pub struct RandomOffsets<_Rng: rand::Rng = crate::Rng> {
    rng: _Rng,
}

impl<_Rng: rand::Rng> RandomOffsets<_Rng> {
    /// Wrap a random number generator.
    pub fn new(rng: _Rng) -> Self {
        Self { rng }
    }

    /// Give back the generator.
    pub fn into_inner(self) -> _Rng {
        self.rng
    }
}

impl<_Rng: rand::Rng> OffsetSource for RandomOffsets<_Rng> {
    fn next_offset(&mut self) -> Offset {
        let dx = self.rng.gen_range(-1..=1);
        let dy = self.rng.gen_range(-1..=1);
        Offset { dx, dy }
    }
}

/// Replays a fixed list of offsets, then stays in place forever. Useful for exact trajectories.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOffsets {
    script: VecDeque<Offset>,
}

impl ScriptedOffsets {
    /// Script from `(dx, dy)` pairs.
    pub fn new(offsets: impl IntoIterator<Item = (Int, Int)>) -> Self {
        Self {
            script: offsets
                .into_iter()
                .map(|(dx, dy)| Offset::new(dx, dy))
                .collect(),
        }
    }

    /// Offsets not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl OffsetSource for ScriptedOffsets {
    fn next_offset(&mut self) -> Offset {
        self.script.pop_front().unwrap_or(Offset::STAY)
    }
}
