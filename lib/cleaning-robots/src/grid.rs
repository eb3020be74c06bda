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

//! The room: cell conditions and robot occupancy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::offsets::Offset;
use crate::{HashMap, Int};

/// A grid coordinate. `x` runs along the height, `y` along the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, in `0..m`.
    pub x: Int,
    /// Column, in `0..n`.
    pub y: Int,
}

impl Position {
    /// Create a position.
    pub const fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }

    /// The position reached by applying `offset`. May be outside any grid.
    pub fn offset(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Every robot starts here.
pub const START_POSITION: Position = Position::new(1, 1);

/// Condition of an entity on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    /// Was dirty, has been cleaned, and no robot is on it.
    Clean,

    /// A robot is here.
    RobotPresent,

    /// Dirty, waiting for a robot.
    Dirty,
}

/// What sits on one position. A dirt marker keeps its own condition; robots are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Occupants {
    marker: Option<Condition>,
    robots: usize,
}

impl Occupants {
    fn is_empty(&self) -> bool {
        self.marker.is_none() && self.robots == 0
    }

    fn has(&self, condition: Condition) -> bool {
        self.marker == Some(condition) || (condition == Condition::RobotPresent && self.robots > 0)
    }
}

/// Authoritative store of cell conditions and occupancy for an `m x n` non-wrapping grid.
///
/// Queries accept any position and report out-of-bounds positions as empty. Mutations panic on
/// out-of-bounds positions: callers always bounds-check first, so reaching one means the
/// simulation state is already inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    height: Int,
    width: Int,
    cells: HashMap<Position, Occupants>,
}

impl GridState {
    /// Create an empty grid of height `m` and width `n`.
    pub fn new(height: Int, width: Int) -> Result<Self, ConfigurationError> {
        if height <= 0 || width <= 0 {
            return Err(ConfigurationError::NonPositiveDimensions { height, width });
        }
        Ok(Self {
            height,
            width,
            cells: HashMap::default(),
        })
    }

    /// Grid height (`m`).
    pub fn height(&self) -> Int {
        self.height
    }

    /// Grid width (`n`).
    pub fn width(&self) -> Int {
        self.width
    }

    /// Number of cells, occupied or not.
    pub fn total_cells(&self) -> usize {
        self.height as usize * self.width as usize
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |x| (0..self.width).map(move |y| Position::new(x, y)))
    }

    /// `0 <= x < m` and `0 <= y < n`.
    pub fn in_bounds(&self, position: Position) -> bool {
        (0..self.height).contains(&position.x) && (0..self.width).contains(&position.y)
    }

    /// Put a dirty marker on an empty-of-dirt position. Only used during setup.
    pub fn place_dirt(&mut self, position: Position) -> Result<(), ConfigurationError> {
        if !self.in_bounds(position) {
            return Err(ConfigurationError::DirtOutOfBounds(position));
        }
        let occupants = self.cells.entry(position).or_default();
        if occupants.marker.is_some() {
            return Err(ConfigurationError::DuplicateDirt(position));
        }
        occupants.marker = Some(Condition::Dirty);
        Ok(())
    }

    /// Put a robot on `position`. Only used during setup, where robots may be stacked on the
    /// start cell.
    pub fn place_robot(&mut self, position: Position) {
        self.assert_in_bounds(position);
        self.cells.entry(position).or_default().robots += 1;
    }

    /// Set of conditions present at `position`. Empty when nothing is there.
    ///
    /// A dirt marker and robots can share a position, so the set may hold e.g. `Dirty` and
    /// `RobotPresent` together.
    pub fn condition_at(&self, position: Position) -> BTreeSet<Condition> {
        let mut conditions = BTreeSet::new();
        if let Some(occupants) = self.cells.get(&position) {
            conditions.extend(occupants.marker);
            if occupants.robots > 0 {
                conditions.insert(Condition::RobotPresent);
            }
        }
        conditions
    }

    /// True iff anything at `position` is in the `RobotPresent` condition.
    pub fn is_occupied_by_robot(&self, position: Position) -> bool {
        self.cells
            .get(&position)
            .map_or(false, |occupants| occupants.has(Condition::RobotPresent))
    }

    /// True iff the dirt marker at `position` is still dirty.
    pub fn is_dirty(&self, position: Position) -> bool {
        self.cells
            .get(&position)
            .map_or(false, |occupants| occupants.marker == Some(Condition::Dirty))
    }

    /// Number of robots standing on `position`.
    pub fn robots_at(&self, position: Position) -> usize {
        self.cells.get(&position).map_or(0, |occupants| occupants.robots)
    }

    /// Overwrite the condition of the dirt marker at `position`. Positions that never held dirt
    /// have no marker, and are left as they are.
    pub fn set_condition(&mut self, position: Position, condition: Condition) {
        self.assert_in_bounds(position);
        if let Some(marker) = self
            .cells
            .get_mut(&position)
            .and_then(|occupants| occupants.marker.as_mut())
        {
            *marker = condition;
        }
    }

    /// Relocate one robot from `from` to `to`.
    ///
    /// The caller must already have checked that `to` is in bounds and holds no robot.
    pub fn move_entity(&mut self, from: Position, to: Position) {
        self.assert_in_bounds(from);
        self.assert_in_bounds(to);
        assert!(
            !self.is_occupied_by_robot(to),
            "robot moved onto occupied position {}",
            to
        );

        let source = self
            .cells
            .get_mut(&from)
            .filter(|occupants| occupants.robots > 0);
        let Some(source) = source else {
            panic!("no robot to move at {}", from);
        };
        source.robots -= 1;
        if source.is_empty() {
            self.cells.remove(&from);
        }
        self.cells.entry(to).or_default().robots += 1;
    }

    /// Number of positions whose condition set contains `condition`.
    pub fn count_condition(&self, condition: Condition) -> usize {
        self.cells
            .values()
            .filter(|occupants| occupants.has(condition))
            .count()
    }

    /// Number of dirty positions, found by scanning every occupied position.
    pub fn remaining_dirty(&self) -> usize {
        self.count_condition(Condition::Dirty)
    }

    /// Number of positions holding at least one entity.
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// One condition per cell, row by row, for a renderer to colour. A robot hides the marker
    /// under it; `None` is an empty cell.
    pub fn condition_grid(&self) -> Vec<Vec<Option<Condition>>> {
        (0..self.height)
            .map(|x| {
                (0..self.width)
                    .map(|y| {
                        let occupants = self.cells.get(&Position::new(x, y))?;
                        if occupants.robots > 0 {
                            Some(Condition::RobotPresent)
                        } else {
                            occupants.marker
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn assert_in_bounds(&self, position: Position) {
        assert!(
            self.in_bounds(position),
            "out-of-bounds grid access at {} on a {}x{} grid",
            position,
            self.height,
            self.width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_5x5() -> GridState {
        GridState::new(5, 5).expect("grid")
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = grid_5x5();
        assert_eq!(grid.total_cells(), 25);
        assert_eq!(grid.occupied_count(), 0);
        for position in grid.positions() {
            assert!(grid.condition_at(position).is_empty(), "{}", position);
        }
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        assert_eq!(
            GridState::new(0, 3),
            Err(ConfigurationError::NonPositiveDimensions {
                height: 0,
                width: 3
            })
        );
    }

    #[test]
    fn test_in_bounds() {
        let grid = GridState::new(3, 4).expect("grid");
        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(2, 3)));
        assert!(!grid.in_bounds(Position::new(3, 0)));
        assert!(!grid.in_bounds(Position::new(0, 4)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_out_of_bounds_queries_are_empty() {
        let grid = grid_5x5();
        assert!(grid.condition_at(Position::new(-1, 7)).is_empty());
        assert!(!grid.is_occupied_by_robot(Position::new(9, 9)));
    }

    #[test]
    fn test_place_dirt_rejects_duplicates_and_out_of_bounds() {
        let mut grid = grid_5x5();
        let position = Position::new(2, 3);
        grid.place_dirt(position).expect("place dirt");
        assert_eq!(
            grid.place_dirt(position),
            Err(ConfigurationError::DuplicateDirt(position))
        );
        assert_eq!(
            grid.place_dirt(Position::new(5, 0)),
            Err(ConfigurationError::DirtOutOfBounds(Position::new(5, 0)))
        );
        assert_eq!(grid.remaining_dirty(), 1);
    }

    #[test]
    fn test_dirt_and_robot_share_start_cell() {
        let mut grid = grid_5x5();
        grid.place_dirt(START_POSITION).expect("place dirt");
        grid.place_robot(START_POSITION);
        grid.place_robot(START_POSITION);

        let conditions = grid.condition_at(START_POSITION);
        assert_eq!(
            conditions.into_iter().collect::<Vec<_>>(),
            vec![Condition::RobotPresent, Condition::Dirty]
        );
        assert!(grid.is_occupied_by_robot(START_POSITION));
        assert!(grid.is_dirty(START_POSITION));
        assert_eq!(grid.robots_at(START_POSITION), 2);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_cleaning_flips_dirty_marker() {
        let mut grid = grid_5x5();
        grid.place_dirt(START_POSITION).expect("place dirt");
        grid.place_robot(START_POSITION);
        assert_eq!(grid.remaining_dirty(), 1);

        grid.set_condition(START_POSITION, Condition::RobotPresent);
        assert_eq!(grid.remaining_dirty(), 0);
        assert!(!grid.is_dirty(START_POSITION));
    }

    #[test]
    fn test_cleaning_twice_is_idempotent() {
        let mut grid = grid_5x5();
        grid.place_dirt(Position::new(0, 0)).expect("place dirt");
        grid.place_dirt(Position::new(4, 4)).expect("place dirt");

        grid.set_condition(Position::new(0, 0), Condition::RobotPresent);
        let after_first = grid.remaining_dirty();
        grid.set_condition(Position::new(0, 0), Condition::RobotPresent);
        assert_eq!(grid.remaining_dirty(), after_first);
        grid.set_condition(Position::new(0, 0), Condition::Clean);
        grid.set_condition(Position::new(0, 0), Condition::Clean);
        assert_eq!(grid.remaining_dirty(), after_first);
        assert_eq!(after_first, 1);
    }

    #[test]
    fn test_set_condition_without_marker_does_nothing() {
        let mut grid = grid_5x5();
        grid.set_condition(Position::new(3, 3), Condition::Clean);
        assert!(grid.condition_at(Position::new(3, 3)).is_empty());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_move_entity_leaves_unmarked_cell_empty() {
        let mut grid = grid_5x5();
        grid.place_robot(START_POSITION);
        grid.move_entity(START_POSITION, Position::new(2, 2));

        assert!(grid.condition_at(START_POSITION).is_empty());
        assert!(grid.is_occupied_by_robot(Position::new(2, 2)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_move_entity_keeps_marker_behind() {
        let mut grid = grid_5x5();
        grid.place_dirt(START_POSITION).expect("place dirt");
        grid.place_robot(START_POSITION);
        grid.set_condition(START_POSITION, Condition::RobotPresent);

        grid.move_entity(START_POSITION, Position::new(0, 1));
        grid.set_condition(START_POSITION, Condition::Clean);

        assert_eq!(
            grid.condition_at(START_POSITION).into_iter().collect::<Vec<_>>(),
            vec![Condition::Clean]
        );
        assert!(!grid.is_occupied_by_robot(START_POSITION));
    }

    #[test]
    #[should_panic(expected = "occupied position")]
    fn test_move_onto_robot_panics() {
        let mut grid = grid_5x5();
        grid.place_robot(Position::new(0, 0));
        grid.place_robot(Position::new(0, 1));
        grid.move_entity(Position::new(0, 0), Position::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "out-of-bounds")]
    fn test_out_of_bounds_mutation_panics() {
        let mut grid = grid_5x5();
        grid.set_condition(Position::new(5, 5), Condition::Clean);
    }

    #[test]
    fn test_robot_and_condition_counts_agree_with_condition_at() {
        let mut grid = grid_5x5();
        for position in [(0, 0), (1, 1), (2, 3), (4, 4)] {
            grid.place_dirt(Position::new(position.0, position.1)).expect("place dirt");
        }
        grid.place_robot(START_POSITION);
        grid.place_robot(START_POSITION);
        grid.place_robot(Position::new(3, 3));
        grid.move_entity(START_POSITION, Position::new(2, 3));
        grid.set_condition(Position::new(2, 3), Condition::RobotPresent);
        grid.set_condition(Position::new(0, 0), Condition::Clean);

        for position in grid.positions() {
            assert_eq!(
                grid.is_occupied_by_robot(position),
                grid.condition_at(position).contains(&Condition::RobotPresent),
                "{}",
                position
            );
        }
        for condition in [Condition::Clean, Condition::RobotPresent, Condition::Dirty] {
            let expected = grid
                .positions()
                .filter(|&position| grid.condition_at(position).contains(&condition))
                .count();
            assert_eq!(grid.count_condition(condition), expected, "{:?}", condition);
        }
        assert_eq!(grid.count_condition(Condition::RobotPresent), 3);
        assert_eq!(grid.count_condition(Condition::Dirty), 2);
        assert_eq!(grid.count_condition(Condition::Clean), 1);
    }

    #[test]
    fn test_condition_grid() {
        let mut grid = GridState::new(2, 3).expect("grid");
        grid.place_dirt(Position::new(0, 2)).expect("place dirt");
        grid.place_dirt(Position::new(1, 1)).expect("place dirt");
        grid.place_robot(Position::new(1, 1));

        assert_eq!(
            grid.condition_grid(),
            vec![
                vec![None, None, Some(Condition::Dirty)],
                vec![None, Some(Condition::RobotPresent), None],
            ]
        );
    }
}
