//! # Pathfinding
//!
//! Movement cost fields and shortest-path search for AI movement.
//!
//! A [`PathCostField`] is built fresh every time an agent asks for a path: agents
//! move every turn, so a cached field would route through stale crowds. Cells
//! with cost 0 are impassable; any other cost is the price of entering the cell.

use crate::config::{CARDINAL_STEP_COST, CROWDING_PENALTY, DIAGONAL_STEP_COST};
use crate::{Direction, EntityId, GameMap, Position, TileGrid};
use pathfinding::prelude::dijkstra;

/// Per-cell entry cost derived from walkability and occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCostField {
    width: u32,
    height: u32,
    costs: Vec<u32>,
}

impl PathCostField {
    /// Cost 1 for walkable cells, 0 for everything else.
    pub fn from_grid(grid: &TileGrid) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut costs = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                costs.push(u32::from(grid.is_walkable(Position::new(x, y))));
            }
        }
        Self {
            width,
            height,
            costs,
        }
    }

    /// Builds the field for one path request on `map`.
    ///
    /// Every blocking agent other than `exclude` makes its cell more expensive
    /// by `crowding_penalty`, so paths bend around crowds but never dead-end on them.
    pub fn build(map: &GameMap, exclude: Option<EntityId>, crowding_penalty: u32) -> Self {
        let mut field = Self::from_grid(&map.grid);
        for agent in map.agents.iter() {
            if agent.blocks_movement && Some(agent.id) != exclude {
                field.add_crowding(agent.position, crowding_penalty);
            }
        }
        field
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let inside =
            pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height;
        inside.then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Entry cost of `pos`; 0 (impassable) outside the field.
    pub fn cost(&self, pos: Position) -> u32 {
        self.index(pos).map(|i| self.costs[i]).unwrap_or(0)
    }

    /// Adds `penalty` to a passable cell. Impassable cells stay impassable.
    pub fn add_crowding(&mut self, pos: Position, penalty: u32) {
        if let Some(i) = self.index(pos) {
            if self.costs[i] > 0 {
                self.costs[i] += penalty;
            }
        }
    }
}

/// Dijkstra search over a [`PathCostField`] with 8-way movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pathfinder {
    pub cardinal_cost: u32,
    pub diagonal_cost: u32,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(CARDINAL_STEP_COST, DIAGONAL_STEP_COST)
    }
}

impl Pathfinder {
    pub fn new(cardinal_cost: u32, diagonal_cost: u32) -> Self {
        Self {
            cardinal_cost,
            diagonal_cost,
        }
    }

    /// Shortest path from `start` to `goal`, excluding `start`.
    ///
    /// Empty when the goal is unreachable, impassable, or equal to the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{PathCostField, Pathfinder, Position, Tile, TileGrid};
    ///
    /// let grid = TileGrid::new(8, 3, Tile::floor());
    /// let field = PathCostField::from_grid(&grid);
    /// let path = Pathfinder::default().path(&field, Position::new(0, 1), Position::new(5, 1));
    /// assert_eq!(path.len(), 5);
    /// assert_eq!(path.last(), Some(&Position::new(5, 1)));
    /// ```
    pub fn path(&self, field: &PathCostField, start: Position, goal: Position) -> Vec<Position> {
        self.path_with_cost(field, start, goal)
            .map(|(path, _)| path)
            .unwrap_or_default()
    }

    /// Like [`Pathfinder::path`] but also returns the total cost.
    ///
    /// `None` when there is no path. A path to the start itself is `Some((vec![], 0))`.
    pub fn path_with_cost(
        &self,
        field: &PathCostField,
        start: Position,
        goal: Position,
    ) -> Option<(Vec<Position>, u32)> {
        if start == goal {
            return Some((Vec::new(), 0));
        }
        if field.cost(goal) == 0 || field.index(start).is_none() {
            return None;
        }

        let (mut path, cost) = dijkstra(
            &start,
            |&pos| self.successors(field, pos),
            |&pos| pos == goal,
        )?;
        path.remove(0);
        Some((path, cost))
    }

    fn successors(&self, field: &PathCostField, pos: Position) -> Vec<(Position, u32)> {
        Direction::all()
            .into_iter()
            .filter_map(|direction| {
                let next = pos + direction.to_delta();
                let cost = field.cost(next);
                if cost == 0 {
                    return None;
                }
                let step = if direction.is_diagonal() {
                    self.diagonal_cost
                } else {
                    self.cardinal_cost
                };
                Some((next, step * cost))
            })
            .collect()
    }
}
