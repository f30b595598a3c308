//! # Structures
//!
//! Multi-room walled buildings laid out by binary space partitioning.
//!
//! The structure's rectangle is split recursively into a [`PartitionTree`]. Each
//! leaf gets one room. Walking the tree in post-order, every internal node
//! tunnels between the representative rooms of its two children and adopts one
//! of them as its own representative. A child must therefore be resolved before
//! its parent, which is exactly what post-order guarantees.

use crate::{bresenham_line, DelveError, DelveResult, Position, Room, Tile, TileGrid};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters for partitioning a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Maximum recursion depth of the split
    pub max_depth: u32,
    pub min_leaf_width: u32,
    pub min_leaf_height: u32,
    /// Nodes more elongated than this are always cut across their long side
    pub max_aspect_ratio: f32,
    /// Target share of a leaf's width and height covered by its room
    pub floor_fraction: f32,
    /// Spread of the room share around `floor_fraction`
    pub variation: f32,
    /// Lower bound on the room share
    pub min_fraction: f32,
    /// Perimeter points tried when punching the outside door
    pub max_door_attempts: u32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_leaf_width: 5,
            min_leaf_height: 5,
            max_aspect_ratio: 1.5,
            floor_fraction: 0.8,
            variation: 0.2,
            min_fraction: 0.4,
            max_door_attempts: 1000,
        }
    }
}

impl PartitionConfig {
    pub fn validate(&self) -> DelveResult<()> {
        if self.min_leaf_width < 3 || self.min_leaf_height < 3 {
            return Err(DelveError::InvalidConfig(
                "partition leaves must be at least 3x3".to_string(),
            ));
        }
        if self.max_aspect_ratio < 1.0 {
            return Err(DelveError::InvalidConfig(format!(
                "aspect ratio bound {} is below 1",
                self.max_aspect_ratio
            )));
        }
        let in_unit = |value: f32| value > 0.0 && value <= 1.0;
        if !in_unit(self.floor_fraction) || !in_unit(self.min_fraction) || self.variation < 0.0 {
            return Err(DelveError::InvalidConfig(
                "room fractions must lie in (0, 1]".to_string(),
            ));
        }
        if self.max_door_attempts == 0 {
            return Err(DelveError::InvalidConfig(
                "max_door_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The range a leaf's room share is drawn from.
    fn fraction_range(&self) -> (f32, f32) {
        let low = (self.floor_fraction - self.variation).max(self.min_fraction);
        let high = (self.floor_fraction + self.variation).min(1.0).max(low);
        (low, high)
    }
}

/// One rectangle of the partition. Coordinates are local to the structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionNode {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Indices of the two halves, if this node was split
    pub children: Option<(usize, usize)>,
    /// The leaf's own room, or the representative adopted from a child
    pub room: Option<Room>,
}

impl PartitionNode {
    fn new(x: i32, y: i32, width: u32, height: u32, depth: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            depth,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-backed binary partition; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionTree {
    pub nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Recursively splits a `width` x `height` rectangle.
    ///
    /// A node stops splitting at `max_depth` or when neither side can hold two
    /// minimum-sized leaves. Long thin nodes are always cut across their long side.
    pub fn split(width: u32, height: u32, config: &PartitionConfig, rng: &mut StdRng) -> Self {
        let mut tree = Self {
            nodes: vec![PartitionNode::new(0, 0, width, height, 0)],
        };
        tree.split_node(0, config, rng);
        tree
    }

    fn split_node(&mut self, index: usize, config: &PartitionConfig, rng: &mut StdRng) {
        let node = self.nodes[index].clone();
        let (min_w, min_h) = (config.min_leaf_width, config.min_leaf_height);
        if node.depth >= config.max_depth || (node.width < 2 * min_w && node.height < 2 * min_h) {
            return;
        }

        let (w, h) = (node.width as f32, node.height as f32);
        let horizontal = if node.height < 2 * min_h {
            false
        } else if node.width < 2 * min_w {
            true
        } else if w > h * config.max_aspect_ratio {
            false
        } else if h > w * config.max_aspect_ratio {
            true
        } else {
            rng.gen_bool(0.5)
        };

        let depth = node.depth + 1;
        let (first, second) = if horizontal {
            let cut = rng.gen_range(min_h..=node.height - min_h);
            (
                PartitionNode::new(node.x, node.y, node.width, cut, depth),
                PartitionNode::new(node.x, node.y + cut as i32, node.width, node.height - cut, depth),
            )
        } else {
            let cut = rng.gen_range(min_w..=node.width - min_w);
            (
                PartitionNode::new(node.x, node.y, cut, node.height, depth),
                PartitionNode::new(node.x + cut as i32, node.y, node.width - cut, node.height, depth),
            )
        };

        let first_index = self.nodes.len();
        self.nodes.push(first);
        self.nodes.push(second);
        self.nodes[index].children = Some((first_index, first_index + 1));

        self.split_node(first_index, config, rng);
        self.split_node(first_index + 1, config, rng);
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    /// Node indices with every child listed before its parent.
    pub fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, false)];
        while let Some((index, expanded)) = stack.pop() {
            match self.nodes[index].children {
                Some((left, right)) if !expanded => {
                    stack.push((index, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                _ => order.push(index),
            }
        }
        order
    }

    pub fn leaves(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }
}

/// A generated structure: its tiles plus the layout that produced them.
#[derive(Debug, Clone)]
pub struct Structure {
    pub grid: TileGrid,
    pub tree: PartitionTree,
    /// Leaf rooms in post-order, local coordinates
    pub rooms: Vec<Room>,
    /// Where the door to the outside was punched
    pub door: Position,
    /// Centre of the root's representative room
    pub downstairs: Position,
}

impl Structure {
    /// Builds a `width` x `height` walled structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{PartitionConfig, Structure, TileKind};
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    /// let structure = Structure::generate(24, 20, &PartitionConfig::default(), &mut rng).unwrap();
    /// assert!(structure.grid.count_kind(TileKind::Floor) > 0);
    /// assert!(structure.grid.is_walkable(structure.downstairs));
    /// ```
    pub fn generate(
        width: u32,
        height: u32,
        config: &PartitionConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Self> {
        let mut grid = TileGrid::new(width, height, Tile::wall());
        let mut tree = PartitionTree::split(width, height, config, rng);
        let mut rooms = Vec::new();

        for index in tree.post_order() {
            let representative = match tree.nodes[index].children {
                None => {
                    let room = leaf_room(&tree.nodes[index], config, rng);
                    grid.carve_room(&room, Tile::floor())?;
                    rooms.push(room);
                    room
                }
                Some((left, right)) => {
                    let (Some(a), Some(b)) = (tree.nodes[left].room, tree.nodes[right].room) else {
                        return Err(DelveError::GenerationFailed(format!(
                            "partition node {} visited before its children",
                            index
                        )));
                    };
                    for pos in l_tunnel(a.center(), b.center(), rng) {
                        grid.set(pos, Tile::floor())?;
                    }
                    if rng.gen_bool(0.5) {
                        a
                    } else {
                        b
                    }
                }
            };
            tree.nodes[index].room = Some(representative);
        }

        let door = punch_door(&mut grid, config.max_door_attempts, rng)?;
        let downstairs = tree
            .root()
            .room
            .map(|room| room.center())
            .ok_or_else(|| DelveError::GenerationFailed("structure has no rooms".to_string()))?;

        debug!(
            "Built {}x{} structure with {} rooms, door at {:?}",
            width,
            height,
            rooms.len(),
            door
        );

        Ok(Self {
            grid,
            tree,
            rooms,
            door,
            downstairs,
        })
    }
}

fn leaf_room(node: &PartitionNode, config: &PartitionConfig, rng: &mut StdRng) -> Room {
    let (low, high) = config.fraction_range();
    let fraction = if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    };
    let scale = |side: u32| ((fraction * side as f32) as u32).clamp(2, side.max(2));
    Room::new(node.x, node.y, scale(node.width), scale(node.height))
}

/// Two straight legs through a randomly chosen corner.
fn l_tunnel(start: Position, end: Position, rng: &mut StdRng) -> Vec<Position> {
    let corner = if rng.gen_bool(0.5) {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };
    let mut cells = bresenham_line(start, corner);
    cells.extend(bresenham_line(corner, end).into_iter().skip(1));
    cells
}

/// Opens one perimeter cell that touches interior floor.
fn punch_door(grid: &mut TileGrid, attempts: u32, rng: &mut StdRng) -> DelveResult<Position> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    for _ in 0..attempts {
        let candidate = match rng.gen_range(0..4) {
            0 => Position::new(0, rng.gen_range(0..h)),
            1 => Position::new(rng.gen_range(0..w), 0),
            2 => Position::new(w - 1, rng.gen_range(0..h)),
            _ => Position::new(rng.gen_range(0..w), h - 1),
        };
        let touches_floor = candidate
            .cardinal_adjacent_positions()
            .into_iter()
            .any(|pos| grid.is_walkable(pos));
        if touches_floor {
            grid.set(candidate, Tile::floor())?;
            return Ok(candidate);
        }
    }
    Err(DelveError::GenerationFailed(format!(
        "no door to the outside after {} attempts",
        attempts
    )))
}
