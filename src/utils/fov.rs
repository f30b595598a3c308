//! # Field of View
//!
//! Computes which cells are visible from an origin given a transparency mask.
//!
//! Two algorithms are provided:
//! - [`FovAlgorithm::SymmetricShadowcast`]: precise and symmetric (if A sees B,
//!   B sees A). Used for the player.
//! - [`FovAlgorithm::Basic`]: Bresenham rays to the edge of the sight square.
//!   Cheaper and a little ragged, used for monsters.
//!
//! Both are pure functions of their inputs. Cells outside the mask are never
//! visible and are treated as opaque.

use crate::{bresenham_line, Mask, Position};
use serde::{Deserialize, Serialize};

/// Which visibility algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FovAlgorithm {
    SymmetricShadowcast,
    Basic,
}

/// Computes the visibility mask seen from `origin`.
///
/// The result has the same shape as `transparency`. A cell is visible when it
/// lies within `radius` (Euclidean) of the origin and has an unobstructed line
/// of sight; opaque cells bounding the view are visible themselves. An origin
/// outside the mask sees nothing.
///
/// # Examples
///
/// ```
/// use delve::{compute_fov, FovAlgorithm, Mask, Position};
///
/// let open = Mask::new(11, 11, true);
/// let visible = compute_fov(&open, Position::new(5, 5), 3, FovAlgorithm::SymmetricShadowcast);
/// assert!(visible.get(Position::new(5, 2)));
/// assert!(!visible.get(Position::new(5, 1)));
/// ```
pub fn compute_fov(
    transparency: &Mask,
    origin: Position,
    radius: u32,
    algorithm: FovAlgorithm,
) -> Mask {
    let mut visible = Mask::new(transparency.width(), transparency.height(), false);
    if !visible.mark(origin) {
        return visible;
    }

    match algorithm {
        FovAlgorithm::SymmetricShadowcast => shadowcast(transparency, origin, radius, &mut visible),
        FovAlgorithm::Basic => raycast(transparency, origin, radius, &mut visible),
    }

    visible
}

fn within_radius(origin: Position, pos: Position, radius: u32) -> bool {
    let dx = (pos.x - origin.x) as i64;
    let dy = (pos.y - origin.y) as i64;
    let radius = radius as i64;
    dx * dx + dy * dy <= radius * radius
}

fn raycast(transparency: &Mask, origin: Position, radius: u32, visible: &mut Mask) {
    let r = radius as i32;
    if r == 0 {
        return;
    }

    let mut edge = Vec::with_capacity(8 * radius as usize);
    for x in origin.x - r..=origin.x + r {
        edge.push(Position::new(x, origin.y - r));
        edge.push(Position::new(x, origin.y + r));
    }
    for y in origin.y - r + 1..origin.y + r {
        edge.push(Position::new(origin.x - r, y));
        edge.push(Position::new(origin.x + r, y));
    }

    for target in edge {
        for pos in bresenham_line(origin, target).into_iter().skip(1) {
            if !transparency.in_bounds(pos) || !within_radius(origin, pos, radius) {
                break;
            }
            visible.mark(pos);
            if !transparency.get(pos) {
                break;
            }
        }
    }
}

/// A slope `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy)]
struct Slope {
    num: i64,
    den: i64,
}

impl Slope {
    fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Slope through the near edge of a cell at (`depth`, `col`).
    fn of_tile(depth: i64, col: i64) -> Self {
        Self::new(2 * col - 1, 2 * depth)
    }
}

#[derive(Debug, Clone, Copy)]
struct Row {
    depth: i64,
    start: Slope,
    end: Slope,
}

impl Row {
    /// First column: `depth * start` rounded half up.
    fn min_col(&self) -> i64 {
        (2 * self.depth * self.start.num + self.start.den).div_euclid(2 * self.start.den)
    }

    /// Last column: `depth * end` rounded half down.
    fn max_col(&self) -> i64 {
        -(-(2 * self.depth * self.end.num - self.end.den)).div_euclid(2 * self.end.den)
    }

    fn is_symmetric(&self, col: i64) -> bool {
        col * self.start.den >= self.depth * self.start.num
            && col * self.end.den <= self.depth * self.end.num
    }

    fn next(&self) -> Row {
        Row {
            depth: self.depth + 1,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    fn transform(self, origin: Position, depth: i64, col: i64) -> Position {
        let (depth, col) = (depth as i32, col as i32);
        match self {
            Quadrant::North => Position::new(origin.x + col, origin.y - depth),
            Quadrant::South => Position::new(origin.x + col, origin.y + depth),
            Quadrant::East => Position::new(origin.x + depth, origin.y + col),
            Quadrant::West => Position::new(origin.x - depth, origin.y + col),
        }
    }
}

fn shadowcast(transparency: &Mask, origin: Position, radius: u32, visible: &mut Mask) {
    for quadrant in [Quadrant::North, Quadrant::East, Quadrant::South, Quadrant::West] {
        let mut rows = vec![Row {
            depth: 1,
            start: Slope::new(-1, 1),
            end: Slope::new(1, 1),
        }];

        while let Some(mut row) = rows.pop() {
            if row.depth > radius as i64 {
                continue;
            }

            // Some(true) when the previous cell in this row was opaque
            let mut previous_wall: Option<bool> = None;
            for col in row.min_col()..=row.max_col() {
                let pos = quadrant.transform(origin, row.depth, col);
                let wall = !transparency.get(pos);

                if (wall || row.is_symmetric(col)) && within_radius(origin, pos, radius) {
                    visible.mark(pos);
                }
                if previous_wall == Some(true) && !wall {
                    row.start = Slope::of_tile(row.depth, col);
                }
                if previous_wall == Some(false) && wall {
                    let mut next = row.next();
                    next.end = Slope::of_tile(row.depth, col);
                    rows.push(next);
                }
                previous_wall = Some(wall);
            }

            if previous_wall == Some(false) {
                rows.push(row.next());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(width: u32, height: u32) -> Mask {
        let mut mask = Mask::new(width, height, true);
        for x in 0..width as i32 {
            mask.set(Position::new(x, 0), false).unwrap();
            mask.set(Position::new(x, height as i32 - 1), false).unwrap();
        }
        for y in 0..height as i32 {
            mask.set(Position::new(0, y), false).unwrap();
            mask.set(Position::new(width as i32 - 1, y), false).unwrap();
        }
        mask
    }

    #[test]
    fn test_origin_always_visible() {
        let opaque = Mask::new(5, 5, false);
        for algorithm in [FovAlgorithm::SymmetricShadowcast, FovAlgorithm::Basic] {
            let visible = compute_fov(&opaque, Position::new(2, 2), 4, algorithm);
            assert!(visible.get(Position::new(2, 2)));
            // Surrounding walls are lit but nothing beyond them
            assert!(visible.get(Position::new(3, 2)));
            assert!(!visible.get(Position::new(4, 2)));
        }
    }

    #[test]
    fn test_origin_outside_grid_sees_nothing() {
        let open = Mask::new(5, 5, true);
        let visible = compute_fov(&open, Position::new(-1, 7), 8, FovAlgorithm::SymmetricShadowcast);
        assert_eq!(visible.count(), 0);
    }

    #[test]
    fn test_origin_on_boundary_does_not_fault() {
        let open = Mask::new(6, 4, true);
        for algorithm in [FovAlgorithm::SymmetricShadowcast, FovAlgorithm::Basic] {
            let visible = compute_fov(&open, Position::new(0, 0), 10, algorithm);
            assert_eq!(visible.count(), 24);
            let visible = compute_fov(&open, Position::new(5, 3), 10, algorithm);
            assert_eq!(visible.count(), 24);
        }
    }

    #[test]
    fn test_radius_limits_view() {
        let open = Mask::new(21, 21, true);
        let origin = Position::new(10, 10);
        for algorithm in [FovAlgorithm::SymmetricShadowcast, FovAlgorithm::Basic] {
            let visible = compute_fov(&open, origin, 4, algorithm);
            assert!(visible.get(Position::new(14, 10)));
            assert!(!visible.get(Position::new(15, 10)));
            assert!(!visible.get(Position::new(14, 14)));
            assert!(visible.positions().all(|p| within_radius(origin, p, 4)));
        }
    }

    #[test]
    fn test_shadowcast_open_room_sees_everything_in_range() {
        let mask = room(9, 9);
        let visible = compute_fov(&mask, Position::new(4, 4), 10, FovAlgorithm::SymmetricShadowcast);
        assert_eq!(visible.count(), 81);
    }

    #[test]
    fn test_pillar_casts_shadow() {
        let mut mask = room(15, 9);
        mask.set(Position::new(5, 4), false).unwrap();
        for algorithm in [FovAlgorithm::SymmetricShadowcast, FovAlgorithm::Basic] {
            let visible = compute_fov(&mask, Position::new(3, 4), 12, algorithm);
            assert!(visible.get(Position::new(5, 4)), "pillar itself is visible");
            assert!(!visible.get(Position::new(6, 4)));
            assert!(!visible.get(Position::new(9, 4)));
            assert!(visible.get(Position::new(9, 1)));
        }
    }

    #[test]
    fn test_shadowcast_is_symmetric_between_floor_cells() {
        let mut mask = room(12, 10);
        for pos in [Position::new(4, 3), Position::new(7, 6), Position::new(5, 5)] {
            mask.set(pos, false).unwrap();
        }
        let floor: Vec<Position> = mask.positions().collect();
        for &a in &floor {
            let from_a = compute_fov(&mask, a, 20, FovAlgorithm::SymmetricShadowcast);
            for &b in &floor {
                if from_a.get(b) {
                    let from_b = compute_fov(&mask, b, 20, FovAlgorithm::SymmetricShadowcast);
                    assert!(from_b.get(a), "{:?} sees {:?} but not the reverse", a, b);
                }
            }
        }
    }

    #[test]
    fn test_fov_is_deterministic() {
        let mut mask = room(20, 12);
        mask.set(Position::new(8, 5), false).unwrap();
        mask.set(Position::new(9, 7), false).unwrap();
        for algorithm in [FovAlgorithm::SymmetricShadowcast, FovAlgorithm::Basic] {
            let first = compute_fov(&mask, Position::new(4, 6), 9, algorithm);
            let second = compute_fov(&mask, Position::new(4, 6), 9, algorithm);
            assert_eq!(first, second);
        }
    }
}
