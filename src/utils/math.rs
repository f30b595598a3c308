//! # Grid Mathematics
//!
//! Integer line drawing used by tunnel carving and ray-cast vision.

use crate::Position;

/// Returns the cells on the Bresenham line from `from` to `to`, both ends included.
///
/// # Examples
///
/// ```
/// use delve::{bresenham_line, Position};
///
/// let line = bresenham_line(Position::new(0, 0), Position::new(3, 1));
/// assert_eq!(line.first(), Some(&Position::new(0, 0)));
/// assert_eq!(line.last(), Some(&Position::new(3, 1)));
/// assert_eq!(line.len(), 4);
/// ```
pub fn bresenham_line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };

    let mut error = dx + dy;
    let mut current = from;
    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        line.push(current);
        if current == to {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            current.x += step_x;
        }
        if doubled <= dx {
            error += dx;
            current.y += step_y;
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_to_self_is_single_cell() {
        let pos = Position::new(4, 4);
        assert_eq!(bresenham_line(pos, pos), vec![pos]);
    }

    #[test]
    fn test_straight_and_diagonal_lines() {
        let horizontal = bresenham_line(Position::new(0, 2), Position::new(-3, 2));
        assert_eq!(horizontal.len(), 4);
        assert!(horizontal.iter().all(|p| p.y == 2));

        let diagonal = bresenham_line(Position::new(0, 0), Position::new(3, 3));
        assert_eq!(
            diagonal,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 2),
                Position::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_line_steps_are_adjacent() {
        let line = bresenham_line(Position::new(1, 7), Position::new(9, 2));
        for pair in line.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1);
        }
        assert_eq!(line.len(), 9);
    }
}
