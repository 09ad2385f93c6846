//! Moving the player around a floor.

use super::types::{Grid, Pos, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// WASD keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(Direction::Up),
            "s" => Some(Direction::Down),
            "a" => Some(Direction::Left),
            "d" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Blocked,
    Moved { to: Pos, tile: Tile },
}

impl MoveResult {
    pub fn reached_exit(&self) -> bool {
        matches!(self, MoveResult::Moved { tile: Tile::Exit, .. })
    }
}

/// Where a step from `from` lands. Walls and the map edge block.
pub fn try_move(grid: &Grid, from: Pos, direction: Direction) -> MoveResult {
    let (dr, dc) = direction.offset();
    let nr = from.0 as isize + dr;
    let nc = from.1 as isize + dc;
    if !grid.in_bounds(nr, nc) {
        return MoveResult::Blocked;
    }
    let to = (nr as usize, nc as usize);
    match grid.get(to) {
        Some(tile) if tile.is_walkable() => MoveResult::Moved { to, tile },
        _ => MoveResult::Blocked,
    }
}
