//! Floor grid data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate as `(row, col)`.
pub type Pos = (usize, usize);

/// Symbol drawn over the grid at the player's position. Never stored.
pub const PLAYER_SYMBOL: char = '@';

/// A stored tile. The player marker is an overlay, not a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
    /// Stairs to the next floor
    Exit,
    Chest,
}

impl Tile {
    pub fn symbol(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Exit => 'E',
            Tile::Chest => 'C',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Floor),
            'E' => Some(Tile::Exit),
            'C' => Some(Tile::Chest),
            _ => None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(self, Tile::Wall)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tile::Wall => "Wall, you cannot pass the wall.",
            Tile::Floor => "Road, you can just walk on the road.",
            Tile::Exit => "Exit, the stairs to the next floor (goal).",
            Tile::Chest => "Treasure Chest, you can get a reward or other things...?",
        }
    }
}

/// Why a set of rows could not become a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

/// Rectangular tile matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Tile>>,
}

impl Grid {
    /// Grid of `height` rows by `width` columns, all `fill`.
    pub fn filled(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            cells: vec![vec![fill; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height() && (col as usize) < self.width()
    }

    pub fn get(&self, (row, col): Pos) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Writes a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, (row, col): Pos, tile: Tile) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = tile;
        }
    }

    /// Positions holding `tile`, in row-major order.
    pub fn positions_of(&self, tile: Tile) -> Vec<Pos> {
        let mut found = Vec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if *cell == tile {
                    found.push((r, c));
                }
            }
        }
        found
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&t| t == tile).count())
            .sum()
    }

    /// Walkable orthogonal neighbors of `pos`.
    pub fn walkable_neighbors(&self, (row, col): Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(4);
        for (dr, dc) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if self.in_bounds(nr, nc) {
                let next = (nr as usize, nc as usize);
                if self.get(next).is_some_and(|t| t.is_walkable()) {
                    out.push(next);
                }
            }
        }
        out
    }

    /// One string per row, e.g. `"#.#C#"`.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Tile::symbol).collect())
            .collect()
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let mut cells = Vec::with_capacity(rows.len());
        let mut expected = None;
        for (r, line) in rows.iter().enumerate() {
            let row = line
                .as_ref()
                .chars()
                .enumerate()
                .map(|(c, symbol)| {
                    Tile::from_symbol(symbol).ok_or(GridError::UnknownSymbol {
                        symbol,
                        row: r,
                        col: c,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let width = *expected.get_or_insert(row.len());
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.push(row);
        }
        if cells.is_empty() || expected == Some(0) {
            return Err(GridError::Empty);
        }
        Ok(Self { cells })
    }

    /// Text rendering with the player overlay.
    pub fn render_with_player(&self, player: Pos) -> String {
        let mut out = String::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if (r, c) == player {
                    out.push(PLAYER_SYMBOL);
                } else {
                    out.push(tile.symbol());
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_symbols_round_trip() {
        for tile in [Tile::Wall, Tile::Floor, Tile::Exit, Tile::Chest] {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol(PLAYER_SYMBOL), None);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GridError::Empty));
        assert_eq!(Grid::from_rows(&["", ""]), Err(GridError::Empty));
        assert!(matches!(
            Grid::from_rows(&["###", "#."]),
            Err(GridError::Ragged { row: 1, .. })
        ));
        assert!(matches!(
            Grid::from_rows(&["###", "#@#", "###"]),
            Err(GridError::UnknownSymbol { symbol: '@', .. })
        ));
    }

    #[test]
    fn test_get_set_and_bounds() {
        let mut grid = Grid::filled(5, 3, Tile::Wall);
        assert_eq!((grid.width(), grid.height()), (5, 3));
        grid.set((1, 3), Tile::Chest);
        grid.set((9, 9), Tile::Floor);
        assert_eq!(grid.get((1, 3)), Some(Tile::Chest));
        assert_eq!(grid.get((9, 9)), None);
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 5));
        assert_eq!(grid.count(Tile::Chest), 1);
    }

    #[test]
    fn test_render_overlays_player() {
        let grid = Grid::from_rows(&["###", "#.E", "###"]).unwrap();
        assert_eq!(grid.render_with_player((1, 1)), "###\n#@E\n###\n");
        assert_eq!(grid.to_string(), "###\n#.E\n###\n");
    }

    #[test]
    fn test_walkable_neighbors() {
        let grid = Grid::from_rows(&["#####", "#..C#", "#.#E#", "#####"]).unwrap();
        let mut n = grid.walkable_neighbors((1, 2));
        n.sort_unstable();
        assert_eq!(n, vec![(1, 1), (1, 3)]);
        assert_eq!(grid.walkable_neighbors((2, 3)), vec![(1, 3)]);
    }
}
