//! Procedural floor generation: maze carving, spawn, exit and chests.

use super::types::{Grid, Pos, Tile};
use crate::core::constants::CHEST_PLACEMENT_ATTEMPTS;
use crate::core::dice::Dice;
use log::{debug, warn};
use std::collections::{HashSet, VecDeque};

/// A freshly generated floor.
#[derive(Debug, Clone)]
pub struct Floor {
    pub grid: Grid,
    pub spawn: Pos,
    pub exit: Pos,
    pub chests_placed: usize,
}

/// Carves a maze, picks a spawn, and places the exit and chests.
///
/// Returns `None` when the carved grid has no floor, or when its only
/// floor cell is the spawn and the exit has nowhere else to go.
pub fn generate_floor(
    width: usize,
    height: usize,
    chest_count: usize,
    dice: &mut impl Dice,
) -> Option<Floor> {
    let mut grid = carve_maze(width, height, dice);
    let spawn = choose_spawn(&grid, dice)?;
    let exit = place_exit(&mut grid, spawn)?;
    let forbidden = HashSet::from([spawn, exit]);
    let chests_placed = place_chests(&mut grid, chest_count, &forbidden, dice);
    debug!(
        "generated {}x{} floor: spawn {:?}, exit {:?}, {} chest(s)",
        width, height, spawn, exit, chests_placed
    );
    Some(Floor {
        grid,
        spawn,
        exit,
        chests_placed,
    })
}

/// Randomized depth-first carving (recursive backtracker).
///
/// Nodes are odd-coordinate cells, edges join cells two apart; carving an
/// edge opens the destination and the wall between. The result is a
/// perfect maze: one path between any two floor cells.
pub fn carve_maze(width: usize, height: usize, dice: &mut impl Dice) -> Grid {
    let mut grid = Grid::filled(width, height, Tile::Wall);
    if width < 3 || height < 3 {
        return grid;
    }

    let start = (random_odd(height, dice), random_odd(width, dice));
    grid.set(start, Tile::Floor);
    let mut stack: Vec<Pos> = vec![start];

    while let Some(&(r, c)) = stack.last() {
        let mut neighbors: Vec<Pos> = Vec::with_capacity(4);
        for (dr, dc) in [(-2isize, 0isize), (2, 0), (0, -2), (0, 2)] {
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            if grid.in_bounds(nr, nc) && grid.get((nr as usize, nc as usize)) == Some(Tile::Wall)
            {
                neighbors.push((nr as usize, nc as usize));
            }
        }

        if neighbors.is_empty() {
            // Backtrack
            stack.pop();
            continue;
        }

        dice.shuffle(&mut neighbors);
        let Some(next) = neighbors.pop() else {
            continue;
        };
        let between = ((r + next.0) / 2, (c + next.1) / 2);
        grid.set(between, Tile::Floor);
        grid.set(next, Tile::Floor);
        stack.push(next);
    }

    grid
}

/// Uniform odd index in `1..size`.
fn random_odd(size: usize, dice: &mut impl Dice) -> usize {
    let slots = (size / 2).max(1) as i32;
    (dice.roll_range(0, slots - 1) as usize) * 2 + 1
}

/// Uniformly random interior floor cell.
pub fn choose_spawn(grid: &Grid, dice: &mut impl Dice) -> Option<Pos> {
    let free: Vec<Pos> = grid
        .positions_of(Tile::Floor)
        .into_iter()
        .filter(|&(r, c)| r >= 1 && c >= 1 && r + 1 < grid.height() && c + 1 < grid.width())
        .collect();
    if free.is_empty() {
        warn!("no free cell to spawn on");
        return None;
    }
    let idx = dice.roll_range(0, free.len() as i32 - 1) as usize;
    free.get(idx).copied()
}

/// Breadth-first search from `start` over walkable tiles.
///
/// Returns the first cell reached at the greatest distance, so ties go to
/// whichever cell the frontier visited first.
pub fn farthest_from(grid: &Grid, start: Pos) -> Pos {
    let mut dist = vec![vec![usize::MAX; grid.width()]; grid.height()];
    let mut queue = VecDeque::from([start]);
    if let Some(cell) = dist.get_mut(start.0).and_then(|row| row.get_mut(start.1)) {
        *cell = 0;
    } else {
        return start;
    }

    let mut far = start;
    let mut far_dist = 0;
    while let Some(pos) = queue.pop_front() {
        let d = dist[pos.0][pos.1];
        if d > far_dist {
            far = pos;
            far_dist = d;
        }
        for next in grid.walkable_neighbors(pos) {
            if dist[next.0][next.1] == usize::MAX {
                dist[next.0][next.1] = d + 1;
                queue.push_back(next);
            }
        }
    }
    far
}

/// Every walkable cell reachable from `start`.
pub fn reachable_from(grid: &Grid, start: Pos) -> HashSet<Pos> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for next in grid.walkable_neighbors(pos) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn manhattan(a: Pos, b: Pos) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Floor cells on the ring just inside the outer wall, in scan order:
/// for each column the top then bottom cell, then for each row the left
/// then right cell.
fn edge_candidates(grid: &Grid) -> Vec<Pos> {
    let (h, w) = (grid.height(), grid.width());
    let mut candidates = Vec::new();
    if h < 3 || w < 3 {
        return candidates;
    }
    let mut push = |pos: Pos| {
        if grid.get(pos) == Some(Tile::Floor) {
            candidates.push(pos);
        }
    };
    for c in 1..w - 1 {
        push((1, c));
        push((h - 2, c));
    }
    for r in 1..h - 1 {
        push((r, 1));
        push((r, w - 2));
    }
    candidates
}

/// Marks the exit and returns its position.
///
/// Finds the BFS-farthest cell from `spawn`, then picks the edge floor
/// cell (other than the spawn) with the greatest Manhattan distance to
/// it; the earliest candidate in scan order wins ties. Without any edge
/// candidate the farthest cell itself becomes the exit. The exit never
/// lands on the spawn: if nothing else is reachable the grid is left
/// untouched and `None` is returned.
pub fn place_exit(grid: &mut Grid, spawn: Pos) -> Option<Pos> {
    let far = farthest_from(grid, spawn);
    let mut candidates: Vec<Pos> = edge_candidates(grid)
        .into_iter()
        .filter(|&p| p != spawn)
        .collect();
    // Stable sort keeps scan order among equals.
    candidates.sort_by(|a, b| manhattan(*b, far).cmp(&manhattan(*a, far)));

    let exit = match candidates.first() {
        Some(&pos) => pos,
        None if far != spawn => {
            warn!("no edge cell for the exit, using farthest cell {:?}", far);
            far
        }
        None => {
            warn!("no cell other than the spawn {:?} for the exit", spawn);
            return None;
        }
    };
    grid.set(exit, Tile::Exit);
    Some(exit)
}

/// Drops up to `count` chests on random interior floor cells outside
/// `forbidden`. Gives up after a fixed number of attempts, so a crowded
/// grid gets fewer chests instead of a hang. Returns how many were placed.
pub fn place_chests(
    grid: &mut Grid,
    count: usize,
    forbidden: &HashSet<Pos>,
    dice: &mut impl Dice,
) -> usize {
    let (h, w) = (grid.height(), grid.width());
    if h < 3 || w < 3 {
        return 0;
    }

    let mut placed = 0;
    let mut tries = 0;
    while placed < count && tries < CHEST_PLACEMENT_ATTEMPTS {
        tries += 1;
        let r = dice.roll_range(1, h as i32 - 2) as usize;
        let c = dice.roll_range(1, w as i32 - 2) as usize;
        if grid.get((r, c)) != Some(Tile::Floor) || forbidden.contains(&(r, c)) {
            continue;
        }
        grid.set((r, c), Tile::Chest);
        placed += 1;
    }

    if placed < count {
        warn!(
            "placed {} of {} chests after {} attempts",
            placed, count, tries
        );
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::{RandDice, ScriptedDice};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_dice(seed: u64) -> RandDice<ChaCha8Rng> {
        RandDice::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_carve_opens_every_odd_cell() {
        let mut dice = create_test_dice(7);
        let grid = carve_maze(11, 11, &mut dice);
        for r in (1..11).step_by(2) {
            for c in (1..11).step_by(2) {
                assert_eq!(grid.get((r, c)), Some(Tile::Floor), "({r}, {c}) not carved");
            }
        }
        // Outer border stays solid
        for i in 0..11 {
            assert_eq!(grid.get((0, i)), Some(Tile::Wall));
            assert_eq!(grid.get((10, i)), Some(Tile::Wall));
            assert_eq!(grid.get((i, 0)), Some(Tile::Wall));
            assert_eq!(grid.get((i, 10)), Some(Tile::Wall));
        }
    }

    #[test]
    fn test_carve_is_a_perfect_maze() {
        // A spanning tree over 25 cells has 24 edges, so 25 + 24 floor tiles.
        for seed in 0..20 {
            let mut dice = create_test_dice(seed);
            let grid = carve_maze(11, 11, &mut dice);
            assert_eq!(grid.count(Tile::Floor), 49, "seed {seed}");
            let reach = reachable_from(&grid, (1, 1));
            assert_eq!(reach.len(), 49, "seed {seed}");
        }
    }

    #[test]
    fn test_carve_tiny_grid() {
        let mut dice = create_test_dice(1);
        let grid = carve_maze(3, 3, &mut dice);
        assert_eq!(grid.positions_of(Tile::Floor), vec![(1, 1)]);
        let grid = carve_maze(2, 2, &mut dice);
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_farthest_from_corridor() {
        let grid = Grid::from_rows(&["#######", "#.....#", "#######"]).unwrap();
        assert_eq!(farthest_from(&grid, (1, 1)), (1, 5));
        assert_eq!(farthest_from(&grid, (1, 3)), (1, 1));
    }

    #[test]
    fn test_place_exit_prefers_edge_far_from_bfs_end() {
        let mut grid = Grid::from_rows(&[
            "#######", //
            "#.....#", //
            "#.###.#", //
            "#.#...#", //
            "#######",
        ])
        .unwrap();
        // BFS end is (3,3). The spawn (1,1) ties (1,5) on distance but is
        // never a candidate.
        let exit = place_exit(&mut grid, (1, 1)).unwrap();
        assert_eq!(exit, (1, 5));
        assert_eq!(grid.get(exit), Some(Tile::Exit));
        assert_eq!(grid.count(Tile::Exit), 1);
    }

    #[test]
    fn test_place_exit_falls_back_to_farthest() {
        // The only edge floor cell is the spawn, so the BFS end takes the exit.
        let mut grid = Grid::from_rows(&[
            "#######", //
            "###.###", //
            "###.###", //
            "###.###", //
            "#######", //
            "#######", //
            "#######",
        ])
        .unwrap();
        assert_eq!(place_exit(&mut grid, (1, 3)), Some((3, 3)));
        assert_eq!(grid.get((3, 3)), Some(Tile::Exit));
        assert_eq!(grid.get((1, 3)), Some(Tile::Floor));
    }

    #[test]
    fn test_place_exit_never_lands_on_spawn() {
        let mut grid = Grid::from_rows(&["###", "#.#", "###"]).unwrap();
        assert_eq!(place_exit(&mut grid, (1, 1)), None);
        assert_eq!(grid.get((1, 1)), Some(Tile::Floor));
        assert_eq!(grid.count(Tile::Exit), 0);
    }

    #[test]
    fn test_generate_floor_without_room_for_an_exit() {
        // A 3x3 carve has a single floor cell, which becomes the spawn.
        let mut dice = ScriptedDice::new();
        assert!(generate_floor(3, 3, 1, &mut dice).is_none());
    }

    #[test]
    fn test_place_chests_respects_forbidden_and_walls() {
        let mut grid = Grid::from_rows(&["#####", "#...#", "#####"]).unwrap();
        let forbidden = HashSet::from([(1, 1)]);
        let mut dice = create_test_dice(3);
        let placed = place_chests(&mut grid, 10, &forbidden, &mut dice);
        assert_eq!(placed, 2);
        assert_eq!(grid.get((1, 1)), Some(Tile::Floor));
        assert_eq!(grid.count(Tile::Chest), 2);
    }

    #[test]
    fn test_place_chests_gives_up_on_saturated_grid() {
        let mut grid = Grid::filled(5, 5, Tile::Wall);
        // Scripted dice always land on (1, 1), a wall.
        let mut dice = ScriptedDice::new();
        assert_eq!(place_chests(&mut grid, 3, &HashSet::new(), &mut dice), 0);
        assert_eq!(grid.count(Tile::Chest), 0);
    }

    #[test]
    fn test_generate_floor_invariants() {
        for seed in 0..50 {
            let mut dice = create_test_dice(seed);
            let floor = generate_floor(11, 11, 2, &mut dice).unwrap();
            assert_ne!(floor.spawn, floor.exit, "seed {seed}");
            assert_eq!(floor.grid.count(Tile::Exit), 1);
            assert_eq!(floor.grid.get(floor.spawn), Some(Tile::Floor));
            assert!(floor.chests_placed <= 2);
            assert_eq!(floor.grid.count(Tile::Chest), floor.chests_placed);
        }
    }
}
