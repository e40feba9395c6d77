//! Hex-grid pathfinding using the A* algorithm.
//!
//! Every step costs one. The heuristic is the Manhattan distance on raw
//! coordinates, which is only an approximation on a hex grid; paths are
//! therefore short but not guaranteed shortest.
//!
//! The open list is a binary min-heap on `f`. Each search node remembers its
//! heap position and a coordinate map locates nodes, so a decrease-key never
//! scans the heap.

use std::collections::HashMap;

use crate::constants::UnitKind;
use crate::grid::{Coord, World};

/// Node in the A* search.
#[derive(Debug, Clone)]
struct PathNode {
    coord: Coord,
    parent: Option<usize>,
    g: i32,
    f: i32,
    open: bool,
    closed: bool,
    heap_pos: usize,
}

/// State of a single search. Lives only for one [`find_path`] call.
#[derive(Debug, Default)]
struct Search {
    /// Node arena.
    nodes: Vec<PathNode>,
    /// Node arena index per coordinate.
    lookup: HashMap<Coord, usize>,
    /// Binary min-heap of open node indices.
    heap: Vec<usize>,
}

impl Search {
    fn less(&self, i: usize, j: usize) -> bool {
        self.nodes[self.heap[i]].f < self.nodes[self.heap[j]].f
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.nodes[self.heap[i]].heap_pos = i;
        self.nodes[self.heap[j]].heap_pos = j;
    }

    fn sift_up(&mut self, mut j: usize) {
        while j > 0 {
            let i = (j - 1) / 2;
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            j = i;
        }
    }

    /// Returns whether the element moved.
    fn sift_down(&mut self, start: usize, n: usize) -> bool {
        let mut i = start;
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let mut j = left;
            let right = left + 1;
            if right < n && self.less(right, left) {
                j = right;
            }
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            i = j;
        }
        i > start
    }

    fn push(&mut self, node: usize) {
        let pos = self.heap.len();
        self.nodes[node].heap_pos = pos;
        self.nodes[node].open = true;
        self.heap.push(node);
        self.sift_up(pos);
    }

    fn pop(&mut self) -> Option<usize> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        self.sift_down(0, last);
        let node = self.heap.pop()?;
        self.nodes[node].open = false;
        Some(node)
    }

    /// Restore heap order after the node at `pos` changed its score.
    fn fix(&mut self, pos: usize) {
        if !self.sift_down(pos, self.heap.len()) {
            self.sift_up(pos);
        }
    }

    fn add_node(&mut self, coord: Coord, parent: Option<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(PathNode {
            coord,
            parent,
            g: 0,
            f: 0,
            open: false,
            closed: false,
            heap_pos: 0,
        });
        self.lookup.insert(coord, id);
        id
    }

    fn reconstruct(&self, mut node: usize) -> Vec<Coord> {
        let mut path = vec![self.nodes[node].coord];
        while let Some(parent) = self.nodes[node].parent {
            path.push(self.nodes[parent].coord);
            node = parent;
        }
        path.reverse();
        path
    }
}

/// Whether a unit of `kind` may path through `coord`.
///
/// Occupied tiles block every kind.
fn can_pass(world: &World, kind: UnitKind, coord: Coord) -> bool {
    world
        .tile(coord)
        .is_some_and(|t| t.unit.is_none() && kind.can_enter(t.terrain))
}

/// Find a path from `start` to `goal` for a unit of `kind`.
///
/// The goal tile itself is always considered passable. Returns the tiles
/// from start to goal inclusive, or `None` if either end is off the grid or
/// no path exists.
#[must_use]
pub fn find_path(world: &World, kind: UnitKind, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if !world.contains(start) || !world.contains(goal) {
        return None;
    }

    let mut search = Search::default();
    let start_node = search.add_node(start, None);
    search.push(start_node);

    while let Some(current) = search.pop() {
        search.nodes[current].closed = true;
        let current_coord = search.nodes[current].coord;

        if current_coord == goal {
            return Some(search.reconstruct(current));
        }

        let g = search.nodes[current].g + 1;
        for neighbor in world.neighbors(current_coord) {
            if neighbor != goal && !can_pass(world, kind, neighbor) {
                continue;
            }

            let existing = search.lookup.get(&neighbor).copied();
            if existing.is_some_and(|n| search.nodes[n].closed) {
                continue;
            }
            if existing.is_some_and(|n| g >= search.nodes[n].g) {
                continue;
            }

            let node = existing.unwrap_or_else(|| search.add_node(neighbor, Some(current)));
            let entry = &mut search.nodes[node];
            entry.parent = Some(current);
            entry.g = g;
            entry.f = g + neighbor.manhattan(goal);

            if entry.open {
                let pos = entry.heap_pos;
                search.fix(pos);
            } else {
                search.push(node);
            }
        }
    }

    tracing::trace!(?start, ?goal, ?kind, "no path found");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Terrain, RED};

    fn walled_world() -> World {
        let mut world = World::new(10, 10);
        world.tile_mut(Coord::new(1, 0)).unwrap().terrain = Terrain::Mountain;
        world.tile_mut(Coord::new(1, 1)).unwrap().terrain = Terrain::Water;
        world.tile_mut(Coord::new(1, 2)).unwrap().terrain = Terrain::Structure;
        world
    }

    #[test]
    fn test_tank_detours_around_wall() {
        let world = walled_world();
        let path = find_path(&world, UnitKind::Tank, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(
            path,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(0, 3),
                Coord::new(1, 3),
                Coord::new(2, 2),
                Coord::new(2, 1),
                Coord::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_soldier_crosses_wall() {
        let world = walled_world();
        let path =
            find_path(&world, UnitKind::Soldier, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Coord::new(0, 0));
        assert_eq!(path[2], Coord::new(2, 0));
    }

    #[test]
    fn test_path_is_connected() {
        let world = walled_world();
        let path =
            find_path(&world, UnitKind::Artillery, Coord::new(0, 0), Coord::new(9, 9)).unwrap();
        for pair in path.windows(2) {
            assert!(world.is_neighbor(pair[0], pair[1]));
        }
        assert_eq!(path.last(), Some(&Coord::new(9, 9)));
    }

    #[test]
    fn test_path_to_self() {
        let world = World::new(3, 3);
        let path = find_path(&world, UnitKind::Tank, Coord::new(1, 1), Coord::new(1, 1)).unwrap();
        assert_eq!(path, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn test_no_path_when_enclosed() {
        let mut world = World::new(10, 10);
        for c in world.neighbors(Coord::new(5, 5)) {
            world.tile_mut(c).unwrap().terrain = Terrain::Water;
        }
        assert!(find_path(&world, UnitKind::Tank, Coord::new(5, 5), Coord::new(0, 0)).is_none());
        assert!(find_path(&world, UnitKind::Soldier, Coord::new(5, 5), Coord::new(0, 0)).is_some());
    }

    #[test]
    fn test_units_block_but_goal_is_passable() {
        let mut world = World::new(1, 3);
        world.spawn_unit(Coord::new(0, 1), RED, UnitKind::Tank);
        world.spawn_unit(Coord::new(0, 2), RED, UnitKind::Tank);
        assert!(find_path(&world, UnitKind::Soldier, Coord::new(0, 0), Coord::new(0, 2)).is_none());
        let path =
            find_path(&world, UnitKind::Soldier, Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_off_grid_endpoints() {
        let world = World::new(3, 3);
        assert!(find_path(&world, UnitKind::Tank, Coord::new(0, 0), Coord::new(5, 5)).is_none());
        assert!(find_path(&world, UnitKind::Tank, Coord::new(-1, 0), Coord::new(1, 1)).is_none());
    }
}
