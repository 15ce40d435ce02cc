//! Shortest-path index over the board's cells.
//!
//! Nodes are cells; edges are local 4-neighbor steps with portal
//! substitution applied, exactly as [`CompositeBoard::adjacent`] reports
//! them. Portals are one-way, so the graph is directed. Distances towards
//! every castle are precomputed with a reverse breadth-first search, which
//! makes castle queries O(1).
//!
//! The graph is a snapshot: it is rebuilt by the board after every fill,
//! clone or inversion and never patched in place.

// Node indices are bounded by u16 block extents and fit in u32.
#![allow(clippy::cast_possible_truncation)]

use std::collections::{HashMap, VecDeque};

use crate::board::{Cell, CompositeBoard, Coord};

/// Sentinel for "not yet reached" inside the BFS distance arrays.
const UNVISITED: u32 = u32::MAX;

/// Directed adjacency index with cached castle distances.
#[derive(Debug, Clone, Default)]
pub struct PortalGraph {
    /// Number of block columns.
    block_cols: u16,
    /// Number of block rows.
    block_rows: u16,
    /// Width shared by every block.
    block_width: u16,
    /// Height shared by every block.
    block_height: u16,
    /// Whether each block slot (row-major) is filled.
    present: Vec<bool>,
    /// Outgoing edges per node.
    edges: Vec<Vec<u32>>,
    /// Distance from every node to a castle, keyed by castle cell.
    castle_distances: HashMap<Cell, Vec<u32>>,
}

impl PortalGraph {
    /// Snapshot the adjacency structure of a board.
    #[must_use]
    pub fn build(board: &CompositeBoard) -> Self {
        let Some((block_width, block_height)) = board.block_dimensions() else {
            return Self::default();
        };

        let mut graph = Self {
            block_cols: board.block_cols(),
            block_rows: board.block_rows(),
            block_width,
            block_height,
            present: Vec::new(),
            edges: Vec::new(),
            castle_distances: HashMap::new(),
        };

        let slots = usize::from(graph.block_cols) * usize::from(graph.block_rows);
        graph.present = (0..slots)
            .map(|slot| board.block(graph.slot_address(slot)).is_ok())
            .collect();
        graph.edges = vec![Vec::new(); slots * graph.cells_per_block()];

        for block in board.blocks() {
            for cell in block.cells() {
                let Some(from) = graph.node_index(cell) else {
                    continue;
                };
                // Cells come from the board itself, so adjacency cannot fail.
                let Ok(neighbors) = board.adjacent(cell) else {
                    continue;
                };
                graph.edges[from] = neighbors
                    .into_iter()
                    .filter_map(|n| graph.node_index(n))
                    .map(|idx| idx as u32)
                    .collect();
            }
        }

        let reverse = graph.reverse_edges();
        for castle in board.all_castles() {
            if let Some(target) = graph.node_index(castle) {
                let distances = bfs(&reverse, target);
                graph.castle_distances.insert(castle, distances);
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            castles = graph.castle_distances.len(),
            "portal graph built"
        );

        graph
    }

    /// Number of cells per block.
    fn cells_per_block(&self) -> usize {
        usize::from(self.block_width) * usize::from(self.block_height)
    }

    /// Block address of a row-major block slot.
    fn slot_address(&self, slot: usize) -> Coord {
        let cols = usize::from(self.block_cols);
        Coord::new((slot % cols) as u16 + 1, (slot / cols) as u16 + 1)
    }

    /// Node index of a cell, or `None` if the cell is not on the board.
    fn node_index(&self, cell: Cell) -> Option<usize> {
        if !cell.block.within(self.block_cols, self.block_rows)
            || !cell.local.within(self.block_width, self.block_height)
        {
            return None;
        }
        let slot = usize::from(cell.block.y - 1) * usize::from(self.block_cols)
            + usize::from(cell.block.x - 1);
        if !self.present.get(slot).copied().unwrap_or(false) {
            return None;
        }
        let local = usize::from(cell.local.y - 1) * usize::from(self.block_width)
            + usize::from(cell.local.x - 1);
        Some(slot * self.cells_per_block() + local)
    }

    /// Edges with every direction flipped.
    fn reverse_edges(&self) -> Vec<Vec<u32>> {
        let mut reverse = vec![Vec::new(); self.edges.len()];
        for (from, targets) in self.edges.iter().enumerate() {
            for &to in targets {
                reverse[to as usize].push(from as u32);
            }
        }
        reverse
    }

    /// Number of cells in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.present.iter().filter(|&&p| p).count() * self.cells_per_block()
    }

    /// Number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Length of a shortest path from `from` to `to`, counting every step,
    /// portal steps included, as one move.
    ///
    /// Returns `None` if either cell is not on the board or no path exists.
    #[must_use]
    pub fn distance(&self, from: Cell, to: Cell) -> Option<u32> {
        let source = self.node_index(from)?;
        let target = self.node_index(to)?;

        if let Some(cached) = self.castle_distances.get(&to) {
            return reachable(cached[source]);
        }
        if source == target {
            return Some(0);
        }

        let mut distance = vec![UNVISITED; self.edges.len()];
        let mut queue = VecDeque::new();
        distance[source] = 0;
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let next = distance[current] + 1;
            for &neighbor in &self.edges[current] {
                let neighbor = neighbor as usize;
                if distance[neighbor] != UNVISITED {
                    continue;
                }
                if neighbor == target {
                    return Some(next);
                }
                distance[neighbor] = next;
                queue.push_back(neighbor);
            }
        }

        None
    }

    /// Distance from `from` to the nearest of the given targets.
    #[must_use]
    pub fn distance_to_nearest(&self, from: Cell, targets: &[Cell]) -> Option<u32> {
        targets
            .iter()
            .filter_map(|&target| self.distance(from, target))
            .min()
    }
}

/// Breadth-first search over `edges` from `source`, returning the step count
/// to every node ([`UNVISITED`] where unreachable).
fn bfs(edges: &[Vec<u32>], source: usize) -> Vec<u32> {
    let mut distance = vec![UNVISITED; edges.len()];
    let mut queue = VecDeque::new();
    distance[source] = 0;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let next = distance[current] + 1;
        for &neighbor in &edges[current] {
            let neighbor = neighbor as usize;
            if distance[neighbor] == UNVISITED {
                distance[neighbor] = next;
                queue.push_back(neighbor);
            }
        }
    }

    distance
}

/// Convert a raw BFS distance into the public representation.
const fn reachable(distance: u32) -> Option<u32> {
    if distance == UNVISITED {
        None
    } else {
        Some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardItem, ItemGrid, PlayerType, Portal};

    fn cell(bx: u16, by: u16, x: u16, y: u16) -> Cell {
        Cell::new(Coord::new(bx, by), Coord::new(x, y))
    }

    /// Two 3x3 blocks side by side, connected only by portals.
    fn two_islands(portals: &[(Coord, Portal)]) -> CompositeBoard {
        let mut items = ItemGrid::new(6, 3).unwrap();
        for &(at, portal) in portals {
            items.set(at, BoardItem::Portal(portal)).unwrap();
        }
        items
            .set(Coord::new(6, 3), BoardItem::Castle { owner: PlayerType::Second })
            .unwrap();
        let bonus = ItemGrid::new(6, 3).unwrap();
        let mut board = CompositeBoard::new(2, 1).unwrap();
        board.fill(&items, &bonus).unwrap();
        board
    }

    #[test]
    fn test_empty_graph() {
        let graph = PortalGraph::default();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.distance(cell(1, 1, 1, 1), cell(1, 1, 1, 1)), None);
    }

    #[test]
    fn test_distance_within_block() {
        let board = two_islands(&[]);
        let graph = board.graph();
        assert_eq!(graph.node_count(), 18);
        assert_eq!(graph.distance(cell(1, 1, 1, 1), cell(1, 1, 3, 3)), Some(4));
        assert_eq!(graph.distance(cell(1, 1, 2, 2), cell(1, 1, 2, 2)), Some(0));
    }

    #[test]
    fn test_blocks_disconnected_without_portals() {
        // Blocks are only stitched together by portals.
        let board = two_islands(&[]);
        let graph = board.graph();
        assert_eq!(graph.distance(cell(1, 1, 3, 1), cell(2, 1, 1, 1)), None);
        assert_eq!(graph.distance(cell(1, 1, 1, 1), cell(2, 1, 3, 3)), None);
    }

    #[test]
    fn test_portal_counts_as_one_step() {
        // Portal at global (3,2) -> block (2,1) pos (1,2).
        let portal = Portal::new(Coord::new(3, 2), Coord::new(2, 1), Coord::new(1, 2));
        let board = two_islands(&[(Coord::new(3, 2), portal)]);
        let graph = board.graph();
        // (3,1) steps onto the portal and lands on (2,1)/(1,2) in one move.
        assert_eq!(graph.distance(cell(1, 1, 3, 1), cell(2, 1, 1, 2)), Some(1));
        // Castle at block (2,1) pos (3,3): 1 + |3-1| + |3-2| = 4.
        assert_eq!(graph.distance(cell(1, 1, 3, 1), cell(2, 1, 3, 3)), Some(4));
    }

    #[test]
    fn test_portals_are_one_way() {
        let portal = Portal::new(Coord::new(3, 2), Coord::new(2, 1), Coord::new(1, 2));
        let board = two_islands(&[(Coord::new(3, 2), portal)]);
        let graph = board.graph();
        assert_eq!(graph.distance(cell(2, 1, 1, 2), cell(1, 1, 1, 1)), None);
    }

    #[test]
    fn test_cached_castle_matches_bfs() {
        let portal = Portal::new(Coord::new(3, 2), Coord::new(2, 1), Coord::new(1, 2));
        let board = two_islands(&[(Coord::new(3, 2), portal)]);
        let graph = board.graph();
        let castle = cell(2, 1, 3, 3);
        let uncached = {
            let mut g = graph.clone();
            g.castle_distances.clear();
            g
        };
        for c in board.cells() {
            assert_eq!(graph.distance(c, castle), uncached.distance(c, castle), "{c}");
        }
    }

    #[test]
    fn test_distance_to_nearest() {
        let board = two_islands(&[]);
        let graph = board.graph();
        let targets = [cell(1, 1, 3, 3), cell(1, 1, 1, 2), cell(2, 1, 1, 1)];
        assert_eq!(graph.distance_to_nearest(cell(1, 1, 1, 1), &targets), Some(1));
        assert_eq!(graph.distance_to_nearest(cell(1, 1, 1, 1), &[]), None);
    }
}
