//! Jump Point Search on uniform-cost grids, 4-directional movement only.
//!
//! JPS is an optimised A* variant: instead of enqueueing every neighbor it
//! "jumps" along straight rays and only adds *jump points* — cells where a
//! forced neighbor exposes a wall corner, or the end itself — to the
//! frontier. Cells jumped over are synthesized back into the path at
//! reconstruction time.

use std::collections::BinaryHeap;

use gridquest_core::{Cell, Dir, DirectionSet, GridMap};

use crate::control::{ExecutionControl, interrupted};
use crate::distance::manhattan;
use crate::reconstruct::emit_path_marks;
use crate::searcher::{HeapEntry, SearchResult, Searcher};
use crate::sink::{ExploreRole, VisualizationSink};

impl Searcher {
    /// Jump Point Search with the Manhattan heuristic.
    ///
    /// Callers must reject 8-direction requests before invoking (enforced
    /// by [`Searcher::run`]). `visited` counts finalized jump points, the
    /// end included.
    pub fn jps<C: ExecutionControl, S: VisualizationSink>(
        &mut self,
        map: &GridMap,
        start: Cell,
        end: Cell,
        control: &C,
        sink: &mut S,
    ) -> SearchResult {
        let generation = self.begin(map);
        let Some(si) = self.idx(start) else {
            return SearchResult::NotFound;
        };

        {
            let node = &mut self.nodes[si];
            node.g = 0;
            node.f = manhattan(start, end);
            node.parent = usize::MAX;
            node.generation = generation;
            node.open = true;
        }

        let mut open: BinaryHeap<HeapEntry> = BinaryHeap::new();
        open.push(HeapEntry {
            idx: si,
            f: self.nodes[si].f,
            g: 0,
        });
        let mut visited = 0usize;

        'search: loop {
            if interrupted(control) {
                break 'search SearchResult::Cancelled;
            }

            let Some(entry) = open.pop() else {
                break 'search SearchResult::NotFound;
            };
            let ci = entry.idx;
            if self.nodes[ci].generation != generation || !self.nodes[ci].open {
                continue;
            }

            self.nodes[ci].open = false;
            visited += 1;

            let current = self.cell(ci);
            if current == end {
                let path = self.assemble_path(ci, |i| self.nodes[i].parent);
                let path_len = path.len().saturating_sub(1);
                emit_path_marks(&path, control, sink);
                break 'search SearchResult::Found { visited, path_len };
            }

            let current_g = self.nodes[ci].g;
            for &d in DirectionSet::Four.offsets() {
                let Some(jump_point) = jump(map, current, d, end) else {
                    continue;
                };
                let Some(ji) = self.idx(jump_point) else {
                    continue;
                };
                // Finalized jump points are never revisited.
                if self.nodes[ji].generation == generation && !self.nodes[ji].open {
                    continue;
                }
                let tentative_g = current_g + manhattan(current, jump_point);
                let node = &mut self.nodes[ji];
                if node.generation == generation && tentative_g >= node.g {
                    continue;
                }
                node.generation = generation;
                node.g = tentative_g;
                node.f = tentative_g + manhattan(jump_point, end);
                node.parent = ci;
                node.open = true;
                open.push(HeapEntry {
                    idx: ji,
                    f: node.f,
                    g: tentative_g,
                });

                if jump_point != end {
                    sink.on_explore(jump_point, ExploreRole::Primary);
                }
                if interrupted(control) {
                    break 'search SearchResult::Cancelled;
                }
            }
        }
    }
}

/// Whether `cell` is an in-bounds wall. Out-of-bounds cells do not force.
#[inline]
fn is_wall(map: &GridMap, cell: Cell) -> bool {
    map.contains(cell) && !map.is_open(cell)
}

/// Step from `from` along `d` until a jump point is found.
///
/// A cell is a jump point if it is the end, or if a forced neighbor exists:
/// an open lateral cell whose corner one step back against the travel
/// direction is a wall. Horizontal rays additionally probe a vertical jump
/// from every cell they pass: without diagonals one axis has to play the
/// turning role, or open areas would hide every L-shaped route. Returns
/// `None` if the ray leaves the grid or hits a wall first.
fn jump(map: &GridMap, from: Cell, d: Dir, end: Cell) -> Option<Cell> {
    let mut c = from + d;
    loop {
        if !map.is_open(c) {
            return None;
        }
        if c == end {
            return Some(c);
        }

        if d.dr != 0 {
            // Vertical travel: look sideways along the row.
            for dc in [1, -1] {
                let side = Cell::new(c.row, c.col + dc);
                let corner = Cell::new(c.row - d.dr, c.col + dc);
                if map.is_open(side) && is_wall(map, corner) {
                    return Some(c);
                }
            }
        } else {
            // Horizontal travel: look sideways along the column.
            for dr in [1, -1] {
                let side = Cell::new(c.row + dr, c.col);
                let corner = Cell::new(c.row + dr, c.col - d.dc);
                if map.is_open(side) && is_wall(map, corner) {
                    return Some(c);
                }
            }
            // Turning point: a vertical jump from here succeeds.
            if jump(map, c, Dir::NORTH, end).is_some() || jump(map, c, Dir::SOUTH, end).is_some() {
                return Some(c);
            }
        }

        c = c + d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::test_maps::map_from;
    use crate::{EventLog, FreeRun, NoopSink};

    #[test]
    fn shortest_path_on_open_grid() {
        let map = GridMap::new(5, 5);
        let mut s = Searcher::new(5, 5);
        let result = s.jps(&map, Cell::new(0, 0), Cell::new(4, 4), &FreeRun, &mut NoopSink);
        let SearchResult::Found { visited, path_len } = result else {
            panic!("expected Found, got {result:?}");
        };
        assert_eq!(path_len, 8);
        assert!(visited <= 25);
    }

    #[test]
    fn matches_bfs_length_in_maze() {
        let map = map_from(&[
            "........",
            ".######.",
            ".#....#.",
            ".#.##...",
            "...##.#.",
            ".####.#.",
            "........",
        ]);
        let mut s = Searcher::new(7, 8);
        let start = Cell::new(2, 2);
        let end = Cell::new(6, 0);

        let bfs = s.bfs(&map, start, end, DirectionSet::Four, &FreeRun, &mut NoopSink);
        let jps = s.jps(&map, start, end, &FreeRun, &mut NoopSink);
        let SearchResult::Found { path_len: bfs_len, .. } = bfs else {
            panic!("bfs: {bfs:?}");
        };
        let SearchResult::Found { path_len: jps_len, .. } = jps else {
            panic!("jps: {jps:?}");
        };
        assert_eq!(jps_len, bfs_len);
    }

    #[test]
    fn path_marks_cover_jumped_over_cells() {
        // Open 1x6 corridor: the only jump point is the end, so every
        // intermediate cell comes from segment expansion.
        let map = map_from(&["......"]);
        let mut s = Searcher::new(1, 6);
        let mut log = EventLog::new();
        let result = s.jps(&map, Cell::new(0, 0), Cell::new(0, 5), &FreeRun, &mut log);
        assert_eq!(
            result,
            SearchResult::Found {
                visited: 2,
                path_len: 5
            }
        );
        assert_eq!(
            log.path_marks().collect::<Vec<_>>(),
            vec![
                Cell::new(0, 1),
                Cell::new(0, 2),
                Cell::new(0, 3),
                Cell::new(0, 4),
            ]
        );
    }

    #[test]
    fn forced_neighbor_stops_a_jump() {
        // Travelling east along the top row, the wall at (1,1) exposes a
        // corner once the ray passes it: (0,2) must become a jump point.
        let map = map_from(&[
            ".....",
            ".#...",
            ".....",
        ]);
        assert_eq!(
            jump(&map, Cell::new(0, 0), Dir::EAST, Cell::new(4, 4)),
            Some(Cell::new(0, 2))
        );
        // With no wall anywhere there is nothing to force and no turn that
        // reaches the (absent) end: the ray dies at the boundary.
        let empty = map_from(&["...", "...", "..."]);
        assert_eq!(
            jump(&empty, Cell::new(1, 0), Dir::EAST, Cell::new(9, 9)),
            None
        );
    }

    #[test]
    fn not_found_behind_solid_wall() {
        let map = map_from(&["...", "###", "..."]);
        let mut s = Searcher::new(3, 3);
        let result = s.jps(&map, Cell::new(0, 0), Cell::new(2, 2), &FreeRun, &mut NoopSink);
        assert_eq!(result, SearchResult::NotFound);
    }
}
