use gridquest_core::{Cell, DirectionSet, GridMap};

use crate::control::{ExecutionControl, interrupted};
use crate::reconstruct::emit_path_marks;
use crate::searcher::{SearchResult, Searcher};
use crate::sink::{ExploreRole, VisualizationSink};

impl Searcher {
    /// Depth-first search. No shortest-path guarantee: the path shape
    /// follows the expansion order and the stack's LIFO order.
    ///
    /// Unlike the other variants, the goal is recognized the moment it is
    /// discovered as a neighbor, before it would be pushed; the end cell is
    /// never added to the visited set and the reported count credits it as
    /// one extra visit. A pop of the goal (only possible if it was seeded)
    /// reports the plain count.
    pub fn dfs<C: ExecutionControl, S: VisualizationSink>(
        &mut self,
        map: &GridMap,
        start: Cell,
        end: Cell,
        directions: DirectionSet,
        control: &C,
        sink: &mut S,
    ) -> SearchResult {
        let generation = self.begin(map);
        let Some(si) = self.idx(start) else {
            return SearchResult::NotFound;
        };

        let mut stack = std::mem::take(&mut self.stack);
        stack.clear();
        self.mark[si] = generation;
        self.parent[si] = usize::MAX;
        stack.push(si);
        let mut visited = 1usize;

        let result = 'search: loop {
            if interrupted(control) {
                break 'search SearchResult::Cancelled;
            }

            let Some(ci) = stack.pop() else {
                break 'search SearchResult::NotFound;
            };
            let current = self.cell(ci);

            if current == end {
                let path = self.assemble_path(ci, |i| self.parent[i]);
                let path_len = path.len().saturating_sub(1);
                emit_path_marks(&path, control, sink);
                break 'search SearchResult::Found { visited, path_len };
            }

            for &d in directions.offsets() {
                let nb = current + d;
                let Some(ni) = self.idx(nb) else {
                    continue;
                };
                if !map.is_open(nb) || self.mark[ni] == generation {
                    continue;
                }
                self.parent[ni] = ci;

                // Short-circuit on discovery of the goal.
                if nb == end {
                    let path = self.assemble_path(ni, |i| self.parent[i]);
                    let path_len = path.len().saturating_sub(1);
                    emit_path_marks(&path, control, sink);
                    break 'search SearchResult::Found {
                        visited: visited + 1,
                        path_len,
                    };
                }

                self.mark[ni] = generation;
                visited += 1;
                stack.push(ni);
                sink.on_explore(nb, ExploreRole::Primary);
                if interrupted(control) {
                    break 'search SearchResult::Cancelled;
                }
            }
        };

        self.stack = stack;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::test_maps::map_from;
    use crate::{FreeRun, NoopSink};

    #[test]
    fn path_never_shorter_than_bfs() {
        let map = map_from(&[
            ".....",
            ".###.",
            ".....",
            ".###.",
            ".....",
        ]);
        let mut s = Searcher::new(5, 5);
        let start = Cell::new(0, 0);
        let end = Cell::new(4, 4);

        let bfs = s.bfs(&map, start, end, DirectionSet::Four, &FreeRun, &mut NoopSink);
        let dfs = s.dfs(&map, start, end, DirectionSet::Four, &FreeRun, &mut NoopSink);
        let SearchResult::Found { path_len: bfs_len, .. } = bfs else {
            panic!("bfs: {bfs:?}");
        };
        let SearchResult::Found { path_len: dfs_len, .. } = dfs else {
            panic!("dfs: {dfs:?}");
        };
        assert!(dfs_len >= bfs_len);
    }

    #[test]
    fn goal_discovery_credits_one_extra_visit() {
        // Single corridor: every open cell is visited on the way, and the
        // end is credited on discovery without entering the visited set.
        let map = map_from(&["....."]);
        let mut s = Searcher::new(1, 5);
        let result = s.dfs(
            &map,
            Cell::new(0, 0),
            Cell::new(0, 4),
            DirectionSet::Four,
            &FreeRun,
            &mut NoopSink,
        );
        // Cells (0,0)..(0,3) enter the visited set; discovery of (0,4) adds
        // its extra credit.
        assert_eq!(
            result,
            SearchResult::Found {
                visited: 5,
                path_len: 4
            }
        );
    }

    #[test]
    fn not_found_behind_solid_wall() {
        let map = map_from(&["..#..", "..#..", "..#.."]);
        let mut s = Searcher::new(3, 5);
        let result = s.dfs(
            &map,
            Cell::new(0, 0),
            Cell::new(0, 4),
            DirectionSet::Four,
            &FreeRun,
            &mut NoopSink,
        );
        assert_eq!(result, SearchResult::NotFound);
    }
}
