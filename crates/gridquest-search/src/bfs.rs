use gridquest_core::{Cell, DirectionSet, GridMap};

use crate::control::{ExecutionControl, interrupted};
use crate::reconstruct::emit_path_marks;
use crate::searcher::{SearchResult, Searcher};
use crate::sink::{ExploreRole, VisualizationSink};

impl Searcher {
    /// Breadth-first search.
    ///
    /// The FIFO frontier processes cells in non-decreasing distance order,
    /// so the reported path is shortest in the unweighted grid. `visited`
    /// counts every enqueued cell (the end included) at the moment the end
    /// is popped.
    pub fn bfs<C: ExecutionControl, S: VisualizationSink>(
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

        let mut queue = std::mem::take(&mut self.queue);
        queue.clear();
        self.mark[si] = generation;
        self.parent[si] = usize::MAX;
        queue.push_back(si);
        let mut visited = 1usize;

        let result = 'search: loop {
            if interrupted(control) {
                break 'search SearchResult::Cancelled;
            }

            let Some(ci) = queue.pop_front() else {
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
                self.mark[ni] = generation;
                self.parent[ni] = ci;
                visited += 1;
                queue.push_back(ni);

                if nb != end {
                    sink.on_explore(nb, ExploreRole::Primary);
                }
                if interrupted(control) {
                    break 'search SearchResult::Cancelled;
                }
            }
        };

        self.queue = queue;
        result
    }
}
