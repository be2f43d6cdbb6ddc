use std::collections::BinaryHeap;

use gridquest_core::{Cell, DirectionSet, GridMap};

use crate::control::{ExecutionControl, interrupted};
use crate::distance::Heuristic;
use crate::reconstruct::emit_path_marks;
use crate::searcher::{HeapEntry, SearchResult, Searcher};
use crate::sink::{ExploreRole, VisualizationSink};

impl Searcher {
    /// A* search with uniform edge cost 1.
    ///
    /// The frontier is keyed by `(f = g + h, g)`; a cell may sit in the
    /// frontier several times with different scores and only the first pop
    /// is authoritative (lazy deletion). `visited` counts finalized cells,
    /// the end excluded.
    #[allow(clippy::too_many_arguments)]
    pub fn astar<C: ExecutionControl, S: VisualizationSink>(
        &mut self,
        map: &GridMap,
        start: Cell,
        end: Cell,
        directions: DirectionSet,
        heuristic: Heuristic,
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
            node.f = heuristic.estimate(start, end);
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

            // Skip stale entries.
            if self.nodes[ci].generation != generation || !self.nodes[ci].open {
                continue;
            }

            let current = self.cell(ci);
            if current == end {
                let path = self.assemble_path(ci, |i| self.nodes[i].parent);
                let path_len = path.len().saturating_sub(1);
                emit_path_marks(&path, control, sink);
                break 'search SearchResult::Found { visited, path_len };
            }

            self.nodes[ci].open = false;
            visited += 1;
            let current_g = self.nodes[ci].g;

            for &d in directions.offsets() {
                let nb = current + d;
                let Some(ni) = self.idx(nb) else {
                    continue;
                };
                if !map.is_open(nb) {
                    continue;
                }
                let tentative_g = current_g + 1;

                let node = &mut self.nodes[ni];
                if node.generation == generation && tentative_g >= node.g {
                    continue;
                }
                node.generation = generation;
                node.g = tentative_g;
                node.f = tentative_g + heuristic.estimate(nb, end);
                node.parent = ci;
                node.open = true;
                open.push(HeapEntry {
                    idx: ni,
                    f: node.f,
                    g: tentative_g,
                });

                if nb != end {
                    sink.on_explore(nb, ExploreRole::Primary);
                }
                if interrupted(control) {
                    break 'search SearchResult::Cancelled;
                }
            }
        }
    }
}
