use gridquest_core::{Cell, DirectionSet, GridMap};

use crate::control::{ExecutionControl, interrupted};
use crate::reconstruct::{emit_path_marks, expand_segments};
use crate::searcher::{SearchResult, Searcher};
use crate::sink::{ExploreRole, VisualizationSink};

enum Outcome {
    Cancelled,
    Exhausted,
    Met(usize),
}

impl Searcher {
    /// Bidirectional breadth-first search.
    ///
    /// Two independent FIFO frontiers grow from `start` and `end`, each
    /// with its own visited marks and parent links, serviced one
    /// pop-and-expand step per loop iteration (start side first). The
    /// frontiers meet when one side pops a cell the other side has already
    /// visited. `visited` is reported as the total number of recorded
    /// parent links plus one, covering both partial trees.
    pub fn bidirectional_bfs<C: ExecutionControl, S: VisualizationSink>(
        &mut self,
        map: &GridMap,
        start: Cell,
        end: Cell,
        directions: DirectionSet,
        control: &C,
        sink: &mut S,
    ) -> SearchResult {
        let generation = self.begin(map);
        let (Some(si), Some(ei)) = (self.idx(start), self.idx(end)) else {
            return SearchResult::NotFound;
        };

        let mut queue = std::mem::take(&mut self.queue);
        let mut queue2 = std::mem::take(&mut self.queue2);
        queue.clear();
        queue2.clear();

        self.mark[si] = generation;
        self.parent[si] = usize::MAX;
        queue.push_back(si);

        self.mark2[ei] = generation;
        self.parent2[ei] = usize::MAX;
        queue2.push_back(ei);

        let mut parents_start = 0usize;
        let mut parents_end = 0usize;

        let outcome = 'search: loop {
            if queue.is_empty() || queue2.is_empty() {
                break 'search Outcome::Exhausted;
            }
            if interrupted(control) {
                break 'search Outcome::Cancelled;
            }

            // Start-side step.
            if let Some(ci) = queue.pop_front() {
                if self.mark2[ci] == generation {
                    break 'search Outcome::Met(ci);
                }
                let current = self.cell(ci);
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
                    parents_start += 1;
                    queue.push_back(ni);

                    if nb != start && nb != end {
                        sink.on_explore(nb, ExploreRole::Primary);
                    }
                    if interrupted(control) {
                        break 'search Outcome::Cancelled;
                    }
                }
            }

            // End-side step.
            if let Some(ci) = queue2.pop_front() {
                if self.mark[ci] == generation {
                    break 'search Outcome::Met(ci);
                }
                let current = self.cell(ci);
                for &d in directions.offsets() {
                    let nb = current + d;
                    let Some(ni) = self.idx(nb) else {
                        continue;
                    };
                    if !map.is_open(nb) || self.mark2[ni] == generation {
                        continue;
                    }
                    self.mark2[ni] = generation;
                    self.parent2[ni] = ci;
                    parents_end += 1;
                    queue2.push_back(ni);

                    if nb != start && nb != end {
                        sink.on_explore(nb, ExploreRole::Secondary);
                    }
                    if interrupted(control) {
                        break 'search Outcome::Cancelled;
                    }
                }
            }
        };

        self.queue = queue;
        self.queue2 = queue2;

        match outcome {
            Outcome::Cancelled => SearchResult::Cancelled,
            Outcome::Exhausted => SearchResult::NotFound,
            Outcome::Met(mi) => {
                // Start-side chain up to the meeting point, then the
                // end-side chain onward to the end.
                let mut chain = Vec::new();
                let mut i = mi;
                loop {
                    chain.push(self.cell(i));
                    let p = self.parent[i];
                    if p == usize::MAX {
                        break;
                    }
                    i = p;
                }
                chain.reverse();
                let mut i = self.parent2[mi];
                while i != usize::MAX {
                    chain.push(self.cell(i));
                    i = self.parent2[i];
                }

                let path = expand_segments(&chain);
                let path_len = path.len().saturating_sub(1);
                emit_path_marks(&path, control, sink);
                SearchResult::Found {
                    visited: parents_start + parents_end + 1,
                    path_len,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::test_maps::map_from;
    use crate::{EventLog, FreeRun, NoopSink, SinkEvent};

    #[test]
    fn matches_bfs_path_length() {
        let map = map_from(&[
            ".......",
            ".#####.",
            ".......",
            ".#####.",
            ".......",
        ]);
        let mut s = Searcher::new(5, 7);
        let start = Cell::new(0, 0);
        let end = Cell::new(4, 6);

        let bfs = s.bfs(&map, start, end, DirectionSet::Four, &FreeRun, &mut NoopSink);
        let bi = s.bidirectional_bfs(&map, start, end, DirectionSet::Four, &FreeRun, &mut NoopSink);
        let SearchResult::Found { path_len: bfs_len, .. } = bfs else {
            panic!("bfs: {bfs:?}");
        };
        let SearchResult::Found { path_len: bi_len, .. } = bi else {
            panic!("bibfs: {bi:?}");
        };
        assert_eq!(bi_len, bfs_len);
    }

    #[test]
    fn secondary_role_only_from_end_side() {
        let map = GridMap::new(3, 5);
        let mut s = Searcher::new(3, 5);
        let mut log = EventLog::new();
        s.bidirectional_bfs(
            &map,
            Cell::new(1, 0),
            Cell::new(1, 4),
            DirectionSet::Four,
            &FreeRun,
            &mut log,
        );
        let mut primary = 0;
        let mut secondary = 0;
        for e in &log.events {
            if let SinkEvent::Explore { role, .. } = e {
                match role {
                    ExploreRole::Primary => primary += 1,
                    ExploreRole::Secondary => secondary += 1,
                }
            }
        }
        assert!(primary > 0);
        assert!(secondary > 0);
    }

    #[test]
    fn visited_counts_both_parent_trees() {
        // Straight corridor of length 5: the two frontiers split the work
        // and the meeting cell receives a parent link from both sides.
        let map = map_from(&["....."]);
        let mut s = Searcher::new(1, 5);
        let result = s.bidirectional_bfs(
            &map,
            Cell::new(0, 0),
            Cell::new(0, 4),
            DirectionSet::Four,
            &FreeRun,
            &mut NoopSink,
        );
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
        let result = s.bidirectional_bfs(
            &map,
            Cell::new(0, 0),
            Cell::new(2, 4),
            DirectionSet::Four,
            &FreeRun,
            &mut NoopSink,
        );
        assert_eq!(result, SearchResult::NotFound);
    }
}
