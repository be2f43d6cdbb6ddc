//! Shared path reconstruction.
//!
//! Walks a parent chain backward from the end cell, expands any jumped-over
//! straight segments (only produced by JPS), and emits `on_path_mark` events
//! for the interior cells. The search outcome is finalized before emission
//! begins: a stop request during emission truncates the event stream but
//! never changes the reported result or path length.

use gridquest_core::Cell;

use crate::control::{ExecutionControl, interrupted};
use crate::distance::manhattan;
use crate::searcher::Searcher;
use crate::sink::VisualizationSink;

impl Searcher {
    /// Collect the recorded chain from `goal` back to the chain's root,
    /// expand gap segments, and return the full path root..=goal.
    pub(crate) fn assemble_path(
        &self,
        goal: usize,
        parent_of: impl Fn(usize) -> usize,
    ) -> Vec<Cell> {
        let mut chain = Vec::new();
        let mut i = goal;
        loop {
            chain.push(self.cell(i));
            let p = parent_of(i);
            if p == usize::MAX {
                break;
            }
            i = p;
        }
        chain.reverse();
        expand_segments(&chain)
    }
}

/// Insert the intermediate cells of any straight-line run whose recorded
/// endpoints are more than one step apart.
pub(crate) fn expand_segments(chain: &[Cell]) -> Vec<Cell> {
    if chain.len() <= 1 {
        return chain.to_vec();
    }
    let mut path = Vec::with_capacity(chain.len());
    for w in chain.windows(2) {
        let (a, b) = (w[0], w[1]);
        path.push(a);
        if manhattan(a, b) > 1 {
            let step = (b - a).signum();
            let mut c = a + step;
            while c != b {
                path.push(c);
                c = c + step;
            }
        }
    }
    path.push(*chain.last().unwrap());
    path
}

/// Emit `on_path_mark` for every path cell except the endpoints, start side
/// first, honoring `control` between cells.
pub(crate) fn emit_path_marks<C: ExecutionControl, S: VisualizationSink>(
    path: &[Cell],
    control: &C,
    sink: &mut S,
) {
    if path.len() < 3 {
        return;
    }
    for &cell in &path[1..path.len() - 1] {
        if interrupted(control) {
            return;
        }
        sink.on_path_mark(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventLog;
    use crate::FreeRun;

    #[test]
    fn expand_segments_fills_straight_runs() {
        let chain = [Cell::new(2, 1), Cell::new(2, 4), Cell::new(5, 4)];
        let path = expand_segments(&chain);
        assert_eq!(
            path,
            vec![
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(2, 3),
                Cell::new(2, 4),
                Cell::new(3, 4),
                Cell::new(4, 4),
                Cell::new(5, 4),
            ]
        );
    }

    #[test]
    fn expand_segments_keeps_unit_steps() {
        let chain = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];
        assert_eq!(expand_segments(&chain), chain.to_vec());
    }

    #[test]
    fn result_finalized_before_marks_are_emitted() {
        use crate::searcher::test_maps::map_from;
        use crate::{ExploreRole, RunCoordinator, SearchResult, VisualizationSink};
        use gridquest_core::DirectionSet;

        // Stop the run on the first path mark: the remaining marks are
        // dropped but the already-computed result keeps its full length.
        struct StopOnFirstMark {
            coord: RunCoordinator,
            marks: usize,
        }
        impl VisualizationSink for StopOnFirstMark {
            fn on_explore(&mut self, _cell: Cell, _role: ExploreRole) {}
            fn on_path_mark(&mut self, _cell: Cell) {
                self.marks += 1;
                self.coord.supersede();
            }
        }

        let map = map_from(&["......"]);
        let mut s = crate::Searcher::new(1, 6);
        let coord = RunCoordinator::new();
        let control = coord.begin_run();
        let mut sink = StopOnFirstMark {
            coord: coord.clone(),
            marks: 0,
        };
        let result = s.bfs(
            &map,
            Cell::new(0, 0),
            Cell::new(0, 5),
            DirectionSet::Four,
            &control,
            &mut sink,
        );
        assert!(matches!(result, SearchResult::Found { path_len: 5, .. }));
        assert_eq!(sink.marks, 1);
    }

    #[test]
    fn emit_skips_endpoints() {
        let path = [
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(0, 3),
        ];
        let mut log = EventLog::new();
        emit_path_marks(&path, &FreeRun, &mut log);
        assert_eq!(
            log.path_marks().collect::<Vec<_>>(),
            vec![Cell::new(0, 1), Cell::new(0, 2)]
        );
    }
}
