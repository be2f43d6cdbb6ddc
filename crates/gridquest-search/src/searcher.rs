use std::collections::VecDeque;

use gridquest_core::{Cell, DirectionSet, GridMap, OutOfBounds};

use crate::distance::Heuristic;
use crate::{ExecutionControl, VisualizationSink};

/// Outcome of a search run. `Cancelled` is distinct from `NotFound`: a
/// stopped run says nothing about reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchResult {
    /// A path exists. `visited` follows each algorithm's own accounting;
    /// `path_len` is the number of steps (path cells minus one).
    Found { visited: usize, path_len: usize },
    /// The frontier was exhausted without reaching the end.
    NotFound,
    /// The run was stopped or superseded mid-way.
    Cancelled,
}

/// The five search variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Bfs,
    Dfs,
    BidirectionalBfs,
    AStar,
    Jps,
}

impl Algorithm {
    /// All variants, in menu order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::BidirectionalBfs,
        Algorithm::AStar,
        Algorithm::Jps,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::BidirectionalBfs => "Bi-BFS",
            Algorithm::AStar => "A*",
            Algorithm::Jps => "JPS",
        }
    }
}

/// Precondition failure reported by [`Searcher::run`] before a search
/// starts. Never raised mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error("invalid endpoints: {0}")]
    InvalidEndpoints(&'static str),
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(&'static str),
}

// ---------------------------------------------------------------------------
// Internal arena for priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) f: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            f: 0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Frontier entry ordered by `(f, g)` for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct HeapEntry {
    pub(crate) idx: usize,
    pub(crate) f: i32,
    pub(crate) g: i32,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, ties
        // broken by smallest g.
        other.f.cmp(&self.f).then(other.g.cmp(&self.g))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// Central coordinator for searches over a grid.
///
/// `Searcher` owns all per-run state (node arena, visited stamps, parent
/// links, frontier buffers) so that repeated runs incur no allocations after
/// warm-up. Stale state is invalidated lazily by bumping a generation
/// counter at the start of each run.
pub struct Searcher {
    rows: i32,
    cols: i32,
    pub(crate) generation: u32,
    // A* / JPS arena
    pub(crate) nodes: Vec<Node>,
    // Queue/stack algorithms: generation-stamped visited marks and parent
    // links. The second pair serves the bidirectional end-side frontier.
    pub(crate) mark: Vec<u32>,
    pub(crate) parent: Vec<usize>,
    pub(crate) mark2: Vec<u32>,
    pub(crate) parent2: Vec<usize>,
    // Reusable frontier buffers.
    pub(crate) queue: VecDeque<usize>,
    pub(crate) queue2: VecDeque<usize>,
    pub(crate) stack: Vec<usize>,
}

impl Searcher {
    /// Create a searcher for a `rows × cols` grid.
    pub fn new(rows: i32, cols: i32) -> Self {
        let len = (rows.max(0) as usize) * (cols.max(0) as usize);
        Self {
            rows,
            cols,
            generation: 0,
            nodes: vec![Node::default(); len],
            mark: vec![0; len],
            parent: vec![usize::MAX; len],
            mark2: vec![0; len],
            parent2: vec![usize::MAX; len],
            queue: VecDeque::new(),
            queue2: VecDeque::new(),
            stack: Vec::new(),
        }
    }

    /// Grid dimensions this searcher is currently sized for.
    pub fn dims(&self) -> (i32, i32) {
        (self.rows, self.cols)
    }

    /// Resize for a new grid.
    ///
    /// If the new cell count fits within existing capacity the arenas are
    /// kept and only the generation counter is bumped, so stale entries are
    /// ignored without reallocation. Otherwise everything is reallocated.
    pub fn set_dims(&mut self, rows: i32, cols: i32) {
        let new_len = (rows.max(0) as usize) * (cols.max(0) as usize);
        let capacity = self.nodes.len();
        self.rows = rows;
        self.cols = cols;

        if new_len <= capacity {
            self.generation = self.generation.wrapping_add(1);
            return;
        }

        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.mark.clear();
        self.mark.resize(new_len, 0);
        self.parent.clear();
        self.parent.resize(new_len, usize::MAX);
        self.mark2.clear();
        self.mark2.resize(new_len, 0);
        self.parent2.clear();
        self.parent2.resize(new_len, usize::MAX);
        self.generation = 0;
    }

    /// Make sure the arenas cover `map`, then start a fresh generation.
    pub(crate) fn begin(&mut self, map: &GridMap) -> u32 {
        if self.rows != map.rows() || self.cols != map.cols() {
            self.set_dims(map.rows(), map.cols());
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a cell to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, c: Cell) -> Option<usize> {
        if c.row < 0 || c.row >= self.rows || c.col < 0 || c.col >= self.cols {
            return None;
        }
        Some((c.row * self.cols + c.col) as usize)
    }

    /// Convert a flat index back to a cell.
    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> Cell {
        let i = idx as i32;
        Cell::new(i / self.cols, i % self.cols)
    }

    // -----------------------------------------------------------------------
    // Entry point
    // -----------------------------------------------------------------------

    /// Run one algorithm over `map` from `start` to `end`.
    ///
    /// Validates all preconditions synchronously before touching `control`
    /// or `sink`:
    ///
    /// - endpoints inside the grid ([`SearchError::OutOfBounds`]);
    /// - endpoints open and distinct ([`SearchError::InvalidEndpoints`]);
    /// - JPS only with [`DirectionSet::Four`]
    ///   ([`SearchError::UnsupportedConfiguration`]).
    ///
    /// `heuristic` is consumed by A*; JPS always uses Manhattan, the rest
    /// ignore it. `NotFound` and `Cancelled` are normal outcomes, not
    /// errors.
    #[allow(clippy::too_many_arguments)]
    pub fn run<C: ExecutionControl, S: VisualizationSink>(
        &mut self,
        algorithm: Algorithm,
        map: &GridMap,
        start: Cell,
        end: Cell,
        directions: DirectionSet,
        heuristic: Heuristic,
        control: &C,
        sink: &mut S,
    ) -> Result<SearchResult, SearchError> {
        map.state(start)?;
        map.state(end)?;
        if !map.is_open(start) || !map.is_open(end) {
            return Err(SearchError::InvalidEndpoints(
                "start and end must be open cells",
            ));
        }
        if start == end {
            return Err(SearchError::InvalidEndpoints("start and end must differ"));
        }
        if algorithm == Algorithm::Jps && directions.diagonal() {
            return Err(SearchError::UnsupportedConfiguration(
                "jump point search supports 4-direction movement only",
            ));
        }

        log::debug!(
            "{} run on {}x{} grid, {} -> {}",
            algorithm.name(),
            map.rows(),
            map.cols(),
            start,
            end
        );

        let result = match algorithm {
            Algorithm::Bfs => self.bfs(map, start, end, directions, control, sink),
            Algorithm::Dfs => self.dfs(map, start, end, directions, control, sink),
            Algorithm::BidirectionalBfs => {
                self.bidirectional_bfs(map, start, end, directions, control, sink)
            }
            Algorithm::AStar => self.astar(map, start, end, directions, heuristic, control, sink),
            Algorithm::Jps => self.jps(map, start, end, control, sink),
        };

        log::debug!("{} result: {:?}", algorithm.name(), result);
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod test_maps {
    use gridquest_core::{CellState, GridMap};

    /// Build a map from ASCII rows: `#` is a wall, anything else is open.
    pub(crate) fn map_from(rows: &[&str]) -> GridMap {
        let mut map = GridMap::new(rows.len() as i32, rows[0].len() as i32);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == '#' {
                    map.set_state(
                        gridquest_core::Cell::new(r as i32, c as i32),
                        CellState::Wall,
                    );
                }
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FreeRun, NoopSink};
    use gridquest_core::CellState;

    #[test]
    fn set_dims_smaller_preserves_capacity() {
        let mut s = Searcher::new(20, 20);
        let original_cap = s.nodes.len(); // 400

        s.set_dims(5, 5);
        assert_eq!(s.dims(), (5, 5));
        assert_eq!(s.nodes.len(), original_cap); // still 400
        assert!(s.generation > 0);
    }

    #[test]
    fn set_dims_larger_reallocates() {
        let mut s = Searcher::new(5, 5);
        let old_cap = s.nodes.len(); // 25

        s.set_dims(20, 20);
        assert_eq!(s.dims(), (20, 20));
        assert!(s.nodes.len() > old_cap);
        assert_eq!(s.nodes.len(), 400);
        assert_eq!(s.generation, 0);
    }

    #[test]
    fn run_rejects_out_of_bounds_endpoints() {
        let map = GridMap::new(5, 5);
        let mut s = Searcher::new(5, 5);
        let err = s
            .run(
                Algorithm::Bfs,
                &map,
                Cell::new(0, 0),
                Cell::new(5, 5),
                DirectionSet::Four,
                Heuristic::Manhattan,
                &FreeRun,
                &mut NoopSink,
            )
            .unwrap_err();
        assert!(matches!(err, SearchError::OutOfBounds(_)));
    }

    #[test]
    fn run_rejects_wall_and_equal_endpoints() {
        let mut map = GridMap::new(5, 5);
        map.set_state(Cell::new(4, 4), CellState::Wall);
        let mut s = Searcher::new(5, 5);

        let err = s
            .run(
                Algorithm::Bfs,
                &map,
                Cell::new(0, 0),
                Cell::new(4, 4),
                DirectionSet::Four,
                Heuristic::Manhattan,
                &FreeRun,
                &mut NoopSink,
            )
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidEndpoints(_)));

        let err = s
            .run(
                Algorithm::Bfs,
                &map,
                Cell::new(0, 0),
                Cell::new(0, 0),
                DirectionSet::Four,
                Heuristic::Manhattan,
                &FreeRun,
                &mut NoopSink,
            )
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidEndpoints(_)));
    }

    #[test]
    fn run_rejects_jps_with_diagonals() {
        let map = GridMap::new(5, 5);
        let mut s = Searcher::new(5, 5);
        let err = s
            .run(
                Algorithm::Jps,
                &map,
                Cell::new(0, 0),
                Cell::new(4, 4),
                DirectionSet::Eight,
                Heuristic::Manhattan,
                &FreeRun,
                &mut NoopSink,
            )
            .unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn run_adapts_to_map_dimensions() {
        let map = GridMap::new(7, 9);
        let mut s = Searcher::new(2, 2);
        let result = s
            .run(
                Algorithm::Bfs,
                &map,
                Cell::new(0, 0),
                Cell::new(6, 8),
                DirectionSet::Four,
                Heuristic::Manhattan,
                &FreeRun,
                &mut NoopSink,
            )
            .unwrap();
        assert_eq!(s.dims(), (7, 9));
        assert_eq!(
            result,
            SearchResult::Found {
                visited: 63,
                path_len: 14
            }
        );
    }
}
