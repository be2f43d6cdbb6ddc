//! Maze generation on a [`GridMap`].
//!
//! The generator carves a perfect maze over the chamber lattice (cells with
//! odd row and odd column) with an iterative recursive-backtracker, then
//! optionally braids loops into it by knocking out dead-end walls, then
//! places or re-attaches the start/end cells.

use gridquest_core::{Cell, CellState, Dir, GridMap};
use rand::Rng;
use rand::RngExt;
use rand::seq::{IndexedRandom, SliceRandom};

/// The four two-step chamber offsets.
const CARVE_DIRS: [Dir; 4] = [
    Dir::new(-2, 0),
    Dir::new(2, 0),
    Dir::new(0, -2),
    Dir::new(0, 2),
];

/// Generation failure. Reported synchronously, before any mutation is
/// observable as a finished maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error("grid {rows}x{cols} has no chamber cell to carve from")]
    GridTooSmall { rows: i32, cols: i32 },
    #[error("no open cell available for an endpoint")]
    NoOpenCells,
}

/// Tuning knobs for [`MazeGen::generate`].
#[derive(Debug, Clone)]
pub struct MazeConfig {
    /// Probability of opening each braidable wall. `0.0` keeps the maze a
    /// perfect tree.
    pub braid: f64,
    /// Skip braid openings that would complete a 2×2 open block.
    pub avoid_2x2: bool,
    /// Skip braid openings that would drop an adjacent wall's wall-degree
    /// to ≤ 1, stranding a wall fragment.
    pub avoid_stranding: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            braid: 0.18,
            avoid_2x2: true,
            avoid_stranding: true,
        }
    }
}

/// One backtracker stack frame: a chamber and its remaining directions.
struct Frame {
    cell: Cell,
    dirs: [Dir; 4],
    next: usize,
}

/// Maze generator owning a map and a random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
    pub map: GridMap,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator over the given map.
    pub fn with_map(map: GridMap, rng: R) -> Self {
        Self { rng, map }
    }

    /// Generate a maze, returning the start and end cells.
    ///
    /// The whole map is rewritten: filled with walls, carved, braided per
    /// `cfg`, and finally the endpoints are placed. Cells passed in `start`
    /// / `end` are kept at their positions and forced open (attached to a
    /// corridor if isolated); missing endpoints are chosen uniformly among
    /// open cells, distinct from each other.
    pub fn generate(
        &mut self,
        cfg: &MazeConfig,
        start: Option<Cell>,
        end: Option<Cell>,
    ) -> Result<(Cell, Cell), GenError> {
        self.map.fill(CellState::Wall);
        self.carve()?;
        self.braid(cfg);
        let (start, end) = self.place_endpoints(start, end)?;
        log::debug!(
            "generated {}x{} maze, {} open cells, start={} end={}",
            self.map.rows(),
            self.map.cols(),
            self.map.count(CellState::Open),
            start,
            end
        );
        Ok((start, end))
    }

    // -----------------------------------------------------------------------
    // Carving
    // -----------------------------------------------------------------------

    /// Carve a perfect maze spanning every chamber cell.
    ///
    /// Iterative backtracker with an explicit frame stack; each frame holds
    /// its own shuffled direction order, so the walk order is the same as
    /// the recursive formulation's without unbounded recursion depth. A
    /// chamber's `Open` state doubles as its visited mark: carving is the
    /// only writer at this stage.
    fn carve(&mut self) -> Result<(), GenError> {
        let (rows, cols) = (self.map.rows(), self.map.cols());
        let (odd_rows, odd_cols) = (rows / 2, cols / 2);
        if odd_rows == 0 || odd_cols == 0 {
            return Err(GenError::GridTooSmall { rows, cols });
        }

        let start = Cell::new(
            1 + 2 * self.rng.random_range(0..odd_rows),
            1 + 2 * self.rng.random_range(0..odd_cols),
        );
        self.map.set_state(start, CellState::Open);

        let mut stack = vec![self.frame(start)];
        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            if top.next == 4 {
                stack.pop();
                continue;
            }
            let d = top.dirs[top.next];
            top.next += 1;
            let current = top.cell;

            let target = current + d;
            if !self.map.contains(target) || !target.is_chamber() || self.map.is_open(target) {
                continue;
            }
            self.map.set_state(current + d.signum(), CellState::Open);
            self.map.set_state(target, CellState::Open);
            let frame = self.frame(target);
            stack.push(frame);
        }
        Ok(())
    }

    fn frame(&mut self, cell: Cell) -> Frame {
        let mut dirs = CARVE_DIRS;
        dirs.shuffle(&mut self.rng);
        Frame {
            cell,
            dirs,
            next: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Braiding
    // -----------------------------------------------------------------------

    /// Probabilistically open walls that separate two corridors, subject to
    /// the 2×2 and stranding guards.
    fn braid(&mut self, cfg: &MazeConfig) {
        if cfg.braid <= 0.0 {
            return;
        }
        let (rows, cols) = (self.map.rows(), self.map.cols());
        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let cell = Cell::new(r, c);
                if !self.is_between_two_open(cell) {
                    continue;
                }
                if self.rng.random::<f64>() >= cfg.braid {
                    continue;
                }
                if cfg.avoid_2x2 && self.would_create_2x2(cell) {
                    continue;
                }
                if cfg.avoid_stranding && self.would_strand_wall(cell) {
                    continue;
                }
                self.map.set_state(cell, CellState::Open);
            }
        }
    }

    /// A wall lying exactly between two open cells along one lattice axis:
    /// a row-wall between vertically open neighbors, or a column-wall
    /// between horizontally open ones.
    fn is_between_two_open(&self, cell: Cell) -> bool {
        if self.map.is_open(cell) {
            return false;
        }
        let Cell { row, col } = cell;
        if row % 2 == 0 && col % 2 == 1 {
            return self.map.is_open(cell + Dir::NORTH) && self.map.is_open(cell + Dir::SOUTH);
        }
        if row % 2 == 1 && col % 2 == 0 {
            return self.map.is_open(cell + Dir::WEST) && self.map.is_open(cell + Dir::EAST);
        }
        false
    }

    /// Would opening `cell` complete a fully open 2×2 block? Scans the four
    /// 2×2 windows touching the cell.
    fn would_create_2x2(&self, cell: Cell) -> bool {
        for anchor in [
            cell.shift(-1, -1),
            cell.shift(-1, 0),
            cell.shift(0, -1),
            cell,
        ] {
            let window = [
                anchor,
                anchor.shift(1, 0),
                anchor.shift(0, 1),
                anchor.shift(1, 1),
            ];
            if !window.iter().all(|&w| self.map.contains(w)) {
                continue;
            }
            let open = window
                .iter()
                .filter(|&&w| w != cell && self.map.is_open(w))
                .count();
            if open == 3 {
                return true;
            }
        }
        false
    }

    /// Count of in-bounds wall neighbors.
    fn wall_degree(&self, cell: Cell) -> i32 {
        cell.neighbors_4()
            .iter()
            .filter(|&&n| self.map.contains(n) && !self.map.is_open(n))
            .count() as i32
    }

    /// Would opening `cell` drop an adjacent wall's degree to ≤ 1? Such a
    /// wall would be left as a stranded one-cell fragment.
    fn would_strand_wall(&self, cell: Cell) -> bool {
        cell.neighbors_4().iter().any(|&n| {
            self.map.contains(n) && !self.map.is_open(n) && self.wall_degree(n) - 1 <= 1
        })
    }

    // -----------------------------------------------------------------------
    // Endpoint placement
    // -----------------------------------------------------------------------

    fn place_endpoints(
        &mut self,
        start: Option<Cell>,
        end: Option<Cell>,
    ) -> Result<(Cell, Cell), GenError> {
        let open_cells = self.map.cells_in(CellState::Open);

        let (start, mut end) = match (start, end) {
            (Some(s), Some(e)) => {
                self.attach(s);
                self.attach(e);
                (s, e)
            }
            (Some(s), None) => {
                self.attach(s);
                let e = self.pick_excluding(&open_cells, s)?;
                (s, e)
            }
            (None, Some(e)) => {
                self.attach(e);
                let s = self.pick_excluding(&open_cells, e)?;
                (s, e)
            }
            (None, None) => {
                let s = *open_cells
                    .choose(&mut self.rng)
                    .ok_or(GenError::NoOpenCells)?;
                let e = self.pick_excluding(&open_cells, s)?;
                (s, e)
            }
        };

        // Collision can only come from caller-provided cells; re-pick end.
        if start == end {
            end = self.pick_excluding(&open_cells, start)?;
        }
        Ok((start, end))
    }

    fn pick_excluding(&mut self, open_cells: &[Cell], exclude: Cell) -> Result<Cell, GenError> {
        let choices: Vec<Cell> = open_cells.iter().copied().filter(|&c| c != exclude).collect();
        choices
            .choose(&mut self.rng)
            .copied()
            .ok_or(GenError::NoOpenCells)
    }

    /// Force an endpoint open and make sure it touches a corridor: if all
    /// four neighbors are walls, open the one whose coordinates sit closest
    /// to the odd/odd chamber lattice.
    fn attach(&mut self, cell: Cell) {
        if !self.map.contains(cell) {
            return;
        }
        self.map.set_state(cell, CellState::Open);

        if cell.neighbors_4().iter().any(|&n| self.map.is_open(n)) {
            return;
        }
        let best = cell
            .neighbors_4()
            .into_iter()
            .filter(|&n| self.map.contains(n))
            .max_by_key(|n| {
                let score = (n.row % 2 == 1) as i32 + (n.col % 2 == 1) as i32;
                (score, n.row, n.col)
            });
        if let Some(n) = best {
            self.map.set_state(n, CellState::Open);
        }
    }
}
