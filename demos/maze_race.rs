//! Terminal demo: generate a maze and race all five search algorithms.
//!
//! Run: cargo run --bin maze-race

use gridquest_core::{Cell, DirectionSet, GridMap};
use gridquest_gen::{MazeConfig, MazeGen};
use gridquest_search::{Algorithm, EventLog, Heuristic, RunCoordinator, SearchResult, Searcher};

const ROWS: i32 = 21;
const COLS: i32 = 41;

fn render(map: &GridMap, start: Cell, end: Cell, path: &[Cell]) -> String {
    let mut out = String::new();
    for r in 0..map.rows() {
        for c in 0..map.cols() {
            let cell = Cell::new(r, c);
            let ch = if cell == start {
                'S'
            } else if cell == end {
                'E'
            } else if path.contains(&cell) {
                '*'
            } else if map.is_open(cell) {
                ' '
            } else {
                '█'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn main() {
    env_logger::init();

    let mut generator = MazeGen::with_map(GridMap::new(ROWS, COLS), rand::rng());
    let (start, end) = match generator.generate(&MazeConfig::default(), None, None) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let map = generator.map;

    let coordinator = RunCoordinator::new();
    let mut searcher = Searcher::new(ROWS, COLS);
    println!("{}", render(&map, start, end, &[]));
    println!("{:<8} {:>8} {:>8}", "", "visited", "path");

    for algorithm in Algorithm::ALL {
        let control = coordinator.begin_run();
        let mut log = EventLog::new();
        let result = searcher.run(
            algorithm,
            &map,
            start,
            end,
            DirectionSet::Four,
            Heuristic::Manhattan,
            &control,
            &mut log,
        );
        match result {
            Ok(SearchResult::Found { visited, path_len }) => {
                println!("{:<8} {:>8} {:>8}", algorithm.name(), visited, path_len);
                if algorithm == Algorithm::Bfs {
                    let path: Vec<Cell> = log.path_marks().collect();
                    println!("\n{}", render(&map, start, end, &path));
                }
            }
            Ok(other) => println!("{:<8} {:>8?}", algorithm.name(), other),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
