//! **gridquest-gen** — maze generation for grid search visualization.
//!
//! Provides [`MazeGen`], a recursive-backtracker maze generator over the
//! chamber lattice of a [`GridMap`](gridquest_core::GridMap), with
//! probabilistic loop braiding and start/end placement.

pub mod generator;

pub use generator::{GenError, MazeConfig, MazeGen};
