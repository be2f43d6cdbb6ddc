//! Visualization event sink.
//!
//! Algorithms report exploration and path cells through a
//! [`VisualizationSink`]; the sink is a side-effect-only observer and never
//! influences the search outcome.

use gridquest_core::Cell;

/// Which frontier discovered a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExploreRole {
    /// The (only, or start-side) frontier.
    Primary,
    /// The end-side frontier of bidirectional search.
    Secondary,
}

/// Receiver of per-cell visit and path events, called synchronously from
/// the search loop.
pub trait VisualizationSink {
    /// A cell was newly discovered by a frontier. Never called for the
    /// start or end cell.
    fn on_explore(&mut self, cell: Cell, role: ExploreRole);

    /// A cell belongs to the final reconstructed path. Never called for the
    /// start or end cell.
    fn on_path_mark(&mut self, cell: Cell);
}

/// A sink that discards all events.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl VisualizationSink for NoopSink {
    fn on_explore(&mut self, _cell: Cell, _role: ExploreRole) {}
    fn on_path_mark(&mut self, _cell: Cell) {}
}

/// One recorded sink event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SinkEvent {
    Explore { cell: Cell, role: ExploreRole },
    PathMark { cell: Cell },
}

/// A sink that records the full event stream in order, for tests, replay
/// and the demo driver.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<SinkEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells explored, in discovery order.
    pub fn explored(&self) -> impl Iterator<Item = Cell> + '_ {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::Explore { cell, .. } => Some(*cell),
            _ => None,
        })
    }

    /// Path cells, in marking order (start side first).
    pub fn path_marks(&self) -> impl Iterator<Item = Cell> + '_ {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::PathMark { cell } => Some(*cell),
            _ => None,
        })
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl VisualizationSink for EventLog {
    fn on_explore(&mut self, cell: Cell, role: ExploreRole) {
        self.events.push(SinkEvent::Explore { cell, role });
    }

    fn on_path_mark(&mut self, cell: Cell) {
        self.events.push(SinkEvent::PathMark { cell });
    }
}
