//! Bidirectional pagination: edge detection and loader scheduling
//!
//! - `tracker` - fire-once bookkeeping keyed on item count
//! - `gate` - keeps the start and end loaders from running concurrently
//! - `edge_reach` - synchronous detection over geometry snapshots
//! - `paginator` - async driver that runs loaders on the tokio runtime

mod edge_reach;
mod gate;
mod paginator;
mod tracker;

pub use edge_reach::EdgeReachTracker;
pub use gate::{LoadGate, LoadState};
pub use paginator::Paginator;
pub use tracker::ReachTracker;

use std::fmt;

use crate::Result;

/// One end of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Start => Edge::End,
            Edge::End => Edge::Start,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Start => f.write_str("start"),
            Edge::End => f.write_str("end"),
        }
    }
}

/// Caller-maintained flags telling whether more data exists in each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    pub fn new(has_next_page: bool, has_previous_page: bool) -> Self {
        Self {
            has_next_page,
            has_previous_page,
        }
    }

    /// Whether a loader for `edge` may be attempted at all
    pub fn allows(&self, edge: Edge) -> bool {
        match edge {
            Edge::Start => self.has_previous_page,
            Edge::End => self.has_next_page,
        }
    }
}

/// Loader callbacks invoked when the scroll position nears an edge.
///
/// Implementations are expected to fetch data and hand it to whoever owns
/// the list. Errors are returned to the caller through [`LoadOutcome`].
#[async_trait::async_trait]
pub trait PageLoader: Send + Sync {
    /// Load content that goes before the first item
    async fn on_start_reached(&self) -> Result<()>;

    /// Load content that goes after the last item
    async fn on_end_reached(&self) -> Result<()>;
}

/// A settled loader invocation
#[derive(Debug)]
pub struct LoadOutcome {
    pub edge: Edge,
    pub result: Result<()>,
}

impl LoadOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
