//! Serializes loader invocations across both edges.
//!
//! Exactly one loader may be in flight. A request arriving while another is
//! in flight is parked, at most one per edge, and released when the in-flight
//! loader settles. Settling an edge clears that edge's slot and nothing else.

use super::Edge;

/// Which loader, if any, is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    StartInFlight,
    EndInFlight,
}

impl LoadState {
    fn in_flight(edge: Edge) -> Self {
        match edge {
            Edge::Start => LoadState::StartInFlight,
            Edge::End => LoadState::EndInFlight,
        }
    }

    pub fn edge(&self) -> Option<Edge> {
        match self {
            LoadState::Idle => None,
            LoadState::StartInFlight => Some(Edge::Start),
            LoadState::EndInFlight => Some(Edge::End),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    state: LoadState,
    pending_start: bool,
    pending_end: bool,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_pending(&self, edge: Edge) -> bool {
        match edge {
            Edge::Start => self.pending_start,
            Edge::End => self.pending_end,
        }
    }

    fn set_pending(&mut self, edge: Edge, pending: bool) {
        match edge {
            Edge::Start => self.pending_start = pending,
            Edge::End => self.pending_end = pending,
        }
    }

    /// Ask to run the loader for `edge`.
    ///
    /// Returns the edge to dispatch right away, or `None` if the request was
    /// parked behind the loader currently in flight.
    pub fn request(&mut self, edge: Edge) -> Option<Edge> {
        match self.state.edge() {
            None => {
                self.state = LoadState::in_flight(edge);
                Some(edge)
            }
            Some(running) => {
                tracing::debug!(requested = %edge, running = %running, "Deferring loader");
                self.set_pending(edge, true);
                None
            }
        }
    }

    /// Record that the loader for `edge` settled, successfully or not.
    ///
    /// Returns the parked edge that should be dispatched next. The opposite
    /// edge goes first since it has been waiting on this one.
    pub fn settle(&mut self, edge: Edge) -> Option<Edge> {
        if self.state.edge() != Some(edge) {
            tracing::warn!(settled = %edge, state = ?self.state, "Settle for a loader that is not in flight");
            return None;
        }
        self.state = LoadState::Idle;

        let next = [edge.opposite(), edge]
            .into_iter()
            .find(|candidate| self.is_pending(*candidate))?;
        self.set_pending(next, false);
        self.state = LoadState::in_flight(next);
        Some(next)
    }
}
