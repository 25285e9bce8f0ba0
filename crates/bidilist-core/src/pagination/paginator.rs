//! Async driver for the edge-reach tracker
//!
//! Geometry events arrive synchronously from the UI loop. Dispatched loaders
//! run as tokio tasks and report back over an unbounded channel; the UI loop
//! drains that channel each tick, which is also when deferred loaders start.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{Edge, EdgeReachTracker, LoadOutcome, PageInfo, PageLoader};
use crate::config::ListConfig;
use crate::geometry::ScrollGeometry;
use crate::Error;

pub struct Paginator {
    tracker: EdgeReachTracker,
    loader: Arc<dyn PageLoader>,
    settled_tx: mpsc::UnboundedSender<LoadOutcome>,
    settled_rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl Paginator {
    pub fn new(loader: Arc<dyn PageLoader>, config: &ListConfig, page_info: PageInfo) -> Self {
        Self::with_tracker(loader, EdgeReachTracker::from_config(config, page_info))
    }

    pub fn with_tracker(loader: Arc<dyn PageLoader>, tracker: EdgeReachTracker) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            tracker,
            loader,
            settled_tx,
            settled_rx,
        }
    }

    pub fn page_info(&self) -> PageInfo {
        self.tracker.page_info()
    }

    pub fn set_page_info(&mut self, page_info: PageInfo) {
        self.tracker.set_page_info(page_info);
    }

    /// Edge whose loader is running right now
    pub fn in_flight(&self) -> Option<Edge> {
        self.tracker.load_state().edge()
    }

    pub fn on_scroll(&mut self, geometry: ScrollGeometry, item_count: usize) {
        let edges = self.tracker.check_scroll_position(geometry, item_count);
        self.dispatch_all(edges);
    }

    pub fn on_layout(&mut self, height: f64, item_count: usize) {
        let edges = self.tracker.on_layout(height, item_count);
        self.dispatch_all(edges);
    }

    pub fn on_content_size_change(&mut self, width: f64, height: f64, item_count: usize) {
        let edges = self.tracker.on_content_size_change(width, height, item_count);
        self.dispatch_all(edges);
    }

    /// Collect every loader that has settled since the last call, without waiting.
    ///
    /// Each settlement frees its slot and may start a deferred loader. Errors
    /// are handed back untouched.
    pub fn drain_settled(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.settled_rx.try_recv() {
            self.settle(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Wait for the next loader to settle.
    ///
    /// Returns `None` when nothing is in flight and nothing is queued.
    pub async fn next_settled(&mut self) -> Option<LoadOutcome> {
        let outcome = match self.settled_rx.try_recv() {
            Ok(outcome) => outcome,
            Err(_) if self.in_flight().is_none() => return None,
            Err(_) => self.settled_rx.recv().await?,
        };
        self.settle(&outcome);
        Some(outcome)
    }

    fn settle(&mut self, outcome: &LoadOutcome) {
        debug!(edge = %outcome.edge, ok = outcome.is_ok(), "Loader settled");
        if let Some(next) = self.tracker.settle(outcome.edge) {
            self.dispatch(next);
        }
    }

    fn dispatch_all(&self, edges: Vec<Edge>) {
        for edge in edges {
            self.dispatch(edge);
        }
    }

    fn dispatch(&self, edge: Edge) {
        debug!(edge = %edge, "Dispatching loader");
        let loader = Arc::clone(&self.loader);
        let settled_tx = self.settled_tx.clone();

        tokio::spawn(async move {
            let task = tokio::spawn(async move {
                match edge {
                    Edge::Start => loader.on_start_reached().await,
                    Edge::End => loader.on_end_reached().await,
                }
            });

            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(Error::Loader(format!("{} loader task failed: {}", edge, e))),
            };

            if settled_tx.send(LoadOutcome { edge, result }).is_err() {
                warn!("Loader settled after its paginator was dropped");
            }
        });
    }
}
