use super::{Edge, LoadGate, LoadState, PageInfo, ReachTracker};
use crate::config::ListConfig;
use crate::geometry::{is_at_end, is_at_start, ScrollGeometry};

/// Synchronous edge detection.
///
/// Feed it every geometry snapshot together with the current item count; it
/// answers with the edges whose loaders must be dispatched now. Loader
/// completion is reported back through [`EdgeReachTracker::settle`].
#[derive(Debug, Clone)]
pub struct EdgeReachTracker {
    start_threshold: f64,
    end_threshold: f64,
    page_info: PageInfo,
    start_reached: ReachTracker,
    end_reached: ReachTracker,
    gate: LoadGate,
    layout_height: f64,
    content_height: f64,
}

impl EdgeReachTracker {
    pub fn new(start_threshold: f64, end_threshold: f64, page_info: PageInfo) -> Self {
        Self {
            start_threshold,
            end_threshold,
            page_info,
            start_reached: ReachTracker::new(),
            end_reached: ReachTracker::new(),
            gate: LoadGate::new(),
            layout_height: 0.0,
            content_height: 0.0,
        }
    }

    pub fn from_config(config: &ListConfig, page_info: PageInfo) -> Self {
        Self::new(
            config.on_start_reached_threshold,
            config.on_end_reached_threshold,
            page_info,
        )
    }

    pub fn page_info(&self) -> PageInfo {
        self.page_info
    }

    pub fn set_page_info(&mut self, page_info: PageInfo) {
        self.page_info = page_info;
    }

    pub fn set_thresholds(&mut self, start_threshold: f64, end_threshold: f64) {
        self.start_threshold = start_threshold;
        self.end_threshold = end_threshold;
    }

    pub fn load_state(&self) -> LoadState {
        self.gate.state()
    }

    pub fn is_pending(&self, edge: Edge) -> bool {
        self.gate.is_pending(edge)
    }

    /// Run detection over one snapshot. Start is checked before end.
    pub fn check_scroll_position(&mut self, geometry: ScrollGeometry, item_count: usize) -> Vec<Edge> {
        let mut dispatch = Vec::new();

        if is_at_start(&geometry, self.start_threshold) {
            dispatch.extend(self.maybe_trigger(Edge::Start, item_count));
        }

        if is_at_end(&geometry, self.end_threshold) {
            dispatch.extend(self.maybe_trigger(Edge::End, item_count));
        }

        dispatch
    }

    /// Viewport height changed
    pub fn on_layout(&mut self, height: f64, item_count: usize) -> Vec<Edge> {
        self.layout_height = height;
        self.check_heights(item_count)
    }

    /// Total content height changed
    pub fn on_content_size_change(&mut self, _width: f64, height: f64, item_count: usize) -> Vec<Edge> {
        self.content_height = height;
        self.check_heights(item_count)
    }

    /// Loader for `edge` settled. Returns a deferred edge to dispatch next.
    pub fn settle(&mut self, edge: Edge) -> Option<Edge> {
        self.gate.settle(edge)
    }

    // Content that fits on screen never produces scroll events, so layout
    // changes are checked as if sitting at the top.
    fn check_heights(&mut self, item_count: usize) -> Vec<Edge> {
        if self.layout_height >= self.content_height {
            let geometry = ScrollGeometry::at_top(self.layout_height, self.content_height);
            self.check_scroll_position(geometry, item_count)
        } else {
            Vec::new()
        }
    }

    fn maybe_trigger(&mut self, edge: Edge, item_count: usize) -> Option<Edge> {
        if !self.page_info.allows(edge) {
            return None;
        }

        let tracker = match edge {
            Edge::Start => &mut self.start_reached,
            Edge::End => &mut self.end_reached,
        };
        if !tracker.mark(item_count) {
            return None;
        }

        tracing::debug!(edge = %edge, item_count, "Edge reached");
        self.gate.request(edge)
    }
}
