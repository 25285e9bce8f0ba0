//! Bidirectional paging decorator around [`VirtualList`]
//!
//! Intercepts the engine's geometry events, forwards them to any callbacks
//! the caller registered, then feeds them to a [`Paginator`]. The engine is
//! built with its native end-reached disabled and with visible-position
//! maintenance switched on.

use std::ops::Deref;
use std::sync::Arc;

use bidilist_core::{Edge, ListConfig, LoadOutcome, PageInfo, PageLoader, Paginator, ScrollGeometry};

use super::engine::{EngineOptions, ListEvent, MaintainVisibleContentPosition, MeasureFn, VirtualList};

pub type ScrollCallback = Box<dyn FnMut(&ScrollGeometry) + Send>;
/// Receives `(width, height)`
pub type SizeCallback = Box<dyn FnMut(f64, f64) + Send>;

/// Caller callbacks that still run when the list is wrapped
#[derive(Default)]
pub struct ListCallbacks {
    pub on_scroll: Option<ScrollCallback>,
    pub on_layout: Option<SizeCallback>,
    pub on_content_size_change: Option<SizeCallback>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalListProps {
    pub on_start_reached_threshold: f64,
    pub on_end_reached_threshold: f64,
    pub enable_autoscroll_to_top: bool,
    pub autoscroll_to_top_threshold: f64,
    pub min_index_for_visible: usize,
    pub page_info: PageInfo,
}

impl BidirectionalListProps {
    pub fn from_config(config: &ListConfig, page_info: PageInfo) -> Self {
        Self {
            on_start_reached_threshold: config.on_start_reached_threshold,
            on_end_reached_threshold: config.on_end_reached_threshold,
            enable_autoscroll_to_top: config.enable_autoscroll_to_top,
            autoscroll_to_top_threshold: config.autoscroll_to_top_threshold,
            min_index_for_visible: config.min_index_for_visible,
            page_info,
        }
    }

    fn list_config(&self) -> ListConfig {
        ListConfig {
            on_start_reached_threshold: self.on_start_reached_threshold,
            on_end_reached_threshold: self.on_end_reached_threshold,
            enable_autoscroll_to_top: self.enable_autoscroll_to_top,
            autoscroll_to_top_threshold: self.autoscroll_to_top_threshold,
            min_index_for_visible: self.min_index_for_visible,
        }
    }

    /// Position maintenance handed to the engine; not settable by callers
    pub fn maintain_visible_content_position(&self) -> MaintainVisibleContentPosition {
        MaintainVisibleContentPosition {
            min_index_for_visible: self.min_index_for_visible,
            autoscroll_to_top_threshold: self
                .enable_autoscroll_to_top
                .then_some(self.autoscroll_to_top_threshold),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            on_end_reached_threshold: None,
            maintain_visible_content_position: Some(self.maintain_visible_content_position()),
        }
    }
}

impl Default for BidirectionalListProps {
    fn default() -> Self {
        Self::from_config(&ListConfig::default(), PageInfo::default())
    }
}

/// A [`VirtualList`] that asks a [`PageLoader`] for more items near either edge.
///
/// Only one loader runs at a time. A finished loader keeps its slot until the
/// owner collects it with [`drain_settled`](Self::drain_settled) or
/// [`next_settled`](Self::next_settled); a loader deferred behind it starts at
/// that point. Owners must poll one of them, usually once per UI tick, or the
/// deferred edge never loads.
pub struct BidirectionalList<T> {
    engine: VirtualList<T>,
    paginator: Paginator,
    callbacks: ListCallbacks,
}

impl<T> BidirectionalList<T> {
    pub fn new(props: &BidirectionalListProps, loader: Arc<dyn PageLoader>, measure: MeasureFn<T>) -> Self {
        Self {
            engine: VirtualList::new(props.engine_options(), measure),
            paginator: Paginator::new(loader, &props.list_config(), props.page_info),
            callbacks: ListCallbacks::default(),
        }
    }

    pub fn with_fixed_height(props: &BidirectionalListProps, loader: Arc<dyn PageLoader>, rows: u32) -> Self
    where
        T: 'static,
    {
        Self::new(props, loader, Box::new(move |_: &T| rows))
    }

    pub fn with_callbacks(mut self, callbacks: ListCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Read-only access to the wrapped engine
    pub fn engine(&self) -> &VirtualList<T> {
        &self.engine
    }

    /// Engine handle for programmatic scrolling; its scrolls still reach the tracker
    pub fn engine_mut(&mut self) -> EngineRef<'_, T> {
        EngineRef { list: self }
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn page_info(&self) -> PageInfo {
        self.paginator.page_info()
    }

    pub fn set_page_info(&mut self, page_info: PageInfo) {
        self.paginator.set_page_info(page_info);
    }

    pub fn in_flight(&self) -> Option<Edge> {
        self.paginator.in_flight()
    }

    pub fn set_viewport(&mut self, width: u16, height: u32) {
        let events = self.engine.set_viewport(width, height);
        self.dispatch(events);
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let events = self.engine.scroll_by(delta);
        self.dispatch(events);
    }

    pub fn append(&mut self, items: Vec<T>) {
        let events = self.engine.append(items);
        self.dispatch(events);
    }

    pub fn prepend(&mut self, items: Vec<T>) {
        let events = self.engine.prepend(items);
        self.dispatch(events);
    }

    pub fn replace(&mut self, items: Vec<T>) {
        let events = self.engine.replace(items);
        self.dispatch(events);
    }

    /// Loader settlements since the last call; errors are passed through.
    /// Frees the slot and may start the deferred edge.
    pub fn drain_settled(&mut self) -> Vec<LoadOutcome> {
        self.paginator.drain_settled()
    }

    /// Wait for the next settlement; `None` when no loader is running
    pub async fn next_settled(&mut self) -> Option<LoadOutcome> {
        self.paginator.next_settled().await
    }

    fn dispatch(&mut self, events: Vec<ListEvent>) {
        let item_count = self.engine.len();

        for event in events {
            match event {
                ListEvent::Scroll(geometry) => {
                    if let Some(on_scroll) = self.callbacks.on_scroll.as_mut() {
                        on_scroll(&geometry);
                    }
                    self.paginator.on_scroll(geometry, item_count);
                }
                ListEvent::Layout { width, height } => {
                    if let Some(on_layout) = self.callbacks.on_layout.as_mut() {
                        on_layout(width, height);
                    }
                    self.paginator.on_layout(height, item_count);
                }
                ListEvent::ContentSizeChange { width, height } => {
                    if let Some(on_content_size_change) = self.callbacks.on_content_size_change.as_mut() {
                        on_content_size_change(width, height);
                    }
                    self.paginator.on_content_size_change(width, height, item_count);
                }
                ListEvent::EndReached { .. } => {
                    tracing::debug!("Ignoring native end-reached");
                }
            }
        }
    }
}

/// Mutable engine handle returned by [`BidirectionalList::engine_mut`]
pub struct EngineRef<'a, T> {
    list: &'a mut BidirectionalList<T>,
}

impl<T> EngineRef<'_, T> {
    pub fn scroll_to_offset(&mut self, offset: u32) {
        let events = self.list.engine.scroll_to_offset(offset);
        self.list.dispatch(events);
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        let events = self.list.engine.scroll_to_index(index);
        self.list.dispatch(events);
    }

    pub fn scroll_to_top(&mut self) {
        let events = self.list.engine.scroll_to_top();
        self.list.dispatch(events);
    }

    pub fn scroll_to_end(&mut self) {
        let events = self.list.engine.scroll_to_end();
        self.list.dispatch(events);
    }
}

impl<T> Deref for EngineRef<'_, T> {
    type Target = VirtualList<T>;

    fn deref(&self) -> &VirtualList<T> {
        &self.list.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use bidilist_core::Result;

    #[derive(Default)]
    struct CountingLoader {
        starts: AtomicUsize,
        ends: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PageLoader for CountingLoader {
        async fn on_start_reached(&self) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_end_reached(&self) -> Result<()> {
            self.ends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn props(page_info: PageInfo) -> BidirectionalListProps {
        BidirectionalListProps {
            page_info,
            ..Default::default()
        }
    }

    async fn run_pending(list: &mut BidirectionalList<u32>) {
        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            list.drain_settled();
        }
    }

    #[test]
    fn test_engine_options_disable_native_end_reached() {
        let options = props(PageInfo::default()).engine_options();
        assert_eq!(options.on_end_reached_threshold, None);
        let mvcp = options.maintain_visible_content_position.unwrap();
        assert_eq!(mvcp.min_index_for_visible, 1);
        assert_eq!(mvcp.autoscroll_to_top_threshold, None);
    }

    #[test]
    fn test_autoscroll_threshold_only_when_enabled() {
        let mut props = props(PageInfo::default());
        props.enable_autoscroll_to_top = true;
        props.autoscroll_to_top_threshold = 40.0;
        assert_eq!(
            props.maintain_visible_content_position().autoscroll_to_top_threshold,
            Some(40.0)
        );
    }

    #[tokio::test]
    async fn test_short_list_loads_end_once_without_scrolling() {
        let loader = Arc::new(CountingLoader::default());
        let mut list = BidirectionalList::with_fixed_height(&props(PageInfo::new(true, false)), loader.clone(), 1);

        list.append((0..15).collect());
        list.set_viewport(80, 50);
        run_pending(&mut list).await;
        assert_eq!(loader.ends.load(Ordering::SeqCst), 1);

        // Resizing again at the same item count does not re-fire
        list.set_viewport(80, 60);
        run_pending(&mut list).await;
        assert_eq!(loader.ends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_start_fires_again_only_after_growth() {
        let loader = Arc::new(CountingLoader::default());
        let mut list = BidirectionalList::with_fixed_height(&props(PageInfo::new(true, true)), loader.clone(), 3);
        list.append((0..15).collect());
        list.set_viewport(80, 30);
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 0);

        list.engine_mut().scroll_to_offset(8);
        list.engine_mut().scroll_to_top();
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 1);

        list.scroll_by(2);
        list.scroll_by(-2);
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 1);

        // Five more items at the end, then back to the top
        list.append((15..20).collect());
        list.engine_mut().scroll_to_end();
        list.engine_mut().scroll_to_top();
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_previous_page_blocks_start() {
        let loader = Arc::new(CountingLoader::default());
        let mut list = BidirectionalList::with_fixed_height(&props(PageInfo::new(false, false)), loader.clone(), 3);
        list.set_viewport(80, 30);
        list.append((0..40).collect());
        list.engine_mut().scroll_to_end();
        list.engine_mut().scroll_to_top();
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 0);
        assert_eq!(loader.ends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_caller_callbacks_are_forwarded() {
        let scrolls = Arc::new(Mutex::new(Vec::new()));
        let layouts = Arc::new(AtomicUsize::new(0));
        let sizes = Arc::new(AtomicUsize::new(0));

        let callbacks = ListCallbacks {
            on_scroll: Some({
                let scrolls = scrolls.clone();
                Box::new(move |geometry: &ScrollGeometry| scrolls.lock().unwrap().push(geometry.offset))
            }),
            on_layout: Some({
                let layouts = layouts.clone();
                Box::new(move |_: f64, _: f64| {
                    layouts.fetch_add(1, Ordering::SeqCst);
                })
            }),
            on_content_size_change: Some({
                let sizes = sizes.clone();
                Box::new(move |_: f64, _: f64| {
                    sizes.fetch_add(1, Ordering::SeqCst);
                })
            }),
        };

        let loader = Arc::new(CountingLoader::default());
        let mut list = BidirectionalList::with_fixed_height(&props(PageInfo::default()), loader, 3)
            .with_callbacks(callbacks);
        list.set_viewport(80, 30);
        list.append((0..40).collect());
        list.scroll_by(5);
        list.engine_mut().scroll_to_index(10);

        assert_eq!(layouts.load(Ordering::SeqCst), 1);
        assert_eq!(sizes.load(Ordering::SeqCst), 1);
        assert_eq!(*scrolls.lock().unwrap(), vec![5.0, 30.0]);
    }

    #[tokio::test]
    async fn test_prepend_keeps_position_and_does_not_refire_start() {
        let loader = Arc::new(CountingLoader::default());
        let mut list = BidirectionalList::with_fixed_height(&props(PageInfo::new(false, true)), loader.clone(), 3);
        list.append((100..140).collect());
        list.set_viewport(80, 30);
        run_pending(&mut list).await;

        list.scroll_by(1);
        list.scroll_by(-1);
        run_pending(&mut list).await;
        assert_eq!(loader.starts.load(Ordering::SeqCst), 1);

        list.prepend((0..15).collect());
        run_pending(&mut list).await;
        // Item 101 was the anchor at row 3
        assert_eq!(list.engine().offset(), 45);
        assert_eq!(loader.starts.load(Ordering::SeqCst), 1);
    }
}
