use std::sync::Arc;

use bidilist_core::source::{Item, PageLoaded};
use bidilist_core::{AppConfig, Edge, PageInfo, PageLoader};
use chrono::{DateTime, Local};

use crate::input::Action;
use crate::list::{BidirectionalList, BidirectionalListProps};

/// Rows taken by the status bar and the list border
pub const CHROME_ROWS: u16 = 3;
/// Columns taken by the list border
pub const CHROME_COLS: u16 = 2;

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub list: BidirectionalList<Item>,
    /// Human readable name of the page source
    pub source_label: String,
    /// Lowest page held, once anything has loaded
    pub first_page: Option<u32>,
    /// Highest page held
    pub last_page: Option<u32>,
    pub status_message: Option<String>,
    pub last_error: Option<String>,
    pub last_loaded_at: Option<DateTime<Local>>,
    /// Pending key for multi-key commands (e.g., 'g' for 'gg')
    pub pending_key: Option<char>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, loader: Arc<dyn PageLoader>, source_label: String) -> Self {
        let props = BidirectionalListProps::from_config(&config.list, PageInfo::default());
        let rows = u32::from(config.ui.row_height.max(1));
        let list = BidirectionalList::with_fixed_height(&props, loader, rows);

        Self {
            config,
            list,
            source_label,
            first_page: None,
            last_page: None,
            status_message: None,
            last_error: None,
            last_loaded_at: None,
            pending_key: None,
            should_quit: false,
        }
    }

    /// Apply a fetched page to the list.
    ///
    /// Page info is updated before the items land so the reach checks
    /// that follow the content change see the new flags.
    pub fn apply_page(&mut self, loaded: PageLoaded) {
        self.list.set_page_info(loaded.page_info);
        self.last_loaded_at = Some(Local::now());

        if loaded.items.is_empty() {
            let message = match loaded.direction {
                Edge::Start => "Reached the first page".to_string(),
                Edge::End => "Reached the last page".to_string(),
            };
            self.set_status(message);
            return;
        }

        let count = loaded.items.len();
        match loaded.direction {
            Edge::Start => {
                self.first_page = Some(loaded.page);
                self.last_page.get_or_insert(loaded.page);
                self.list.prepend(loaded.items);
            }
            Edge::End => {
                self.last_page = Some(loaded.page);
                self.first_page.get_or_insert(loaded.page);
                self.list.append(loaded.items);
            }
        }
        self.set_status(format!("Loaded page {} ({} items)", loaded.page, count));
    }

    /// Collect finished loader runs; may start a deferred one
    pub fn apply_outcomes(&mut self) {
        for outcome in self.list.drain_settled() {
            if let Err(e) = &outcome.result {
                tracing::error!(edge = %outcome.edge, "Page load failed: {}", e);
                self.last_error = Some(format!("{} load failed: {}", outcome.edge, e));
            }
        }
    }

    /// Resize the list to fit a terminal of the given size
    pub fn resize(&mut self, width: u16, height: u16) {
        let list_width = width.saturating_sub(CHROME_COLS);
        let list_height = height.saturating_sub(CHROME_ROWS);
        self.list.set_viewport(list_width, u32::from(list_height));
    }

    pub fn handle_action(&mut self, action: Action) {
        if action == Action::PendingG {
            self.pending_key = Some('g');
            return;
        }
        self.clear_pending_key();

        let page = i64::from(self.list.engine().viewport_height().max(1));
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.list.scroll_by(1),
            Action::ScrollUp => self.list.scroll_by(-1),
            Action::ScrollHalfPageDown => self.list.scroll_by((page / 2).max(1)),
            Action::ScrollHalfPageUp => self.list.scroll_by(-(page / 2).max(1)),
            Action::ScrollPageDown => self.list.scroll_by(page),
            Action::ScrollPageUp => self.list.scroll_by(-page),
            Action::JumpToTop => self.list.engine_mut().scroll_to_top(),
            Action::JumpToBottom => self.list.engine_mut().scroll_to_end(),
            Action::PendingG | Action::None => {}
        }
    }

    /// Mouse wheel scroll, in rows
    pub fn wheel(&mut self, rows: i64) {
        self.list.scroll_by(rows);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use bidilist_core::Error;

    #[derive(Default)]
    struct StubLoader {
        starts: AtomicUsize,
        ends: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl PageLoader for StubLoader {
        async fn on_start_reached(&self) -> bidilist_core::Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Source("offline".to_string()));
            }
            Ok(())
        }

        async fn on_end_reached(&self) -> bidilist_core::Result<()> {
            self.ends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn items(first_id: u64, count: u64) -> Vec<Item> {
        (first_id..first_id + count)
            .map(|id| Item {
                id,
                name: format!("Item {}", id),
                tagline: String::new(),
            })
            .collect()
    }

    fn page(direction: Edge, page: u32, items: Vec<Item>, page_info: PageInfo) -> PageLoaded {
        PageLoaded {
            direction,
            page,
            items,
            page_info,
        }
    }

    fn app_with(loader: Arc<StubLoader>) -> App {
        App::new(Arc::new(AppConfig::default()), loader, "stub".to_string())
    }

    #[tokio::test]
    async fn test_apply_page_tracks_window() {
        let mut app = app_with(Arc::new(StubLoader::default()));
        app.resize(40, 23);

        app.apply_page(page(Edge::End, 2, items(16, 15), PageInfo::new(true, true)));
        assert_eq!((app.first_page, app.last_page), (Some(2), Some(2)));

        app.apply_page(page(Edge::Start, 1, items(1, 15), PageInfo::new(true, false)));
        assert_eq!((app.first_page, app.last_page), (Some(1), Some(2)));
        assert_eq!(app.list.engine().len(), 30);
        assert_eq!(app.list.engine().items()[0].id, 1);
        assert_eq!(app.list.page_info(), PageInfo::new(true, false));
    }

    #[tokio::test]
    async fn test_empty_page_only_updates_page_info() {
        let mut app = app_with(Arc::new(StubLoader::default()));
        app.apply_page(page(Edge::End, 2, items(16, 15), PageInfo::new(true, false)));
        app.apply_page(page(Edge::End, 3, Vec::new(), PageInfo::new(false, false)));

        assert_eq!(app.last_page, Some(2));
        assert_eq!(app.list.engine().len(), 15);
        assert!(!app.list.page_info().has_next_page);
        assert_eq!(app.status_message.as_deref(), Some("Reached the last page"));
    }

    #[tokio::test]
    async fn test_failed_load_is_recorded() {
        let loader = Arc::new(StubLoader {
            fail: true,
            ..Default::default()
        });
        let mut app = app_with(loader.clone());
        app.apply_page(page(Edge::End, 2, items(16, 15), PageInfo::new(false, true)));
        app.resize(40, 23);
        // First scroll near the top reaches the start edge
        app.handle_action(Action::ScrollDown);

        tokio::time::sleep(Duration::from_millis(20)).await;
        app.apply_outcomes();

        assert_eq!(loader.starts.load(Ordering::SeqCst), 1);
        assert!(app.last_error.as_deref().unwrap_or_default().contains("start"));
        assert!(app.list.in_flight().is_none());
    }

    #[tokio::test]
    async fn test_gg_jumps_to_top() {
        let mut app = app_with(Arc::new(StubLoader::default()));
        app.apply_page(page(Edge::End, 2, items(16, 15), PageInfo::default()));
        app.resize(40, 13);

        app.handle_action(Action::JumpToBottom);
        assert_eq!(app.list.engine().offset(), app.list.engine().max_offset());

        app.handle_action(Action::PendingG);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::JumpToTop);
        assert_eq!(app.list.engine().offset(), 0);
        assert!(app.pending_key.is_none());
    }

    #[tokio::test]
    async fn test_half_page_scroll_uses_viewport() {
        let mut app = app_with(Arc::new(StubLoader::default()));
        app.apply_page(page(Edge::End, 2, items(16, 15), PageInfo::default()));
        app.resize(40, 13);

        app.handle_action(Action::ScrollHalfPageDown);
        assert_eq!(app.list.engine().offset(), 5);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.list.engine().offset(), 4);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app_with(Arc::new(StubLoader::default()));
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}
