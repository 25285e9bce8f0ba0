use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use super::{Item, PageSource};
use crate::pagination::{Edge, PageInfo, PageLoader};
use crate::{Error, Result};

/// A page fetched by the loader, to be applied by whoever owns the list
#[derive(Debug, Clone)]
pub struct PageLoaded {
    /// `Start` means prepend, `End` means append
    pub direction: Edge,
    pub page: u32,
    pub items: Vec<Item>,
    /// Page info after this load
    pub page_info: PageInfo,
}

/// Range of pages currently held by the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub first_page: u32,
    pub last_page: u32,
    pub page_info: PageInfo,
}

#[derive(Debug)]
struct LoaderState {
    window: Option<PageWindow>,
    loading: bool,
}

/// Loads the page before or after the current window from a [`PageSource`].
///
/// Fetched pages are sent to the UI loop over a channel; the loader itself
/// only tracks which pages are held and whether a fetch is running.
pub struct DirectionalLoader {
    source: Arc<dyn PageSource>,
    per_page: u32,
    state: Mutex<LoaderState>,
    pages_tx: mpsc::UnboundedSender<PageLoaded>,
}

impl DirectionalLoader {
    pub fn new(
        source: Arc<dyn PageSource>,
        per_page: u32,
        pages_tx: mpsc::UnboundedSender<PageLoaded>,
    ) -> Self {
        Self {
            source,
            per_page,
            state: Mutex::new(LoaderState {
                window: None,
                loading: false,
            }),
            pages_tx,
        }
    }

    pub async fn window(&self) -> Option<PageWindow> {
        self.state.lock().await.window
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Fetch the first page shown and return it directly
    pub async fn load_initial(&self, start_page: u32) -> Result<PageLoaded> {
        let items = self.source.fetch_page(start_page, self.per_page).await?;
        let page_info = PageInfo::new(!items.is_empty(), start_page > 1);
        info!(page = start_page, count = items.len(), "Loaded initial page");

        self.state.lock().await.window = Some(PageWindow {
            first_page: start_page,
            last_page: start_page,
            page_info,
        });

        Ok(PageLoaded {
            direction: Edge::End,
            page: start_page,
            items,
            page_info,
        })
    }

    async fn load(&self, direction: Edge) -> Result<()> {
        let window = {
            let mut state = self.state.lock().await;
            let Some(window) = state.window else {
                return Ok(());
            };
            if state.loading || !window.page_info.allows(direction) {
                return Ok(());
            }
            state.loading = true;
            window
        };

        let result = self.fetch_adjacent(direction, window).await;

        // Cleared on success and failure alike
        let mut state = self.state.lock().await;
        state.loading = false;

        match result {
            Ok(loaded) => {
                state.window = Some(Self::advance(window, &loaded));
                drop(state);
                info!(direction = %direction, page = loaded.page, count = loaded.items.len(), "Loaded page");
                self.pages_tx
                    .send(loaded)
                    .map_err(|_| Error::Loader("page receiver dropped".to_string()))
            }
            Err(e) => {
                error!(direction = %direction, "Failed to load page: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_adjacent(&self, direction: Edge, window: PageWindow) -> Result<PageLoaded> {
        let page = match direction {
            Edge::Start => window.first_page.saturating_sub(1),
            Edge::End => window.last_page.saturating_add(1),
        };

        // Page numbers start at 1; there is nothing before the first one
        let items = if page == 0 {
            Vec::new()
        } else {
            self.source.fetch_page(page, self.per_page).await?
        };

        let mut page_info = window.page_info;
        match direction {
            Edge::Start => page_info.has_previous_page = !items.is_empty(),
            Edge::End => page_info.has_next_page = !items.is_empty(),
        }

        Ok(PageLoaded {
            direction,
            page,
            items,
            page_info,
        })
    }

    fn advance(window: PageWindow, loaded: &PageLoaded) -> PageWindow {
        let mut next = PageWindow {
            page_info: loaded.page_info,
            ..window
        };
        if !loaded.items.is_empty() {
            match loaded.direction {
                Edge::Start => next.first_page = loaded.page,
                Edge::End => next.last_page = loaded.page,
            }
        }
        next
    }
}

#[async_trait::async_trait]
impl PageLoader for DirectionalLoader {
    async fn on_start_reached(&self) -> Result<()> {
        self.load(Edge::Start).await
    }

    async fn on_end_reached(&self) -> Result<()> {
        self.load(Edge::End).await
    }
}
