use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use bidilist_core::{
    source::{source_from_config, DirectionalLoader, PageLoaded},
    AppConfig, PageLoader,
};
use bidilist_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{PagedListWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let source = source_from_config(&config.source)?;
    let source_label = source.describe();

    // Fetched pages come back here; the list applies them on the UI loop
    let (pages_tx, mut pages_rx) = mpsc::unbounded_channel::<PageLoaded>();
    let loader = Arc::new(DirectionalLoader::new(source, config.source.per_page, pages_tx));

    // Load before taking over the terminal so failures print normally
    let initial = loader.load_initial(config.source.start_page).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("bidilist"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let page_loader: Arc<dyn PageLoader> = loader;
    let mut app = App::new(config.clone(), page_loader, source_label);
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    app.apply_page(initial);

    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    let result = run_loop(&mut terminal, &mut app, &mut pages_rx, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    pages_rx: &mut mpsc::UnboundedReceiver<PageLoaded>,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Pages first: a loader sends its page before it settles
        while let Ok(loaded) = pages_rx.try_recv() {
            app.apply_page(loaded);
        }
        app.apply_outcomes();

        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PagedListWidget::render(frame, layout[0], &*app);
            StatusBarWidget::render(frame, layout[1], &*app);
        })?;

        match event_handler.next()? {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, app);
                app.handle_action(action);
            }
            Some(AppEvent::Wheel(rows)) => app.wheel(rows),
            Some(AppEvent::Resize(width, height)) => app.resize(width, height),
            Some(AppEvent::Tick) | None => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
