use bidilist_core::Edge;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::theme::Palette;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let page_info = app.list.page_info();
        let prev = if page_info.has_previous_page { "↑" } else { "·" };
        let next = if page_info.has_next_page { "↓" } else { "·" };

        let loading = match app.list.in_flight() {
            Some(Edge::Start) => " | loading previous",
            Some(Edge::End) => " | loading next",
            None => "",
        };

        let loaded_at = app
            .last_loaded_at
            .map(|t| format!(" | {}", t.format("%H:%M:%S")))
            .unwrap_or_default();

        let status_text = if let Some(msg) = &app.status_message {
            format!(
                " {}{} row {} | Items: {} | {}{}",
                prev,
                next,
                app.list.engine().offset(),
                app.list.engine().len(),
                msg,
                loading
            )
        } else {
            format!(
                " {}{} row {} | Items: {}{}{}",
                prev,
                next,
                app.list.engine().offset(),
                app.list.engine().len(),
                loaded_at,
                loading
            )
        };

        let (hint, hint_style) = match &app.last_error {
            Some(err) => (
                format!(" {} ", err),
                Style::default().fg(Palette::ERROR).bg(Palette::BG2),
            ),
            None => (
                " q:quit j/k:scroll ^d/^u:half page gg/G:top/bottom ".to_string(),
                Style::default().fg(Palette::GREY2).bg(Palette::BG2),
            ),
        };

        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + hint.chars().count());

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(Palette::FG0).bg(Palette::BG2),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(Palette::BG2)),
            Span::styled(hint, hint_style),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
