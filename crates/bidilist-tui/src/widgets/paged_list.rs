use bidilist_core::source::Item;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::theme::Palette;

pub struct PagedListWidget;

impl PagedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let title = match (app.first_page, app.last_page) {
            (Some(first), Some(last)) => format!(" {} | pages {}-{} ", app.source_label, first, last),
            _ => format!(" {} ", app.source_label),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Palette::ACCENT))
            .style(Style::default().bg(Palette::BG0));

        let inner_width = area.width.saturating_sub(2) as usize;
        let lines = if app.list.engine().is_empty() {
            vec![Line::from(Span::styled(
                " Loading...",
                Style::default().fg(Palette::GREY2),
            ))]
        } else {
            visible_lines(app, inner_width)
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// One line per viewport row; partially visible items are clipped
fn visible_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let engine = app.list.engine();
    let offset = engine.offset();
    let bottom = offset + engine.viewport_height();

    let mut lines = Vec::with_capacity(engine.viewport_height() as usize);
    for index in engine.visible_range() {
        let item = &engine.items()[index];
        let top = engine.item_top(index);
        let bg = Palette::row_color(item.id);

        for row in 0..engine.height_of(index) {
            let y = top + row;
            if y < offset || y >= bottom {
                continue;
            }
            lines.push(item_row(item, row, width, bg));
        }
    }
    lines
}

fn item_row(item: &Item, row: u32, width: usize, bg: ratatui::style::Color) -> Line<'static> {
    let (text, style) = match row {
        0 => (
            format!(" #{} {}", item.id, item.name),
            Style::default().fg(Palette::FG0).add_modifier(Modifier::BOLD),
        ),
        1 => (format!("   {}", item.tagline), Style::default().fg(Palette::GREY2)),
        _ => (String::new(), Style::default()),
    };
    Line::from(Span::styled(pad_to_width(&text, width), style.bg(bg)))
}

/// Truncate or pad `s` so it spans exactly `width` terminal columns
fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if s.width() > width {
        let budget = width.saturating_sub(1);
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            out.push(ch);
            used += w;
        }
        if width > 0 {
            out.push('…');
            used += 1;
        }
    } else {
        out.push_str(s);
        used = s.width();
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}
