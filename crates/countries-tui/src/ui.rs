//! UI rendering

use countries_core::{CardView, DetailView, GridView};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::StatefulImage;
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::{App, LoadState};
use super::palette::Palette;

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 5;
const LABEL_WIDTH: usize = 18;

/// Screen regions that react to clicks, rebuilt on every render
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    pub cards: Vec<(Rect, usize)>,
    pub region_chip: Option<Rect>,
    pub theme_chip: Option<Rect>,
    /// Whole overlay box; clicks outside it dismiss the overlay
    pub overlay: Option<Rect>,
    pub close: Option<Rect>,
    pub borders: Vec<(Rect, usize)>,
}

impl HitMap {
    pub fn card_at(&self, pos: Position) -> Option<usize> {
        self.cards
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, i)| *i)
    }

    pub fn border_at(&self, pos: Position) -> Option<usize> {
        self.borders
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, i)| *i)
    }

    pub fn region_chip_contains(&self, pos: Position) -> bool {
        self.region_chip.is_some_and(|r| r.contains(pos))
    }
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.palette();
    app.hits = HitMap::default();

    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title + theme toggle
            Constraint::Length(1), // Search input + region selector
            Constraint::Length(1), // Spacer
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Toast line
        ])
        .split(area);

    render_header(frame, app, chunks[0], &palette);
    render_search_line(frame, app, chunks[1], &palette);
    render_grid(frame, app, chunks[3], &palette);
    render_status_bar(frame, app, chunks[4], &palette);
    render_toast_line(frame, app, chunks[5], &palette);

    // Overlay last, on top of everything
    if app.overlay.is_open() {
        render_overlay(frame, app, &palette);
    }
}

fn render_header(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let title = Paragraph::new(Span::styled(" Where in the world?", palette.label()));
    frame.render_widget(title, area);

    let chip = format!("◐ {} ", app.theme.current().toggle_label());
    let rect = right_aligned(area, chip.width() as u16);
    frame.render_widget(Paragraph::new(Span::styled(chip, palette.label())), rect);
    app.hits.theme_chip = Some(rect);
}

/// Search input on the left, region selector on the right
fn render_search_line(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let region = app.region.map(|r| r.label()).unwrap_or("All regions");
    let chip = format!("[ Filter by Region: {region} ▾ ]");
    let chip_rect = right_aligned(area, chip.width() as u16);

    let input_area = Rect {
        width: area.width.saturating_sub(chip_rect.width + 1),
        ..area
    };

    let cursor_style = Style::default().fg(palette.bg).bg(palette.fg);
    let text_style = Style::default().fg(palette.fg);

    let input = &app.search_input;
    let (before, after) = input.text.split_at(input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map(|c| &after[c.len_utf8()..]).unwrap_or("");

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(palette.accent))];
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", text_style)),
    }
    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }
    if input.text.is_empty() {
        spans.push(Span::styled(" Search for a country...", palette.muted()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), input_area);

    let chip_style = if app.region.is_some() {
        palette.highlight()
    } else {
        palette.label()
    };
    frame.render_widget(Paragraph::new(Span::styled(chip, chip_style)), chip_rect);
    app.hits.region_chip = Some(chip_rect);
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let cards = match &app.grid {
        GridView::Loading => {
            let started = match app.load_state {
                LoadState::Loading { started_at } => started_at,
                _ => Instant::now(),
            };
            let msg = Paragraph::new(format!("{} Loading countries...", spinner_frame(started)))
                .style(palette.muted())
                .alignment(Alignment::Center);
            frame.render_widget(msg, area);
            return;
        }
        GridView::Failed(message) => {
            let msg = Paragraph::new(message.as_str())
                .style(Style::default().fg(palette.error))
                .alignment(Alignment::Center);
            frame.render_widget(msg, area);
            return;
        }
        GridView::Cards(cards) => cards,
    };

    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.grid_columns = columns;

    // Keep the selected card on screen
    let selected_row = app.selected / columns;
    if selected_row < app.grid_scroll {
        app.grid_scroll = selected_row;
    } else if selected_row >= app.grid_scroll + visible_rows {
        app.grid_scroll = selected_row + 1 - visible_rows;
    }

    let first = app.grid_scroll * columns;
    for (i, card) in cards
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_rows * columns)
    {
        let slot = i - first;
        let rect = Rect {
            x: area.x + (slot % columns) as u16 * CARD_WIDTH,
            y: area.y + (slot / columns) as u16 * CARD_HEIGHT,
            width: CARD_WIDTH - 1,
            height: CARD_HEIGHT,
        }
        .intersection(area);

        render_card(frame, card, rect, i == app.selected, palette);
        app.hits.cards.push((rect, i));
    }
}

fn render_card(
    frame: &mut Frame,
    card: &CardView,
    area: Rect,
    selected: bool,
    palette: &Palette,
) {
    let border_style = if selected {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        palette.muted()
    };
    let inner_width = area.width.saturating_sub(2) as usize;

    let title = match &card.flag_emoji {
        Some(emoji) => format!("{emoji} {}", card.name),
        None => card.name.clone(),
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(border_style)
        .style(palette.card())
        .title(Span::styled(
            format!(" {} ", truncate(&title, inner_width.saturating_sub(2))),
            palette.label(),
        ));
    // No emoji in the record: name the flag on the bottom edge instead
    if card.flag_emoji.is_none() {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} ", truncate(&card.flag_alt, inner_width.saturating_sub(2))),
                palette.muted(),
            ))
            .right_aligned(),
        );
    }

    let lines = vec![
        field_line("Population", &card.population, inner_width, palette),
        field_line("Region", &card.region, inner_width, palette),
        field_line("Capital", &card.capital, inner_width, palette),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &str, value: &str, width: usize, palette: &Palette) -> Line<'static> {
    let prefix = format!("{label}: ");
    let room = width.saturating_sub(prefix.width());
    Line::from(vec![
        Span::styled(prefix, palette.label()),
        Span::styled(truncate(value, room), Style::default().fg(palette.fg)),
    ])
}

/// Label column padded so values line up inside the overlay
fn detail_line(label: &str, value: &str, width: usize, palette: &Palette) -> Line<'static> {
    let prefix = format!("{:<LABEL_WIDTH$}", format!("{label}:"));
    let room = width.saturating_sub(LABEL_WIDTH);
    Line::from(vec![
        Span::styled(prefix, palette.label()),
        Span::styled(truncate(value, room), Style::default().fg(palette.fg)),
    ])
}

fn render_overlay(frame: &mut Frame, app: &mut App, palette: &Palette) {
    let Some(detail) = app.detail.clone() else {
        return;
    };

    let area = frame.area();
    let width = area.width.saturating_sub(8).clamp(area.width.min(40), 100);
    let height = area.height.saturating_sub(4).clamp(area.height.min(20), 30);
    let overlay_area = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.card())
        .title(Span::styled(format!(" {} ", detail.name), palette.label()));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);
    app.hits.overlay = Some(overlay_area);

    if overlay_area.width > 6 {
        let close = Rect::new(overlay_area.right() - 5, overlay_area.y, 3, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "[x]",
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            )),
            close,
        );
        app.hits.close = Some(close);
    }

    let padded = Rect {
        x: inner.x + 1,
        y: inner.y + 1,
        width: inner.width.saturating_sub(2),
        height: inner.height.saturating_sub(1),
    };

    // Flag on the left when the terminal can draw it
    let body = match app.flag.as_mut() {
        Some(protocol) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Min(20)])
                .split(padded);
            let image_area = Rect {
                width: cols[0].width.saturating_sub(2),
                ..cols[0]
            };
            frame.render_stateful_widget(StatefulImage::default(), image_area, protocol);
            cols[1]
        }
        None => padded,
    };

    render_detail_body(frame, app, &detail, body, palette);
}

fn render_detail_body(
    frame: &mut Frame,
    app: &mut App,
    detail: &DetailView,
    area: Rect,
    palette: &Palette,
) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    if app.flag.is_none() {
        lines.push(Line::from(Span::styled(
            truncate(&detail.flag_alt, width),
            palette.muted().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    lines.push(detail_line("Native Name", &detail.native_name, width, palette));
    lines.push(detail_line("Population", &detail.population, width, palette));
    lines.push(detail_line("Region", &detail.region, width, palette));
    lines.push(detail_line("Sub Region", &detail.subregion, width, palette));
    lines.push(detail_line("Capital", &detail.capital, width, palette));
    lines.push(Line::from(""));
    lines.push(detail_line(
        "Top Level Domain",
        &detail.top_level_domains,
        width,
        palette,
    ));
    lines.push(detail_line("Currencies", &detail.currencies, width, palette));
    lines.push(detail_line("Languages", &detail.languages, width, palette));
    lines.push(Line::from(""));

    // Links go on the rows below; the placeholder sits next to the label
    let mut border_label = vec![Span::styled(
        format!("{:<LABEL_WIDTH$}", "Border Countries:"),
        palette.label(),
    )];
    if let Some(placeholder) = detail.borders.placeholder() {
        border_label.push(Span::styled(placeholder, Style::default().fg(palette.fg)));
    }
    lines.push(Line::from(border_label));

    let text_height = (lines.len() as u16).min(area.height);
    frame.render_widget(
        Paragraph::new(lines),
        Rect {
            height: text_height,
            ..area
        },
    );

    let buttons_area = Rect {
        y: area.y + text_height,
        height: area.height - text_height,
        ..area
    };
    render_border_buttons(frame, app, detail, buttons_area, palette);
}

/// Lay out border links left to right, wrapping onto new rows
fn render_border_buttons(
    frame: &mut Frame,
    app: &mut App,
    detail: &DetailView,
    area: Rect,
    palette: &Palette,
) {
    let mut x = area.x;
    let mut y = area.y;

    for (i, link) in detail.borders.links().iter().enumerate() {
        let text = format!("[ {} ]", link.label);
        let w = (text.width() as u16).min(area.width);
        if x > area.x && x + w > area.right() {
            x = area.x;
            y += 1;
        }
        if y >= area.bottom() {
            break;
        }

        let style = if app.border_focus == Some(i) {
            palette.highlight()
        } else {
            Style::default().fg(palette.fg)
        };
        let rect = Rect::new(x, y, w, 1);
        frame.render_widget(Paragraph::new(Span::styled(text, style)), rect);
        app.hits.borders.push((rect, i));

        x += w + 1;
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let dim = palette.muted();
    let mut spans = Vec::new();

    match &app.load_state {
        LoadState::Loading { started_at } => {
            spans.push(Span::styled(
                format!("  {} Loading", spinner_frame(*started_at)),
                Style::default().fg(palette.accent),
            ));
        }
        LoadState::Ready => {
            spans.push(Span::styled(
                format!(
                    "  {} of {} countries",
                    app.grid.cards().len(),
                    app.store.len()
                ),
                dim,
            ));
        }
        LoadState::Failed(_) => {
            spans.push(Span::styled("  ✗ offline", Style::default().fg(palette.error)));
        }
    }

    let hints: &[&str] = if app.overlay.is_open() {
        &["Tab border", "Enter open", "Esc close"]
    } else {
        &["↑↓ select", "Enter details", "^r region", "^t theme", "Esc quit"]
    };
    for hint in hints {
        spans.push(Span::styled(" [", dim));
        spans.push(Span::styled(*hint, dim));
        spans.push(Span::styled("]", dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the toast notification line (below status bar)
fn render_toast_line(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    if let Some(toast) = &app.toast {
        let style = if toast.is_error {
            Style::default().fg(palette.error)
        } else {
            Style::default().fg(palette.accent)
        };
        let line = Line::from(vec![
            Span::styled("  [", palette.muted()),
            Span::styled(toast.message.as_str(), style),
            Span::styled("]", palette.muted()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn right_aligned(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.right() - width,
        width,
        ..area
    }
}

/// Cut `s` to at most `max` columns, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    FRAMES[(elapsed as usize) % FRAMES.len()]
}
