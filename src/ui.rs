//! The UI renders the review session as a strip of pages with draggable boundary markers.
//!
//! The strip has four rows: an indicator row showing where a drag will land (and where the last
//! one did), the marker track, page numbers, and a colour bar marking which section each page
//! falls in. Below it sits the section list and a help bar.

use crate::app_state::AppState;
use crate::geometry::Viewport;
use crate::marker::Marker;
use crate::section::Section;
use crate::snap_index::SnapIndex;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const SECTION_COLOURS: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Blue,
    Color::Yellow,
];

/// Scroll position and screen placement of the page strip between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripView {
    /// Horizontal scroll offset of the strip content.
    pub scroll_x: f64,
    /// Content offset to bring into view on the next frame.
    pub focus: Option<f64>,
    /// Screen placement from the last frame, for converting pointer events.
    pub viewport: Viewport,
}

impl StripView {
    /// Scroll by `dx`, dropping any pending focus.
    pub fn scroll_by(&mut self, dx: f64) {
        self.scroll_x = (self.scroll_x + dx).max(0.0);
        self.focus = None;
    }

    fn settle(&mut self, content_width: f64, visible: f64) {
        if let Some(focus) = self.focus {
            if focus < self.scroll_x {
                self.scroll_x = focus;
            } else if focus > self.scroll_x + visible - 1.0 {
                self.scroll_x = focus - visible + 1.0;
            }
        }
        let max_scroll = (content_width - visible).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_scroll).round();
    }
}

/// Renders the page strip, section list and help bar.
pub fn draw(f: &mut Frame, app: &AppState, view: &mut StripView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Strip
            Constraint::Min(0),    // Sections
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_strip(f, app, view, chunks[0]);
    draw_sections(f, app, chunks[1]);
    draw_help(f, app, chunks[2]);
}

fn draw_strip(f: &mut Frame, app: &AppState, view: &mut StripView, area: Rect) {
    let page_count = app.snaps().map_or(0, SnapIndex::page_count);
    let title = match app.drag() {
        Some(drag) if drag.inside_track => {
            format!("Pages ({page_count}) - dragging marker {}", drag.marker)
        }
        Some(drag) => format!("Pages ({page_count}) - marker {} lifted", drag.marker),
        None => format!("Pages ({page_count})"),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (Some(snaps), Some(markers)) = (app.snaps(), app.markers()) else {
        f.render_widget(Paragraph::new("Waiting for document geometry..."), inner);
        return;
    };

    let visible = f64::from(inner.width);
    view.settle(snaps.end() + 1.0, visible);
    view.viewport = Viewport {
        origin_x: f64::from(inner.x),
        scroll_x: view.scroll_x,
        track_top: f64::from(inner.y) + 1.0,
        track_bottom: f64::from(inner.y) + 3.0,
    };

    let strip = StripRows {
        snaps,
        markers: markers.markers(),
        sections: app.sections(),
        app,
    };
    let rows: Vec<Line> = (0..4)
        .map(|row| {
            let spans: Vec<Span> = (0..inner.width)
                .map(|col| {
                    let x = view.scroll_x + f64::from(col);
                    let (ch, style) = strip.cell(row, x);
                    Span::styled(ch.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(rows), inner);
}

struct StripRows<'a> {
    snaps: &'a SnapIndex,
    markers: &'a [Marker],
    sections: &'a [Section],
    app: &'a AppState,
}

impl StripRows<'_> {
    #[allow(clippy::float_cmp)]
    fn cell(&self, row: u16, x: f64) -> (char, Style) {
        // The ghost sits on the track, or on the indicator row when lifted off it.
        if let Some(d) = self.app.drag().filter(|d| d.cursor.round() == x) {
            if row == u16::from(d.inside_track) {
                let ch = if d.inside_track { '◆' } else { '◇' };
                return (
                    ch,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        match self.snaps.index_of(x) {
            Some(boundary) => self.boundary_cell(row, boundary, x),
            None => self.page_cell(row, x),
        }
    }

    #[allow(clippy::float_cmp)]
    fn boundary_cell(&self, row: u16, boundary: usize, x: f64) -> (char, Style) {
        match row {
            0 => {
                if self.app.drag_preview() == Some(boundary) {
                    ('▼', Style::default().fg(Color::Yellow))
                } else if self.app.drag().is_none() && self.app.active_indicator() == Some(boundary)
                {
                    ('▾', Style::default().fg(Color::Green))
                } else {
                    (' ', Style::default())
                }
            }
            1 => {
                let Some(index) = self.markers.iter().position(|m| m.position == x) else {
                    return ('·', Style::default().fg(Color::DarkGray));
                };
                let marker = self.markers[index];
                let dragging = self.app.drag().is_some_and(|d| d.marker == index);
                let mut style = if marker.locked {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                if dragging {
                    style = Style::default().fg(Color::DarkGray);
                } else if index == self.app.selected_marker {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                (if marker.locked { '┃' } else { '│' }, style)
            }
            _ => (' ', Style::default()),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn page_cell(&self, row: u16, x: f64) -> (char, Style) {
        let positions = self.snaps.positions();
        let page = positions.partition_point(|&b| b <= x);
        if page == 0 || page >= positions.len() {
            return (' ', Style::default());
        }
        let section = self
            .sections
            .iter()
            .position(|s| s.start_page <= page && page <= s.end_page);
        let colour = section.map_or(Color::DarkGray, |i| {
            SECTION_COLOURS[i % SECTION_COLOURS.len()]
        });
        match row {
            1 => ('─', Style::default().fg(Color::DarkGray)),
            2 => {
                let offset = (x - positions[page - 1]) as usize;
                let label = page.to_string();
                let ch = offset
                    .checked_sub(1)
                    .and_then(|i| label.chars().nth(i))
                    .unwrap_or(' ');
                (ch, Style::default().fg(colour))
            }
            3 => (' ', Style::default().bg(colour)),
            _ => (' ', Style::default()),
        }
    }
}

fn draw_sections(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let colour = SECTION_COLOURS[i % SECTION_COLOURS.len()];
            let pages = section.page_len();
            let plural = if pages == 1 { "" } else { "s" };
            let line = Line::from(vec![
                Span::styled("■ ", Style::default().fg(colour)),
                Span::raw(format!(
                    "{:>4}-{:<4} ",
                    section.start_page, section.end_page
                )),
                Span::styled(
                    section.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({pages} page{plural})"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let style = if i == app.selected_section {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!("Sections ({})", app.sections().len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let help = if let Some(ref msg) = app.message {
        msg.clone()
    } else if app.drag().is_some() {
        "←/→: Move | Shift+←/→: Page | ↑: Lift | ↓: Lower | Enter: Drop | Esc: Cancel".to_string()
    } else {
        "←/→: Marker | Enter: Pick up | ↑/↓: Section | +/-: Section start | q: Save & Quit"
            .to_string()
    };
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, area);
}
