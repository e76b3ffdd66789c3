//! Frame rendering: tab bar, gutter + text area, status line, overlays.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use ratatui::Frame;

use quill_core::Session;

use crate::app::App;
use crate::highlight::{self, Kind};

/// Modal overlay drawn above the editor while a prompt loop runs.
pub(crate) enum Overlay<'a> {
    /// Single-line text input
    Input {
        title: &'a str,
        value: &'a str,
        hint: Option<&'a str>,
    },
    /// Save/Discard/Cancel confirmation for a modified session
    CloseConfirm { name: &'a str },
    /// Action menu of the replace dialog
    ReplaceActions { query: &'a str, replacement: &'a str },
}

pub(crate) fn render(frame: &mut Frame, app: &mut App, overlay: Option<&Overlay>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    render_tab_bar(frame, app, chunks[0]);
    render_text_area(frame, app, chunks[1]);
    render_status_line(frame, app, chunks[2]);

    if let Some(overlay) = overlay {
        let area = frame.area();
        render_overlay(frame, overlay, area);
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .editor
        .sessions()
        .iter()
        .map(|s| Line::from(tab_title(s)))
        .collect();
    if titles.is_empty() {
        return;
    }

    let tabs = Tabs::new(titles)
        .select(app.editor.sessions().active_index().unwrap_or(0))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn tab_title(session: &Session) -> String {
    if session.is_modified() {
        format!("{}*", session.name())
    } else {
        session.name().to_string()
    }
}

fn render_text_area(frame: &mut Frame, app: &mut App, area: Rect) {
    let (total_lines, cursor_line) = match app.editor.active() {
        Some(session) => (
            session.surface().len_lines(),
            session.surface().cursor().position.line,
        ),
        None => return,
    };
    let height = area.height as usize;

    // Keep the cursor line in view.
    if cursor_line < app.scroll {
        app.scroll = cursor_line;
    } else if height > 0 && cursor_line >= app.scroll + height {
        app.scroll = cursor_line + 1 - height;
    }
    app.scroll = app.scroll.min(total_lines.saturating_sub(1));

    let show_gutter = app.editor.config().show_line_numbers;
    let gutter_width = if show_gutter {
        gutter_digits(total_lines) + 1
    } else {
        0
    };

    let Some(session) = app.editor.active() else {
        return;
    };
    let mut rows: Vec<Line> = Vec::with_capacity(height);
    for line_idx in app.scroll..(app.scroll + height).min(total_lines) {
        rows.push(content_line(
            app,
            session,
            line_idx,
            show_gutter,
            gutter_width,
        ));
    }

    frame.render_widget(Paragraph::new(rows), area);
}

/// Gutter digit count, growing with the line count.
fn gutter_digits(total_lines: usize) -> usize {
    let mut digits = 1;
    let mut max = total_lines.max(1);
    while max >= 10 {
        max /= 10;
        digits += 1;
    }
    digits
}

fn content_line(
    app: &App,
    session: &Session,
    line_idx: usize,
    show_gutter: bool,
    gutter_width: usize,
) -> Line<'static> {
    let surface = session.surface();
    let raw = surface
        .line(line_idx)
        .map(|l| l.trim_end_matches(['\n', '\r']).to_string())
        .unwrap_or_default();
    let cursor = surface.cursor();

    // Per-character styles: syntax first, then the overlays.
    let chars: Vec<char> = raw.chars().collect();
    let mut styles = vec![Style::default(); chars.len()];

    for (range, kind) in highlight::spans(&raw) {
        let style = match kind {
            Kind::Keyword => Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            Kind::Str => Style::default().fg(Color::Green),
            Kind::Comment => Style::default().fg(Color::DarkGray),
        };
        for (char_idx, (byte_idx, _)) in raw.char_indices().enumerate() {
            if range.contains(&byte_idx) {
                styles[char_idx] = style;
            }
        }
    }

    let on_cursor_line = cursor.position.line == line_idx;
    if on_cursor_line && app.editor.config().highlight_current_line {
        for style in &mut styles {
            *style = style.bg(Color::Rgb(40, 40, 40));
        }
    }

    if let Some((start, end)) = cursor.selection_range() {
        if line_idx >= start.line && line_idx <= end.line {
            let from = if line_idx == start.line { start.column } else { 0 };
            let to = if line_idx == end.line {
                end.column
            } else {
                chars.len()
            };
            for style in styles.iter_mut().take(to.min(chars.len())).skip(from) {
                *style = Style::default().bg(Color::Blue).fg(Color::White);
            }
        }
    }

    let mut cursor_past_end = false;
    if on_cursor_line {
        let col = cursor.position.column;
        if col < chars.len() {
            styles[col] = styles[col].add_modifier(Modifier::REVERSED);
        } else {
            cursor_past_end = true;
        }
    }

    // Coalesce equal-styled runs into spans.
    let mut spans: Vec<Span> = Vec::new();
    if show_gutter {
        spans.push(Span::styled(
            format!("{:>width$} ", line_idx + 1, width = gutter_width - 1),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut run = String::new();
    let mut run_style = Style::default();
    for (c, style) in chars.iter().zip(styles.iter()) {
        if run.is_empty() || *style == run_style {
            run_style = *style;
            run.push(*c);
        } else {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
            run_style = *style;
            run.push(*c);
        }
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    if cursor_past_end {
        spans.push(Span::styled(
            " ".to_string(),
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }

    Line::from(spans)
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let right = match app.editor.active() {
        Some(session) => {
            let pos = session.surface().cursor().position;
            format!(" {} ", pos)
        }
        None => String::new(),
    };

    let left = match &app.status {
        Some(message) => Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        ),
        None => Span::styled(
            " ^S save  ^O open  ^N new  ^W close  ^F find  ^H replace  ^Q quit",
            Style::default().fg(Color::DarkGray),
        ),
    };

    let columns = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(right.len() as u16),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(left)).style(Style::default().bg(Color::Rgb(25, 25, 25))),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(right).style(
            Style::default()
                .bg(Color::Rgb(25, 25, 25))
                .fg(Color::DarkGray),
        ),
        columns[1],
    );
}

fn render_overlay(frame: &mut Frame, overlay: &Overlay, area: Rect) {
    let (title, lines) = match overlay {
        Overlay::Input { title, value, hint } => {
            let mut lines = vec![Line::from(format!("{value}\u{2588}"))];
            if let Some(hint) = hint {
                lines.push(Line::from(Span::styled(
                    (*hint).to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            (*title, lines)
        }
        Overlay::CloseConfirm { name } => (
            "Unsaved changes",
            vec![
                Line::from(format!("Save changes to {name}?")),
                Line::from(Span::styled(
                    "[S]ave   [D]iscard   [C]ancel",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
        Overlay::ReplaceActions { query, replacement } => (
            "Replace",
            vec![
                Line::from(format!("\"{query}\" -> \"{replacement}\"")),
                Line::from(Span::styled(
                    "[Enter] replace   [A]ll   [N]ext   [Esc] done",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
    };

    let height = lines.len() as u16 + 2;
    let rect = centered_rect(area, 56, height);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        rect,
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gutter_grows_with_line_count() {
        assert_eq!(gutter_digits(0), 1);
        assert_eq!(gutter_digits(9), 1);
        assert_eq!(gutter_digits(10), 2);
        assert_eq!(gutter_digits(150), 3);
    }

    #[test]
    fn modified_session_title_gets_a_marker() {
        let mut session = Session::untitled();
        assert_eq!(tab_title(&session), "Untitled");

        session.surface_mut().insert(0, "x").unwrap();
        assert_eq!(tab_title(&session), "Untitled*");
    }

    #[test]
    fn overlay_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(area, 56, 4);
        assert!(rect.x + rect.width <= area.width);
        assert!(rect.y + rect.height <= area.height);

        // Narrow terminals shrink the box instead of overflowing.
        let tiny = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(tiny, 56, 4);
        assert!(rect.width <= tiny.width);
    }
}
