use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, FocusPane, StatusKind};
use crate::markdown::markdown_to_lines;
use crate::transcript::Sender;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // The chat box grows with its content, up to three text rows
    let chat_height = if app.chat_enabled {
        app.chat_input.visible_height(area.width.saturating_sub(2)) + 2
    } else {
        3
    };

    // Main layout: header, video form, status line, conversation, chat form, footer
    let [header_area, video_area, status_area, transcript_area, chat_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(chat_height),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(app, frame, header_area);
    render_video_input(app, frame, video_area);
    render_status(app, frame, status_area);
    render_transcript(app, frame, transcript_area);
    render_chat_input(app, frame, chat_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();

    let title = Line::from(vec![
        Span::styled(
            " YouTube Video Chat ",
            Style::default().fg(palette.bar_fg).bold(),
        ),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(palette.bar_fg),
        ),
        Span::styled(
            format!("[{}] ", app.theme.as_str()),
            Style::default().fg(palette.bar_fg),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(palette.bar_bg));
    frame.render_widget(header, area);
}

fn render_video_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let focused = app.focus == FocusPane::VideoInput;
    let border_color = if focused {
        palette.border_focused
    } else {
        palette.border
    };

    let title = if app.video_busy() {
        " YouTube URL (processing) "
    } else {
        " YouTube URL "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Single-line field with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.video_input.cursor();

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.video_input.is_empty() {
        Paragraph::new("Paste YouTube video URL here...")
            .style(Style::default().fg(palette.dim))
            .block(block)
    } else {
        let visible_text: String = app
            .video_input
            .content()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();

        let style = if app.video_busy() {
            Style::default().fg(palette.dim)
        } else {
            Style::default().fg(palette.user)
        };

        Paragraph::new(visible_text).style(style).block(block)
    };

    frame.render_widget(input, area);

    if focused && !app.video_busy() {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let Some(status) = &app.status else {
        return;
    };

    let (color, text) = match status.kind {
        StatusKind::Loading => {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            let base = status.text.trim_end_matches('.');
            (palette.loading, format!(" {}{}", base, dots))
        }
        StatusKind::Success => (palette.success, format!(" {}", status.text)),
        StatusKind::Error => (palette.error, format!(" {}", status.text)),
    };

    let line = Line::from(Span::styled(text, Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let focused = app.focus == FocusPane::Transcript;
    let border_color = if focused {
        palette.border_focused
    } else {
        palette.border
    };

    // Store the drawn area for mouse hit-testing
    app.transcript_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    if app.transcript.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "Process a video above, then ask questions about it here",
            Style::default().fg(palette.dim),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.transcript.messages() {
        match msg.sender {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default()
                        .fg(palette.user)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in msg.content.lines() {
                    lines.push(Line::from(line.to_string()));
                }
                lines.push(Line::default());
            }
            Sender::Bot => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(palette.bot).add_modifier(Modifier::BOLD),
                )));
                if msg.thinking {
                    // Animated ellipsis: cycles through ".", "..", "..."
                    let dots = ".".repeat((app.animation_frame as usize) + 1);
                    lines.push(Line::from(Span::styled(
                        format!("Thinking{}", dots),
                        Style::default()
                            .fg(palette.dim)
                            .add_modifier(Modifier::ITALIC),
                    )));
                } else {
                    lines.extend(markdown_to_lines(&msg.content));
                }
                lines.push(Line::default());
            }
        }
    }

    // Wrap to the inner width up front: scroll limits and the scrollbar
    // then count exactly the rows the paragraph draws
    let wrapped = wrap_lines(lines, inner_width as usize);
    let total_rows = u16::try_from(wrapped.len()).unwrap_or(u16::MAX);

    // A pending scroll request jumps to the bottom now that the real row
    // count for this frame is known
    let max_scroll = total_rows.saturating_sub(inner_height);
    if app.scroll_pending {
        app.transcript_scroll = max_scroll;
        app.scroll_pending = false;
    }
    app.transcript_scroll = app.transcript_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(wrapped))
        .block(block)
        .scroll((app.transcript_scroll, 0));

    frame.render_widget(paragraph, area);

    // Render scrollbar
    if total_rows > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state =
            ScrollbarState::new(total_rows as usize).position(app.transcript_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_chat_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let focused = app.focus == FocusPane::ChatInput;

    // Until a video has processed, the chat form is a disabled placeholder
    if !app.chat_enabled {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Ask about the video ");
        let placeholder = Paragraph::new(Span::styled(
            "Process a video first to start chatting",
            Style::default().fg(palette.dim),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let border_color = if focused {
        palette.border_focused
    } else {
        palette.border
    };
    let title = if app.chat_busy() {
        " Ask about the video (waiting) "
    } else {
        " Ask about the video "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    if app.chat_input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "Ask a question about the video...",
            Style::default().fg(palette.dim),
        ))
        .block(block);
        frame.render_widget(placeholder, area);

        if focused && !app.chat_busy() {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    // The field scrolls internally once the content exceeds three rows
    app.chat_input.scroll_to_cursor(inner_width);
    let scroll = app.chat_input.scroll();

    let visible: Vec<Line> = app
        .chat_input
        .wrapped_rows(inner_width)
        .into_iter()
        .skip(scroll as usize)
        .take(inner_height as usize)
        .map(Line::from)
        .collect();

    let style = if app.chat_busy() {
        Style::default().fg(palette.dim)
    } else {
        Style::default().fg(palette.user)
    };

    let input = Paragraph::new(Text::from(visible)).style(style).block(block);
    frame.render_widget(input, area);

    if focused && !app.chat_busy() {
        let (row, col) = app.chat_input.cursor_row_col(inner_width);
        if row >= scroll && row < scroll + inner_height {
            frame.set_cursor_position((area.x + col + 1, area.y + (row - scroll) + 1));
        }
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (badge_text, badge_style) = match app.focus {
        FocusPane::VideoInput => (" URL ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        FocusPane::ChatInput => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        FocusPane::Transcript => (" VIEW ", Style::default().bg(Color::Blue).fg(Color::White)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.focus {
        FocusPane::VideoInput => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" process ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" Ctrl+T ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" Ctrl+C ", key_style),
            Span::styled(" quit ", label_style),
        ],
        FocusPane::ChatInput => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Shift+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" Ctrl+C ", key_style),
            Span::styled(" quit ", label_style),
        ],
        FocusPane::Transcript => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" g/G ", key_style),
            Span::styled(" top/bottom ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(badge_text, badge_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Wrap styled lines at a fixed display width, breaking on spaces and
/// hard-breaking words wider than a row. The transcript paragraph draws
/// these rows without its own wrapping, so scroll arithmetic and the drawn
/// output always agree.
fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    let mut rows = Vec::new();
    for line in lines {
        wrap_line(line, width, &mut rows);
    }
    rows
}

fn wrap_line(line: Line<'static>, width: usize, rows: &mut Vec<Line<'static>>) {
    if line.width() <= width {
        rows.push(line);
        return;
    }

    let chars: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |c| (c, span.style)))
        .collect();

    let start_rows = rows.len();
    let mut row: Vec<(char, Style)> = Vec::new();
    let mut row_width = 0usize;
    let mut idx = 0;

    while idx < chars.len() {
        let is_space = chars[idx].0 == ' ';
        let mut end = idx;
        let mut run_width = 0usize;
        while end < chars.len() && (chars[end].0 == ' ') == is_space {
            run_width += chars[end].0.width().unwrap_or(0);
            end += 1;
        }

        if is_space {
            // Whitespace at a break point is dropped; mid-row runs are kept
            if row.is_empty() && rows.len() > start_rows {
                idx = end;
            } else if row_width + run_width <= width {
                row.extend_from_slice(&chars[idx..end]);
                row_width += run_width;
                idx = end;
            } else {
                flush_row(rows, &mut row, &mut row_width);
                idx = end;
            }
        } else if row_width + run_width <= width {
            row.extend_from_slice(&chars[idx..end]);
            row_width += run_width;
            idx = end;
        } else if run_width <= width {
            // The word fits on a row of its own
            flush_row(rows, &mut row, &mut row_width);
        } else {
            // A word wider than the view hard-breaks at the margin
            while idx < end {
                let char_width = chars[idx].0.width().unwrap_or(0);
                if !row.is_empty() && row_width + char_width > width {
                    break;
                }
                row.push(chars[idx]);
                row_width += char_width;
                idx += 1;
            }
            flush_row(rows, &mut row, &mut row_width);
        }
    }

    flush_row(rows, &mut row, &mut row_width);
    // A line that reduced to nothing still occupies one drawn row
    if rows.len() == start_rows {
        rows.push(Line::default());
    }
}

fn flush_row(rows: &mut Vec<Line<'static>>, row: &mut Vec<(char, Style)>, row_width: &mut usize) {
    while row.last().map(|(c, _)| *c == ' ').unwrap_or(false) {
        row.pop();
    }
    if !row.is_empty() {
        rows.push(row_to_line(std::mem::take(row)));
    }
    *row_width = 0;
}

fn row_to_line(row: Vec<(char, Style)>) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut style = Style::default();
    for (c, char_style) in row {
        if text.is_empty() {
            style = char_style;
        } else if char_style != style {
            spans.push(Span::styled(std::mem::take(&mut text), style));
            style = char_style;
        }
        text.push(c);
    }
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}
