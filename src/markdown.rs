use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Convert markdown text to styled terminal lines.
///
/// Handles the constructs that show up in model answers: paragraphs, bold
/// and italic emphasis, inline code, fenced code blocks, headings, list
/// items and tables. Anything else falls through as plain text.
pub fn markdown_to_lines(source: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current_spans: Vec<Span<'static>> = Vec::new();

    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(source, options);

    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut in_heading = false;
    let mut in_code_block = false;
    let mut code_content = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Start(Tag::Heading { level, .. }) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                in_heading = true;
                current_spans.push(Span::styled(
                    format!("{} ", "#".repeat(level as usize)),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                in_code_block = true;
                code_content.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                for code_line in code_content.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", code_line),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::default());
                in_code_block = false;
            }
            Event::Start(Tag::Strong) => bold += 1,
            Event::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic += 1,
            Event::End(TagEnd::Emphasis) => italic = italic.saturating_sub(1),
            Event::Start(Tag::Item) => {
                current_spans.push(Span::raw("• "));
            }
            Event::End(TagEnd::Item) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            // Tables flatten to one line per row, cells separated by pipes
            Event::Start(Tag::Table(_)) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::TableHead) => bold += 1,
            Event::End(TagEnd::TableHead) => {
                bold = bold.saturating_sub(1);
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::End(TagEnd::TableRow) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Start(Tag::TableCell) => {
                if !current_spans.is_empty() {
                    current_spans.push(Span::raw(" | "));
                }
            }
            Event::Text(text) => {
                if in_code_block {
                    code_content.push_str(&text);
                } else {
                    let mut style = Style::default();
                    if bold > 0 || in_heading {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    if italic > 0 {
                        style = style.add_modifier(Modifier::ITALIC);
                    }
                    if in_heading {
                        style = style.fg(Color::Cyan);
                    }

                    let text_str = text.to_string();
                    let mut parts = text_str.split('\n').peekable();
                    while let Some(part) = parts.next() {
                        if !part.is_empty() {
                            current_spans.push(Span::styled(part.to_owned(), style));
                        }
                        if parts.peek().is_some() {
                            lines.push(Line::from(std::mem::take(&mut current_spans)));
                        }
                    }
                }
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ));
            }
            Event::SoftBreak | Event::HardBreak => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            _ => {}
        }
    }

    // Flush remaining spans
    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }

    lines
}
