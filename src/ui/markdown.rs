//! Markdown to ratatui `Text`.
//!
//! Covers what review comments actually use: paragraphs, headings, emphasis,
//! inline code, fenced code (diff fences coloured by line), lists, quotes,
//! links and GitHub suggestion blocks.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

/// Colour for one line of a unified diff.
pub fn diff_line_style(line: &str) -> Style {
    if line.starts_with("@@") {
        Style::default().fg(Color::Cyan)
    } else if line.starts_with('+') {
        Style::default().fg(Color::Green)
    } else if line.starts_with('-') {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeKind {
    Plain,
    Diff,
}

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack; entries are patched onto their parent.
    styles: Vec<Style>,
    /// Per-line prefixes (quote and code-block borders).
    line_prefixes: Vec<Span<'static>>,
    /// None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    code: Option<CodeKind>,
    link_url: Option<String>,
    needs_newline: bool,
    /// The last line holds only a list marker; the item's first paragraph joins it.
    item_start: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            code: None,
            link_url: None,
            needs_newline: false,
            item_start: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for prefix in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, prefix);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.push_line(Line::from(vec![span])),
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => {
                let style = Style::default().fg(Color::White).bg(Color::DarkGray);
                self.push_span(Span::styled(c.to_string(), style));
            }
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                self.push_span(Span::raw(if checked { "[x] " } else { "[ ] " }));
            }
            // GitHub folds long sections in <details>; the tags are shown dimmed.
            Event::Html(html) => {
                self.blank_line_if_needed();
                let style = Style::default().fg(Color::DarkGray);
                for line in html.lines() {
                    self.push_line(Line::from(Span::styled(line.to_owned(), style)));
                }
            }
            Event::InlineHtml(html) => {
                let style = Style::default().fg(Color::DarkGray);
                self.push_span(Span::styled(html.to_string(), style));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let item_start = std::mem::take(&mut self.item_start);
        match tag {
            Tag::Paragraph if item_start => self.needs_newline = false,
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let style = heading_style(self.base_fg, level);
                self.push_line(Line::default());
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                if !self.text.lines.is_empty() {
                    self.push_line(Line::default());
                }
                self.needs_newline = false;
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.as_ref(),
                    CodeBlockKind::Indented => "",
                };
                let border = Style::default().fg(Color::DarkGray);
                let top = if lang.is_empty() {
                    Line::from(Span::styled("╭──", border))
                } else {
                    Line::from(vec![
                        Span::styled("╭── ", border),
                        Span::styled(lang.to_owned(), border.add_modifier(Modifier::BOLD)),
                        Span::styled(" ──", border),
                    ])
                };
                self.push_line(top);
                self.line_prefixes.push(Span::styled("│ ", border));
                self.code = Some(if lang == "diff" || lang == "suggestion" {
                    CodeKind::Diff
                } else {
                    CodeKind::Plain
                });
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{}• ", indent),
                        Some(n) => {
                            let marker = format!("{}{}. ", indent, n);
                            *n += 1;
                            marker
                        }
                    };
                    self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
                }
                self.needs_newline = false;
                self.item_start = true;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled(
                    "╰──",
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(url, link_style()));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        self.item_start = false;
        // ratatui renders tabs zero-width
        let text = cow.replace('\t', "    ");

        match self.code {
            Some(kind) => {
                for line in text.lines() {
                    let style = match kind {
                        CodeKind::Diff => diff_line_style(line),
                        CodeKind::Plain => Style::default().fg(Color::White),
                    };
                    self.push_line(Line::from(Span::styled(line.to_owned(), style)));
                }
            }
            None => {
                let style = self.style();
                self.push_span(Span::styled(text, style));
            }
        }
    }
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().fg(base_fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}
