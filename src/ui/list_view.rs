use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::items::{format_timestamp, ListEntry};
use crate::list::{Filter, FilterList, HEADER_HEIGHT};
use crate::types::{PrState, PullRequest};

pub fn render<T: ListEntry>(
    frame: &mut Frame,
    area: Rect,
    list: &FilterList<T>,
    title: &str,
    empty: &str,
) {
    let (width, height) = list.size();
    let area = Rect {
        width: area.width.min(width),
        height: area.height.min(height),
        ..area
    };
    let [header, body] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);

    frame.render_widget(Paragraph::new(header_line(list, title)), header);

    if list.is_empty() {
        let msg = if list.is_filtering() {
            "No matches"
        } else {
            empty
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::Gray)),
            body,
        );
        return;
    }

    let items: Vec<ListItem> = list
        .visible()
        .enumerate()
        .map(|(i, entry)| {
            let selected = i == list.cursor();
            let marker = if selected { "│ " } else { "  " };
            let title_style = if selected {
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let desc_style = if selected {
                Style::default().fg(Color::LightMagenta)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker_style = Style::default().fg(Color::Magenta);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, marker_style),
                    Span::styled(entry.title(), title_style),
                ]),
                Line::from(vec![
                    Span::styled(marker, marker_style),
                    Span::styled(entry.description(), desc_style),
                ]),
                Line::default(),
            ])
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(list.cursor()));
    frame.render_stateful_widget(List::new(items), body, &mut state);
}

fn header_line<T: ListEntry>(list: &FilterList<T>, title: &str) -> Line<'static> {
    let title_style = Style::default()
        .fg(Color::White)
        .bg(Color::Indexed(62))
        .add_modifier(Modifier::BOLD);
    let count = if list.is_filtering() {
        format!("{}/{}", list.len(), list.total())
    } else {
        list.total().to_string()
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", title), title_style),
        Span::styled(format!("  {} items", count), Style::default().fg(Color::DarkGray)),
    ];
    match list.filter() {
        Filter::Off => {}
        Filter::Editing(text) => {
            spans.push(Span::raw("  Filter: "));
            spans.push(Span::styled(format!("{}▏", text), Style::default().fg(Color::Yellow)));
        }
        Filter::Applied(text) => {
            spans.push(Span::raw("  Filter: "));
            spans.push(Span::styled(text.clone(), Style::default().fg(Color::Gray)));
        }
    }
    Line::from(spans)
}

/// Two lines plus a spacer, shown above the comment list.
pub fn pr_header(pr: &PullRequest) -> Text<'static> {
    let mut status = Vec::new();
    if pr.draft {
        status.push("DRAFT");
    }
    if pr.merged {
        status.push("MERGED");
    }
    status.push(match pr.state {
        PrState::Open => "🟢 OPEN",
        PrState::Closed => "🔴 CLOSED",
    });

    let created = pr
        .created_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();

    Text::from(vec![
        Line::from(Span::styled(
            format!("#{} {}", pr.number, pr.title),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("by {} • {} [{}]", pr.author, created, status.join(", ")),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{at, pr};

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn pr_header_flags() {
        let mut p = pr(7);
        p.created_at = Some(at(14));
        assert_eq!(
            plain(&pr_header(&p)),
            vec!["#7 Change 7", "by alice • 2024-03-01 14:00 [🟢 OPEN]", ""]
        );

        p.state = PrState::Closed;
        p.draft = true;
        p.merged = true;
        assert_eq!(
            plain(&pr_header(&p))[1],
            "by alice • 2024-03-01 14:00 [DRAFT, MERGED, 🔴 CLOSED]"
        );
    }
}
