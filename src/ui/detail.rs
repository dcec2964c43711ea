//! Pre-rendered content of the comment detail viewport.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::markdown;
use crate::items::format_timestamp;
use crate::types::{PullRequest, ReviewComment};

const LINK_HINT: &str =
    "💡 Copy this URL to open the comment directly in your browser (or press o)";

pub fn comment_text(pr: &PullRequest, comment: &ReviewComment) -> Text<'static> {
    let meta = Style::default().fg(Color::Gray);
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            format!(" Comment on #{} {} ", pr.number, pr.title),
            Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(62))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(format!("By: {}", comment.author), meta)),
    ];

    let mut created = comment
        .created_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();
    if let Some(updated) = comment.updated_at.filter(|u| Some(*u) != comment.created_at) {
        created.push_str(&format!(" (updated {})", format_timestamp(&updated)));
    }
    lines.push(Line::from(Span::styled(format!("Created: {}", created), meta)));
    lines.push(Line::default());

    lines.extend(body_lines(&comment.body));
    lines.push(Line::default());

    let hunk = comment.diff_hunk.as_deref().filter(|h| !h.is_empty());
    if let Some(context) = file_context(comment) {
        lines.push(Line::from(Span::styled(context, meta)));
    }
    if let Some(hunk) = hunk {
        let fenced = format!("```diff\n{}\n```", hunk);
        lines.extend(markdown::render(&fenced, Color::Gray).lines);
        lines.push(Line::default());
    }

    if let Some(url) = comment.html_url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(Line::from(Span::styled(
            url.to_string(),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(Line::from(Span::styled(
            LINK_HINT,
            meta.add_modifier(Modifier::ITALIC),
        )));
    }

    Text::from(lines)
}

/// `📁 path • 📍 Line(s): … • 📍 Original Line(s): …`
pub fn file_context(comment: &ReviewComment) -> Option<String> {
    let path = comment.path.as_deref().filter(|p| !p.is_empty())?;
    let mut info = vec![format!("📁 {}", path)];
    if let Some(range) = comment.line_range() {
        info.push(format!("📍 {}: {}", plural("Line", &range), range));
    }
    if let Some(range) = comment.original_line_range() {
        info.push(format!("📍 Original {}: {}", plural("Line", &range), range));
    }
    Some(info.join(" • "))
}

fn plural(word: &str, range: &str) -> String {
    if range.contains('-') {
        format!("{}s", word)
    } else {
        word.to_string()
    }
}

fn body_lines(body: &str) -> Vec<Line<'static>> {
    if body.trim().is_empty() {
        return vec![Line::from(Span::styled(
            "No content provided",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let rendered = markdown::render(body, Color::Reset);
    let has_text = rendered
        .lines
        .iter()
        .any(|l| l.spans.iter().any(|s| !s.content.trim().is_empty()));
    if has_text {
        rendered.lines
    } else {
        plain_block(body)
    }
}

/// Raw body in a bordered block, for markdown that renders to nothing.
fn plain_block(body: &str) -> Vec<Line<'static>> {
    let border = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled("╭──", border))];
    lines.extend(body.lines().map(|l| {
        Line::from(vec![
            Span::styled("│ ", border),
            Span::raw(l.replace('\t', "    ")),
        ])
    }));
    lines.push(Line::from(Span::styled("╰──", border)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{at, comment, pr};

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn header_and_meta() {
        let mut c = comment(1);
        c.created_at = Some(at(9));
        c.updated_at = Some(at(11));
        let lines = plain(&comment_text(&pr(42), &c));
        assert_eq!(lines[0], " Comment on #42 Change 42 ");
        assert_eq!(lines[2], "By: bob");
        assert_eq!(lines[3], "Created: 2024-03-01 09:00 (updated 2024-03-01 11:00)");
        assert!(lines.contains(&"Comment 1".to_string()));
    }

    #[test]
    fn unchanged_comment_has_no_update_note() {
        let mut c = comment(1);
        c.created_at = Some(at(9));
        c.updated_at = Some(at(9));
        let lines = plain(&comment_text(&pr(1), &c));
        assert_eq!(lines[3], "Created: 2024-03-01 09:00");
    }

    #[test]
    fn empty_body_placeholder() {
        let mut c = comment(1);
        c.body = "  \n".to_string();
        let lines = plain(&comment_text(&pr(1), &c));
        assert!(lines.contains(&"No content provided".to_string()));
    }

    #[test]
    fn body_without_renderable_markdown_falls_back_to_plain_block() {
        let mut c = comment(1);
        c.body = "[ref]: https://example.test".to_string();
        let lines = plain(&comment_text(&pr(1), &c));
        assert!(lines.contains(&"│ [ref]: https://example.test".to_string()));
    }

    #[test]
    fn file_context_lines() {
        let mut c = comment(1);
        assert_eq!(file_context(&c), None);

        c.path = Some("src/lib.rs".to_string());
        c.line = Some(20);
        c.start_line = Some(15);
        assert_eq!(
            file_context(&c).as_deref(),
            Some("📁 src/lib.rs • 📍 Lines: L15-20")
        );

        c.start_line = None;
        c.original_line = Some(7);
        assert_eq!(
            file_context(&c).as_deref(),
            Some("📁 src/lib.rs • 📍 Line: L20 • 📍 Original Line: L7")
        );
    }

    #[test]
    fn diff_hunk_and_link() {
        let mut c = comment(1);
        c.path = Some("src/lib.rs".to_string());
        c.diff_hunk = Some("@@ -1,2 +1,2 @@\n-old\n+new".to_string());
        c.html_url = Some("https://example.test/c/1".to_string());
        let text = comment_text(&pr(1), &c);
        let lines = plain(&text);

        let added = lines.iter().position(|l| l == "│ +new").unwrap();
        assert_eq!(text.lines[added].spans[1].style.fg, Some(Color::Green));
        assert!(lines.contains(&"│ -old".to_string()));
        assert!(lines.contains(&"https://example.test/c/1".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some(LINK_HINT));
    }
}
