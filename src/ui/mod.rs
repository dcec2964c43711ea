pub mod detail;
mod list_view;
pub mod markdown;

use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Level, PR_HEADER_HEIGHT};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if let Some(error) = &app.error {
        render_error(frame, area, error);
        return;
    }
    if app.is_loading() {
        frame.render_widget(
            Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow)),
            area.inner(Margin::new(2, 1)),
        );
        return;
    }

    match app.level {
        Level::CommentDetail => render_detail(frame, app, area),
        _ => render_list_level(frame, app, area),
    }
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = vec![
        Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Esc: back • q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }),
        area.inner(Margin::new(2, 1)),
    );
}

/// Breadcrumb, blank, [status, blank], content, blank, help.
fn render_list_level(frame: &mut Frame, app: &App, area: Rect) {
    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    if app.status.is_some() {
        constraints.extend([Constraint::Length(1), Constraint::Length(1)]);
    }
    constraints.extend([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ]);
    let chunks = Layout::vertical(constraints).split(area);
    let content = chunks[chunks.len() - 3].inner(Margin::new(2, 0));

    render_breadcrumb(frame, app, chunks[0]);
    if let Some(status) = &app.status {
        render_status(frame, status, chunks[2]);
    }

    match app.level {
        Level::Repositories => {
            list_view::render(frame, content, &app.repos, "Repositories", "No repositories found")
        }
        Level::PullRequests => list_view::render(
            frame,
            content,
            &app.prs,
            "Pull Requests",
            "No open pull requests",
        ),
        Level::Comments => {
            let [header, list] = Layout::vertical([
                Constraint::Length(PR_HEADER_HEIGHT),
                Constraint::Min(0),
            ])
            .areas(content);
            if let Some(pr) = &app.current_pr {
                frame.render_widget(Paragraph::new(list_view::pr_header(pr)), header);
            }
            list_view::render(frame, list, &app.comments, "Review Comments", "No review comments")
        }
        Level::CommentDetail => {}
    }

    render_help(frame, app, chunks[chunks.len() - 1]);
}

/// Breadcrumb, blank, viewport, blank, status or blank, blank, help.
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let [crumb, _, body, position, status, _, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_breadcrumb(frame, app, crumb);

    let viewport = &app.viewport;
    let offset = u16::try_from(viewport.offset()).unwrap_or(u16::MAX);
    let body = body.inner(Margin::new(2, 0));
    let body = Rect {
        width: body.width.min(viewport.width()),
        height: body.height.min(viewport.height()),
        ..body
    };
    frame.render_widget(
        Paragraph::new(viewport.content().clone())
            .wrap(Wrap { trim: false })
            .scroll((offset, 0)),
        body,
    );

    if viewport.total_lines() > viewport.height() as usize {
        let percent = (viewport.offset() * 100) / viewport.max_offset().max(1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{:>3}%", percent),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
            position.inner(Margin::new(2, 0)),
        );
    }

    if let Some(msg) = &app.status {
        render_status(frame, msg, status);
    }
    render_help(frame, app, help);
}

pub fn breadcrumb(app: &App) -> String {
    let mut parts = vec!["Repositories".to_string()];
    if let Some(repo) = &app.current_repo {
        parts.push(repo.name.clone());
        parts.push("Pull Requests".to_string());
    }
    if let Some(pr) = &app.current_pr {
        parts.push(format!("#{}", pr.number));
        parts.push("Comments".to_string());
    }
    if app.current_comment.is_some() {
        parts.push("Comment".to_string());
    }
    parts.join(" > ")
}

fn render_breadcrumb(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            breadcrumb(app),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        area,
    );
}

fn render_status(frame: &mut Frame, status: &str, area: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            status.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        area,
    );
}

pub fn help_text(app: &App) -> String {
    let editing = match app.level {
        Level::Repositories => app.repos.is_editing_filter(),
        Level::PullRequests => app.prs.is_editing_filter(),
        Level::Comments => app.comments.is_editing_filter(),
        Level::CommentDetail => false,
    };
    if editing {
        return "Enter: apply filter • Esc: clear filter".to_string();
    }

    match app.level {
        Level::CommentDetail => format!(
            "c: copy prompt ({}) • t: toggle prompt mode • ↑/↓ j/k: scroll • o: open • Esc: back • q: quit",
            app.prompt_mode.to_string().to_lowercase()
        ),
        Level::Comments => format!(
            "Enter: select • r: {} replies • /: filter • Esc: back • q: quit",
            if app.show_replies { "hide" } else { "show" }
        ),
        _ => "Enter: select • /: filter • Esc: back • q: quit".to_string(),
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            help_text(app),
            Style::default().fg(Color::DarkGray),
        )),
        area,
    );
}
