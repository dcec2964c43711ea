use std::time::Duration;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::UiConfig;
use crate::dispatch::Command;
use crate::event::Event;
use crate::items::ListEntry;
use crate::list::FilterList;
use crate::prompt::{self, PromptContext, PromptMode};
use crate::types::{
    sort_comments, sort_pull_requests, visible_comments, PullRequest, Repository, ReviewComment,
};
use crate::ui::detail;
use crate::viewport::Viewport;

/// Breadcrumb, spacing, status and help lines around the detail viewport.
pub const DETAIL_CHROME: u16 = 6;
pub const SIDE_PADDING: u16 = 4;
/// Breadcrumb, spacing and help lines around a list.
pub const LIST_CHROME: u16 = 4;
pub const PR_HEADER_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 2;

const COPY_STATUS_TTL: Duration = Duration::from_secs(3);
const MODE_STATUS_TTL: Duration = Duration::from_secs(2);

/// Drill-down depth. Navigation only ever moves one level at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Repositories,
    PullRequests,
    Comments,
    CommentDetail,
}

impl Level {
    pub fn depth(self) -> usize {
        self as usize
    }

    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Repositories => None,
            Level::PullRequests => Some(Level::Repositories),
            Level::Comments => Some(Level::PullRequests),
            Level::CommentDetail => Some(Level::Comments),
        }
    }

    pub fn is_list(self) -> bool {
        self != Level::CommentDetail
    }
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Up,
    Down,
    HalfUp,
    HalfDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
enum FilterOp {
    Start,
    Input(char),
    Backspace,
    Apply,
    Clear,
}

fn move_list<T: ListEntry>(list: &mut FilterList<T>, motion: Motion) {
    match motion {
        Motion::Up => list.move_up(1),
        Motion::Down => list.move_down(1),
        Motion::HalfUp => list.page_up(),
        Motion::HalfDown => list.page_down(),
        Motion::Top => list.go_to_top(),
        Motion::Bottom => list.go_to_bottom(),
    }
}

fn edit_filter<T: ListEntry>(list: &mut FilterList<T>, op: FilterOp) {
    match op {
        FilterOp::Start => list.start_filter(),
        FilterOp::Input(c) => list.push_filter_char(c),
        FilterOp::Backspace => list.pop_filter_char(),
        FilterOp::Apply => list.apply_filter(),
        FilterOp::Clear => list.clear_filter(),
    }
}

pub struct App {
    pub level: Level,

    // Selection context; depth d is set iff level >= d
    pub current_repo: Option<Repository>,
    pub current_pr: Option<PullRequest>,
    pub current_comment: Option<ReviewComment>,

    pub repos: FilterList<Repository>,
    pub prs: FilterList<PullRequest>,
    pub comments: FilterList<ReviewComment>,
    pub viewport: Viewport,

    pub error: Option<String>,
    pub status: Option<String>,
    status_generation: u64,

    pub show_replies: bool,
    pub prompt_mode: PromptMode,

    pub width: u16,
    pub height: u16,
    pub should_quit: bool,

    next_load_id: u64,
    /// Outstanding fetch per list level, indexed by depth.
    pending: [Option<u64>; 3],
}

impl App {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            level: Level::Repositories,
            current_repo: None,
            current_pr: None,
            current_comment: None,
            repos: FilterList::default(),
            prs: FilterList::default(),
            comments: FilterList::default(),
            viewport: Viewport::default(),
            error: None,
            status: None,
            status_generation: 0,
            show_replies: ui.show_replies,
            prompt_mode: if ui.simple_prompt {
                PromptMode::Simple
            } else {
                PromptMode::Full
            },
            width: 0,
            height: 0,
            should_quit: false,
            next_load_id: 0,
            pending: [None; 3],
        }
    }

    /// A fetch for the visible level is in flight.
    pub fn is_loading(&self) -> bool {
        self.level.is_list() && self.pending[self.level.depth()].is_some()
    }

    fn is_editing_filter(&self) -> bool {
        match self.level {
            Level::Repositories => self.repos.is_editing_filter(),
            Level::PullRequests => self.prs.is_editing_filter(),
            Level::Comments => self.comments.is_editing_filter(),
            Level::CommentDetail => false,
        }
    }

    fn is_filtering(&self) -> bool {
        match self.level {
            Level::Repositories => self.repos.is_filtering(),
            Level::PullRequests => self.prs.is_filtering(),
            Level::Comments => self.comments.is_filtering(),
            Level::CommentDetail => false,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadRepos,
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => Action::Resize { width, height },
            Event::Tick | Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.error.is_some() {
            return match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Esc => Action::Back,
                _ => Action::None,
            };
        }

        if self.is_loading() {
            return match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Esc => Action::Back,
                _ => Action::None,
            };
        }

        if self.is_editing_filter() {
            return match key.code {
                KeyCode::Esc => Action::ClearFilter,
                KeyCode::Enter => Action::ApplyFilter,
                KeyCode::Backspace => Action::FilterBackspace,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::FilterInput(c)
                }
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => {
                if self.is_filtering() {
                    Action::ClearFilter
                } else {
                    Action::Back
                }
            }
            KeyCode::Enter => Action::Select,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('h') | KeyCode::PageUp => Action::HalfPageUp,
            KeyCode::Char('l') | KeyCode::PageDown => Action::HalfPageDown,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('/') if self.level.is_list() => Action::StartFilter,
            KeyCode::Char('r') if self.level == Level::Comments => Action::ToggleReplies,
            KeyCode::Char('t') if self.level == Level::CommentDetail => Action::TogglePromptMode,
            KeyCode::Char('c') if self.level == Level::CommentDetail => Action::CopyPrompt,
            KeyCode::Char('o') if self.level == Level::CommentDetail => Action::OpenInBrowser,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                vec![]
            }
            Action::Back => self.back(),
            Action::Select => self.select(),
            Action::ScrollUp => self.scroll(Motion::Up),
            Action::ScrollDown => self.scroll(Motion::Down),
            Action::HalfPageUp => self.scroll(Motion::HalfUp),
            Action::HalfPageDown => self.scroll(Motion::HalfDown),
            Action::GoToTop => self.scroll(Motion::Top),
            Action::GoToBottom => self.scroll(Motion::Bottom),
            Action::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.relayout();
                self.layout_viewport();
                vec![]
            }

            Action::StartFilter => self.filter(FilterOp::Start),
            Action::FilterInput(c) => self.filter(FilterOp::Input(c)),
            Action::FilterBackspace => self.filter(FilterOp::Backspace),
            Action::ApplyFilter => self.filter(FilterOp::Apply),
            Action::ClearFilter => self.filter(FilterOp::Clear),

            Action::ToggleReplies => self.toggle_replies(),
            Action::TogglePromptMode => {
                if self.level != Level::CommentDetail {
                    return vec![];
                }
                self.prompt_mode = self.prompt_mode.toggled();
                let msg = format!("🔄 Switched to {} prompt mode", self.prompt_mode);
                vec![self.set_status(msg, MODE_STATUS_TTL)]
            }
            Action::CopyPrompt => self.copy_prompt(),
            Action::OpenInBrowser => {
                let url = self
                    .current_comment
                    .as_ref()
                    .and_then(|c| c.html_url.clone())
                    .filter(|u| !u.is_empty());
                match url {
                    Some(url) => vec![Command::OpenUrl(url)],
                    None => vec![self.set_status(
                        "No link available for this comment".to_string(),
                        COPY_STATUS_TTL,
                    )],
                }
            }

            Action::LoadRepos => {
                let load_id = self.begin_load(Level::Repositories);
                vec![Command::FetchRepos { load_id }]
            }
            Action::ReposLoaded(repos, load_id) => {
                if self.finish_load(Level::Repositories, load_id) {
                    self.repos.set_items(repos);
                }
                vec![]
            }
            Action::PrsLoaded(mut prs, load_id) => {
                if self.finish_load(Level::PullRequests, load_id) {
                    sort_pull_requests(&mut prs);
                    self.prs.set_items(prs);
                }
                vec![]
            }
            Action::CommentsLoaded(comments, load_id) => {
                if self.finish_load(Level::Comments, load_id) {
                    let mut comments = visible_comments(comments, self.show_replies);
                    sort_comments(&mut comments);
                    self.comments.set_items(comments);
                }
                vec![]
            }
            Action::LoadFailed {
                level,
                message,
                load_id,
            } => {
                if self.finish_load(level, load_id) {
                    self.error = Some(message);
                }
                vec![]
            }

            Action::Copied { mode, result } => {
                let msg = match result {
                    Ok(()) => format!("✅ {} prompt copied to clipboard!", mode),
                    Err(e) => format!("Copy failed: {}", e),
                };
                vec![self.set_status(msg, COPY_STATUS_TTL)]
            }
            Action::Notify(msg) => vec![self.set_status(msg, COPY_STATUS_TTL)],
            Action::ClearStatus(generation) => {
                if generation == self.status_generation && self.status.take().is_some() {
                    self.relayout();
                }
                vec![]
            }

            Action::None => vec![],
        }
    }

    fn select(&mut self) -> Vec<Command> {
        // The list on screen is replaced when the fetch lands.
        if self.is_loading() {
            return vec![];
        }
        match self.level {
            Level::Repositories => {
                let Some(repo) = self.repos.selected().cloned() else {
                    return vec![];
                };
                self.current_repo = Some(repo.clone());
                self.level = Level::PullRequests;
                self.prs.clear();
                let load_id = self.begin_load(Level::PullRequests);
                vec![Command::FetchPullRequests { repo, load_id }]
            }
            Level::PullRequests => {
                let (Some(pr), Some(repo)) = (self.prs.selected().cloned(), self.current_repo.clone())
                else {
                    return vec![];
                };
                self.current_pr = Some(pr.clone());
                self.level = Level::Comments;
                self.comments.clear();
                let load_id = self.begin_load(Level::Comments);
                vec![Command::FetchComments { repo, pr, load_id }]
            }
            Level::Comments => {
                let Some(comment) = self.comments.selected().cloned() else {
                    return vec![];
                };
                let content = match &self.current_pr {
                    Some(pr) => detail::comment_text(pr, &comment),
                    None => return vec![],
                };
                self.current_comment = Some(comment);
                self.level = Level::CommentDetail;
                self.layout_viewport();
                self.viewport.set_content(content);
                vec![]
            }
            Level::CommentDetail => vec![],
        }
    }

    fn back(&mut self) -> Vec<Command> {
        if self.error.take().is_some() && self.level == Level::Repositories {
            // Nothing to back out of; the only way forward is a new fetch.
            let load_id = self.begin_load(Level::Repositories);
            return vec![Command::FetchRepos { load_id }];
        }

        match self.level {
            Level::Repositories => {}
            Level::PullRequests => {
                self.current_repo = None;
                self.pending[Level::PullRequests.depth()] = None;
            }
            Level::Comments => {
                self.current_pr = None;
                self.pending[Level::Comments.depth()] = None;
            }
            Level::CommentDetail => {
                self.current_comment = None;
            }
        }
        if let Some(parent) = self.level.parent() {
            self.level = parent;
        }
        vec![]
    }

    fn scroll(&mut self, motion: Motion) -> Vec<Command> {
        match self.level {
            Level::Repositories => move_list(&mut self.repos, motion),
            Level::PullRequests => move_list(&mut self.prs, motion),
            Level::Comments => move_list(&mut self.comments, motion),
            Level::CommentDetail => match motion {
                Motion::Up => self.viewport.line_up(1),
                Motion::Down => self.viewport.line_down(1),
                Motion::HalfUp => self.viewport.half_view_up(),
                Motion::HalfDown => self.viewport.half_view_down(),
                Motion::Top => self.viewport.goto_top(),
                Motion::Bottom => self.viewport.goto_bottom(),
            },
        }
        vec![]
    }

    fn filter(&mut self, op: FilterOp) -> Vec<Command> {
        match self.level {
            Level::Repositories => edit_filter(&mut self.repos, op),
            Level::PullRequests => edit_filter(&mut self.prs, op),
            Level::Comments => edit_filter(&mut self.comments, op),
            Level::CommentDetail => {}
        }
        vec![]
    }

    /// Replies are filtered on receipt, so toggling re-fetches.
    fn toggle_replies(&mut self) -> Vec<Command> {
        if self.level != Level::Comments {
            return vec![];
        }
        let (Some(repo), Some(pr)) = (self.current_repo.clone(), self.current_pr.clone()) else {
            return vec![];
        };
        self.show_replies = !self.show_replies;
        let load_id = self.begin_load(Level::Comments);
        vec![Command::FetchComments { repo, pr, load_id }]
    }

    fn copy_prompt(&mut self) -> Vec<Command> {
        if self.level != Level::CommentDetail {
            return vec![];
        }
        let (Some(repo), Some(pr), Some(comment)) =
            (&self.current_repo, &self.current_pr, &self.current_comment)
        else {
            return vec![self.set_status(
                "Error: Missing context for prompt generation".to_string(),
                COPY_STATUS_TTL,
            )];
        };
        let ctx = PromptContext { repo, pr, comment };
        let text = prompt::generate(&ctx, self.prompt_mode, Local::now());
        vec![Command::CopyToClipboard {
            text,
            mode: self.prompt_mode,
        }]
    }

    fn begin_load(&mut self, level: Level) -> u64 {
        self.next_load_id += 1;
        self.pending[level.depth()] = Some(self.next_load_id);
        self.error = None;
        self.next_load_id
    }

    /// Accepts a result only if it answers the outstanding fetch of its level.
    fn finish_load(&mut self, level: Level, load_id: u64) -> bool {
        if !level.is_list() {
            return false;
        }
        let slot = &mut self.pending[level.depth()];
        if *slot != Some(load_id) {
            tracing::debug!(?level, load_id, "discarding stale fetch result");
            return false;
        }
        *slot = None;
        true
    }

    fn set_status(&mut self, msg: String, ttl: Duration) -> Command {
        self.status_generation += 1;
        self.status = Some(msg);
        self.relayout();
        Command::ClearStatusAfter {
            generation: self.status_generation,
            delay: ttl,
        }
    }

    fn relayout(&mut self) {
        let status = if self.status.is_some() {
            STATUS_HEIGHT
        } else {
            0
        };
        let width = self.width.saturating_sub(SIDE_PADDING);
        let height = self.height.saturating_sub(LIST_CHROME + status);
        self.repos.set_size(width, height);
        self.prs.set_size(width, height);
        self.comments
            .set_size(width, height.saturating_sub(PR_HEADER_HEIGHT));
    }

    fn layout_viewport(&mut self) {
        self.viewport.set_size(
            self.width.saturating_sub(SIDE_PADDING),
            self.height.saturating_sub(DETAIL_CHROME),
        );
    }
}
