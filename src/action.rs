use crate::app::Level;
use crate::error::NitpickError;
use crate::prompt::PromptMode;
use crate::types::{PullRequest, Repository, ReviewComment};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    Select,
    ScrollUp,
    ScrollDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,
    Resize { width: u16, height: u16 },

    // List filter
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    ApplyFilter,
    ClearFilter,

    // Settings and detail view
    ToggleReplies,
    TogglePromptMode,
    CopyPrompt,
    OpenInBrowser,

    // Fetch results, tagged with the load id they were issued under
    LoadRepos,
    ReposLoaded(Vec<Repository>, u64),
    PrsLoaded(Vec<PullRequest>, u64),
    CommentsLoaded(Vec<ReviewComment>, u64),
    LoadFailed {
        level: Level,
        message: String,
        load_id: u64,
    },

    Copied {
        mode: PromptMode,
        result: Result<(), String>,
    },
    Notify(String),
    ClearStatus(u64),

    None,
}

impl From<NitpickError> for Action {
    fn from(err: NitpickError) -> Self {
        Action::Notify(err.to_string())
    }
}
