use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub private: bool,
    pub fork: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    Open,
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: PrState,
    pub author: String,
    pub draft: bool,
    pub merged: bool,
    pub head_branch: String,
    pub base_branch: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// An inline review comment attached to a pull request diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub in_reply_to: Option<u64>,
    pub author: String,
    pub body: String,
    pub path: Option<String>,
    pub diff_hunk: Option<String>,
    pub line: Option<u64>,
    pub start_line: Option<u64>,
    pub original_line: Option<u64>,
    pub original_start_line: Option<u64>,
    pub html_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReviewComment {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }

    /// `L<start>-<end>` for a multi-line range, `L<end>` otherwise.
    pub fn line_range(&self) -> Option<String> {
        format_range(self.start_line, self.line)
    }

    /// Only present when the original position differs from the current one.
    pub fn original_line_range(&self) -> Option<String> {
        match self.original_line {
            Some(original) if Some(original) != self.line => {
                format_range(self.original_start_line, self.original_line)
            }
            _ => None,
        }
    }
}

fn format_range(start: Option<u64>, end: Option<u64>) -> Option<String> {
    let end = end.filter(|&n| n != 0)?;
    match start {
        Some(start) if start != 0 && start != end => Some(format!("L{}-{}", start, end)),
        _ => Some(format!("L{}", end)),
    }
}

/// Pull requests are listed highest number first.
pub fn sort_pull_requests(prs: &mut [PullRequest]) {
    prs.sort_by(|a, b| b.number.cmp(&a.number));
}

/// Most recently updated first; comments without a timestamp go last.
pub fn sort_comments(comments: &mut [ReviewComment]) {
    comments.sort_by(|a, b| match (a.updated_at, b.updated_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Drops replies unless `show_replies` is set.
pub fn visible_comments(comments: Vec<ReviewComment>, show_replies: bool) -> Vec<ReviewComment> {
    comments
        .into_iter()
        .filter(|c| show_replies || !c.is_reply())
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn repo(name: &str) -> Repository {
        Repository {
            owner: "octo".to_string(),
            name: name.to_string(),
            full_name: format!("octo/{}", name),
            description: None,
            language: None,
            private: false,
            fork: false,
            updated_at: None,
        }
    }

    pub fn pr(number: u64) -> PullRequest {
        PullRequest {
            number,
            title: format!("Change {}", number),
            body: None,
            state: PrState::Open,
            author: "alice".to_string(),
            draft: false,
            merged: false,
            head_branch: "feature".to_string(),
            base_branch: "main".to_string(),
            created_at: None,
        }
    }

    pub fn comment(id: u64) -> ReviewComment {
        ReviewComment {
            id,
            in_reply_to: None,
            author: "bob".to_string(),
            body: format!("Comment {}", id),
            path: None,
            diff_hunk: None,
            line: None,
            start_line: None,
            original_line: None,
            original_start_line: None,
            html_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }
}
