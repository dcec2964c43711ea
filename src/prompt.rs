//! Builds AI-assistant prompts from a review comment and its surroundings.

use std::fmt;

use chrono::{DateTime, Local};

use crate::items::format_timestamp;
use crate::types::{PullRequest, Repository, ReviewComment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Full,
    Simple,
}

impl PromptMode {
    pub fn toggled(self) -> Self {
        match self {
            PromptMode::Full => PromptMode::Simple,
            PromptMode::Simple => PromptMode::Full,
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptMode::Full => write!(f, "Full"),
            PromptMode::Simple => write!(f, "Simple"),
        }
    }
}

pub struct PromptContext<'a> {
    pub repo: &'a Repository,
    pub pr: &'a PullRequest,
    pub comment: &'a ReviewComment,
}

const INSTRUCTIONS: &str = "\
Based on the above context, please help me address the review comment by:

1. **Understanding the Issue**: Analyze the reviewer's feedback and identify what needs to be changed
2. **Proposing Solutions**: Suggest specific code changes that address the reviewer's concerns
3. **Code Implementation**: Provide the actual code changes needed, with proper formatting and best practices
4. **Explanation**: Explain why the suggested changes address the review feedback
5. **Testing Considerations**: Suggest any additional tests or validation that might be needed

Please focus on:
- Maintaining code quality and consistency with the existing codebase
- Following the project's coding standards and conventions
- Ensuring the changes align with the PR's overall objectives
- Addressing any security, performance, or maintainability concerns raised";

const SIMPLE_INSTRUCTION: &str =
    "**Please help me address this review feedback with specific code changes.**";

/// Render a prompt. The only non-deterministic input is `generated_at`.
pub fn generate(ctx: &PromptContext<'_>, mode: PromptMode, generated_at: DateTime<Local>) -> String {
    match mode {
        PromptMode::Full => full(ctx, generated_at),
        PromptMode::Simple => simple(ctx),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim_end).filter(|v| !v.is_empty())
}

fn fenced(lang: &str, body: &str) -> String {
    format!("```{}\n{}\n```", lang, body)
}

fn full(ctx: &PromptContext<'_>, generated_at: DateTime<Local>) -> String {
    let PromptContext { repo, pr, comment } = ctx;
    let mut out: Vec<String> = Vec::new();

    out.push("# AI Assistant Request for Code Review Changes".to_string());
    out.push(String::new());

    out.push("## Repository Context".to_string());
    out.push(format!("- **Repository**: {}", repo.full_name));
    if let Some(desc) = non_empty(repo.description.as_deref()) {
        out.push(format!("- **Description**: {}", desc));
    }
    if let Some(lang) = non_empty(repo.language.as_deref()) {
        out.push(format!("- **Primary Language**: {}", lang));
    }
    out.push(String::new());

    out.push("## Pull Request Context".to_string());
    out.push(format!("- **PR #{}**: {}", pr.number, pr.title));
    out.push(format!("- **Author**: {}", pr.author));
    let mut status = pr.state.to_string();
    if pr.draft {
        status.push_str(" (DRAFT)");
    }
    if pr.merged {
        status.push_str(" (MERGED)");
    }
    out.push(format!("- **Status**: {}", status));
    if let Some(created) = &pr.created_at {
        out.push(format!("- **Created**: {}", format_timestamp(created)));
    }
    if let Some(body) = non_empty(pr.body.as_deref()) {
        out.push("- **Description**:".to_string());
        out.push(fenced("", body));
    }
    if !pr.head_branch.is_empty() {
        out.push(format!("- **Source Branch**: {}", pr.head_branch));
    }
    if !pr.base_branch.is_empty() {
        out.push(format!("- **Target Branch**: {}", pr.base_branch));
    }
    out.push(String::new());

    out.push("## Review Comment Context".to_string());
    out.push(format!("- **Reviewer**: {}", comment.author));
    if let Some(created) = &comment.created_at {
        out.push(format!("- **Comment Date**: {}", format_timestamp(created)));
    }
    if let Some(path) = non_empty(comment.path.as_deref()) {
        out.push(format!("- **File**: `{}`", path));
        if let Some(range) = comment.line_range() {
            out.push(format!("- **Lines**: {}", range));
        }
        if let Some(range) = comment.original_line_range() {
            out.push(format!("- **Original Lines**: {}", range));
        }
    }
    if let Some(hunk) = non_empty(comment.diff_hunk.as_deref()) {
        out.push("- **Code Context**:".to_string());
        out.push(fenced("diff", hunk));
    }
    out.push(String::new());

    out.push("## Review Comment/Requested Changes".to_string());
    if let Some(body) = non_empty(Some(&comment.body)) {
        out.push(fenced("", body));
    }
    out.push(String::new());

    out.push("## Instructions".to_string());
    out.push(INSTRUCTIONS.to_string());
    out.push(String::new());

    out.push("## Additional Context".to_string());
    out.push(format!(
        "- **Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(url) = non_empty(comment.html_url.as_deref()) {
        out.push(format!("- **Direct Link**: {}", url));
    }

    out.join("\n")
}

fn simple(ctx: &PromptContext<'_>) -> String {
    let PromptContext { repo, pr, comment } = ctx;
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!(
        "# Review Comment for {} PR #{}",
        repo.name, pr.number
    ));

    if let Some(path) = non_empty(comment.path.as_deref()) {
        match comment.line_range() {
            Some(range) => sections.push(format!("**File**: `{}` ({})", path, range)),
            None => sections.push(format!("**File**: `{}`", path)),
        }
    }
    if let Some(hunk) = non_empty(comment.diff_hunk.as_deref()) {
        sections.push(format!("**Code Context**:\n{}", fenced("diff", hunk)));
    }
    sections.push(format!("**Review Comment**:\n{}", comment.body.trim_end()));
    sections.push(SIMPLE_INSTRUCTION.to_string());

    sections.join("\n\n")
}
