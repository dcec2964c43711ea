//! Display adapters turning API records into list rows.

use chrono::{DateTime, Utc};

use crate::types::{PullRequest, Repository, ReviewComment};

const MAX_TITLE_CHARS: usize = 80;

/// A record that can be shown and filtered in a list.
pub trait ListEntry {
    /// Text matched against the list filter.
    fn filter_text(&self) -> &str;
    fn title(&self) -> String;
    fn description(&self) -> String;
}

pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

impl ListEntry for Repository {
    fn filter_text(&self) -> &str {
        &self.name
    }

    fn title(&self) -> String {
        let mut title = if self.owner.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.owner, self.name)
        };

        let mut indicators = Vec::new();
        if self.private {
            indicators.push("🔒");
        }
        if self.fork {
            indicators.push("🍴");
        }
        if !indicators.is_empty() {
            title.push(' ');
            title.push_str(&indicators.join(" "));
        }
        title
    }

    fn description(&self) -> String {
        let mut parts = vec![self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description")
            .to_string()];

        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            parts.push(language.to_string());
        }
        if let Some(updated) = &self.updated_at {
            parts.push(format!("Updated {}", format_date(updated)));
        }
        parts.join(" • ")
    }
}

impl ListEntry for PullRequest {
    fn filter_text(&self) -> &str {
        &self.title
    }

    fn title(&self) -> String {
        format!("#{} {}", self.number, self.title)
    }

    fn description(&self) -> String {
        let mut flags = Vec::new();
        if self.draft {
            flags.push("DRAFT");
        }
        if self.merged {
            flags.push("MERGED");
        }

        let mut desc = String::new();
        if !flags.is_empty() {
            desc.push_str(&format!("[{}] ", flags.join(", ")));
        }
        desc.push_str(&format!("by {}", self.author));
        if let Some(created) = &self.created_at {
            desc.push_str(&format!(" • Created {}", format_date(created)));
        }
        desc
    }
}

impl ListEntry for ReviewComment {
    fn filter_text(&self) -> &str {
        &self.body
    }

    fn title(&self) -> String {
        self.body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| truncate(strip_heading(line), MAX_TITLE_CHARS))
            .unwrap_or_else(|| "Empty comment".to_string())
    }

    fn description(&self) -> String {
        let created = self.created_at.as_ref().map(format_timestamp);
        let mut time_info = created.clone().unwrap_or_default();
        if let (Some(created), Some(updated)) = (&created, &self.updated_at) {
            let updated = format_timestamp(updated);
            if &updated != created {
                time_info.push_str(&format!(" (updated {})", updated));
            }
        }

        let mut file_info = String::new();
        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            file_info.push_str(&format!(" • {}", path));
            if let Some(range) = self.line_range() {
                file_info.push_str(&format!(" {}", range));
            }
            if let Some(range) = self.original_line_range() {
                file_info.push_str(&format!(" (orig {})", range));
            }
        }

        if time_info.is_empty() {
            format!("by {}{}", self.author, file_info)
        } else {
            format!("by {} • {}{}", self.author, time_info, file_info)
        }
    }
}

/// Strips one leading markdown heading marker (`#` plus spaces).
fn strip_heading(line: &str) -> &str {
    match line.strip_prefix('#') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

fn truncate(line: &str, max: usize) -> String {
    if line.chars().count() > max {
        let head: String = line.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{at, comment, pr, repo};

    #[test]
    fn repo_title_with_indicators() {
        let mut r = repo("widgets");
        assert_eq!(r.title(), "octo/widgets");
        r.private = true;
        assert_eq!(r.title(), "octo/widgets 🔒");
        r.fork = true;
        assert_eq!(r.title(), "octo/widgets 🔒 🍴");
        r.private = false;
        assert_eq!(r.title(), "octo/widgets 🍴");
    }

    #[test]
    fn repo_description_segments() {
        let mut r = repo("widgets");
        assert_eq!(r.description(), "No description");

        r.updated_at = Some(at(9));
        assert_eq!(r.description(), "No description • Updated 2024-03-01");

        r.language = Some("Rust".to_string());
        r.description = Some("Widget factory".to_string());
        assert_eq!(
            r.description(),
            "Widget factory • Rust • Updated 2024-03-01"
        );

        r.updated_at = None;
        assert_eq!(r.description(), "Widget factory • Rust");
    }

    #[test]
    fn repo_filters_on_name() {
        assert_eq!(repo("widgets").filter_text(), "widgets");
    }

    #[test]
    fn pr_title_and_flags() {
        let mut p = pr(42);
        p.title = "Add caching".to_string();
        p.created_at = Some(at(9));
        assert_eq!(p.title(), "#42 Add caching");
        assert_eq!(p.description(), "by alice • Created 2024-03-01");

        p.draft = true;
        assert_eq!(p.description(), "[DRAFT] by alice • Created 2024-03-01");

        p.merged = true;
        assert_eq!(
            p.description(),
            "[DRAFT, MERGED] by alice • Created 2024-03-01"
        );

        p.draft = false;
        assert_eq!(p.description(), "[MERGED] by alice • Created 2024-03-01");
    }

    #[test]
    fn comment_title_first_non_blank_line() {
        let mut c = comment(1);
        c.body = "\n\n   \n## Naming\nrest".to_string();
        assert_eq!(c.title(), "# Naming");

        c.body = "# Nit: rename this\nbody".to_string();
        assert_eq!(c.title(), "Nit: rename this");

        c.body = "  \n \t\n".to_string();
        assert_eq!(c.title(), "Empty comment");
    }

    #[test]
    fn comment_title_truncates() {
        let mut c = comment(1);
        c.body = "é".repeat(100);
        let title = c.title();
        assert_eq!(title.chars().count(), 80);
        assert!(title.ends_with("..."));

        c.body = "x".repeat(80);
        assert_eq!(c.title(), "x".repeat(80));
    }

    #[test]
    fn comment_description_with_ranges() {
        let mut c = comment(1);
        c.created_at = Some(at(9));
        c.updated_at = Some(at(9));
        c.path = Some("src/lib.rs".to_string());
        c.line = Some(20);
        c.original_line = Some(10);
        c.original_start_line = Some(8);
        assert_eq!(
            c.description(),
            "by bob • 2024-03-01 09:00 • src/lib.rs L20 (orig L8-10)"
        );
    }

    #[test]
    fn comment_description_shows_update_time() {
        let mut c = comment(1);
        c.created_at = Some(at(9));
        c.updated_at = Some(at(10));
        assert_eq!(
            c.description(),
            "by bob • 2024-03-01 09:00 (updated 2024-03-01 10:00)"
        );
    }

    #[test]
    fn line_range_ignored_without_path() {
        let mut c = comment(1);
        c.created_at = Some(at(9));
        c.line = Some(4);
        assert_eq!(c.description(), "by bob • 2024-03-01 09:00");
    }

    #[test]
    fn adapters_are_idempotent() {
        let mut c = comment(1);
        c.path = Some("a.rs".to_string());
        c.line = Some(3);
        c.start_line = Some(1);
        assert_eq!(c.title(), c.title());
        assert_eq!(c.description(), c.description());
        let r = repo("x");
        assert_eq!(r.description(), r.description());
    }
}
