use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PullRequest, Repository, ReviewComment};

/// Read access to the code-hosting platform.
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Repositories of the authenticated user and their organisations.
    async fn list_repositories(&self) -> Result<Vec<Repository>>;
    /// Open pull requests of `repo`.
    async fn list_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>>;
    /// Inline review comments of `pr`, replies included.
    async fn list_review_comments(
        &self,
        repo: &Repository,
        pr: &PullRequest,
    ) -> Result<Vec<ReviewComment>>;
}
