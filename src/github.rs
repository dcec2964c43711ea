use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::error::{NitpickError, Result};
use crate::forge::Forge;
use crate::types::{PrState, PullRequest, Repository, ReviewComment};

const PER_PAGE: u8 = 100;

pub struct GitHub {
    client: Octocrab,
    timeout: Duration,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for NitpickError {
    fn from(err: octocrab::Error) -> Self {
        NitpickError::Api(err.to_string())
    }
}

#[derive(Debug, Default, Serialize)]
struct ListParams {
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
}

impl ListParams {
    fn page() -> Self {
        Self {
            per_page: PER_PAGE,
            ..Self::default()
        }
    }

    fn recently_updated() -> Self {
        Self {
            sort: Some("updated"),
            direction: Some("desc"),
            ..Self::page()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    owner: Option<ApiUser>,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    fork: bool,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiBranch {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    state: Option<String>,
    user: Option<ApiUser>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    merged: bool,
    merged_at: Option<DateTime<Utc>>,
    head: Option<ApiBranch>,
    base: Option<ApiBranch>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiReviewComment {
    id: u64,
    in_reply_to_id: Option<u64>,
    user: Option<ApiUser>,
    #[serde(default)]
    body: String,
    path: Option<String>,
    diff_hunk: Option<String>,
    line: Option<u64>,
    start_line: Option<u64>,
    original_line: Option<u64>,
    original_start_line: Option<u64>,
    html_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn login(user: Option<ApiUser>) -> String {
    user.map(|u| u.login)
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<ApiRepository> for Repository {
    fn from(repo: ApiRepository) -> Self {
        let owner = repo.owner.map(|o| o.login).unwrap_or_default();
        let full_name = repo.full_name.unwrap_or_else(|| {
            if owner.is_empty() {
                repo.name.clone()
            } else {
                format!("{}/{}", owner, repo.name)
            }
        });
        Repository {
            owner,
            name: repo.name,
            full_name,
            description: repo.description,
            language: repo.language,
            private: repo.private,
            fork: repo.fork,
            updated_at: repo.updated_at,
        }
    }
}

impl From<ApiPullRequest> for PullRequest {
    fn from(pr: ApiPullRequest) -> Self {
        PullRequest {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            body: pr.body,
            state: match pr.state.as_deref() {
                Some("closed") => PrState::Closed,
                _ => PrState::Open,
            },
            author: login(pr.user),
            draft: pr.draft,
            // The list endpoint omits `merged`; `merged_at` is always present.
            merged: pr.merged || pr.merged_at.is_some(),
            head_branch: pr.head.map(|b| b.ref_field).unwrap_or_default(),
            base_branch: pr.base.map(|b| b.ref_field).unwrap_or_default(),
            created_at: pr.created_at,
        }
    }
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(c: ApiReviewComment) -> Self {
        ReviewComment {
            id: c.id,
            in_reply_to: c.in_reply_to_id.filter(|&id| id != 0),
            author: login(c.user),
            body: c.body,
            path: c.path,
            diff_hunk: c.diff_hunk,
            line: c.line,
            start_line: c.start_line,
            original_line: c.original_line,
            original_start_line: c.original_start_line,
            html_url: c.html_url,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Keeps the first occurrence of each `full_name`.
fn dedup_repositories(repos: Vec<Repository>) -> Vec<Repository> {
    let mut seen = HashSet::new();
    repos
        .into_iter()
        .filter(|r| seen.insert(r.full_name.clone()))
        .collect()
}

fn repo_route(repo: &Repository, rest: &str) -> String {
    format!(
        "/repos/{}/{}{}",
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.name),
        rest
    )
}

impl GitHub {
    pub fn new(token: String, timeout: Duration) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| NitpickError::Auth(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    async fn with_timeout<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(NitpickError::Timeout(self.timeout.as_secs())),
        }
    }

    async fn fetch_repositories(&self) -> Result<Vec<Repository>> {
        let mut all: Vec<ApiRepository> = self
            .client
            .get("/user/repos", Some(&ListParams::recently_updated()))
            .await?;

        // Organisation repositories are best effort.
        match self
            .client
            .get::<Vec<ApiUser>, _, _>("/user/orgs", None::<&()>)
            .await
        {
            Ok(orgs) => {
                for org in orgs {
                    let route = format!("/orgs/{}/repos", urlencoding::encode(&org.login));
                    match self
                        .client
                        .get::<Vec<ApiRepository>, _, _>(&route, Some(&ListParams::recently_updated()))
                        .await
                    {
                        Ok(repos) => all.extend(repos),
                        Err(e) => tracing::warn!(org = %org.login, "skipping org repositories: {}", e),
                    }
                }
            }
            Err(e) => tracing::warn!("could not list organisations: {}", e),
        }

        Ok(dedup_repositories(all.into_iter().map(Repository::from).collect()))
    }
}

#[async_trait]
impl Forge for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        self.with_timeout(self.fetch_repositories()).await
    }

    async fn list_pull_requests(&self, repo: &Repository) -> Result<Vec<PullRequest>> {
        let route = repo_route(repo, "/pulls");
        let params = ListParams {
            state: Some("open"),
            ..ListParams::page()
        };
        let prs: Vec<ApiPullRequest> = self
            .with_timeout(async {
                Ok::<_, NitpickError>(
                    self.client
                        .get::<Vec<ApiPullRequest>, _, _>(&route, Some(&params))
                        .await?,
                )
            })
            .await?;
        Ok(prs.into_iter().map(PullRequest::from).collect())
    }

    async fn list_review_comments(
        &self,
        repo: &Repository,
        pr: &PullRequest,
    ) -> Result<Vec<ReviewComment>> {
        let route = repo_route(repo, &format!("/pulls/{}/comments", pr.number));
        let params = ListParams::page();
        let comments: Vec<ApiReviewComment> = self
            .with_timeout(async {
                Ok::<_, NitpickError>(
                    self.client
                        .get::<Vec<ApiReviewComment>, _, _>(&route, Some(&params))
                        .await?,
                )
            })
            .await?;
        Ok(comments.into_iter().map(ReviewComment::from).collect())
    }
}
