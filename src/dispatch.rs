//! Executes the side effects requested by the navigation core.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::app::Level;
use crate::clipboard::Clipboard;
use crate::forge::Forge;
use crate::prompt::PromptMode;
use crate::types::{PullRequest, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchRepos {
        load_id: u64,
    },
    FetchPullRequests {
        repo: Repository,
        load_id: u64,
    },
    FetchComments {
        repo: Repository,
        pr: PullRequest,
        load_id: u64,
    },
    CopyToClipboard {
        text: String,
        mode: PromptMode,
    },
    ClearStatusAfter {
        generation: u64,
        delay: Duration,
    },
    OpenUrl(String),
}

pub struct Dispatcher {
    forge: Arc<dyn Forge>,
    clipboard: Arc<dyn Clipboard>,
    action_tx: mpsc::UnboundedSender<Action>,
    status_timer: Option<CancellationToken>,
}

impl Dispatcher {
    pub fn new(
        forge: Arc<dyn Forge>,
        clipboard: Arc<dyn Clipboard>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            forge,
            clipboard,
            action_tx,
            status_timer: None,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!(?command, "dispatching");
        match command {
            Command::FetchRepos { load_id } => self.spawn_load_repos(load_id),
            Command::FetchPullRequests { repo, load_id } => self.spawn_load_prs(repo, load_id),
            Command::FetchComments { repo, pr, load_id } => {
                self.spawn_load_comments(repo, pr, load_id)
            }
            Command::CopyToClipboard { text, mode } => self.spawn_copy(text, mode),
            Command::ClearStatusAfter { generation, delay } => {
                self.schedule_status_clear(generation, delay)
            }
            Command::OpenUrl(url) => self.spawn_open(url),
        }
    }

    fn spawn_load_repos(&self, load_id: u64) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.list_repositories().await {
                Ok(repos) => {
                    tx.send(Action::ReposLoaded(repos, load_id)).ok();
                }
                Err(e) => {
                    tracing::warn!("loading repositories failed: {}", e);
                    tx.send(Action::LoadFailed {
                        level: Level::Repositories,
                        message: e.to_string(),
                        load_id,
                    })
                    .ok();
                }
            }
        });
    }

    fn spawn_load_prs(&self, repo: Repository, load_id: u64) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.list_pull_requests(&repo).await {
                Ok(prs) => {
                    tx.send(Action::PrsLoaded(prs, load_id)).ok();
                }
                Err(e) => {
                    tracing::warn!(repo = %repo.full_name, "loading pull requests failed: {}", e);
                    tx.send(Action::LoadFailed {
                        level: Level::PullRequests,
                        message: e.to_string(),
                        load_id,
                    })
                    .ok();
                }
            }
        });
    }

    fn spawn_load_comments(&self, repo: Repository, pr: PullRequest, load_id: u64) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.list_review_comments(&repo, &pr).await {
                Ok(comments) => {
                    tx.send(Action::CommentsLoaded(comments, load_id)).ok();
                }
                Err(e) => {
                    tracing::warn!(
                        repo = %repo.full_name,
                        pr = pr.number,
                        "loading review comments failed: {}",
                        e
                    );
                    tx.send(Action::LoadFailed {
                        level: Level::Comments,
                        message: e.to_string(),
                        load_id,
                    })
                    .ok();
                }
            }
        });
    }

    fn spawn_copy(&self, text: String, mode: PromptMode) {
        let tx = self.action_tx.clone();
        let clipboard = Arc::clone(&self.clipboard);
        tokio::task::spawn_blocking(move || {
            let result = clipboard.copy(&text).map_err(|e| {
                tracing::warn!("clipboard copy failed: {}", e);
                e.to_string()
            });
            tx.send(Action::Copied { mode, result }).ok();
        });
    }

    /// Replaces any pending clear; only the newest timer fires.
    fn schedule_status_clear(&mut self, generation: u64, delay: Duration) {
        if let Some(previous) = self.status_timer.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        self.status_timer = Some(cancel.clone());

        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    tx.send(Action::ClearStatus(generation)).ok();
                }
            }
        });
    }

    fn spawn_open(&self, url: String) {
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = open::that(&url) {
                tracing::warn!(%url, "opening browser failed: {}", e);
                tx.send(Action::from(crate::error::NitpickError::Io(e))).ok();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NitpickError, Result};
    use crate::types::fixtures::{comment, pr, repo};
    use crate::types::ReviewComment;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeForge {
        fail_comments: bool,
    }

    #[async_trait]
    impl Forge for FakeForge {
        fn name(&self) -> &str {
            "fake"
        }

        async fn list_repositories(&self) -> Result<Vec<Repository>> {
            Ok(vec![repo("a"), repo("b")])
        }

        async fn list_pull_requests(&self, _repo: &Repository) -> Result<Vec<PullRequest>> {
            Ok(vec![pr(1)])
        }

        async fn list_review_comments(
            &self,
            _repo: &Repository,
            _pr: &PullRequest,
        ) -> Result<Vec<ReviewComment>> {
            if self.fail_comments {
                Err(NitpickError::Timeout(30))
            } else {
                Ok(vec![comment(1)])
            }
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        copied: Mutex<Vec<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> Result<()> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn dispatcher(
        fail_comments: bool,
    ) -> (
        Dispatcher,
        Arc<FakeClipboard>,
        mpsc::UnboundedReceiver<Action>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let clipboard = Arc::new(FakeClipboard::default());
        let d = Dispatcher::new(
            Arc::new(FakeForge { fail_comments }),
            clipboard.clone(),
            tx,
        );
        (d, clipboard, rx)
    }

    #[tokio::test]
    async fn fetch_result_carries_load_id() {
        let (mut d, _, mut rx) = dispatcher(false);
        d.dispatch(Command::FetchRepos { load_id: 7 });
        match rx.recv().await {
            Some(Action::ReposLoaded(repos, 7)) => assert_eq!(repos.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_error_reports_level() {
        let (mut d, _, mut rx) = dispatcher(true);
        d.dispatch(Command::FetchComments {
            repo: repo("a"),
            pr: pr(1),
            load_id: 3,
        });
        match rx.recv().await {
            Some(Action::LoadFailed {
                level,
                message,
                load_id,
            }) => {
                assert_eq!(level, Level::Comments);
                assert_eq!(load_id, 3);
                assert!(message.contains("timed out"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn copy_reports_outcome() {
        let (mut d, clipboard, mut rx) = dispatcher(false);
        d.dispatch(Command::CopyToClipboard {
            text: "prompt".to_string(),
            mode: PromptMode::Simple,
        });
        match rx.recv().await {
            Some(Action::Copied { mode, result }) => {
                assert_eq!(mode, PromptMode::Simple);
                assert!(result.is_ok());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(clipboard.copied.lock().unwrap().as_slice(), ["prompt"]);
    }

    #[tokio::test]
    async fn successive_copies_share_one_clipboard() {
        let (mut d, clipboard, mut rx) = dispatcher(false);
        for text in ["first", "second"] {
            d.dispatch(Command::CopyToClipboard {
                text: text.to_string(),
                mode: PromptMode::Full,
            });
            match rx.recv().await {
                Some(Action::Copied { result, .. }) => assert!(result.is_ok()),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(
            clipboard.copied.lock().unwrap().as_slice(),
            ["first", "second"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn newer_status_timer_replaces_older() {
        let (mut d, _, mut rx) = dispatcher(false);
        d.dispatch(Command::ClearStatusAfter {
            generation: 1,
            delay: Duration::from_secs(3),
        });
        d.dispatch(Command::ClearStatusAfter {
            generation: 2,
            delay: Duration::from_secs(2),
        });
        tokio::time::sleep(Duration::from_secs(5)).await;
        match rx.recv().await {
            Some(Action::ClearStatus(generation)) => assert_eq!(generation, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
