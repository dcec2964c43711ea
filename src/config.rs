use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{NitpickError, Result};

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const USAGE: &str = "\
Please provide a GitHub access token. You can either:
  1. Set an environment variable: export GITHUB_TOKEN=your_token
  2. Create a .env file with: GITHUB_TOKEN=your_token
  3. Add `token = \"...\"` under [github] in the nitpick config file
You can create a personal access token at: https://github.com/settings/personal-access-tokens";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Initial values of the in-session toggles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_replies: bool,
    pub simple_prompt: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub ui: UiConfig,
}

pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("nitpick").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Config::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config file: {}", e);
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NitpickError::Config(e.to_string()))
    }

    /// Token from the configured environment variable, else from the file.
    pub fn resolve_token(&self) -> Result<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    fn resolve_token_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<String> {
        if let Some(token) = env(&self.github.token_env).filter(|t| !t.trim().is_empty()) {
            return Ok(token.trim().to_string());
        }
        if let Some(token) = self.github.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(token.trim().to_string());
        }
        Err(NitpickError::Auth(format!(
            "{} is not set and no token is configured",
            self.github.token_env
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[github]
token = "ghp_file"
token_env = "NITPICK_TOKEN"
timeout_secs = 10

[ui]
show_replies = true
simple_prompt = true
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_file"));
        assert_eq!(config.github.token_env, "NITPICK_TOKEN");
        assert_eq!(config.github.timeout_secs, 10);
        assert!(config.ui.show_replies);
        assert!(config.ui.simple_prompt);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::parse("[ui]\nshow_replies = true\n").unwrap();
        assert_eq!(config.github.token_env, DEFAULT_TOKEN_ENV);
        assert_eq!(config.github.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.github.token.is_none());
        assert!(!config.ui.simple_prompt);
    }

    #[test]
    fn invalid_config_is_an_error() {
        assert!(matches!(
            Config::parse("github = 3"),
            Err(NitpickError::Config(_))
        ));
    }

    #[test]
    fn env_token_wins_over_file() {
        let mut config = Config::default();
        config.github.token = Some("from-file".to_string());
        let token = config
            .resolve_token_with(|name| (name == "GITHUB_TOKEN").then(|| "from-env".to_string()))
            .unwrap();
        assert_eq!(token, "from-env");
    }

    #[test]
    fn file_token_used_when_env_blank() {
        let mut config = Config::default();
        config.github.token = Some(" from-file \n".to_string());
        let token = config
            .resolve_token_with(|_| Some("   ".to_string()))
            .unwrap();
        assert_eq!(token, "from-file");
    }

    #[test]
    fn missing_token_is_auth_error() {
        let config = Config::default();
        let err = config.resolve_token_with(|_| None).unwrap_err();
        assert!(matches!(err, NitpickError::Auth(_)));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }
}
