use std::{env, time::Duration};

use anyhow::{anyhow, Context, Result};
use jira_agile_auth::Credentials;
use tracing::debug;

pub const ENV_BASE_URL: &str = "JIRA_AGILE_BASE_URL";
pub const ENV_USERNAME: &str = "JIRA_AGILE_USERNAME";
pub const ENV_PASSWORD: &str = "JIRA_AGILE_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "JIRA_AGILE_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings needed to talk to a Jira instance.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: Credentials::new(username, password),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from the `JIRA_AGILE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("Missing required environment variable {key}"))
        };

        let base_url = required(ENV_BASE_URL)?;
        let username = required(ENV_USERNAME)?;
        let password = required(ENV_PASSWORD)?;

        let mut config = Self::new(base_url, username, password);

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for {ENV_TIMEOUT_SECS}: {raw:?}"))?;
            config.timeout = Duration::from_secs(secs);
        }

        debug!(
            base_url = %config.base_url,
            username = config.credentials.username(),
            timeout_secs = config.timeout.as_secs(),
            "Loaded client configuration"
        );

        Ok(config)
    }
}

fn default_user_agent() -> String {
    format!("jira-agile/{}", env!("CARGO_PKG_VERSION"))
}
