//! Herald configuration loaded from `.herald/config.toml`.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeraldConfig {
    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Jenkins connection settings.
    pub jenkins: JenkinsConfig,

    /// Telegram bot settings.
    pub telegram: TelegramConfig,

    /// Conversation display name → Jenkins user ID. A conversation whose
    /// name appears here receives that user's build notifications.
    #[serde(default)]
    pub recipients: HashMap<String, String>,
}

/// Jenkins-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JenkinsConfig {
    /// Server root, e.g. "https://ci.example.com".
    pub base_url: String,
    pub user: String,
    /// API token from the Jenkins user settings page.
    pub api_token: String,
}

/// Telegram-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token from @BotFather.
    pub bot_token: String,
}

fn default_poll_interval() -> u64 {
    5
}

/// Sample config written by `herald init`.
pub const SAMPLE_CONFIG: &str = r#"# Herald configuration.
# poll_interval_secs = 5

[jenkins]
base_url = "https://ci.example.com"
user = "herald-bot"
api_token = "your-jenkins-api-token"

[telegram]
# Bot API token from @BotFather.
bot_token = "your-telegram-bot-token"

# Conversation display name -> Jenkins user ID.
# Builds triggered by the user ID are relayed to the matching conversation.
[recipients]
"Tiago Nobrega" = "tnobrega"
"#;

impl HeraldConfig {
    fn path(workspace_root: &Path) -> PathBuf {
        workspace_root.join(".herald/config.toml")
    }

    /// Load config from `.herald/config.toml` under the given directory.
    pub fn load(workspace_root: &Path) -> color_eyre::Result<Self> {
        let path = Self::path(workspace_root);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                color_eyre::eyre::eyre!(
                    "No config found at {}\n\n\
                     Run `herald init` to write a sample config, then fill in\n\
                     the Jenkins credentials, the Telegram bot token, and the\n\
                     [recipients] table.",
                    path.display()
                )
            } else {
                color_eyre::eyre::eyre!("failed to read {}: {e}", path.display())
            }
        })?;
        let config: HeraldConfig = toml::from_str(&content)
            .map_err(|e| color_eyre::eyre::eyre!("failed to parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Write the sample config, refusing to clobber an existing one.
    pub fn write_sample(workspace_root: &Path) -> color_eyre::Result<PathBuf> {
        let path = Self::path(workspace_root);
        if path.exists() {
            color_eyre::eyre::bail!("config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, SAMPLE_CONFIG)?;
        Ok(path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
