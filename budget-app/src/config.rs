//! `config.toml`: storage, output and external command settings.
//!
//! ```toml
//! output_dir = "/home/me/Orcamentos"
//! autosave_secs = 30
//! progress_step_ms = 800
//! log_file = "/tmp/budget-pro.log"
//!
//! [store]
//! backend = "sqlite"
//! connection = "/home/me/.local/share/budget-pro/budgets.db"
//!
//! [commands]
//! clipboard = "wl-copy"
//! opener = "xdg-open"
//! rasterizer = "wkhtmltoimage --quiet --width 794 --zoom {scale} {input} {output}"
//! ```
//!
//! The PDF pages themselves are assembled in-process.
//!
//! Every key is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use budget_core::store::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::CommandLine;

pub const APP_DIR: &str = "budget-pro";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("cannot write config '{path}': {reason}")]
    Write { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub connection: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection: default_data_dir()
                .join("budgets.db")
                .display()
                .to_string(),
        }
    }
}

/// `wkhtmltoimage` renders the 794px container at `{scale}`× zoom.
const DEFAULT_RASTERIZER: &str = "wkhtmltoimage --quiet --width 794 --zoom {scale} {input} {output}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsSection {
    pub clipboard: Option<String>,
    pub opener: Option<String>,
    pub rasterizer: Option<String>,
}

/// Platform defaults for the clipboard, the opener and the rasterizer.
impl Default for CommandsSection {
    fn default() -> Self {
        let (clipboard, opener) = if cfg!(target_os = "macos") {
            ("pbcopy", "open")
        } else if cfg!(target_os = "windows") {
            ("clip", "explorer")
        } else {
            ("xclip -selection clipboard", "xdg-open")
        };
        Self {
            clipboard: Some(clipboard.to_string()),
            opener: Some(opener.to_string()),
            rasterizer: Some(DEFAULT_RASTERIZER.to_string()),
        }
    }
}

impl CommandsSection {
    pub fn clipboard(&self) -> Option<CommandLine> {
        self.clipboard.as_deref().and_then(CommandLine::parse)
    }

    pub fn opener(&self) -> Option<CommandLine> {
        self.opener.as_deref().and_then(CommandLine::parse)
    }

    pub fn rasterizer(&self) -> Option<CommandLine> {
        self.rasterizer.as_deref().and_then(CommandLine::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSection,
    /// Where PDF and HTML downloads are written.
    pub output_dir: PathBuf,
    pub autosave_secs: u64,
    pub progress_step_ms: u64,
    pub log_file: Option<PathBuf>,
    pub commands: CommandsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreSection::default(),
            output_dir: dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            autosave_secs: 30,
            progress_step_ms: 800,
            log_file: None,
            commands: CommandsSection::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/budget-pro/config.toml`, or `./config.toml` when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Loads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save_to(
        &self,
        path: &Path,
    ) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::Write {
            path: path.display().to_string(),
            reason,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_err(e.to_string()))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection_string: self.store.connection.clone(),
        }
    }

    pub fn autosave_period(&self) -> Duration {
        Duration::from_secs(self.autosave_secs.max(1))
    }

    pub fn progress_step_delay(&self) -> Duration {
        Duration::from_millis(self.progress_step_ms)
    }
}

/// `<data dir>/budget-pro`, or the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");

        let config = AppConfig::load_from(&dir.path().join("nope.toml")).expect("defaults");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.autosave_period(), Duration::from_secs(30));
        assert_eq!(config.progress_step_delay(), Duration::from_millis(800));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "autosave_secs = 5\n[store]\nbackend = \"memory\"\n[commands]\nrasterizer = \"render {input} {output}\"\n",
        )
        .expect("write config");

        let config = AppConfig::load_from(&path).expect("valid config");

        assert_eq!(config.autosave_secs, 5);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection, StoreSection::default().connection);
        assert_eq!(config.progress_step_ms, 800);
        assert_eq!(
            config.commands.rasterizer().map(|c| c.program().to_string()),
            Some("render".to_string())
        );
        assert_eq!(
            config.commands.opener(),
            CommandsSection::default().opener()
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            autosave_secs: 10,
            log_file: Some(PathBuf::from("/tmp/x.log")),
            ..AppConfig::default()
        };

        config.save_to(&path).expect("save");

        assert_eq!(AppConfig::load_from(&path).expect("load"), config);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "autosave_secs = \"soon\"").expect("write config");

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
