use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read theme file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse theme file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Colors used when rendering parsed markup.
///
/// Colors are strings such as `"yellow"`, `"lightblue"` or `"#ff8800"`; the
/// viewer decides how to interpret them. Missing fields take their defaults,
/// so a theme file only needs the colors it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// One color per header level, starting at level 1. Deeper levels reuse
    /// the last entry.
    pub headers: Vec<String>,
    pub bullet: String,
    pub quote: String,
    pub inline_code_background: String,
    pub code: CodeColors,
}

/// One color per kind of code token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeColors {
    pub default: String,
    pub comment: String,
    pub literal: String,
    pub keyword: String,
    pub identifier: String,
    pub types: String,
    pub generics: String,
    pub params: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            headers: vec!["magenta".into(), "cyan".into(), "blue".into()],
            bullet: "yellow".into(),
            quote: "darkgray".into(),
            inline_code_background: "black".into(),
            code: CodeColors::default(),
        }
    }
}

impl Default for CodeColors {
    fn default() -> Self {
        Self {
            default: "white".into(),
            comment: "darkgray".into(),
            literal: "green".into(),
            keyword: "magenta".into(),
            identifier: "lightblue".into(),
            types: "yellow".into(),
            generics: "cyan".into(),
            params: "lightyellow".into(),
        }
    }
}

impl Theme {
    /// The header color for `level` (1-based), if any header colors are set.
    pub fn header_color(&self, level: usize) -> Option<&str> {
        self.headers
            .get(level.saturating_sub(1))
            .or_else(|| self.headers.last())
            .map(String::as_str)
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let theme = toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(theme))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/spanmark");
        PathBuf::from(config_dir.as_ref()).join("theme.toml")
    }
}
