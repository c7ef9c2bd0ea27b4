//! Configuration management for `bloggy.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                            |
//! |----------------|----------------------------------------------------|
//! | `[post]`       | Fallback post metadata (title, description, color) |
//! | `[paths]`      | Template file, template dir, output dir            |
//! | `[serve]`      | Preview server (port, interface)                   |
//! | `[validation]` | Lint reporting toggles                             |
//! | `[rules]`      | Individual lint rules                              |
//!
//! The loaded config is held behind an atomic handle (see `handle`); watch
//! mode swaps in a fresh immutable snapshot when the file changes.

mod handle;

pub use handle::{cfg, init_config, reload_config};

use serde::Deserialize;
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Root configuration structure representing bloggy.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Fallback post metadata
    #[serde(default)]
    pub post: PostConfig,

    /// Template and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Lint reporting toggles
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Lint rules
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            post: PostConfig::default(),
            paths: PathsConfig::default(),
            serve: ServeConfig::default(),
            validation: ValidationConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

/// `[post]` - metadata used when the document's frontmatter omits a key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostConfig {
    pub title: String,
    pub description: String,
    pub color: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            title: "Unnamed Post".into(),
            description: "No description provided".into(),
            color: "#72d572".into(),
        }
    }
}

/// `[paths]` - where templates live and where output goes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Page template resolved per run.
    pub template: PathBuf,

    /// Base directory for include directives. Defaults to the template's
    /// parent directory when unset.
    pub template_dir: Option<PathBuf>,

    /// Directory the generated HTML is written to.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("templates/template.html"),
            template_dir: None,
            output_dir: PathBuf::from("dist"),
        }
    }
}

impl PathsConfig {
    /// Base directory for include resolution.
    pub fn template_dir(&self) -> PathBuf {
        self.template_dir.clone().unwrap_or_else(|| {
            self.template
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

/// `[serve]` - preview server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub port: u16,
    pub interface: IpAddr,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

/// `[validation]` - which lint results are reported.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub errors: bool,
    pub warns: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            errors: true,
            warns: true,
        }
    }
}

/// `[rules]` - individual lint rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub allow_raw_html: bool,
    pub max_paragraph_length: usize,
    pub require_image_alts: bool,
    pub allow_consecutive_headers: bool,
    pub max_header_depth: u8,
    pub require_list_spacing: bool,
    pub require_table_separators: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            allow_raw_html: false,
            max_paragraph_length: 500,
            require_image_alts: true,
            allow_consecutive_headers: false,
            max_header_depth: 4,
            require_list_spacing: true,
            require_table_separators: true,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A missing config is not an error (the original tool runs fine without
    /// one); a present-but-broken config is.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            crate::log!(
                "config";
                "'{}' not found, using built-in defaults",
                path.display()
            );
            let mut config = Self::default();
            config.config_path = path.to_path_buf();
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.post.title, "Unnamed Post");
        assert_eq!(config.rules.max_header_depth, 4);
        assert!(config.validation.enabled);
    }

    #[test]
    fn test_template_dir_falls_back_to_template_parent() {
        let paths = PathsConfig {
            template: PathBuf::from("site/templates/template.html"),
            template_dir: None,
            output_dir: PathBuf::from("dist"),
        };
        assert_eq!(paths.template_dir(), PathBuf::from("site/templates"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [post]
            title = "Hello"

            [serve]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.post.title, "Hello");
        // Unset sections and fields keep their defaults
        assert_eq!(config.post.color, "#72d572");
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.paths.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result: Result<Config, _> = toml::from_str("[post]\nttile = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/bloggy.toml")).unwrap();
        assert_eq!(config.post.title, "Unnamed Post");
        assert_eq!(
            config.config_path,
            PathBuf::from("/nonexistent/bloggy.toml")
        );
    }
}
