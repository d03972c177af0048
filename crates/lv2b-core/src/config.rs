use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::embed::DEFAULT_CHUNK_SIZE;
use crate::emit::Newline;
use crate::error::ConfigError;
use crate::scan::{DEFAULT_SUFFIX, ScanOptions};

/// Top-level project configuration loaded from `.lv2b.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Lv2bConfig {
    pub target: TargetId,
    pub suffix: String,
    pub chunk_size: NonZeroUsize,
    pub follow_links: bool,
    pub newline: Newline,
    /// File whose text replaces the target's default preamble.
    pub header: Option<PathBuf>,
}

impl Default for Lv2bConfig {
    fn default() -> Self {
        Self {
            target: TargetId::Rust,
            suffix: DEFAULT_SUFFIX.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_links: false,
            newline: Newline::CrLf,
            header: None,
        }
    }
}

impl Lv2bConfig {
    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "suffix",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            suffix: self.suffix.clone(),
            follow_links: self.follow_links,
        }
    }
}

/// Which output language to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    #[default]
    Rust,
    Cpp,
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetId::Rust => "rust",
            TargetId::Cpp => "cpp",
        })
    }
}

impl FromStr for TargetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rust" => Ok(TargetId::Rust),
            "cpp" => Ok(TargetId::Cpp),
            other => Err(format!("unknown target `{other}` (expected rust or cpp)")),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".lv2b.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<Lv2bConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Lv2bConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# lv2b configuration
target: rust          # rust | cpp
suffix: .ttl          # file name suffix of embedded files
chunk_size: 8000      # max characters per string literal
follow_links: false   # descend into symlinked directories
newline: crlf         # crlf | lf, appended once at the end of the output
# header: LICENSE-HEADER.txt   # replaces the default preamble comment
"#
}
