use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "abi-gen.yaml";

/// Settings shared by the subcommands. Command-line flags override every field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    pub output_dir: PathBuf,
    pub runtime_crate: String,
    pub allow_partial: bool,
    pub log_filter: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            runtime_crate: "abi_reflect".to_string(),
            allow_partial: false,
            log_filter: "info".to_string(),
        }
    }
}

impl CodegenConfig {
    /// Reads `explicit` if given, otherwise `abi-gen.yaml` in `cwd` when it
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        // An empty file means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}
