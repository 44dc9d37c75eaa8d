/// Config file loading and creation for the mergerank CLI.
///
/// Config lives at ~/.config/mergerank/config.toml.
/// All fields are optional — CLI args override config values.
use mergerank_core::TiePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct MergerankConfig {
    pub tie_policy: Option<TiePolicy>,
    pub allow_duplicates: Option<bool>,
    pub session_dir: Option<String>,
    pub shuffle: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# mergerank configuration
# All values here can be overridden by CLI flags.

# What answering \"equal\" does: \"group\" keeps the items tied,
# \"forbid\" refuses the answer so every pair must be ordered.
# tie_policy = \"group\"

# Treat repeated item IDs as separate entries instead of refusing the list.
# allow_duplicates = false

# Directory for session files given as bare names (e.g. --session albums.json).
# session_dir = \"/home/me/.local/share/mergerank\"

# Shuffle the item order before the first comparison.
# shuffle = false
";

/// Returns the default config path: ~/.config/mergerank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("mergerank").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> MergerankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => MergerankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

pub fn parse_config(content: &str) -> Result<MergerankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Resolve a `--session` argument. Bare file names go under `session_dir`
/// when one is configured; anything with a directory component is used as is.
pub fn resolve_session_path(arg: &Path, cfg: &MergerankConfig) -> PathBuf {
    let is_bare = arg.parent().map_or(true, |p| p.as_os_str().is_empty());
    match (&cfg.session_dir, is_bare) {
        (Some(dir), true) => PathBuf::from(dir).join(arg),
        _ => arg.to_path_buf(),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
