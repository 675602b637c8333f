use loopstudio_common::AppConfig;
use loopstudio_error::Result;
use std::path::{Path, PathBuf};

/// Load the configuration for this invocation.
///
/// An explicit path (`--config` or `LOOPSTUDIO_CONFIG`) must exist. Otherwise
/// `~/.loopstudio/config.yaml` is used when present, and defaults plus `LOOPSTUDIO_*` variables
/// when not.
pub fn load(explicit: Option<&str>) -> Result<AppConfig> {
    let path = resolve_path(explicit, default_path().as_deref());
    AppConfig::from_file(path.as_deref())
}

fn resolve_path(explicit: Option<&str>, default: Option<&Path>) -> Option<String> {
    if let Some(path) = explicit {
        return Some(path.to_string());
    }
    default
        .filter(|p| p.exists())
        .map(|p| p.to_string_lossy().into_owned())
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".loopstudio").join("config.yaml"))
}
