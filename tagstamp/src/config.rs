//! Locating the configuration file.

use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "tagstamp";
const CONFIG_FILE: &str = "config.yaml";

/// Returns the config file to load, if any.
///
/// An explicit path (from `--config` or `TAGSTAMP_CONFIG`) is always used and
/// must exist. Otherwise `<config_dir>/tagstamp/config.yaml` is used when it
/// is present.
pub fn get_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    resolve_config_path(explicit, default_config_path().as_deref())
}

/// Default location of the config file, `~/.config/tagstamp/config.yaml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn resolve_config_path(explicit: Option<PathBuf>, default: Option<&Path>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }

    // An absent default file just means defaults apply
    default.filter(|p| p.is_file()).map(Path::to_path_buf)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
