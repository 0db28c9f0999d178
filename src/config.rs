use std::fs;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

const CONFIG_DIR: &str = ".skel";
const CONFIG_FILE: &str = "config.toml";

/// Optional configuration, usually `.skel/config.toml` in or above the working directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkelConfig {
    /// Directory the layout is generated under, relative to the working directory.
    pub base_dir: Option<String>,
    /// Built-in layout name, or a layout file relative to the config file.
    pub layout: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigPathSource,
}

impl ResolvedConfigPath {
    /// Directory relative config values are resolved against.
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(Utf8Path::new("."))
    }
}

/// Pick the config file to use, if any. An explicit path must exist; the
/// discovered and home locations are only used when present.
pub fn resolve_path(
    explicit: Option<&Utf8Path>,
    cwd: &Utf8Path,
    home: Option<&Utf8Path>,
) -> Result<Option<ResolvedConfigPath>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file {} does not exist", path);
        }
        return Ok(Some(ResolvedConfigPath {
            path: path.to_path_buf(),
            source: ConfigPathSource::Explicit,
        }));
    }

    let mut dir = Some(cwd);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(Some(ResolvedConfigPath {
                path: candidate,
                source: ConfigPathSource::Discovered,
            }));
        }
        dir = current.parent();
    }

    if let Some(home) = home {
        let candidate = home.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(Some(ResolvedConfigPath {
                path: candidate,
                source: ConfigPathSource::HomeDefault,
            }));
        }
    }

    Ok(None)
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<SkelConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}
