use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;

use crate::layout::Tree;

pub const DEFAULT_LAYOUT: &str = "flutter";

const LAYOUT_EXT: &str = ".toml";

#[derive(RustEmbed)]
#[folder = "layouts"]
struct Builtin;

/// Names of the layouts compiled into the binary, sorted.
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = Builtin::iter()
        .filter_map(|file| file.strip_suffix(LAYOUT_EXT).map(str::to_owned))
        .collect();
    names.sort();
    names
}

pub fn raw(name: &str) -> Result<String> {
    let file = Builtin::get(&format!("{}{}", name, LAYOUT_EXT))
        .ok_or_else(|| anyhow!("unknown built-in layout `{}` (available: {})", name, names().join(", ")))?;
    std::str::from_utf8(file.data.as_ref())
        .with_context(|| format!("decoding built-in layout `{}`", name))
        .map(|value| value.to_owned())
}

pub fn builtin(name: &str) -> Result<Tree> {
    Tree::from_toml(&raw(name)?).with_context(|| format!("loading built-in layout `{}`", name))
}

/// Where a layout comes from: an embedded name or a file on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayoutSource {
    Builtin(String),
    File(Utf8PathBuf),
}

impl LayoutSource {
    /// Built-in names win over paths; anything else is a file relative to `base`.
    pub fn resolve(spec: &str, base: &Utf8Path) -> Self {
        if names().iter().any(|name| name == spec) {
            return LayoutSource::Builtin(spec.to_owned());
        }
        let path = Utf8Path::new(spec);
        if path.is_absolute() {
            LayoutSource::File(path.to_path_buf())
        } else {
            LayoutSource::File(base.join(path))
        }
    }

    pub fn read_source(&self) -> Result<String> {
        match self {
            LayoutSource::Builtin(name) => raw(name),
            LayoutSource::File(path) => {
                fs::read_to_string(path).with_context(|| format!("reading layout {}", path))
            }
        }
    }

    pub fn load(&self) -> Result<Tree> {
        match self {
            LayoutSource::Builtin(name) => builtin(name),
            LayoutSource::File(path) => {
                let raw = self.read_source()?;
                Tree::from_toml(&raw).with_context(|| format!("loading layout {}", path))
            }
        }
    }
}

impl std::fmt::Display for LayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutSource::Builtin(name) => write!(f, "`{}` (built-in)", name),
            LayoutSource::File(path) => write!(f, "{}", path),
        }
    }
}
