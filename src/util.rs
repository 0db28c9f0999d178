/// Filesystem helpers shared by generation and export.
pub mod fs {
    use std::fs::{self, File};

    use anyhow::{Context, Result};
    use camino::Utf8Path;

    /// Ensure a directory exists, creating it recursively if needed.
    pub fn ensure_dir(path: &Utf8Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating directory {}", path))
    }

    /// Create an empty file, truncating one that already exists.
    pub fn touch(path: &Utf8Path) -> Result<()> {
        File::create(path).with_context(|| format!("creating file {}", path))?;
        Ok(())
    }

    pub fn write(path: &Utf8Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            ensure_dir(parent)?;
        }
        fs::write(path, contents).with_context(|| format!("writing {}", path))
    }

}
