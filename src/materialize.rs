use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::layout::{Node, Tree};
use crate::util;

/// What a successful run created (or re-touched).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub dirs: usize,
    pub files: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Dir => "dir",
            EntryKind::File => "file",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub path: Utf8PathBuf,
    pub kind: EntryKind,
}

/// Create `tree` under `base`. The first refused creation aborts the walk and
/// anything already created is left on disk.
pub fn materialize(base: &Utf8Path, tree: &Tree) -> Result<Summary> {
    util::fs::ensure_dir(base)?;

    let mut summary = Summary::default();
    materialize_into(base, tree, &mut summary)?;

    info!(
        dirs = summary.dirs,
        files = summary.files,
        "materialized layout under {}",
        base
    );
    Ok(summary)
}

fn materialize_into(dir: &Utf8Path, tree: &Tree, summary: &mut Summary) -> Result<()> {
    for (name, node) in tree.iter() {
        let path = dir.join(name);
        match node {
            Node::File => {
                util::fs::touch(&path)?;
                debug!("created file {}", path);
                summary.files += 1;
            }
            Node::Dir(children) => {
                util::fs::ensure_dir(&path)?;
                debug!("created directory {}", path);
                summary.dirs += 1;
                materialize_into(&path, children, summary)?;
            }
        }
    }
    Ok(())
}

/// Entries `materialize` would create, in creation order. Touches nothing.
pub fn plan(base: &Utf8Path, tree: &Tree) -> Vec<Entry> {
    tree.entries()
        .into_iter()
        .map(|(relative, node)| Entry {
            path: base.join(relative),
            kind: match node {
                Node::Dir(_) => EntryKind::Dir,
                Node::File => EntryKind::File,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    fn sample() -> Tree {
        Tree::new()
            .file("a.txt")
            .dir("sub", Tree::new().file("b.txt"))
    }

    fn assert_empty_file(path: &Utf8Path) {
        let meta = fs::metadata(path).unwrap();
        assert!(meta.is_file(), "{} is not a file", path);
        assert_eq!(meta.len(), 0, "{} is not empty", path);
    }

    #[test]
    fn creates_files_and_directories() {
        let (_guard, root) = scratch();
        let base = root.join("out");

        let summary = materialize(&base, &sample()).unwrap();

        assert_eq!(summary, Summary { dirs: 1, files: 2 });
        assert_empty_file(&base.join("a.txt"));
        assert!(base.join("sub").is_dir());
        assert_empty_file(&base.join("sub").join("b.txt"));
    }

    #[test]
    fn creates_missing_base_ancestors() {
        let (_guard, root) = scratch();
        let base = root.join("deep").join("er").join("lib");

        materialize(&base, &sample()).unwrap();
        assert_empty_file(&base.join("sub").join("b.txt"));
    }

    #[test]
    fn rerun_succeeds_and_truncates_files() {
        let (_guard, root) = scratch();
        let base = root.join("out");

        materialize(&base, &sample()).unwrap();
        fs::write(base.join("sub").join("b.txt"), "edited").unwrap();
        materialize(&base, &sample()).unwrap();

        assert_empty_file(&base.join("sub").join("b.txt"));
        let mut names: Vec<_> = fs::read_dir(&base)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt", "sub"]);
    }

    #[test]
    fn leaves_unrelated_entries_untouched() {
        let (_guard, root) = scratch();
        let base = root.join("out");
        fs::create_dir_all(base.join("keep")).unwrap();
        fs::write(base.join("notes.md"), "mine").unwrap();
        fs::write(base.join("keep").join("data.bin"), "1234").unwrap();

        materialize(&base, &sample()).unwrap();

        assert_eq!(fs::read_to_string(base.join("notes.md")).unwrap(), "mine");
        assert_eq!(fs::read_to_string(base.join("keep").join("data.bin")).unwrap(), "1234");
        assert_empty_file(&base.join("a.txt"));
    }

    #[test]
    fn unwritable_base_fails_before_creating_anything() {
        let (_guard, root) = scratch();
        let blocker = root.join("blocker");
        fs::write(&blocker, "").unwrap();
        let base = blocker.join("lib");

        let err = materialize(&base, &sample()).unwrap_err();

        assert!(err.to_string().contains("creating directory"));
        assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
        let names: Vec<_> = fs::read_dir(&root).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn file_over_existing_directory_aborts_the_walk() {
        let (_guard, root) = scratch();
        let base = root.join("out");
        fs::create_dir_all(base.join("a.txt")).unwrap();

        let err = materialize(&base, &sample()).unwrap_err();

        assert!(format!("{:#}", err).contains("a.txt"));
        assert!(!base.join("sub").exists());
    }

    #[test]
    fn plan_lists_entries_without_touching_disk() {
        let (_guard, root) = scratch();
        let base = root.join("out");

        let entries = plan(&base, &sample());

        assert_eq!(
            entries,
            vec![
                Entry { path: base.join("a.txt"), kind: EntryKind::File },
                Entry { path: base.join("sub"), kind: EntryKind::Dir },
                Entry { path: base.join("sub").join("b.txt"), kind: EntryKind::File },
            ]
        );
        assert!(!base.exists());
    }

    #[test]
    fn flutter_layout_materializes_completely() {
        let (_guard, root) = scratch();
        let base = root.join("lib");
        let tree = crate::layouts::builtin(crate::layouts::DEFAULT_LAYOUT).unwrap();

        let summary = materialize(&base, &tree).unwrap();

        assert_eq!((summary.dirs, summary.files), tree.counts());
        for entry in plan(&base, &tree) {
            match entry.kind {
                EntryKind::Dir => assert!(entry.path.is_dir(), "{}", entry.path),
                EntryKind::File => assert_empty_file(&entry.path),
            }
        }
    }
}
