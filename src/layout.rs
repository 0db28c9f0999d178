use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Unexpected, Visitor};

/// One entry of a layout: an empty file or a directory with named children.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    File,
    Dir(Tree),
}

/// Ordered children of a directory. Names are single path components.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    children: Vec<(String, Node)>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a layout document. A table is a directory, `""` is a file.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("decoding layout")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first walk; a directory is always yielded before its children.
    pub fn entries(&self) -> Vec<(Utf8PathBuf, &Node)> {
        let mut out = Vec::new();
        collect_entries(self, &Utf8PathBuf::new(), &mut out);
        out
    }

    /// Returns `(directories, files)` over the whole tree.
    pub fn counts(&self) -> (usize, usize) {
        self.entries()
            .iter()
            .fold((0, 0), |(dirs, files), (_, node)| match node {
                Node::Dir(_) => (dirs + 1, files),
                Node::File => (dirs, files + 1),
            })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        render_into(self, 0, &mut out);
        out
    }
}

#[cfg(test)]
impl Tree {
    pub fn file(mut self, name: &str) -> Self {
        self.children.push((name.to_owned(), Node::File));
        self
    }

    pub fn dir(mut self, name: &str, tree: Tree) -> Self {
        self.children.push((name.to_owned(), Node::Dir(tree)));
        self
    }
}

fn collect_entries<'a>(
    tree: &'a Tree,
    prefix: &Utf8PathBuf,
    out: &mut Vec<(Utf8PathBuf, &'a Node)>,
) {
    for (name, node) in tree.iter() {
        let path = prefix.join(name);
        out.push((path.clone(), node));
        if let Node::Dir(children) = node {
            collect_entries(children, &path, out);
        }
    }
}

fn render_into(tree: &Tree, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (name, node) in tree.iter() {
        match node {
            Node::File => {
                let _ = writeln!(out, "{}{}", indent, name);
            }
            Node::Dir(children) => {
                let _ = writeln!(out, "{}{}/", indent, name);
                render_into(children, depth + 1, out);
            }
        }
    }
}

/// Reject anything that would not join onto a parent as exactly one component.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("entry name must not be empty".to_owned());
    }
    if name == "." || name == ".." {
        return Err(format!("entry name `{}` is not allowed", name));
    }
    if name.contains(['/', '\\']) {
        return Err(format!("entry name `{}` must not contain a path separator", name));
    }
    Ok(())
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table of layout entries")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Tree, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = Tree::new();
        while let Some(name) = map.next_key::<String>()? {
            validate_name(&name).map_err(de::Error::custom)?;
            let node = map.next_value::<Node>()?;
            tree.children.push((name, node));
        }
        Ok(tree)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an empty string (file) or a table (directory)")
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Node, E>
    where
        E: de::Error,
    {
        if value.is_empty() {
            Ok(Node::File)
        } else {
            Err(E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    fn visit_map<A>(self, map: A) -> std::result::Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        TreeVisitor.visit_map(map).map(Node::Dir)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}
