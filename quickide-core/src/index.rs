//! Directory tree projection of a pack.
//!
//! A [`FileTree`] is rebuilt from disk on demand and never written back.
//! Folders come before files; both are ordered by name.

use crate::Result;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Coarse file classification by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Json,
    Image,
    Lang,
    Script,
    Function,
    Other,
}

impl FileCategory {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("png" | "jpg" | "jpeg" | "tga") => Self::Image,
            Some("lang") => Self::Lang,
            Some("js") => Self::Script,
            Some("mcfunction") => Self::Function,
            _ => Self::Other,
        }
    }
}

/// One file or folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    /// Path relative to the tree root
    pub relative_path: PathBuf,
    pub is_dir: bool,
    /// `None` for folders
    pub category: Option<FileCategory>,
    pub children: Vec<FileNode>,
}

impl FileNode {
    fn from_entry(entry: &DirEntry, root: &Path) -> Self {
        let is_dir = entry.file_type().is_dir();
        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path())
            .to_path_buf();

        Self {
            name: entry.file_name().to_string_lossy().into_owned(),
            relative_path,
            is_dir,
            category: (!is_dir).then(|| FileCategory::from_path(entry.path())),
            children: Vec::new(),
        }
    }

    fn file_count(&self) -> usize {
        if self.is_dir {
            self.children.iter().map(FileNode::file_count).sum()
        } else {
            1
        }
    }
}

/// Snapshot of a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    root: PathBuf,
    exists: bool,
    nodes: Vec<FileNode>,
}

fn folders_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn attach(open: &mut [FileNode], top: &mut Vec<FileNode>, node: FileNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

fn close(open: &mut Vec<FileNode>, top: &mut Vec<FileNode>) {
    if let Some(node) = open.pop() {
        attach(open, top, node);
    }
}

impl FileTree {
    /// Walk `root` and build the tree. A missing root yields an empty tree
    /// marked as not existing.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Ok(Self {
                root,
                exists: false,
                nodes: Vec::new(),
            });
        }

        let mut top = Vec::new();
        // open[i] is the folder currently being filled at depth i + 1
        let mut open: Vec<FileNode> = Vec::new();

        for entry in WalkDir::new(&root)
            .follow_links(false)
            .min_depth(1)
            .sort_by(folders_first)
        {
            let entry = entry?;
            while open.len() >= entry.depth() {
                close(&mut open, &mut top);
            }

            let node = FileNode::from_entry(&entry, &root);
            if node.is_dir {
                open.push(node);
            } else {
                attach(&mut open, &mut top, node);
            }
        }
        while !open.is_empty() {
            close(&mut open, &mut top);
        }

        Ok(Self {
            root,
            exists: true,
            nodes: top,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Top-level entries.
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    /// Number of files, folders excluded.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(FileNode::file_count).sum()
    }

    /// Find a node by its `/`-separated path relative to the root.
    pub fn find(&self, relative: &str) -> Option<&FileNode> {
        let mut nodes = &self.nodes;
        let mut found = None;
        for part in relative.split('/').filter(|part| !part.is_empty()) {
            let node = nodes.iter().find(|node| node.name == part)?;
            nodes = &node.children;
            found = Some(node);
        }
        found
    }

    /// Text rendering with box-drawing guides.
    pub fn render(&self) -> String {
        let label = self
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());

        if !self.exists {
            return format!("{} (does not exist)\n", label);
        }

        let mut out = format!("{}\n", label);
        render_nodes(&self.nodes, "", &mut out);
        out
    }
}

fn render_nodes(nodes: &[FileNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let suffix = if node.is_dir { "/" } else { "" };
        let _ = writeln!(out, "{}{}{}{}", prefix, branch, node.name, suffix);

        if node.is_dir {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            render_nodes(&node.children, &child_prefix, out);
        }
    }
}
