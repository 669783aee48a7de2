//! Folder tree structures for hierarchical display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use famvault_core::types::FolderId;

use super::kind::FolderKind;
use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Folder kind.
    pub kind: FolderKind,
    /// Materialized path.
    pub path: String,
    /// Child folder nodes, sorted by name.
    pub children: Vec<FolderNode>,
}

impl From<&Folder> for FolderNode {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
            kind: folder.kind,
            path: folder.path.clone(),
            children: Vec::new(),
        }
    }
}

/// A folder tree assembled from a flat folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree. A whole-family tree has one root;
    /// a subtree query may surface several top-level nodes.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }

    /// Assemble a tree from a flat set of folders.
    ///
    /// Folders whose parent is absent from the input become top-level
    /// nodes, which is what a subtree query expects.
    pub fn from_folders(mut folders: Vec<Folder>) -> Self {
        let total_folders = folders.len() as u64;
        // Deepest first, so every node's children are attached before the
        // node itself is attached to its parent.
        folders.sort_by(|a, b| b.depth().cmp(&a.depth()));

        let mut nodes: HashMap<FolderId, FolderNode> =
            folders.iter().map(|f| (f.id, FolderNode::from(f))).collect();

        let mut roots = Vec::new();
        for folder in &folders {
            let Some(node) = nodes.remove(&folder.id) else {
                continue;
            };
            match folder
                .parent_id
                .and_then(|pid| nodes.get_mut(&pid))
            {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }

        for root in &mut roots {
            sort_children(root);
        }
        roots.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            roots,
            total_folders,
        }
    }
}

fn sort_children(node: &mut FolderNode) {
    node.children.sort_by(|a, b| a.name.cmp(&b.name));
    for child in &mut node.children {
        sort_children(child);
    }
}
