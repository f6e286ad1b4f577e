//! Node types for the virtual filesystem tree.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Stable index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// What a node is. Closed: a node's kind never changes after creation, files
/// carry content and directories carry a name-to-id child map, never both.
#[derive(Debug, Clone)]
pub enum NodeKind {
    File { content: String },
    Directory { children: HashMap<String, NodeId> },
}

/// A single file or directory entity.
///
/// Fields are crate-private: the operation layer is the only code that touches
/// content, children, or timestamps directly.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) created: DateTime<Utc>,
    pub(crate) modified: DateTime<Utc>,
}

impl Node {
    /// Construct a directory with an empty child map.
    pub fn new_dir(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::Directory {
                children: HashMap::new(),
            },
            parent: None,
            created: now,
            modified: now,
        }
    }

    /// Construct a file with empty content.
    pub fn new_file(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::File {
                content: String::new(),
            },
            parent: None,
            created: now,
            modified: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// File content; `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}
