//! Virtual filesystem tree
//!
//! Arena-indexed tree of file and directory nodes. The arena owns every node;
//! parent links and child maps store [`NodeId`] indices, so upward traversal
//! needs no shared ownership. All mutation goes through the operation layer in
//! [`crate::vfs`]; this module only exposes structure and resolution.

pub mod node;
pub mod path;

pub use node::{Node, NodeId, NodeKind};

use crate::error::FsError;
use chrono::{DateTime, Utc};

/// The node arena plus the root and current-working-directory pointers.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    cwd: NodeId,
}

impl Tree {
    /// Create a tree holding a single root directory.
    ///
    /// The root has an empty name, no parent, and can never be removed.
    pub fn new(now: DateTime<Utc>) -> Self {
        let root = Node::new_dir("", now);
        Tree {
            nodes: vec![root],
            root: NodeId(0),
            cwd: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    pub(crate) fn set_cwd(&mut self, id: NodeId) {
        self.cwd = id;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look up a direct child of `parent` by name.
    ///
    /// Returns `None` for missing names and always for file nodes, which have
    /// no child map to search.
    pub fn child_of(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(parent).kind {
            NodeKind::Directory { children } => children.get(name).copied(),
            NodeKind::File { .. } => None,
        }
    }

    /// Number of direct children. Zero for files.
    pub fn child_count(&self, id: NodeId) -> usize {
        match &self.node(id).kind {
            NodeKind::Directory { children } => children.len(),
            NodeKind::File { .. } => 0,
        }
    }

    /// Iterate the child ids of a directory, unordered. Empty for files.
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            NodeKind::Directory { children } => children.values().copied().collect(),
            NodeKind::File { .. } => Vec::new(),
        }
    }

    /// Attach `node` as a child of `parent` and return its id.
    ///
    /// The caller has already checked for name collisions; `parent` must be a
    /// directory.
    pub(crate) fn insert(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, FsError> {
        node.parent = Some(parent);
        let name = node.name.clone();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match &mut self.nodes[parent.0].kind {
            NodeKind::Directory { children } => {
                children.insert(name, id);
                Ok(id)
            }
            NodeKind::File { .. } => Err(FsError::NotADirectory(
                self.nodes[parent.0].name.clone(),
            )),
        }
    }

    /// Detach a node from its parent's child map and return the parent id.
    ///
    /// The arena slot is abandoned; the node is no longer reachable from root.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let name = self.node(id).name.clone();
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.remove(&name);
        }
        self.nodes[id.0].parent = None;
        Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_tree_has_root_as_cwd() {
        let tree = Tree::new(Utc::now());
        assert_eq!(tree.root(), tree.cwd());
        assert!(tree.node(tree.root()).is_dir());
        assert!(tree.node(tree.root()).parent().is_none());
    }

    #[test]
    fn insert_links_child_both_ways() {
        let now = Utc::now();
        let mut tree = Tree::new(now);
        let id = tree.insert(tree.root(), Node::new_dir("a", now)).unwrap();
        assert_eq!(tree.child_of(tree.root(), "a"), Some(id));
        assert_eq!(tree.node(id).parent(), Some(tree.root()));
    }

    #[test]
    fn insert_under_file_fails() {
        let now = Utc::now();
        let mut tree = Tree::new(now);
        let file = tree.insert(tree.root(), Node::new_file("f", now)).unwrap();
        let err = tree.insert(file, Node::new_file("g", now)).unwrap_err();
        assert!(matches!(err, FsError::NotADirectory(_)));
    }

    #[test]
    fn detach_forgets_the_node() {
        let now = Utc::now();
        let mut tree = Tree::new(now);
        let id = tree.insert(tree.root(), Node::new_file("f", now)).unwrap();
        let parent = tree.detach(id).unwrap();
        assert_eq!(parent, tree.root());
        assert_eq!(tree.child_of(tree.root(), "f"), None);
        assert_eq!(tree.child_count(tree.root()), 0);
    }

    #[test]
    fn detach_root_is_a_no_op() {
        let mut tree = Tree::new(Utc::now());
        assert_eq!(tree.detach(tree.root()), None);
    }
}
