//! Path resolution over the tree
//!
//! Paths are `/`-separated strings. A leading separator anchors resolution at
//! the root; anything else starts at the current working directory. Empty and
//! `.` segments are skipped, `..` climbs to the parent and is a no-op at root.

use crate::error::FsError;
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Resolve a path string to a node id.
    ///
    /// The empty path resolves to the current working directory. A segment
    /// that does not name a child of the node reached so far fails with
    /// [`FsError::NotFound`] carrying that segment; descending into a file
    /// with segments remaining fails the same way, since a file has no
    /// children to search.
    pub fn resolve(&self, path: &str) -> Result<NodeId, FsError> {
        if path.is_empty() {
            return Ok(self.cwd());
        }

        let (mut id, rest) = match path.strip_prefix('/') {
            Some(stripped) => (self.root(), stripped),
            None => (self.cwd(), path),
        };

        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if let Some(parent) = self.node(id).parent() {
                        id = parent;
                    }
                }
                name => {
                    id = self
                        .child_of(id, name)
                        .ok_or_else(|| FsError::NotFound(name.to_string()))?;
                }
            }
        }
        Ok(id)
    }

    /// Turn a path into its absolute string form.
    ///
    /// Already-absolute paths are returned unchanged; relative paths are
    /// prefixed with the working directory. Purely textual, no resolution.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with('/') {
            return path.to_string();
        }
        let cwd = self.working_dir();
        if cwd == "/" {
            format!("/{path}")
        } else {
            format!("{cwd}/{path}")
        }
    }

    /// Absolute path of the current working directory.
    ///
    /// Root is exactly `/`; deeper paths are `/`-joined segment names with no
    /// trailing separator.
    pub fn working_dir(&self) -> String {
        let mut parts = Vec::new();
        let mut id = self.cwd();
        while let Some(parent) = self.node(id).parent() {
            parts.push(self.node(id).name().to_string());
            id = parent;
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    /// Split a path into its parent directory and final segment name.
    ///
    /// Strips a single trailing separator, resolves everything before the
    /// last segment, and requires the result to be a directory.
    pub fn split_parent(&self, path: &str) -> Result<(NodeId, String), FsError> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let (parent_path, name) = match trimmed.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", trimmed),
        };
        let parent = self.resolve(parent_path)?;
        if !self.node(parent).is_dir() {
            return Err(FsError::NotADirectory(parent_path.to_string()));
        }
        Ok((parent, name.to_string()))
    }
}
