//! Operation layer and filesystem facade
//!
//! [`VirtualFs`] composes the tree, the event log, and the restoring flag.
//! Every mutating operation commits to the tree first and records exactly one
//! event afterwards (two for a write that implicitly creates its file);
//! recording is suppressed during replay so restored history is not
//! re-appended. The mutation path is single-writer: wrap the facade in a lock
//! if it must be shared across threads.

use crate::clock::{SharedClock, SystemClock};
use crate::error::FsError;
use crate::event::{EventLog, EventTransport, FsEvent};
use crate::tree::{Node, Tree};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Owned snapshot of one directory entry, as returned by
/// [`VirtualFs::list_dir`]. Order of entries is unspecified; sort by name if
/// determinism is needed.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// The virtual filesystem facade.
pub struct VirtualFs {
    tree: Tree,
    log: EventLog,
    restoring: bool,
    clock: SharedClock,
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFs {
    /// An empty filesystem with no transport, timestamped by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// An empty filesystem using the given clock.
    pub fn with_clock(clock: SharedClock) -> Self {
        let tree = Tree::new(clock.now());
        VirtualFs {
            tree,
            log: EventLog::new(),
            restoring: false,
            clock,
        }
    }

    /// Bootstrap from a durable queue: restore its events and replay them
    /// into a fresh tree.
    ///
    /// Restore or replay failures are logged and the filesystem starts empty
    /// instead; startup never fails here. On failure the transport is dropped
    /// and the session runs in-memory only, so new events are never appended
    /// after a history that could not be rebuilt.
    pub fn with_transport(transport: Box<dyn EventTransport>) -> Self {
        Self::with_transport_and_clock(transport, Arc::new(SystemClock))
    }

    /// Same as [`VirtualFs::with_transport`], restoring from and publishing
    /// to `key` instead of [`EVENTS_KEY`](crate::event::EVENTS_KEY).
    pub fn with_transport_key(transport: Box<dyn EventTransport>, key: &str) -> Self {
        Self::bootstrap(transport, key, Arc::new(SystemClock))
    }

    pub fn with_transport_and_clock(
        transport: Box<dyn EventTransport>,
        clock: SharedClock,
    ) -> Self {
        Self::bootstrap(transport, crate::event::EVENTS_KEY, clock)
    }

    fn bootstrap(transport: Box<dyn EventTransport>, key: &str, clock: SharedClock) -> Self {
        let mut fs = Self::with_clock(Arc::clone(&clock));

        let restored = match EventLog::restore_with_key(transport, key) {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, "failed to restore event log, starting empty");
                return fs;
            }
        };

        fs.restoring = true;
        let replayed = restored.replay(&mut fs);
        fs.restoring = false;

        match replayed {
            Ok(()) => {
                fs.log = restored;
                fs
            }
            Err(e) => {
                warn!(error = %e, "failed to replay events, starting empty");
                Self::with_clock(clock)
            }
        }
    }

    /// The event log recorded so far.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Whether a restore replay is currently in progress.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Absolute form of `path` relative to the working directory.
    pub fn absolute_path(&self, path: &str) -> String {
        self.tree.absolute(path)
    }

    /// Absolute path of the current working directory.
    pub fn working_dir(&self) -> String {
        self.tree.working_dir()
    }

    /// Create an empty directory at `path`.
    pub fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        let abs = self.tree.absolute(path);
        let (parent, name) = self.tree.split_parent(&abs)?;
        if self.tree.child_of(parent, &name).is_some() {
            return Err(FsError::AlreadyExists(name));
        }

        let now = self.clock.now();
        self.tree.insert(parent, Node::new_dir(&name, now))?;
        self.tree.node_mut(parent).modified = now;
        debug!(path = %abs, "created directory");

        self.record(FsEvent::create_dir(abs, now))
    }

    /// Create an empty file at `path`.
    pub fn create_file(&mut self, path: &str) -> Result<(), FsError> {
        let abs = self.tree.absolute(path);
        let (parent, name) = self.tree.split_parent(&abs)?;
        if self.tree.child_of(parent, &name).is_some() {
            return Err(FsError::AlreadyExists(name));
        }

        let now = self.clock.now();
        self.tree.insert(parent, Node::new_file(&name, now))?;
        self.tree.node_mut(parent).modified = now;
        debug!(path = %abs, "created file");

        self.record(FsEvent::create_file(abs, now))
    }

    /// Content of the file at `path`, verbatim. Pure read, no event.
    pub fn read_file(&self, path: &str) -> Result<String, FsError> {
        let id = self.tree.resolve(path)?;
        match self.tree.node(id).content() {
            Some(content) => Ok(content.to_string()),
            None => Err(FsError::IsADirectory(path.to_string())),
        }
    }

    /// Overwrite the content of the file at `path`, creating it first if it
    /// does not exist.
    ///
    /// On a fresh path this records two events: `CreateFile`, then
    /// `WriteFile` carrying the new content.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<(), FsError> {
        let abs = self.tree.absolute(path);

        let id = match self.tree.resolve(&abs) {
            Ok(id) => id,
            Err(_) => {
                self.create_file(&abs)?;
                self.tree.resolve(&abs)?
            }
        };
        if self.tree.node(id).is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }

        let now = self.clock.now();
        let node = self.tree.node_mut(id);
        if let crate::tree::NodeKind::File { content: stored } = &mut node.kind {
            *stored = content.to_string();
        }
        node.modified = now;
        debug!(path = %abs, bytes = content.len(), "wrote file");

        self.record(FsEvent::write_file(abs, content, now))
    }

    /// Remove the file or empty directory at `path`.
    ///
    /// The recorded `Delete` event always carries the absolute path, even
    /// when the caller passed a relative one, so replay does not depend on
    /// the working directory of the recording session.
    pub fn remove(&mut self, path: &str) -> Result<(), FsError> {
        let abs = self.tree.absolute(path);
        let id = self.tree.resolve(path)?;
        if id == self.tree.root() {
            return Err(FsError::RootRemovalForbidden);
        }
        if self.tree.node(id).is_dir() && self.tree.child_count(id) > 0 {
            return Err(FsError::DirectoryNotEmpty(path.to_string()));
        }

        let now = self.clock.now();
        if let Some(parent) = self.tree.detach(id) {
            self.tree.node_mut(parent).modified = now;
        }
        debug!(path = %abs, "removed node");

        self.record(FsEvent::delete(abs, now))
    }

    /// List the direct children of the directory at `path`. The empty path
    /// lists the working directory. Pure read, no event.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let id = self.tree.resolve(path)?;
        if !self.tree.node(id).is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let entries = self
            .tree
            .children_of(id)
            .into_iter()
            .map(|child| {
                let node = self.tree.node(child);
                DirEntry {
                    name: node.name().to_string(),
                    is_dir: node.is_dir(),
                    created: node.created(),
                    modified: node.modified(),
                }
            })
            .collect();
        Ok(entries)
    }

    /// Change the working directory to the directory at `path`.
    ///
    /// The working directory is session-local state; no event is recorded.
    pub fn change_dir(&mut self, path: &str) -> Result<(), FsError> {
        let id = self.tree.resolve(path)?;
        if !self.tree.node(id).is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        self.tree.set_cwd(id);
        Ok(())
    }

    fn record(&mut self, event: FsEvent) -> Result<(), FsError> {
        if self.restoring {
            return Ok(());
        }
        self.log.append(event).map_err(FsError::from)
    }
}
