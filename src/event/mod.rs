//! Filesystem events and their wire format
//!
//! Every committed mutation is recorded as an [`FsEvent`]. Replaying a
//! sequence of events in order against an empty tree reproduces the tree that
//! emitted them. On the wire an event is one JSON object:
//! `{"event_type": 0..3, "path": "...", "content": "...", "timestamp": RFC3339}`.

pub mod log;
pub mod transport;

pub use log::EventLog;
pub use transport::{EventTransport, MemoryTransport, RedisTransport, EVENTS_KEY};

use crate::error::LogError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of mutation kinds. Wire tags are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CreateFile,
    CreateDir,
    WriteFile,
    Delete,
}

impl EventKind {
    pub fn tag(self) -> u8 {
        match self {
            EventKind::CreateFile => 0,
            EventKind::CreateDir => 1,
            EventKind::WriteFile => 2,
            EventKind::Delete => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, LogError> {
        match tag {
            0 => Ok(EventKind::CreateFile),
            1 => Ok(EventKind::CreateDir),
            2 => Ok(EventKind::WriteFile),
            3 => Ok(EventKind::Delete),
            other => Err(LogError::UnknownEventType(other)),
        }
    }
}

/// A single recorded mutation.
///
/// `path` is the absolute path at recording time; `content` is only
/// meaningful for `WriteFile`. Events are never mutated once created.
#[derive(Debug, Clone, PartialEq)]
pub struct FsEvent {
    pub kind: EventKind,
    pub path: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl FsEvent {
    pub fn create_file(path: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        FsEvent {
            kind: EventKind::CreateFile,
            path: path.into(),
            content: String::new(),
            timestamp,
        }
    }

    pub fn create_dir(path: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        FsEvent {
            kind: EventKind::CreateDir,
            path: path.into(),
            content: String::new(),
            timestamp,
        }
    }

    pub fn write_file(
        path: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        FsEvent {
            kind: EventKind::WriteFile,
            path: path.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn delete(path: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        FsEvent {
            kind: EventKind::Delete,
            path: path.into(),
            content: String::new(),
            timestamp,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> Result<String, LogError> {
        let wire = WireEvent {
            event_type: self.kind.tag(),
            path: self.path.clone(),
            content: self.content.clone(),
            timestamp: self
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// Decode one wire entry.
    ///
    /// An out-of-range `event_type` tag is reported as
    /// [`LogError::UnknownEventType`], not as a generic parse failure.
    pub fn decode(payload: &str) -> Result<Self, LogError> {
        let wire: WireEvent = serde_json::from_str(payload)?;
        let kind = EventKind::from_tag(wire.event_type)?;
        let timestamp = DateTime::parse_from_rfc3339(&wire.timestamp)
            .map_err(|e| LogError::InvalidTimestamp(format!("{}: {e}", wire.timestamp)))?
            .with_timezone(&Utc);
        Ok(FsEvent {
            kind,
            path: wire.path,
            content: wire.content,
            timestamp,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireEvent {
    event_type: u8,
    path: String,
    #[serde(default)]
    content: String,
    timestamp: String,
}
