//! Append-only event log with replay and restore.

use crate::error::{FsError, LogError};
use crate::event::transport::{EventTransport, EVENTS_KEY};
use crate::event::{EventKind, FsEvent};
use crate::vfs::VirtualFs;
use tracing::{debug, info};

/// Ordered record of every committed mutation.
///
/// Insertion order equals the order operations were applied to the tree.
/// When a transport is configured, every appended event is also pushed to the
/// durable queue, after the in-memory append.
pub struct EventLog {
    events: Vec<FsEvent>,
    transport: Option<Box<dyn EventTransport>>,
    key: String,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events)
            .field("transport", &self.transport.as_ref().map(|_| "dyn EventTransport"))
            .field("key", &self.key)
            .finish()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// An empty log with no transport.
    pub fn new() -> Self {
        EventLog {
            events: Vec::new(),
            transport: None,
            key: EVENTS_KEY.to_string(),
        }
    }

    /// An empty log that publishes appends to `transport`.
    pub fn with_transport(transport: Box<dyn EventTransport>) -> Self {
        EventLog {
            events: Vec::new(),
            transport: Some(transport),
            key: EVENTS_KEY.to_string(),
        }
    }

    /// Use a queue key other than [`EVENTS_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn events(&self) -> &[FsEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append an event, then publish it to the transport if one is configured.
    ///
    /// A transport failure is returned to the caller, but the in-memory
    /// append stands: the mutation that produced this event has already
    /// committed, so durability here is best-effort, not transactional.
    pub fn append(&mut self, event: FsEvent) -> Result<(), LogError> {
        debug!(kind = ?event.kind, path = %event.path, "appending event");
        self.events.push(event.clone());

        let Some(transport) = &self.transport else {
            return Ok(());
        };
        let payload = event.encode()?;
        transport.push(&self.key, &payload)
    }

    /// Re-apply every stored event, in order, against `fs`.
    ///
    /// Dispatch is an exhaustive match over the event kinds. The first error
    /// stops replay; events already applied are not undone.
    pub fn replay(&self, fs: &mut VirtualFs) -> Result<(), FsError> {
        for event in &self.events {
            match event.kind {
                EventKind::CreateFile => fs.create_file(&event.path)?,
                EventKind::CreateDir => fs.mkdir(&event.path)?,
                EventKind::WriteFile => fs.write_file(&event.path, &event.content)?,
                EventKind::Delete => fs.remove(&event.path)?,
            }
        }
        Ok(())
    }

    /// Read the whole durable queue and return a log preloaded with its
    /// events, not yet replayed.
    pub fn restore(transport: Box<dyn EventTransport>) -> Result<Self, LogError> {
        Self::restore_with_key(transport, EVENTS_KEY)
    }

    pub fn restore_with_key(
        transport: Box<dyn EventTransport>,
        key: &str,
    ) -> Result<Self, LogError> {
        let payloads = transport.range_read(key, 0, -1)?;
        let mut events = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            events.push(FsEvent::decode(payload)?);
        }
        info!(event_count = events.len(), "restored event log");
        Ok(EventLog {
            events,
            transport: Some(transport),
            key: key.to_string(),
        })
    }
}
