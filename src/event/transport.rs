//! Durable queue transports for the event log
//!
//! The log treats the transport as an opaque ordered list: `push` appends one
//! serialized event at the tail, `range_read` returns a contiguous range in
//! append order. Calls are synchronous and may block on I/O.

use crate::error::LogError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Queue key the event log appends to and restores from.
pub const EVENTS_KEY: &str = "vfs:events";

/// The durable queue contract.
pub trait EventTransport: Send {
    /// Append one serialized event to the tail of the list at `key`.
    fn push(&self, key: &str, payload: &str) -> Result<(), LogError>;

    /// Read entries `start..=stop` of the list at `key` in append order.
    /// Negative indices count from the tail, `-1` meaning the last entry.
    fn range_read(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, LogError>;
}

/// Redis-backed transport: `RPUSH` on append, `LRANGE` on restore.
pub struct RedisTransport {
    conn: Mutex<redis::Connection>,
}

impl RedisTransport {
    /// Connect to the Redis server at `addr` (`host:port`, port defaulting to
    /// 6379) with an optional password.
    pub fn connect(addr: &str, password: Option<&str>, db: i64) -> Result<Self, LogError> {
        let (host, port) = match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| LogError::Transport(format!("invalid port in address: {addr}")))?;
                (host.to_string(), port)
            }
            None => (addr.to_string(), 6379),
        };

        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(host, port),
            redis: redis::RedisConnectionInfo {
                db,
                username: None,
                password: password.map(str::to_string),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info)?;
        let conn = client.get_connection()?;
        Ok(RedisTransport {
            conn: Mutex::new(conn),
        })
    }
}

impl EventTransport for RedisTransport {
    fn push(&self, key: &str, payload: &str) -> Result<(), LogError> {
        let mut conn = self.conn.lock();
        redis::cmd("RPUSH")
            .arg(key)
            .arg(payload)
            .query::<()>(&mut conn)?;
        Ok(())
    }

    fn range_read(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, LogError> {
        let mut conn = self.conn.lock();
        let entries: Vec<String> = redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query(&mut conn)?;
        Ok(entries)
    }
}

/// In-process transport backed by a shared `Vec`.
///
/// Clones share the same underlying list, so a handle kept by a test observes
/// everything the log pushed.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every pushed payload, in append order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl EventTransport for MemoryTransport {
    fn push(&self, _key: &str, payload: &str) -> Result<(), LogError> {
        self.entries.lock().push(payload.to_string());
        Ok(())
    }

    fn range_read(&self, _key: &str, start: isize, stop: isize) -> Result<Vec<String>, LogError> {
        let entries = self.entries.lock();
        let len = entries.len() as isize;
        let clamp = |i: isize| -> usize {
            let i = if i < 0 { len + i } else { i };
            i.clamp(0, len) as usize
        };
        let start = clamp(start);
        let stop = clamp(stop);
        if start >= entries.len() || stop < start {
            return Ok(Vec::new());
        }
        Ok(entries[start..=stop.min(entries.len() - 1)].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_transport_preserves_append_order() {
        let transport = MemoryTransport::new();
        transport.push(EVENTS_KEY, "a").unwrap();
        transport.push(EVENTS_KEY, "b").unwrap();
        transport.push(EVENTS_KEY, "c").unwrap();
        assert_eq!(
            transport.range_read(EVENTS_KEY, 0, -1).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn memory_transport_range_read_on_empty_list() {
        let transport = MemoryTransport::new();
        assert!(transport.range_read(EVENTS_KEY, 0, -1).unwrap().is_empty());
    }

    #[test]
    fn memory_transport_clones_share_the_list() {
        let transport = MemoryTransport::new();
        let observer = transport.clone();
        transport.push(EVENTS_KEY, "x").unwrap();
        assert_eq!(observer.entries(), vec!["x"]);
    }

    #[test]
    fn memory_transport_sub_ranges() {
        let transport = MemoryTransport::new();
        for payload in ["a", "b", "c", "d"] {
            transport.push(EVENTS_KEY, payload).unwrap();
        }
        assert_eq!(
            transport.range_read(EVENTS_KEY, 1, 2).unwrap(),
            vec!["b", "c"]
        );
        assert_eq!(
            transport.range_read(EVENTS_KEY, -2, -1).unwrap(),
            vec!["c", "d"]
        );
    }
}
