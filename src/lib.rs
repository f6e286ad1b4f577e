//! Ledgerfs: Event-Sourced Virtual Filesystem
//!
//! An in-process, hierarchical virtual filesystem. Durability comes not from
//! serializing the tree but from recording every mutation as an event that
//! can be replayed, in order, to rebuild the tree from scratch, either
//! locally or from a durable external queue.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod event;
pub mod exec;
pub mod logging;
pub mod shell;
pub mod tree;
pub mod vfs;
