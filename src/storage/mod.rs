//! Storage module
//!
//! Provides the durable slot holding the database snapshot.

pub mod slot;

pub use slot::SnapshotSlot;
