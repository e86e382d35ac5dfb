//! quillnotes library
//!
//! The persistence core of the quillnotes application: an embedded SQLite
//! database mirrored into a durable byte snapshot after every mutating
//! operation, exposed through typed, asynchronous services. The UI layer
//! consumes the services and only ever receives plain data snapshots.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod services;
pub mod storage;
