//! # storage-adapters
//!
//! Implementations of the `domains` repository ports.
//!
//! `MemoryStore` keeps the whole forum in process memory behind a single
//! lock. It backs the integration tests and the demo binary, and enforces
//! every guarantee the ports promise: batch inserts are all-or-nothing,
//! votes are upserts, and slugs and nicknames are unique regardless of case.

pub mod memory;

pub use memory::MemoryStore;
