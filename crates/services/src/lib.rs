//! # services
//!
//! Use-case orchestration for the forum: resolves thread tokens, dispatches
//! post listings by sort mode, assembles detailed post views and applies
//! conditional edits on top of the repository ports in `domains`.

mod forums;
mod maintenance;
mod posts;
mod service;
mod threads;
mod users;

#[cfg(test)]
mod test_support;

pub use service::{ForumService, Repositories, ServiceOptions};
