//! The orchestration service and its injected ports.

use std::sync::Arc;

use chrono::TimeDelta;
use domains::{
    AppError, ForumRepository, PostRepository, Result, ServiceRepository, ThreadRepository, UserRepository,
};

/// The five capability sets the service is built over.
#[derive(Clone)]
pub struct Repositories {
    pub forums: Arc<dyn ForumRepository>,
    pub threads: Arc<dyn ThreadRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub service: Arc<dyn ServiceRepository>,
}

impl Repositories {
    /// Uses one store for every capability set.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ForumRepository
            + ThreadRepository
            + PostRepository
            + UserRepository
            + ServiceRepository
            + 'static,
    {
        Self {
            forums: store.clone(),
            threads: store.clone(),
            posts: store.clone(),
            users: store.clone(),
            service: store,
        }
    }
}

/// Behavior switches that are not part of any single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Subtracted from a thread's creation time when it is attached to a
    /// post lookup. Zero unless a client depends on the legacy offset.
    pub thread_time_shift: TimeDelta,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            thread_time_shift: TimeDelta::zero(),
        }
    }
}

impl ServiceOptions {
    /// Fails with `InvalidArgument` when `hours` is outside what a
    /// `TimeDelta` can hold.
    pub fn with_thread_time_shift_hours(hours: i64) -> Result<Self> {
        let thread_time_shift = TimeDelta::try_hours(hours)
            .ok_or_else(|| AppError::invalid(format!("thread time shift of {hours}h is out of range")))?;
        Ok(Self { thread_time_shift })
    }
}

/// Use-case layer of the forum.
///
/// Holds nothing but its port handles, so a single instance can serve any
/// number of concurrent callers. Every use case issues its repository calls
/// one after another and returns repository failures untouched.
#[derive(Clone)]
pub struct ForumService {
    pub(crate) forums: Arc<dyn ForumRepository>,
    pub(crate) threads: Arc<dyn ThreadRepository>,
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) service: Arc<dyn ServiceRepository>,
    pub(crate) options: ServiceOptions,
}

impl ForumService {
    pub fn with_options(repos: Repositories, options: ServiceOptions) -> Self {
        Self {
            forums: repos.forums,
            threads: repos.threads,
            posts: repos.posts,
            users: repos.users,
            service: repos.service,
            options,
        }
    }
}
