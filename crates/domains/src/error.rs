//! # AppError
//!
//! Centralized error handling for the forum.
//! Repositories raise these; the service hands them to its caller unchanged.

use thiserror::Error;

use crate::models::{Forum, Thread, User};

/// The record that already occupies a unique key, when the store knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictingEntity {
    Forum(Box<Forum>),
    Thread(Box<Thread>),
    /// Every user clashing by nickname or email
    Users(Vec<User>),
}

/// The primary error type for all forum operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Referenced entity does not exist (forum, thread, post, user)
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness or referential constraint would be violated
    #[error("conflict: {reason}")]
    Conflict {
        reason: String,
        existing: Option<ConflictingEntity>,
    },

    /// Malformed caller input (e.g. unparseable pagination cursor)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Infrastructure failure inside a storage adapter
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
            existing: None,
        }
    }

    /// Conflict that reports the record already holding the key.
    pub fn conflict_with(reason: impl Into<String>, existing: ConflictingEntity) -> Self {
        Self::Conflict {
            reason: reason.into(),
            existing: Some(existing),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// A specialized Result type for forum logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = AppError::not_found("thread", 42);
        assert_eq!(err.to_string(), "thread not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn conflict_with_keeps_existing_record() {
        let forum = Forum {
            slug: "rust".into(),
            title: "Rust".into(),
            user: "ferris".into(),
            posts: 0,
            threads: 0,
        };
        let err = AppError::conflict_with("forum slug taken", ConflictingEntity::Forum(Box::new(forum.clone())));
        match err {
            AppError::Conflict { existing: Some(ConflictingEntity::Forum(f)), .. } => assert_eq!(*f, forum),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
