//! # Domain Models
//!
//! These structs represent the core entities of the forum.
//! Threads and posts carry system-assigned numeric ids; forums and users
//! are addressed by their human-chosen slug or nickname.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A registered forum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-insensitive handle
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    /// Unique, case-insensitive
    pub email: String,
}

/// Profile fields supplied when registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProfile {
    pub fullname: String,
    pub about: String,
    pub email: String,
}

/// Partial profile update. `None` leaves the field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.about.is_none() && self.email.is_none()
    }
}

/// A top-level discussion area (e.g., "rust-lang").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    /// The human-chosen identifier, immutable once created
    pub slug: String,
    pub title: String,
    /// Nickname of the owning user
    pub user: String,
    pub posts: i64,
    pub threads: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForum {
    pub slug: String,
    pub title: String,
    pub user: String,
}

/// A Thread contains a forest of Posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    pub author: String,
    /// Slug of the owning forum
    pub forum: String,
    pub message: String,
    /// Sum of all live votes
    pub votes: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewThread {
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    pub author: String,
    pub message: String,
    /// Defaults to the time of insertion
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Partial thread update. `None` leaves the field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
}

impl ThreadUpdate {
    /// Builds an update from raw caller strings, where empty means "unchanged".
    pub fn from_fields(title: &str, message: &str) -> Self {
        let keep = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        Self {
            title: keep(title),
            message: keep(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.message.is_none()
    }
}

/// The fundamental unit of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// `None` for a top-level post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    pub author: String,
    pub message: String,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
}

/// A post as proposed by the caller, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent: Option<i64>,
    pub author: String,
    pub message: String,
}

/// The only two values a vote may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_i64(self) -> i64 {
        i64::from(i32::from(self))
    }
}

impl From<VoteValue> for i32 {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i32> for VoteValue {
    type Error = AppError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(AppError::invalid(format!("vote voice must be 1 or -1, got {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: VoteValue,
}

/// A post together with whichever related records the caller asked for.
///
/// A `None` field means "not requested", never "not found": a missing related
/// record fails the whole lookup instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedInfo {
    pub post: Post,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

impl DetailedInfo {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            author: None,
            forum: None,
            thread: None,
        }
    }
}

/// Service-wide aggregate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
    pub user: i64,
}
