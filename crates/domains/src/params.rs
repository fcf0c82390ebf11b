//! # Request Parameters
//!
//! Typed forms of the raw values a transport hands over: thread tokens,
//! sort modes, pagination and the `related` include list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A thread address: either its numeric id or its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadRef {
    Id(i64),
    Slug(String),
}

impl ThreadRef {
    /// Resolves an ambiguous caller token.
    ///
    /// A token that parses as an integer in full is always an id and is never
    /// reconsidered as a slug; everything else is a slug.
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(id) => ThreadRef::Id(id),
            Err(_) => ThreadRef::Slug(token.to_owned()),
        }
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadRef::Id(id) => write!(f, "{id}"),
            ThreadRef::Slug(slug) => f.write_str(slug),
        }
    }
}

/// How the posts of a thread are ordered when listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSortType {
    /// Creation order, ignoring the parent/child structure
    #[default]
    Flat,
    /// Pre-order traversal of the reply forest
    Tree,
    /// `limit` counts root posts, each expanded with its whole subtree
    ParentTree,
}

impl FromStr for PostSortType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "flat" => Ok(PostSortType::Flat),
            "tree" => Ok(PostSortType::Tree),
            "parent_tree" => Ok(PostSortType::ParentTree),
            other => Err(AppError::invalid(format!("unknown sort mode: {other}"))),
        }
    }
}

/// Pagination for forum listings (threads, users).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListParams {
    /// Opaque cursor: a timestamp for threads, a nickname for users
    pub since: Option<String>,
    pub limit: Option<u32>,
    pub desc: bool,
}

impl ListParams {
    /// Applies the wire conventions: empty `since` and `limit <= 0` mean "none".
    pub fn from_raw(since: &str, limit: i64, desc: bool) -> Self {
        Self {
            since: (!since.is_empty()).then(|| since.to_owned()),
            limit: normalize_limit(limit),
            desc,
        }
    }
}

/// Pagination for post listings within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostPage {
    /// Post id the page starts after; `None` starts at the beginning
    pub since: Option<i64>,
    pub limit: Option<u32>,
    pub desc: bool,
}

impl PostPage {
    /// Applies the wire conventions: `since == 0` and `limit <= 0` mean "none".
    pub fn from_raw(limit: i64, since: i64, desc: bool) -> Self {
        Self {
            since: (since != 0).then_some(since),
            limit: normalize_limit(limit),
            desc,
        }
    }
}

fn normalize_limit(limit: i64) -> Option<u32> {
    if limit <= 0 {
        None
    } else {
        Some(u32::try_from(limit).unwrap_or(u32::MAX))
    }
}

/// Which related records to attach to a post lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Related {
    pub user: bool,
    pub forum: bool,
    pub thread: bool,
}

impl FromStr for Related {
    type Err = AppError;

    /// Parses a comma-separated list such as `user,thread`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut related = Related::default();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            match item {
                "user" => related.user = true,
                "forum" => related.forum = true,
                "thread" => related.thread = true,
                other => return Err(AppError::invalid(format!("unknown related item: {other}"))),
            }
        }
        Ok(related)
    }
}
