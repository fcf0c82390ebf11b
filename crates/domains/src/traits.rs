//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to back the service.
//! Ports own every consistency guarantee: atomic batch inserts, vote upserts
//! and slug uniqueness all live behind them.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Forum, NewForum, NewPost, NewProfile, NewThread, Post, ProfileUpdate, Status, Thread,
    ThreadUpdate, User, Vote,
};
use crate::params::{ListParams, PostPage, ThreadRef};

/// Forum-scoped persistence: forums and the threads and users listed under them.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Fails with `Conflict` on a taken slug, `NotFound` for an unknown owner.
    async fn create_forum(&self, forum: &NewForum) -> Result<Forum>;
    async fn create_thread(&self, forum_slug: &str, thread: &NewThread) -> Result<Thread>;
    async fn get_forum(&self, slug: &str) -> Result<Forum>;
    async fn get_forum_threads(&self, slug: &str, params: &ListParams) -> Result<Vec<Thread>>;
    async fn get_forum_users(&self, slug: &str, params: &ListParams) -> Result<Vec<User>>;
}

/// Thread-scoped persistence: lookups, edits, votes and post listings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Inserts the whole batch or nothing.
    async fn create_posts(&self, thread: &ThreadRef, posts: &[NewPost]) -> Result<Vec<Post>>;
    async fn get_thread_by_slug(&self, slug: &str) -> Result<Thread>;
    async fn get_thread_by_id(&self, id: i64) -> Result<Thread>;
    async fn change_thread(&self, thread: &ThreadRef, update: &ThreadUpdate) -> Result<Thread>;

    async fn get_posts_flat(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>>;
    async fn get_posts_tree(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>>;
    async fn get_posts_parent_tree(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>>;

    /// Insert-or-update: one live vote per voter and thread.
    async fn vote(&self, thread: &ThreadRef, vote: &Vote) -> Result<Thread>;
}

/// Post-scoped persistence plus the lookups used to decorate a post.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn get_post(&self, id: i64) -> Result<Post>;
    async fn get_post_author(&self, nickname: &str) -> Result<User>;
    async fn get_post_forum(&self, slug: &str) -> Result<Forum>;
    async fn get_post_thread(&self, id: i64) -> Result<Thread>;
    /// Stores the new message and marks the post edited.
    async fn change_post(&self, post: &Post, message: &str) -> Result<Post>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, nickname: &str, profile: &NewProfile) -> Result<User>;
    async fn get_user(&self, nickname: &str) -> Result<User>;
    async fn update_user(&self, nickname: &str, update: &ProfileUpdate) -> Result<User>;
}

/// Service-wide maintenance.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Drops every forum, thread, post, vote and user.
    async fn clear(&self) -> Result<()>;
    async fn status(&self) -> Result<Status>;
}
