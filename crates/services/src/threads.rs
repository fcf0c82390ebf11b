//! Thread-level use cases: lookup by slug-or-id, edits, votes and the
//! three post listing strategies.

use domains::{NewPost, Post, PostPage, PostSortType, Result, Thread, ThreadRef, ThreadUpdate, Vote};
use tracing::{debug, info};

use crate::ForumService;

impl ForumService {
    /// Creates every post in `posts` under one thread, or none of them.
    pub async fn create_thread_posts(&self, thread: &str, posts: &[NewPost]) -> Result<Vec<Post>> {
        let thread = ThreadRef::parse(thread);
        let created = self.threads.create_posts(&thread, posts).await?;
        debug!(%thread, count = created.len(), "posts created");
        Ok(created)
    }

    /// Looks a thread up by id when the token is numeric, by slug otherwise.
    /// A failed id lookup is final; the token is not retried as a slug.
    pub async fn get_thread(&self, thread: &str) -> Result<Thread> {
        match ThreadRef::parse(thread) {
            ThreadRef::Id(id) => self.threads.get_thread_by_id(id).await,
            ThreadRef::Slug(slug) => self.threads.get_thread_by_slug(&slug).await,
        }
    }

    /// Empty `title` or `message` leaves that field as it is.
    pub async fn change_thread(&self, thread: &str, title: &str, message: &str) -> Result<Thread> {
        let thread = ThreadRef::parse(thread);
        let update = ThreadUpdate::from_fields(title, message);
        let changed = self.threads.change_thread(&thread, &update).await?;
        info!(thread_id = changed.id, "thread changed");
        Ok(changed)
    }

    pub async fn get_thread_posts(
        &self,
        thread: &str,
        page: &PostPage,
        sort: PostSortType,
    ) -> Result<Vec<Post>> {
        let thread = ThreadRef::parse(thread);
        debug!(%thread, ?sort, ?page, "listing thread posts");
        match sort {
            PostSortType::Flat => self.threads.get_posts_flat(&thread, page).await,
            PostSortType::Tree => self.threads.get_posts_tree(&thread, page).await,
            PostSortType::ParentTree => self.threads.get_posts_parent_tree(&thread, page).await,
        }
    }

    /// Records the vote and returns the thread with its updated score.
    pub async fn vote_for_thread(&self, thread: &str, vote: &Vote) -> Result<Thread> {
        let thread = ThreadRef::parse(thread);
        let voted = self.threads.vote(&thread, vote).await?;
        debug!(thread_id = voted.id, voter = %vote.nickname, votes = voted.votes, "vote applied");
        Ok(voted)
    }
}
