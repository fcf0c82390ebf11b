//! Forum-level use cases. Each one is a single repository call.

use domains::{Forum, ListParams, NewForum, NewThread, Result, Thread, User};
use tracing::{debug, info};

use crate::ForumService;

impl ForumService {
    pub async fn create_forum(&self, forum: &NewForum) -> Result<Forum> {
        let created = self.forums.create_forum(forum).await?;
        info!(slug = %created.slug, owner = %created.user, "forum created");
        Ok(created)
    }

    pub async fn create_forum_thread(&self, forum_slug: &str, thread: &NewThread) -> Result<Thread> {
        let created = self.forums.create_thread(forum_slug, thread).await?;
        info!(forum = %created.forum, thread_id = created.id, "thread created");
        Ok(created)
    }

    pub async fn get_forum_details(&self, slug: &str) -> Result<Forum> {
        debug!(slug, "fetching forum");
        self.forums.get_forum(slug).await
    }

    /// Threads of a forum. An empty page is a success; an unknown forum is not.
    pub async fn get_forum_threads(&self, slug: &str, params: &ListParams) -> Result<Vec<Thread>> {
        debug!(slug, ?params, "listing forum threads");
        self.forums.get_forum_threads(slug, params).await
    }

    /// Users who started a thread or wrote a post in the forum.
    pub async fn get_forum_users(&self, slug: &str, params: &ListParams) -> Result<Vec<User>> {
        debug!(slug, ?params, "listing forum users");
        self.forums.get_forum_users(slug, params).await
    }
}
