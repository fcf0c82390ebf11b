//! Port implementations for `MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    AppError, ConflictingEntity, Forum, ForumRepository, ListParams, NewForum, NewPost, NewProfile,
    NewThread, Post, PostPage, PostRepository, ProfileUpdate, Result, ServiceRepository, Status,
    Thread, ThreadRef, ThreadRepository, ThreadUpdate, User, UserRepository, Vote,
};
use tracing::{debug, trace};

use super::{key, ordering, MemoryStore, State, StoredPost};

#[async_trait]
impl ForumRepository for MemoryStore {
    async fn create_forum(&self, forum: &NewForum) -> Result<Forum> {
        let mut state = self.state.write().await;
        if let Ok(existing) = state.forum(&forum.slug) {
            return Err(AppError::conflict_with(
                format!("forum {} already exists", forum.slug),
                ConflictingEntity::Forum(Box::new(existing.clone())),
            ));
        }
        let owner = state.user(&forum.user)?.nickname.clone();

        let created = Forum {
            slug: forum.slug.clone(),
            title: forum.title.clone(),
            user: owner,
            posts: 0,
            threads: 0,
        };
        state.forums.insert(key(&created.slug), created.clone());
        debug!(slug = %created.slug, "forum stored");
        Ok(created)
    }

    async fn create_thread(&self, forum_slug: &str, thread: &NewThread) -> Result<Thread> {
        let mut state = self.state.write().await;
        let forum = state.forum(forum_slug)?.slug.clone();
        let author = state.user(&thread.author)?.nickname.clone();
        // An empty slug means the thread has none.
        let slug = thread.slug.clone().filter(|slug| !slug.is_empty());
        if let Some(slug) = &slug {
            if let Some(id) = state.thread_slugs.get(&key(slug)) {
                let existing = state.thread(*id)?.clone();
                return Err(AppError::conflict_with(
                    format!("thread {slug} already exists"),
                    ConflictingEntity::Thread(Box::new(existing)),
                ));
            }
        }

        state.last_thread_id += 1;
        let created = Thread {
            id: state.last_thread_id,
            slug,
            title: thread.title.clone(),
            author,
            forum,
            message: thread.message.clone(),
            votes: 0,
            created: thread.created.unwrap_or_else(Utc::now),
        };
        if let Some(slug) = &created.slug {
            state.thread_slugs.insert(key(slug), created.id);
        }
        state.threads.insert(created.id, created.clone());
        state.forum_mut(&created.forum)?.threads += 1;
        state.add_member(&created.forum, &created.author);
        debug!(thread_id = created.id, forum = %created.forum, "thread stored");
        Ok(created)
    }

    async fn get_forum(&self, slug: &str) -> Result<Forum> {
        let state = self.state.read().await;
        state.forum(slug).cloned()
    }

    async fn get_forum_threads(&self, slug: &str, params: &ListParams) -> Result<Vec<Thread>> {
        let state = self.state.read().await;
        let forum = key(&state.forum(slug)?.slug);
        let since = params.since.as_deref().map(parse_timestamp).transpose()?;

        let mut threads: Vec<&Thread> = state
            .threads
            .values()
            .filter(|thread| key(&thread.forum) == forum)
            .filter(|thread| match since {
                Some(since) if params.desc => thread.created <= since,
                Some(since) => thread.created >= since,
                None => true,
            })
            .collect();
        threads.sort_by_key(|thread| (thread.created, thread.id));
        if params.desc {
            threads.reverse();
        }

        let limit = params.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(threads.into_iter().take(limit).cloned().collect())
    }

    async fn get_forum_users(&self, slug: &str, params: &ListParams) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let forum = key(&state.forum(slug)?.slug);
        let since = params.since.as_deref().map(key);

        let mut members: Vec<&String> = state
            .members
            .get(&forum)
            .into_iter()
            .flatten()
            .filter(|nickname| match &since {
                Some(since) if params.desc => *nickname < since,
                Some(since) => *nickname > since,
                None => true,
            })
            .collect();
        if params.desc {
            members.reverse();
        }

        let limit = params.limit.map_or(usize::MAX, |limit| limit as usize);
        members
            .into_iter()
            .take(limit)
            .map(|nickname| state.user(nickname).cloned())
            .collect()
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| AppError::invalid(format!("bad timestamp cursor {raw:?}: {err}")))
}

#[async_trait]
impl ThreadRepository for MemoryStore {
    async fn create_posts(&self, thread: &ThreadRef, posts: &[NewPost]) -> Result<Vec<Post>> {
        let mut state = self.state.write().await;
        let thread_id = state.thread_id(thread)?;
        let forum = state.thread(thread_id)?.forum.clone();

        // Validate the whole batch before touching anything.
        let mut staged = Vec::with_capacity(posts.len());
        for new_post in posts {
            let author = state.user(&new_post.author)?.nickname.clone();
            let parent_path = match new_post.parent {
                None => Vec::new(),
                Some(parent) => match state.posts.get(&parent) {
                    Some(stored) if stored.post.thread == thread_id => stored.path.clone(),
                    _ => {
                        return Err(AppError::conflict(format!(
                            "parent post {parent} is not in thread {thread_id}"
                        )))
                    }
                },
            };
            staged.push((author, parent_path, new_post));
        }

        state.forum_mut(&forum)?.posts += staged.len() as i64;
        let created = Utc::now();
        let mut inserted = Vec::with_capacity(staged.len());
        for (author, mut path, new_post) in staged {
            state.last_post_id += 1;
            let id = state.last_post_id;
            path.push(id);
            let post = Post {
                id,
                parent: new_post.parent,
                author,
                message: new_post.message.clone(),
                is_edited: false,
                forum: forum.clone(),
                thread: thread_id,
                created,
            };
            state.add_member(&forum, &post.author);
            state.posts.insert(id, StoredPost { post: post.clone(), path });
            inserted.push(post);
        }
        debug!(thread_id, count = inserted.len(), "posts stored");
        Ok(inserted)
    }

    async fn get_thread_by_slug(&self, slug: &str) -> Result<Thread> {
        let state = self.state.read().await;
        let id = state.thread_id(&ThreadRef::Slug(slug.to_owned()))?;
        state.thread(id).cloned()
    }

    async fn get_thread_by_id(&self, id: i64) -> Result<Thread> {
        let state = self.state.read().await;
        state.thread(id).cloned()
    }

    async fn change_thread(&self, thread: &ThreadRef, update: &ThreadUpdate) -> Result<Thread> {
        let mut state = self.state.write().await;
        let id = state.thread_id(thread)?;
        let stored = state.thread_mut(id)?;
        if let Some(title) = &update.title {
            stored.title.clone_from(title);
        }
        if let Some(message) = &update.message {
            stored.message.clone_from(message);
        }
        Ok(stored.clone())
    }

    async fn get_posts_flat(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let id = state.thread_id(thread)?;
        let since = state.cursor(page.since)?;
        Ok(ordering::flat(state.thread_posts(id), since, page))
    }

    async fn get_posts_tree(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let id = state.thread_id(thread)?;
        let since = state.cursor(page.since)?;
        Ok(ordering::tree(state.thread_posts(id), since, page))
    }

    async fn get_posts_parent_tree(&self, thread: &ThreadRef, page: &PostPage) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let id = state.thread_id(thread)?;
        let since = state.cursor(page.since)?;
        Ok(ordering::parent_tree(state.thread_posts(id), since, page))
    }

    async fn vote(&self, thread: &ThreadRef, vote: &Vote) -> Result<Thread> {
        let mut state = self.state.write().await;
        let id = state.thread_id(thread)?;
        let voter = key(&state.user(&vote.nickname)?.nickname);

        let previous = state.votes.insert((id, voter), vote.voice);
        let delta = vote.voice.as_i64() - previous.map_or(0, |voice| voice.as_i64());
        let stored = state.thread_mut(id)?;
        stored.votes += delta;
        trace!(thread_id = id, delta, "vote recorded");
        Ok(stored.clone())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn get_post(&self, id: i64) -> Result<Post> {
        let state = self.state.read().await;
        state.post(id).map(|stored| stored.post.clone())
    }

    async fn get_post_author(&self, nickname: &str) -> Result<User> {
        let state = self.state.read().await;
        state.user(nickname).cloned()
    }

    async fn get_post_forum(&self, slug: &str) -> Result<Forum> {
        let state = self.state.read().await;
        state.forum(slug).cloned()
    }

    async fn get_post_thread(&self, id: i64) -> Result<Thread> {
        let state = self.state.read().await;
        state.thread(id).cloned()
    }

    async fn change_post(&self, post: &Post, message: &str) -> Result<Post> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| AppError::not_found("post", post.id))?;
        stored.post.message = message.to_owned();
        stored.post.is_edited = true;
        Ok(stored.post.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, nickname: &str, profile: &NewProfile) -> Result<User> {
        let mut state = self.state.write().await;
        let clashing = state.clashing_users(Some(nickname), Some(profile.email.as_str()));
        if !clashing.is_empty() {
            return Err(AppError::conflict_with(
                format!("nickname {nickname} or email {} is taken", profile.email),
                ConflictingEntity::Users(clashing),
            ));
        }

        let user = User {
            nickname: nickname.to_owned(),
            fullname: profile.fullname.clone(),
            about: profile.about.clone(),
            email: profile.email.clone(),
        };
        state.users.insert(key(nickname), user.clone());
        Ok(user)
    }

    async fn get_user(&self, nickname: &str) -> Result<User> {
        let state = self.state.read().await;
        state.user(nickname).cloned()
    }

    async fn update_user(&self, nickname: &str, update: &ProfileUpdate) -> Result<User> {
        let mut state = self.state.write().await;
        let current = state.user(nickname)?.clone();
        if let Some(email) = &update.email {
            let clashing: Vec<User> = state
                .clashing_users(None, Some(email.as_str()))
                .into_iter()
                .filter(|user| key(&user.nickname) != key(&current.nickname))
                .collect();
            if !clashing.is_empty() {
                return Err(AppError::conflict_with(
                    format!("email {email} is taken"),
                    ConflictingEntity::Users(clashing),
                ));
            }
        }

        let user = state
            .users
            .get_mut(&key(nickname))
            .ok_or_else(|| AppError::not_found("user", nickname))?;
        if let Some(fullname) = &update.fullname {
            user.fullname.clone_from(fullname);
        }
        if let Some(about) = &update.about {
            user.about.clone_from(about);
        }
        if let Some(email) = &update.email {
            user.email.clone_from(email);
        }
        Ok(user.clone())
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        *state = State::default();
        debug!("store cleared");
        Ok(())
    }

    async fn status(&self) -> Result<Status> {
        let state = self.state.read().await;
        Ok(Status {
            forum: state.forums.len() as i64,
            thread: state.threads.len() as i64,
            post: state.posts.len() as i64,
            user: state.users.len() as i64,
        })
    }
}
