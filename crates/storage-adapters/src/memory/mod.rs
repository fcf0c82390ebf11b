//! In-memory forum store.

mod ordering;
mod repos;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use domains::{AppError, Forum, Post, Result, Thread, ThreadRef, User, VoteValue};
use tokio::sync::RwLock;

/// Every port of the forum over one in-process state.
///
/// Each port call takes the lock exactly once, which makes multi-step writes
/// atomic and every read a consistent snapshot.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A post together with its materialized path: ancestor ids, then its own.
#[derive(Debug, Clone)]
pub(crate) struct StoredPost {
    pub post: Post,
    pub path: Vec<i64>,
}

impl StoredPost {
    pub fn root(&self) -> i64 {
        self.path[0]
    }
}

/// Unique keys (slugs, nicknames, emails) compare case-insensitively.
pub(crate) fn key(raw: &str) -> String {
    raw.to_lowercase()
}

#[derive(Default)]
struct State {
    /// Keyed by lowercased nickname
    users: BTreeMap<String, User>,
    /// Keyed by lowercased slug
    forums: HashMap<String, Forum>,
    threads: BTreeMap<i64, Thread>,
    /// Lowercased thread slug to thread id
    thread_slugs: HashMap<String, i64>,
    posts: BTreeMap<i64, StoredPost>,
    votes: HashMap<(i64, String), VoteValue>,
    /// Lowercased forum slug to the lowercased nicknames active in it
    members: HashMap<String, BTreeSet<String>>,
    last_thread_id: i64,
    last_post_id: i64,
}

impl State {
    fn user(&self, nickname: &str) -> Result<&User> {
        self.users
            .get(&key(nickname))
            .ok_or_else(|| AppError::not_found("user", nickname))
    }

    fn forum(&self, slug: &str) -> Result<&Forum> {
        self.forums
            .get(&key(slug))
            .ok_or_else(|| AppError::not_found("forum", slug))
    }

    fn forum_mut(&mut self, slug: &str) -> Result<&mut Forum> {
        self.forums
            .get_mut(&key(slug))
            .ok_or_else(|| AppError::not_found("forum", slug))
    }

    fn thread_id(&self, thread: &ThreadRef) -> Result<i64> {
        let id = match thread {
            ThreadRef::Id(id) => self.threads.contains_key(id).then_some(*id),
            ThreadRef::Slug(slug) => self.thread_slugs.get(&key(slug)).copied(),
        };
        id.ok_or_else(|| AppError::not_found("thread", thread))
    }

    fn thread(&self, id: i64) -> Result<&Thread> {
        self.threads
            .get(&id)
            .ok_or_else(|| AppError::not_found("thread", id))
    }

    fn thread_mut(&mut self, id: i64) -> Result<&mut Thread> {
        self.threads
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("thread", id))
    }

    fn post(&self, id: i64) -> Result<&StoredPost> {
        self.posts
            .get(&id)
            .ok_or_else(|| AppError::not_found("post", id))
    }

    /// The `since` post of a page; an unknown id is a bad cursor.
    fn cursor(&self, since: Option<i64>) -> Result<Option<&StoredPost>> {
        since
            .map(|id| {
                self.posts
                    .get(&id)
                    .ok_or_else(|| AppError::invalid(format!("unknown post cursor: {id}")))
            })
            .transpose()
    }

    fn thread_posts(&self, thread_id: i64) -> Vec<&StoredPost> {
        self.posts
            .values()
            .filter(|stored| stored.post.thread == thread_id)
            .collect()
    }

    fn add_member(&mut self, forum_slug: &str, nickname: &str) {
        self.members
            .entry(key(forum_slug))
            .or_default()
            .insert(key(nickname));
    }

    /// Users already holding `nickname` or `email`.
    fn clashing_users(&self, nickname: Option<&str>, email: Option<&str>) -> Vec<User> {
        let nickname = nickname.map(key);
        let email = email.map(key);
        self.users
            .iter()
            .filter(|(nick, user)| {
                nickname.as_deref() == Some(nick.as_str()) || email.as_deref() == Some(key(&user.email).as_str())
            })
            .map(|(_, user)| user.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use domains::{
        ForumRepository, NewForum, NewPost, NewProfile, NewThread, PostPage, ServiceRepository,
        ThreadRepository, UserRepository, Vote,
    };
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for nickname in ["Ferris", "corro"] {
            let profile = NewProfile {
                fullname: nickname.to_string(),
                about: String::new(),
                email: format!("{nickname}@example.org"),
            };
            assert_ok!(store.create_user(nickname, &profile).await);
        }
        let forum = NewForum {
            slug: "Rust".into(),
            title: "Rust".into(),
            user: "ferris".into(),
        };
        assert_ok!(store.create_forum(&forum).await);
        let thread = NewThread {
            slug: Some("borrowck".into()),
            title: "Borrow checker".into(),
            author: "FERRIS".into(),
            message: "Why?".into(),
            created: None,
        };
        assert_ok!(store.create_thread("rust", &thread).await);
        store
    }

    fn reply(author: &str, parent: Option<i64>) -> NewPost {
        NewPost {
            parent,
            author: author.into(),
            message: "reply".into(),
        }
    }

    #[tokio::test]
    async fn keys_are_case_insensitive_but_casing_is_kept() {
        let store = seeded().await;
        let forum = assert_ok!(store.get_forum("RUST").await);
        assert_eq!(forum.slug, "Rust");
        assert_eq!(forum.user, "Ferris");

        let thread = assert_ok!(store.get_thread_by_slug("BorrowCK").await);
        assert_eq!(thread.author, "Ferris");
        assert_eq!(thread.forum, "Rust");
    }

    #[tokio::test]
    async fn batch_with_foreign_parent_inserts_nothing() {
        let store = seeded().await;
        let thread = ThreadRef::Id(1);
        let first = assert_ok!(store.create_posts(&thread, &[reply("ferris", None)]).await);

        let other = NewThread {
            slug: None,
            title: "Other".into(),
            author: "corro".into(),
            message: "elsewhere".into(),
            created: None,
        };
        let other = assert_ok!(store.create_thread("rust", &other).await);

        let batch = [reply("corro", None), reply("corro", Some(first[0].id))];
        let err = assert_err!(store.create_posts(&ThreadRef::Id(other.id), &batch).await);
        assert!(err.is_conflict());

        let status = assert_ok!(store.status().await);
        assert_eq!(status.post, 1);
        assert_eq!(assert_ok!(store.get_forum("rust").await).posts, 1);
    }

    #[tokio::test]
    async fn batch_with_unknown_author_inserts_nothing() {
        let store = seeded().await;
        let batch = [reply("ferris", None), reply("ghost", None)];
        let err = assert_err!(store.create_posts(&ThreadRef::Id(1), &batch).await);
        assert_eq!(err, AppError::not_found("user", "ghost"));
        assert_eq!(assert_ok!(store.status().await).post, 0);
    }

    #[tokio::test]
    async fn repeated_vote_replaces_the_previous_one() {
        let store = seeded().await;
        let thread = ThreadRef::Slug("borrowck".into());
        let up = Vote { nickname: "corro".into(), voice: domains::VoteValue::Up };
        let down = Vote { nickname: "corro".into(), voice: domains::VoteValue::Down };

        assert_eq!(assert_ok!(store.vote(&thread, &up).await).votes, 1);
        assert_eq!(assert_ok!(store.vote(&thread, &up).await).votes, 1);
        assert_eq!(assert_ok!(store.vote(&thread, &down).await).votes, -1);
    }

    #[tokio::test]
    async fn unknown_post_cursor_is_rejected() {
        let store = seeded().await;
        let page = PostPage::from_raw(10, 999, false);
        let err = assert_err!(store.get_posts_tree(&ThreadRef::Id(1), &page).await);
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn duplicate_user_conflict_lists_every_clash() {
        let store = seeded().await;
        let profile = NewProfile {
            fullname: "Copycat".into(),
            about: String::new(),
            email: "CORRO@example.org".into(),
        };
        match assert_err!(store.create_user("ferris", &profile).await) {
            AppError::Conflict { existing: Some(domains::ConflictingEntity::Users(users)), .. } => {
                let mut nicknames: Vec<_> = users.into_iter().map(|user| user.nickname).collect();
                nicknames.sort();
                assert_eq!(nicknames, vec!["Ferris", "corro"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn clear_resets_id_sequences() {
        let store = seeded().await;
        assert_ok!(store.clear().await);
        assert_eq!(assert_ok!(store.status().await), domains::Status::default());
        assert!(assert_err!(store.get_thread_by_id(1).await).is_not_found());
    }

    #[tokio::test]
    async fn empty_slugs_are_stored_as_none() {
        let store = seeded().await;
        let untitled = NewThread {
            slug: Some(String::new()),
            title: "Lifetimes".into(),
            author: "corro".into(),
            message: "Again?".into(),
            created: None,
        };
        let first = assert_ok!(store.create_thread("rust", &untitled).await);
        let second = assert_ok!(store.create_thread("rust", &untitled).await);
        assert_eq!(first.slug, None);
        assert_eq!(second.slug, None);
        assert_ne!(first.id, second.id);

        assert!(assert_err!(store.get_thread_by_slug("").await).is_not_found());
        assert_eq!(assert_ok!(store.get_forum("rust").await).threads, 3);
    }
}
