//! Post-level use cases: the detailed post view and conditional edits.

use domains::{AppError, DetailedInfo, Post, Related, Result};
use tracing::{debug, info};

use crate::ForumService;

impl ForumService {
    /// Fetches a post and, in order, each related record the caller asked for.
    ///
    /// Lookup keys come from the post itself, so the calls run one after
    /// another. Any failure aborts the whole view; records that were not
    /// requested are never fetched.
    pub async fn get_post_info(&self, id: i64, related: Related) -> Result<DetailedInfo> {
        let post = self.posts.get_post(id).await?;
        debug!(post_id = id, ?related, "assembling post details");

        let author = if related.user {
            Some(self.posts.get_post_author(&post.author).await?)
        } else {
            None
        };
        let forum = if related.forum {
            Some(self.posts.get_post_forum(&post.forum).await?)
        } else {
            None
        };
        let thread = if related.thread {
            let mut thread = self.posts.get_post_thread(post.thread).await?;
            thread.created = thread
                .created
                .checked_sub_signed(self.options.thread_time_shift)
                .ok_or_else(|| {
                    AppError::Internal(format!("shifted creation time of thread {} is out of range", thread.id))
                })?;
            Some(thread)
        } else {
            None
        };

        Ok(DetailedInfo {
            post,
            author,
            forum,
            thread,
        })
    }

    /// Replaces the message only when it is non-empty and actually differs.
    /// Otherwise the post comes back untouched and nothing is written.
    pub async fn change_post(&self, id: i64, message: &str) -> Result<Post> {
        let post = self.posts.get_post(id).await?;
        if message.is_empty() || message == post.message {
            debug!(post_id = id, "post message unchanged");
            return Ok(post);
        }

        let changed = self.posts.change_post(&post, message).await?;
        info!(post_id = id, "post edited");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::test_support::{created_at, forum, post, thread, user, Mocks};
    use crate::ServiceOptions;

    /// Sets up every lookup with a call count of one if requested, zero if not.
    fn expect_lookups(mocks: &mut Mocks, related: Related) {
        mocks
            .posts
            .expect_get_post()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|id| Ok(post(id, None, "hello")));
        mocks
            .posts
            .expect_get_post_author()
            .withf(|nickname| nickname == "ferris")
            .times(usize::from(related.user))
            .returning(|nickname| Ok(user(nickname)));
        mocks
            .posts
            .expect_get_post_forum()
            .withf(|slug| slug == "rust")
            .times(usize::from(related.forum))
            .returning(|slug| Ok(forum(slug)));
        mocks
            .posts
            .expect_get_post_thread()
            .withf(|id| *id == 7)
            .times(usize::from(related.thread))
            .returning(|id| Ok(thread(id, None)));
    }

    #[tokio::test]
    async fn every_flag_combination_fetches_exactly_what_was_requested() {
        for mask in 0u8..8 {
            let related = Related {
                user: mask & 1 != 0,
                forum: mask & 2 != 0,
                thread: mask & 4 != 0,
            };
            let mut mocks = Mocks::new();
            expect_lookups(&mut mocks, related);

            let info = assert_ok!(mocks.into_service().get_post_info(1, related).await);
            assert_eq!(info.post.id, 1);
            assert_eq!(info.author.is_some(), related.user, "mask {mask}");
            assert_eq!(info.forum.is_some(), related.forum, "mask {mask}");
            assert_eq!(info.thread.is_some(), related.thread, "mask {mask}");
        }
    }

    #[tokio::test]
    async fn missing_post_aborts_before_any_related_lookup() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_get_post()
            .times(1)
            .returning(|id| Err(AppError::not_found("post", id)));
        mocks.posts.expect_get_post_author().never();
        mocks.posts.expect_get_post_forum().never();
        mocks.posts.expect_get_post_thread().never();

        let related = Related { user: true, forum: true, thread: true };
        let err = assert_err!(mocks.into_service().get_post_info(1, related).await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failed_related_lookup_aborts_the_view() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_get_post()
            .returning(|id| Ok(post(id, None, "hello")));
        mocks
            .posts
            .expect_get_post_author()
            .times(1)
            .returning(|nickname| Err(AppError::not_found("user", nickname)));
        mocks.posts.expect_get_post_forum().never();
        mocks.posts.expect_get_post_thread().never();

        let related = Related { user: true, forum: true, thread: true };
        let err = assert_err!(mocks.into_service().get_post_info(1, related).await);
        assert_eq!(err, AppError::not_found("user", "ferris"));
    }

    #[tokio::test]
    async fn failed_forum_lookup_skips_the_thread() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_get_post()
            .returning(|id| Ok(post(id, None, "hello")));
        mocks
            .posts
            .expect_get_post_author()
            .times(1)
            .returning(|nickname| Ok(user(nickname)));
        mocks
            .posts
            .expect_get_post_forum()
            .times(1)
            .returning(|slug| Err(AppError::not_found("forum", slug)));
        mocks.posts.expect_get_post_thread().never();

        let related = Related { user: true, forum: true, thread: true };
        let err = assert_err!(mocks.into_service().get_post_info(1, related).await);
        assert_eq!(err, AppError::not_found("forum", "rust"));
    }

    #[tokio::test]
    async fn failed_thread_lookup_drops_the_whole_view() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_get_post()
            .returning(|id| Ok(post(id, None, "hello")));
        mocks
            .posts
            .expect_get_post_author()
            .times(1)
            .returning(|nickname| Ok(user(nickname)));
        mocks
            .posts
            .expect_get_post_forum()
            .times(1)
            .returning(|slug| Ok(forum(slug)));
        mocks
            .posts
            .expect_get_post_thread()
            .times(1)
            .returning(|_| Err(AppError::Internal("connection reset".into())));

        let related = Related { user: true, forum: true, thread: true };
        let err = assert_err!(mocks.into_service().get_post_info(1, related).await);
        assert_eq!(err, AppError::Internal("connection reset".into()));
    }

    #[tokio::test]
    async fn thread_time_is_untouched_by_default() {
        let mut mocks = Mocks::new();
        expect_lookups(&mut mocks, Related { thread: true, ..Related::default() });

        let related = Related { thread: true, ..Related::default() };
        let info = assert_ok!(mocks.into_service().get_post_info(1, related).await);
        assert_eq!(info.thread.map(|t| t.created), Some(created_at()));
    }

    #[tokio::test]
    async fn configured_shift_moves_thread_time_back() {
        let mut mocks = Mocks::new();
        let related = Related { thread: true, ..Related::default() };
        expect_lookups(&mut mocks, related);

        let service = mocks.into_service_with(ServiceOptions::with_thread_time_shift_hours(3).unwrap());
        let info = assert_ok!(service.get_post_info(1, related).await);
        assert_eq!(info.thread.map(|t| t.created), Some(created_at() - TimeDelta::hours(3)));
    }

    #[tokio::test]
    async fn shift_past_the_calendar_is_an_internal_error() {
        let mut mocks = Mocks::new();
        let related = Related { thread: true, ..Related::default() };
        expect_lookups(&mut mocks, related);

        let options = ServiceOptions::with_thread_time_shift_hours(10_000_000_000).unwrap();
        let err = assert_err!(mocks.into_service_with(options).get_post_info(1, related).await);
        assert!(matches!(err, AppError::Internal(_)), "unexpected error: {err:?}");
    }

    fn expect_existing_post(mocks: &mut Mocks, message: &'static str) {
        mocks
            .posts
            .expect_get_post()
            .times(1)
            .returning(move |id| Ok(post(id, None, message)));
    }

    #[tokio::test]
    async fn empty_message_leaves_post_alone() {
        let mut mocks = Mocks::new();
        expect_existing_post(&mut mocks, "A");
        mocks.posts.expect_change_post().never();

        let unchanged = assert_ok!(mocks.into_service().change_post(1, "").await);
        assert_eq!(unchanged.message, "A");
        assert!(!unchanged.is_edited);
    }

    #[tokio::test]
    async fn identical_message_does_not_write() {
        let mut mocks = Mocks::new();
        expect_existing_post(&mut mocks, "A");
        mocks.posts.expect_change_post().never();

        let unchanged = assert_ok!(mocks.into_service().change_post(1, "A").await);
        assert_eq!(unchanged.message, "A");
        assert!(!unchanged.is_edited);
    }

    #[tokio::test]
    async fn different_message_is_written_once() {
        let mut mocks = Mocks::new();
        expect_existing_post(&mut mocks, "A");
        mocks
            .posts
            .expect_change_post()
            .withf(|post, message| post.message == "A" && message == "B")
            .times(1)
            .returning(|post, message| {
                let mut edited = post.clone();
                edited.message = message.to_string();
                edited.is_edited = true;
                Ok(edited)
            });

        let edited = assert_ok!(mocks.into_service().change_post(1, "B").await);
        assert_eq!(edited.message, "B");
        assert!(edited.is_edited);
    }

    #[tokio::test]
    async fn missing_post_cannot_be_changed() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_get_post()
            .returning(|id| Err(AppError::not_found("post", id)));
        mocks.posts.expect_change_post().never();

        let err = assert_err!(mocks.into_service().change_post(404, "B").await);
        assert!(err.is_not_found());
    }
}
