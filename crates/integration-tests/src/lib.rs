//! Shared fixtures: a `ForumService` over a fresh `MemoryStore`, plus
//! builders for the inputs the tests keep repeating.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use domains::{NewForum, NewPost, NewProfile, NewThread, Post, Thread};
use services::{ForumService, Repositories, ServiceOptions};
use storage_adapters::MemoryStore;

pub const FORUM: &str = "rust";
pub const THREAD_SLUG: &str = "borrowck";

pub fn service() -> ForumService {
    service_with(ServiceOptions::default())
}

pub fn service_with(options: ServiceOptions) -> ForumService {
    ForumService::with_options(Repositories::from_store(Arc::new(MemoryStore::new())), options)
}

pub fn profile(nickname: &str) -> NewProfile {
    NewProfile {
        fullname: format!("{nickname} Crab"),
        about: String::new(),
        email: format!("{nickname}@example.org"),
    }
}

pub fn new_thread(slug: Option<&str>, author: &str, created: Option<DateTime<Utc>>) -> NewThread {
    NewThread {
        slug: slug.map(str::to_string),
        title: "Fighting the borrow checker".to_string(),
        author: author.to_string(),
        message: "Why?".to_string(),
        created,
    }
}

pub fn new_post(author: &str, parent: Option<i64>, message: &str) -> NewPost {
    NewPost {
        parent,
        author: author.to_string(),
        message: message.to_string(),
    }
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

pub fn ids(posts: &[Post]) -> Vec<i64> {
    posts.iter().map(|post| post.id).collect()
}

/// Users `ferris` and `corro`, forum `rust` owned by ferris, and thread
/// `borrowck` started by corro.
pub async fn seeded() -> (ForumService, Thread) {
    seeded_with(ServiceOptions::default()).await
}

pub async fn seeded_with(options: ServiceOptions) -> (ForumService, Thread) {
    let service = service_with(options);
    for nickname in ["ferris", "corro"] {
        service.create_user(nickname, &profile(nickname)).await.unwrap();
    }
    let forum = NewForum {
        slug: FORUM.to_string(),
        title: "Rust".to_string(),
        user: "ferris".to_string(),
    };
    service.create_forum(&forum).await.unwrap();
    let thread = service
        .create_forum_thread(FORUM, &new_thread(Some(THREAD_SLUG), "corro", Some(at(9))))
        .await
        .unwrap();
    (service, thread)
}
