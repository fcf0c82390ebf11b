//! Mock wiring and fixtures shared by the service unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use domains::{
    Forum, MockForumRepository, MockPostRepository, MockServiceRepository, MockThreadRepository,
    MockUserRepository, Post, Thread, User,
};

use crate::{ForumService, Repositories, ServiceOptions};

/// One mock per port. Set expectations, then turn it into a service.
pub struct Mocks {
    pub forums: MockForumRepository,
    pub threads: MockThreadRepository,
    pub posts: MockPostRepository,
    pub users: MockUserRepository,
    pub service: MockServiceRepository,
}

impl Mocks {
    pub fn new() -> Self {
        Self {
            forums: MockForumRepository::new(),
            threads: MockThreadRepository::new(),
            posts: MockPostRepository::new(),
            users: MockUserRepository::new(),
            service: MockServiceRepository::new(),
        }
    }

    pub fn into_service(self) -> ForumService {
        self.into_service_with(ServiceOptions::default())
    }

    pub fn into_service_with(self, options: ServiceOptions) -> ForumService {
        let repos = Repositories {
            forums: Arc::new(self.forums),
            threads: Arc::new(self.threads),
            posts: Arc::new(self.posts),
            users: Arc::new(self.users),
            service: Arc::new(self.service),
        };
        ForumService::with_options(repos, options)
    }
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn user(nickname: &str) -> User {
    User {
        nickname: nickname.to_string(),
        fullname: "Ferris Crab".to_string(),
        about: "lives in a shell".to_string(),
        email: format!("{nickname}@example.org"),
    }
}

pub fn forum(slug: &str) -> Forum {
    Forum {
        slug: slug.to_string(),
        title: "Rust".to_string(),
        user: "ferris".to_string(),
        posts: 3,
        threads: 1,
    }
}

pub fn thread(id: i64, slug: Option<&str>) -> Thread {
    Thread {
        id,
        slug: slug.map(str::to_string),
        title: "Borrow checker".to_string(),
        author: "ferris".to_string(),
        forum: "rust".to_string(),
        message: "Why does it hate me?".to_string(),
        votes: 0,
        created: created_at(),
    }
}

pub fn post(id: i64, parent: Option<i64>, message: &str) -> Post {
    Post {
        id,
        parent,
        author: "ferris".to_string(),
        message: message.to_string(),
        is_edited: false,
        forum: "rust".to_string(),
        thread: 7,
        created: created_at(),
    }
}
