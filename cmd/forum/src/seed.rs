//! Demo data: one forum, one thread, a small reply tree and a vote.

use domains::{NewForum, NewPost, NewProfile, NewThread, PostPage, PostSortType, Related, Vote, VoteValue};
use services::ForumService;
use tracing::info;

const MEMBERS: [(&str, &str); 3] = [
    ("ferris", "Ferris the Crab"),
    ("corro", "Corro the Unsafe Rusturchin"),
    ("bors", "Bors the Merge Bot"),
];

pub async fn run(service: &ForumService) -> anyhow::Result<()> {
    for (nickname, fullname) in MEMBERS {
        let profile = NewProfile {
            fullname: fullname.to_string(),
            about: String::new(),
            email: format!("{nickname}@forum.example"),
        };
        service.create_user(nickname, &profile).await?;
    }

    let forum = NewForum {
        slug: "rust".to_string(),
        title: "The Rust Programming Language".to_string(),
        user: "ferris".to_string(),
    };
    service.create_forum(&forum).await?;

    let thread = NewThread {
        slug: Some("borrowck".to_string()),
        title: "Fighting the borrow checker".to_string(),
        author: "corro".to_string(),
        message: "Why can't I hold two mutable references?".to_string(),
        created: None,
    };
    let thread = service.create_forum_thread("rust", &thread).await?;

    let roots = service
        .create_thread_posts(
            "borrowck",
            &[
                post(None, "ferris", "Aliasing XOR mutability."),
                post(None, "bors", "Have you tried RefCell?"),
            ],
        )
        .await?;
    let token = thread.id.to_string();
    service
        .create_thread_posts(&token, &[post(Some(roots[0].id), "corro", "Oh. That makes sense.")])
        .await?;

    let vote = Vote {
        nickname: "ferris".to_string(),
        voice: VoteValue::Up,
    };
    let voted = service.vote_for_thread("borrowck", &vote).await?;
    info!(thread_id = voted.id, votes = voted.votes, "demo thread voted");

    let page = PostPage::default();
    for sort in [PostSortType::Flat, PostSortType::Tree, PostSortType::ParentTree] {
        let posts = service.get_thread_posts(&token, &page, sort).await?;
        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        info!(?sort, ?ids, "demo thread posts");
    }

    let related = Related { user: true, forum: true, thread: true };
    let details = service.get_post_info(roots[0].id, related).await?;
    info!(
        post_id = details.post.id,
        author = ?details.author.map(|user| user.fullname),
        "demo post details"
    );
    Ok(())
}

fn post(parent: Option<i64>, author: &str, message: &str) -> NewPost {
    NewPost {
        parent,
        author: author.to_string(),
        message: message.to_string(),
    }
}
