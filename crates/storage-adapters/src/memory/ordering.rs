//! Post orderings for thread listings.
//!
//! All three take the posts of one thread in any order plus the resolved
//! `since` post, and return one page. The cursor is exclusive and applies in
//! the direction of travel.

use std::collections::HashMap;

use domains::{Post, PostPage};

use super::StoredPost;

/// Creation order, ties broken by id.
pub(crate) fn flat(posts: Vec<&StoredPost>, since: Option<&StoredPost>, page: &PostPage) -> Vec<Post> {
    let order = |stored: &StoredPost| (stored.post.created, stored.post.id);
    paginate(posts, since, page, order)
}

/// Pre-order traversal of the reply forest. Descending is the exact reverse.
pub(crate) fn tree(posts: Vec<&StoredPost>, since: Option<&StoredPost>, page: &PostPage) -> Vec<Post> {
    let order = |stored: &StoredPost| stored.path.clone();
    paginate(posts, since, page, order)
}

/// `limit` root posts, each followed by its whole subtree in pre-order.
///
/// Roots are ordered by id in the requested direction; a subtree always reads
/// top-down. The cursor skips every root up to and including the cursor's own.
pub(crate) fn parent_tree(posts: Vec<&StoredPost>, since: Option<&StoredPost>, page: &PostPage) -> Vec<Post> {
    let mut roots: Vec<i64> = posts
        .iter()
        .filter(|stored| stored.post.parent.is_none())
        .map(|stored| stored.post.id)
        .filter(|root| match since.map(StoredPost::root) {
            Some(bound) if page.desc => *root < bound,
            Some(bound) => *root > bound,
            None => true,
        })
        .collect();
    roots.sort_unstable();
    if page.desc {
        roots.reverse();
    }
    if let Some(limit) = page.limit {
        roots.truncate(limit as usize);
    }

    let rank: HashMap<i64, usize> = roots.iter().enumerate().map(|(rank, root)| (*root, rank)).collect();
    let mut selected: Vec<&StoredPost> = posts
        .into_iter()
        .filter(|stored| rank.contains_key(&stored.root()))
        .collect();
    selected.sort_by(|a, b| {
        rank[&a.root()]
            .cmp(&rank[&b.root()])
            .then_with(|| a.path.cmp(&b.path))
    });
    selected.into_iter().map(|stored| stored.post.clone()).collect()
}

fn paginate<K, F>(posts: Vec<&StoredPost>, since: Option<&StoredPost>, page: &PostPage, order: F) -> Vec<Post>
where
    K: Ord,
    F: Fn(&StoredPost) -> K,
{
    let bound = since.map(&order);
    let mut keyed: Vec<(K, &StoredPost)> = posts
        .into_iter()
        .map(|stored| (order(stored), stored))
        .filter(|(k, _)| match &bound {
            Some(bound) if page.desc => k < bound,
            Some(bound) => k > bound,
            None => true,
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    if page.desc {
        keyed.reverse();
    }

    let limit = page.limit.map_or(usize::MAX, |limit| limit as usize);
    keyed
        .into_iter()
        .take(limit)
        .map(|(_, stored)| stored.post.clone())
        .collect()
}
