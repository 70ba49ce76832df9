//! Post listing construction.
//!
//! [`PostQuery`] is a declarative description of which posts a listing wants.
//! Repositories translate it into storage queries; the in-memory store and
//! the tests evaluate it directly through [`PostQuery::matches`]. Keeping the
//! intent data-only means listing semantics can be checked without a store.

mod page;

pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest, ResolvedPage, resolve_page};

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Post;
use crate::policy::Viewer;

/// Declarative post-listing specification.
///
/// Results are always ordered newest first (see [`listing_order`]) and carry
/// per-post comment counts. Absent fields mean "no constraint".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    /// When set, only posts past the publication gate at this instant:
    /// post and category published, `pub_date` not after it.
    pub visible_at: Option<DateTime<Utc>>,
    /// When set, only posts by this author.
    pub author_id: Option<Uuid>,
    /// When set, only posts in this category.
    pub category_id: Option<Uuid>,
}

impl PostQuery {
    /// All publicly visible posts.
    pub fn published(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            author_id: None,
            category_id: None,
        }
    }

    /// Publicly visible posts within one category.
    pub fn in_category(category_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::published(now)
        }
    }

    /// Posts shown on a user's profile page.
    ///
    /// The owner sees every post they authored, published or not; any other
    /// viewer gets the published subset.
    pub fn profile(profile_user_id: Uuid, viewer: Viewer, now: DateTime<Utc>) -> Self {
        if viewer.is(profile_user_id) {
            Self {
                visible_at: None,
                author_id: Some(profile_user_id),
                category_id: None,
            }
        } else {
            Self {
                author_id: Some(profile_user_id),
                ..Self::published(now)
            }
        }
    }

    /// Evaluate the predicate against one post.
    ///
    /// `category_is_published` is the published flag of the post's own
    /// category; the caller resolves the relation.
    pub fn matches(&self, post: &Post, category_is_published: bool) -> bool {
        if let Some(now) = self.visible_at
            && !(post.is_published && category_is_published && post.pub_date <= now)
        {
            return false;
        }
        if let Some(author_id) = self.author_id
            && post.author_id != author_id
        {
            return false;
        }
        if let Some(category_id) = self.category_id
            && post.category_id != category_id
        {
            return false;
        }
        true
    }
}

/// The single total order for listings: `pub_date` descending, with id
/// descending as the tie-break so page N and page N+1 agree on one ordering
/// even when publication dates collide.
pub fn listing_order(a: &Post, b: &Post) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post(author_id: Uuid, category_id: Uuid, published: bool, pub_date: DateTime<Utc>) -> Post {
        let mut post = Post::new(author_id, "t".into(), "x".into(), category_id, pub_date);
        post.is_published = published;
        post
    }

    #[test]
    fn published_query_applies_the_gate() {
        let now = Utc::now();
        let query = PostQuery::published(now);
        let past = now - TimeDelta::hours(1);
        let cat = Uuid::new_v4();

        assert!(query.matches(&post(Uuid::new_v4(), cat, true, past), true));
        assert!(!query.matches(&post(Uuid::new_v4(), cat, false, past), true));
        assert!(!query.matches(&post(Uuid::new_v4(), cat, true, now + TimeDelta::hours(1)), true));
    }

    #[test]
    fn unpublished_category_is_a_hard_cutoff() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let p = post(author, cat, true, now - TimeDelta::hours(1));

        // No gated query matches a post in an unpublished category, whoever
        // is asking.
        assert!(!PostQuery::published(now).matches(&p, false));
        assert!(!PostQuery::in_category(cat, now).matches(&p, false));
        assert!(!PostQuery::profile(author, Viewer::User(Uuid::new_v4()), now).matches(&p, false));
    }

    #[test]
    fn in_category_filters_on_the_category() {
        let now = Utc::now();
        let cat = Uuid::new_v4();
        let query = PostQuery::in_category(cat, now);
        let past = now - TimeDelta::hours(1);

        assert!(query.matches(&post(Uuid::new_v4(), cat, true, past), true));
        assert!(!query.matches(&post(Uuid::new_v4(), Uuid::new_v4(), true, past), true));
    }

    #[test]
    fn profile_owner_skips_the_gate() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let query = PostQuery::profile(owner, Viewer::User(owner), now);

        assert_eq!(query.visible_at, None);
        // Unpublished and future-dated posts still match for the owner.
        let unpublished = post(owner, Uuid::new_v4(), false, now + TimeDelta::days(7));
        assert!(query.matches(&unpublished, true));
        // But only the owner's own posts do.
        let foreign = post(Uuid::new_v4(), Uuid::new_v4(), true, now);
        assert!(!query.matches(&foreign, true));
    }

    #[test]
    fn profile_stranger_gets_the_published_subset() {
        let now = Utc::now();
        let owner = Uuid::new_v4();

        for viewer in [Viewer::Anonymous, Viewer::User(Uuid::new_v4())] {
            let query = PostQuery::profile(owner, viewer, now);
            assert_eq!(query.visible_at, Some(now));
            assert!(!query.matches(&post(owner, Uuid::new_v4(), false, now), true));
            assert!(query.matches(&post(owner, Uuid::new_v4(), true, now - TimeDelta::hours(1)), true));
        }
    }

    #[test]
    fn listing_order_is_newest_first_with_id_tiebreak() {
        let now = Utc::now();
        let newer = post(Uuid::new_v4(), Uuid::new_v4(), true, now);
        let older = post(Uuid::new_v4(), Uuid::new_v4(), true, now - TimeDelta::hours(1));

        assert_eq!(listing_order(&newer, &older), Ordering::Less);
        assert_eq!(listing_order(&older, &newer), Ordering::Greater);

        // Equal pub_date: the higher id sorts first, and the order flips
        // consistently.
        let mut a = post(Uuid::new_v4(), Uuid::new_v4(), true, now);
        let mut b = a.clone();
        a.id = Uuid::from_u128(2);
        b.id = Uuid::from_u128(1);
        assert_eq!(listing_order(&a, &b), Ordering::Less);
        assert_eq!(listing_order(&b, &a), Ordering::Greater);
        assert_eq!(listing_order(&a, &a), Ordering::Equal);
    }
}
