//! Content-visibility and mutation policy.
//!
//! Every decision here is a pure function of `(entity, viewer, now)`. The
//! current instant is always an explicit parameter so rules stay testable
//! with fixed timestamps, and nothing is cached: flags are re-evaluated on
//! every read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// The identity a request is evaluated against.
///
/// An anonymous viewer carries no id, so author-equality checks can never
/// match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::User(_))
    }

    /// Whether this viewer is the user with the given id.
    pub fn is(&self, user_id: Uuid) -> bool {
        matches!(self, Viewer::User(id) if *id == user_id)
    }
}

/// Whether `viewer` may see `post`.
///
/// The author always sees their own post. Everyone else sees it only once it
/// has passed the publication gate: the post and its category are published
/// and `pub_date` is not in the future.
///
/// `category` must be the post's own category; the caller resolves the
/// relation.
pub fn can_view_post(
    post: &Post,
    category: &Category,
    viewer: Viewer,
    now: DateTime<Utc>,
) -> bool {
    viewer.is(post.author_id)
        || (post.is_published && category.is_published && post.pub_date <= now)
}

/// Whether a category is browsable at all.
///
/// A `false` here must surface as not-found upstream, never as forbidden:
/// hidden and nonexistent are indistinguishable from the outside. Categories
/// have no owner, so there is no override.
pub fn can_view_category(category: &Category) -> bool {
    category.is_published
}

/// Whether `viewer` may edit or delete an entity owned by `author_id`.
///
/// Only the exact author qualifies; administrative changes go through a
/// separate management surface, not this policy.
pub fn can_mutate(author_id: Uuid, viewer: Viewer) -> bool {
    viewer.is(author_id)
}

/// Whether `viewer` may comment on `post`.
///
/// Commenting requires authentication and that the post is visible to the
/// viewer, so an unpublished post's id cannot be used as a drop box by
/// unrelated users.
pub fn can_comment_on(
    post: &Post,
    category: &Category,
    viewer: Viewer,
    now: DateTime<Utc>,
) -> bool {
    viewer.is_authenticated() && can_view_post(post, category, viewer, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn category(published: bool) -> Category {
        Category {
            is_published: published,
            ..Category::new("Travel".into(), String::new(), "travel".into())
        }
    }

    fn post(author_id: Uuid, published: bool, pub_date: DateTime<Utc>) -> Post {
        let category_id = Uuid::new_v4();
        let mut post = Post::new(author_id, "title".into(), "text".into(), category_id, pub_date);
        post.is_published = published;
        post
    }

    #[test]
    fn author_always_sees_own_post() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        // Unpublished, in an unpublished category, dated in the future: the
        // override still applies.
        let p = post(author, false, now + TimeDelta::days(30));

        assert!(can_view_post(&p, &category(false), Viewer::User(author), now));
    }

    #[test]
    fn stranger_sees_exactly_the_publication_gate() {
        let author = Uuid::new_v4();
        let stranger = Viewer::User(Uuid::new_v4());
        let now = Utc::now();
        let past = now - TimeDelta::hours(1);

        assert!(can_view_post(&post(author, true, past), &category(true), stranger, now));
        assert!(!can_view_post(&post(author, false, past), &category(true), stranger, now));
        assert!(!can_view_post(&post(author, true, past), &category(false), stranger, now));
    }

    #[test]
    fn future_pub_date_hides_from_everyone_but_the_author() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let p = post(author, true, now + TimeDelta::seconds(1));
        let cat = category(true);

        assert!(!can_view_post(&p, &cat, Viewer::User(Uuid::new_v4()), now));
        assert!(!can_view_post(&p, &cat, Viewer::Anonymous, now));
        assert!(can_view_post(&p, &cat, Viewer::User(author), now));
        // Once the second elapses the post is visible to all.
        assert!(can_view_post(&p, &cat, Viewer::Anonymous, now + TimeDelta::seconds(1)));
    }

    #[test]
    fn pub_date_equal_to_now_is_visible() {
        let now = Utc::now();
        let p = post(Uuid::new_v4(), true, now);

        assert!(can_view_post(&p, &category(true), Viewer::Anonymous, now));
    }

    #[test]
    fn unpublished_category_hides_published_past_post() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let p = post(author, true, now - TimeDelta::days(1));
        let cat = category(false);

        assert!(!can_view_post(&p, &cat, Viewer::Anonymous, now));
        assert!(!can_view_post(&p, &cat, Viewer::User(Uuid::new_v4()), now));
        assert!(can_view_post(&p, &cat, Viewer::User(author), now));
    }

    #[test]
    fn anonymous_viewer_never_matches_an_author() {
        let p = post(Uuid::new_v4(), false, Utc::now());

        assert!(!Viewer::Anonymous.is(p.author_id));
        assert!(!can_view_post(&p, &category(true), Viewer::Anonymous, Utc::now()));
    }

    #[test]
    fn category_visibility_is_its_published_flag() {
        assert!(can_view_category(&category(true)));
        assert!(!can_view_category(&category(false)));
    }

    #[test]
    fn only_the_exact_author_may_mutate() {
        let author = Uuid::new_v4();

        assert!(can_mutate(author, Viewer::User(author)));
        assert!(!can_mutate(author, Viewer::User(Uuid::new_v4())));
        assert!(!can_mutate(author, Viewer::Anonymous));
    }

    #[test]
    fn commenting_requires_authentication() {
        let now = Utc::now();
        let p = post(Uuid::new_v4(), true, now - TimeDelta::hours(1));
        let cat = category(true);

        assert!(can_comment_on(&p, &cat, Viewer::User(Uuid::new_v4()), now));
        assert!(!can_comment_on(&p, &cat, Viewer::Anonymous, now));
    }

    #[test]
    fn commenting_requires_visibility() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let hidden = post(author, false, now - TimeDelta::hours(1));
        let cat = category(true);

        // A stranger who guessed the id cannot comment on a hidden post.
        assert!(!can_comment_on(&hidden, &cat, Viewer::User(Uuid::new_v4()), now));
        // The author still can.
        assert!(can_comment_on(&hidden, &cat, Viewer::User(author), now));
    }
}
