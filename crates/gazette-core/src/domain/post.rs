use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Location, User};

/// Post entity - a blog post.
///
/// `pub_date` may lie in the future; such a post stays hidden from everyone
/// but its author until the date passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    /// Reference to an uploaded image asset, if any.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. Location and image are absent by default; set them
    /// with struct update syntax when needed.
    pub fn new(
        author_id: Uuid,
        title: String,
        text: String,
        category_id: Uuid,
        pub_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            author_id,
            category_id,
            location_id: None,
            pub_date,
            is_published: true,
            image: None,
            created_at: Utc::now(),
        }
    }
}

/// A post joined with the relations that visibility decisions and the detail
/// page need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub category: Category,
    pub location: Option<Location>,
}

/// A post row in a listing, with its per-query comment count.
///
/// The count is derived at query time and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub comment_count: i64,
}
