//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

/// Listing query parameters.
///
/// The page number arrives as raw text and is never rejected; anything
/// unparseable resolves to a valid page on the server.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// A post in a listing, with its comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: String,
    pub title: String,
    pub text: String,
    pub author_id: String,
    pub category_id: String,
    pub location_id: Option<String>,
    pub pub_date: String,
    pub is_published: bool,
    pub image: Option<String>,
    pub comment_count: i64,
}

/// A full post with its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub id: String,
    pub title: String,
    pub text: String,
    pub author_username: String,
    pub category_title: String,
    pub category_slug: String,
    pub location_name: Option<String>,
    pub pub_date: String,
    pub is_published: bool,
    pub image: Option<String>,
    pub comments: Vec<CommentResponse>,
}

/// One entry in a comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: String,
}

/// A category with the page of posts filed under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPostsResponse {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub posts: PageResponse<PostSummaryResponse>,
}

/// A profile with the page of posts its owner authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts: PageResponse<PostSummaryResponse>,
}
