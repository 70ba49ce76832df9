//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profiles;


use actix_web::web;

use gazette_core::domain::{Comment, PostDetail, PostSummary, User};
use gazette_core::query::Page;
use gazette_shared::dto::{
    CommentResponse, PageResponse, PostDetailResponse, PostSummaryResponse, UserResponse,
};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their comment threads
            .route("/posts", web::get().to(posts::index))
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{id}", web::get().to(posts::detail))
            .route("/posts/{id}", web::put().to(posts::update))
            .route("/posts/{id}", web::delete().to(posts::delete))
            .route("/posts/{id}/comments", web::post().to(comments::add))
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::put().to(comments::update),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::delete().to(comments::delete),
            )
            // Category pages
            .route("/categories/{slug}/posts", web::get().to(categories::posts))
            // Profiles
            .route("/profiles/{username}", web::get().to(profiles::profile))
            .route("/profile", web::patch().to(profiles::edit)),
    );
}

// Domain → DTO renderers shared by the handlers.

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

pub(crate) fn summary_response(summary: &PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        id: summary.post.id.to_string(),
        title: summary.post.title.clone(),
        text: summary.post.text.clone(),
        author_id: summary.post.author_id.to_string(),
        category_id: summary.post.category_id.to_string(),
        location_id: summary.post.location_id.map(|id| id.to_string()),
        pub_date: summary.post.pub_date.to_rfc3339(),
        is_published: summary.post.is_published,
        image: summary.post.image.clone(),
        comment_count: summary.comment_count,
    }
}

pub(crate) fn page_response(page: Page<PostSummary>) -> PageResponse<PostSummaryResponse> {
    PageResponse {
        items: page.items.iter().map(summary_response).collect(),
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

pub(crate) fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        post_id: comment.post_id.to_string(),
        author_id: comment.author_id.to_string(),
        text: comment.text.clone(),
        created_at: comment.created_at.to_rfc3339(),
    }
}

pub(crate) fn detail_response(detail: &PostDetail, comments: &[Comment]) -> PostDetailResponse {
    PostDetailResponse {
        id: detail.post.id.to_string(),
        title: detail.post.title.clone(),
        text: detail.post.text.clone(),
        author_username: detail.author.username.clone(),
        category_title: detail.category.title.clone(),
        category_slug: detail.category.slug.clone(),
        location_name: detail.location.as_ref().map(|l| l.name.clone()),
        pub_date: detail.post.pub_date.to_rfc3339(),
        is_published: detail.post.is_published,
        image: detail.post.image.clone(),
        comments: comments.iter().map(comment_response).collect(),
    }
}
