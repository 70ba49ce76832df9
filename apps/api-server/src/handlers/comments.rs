//! Comment handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use gazette_core::domain::Comment;
use gazette_core::policy;
use gazette_core::ports::{BaseRepository, PostRepository};
use gazette_core::validate::CommentInput;

use crate::handlers::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts/{id}/comments
///
/// Commenting is limited to posts the viewer can actually see; a hidden post
/// answers like a missing one even here.
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let detail = state
        .posts
        .find_detail(post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !policy::can_comment_on(&detail.post, &detail.category, identity.viewer(), Utc::now()) {
        return Err(AppError::NotFound);
    }

    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;

    let comment = Comment::new(post_id, identity.user_id, input.text);
    let saved = state.comments.insert(comment).await?;

    Ok(HttpResponse::Created().json(comment_response(&saved)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let mut comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if comment.post_id != post_id {
        return Err(AppError::NotFound);
    }
    if !policy::can_mutate(comment.author_id, identity.viewer()) {
        return Err(AppError::Denied {
            location: format!("/api/posts/{post_id}"),
        });
    }

    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;

    comment.text = input.text;
    let saved = state.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(comment_response(&saved)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if comment.post_id != post_id {
        return Err(AppError::NotFound);
    }
    if !policy::can_mutate(comment.author_id, identity.viewer()) {
        return Err(AppError::Denied {
            location: format!("/api/posts/{post_id}"),
        });
    }

    state.comments.delete(comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
