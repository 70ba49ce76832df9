//! Post handlers: listings, detail, and authoring.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use gazette_core::domain::{Post, PostSummary};
use gazette_core::policy;
use gazette_core::ports::{BaseRepository, CommentRepository, PostRepository};
use gazette_core::query::{PageRequest, PostQuery};
use gazette_core::validate::{FieldError, PostInput};
use gazette_shared::dto::PageQuery;

use crate::handlers::{detail_response, page_response, summary_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts - published posts, newest first, paginated.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page_request = PageRequest::from_param(query.page.as_deref(), state.page_size);
    let page = state
        .posts
        .list(PostQuery::published(Utc::now()), page_request)
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/posts/{id} - a single post with its comment thread.
///
/// A post the viewer may not see answers exactly like a missing one.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let detail = state
        .posts
        .find_detail(id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !policy::can_view_post(&detail.post, &detail.category, identity.viewer(), Utc::now()) {
        return Err(AppError::NotFound);
    }

    let comments = state.comments.for_post(detail.post.id).await?;

    Ok(HttpResponse::Ok().json(detail_response(&detail, &comments)))
}

/// Check that the category and location a post references actually exist.
async fn check_references(state: &AppState, input: &PostInput) -> AppResult<()> {
    let mut errors = Vec::new();
    if state
        .categories
        .find_by_id(input.category_id)
        .await?
        .is_none()
    {
        errors.push(FieldError::new("category_id", "unknown category"));
    }
    if let Some(location_id) = input.location_id {
        if state.locations.find_by_id(location_id).await?.is_none() {
            errors.push(FieldError::new("location_id", "unknown location"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;
    check_references(&state, &input).await?;

    let post = Post {
        location_id: input.location_id,
        is_published: input.is_published,
        image: input.image,
        ..Post::new(
            identity.user_id,
            input.title,
            input.text,
            input.category_id,
            input.pub_date,
        )
    };
    let saved = state.posts.insert(post).await?;

    Ok(HttpResponse::Created().json(summary_response(&PostSummary {
        post: saved,
        comment_count: 0,
    })))
}

/// PUT /api/posts/{id}
///
/// Only the author may edit; anyone else is sent back to the post detail.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let existing = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !policy::can_mutate(existing.author_id, identity.viewer()) {
        return Err(AppError::Denied {
            location: format!("/api/posts/{id}"),
        });
    }

    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;
    check_references(&state, &input).await?;

    let updated = Post {
        title: input.title,
        text: input.text,
        category_id: input.category_id,
        location_id: input.location_id,
        pub_date: input.pub_date,
        is_published: input.is_published,
        image: input.image,
        ..existing
    };
    let saved = state.posts.update(updated).await?;

    let comment_count = state.comments.for_post(saved.id).await?.len() as i64;

    Ok(HttpResponse::Ok().json(summary_response(&PostSummary {
        post: saved,
        comment_count,
    })))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let existing = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !policy::can_mutate(existing.author_id, identity.viewer()) {
        return Err(AppError::Denied {
            location: format!("/api/posts/{id}"),
        });
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}
