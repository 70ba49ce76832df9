//! Category browsing handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use gazette_core::policy;
use gazette_core::ports::{CategoryRepository, PostRepository};
use gazette_core::query::{PageRequest, PostQuery};
use gazette_shared::dto::{CategoryPostsResponse, PageQuery};

use crate::handlers::page_response;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/categories/{slug}/posts
///
/// An unpublished category answers exactly like an unknown slug.
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;
    if !policy::can_view_category(&category) {
        return Err(AppError::NotFound);
    }

    let page_request = PageRequest::from_param(query.page.as_deref(), state.page_size);
    let page = state
        .posts
        .list(PostQuery::in_category(category.id, Utc::now()), page_request)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        title: category.title,
        description: category.description,
        slug: category.slug,
        posts: page_response(page),
    }))
}
