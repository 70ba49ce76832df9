//! Profile handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use gazette_core::ports::{BaseRepository, PostRepository, UserRepository};
use gazette_core::query::{PageRequest, PostQuery};
use gazette_core::validate::ProfileInput;
use gazette_shared::dto::{PageQuery, ProfileResponse};

use crate::handlers::{page_response, user_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profiles/{username}
///
/// The profile owner sees all of their posts; everyone else gets the
/// published subset.
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    let page_request = PageRequest::from_param(query.page.as_deref(), state.page_size);
    let page = state
        .posts
        .list(
            PostQuery::profile(user.id, identity.viewer(), Utc::now()),
            page_request,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: user_response(&user),
        posts: page_response(page),
    }))
}

/// PATCH /api/profile - edit the viewer's own profile.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if input.username != user.username
        && state
            .users
            .find_by_username(&input.username)
            .await?
            .is_some()
    {
        return Err(AppError::Conflict("username already taken".to_string()));
    }

    user.username = input.username;
    user.email = input.email;
    user.first_name = input.first_name;
    user.last_name = input.last_name;
    let saved = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(user_response(&saved)))
}
