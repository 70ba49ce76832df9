//! SeaORM implementations of the entity-store ports.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use gazette_core::domain::{Category, Comment, Location, Post, PostDetail, PostSummary, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use gazette_core::query::{Page, PageRequest, PostQuery, resolve_page};

use super::entity::{category, comment, location, post, user};
use super::postgres_base::{PostgresRepository, map_db_err};

pub type PostgresUserRepository = PostgresRepository<user::Entity>;
pub type PostgresCategoryRepository = PostgresRepository<category::Entity>;
pub type PostgresLocationRepository = PostgresRepository<location::Entity>;
pub type PostgresPostRepository = PostgresRepository<post::Entity>;
pub type PostgresCommentRepository = PostgresRepository<comment::Entity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let found = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.map(Into::into))
    }
}

impl LocationRepository for PostgresLocationRepository {}

/// Post row annotated with its comment count, as selected by `list`.
#[derive(Debug, FromQueryResult)]
struct PostWithCount {
    id: Uuid,
    title: String,
    text: String,
    author_id: Uuid,
    category_id: Uuid,
    location_id: Option<Uuid>,
    pub_date: DateTimeWithTimeZone,
    is_published: bool,
    image: Option<String>,
    created_at: DateTimeWithTimeZone,
    comment_count: i64,
}

impl From<PostWithCount> for PostSummary {
    fn from(row: PostWithCount) -> Self {
        Self {
            post: Post {
                id: row.id,
                title: row.title,
                text: row.text,
                author_id: row.author_id,
                category_id: row.category_id,
                location_id: row.location_id,
                pub_date: row.pub_date.into(),
                is_published: row.is_published,
                image: row.image,
                created_at: row.created_at.into(),
            },
            comment_count: row.comment_count,
        }
    }
}

/// Translate a listing specification into a filtered SELECT on posts.
///
/// The publication gate needs the category's published flag, so it joins the
/// category table; the plain author/category filters work on post columns
/// alone.
fn filtered_posts(query: &PostQuery) -> Select<post::Entity> {
    let mut select = post::Entity::find();

    if let Some(now) = query.visible_at {
        select = select
            .inner_join(category::Entity)
            .filter(post::Column::IsPublished.eq(true))
            .filter(category::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now));
    }
    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }

    select
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let found = post::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        let Some((post_model, category_model)) = found else {
            return Ok(None);
        };
        let category_model = category_model.ok_or_else(|| {
            RepoError::Query(format!("post {} references a missing category", post_model.id))
        })?;

        let author = user::Entity::find_by_id(post_model.author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| {
                RepoError::Query(format!("post {} references a missing author", post_model.id))
            })?;

        let location = match post_model.location_id {
            Some(location_id) => location::Entity::find_by_id(location_id)
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .map(Location::from),
            None => None,
        };

        Ok(Some(PostDetail {
            post: post_model.into(),
            author: author.into(),
            category: category_model.into(),
            location,
        }))
    }

    async fn list(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let filtered = filtered_posts(&query);

        let total = filtered
            .clone()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        let window = resolve_page(page, total);

        let rows = filtered
            .left_join(comment::Entity)
            .column_as(comment::Column::Id.count(), "comment_count")
            .group_by(post::Column::Id)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(window.offset())
            .limit(window.limit())
            .into_model::<PostWithCount>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), window))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
