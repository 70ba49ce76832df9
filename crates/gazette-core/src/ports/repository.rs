use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, PostDetail, PostSummary, User};
use crate::error::RepoError;
use crate::query::{Page, PageRequest, PostQuery};

/// Generic repository trait defining standard CRUD operations.
///
/// `insert` and `update` are distinct: entities carry client-generated ids,
/// so the store cannot tell a new row from an edit on its own.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository. Categories are reached by slug, not id.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Location repository. Locations are only ever resolved by id.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {}

/// Post repository - executes listing specifications.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// A post joined with the relations the visibility decision and the
    /// detail page need.
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;

    /// Execute a listing specification with comment counts attached,
    /// returning the requested page clamped into range.
    async fn list(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Every comment on a post, oldest first. The thread is returned whole;
    /// comments are never filtered by viewer.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
