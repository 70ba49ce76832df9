//! In-memory entity store.
//!
//! Backs the server when no database is configured and doubles as the test
//! fixture for store-level listing properties. Data is lost on restart.
//! Foreign keys are checked on insert so behavior stays close to the
//! relational store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use gazette_core::domain::{Category, Comment, Location, Post, PostDetail, PostSummary, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use gazette_core::query::{Page, PageRequest, PostQuery, listing_order, resolve_page};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn category_is_published(&self, category_id: Uuid) -> bool {
        self.categories
            .get(&category_id)
            .map(|c| c.is_published)
            .unwrap_or(false)
    }

    fn comment_count(&self, post_id: Uuid) -> i64 {
        self.comments.values().filter(|c| c.post_id == post_id).count() as i64
    }
}

/// A complete entity store held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username)
        {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(RepoError::Constraint("slug already exists".into()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.categories.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn insert(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.locations.contains_key(&location.id) {
            return Err(RepoError::NotFound);
        }
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.locations.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

impl LocationRepository for MemoryStore {}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&post.category_id) {
            return Err(RepoError::Constraint("post references a missing category".into()));
        }
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("post references a missing author".into()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if !tables.categories.contains_key(&post.category_id) {
            return Err(RepoError::Constraint("post references a missing category".into()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Mirror the relational store's cascade.
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let tables = self.tables.read().await;

        let Some(post) = tables.posts.get(&id).cloned() else {
            return Ok(None);
        };
        let category = tables
            .categories
            .get(&post.category_id)
            .cloned()
            .ok_or_else(|| {
                RepoError::Query(format!("post {} references a missing category", post.id))
            })?;
        let author = tables.users.get(&post.author_id).cloned().ok_or_else(|| {
            RepoError::Query(format!("post {} references a missing author", post.id))
        })?;
        let location = post
            .location_id
            .and_then(|location_id| tables.locations.get(&location_id).cloned());

        Ok(Some(PostDetail {
            post,
            author,
            category,
            location,
        }))
    }

    async fn list(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        let mut matched: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p, tables.category_is_published(p.category_id)))
            .collect();
        matched.sort_by(|a, b| listing_order(a, b));

        let window = resolve_page(page, matched.len() as u64);
        let items = matched
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .map(|p| PostSummary {
                comment_count: tables.comment_count(p.id),
                post: p.clone(),
            })
            .collect();

        Ok(Page::new(items, window))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("comment references a missing post".into()));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint("comment references a missing author".into()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use gazette_core::policy::Viewer;

    async fn seed_user(store: &MemoryStore, username: &str) -> User {
        let user = User::new(username.into(), format!("{username}@example.org"), "x".into());
        BaseRepository::<User, Uuid>::insert(store, user).await.unwrap()
    }

    async fn seed_category(store: &MemoryStore, slug: &str, published: bool) -> Category {
        let mut category = Category::new(slug.to_uppercase(), String::new(), slug.into());
        category.is_published = published;
        BaseRepository::<Category, Uuid>::insert(store, category).await.unwrap()
    }

    async fn seed_post(
        store: &MemoryStore,
        author: &User,
        category: &Category,
        published: bool,
        pub_date: chrono::DateTime<Utc>,
    ) -> Post {
        let mut post = Post::new(author.id, "title".into(), "text".into(), category.id, pub_date);
        post.is_published = published;
        BaseRepository::<Post, Uuid>::insert(store, post).await.unwrap()
    }

    #[tokio::test]
    async fn pages_concatenate_to_the_full_result_set() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "walker").await;
        let category = seed_category(&store, "trips", true).await;

        let now = Utc::now();
        // 25 posts, deliberately including pub_date collisions so the
        // tie-break carries the ordering.
        for i in 0..25 {
            seed_post(&store, &author, &category, true, now - TimeDelta::hours(i / 3)).await;
        }

        let query = PostQuery::published(now);
        let everything = store
            .list(query, PageRequest::new(1, 100))
            .await
            .unwrap();
        assert_eq!(everything.items.len(), 25);

        let mut collected = Vec::new();
        let mut number = 1;
        loop {
            let page = store.list(query, PageRequest::new(number, 10)).await.unwrap();
            assert_eq!(page.total_pages, 3);
            collected.extend(page.items.iter().map(|s| s.post.id).collect::<Vec<_>>());
            if !page.has_next() {
                break;
            }
            number += 1;
        }

        let full: Vec<Uuid> = everything.items.iter().map(|s| s.post.id).collect();
        assert_eq!(collected, full, "pages must concatenate without gaps or duplicates");
    }

    #[tokio::test]
    async fn same_page_twice_is_identical() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "repeat").await;
        let category = seed_category(&store, "notes", true).await;

        let now = Utc::now();
        for _ in 0..15 {
            // Identical pub_date on every post: ordering rests entirely on
            // the tie-break.
            seed_post(&store, &author, &category, true, now).await;
        }

        let query = PostQuery::published(now);
        let first = store.list(query, PageRequest::new(2, 10)).await.unwrap();
        let second = store.list(query, PageRequest::new(2, 10)).await.unwrap();

        let ids = |page: &Page<PostSummary>| page.items.iter().map(|s| s.post.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.items.len(), 5);
    }

    #[tokio::test]
    async fn out_of_range_pages_resolve_to_valid_ones() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "clamp").await;
        let category = seed_category(&store, "misc", true).await;
        let now = Utc::now();
        for i in 0..25 {
            seed_post(&store, &author, &category, true, now - TimeDelta::minutes(i)).await;
        }

        let query = PostQuery::published(now);

        let above = store.list(query, PageRequest::new(99999, 10)).await.unwrap();
        assert_eq!(above.number, 3);
        assert_eq!(above.items.len(), 5);

        let below = store
            .list(query, PageRequest::from_param(Some("not-a-number"), 10))
            .await
            .unwrap();
        assert_eq!(below.number, 1);
        assert_eq!(below.items.len(), 10);
    }

    #[tokio::test]
    async fn unpublished_category_yields_nothing_for_any_viewer() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "insider").await;
        let hidden = seed_category(&store, "drafts", false).await;
        let now = Utc::now();
        seed_post(&store, &author, &hidden, true, now - TimeDelta::hours(1)).await;

        for query in [
            PostQuery::published(now),
            PostQuery::in_category(hidden.id, now),
            PostQuery::profile(author.id, Viewer::User(Uuid::new_v4()), now),
        ] {
            let page = store.list(query, PageRequest::new(1, 10)).await.unwrap();
            assert!(page.items.is_empty());
            assert_eq!(page.total_items, 0);
        }
    }

    #[tokio::test]
    async fn profile_owner_sees_drafts_and_strangers_do_not() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner").await;
        let category = seed_category(&store, "life", true).await;
        let now = Utc::now();

        seed_post(&store, &owner, &category, true, now - TimeDelta::hours(2)).await;
        seed_post(&store, &owner, &category, false, now - TimeDelta::hours(1)).await;
        seed_post(&store, &owner, &category, true, now + TimeDelta::hours(1)).await;

        let own_view = store
            .list(PostQuery::profile(owner.id, Viewer::User(owner.id), now), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(own_view.items.len(), 3);
        // Newest first even for the owner.
        assert!(own_view.items[0].post.pub_date > own_view.items[2].post.pub_date);

        for viewer in [Viewer::Anonymous, Viewer::User(Uuid::new_v4())] {
            let page = store
                .list(PostQuery::profile(owner.id, viewer, now), PageRequest::new(1, 10))
                .await
                .unwrap();
            assert_eq!(page.items.len(), 1);
            assert!(page.items[0].post.is_published);
        }
    }

    #[tokio::test]
    async fn comment_counts_are_recomputed_per_query() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "counted").await;
        let category = seed_category(&store, "food", true).await;
        let now = Utc::now();
        let post = seed_post(&store, &author, &category, true, now - TimeDelta::hours(1)).await;

        let count_of = |page: &Page<PostSummary>| page.items[0].comment_count;

        let query = PostQuery::published(now);
        let before = store.list(query, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(count_of(&before), 0);

        for i in 0..3 {
            let comment = Comment::new(post.id, author.id, format!("comment {i}"));
            BaseRepository::<Comment, Uuid>::insert(&store, comment).await.unwrap();
        }

        let after = store.list(query, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(count_of(&after), 3);
    }

    #[tokio::test]
    async fn comment_thread_is_chronological() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "talker").await;
        let category = seed_category(&store, "chat", true).await;
        let now = Utc::now();
        let post = seed_post(&store, &author, &category, true, now - TimeDelta::hours(1)).await;

        // Insert out of order.
        for minutes in [30, 5, 20, 10] {
            let mut comment = Comment::new(post.id, author.id, format!("after {minutes}m"));
            comment.created_at = now + TimeDelta::minutes(minutes);
            BaseRepository::<Comment, Uuid>::insert(&store, comment).await.unwrap();
        }

        let thread = store.for_post(post.id).await.unwrap();
        let stamps: Vec<_> = thread.iter().map(|c| c.created_at).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
        assert_eq!(thread.len(), 4);
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_its_comments() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "gone").await;
        let category = seed_category(&store, "bye", true).await;
        let post = seed_post(&store, &author, &category, true, Utc::now()).await;

        let comment = Comment::new(post.id, author.id, "soon gone".into());
        BaseRepository::<Comment, Uuid>::insert(&store, comment.clone()).await.unwrap();

        BaseRepository::<Post, Uuid>::delete(&store, post.id).await.unwrap();

        let found = BaseRepository::<Comment, Uuid>::find_by_id(&store, comment.id)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let store = MemoryStore::new();
        seed_user(&store, "taken").await;

        let dup = User::new("taken".into(), "other@example.org".into(), "x".into());
        let result = BaseRepository::<User, Uuid>::insert(&store, dup).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
