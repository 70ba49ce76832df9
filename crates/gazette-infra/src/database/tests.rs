#[cfg(test)]
mod tests {
    use gazette_core::domain::{Category, Post};
    use gazette_core::ports::{BaseRepository, CategoryRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::database::entity::{category, post};
    use crate::database::{PostgresCategoryRepository, PostgresPostRepository};

    fn post_model(id: Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title: "Over the pass".to_owned(),
            text: "Snow in June.".to_owned(),
            author_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            location_id: None,
            pub_date: now.into(),
            is_published: true,
            image: None,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_post_by_id() {
        let post_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let found: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let found = found.unwrap();
        assert_eq!(found.id, post_id);
        assert_eq!(found.title, "Over the pass");
    }

    #[tokio::test]
    async fn find_category_by_slug() {
        let now = chrono::Utc::now();
        let model = category::Model {
            id: Uuid::new_v4(),
            title: "Hiking".to_owned(),
            description: String::new(),
            slug: "hiking".to_owned(),
            is_published: true,
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let found: Option<Category> = repo.find_by_slug("hiking").await.unwrap();
        assert_eq!(found.unwrap().slug, "hiking");
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;
        assert!(matches!(result, Err(gazette_core::RepoError::NotFound)));
    }
}
