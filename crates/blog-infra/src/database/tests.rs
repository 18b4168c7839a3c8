use blog_core::domain::Post;
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn model(title: &str, age: Duration) -> post::Model {
    let at = Utc::now() - age;
    post::Model {
        id: uuid::Uuid::new_v4(),
        title: title.to_owned(),
        content: "Content".to_owned(),
        author: "Alice".to_owned(),
        created_at: at.into(),
        updated_at: at.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let row = model("Test Post", Duration::zero());
    let post_id = row.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.author, "Alice");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_find_missing_post_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_all_maps_rows() {
    let newer = model("Newer", Duration::zero());
    let older = model("Older", Duration::hours(1));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![newer, older]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.find_all().await.unwrap();
    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Newer", "Older"]);
}

#[tokio::test]
async fn test_save_inserts_when_no_row_updated() {
    let row = model("Fresh", Duration::zero());
    let post: Post = row.clone().into();

    // First query: UPDATE ... RETURNING finds nothing. Second: INSERT ... RETURNING.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let saved = repo.save(post.clone()).await.unwrap();
    assert_eq!(saved.id, post.id);
    assert_eq!(saved.title, "Fresh");
}

#[tokio::test]
async fn test_save_updates_existing_row() {
    let mut row = model("Original", Duration::hours(2));
    row.title = "Edited".to_owned();
    let post: Post = row.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let saved = repo.save(post.clone()).await.unwrap();
    assert_eq!(saved.id, post.id);
    assert_eq!(saved.title, "Edited");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, _>::delete(&repo, uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}
