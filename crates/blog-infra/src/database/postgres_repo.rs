//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{EntityTrait, QueryOrder};

use blog_core::domain::Post;
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(count = result.len(), "Loaded posts");

        Ok(result.into_iter().map(Into::into).collect())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
