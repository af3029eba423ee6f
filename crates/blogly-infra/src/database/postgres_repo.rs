//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use blogly_core::domain::{Post, PostInput, Tag, TagInput, User, UserInput};
use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, TagRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: UserInput) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(input)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: UserInput) -> Result<User, RepoError> {
        let mut active = user::ActiveModel::from(input);
        active.id = Set(id);

        let model = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(user_id = id, "Updated user");
        Ok(model.into())
    }
}

/// Link a post to each of `tag_ids`.
async fn link_tags<C>(conn: &C, post_id: i32, tag_ids: &[i32]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    PostTagEntity::insert_many(
        tag_ids
            .iter()
            .map(|&tag_id| post_tag::ActiveModel::link(post_id, tag_id)),
    )
    .exec(conn)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user_id: i32, input: PostInput) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = post::ActiveModel::from_input(&input);
        active.user_id = Set(user_id);
        let model = active.insert(&txn).await.map_err(map_db_err)?;

        link_tags(&txn, model.id, &input.tag_ids).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, user_id, tags = input.tag_ids.len(), "Created post");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: PostInput) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = post::ActiveModel::from_input(&input);
        active.id = Set(id);
        let model = active.update(&txn).await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        link_tags(&txn, id, &input.tag_ids).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = id, tags = input.tag_ids.len(), "Updated post");
        Ok(model.into())
    }

    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: TagInput) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel::from(input)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(tag_id = model.id, name = %model.name, "Created tag");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: TagInput) -> Result<Tag, RepoError> {
        let mut active = tag::ActiveModel::from(input);
        active.id = Set(id);

        let model = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(tag_id = id, name = %model.name, "Renamed tag");
        Ok(model.into())
    }

    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
