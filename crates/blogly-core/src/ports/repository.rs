use async_trait::async_trait;

use crate::domain::{Post, PostInput, Tag, TagInput, User, UserInput};
use crate::error::RepoError;

/// Generic repository trait defining the operations every table shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Returns [`RepoError::NotFound`] when nothing was deleted and
    /// [`RepoError::Constraint`] when other rows still reference it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// All users, ordered by last name then first name.
    async fn list(&self) -> Result<Vec<User>, RepoError>;

    async fn create(&self, input: UserInput) -> Result<User, RepoError>;

    async fn update(&self, id: i32, input: UserInput) -> Result<User, RepoError>;
}

/// Post repository. Posts own their tag associations.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Posts written by a user, newest first.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError>;

    /// Insert a post and link it to `input.tag_ids`.
    async fn create(&self, user_id: i32, input: PostInput) -> Result<Post, RepoError>;

    /// Update a post's fields and replace its tag set with `input.tag_ids`.
    async fn update(&self, id: i32, input: PostInput) -> Result<Post, RepoError>;

    /// Tags linked to a post, ordered by name.
    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// All tags, ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    /// The subset of `ids` that exist, ordered by name.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError>;

    /// Returns [`RepoError::Duplicate`] if the name is taken.
    async fn create(&self, input: TagInput) -> Result<Tag, RepoError>;

    /// Returns [`RepoError::Duplicate`] if another tag has the name.
    async fn update(&self, id: i32, input: TagInput) -> Result<Tag, RepoError>;

    /// Posts carrying a tag, newest first.
    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError>;
}
