//! In-memory store - used when no database is configured, and by tests.
//!
//! Enforces the same relational rules as the Postgres schema: posts must
//! reference an existing user, users with posts cannot be deleted, deleting
//! a post or a tag drops its links, and tag names are unique.
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blogly_core::domain::{Post, PostInput, Tag, TagInput, User, UserInput};
use blogly_core::error::RepoError;
use blogly_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    tags: BTreeMap<i32, Tag>,
    /// (post_id, tag_id)
    posts_tags: BTreeSet<(i32, i32)>,
    user_seq: i32,
    post_seq: i32,
    tag_seq: i32,
}

impl Tables {
    fn tags_of(&self, post_id: i32) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .posts_tags
            .range((post_id, i32::MIN)..=(post_id, i32::MAX))
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    fn check_tags_exist(&self, tag_ids: &[i32]) -> Result<(), RepoError> {
        match tag_ids.iter().find(|id| !self.tags.contains_key(*id)) {
            Some(missing) => Err(RepoError::Constraint(format!(
                "tag {missing} does not exist"
            ))),
            None => Ok(()),
        }
    }

    fn relink(&mut self, post_id: i32, tag_ids: &[i32]) {
        self.posts_tags.retain(|(p, _)| *p != post_id);
        self.posts_tags
            .extend(tag_ids.iter().map(|&tag_id| (post_id, tag_id)));
    }

    fn check_name_free(&self, name: &str, except: Option<i32>) -> Result<(), RepoError> {
        let taken = self
            .tags
            .values()
            .any(|t| t.name == name && Some(t.id) != except);
        if taken {
            return Err(RepoError::Duplicate(format!("tag name '{name}'")));
        }
        Ok(())
    }
}

/// Newest first.
fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Shared tables behind the three in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryTagRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if tables.posts.values().any(|p| p.user_id == id) {
            return Err(RepoError::Constraint(format!("user {id} still owns posts")));
        }
        tables.users.remove(&id);
        tracing::debug!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(users)
    }

    async fn create(&self, input: UserInput) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.user_seq += 1;
        let user = User {
            id: tables.user_seq,
            first_name: input.first_name,
            last_name: input.last_name,
            image_url: input.image_url,
        };
        tables.users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, id: i32, input: UserInput) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.image_url = input.image_url;
        tracing::debug!(user_id = id, "Updated user");
        Ok(user.clone())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.relink(id, &[]);
        tracing::debug!(post_id = id, "Deleted post");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        sort_posts(&mut posts);
        Ok(posts)
    }

    async fn create(&self, user_id: i32, input: PostInput) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepoError::Constraint(format!(
                "user {user_id} does not exist"
            )));
        }
        tables.check_tags_exist(&input.tag_ids)?;

        tables.post_seq += 1;
        let post = Post {
            id: tables.post_seq,
            user_id,
            title: input.title,
            content: input.content,
            created_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        tables.relink(post.id, &input.tag_ids);
        tracing::debug!(post_id = post.id, user_id, tags = input.tag_ids.len(), "Created post");
        Ok(post)
    }

    async fn update(&self, id: i32, input: PostInput) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        tables.check_tags_exist(&input.tag_ids)?;
        tables.relink(id, &input.tag_ids);

        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.title = input.title;
        post.content = input.content;
        tracing::debug!(post_id = id, tags = input.tag_ids.len(), "Updated post");
        Ok(post.clone())
    }

    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags_of(post_id))
    }
}

#[async_trait]
impl BaseRepository<Tag, i32> for InMemoryTagRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.posts_tags.retain(|(_, t)| *t != id);
        tracing::debug!(tag_id = id, "Deleted tag");
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.tables.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.name == name).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create(&self, input: TagInput) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_name_free(&input.name, None)?;

        tables.tag_seq += 1;
        let tag = Tag {
            id: tables.tag_seq,
            name: input.name,
        };
        tables.tags.insert(tag.id, tag.clone());
        tracing::debug!(tag_id = tag.id, name = %tag.name, "Created tag");
        Ok(tag)
    }

    async fn update(&self, id: i32, input: TagInput) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.tags.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        tables.check_name_free(&input.name, Some(id))?;

        let tag = tables.tags.get_mut(&id).ok_or(RepoError::NotFound)?;
        tag.name = input.name;
        tracing::debug!(tag_id = id, name = %tag.name, "Renamed tag");
        Ok(tag.clone())
    }

    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts_tags
            .iter()
            .filter(|(_, t)| *t == tag_id)
            .filter_map(|(post_id, _)| tables.posts.get(post_id).cloned())
            .collect();
        sort_posts(&mut posts);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_input(first: &str, last: &str) -> UserInput {
        UserInput::new(Some(first), Some(last), None).unwrap()
    }

    fn post_input(title: &str, tag_ids: Vec<i32>) -> PostInput {
        PostInput::new(Some(title), Some("Some content"), tag_ids).unwrap()
    }

    fn tag_input(name: &str) -> TagInput {
        TagInput::new(Some(name)).unwrap()
    }

    #[tokio::test]
    async fn test_users_are_listed_by_last_then_first_name() {
        let store = InMemoryStore::new();
        let users = store.users();
        users.create(user_input("Alan", "Turing")).await.unwrap();
        users.create(user_input("Grace", "Hopper")).await.unwrap();
        users.create(user_input("Ada", "Hopper")).await.unwrap();

        let names: Vec<String> = users
            .list()
            .await
            .unwrap()
            .iter()
            .map(User::full_name)
            .collect();
        assert_eq!(names, vec!["Ada Hopper", "Grace Hopper", "Alan Turing"]);
    }

    #[tokio::test]
    async fn test_update_user() {
        let store = InMemoryStore::new();
        let users = store.users();
        let user = users.create(user_input("Our", "Example")).await.unwrap();

        let updated = users
            .update(user.id, user_input("New", "Name"))
            .await
            .unwrap();
        assert_eq!(updated.full_name(), "New Name");
        assert_eq!(users.find_by_id(user.id).await.unwrap(), Some(updated));

        let missing = users.update(999, user_input("No", "One")).await;
        assert!(matches!(missing, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_user_with_posts_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let users = store.users();
        let posts = store.posts();
        let author = users.create(user_input("Has", "Posts")).await.unwrap();
        let loner = users.create(user_input("No", "Posts")).await.unwrap();
        let post = posts.create(author.id, post_input("Hi", vec![])).await.unwrap();

        let blocked = users.delete(author.id).await;
        assert!(matches!(blocked, Err(RepoError::Constraint(_))));
        assert!(users.find_by_id(author.id).await.unwrap().is_some());

        users.delete(loner.id).await.unwrap();
        assert!(users.find_by_id(loner.id).await.unwrap().is_none());

        posts.delete(post.id).await.unwrap();
        users.delete(author.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_requires_existing_user_and_tags() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let no_user = posts.create(1, post_input("Hi", vec![])).await;
        assert!(matches!(no_user, Err(RepoError::Constraint(_))));

        let user = store.users().create(user_input("A", "B")).await.unwrap();
        let no_tag = posts.create(user.id, post_input("Hi", vec![7])).await;
        assert!(matches!(no_tag, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deleting_post_removes_its_tag_links() {
        let store = InMemoryStore::new();
        let user = store.users().create(user_input("A", "B")).await.unwrap();
        let tags = store.tags();
        let rust = tags.create(tag_input("rust")).await.unwrap();
        let fun = tags.create(tag_input("fun")).await.unwrap();

        let posts = store.posts();
        let post = posts
            .create(user.id, post_input("Tagged", vec![rust.id, fun.id]))
            .await
            .unwrap();
        let names: Vec<String> = posts
            .find_tags(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["fun", "rust"]);

        posts.delete(post.id).await.unwrap();
        assert!(posts.find_tags(post.id).await.unwrap().is_empty());
        assert!(tags.find_posts(rust.id).await.unwrap().is_empty());
        assert!(tags.find_by_id(rust.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_post_replaces_tag_set() {
        let store = InMemoryStore::new();
        let user = store.users().create(user_input("A", "B")).await.unwrap();
        let tags = store.tags();
        let a = tags.create(tag_input("a")).await.unwrap();
        let b = tags.create(tag_input("b")).await.unwrap();

        let posts = store.posts();
        let post = posts
            .create(user.id, post_input("Before", vec![a.id]))
            .await
            .unwrap();
        let updated = posts
            .update(post.id, post_input("After", vec![b.id]))
            .await
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.created_at, post.created_at);
        assert_eq!(posts.find_tags(post.id).await.unwrap(), vec![b.clone()]);
        assert_eq!(tags.find_posts(b.id).await.unwrap(), vec![updated]);
        assert!(tags.find_posts(a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_names_are_unique() {
        let store = InMemoryStore::new();
        let tags = store.tags();
        let rust = tags.create(tag_input("rust")).await.unwrap();
        let fun = tags.create(tag_input("fun")).await.unwrap();

        let dup = tags.create(tag_input("rust")).await;
        assert!(matches!(dup, Err(RepoError::Duplicate(_))));

        let rename = tags.update(fun.id, tag_input("rust")).await;
        assert!(matches!(rename, Err(RepoError::Duplicate(_))));

        // Renaming a tag to its own name is not a conflict.
        tags.update(rust.id, tag_input("rust")).await.unwrap();
        assert_eq!(
            tags.find_by_name("rust").await.unwrap().map(|t| t.id),
            Some(rust.id)
        );
    }

    #[tokio::test]
    async fn test_deleting_tag_unlinks_posts() {
        let store = InMemoryStore::new();
        let user = store.users().create(user_input("A", "B")).await.unwrap();
        let tags = store.tags();
        let tag = tags.create(tag_input("gone")).await.unwrap();
        let posts = store.posts();
        let post = posts
            .create(user.id, post_input("Keep me", vec![tag.id]))
            .await
            .unwrap();

        tags.delete(tag.id).await.unwrap();

        assert!(posts.find_tags(post.id).await.unwrap().is_empty());
        assert!(posts.find_by_id(post.id).await.unwrap().is_some());
        assert!(matches!(tags.delete(tag.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_by_ids_ignores_unknown_ids() {
        let store = InMemoryStore::new();
        let tags = store.tags();
        let b = tags.create(tag_input("b")).await.unwrap();
        let a = tags.create(tag_input("a")).await.unwrap();

        let found = tags.find_by_ids(&[b.id, 99, a.id, b.id]).await.unwrap();
        assert_eq!(found, vec![a, b]);
    }
}
