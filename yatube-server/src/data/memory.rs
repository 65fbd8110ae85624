use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::group::{Group, GroupRef, NewGroup};
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter};
use crate::domain::user::{Author, User};

#[derive(Debug, Clone)]
struct StoredPost {
    id: i64,
    author_id: Uuid,
    text: String,
    group_id: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<Uuid, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, StoredPost>,
    next_group_id: i64,
    next_post_id: i64,
}

impl State {
    fn resolve(&self, stored: &StoredPost) -> Result<Post, DomainError> {
        let author = self.users.get(&stored.author_id).ok_or_else(|| {
            DomainError::Internal(format!("post {} has no author", stored.id))
        })?;
        // a missing group behaves like ON DELETE SET NULL
        let group = stored
            .group_id
            .and_then(|id| self.groups.get(&id))
            .map(GroupRef::from);
        Ok(Post {
            id: stored.id,
            author: Author::from(author),
            text: stored.text.clone(),
            group,
            created_at: stored.created_at,
        })
    }

    fn filtered(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let mut posts = Vec::new();
        for stored in self.posts.values() {
            let post = self.resolve(stored)?;
            if filter.matches(&post) {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        state.users.insert(user.id, user.clone());
        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.slug == group.slug) {
            return Err(DomainError::GroupAlreadyExists(group.slug));
        }
        state.next_group_id += 1;
        let created = Group {
            id: state.next_group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        state.groups.insert(created.id, created.clone());
        info!(group_id = created.id, slug = %created.slug, "group created");
        Ok(created)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError> {
        let state = self.state.read().await;
        Ok(state.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        Ok(self.state.read().await.groups.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&post.author_id) {
            return Err(DomainError::UserNotFound(post.author_id.to_string()));
        }
        if let Some(group_id) = post.group_id {
            if !state.groups.contains_key(&group_id) {
                return Err(DomainError::GroupNotFound(group_id.to_string()));
            }
        }
        state.next_post_id += 1;
        let stored = StoredPost {
            id: state.next_post_id,
            author_id: post.author_id,
            text: post.text,
            group_id: post.group_id,
            created_at: Utc::now(),
        };
        state.posts.insert(stored.id, stored.clone());
        info!(post_id = stored.id, author_id = %stored.author_id, "post created");
        state.resolve(&stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.state.read().await;
        state.posts.get(&id).map(|p| state.resolve(p)).transpose()
    }

    async fn update(
        &self,
        id: i64,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.write().await;
        if let Some(group_id) = changes.group_id {
            if !state.groups.contains_key(&group_id) {
                return Err(DomainError::GroupNotFound(group_id.to_string()));
            }
        }
        let Some(stored) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        if stored.author_id != author_id {
            return Ok(None);
        }
        stored.text = changes.text;
        stored.group_id = changes.group_id;
        let stored = stored.clone();
        info!(post_id = id, "post updated");
        state.resolve(&stored).map(Some)
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        let posts = state.filtered(filter)?;
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<i64, DomainError> {
        let state = self.state.read().await;
        Ok(state.filtered(filter)?.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User, Group) {
        let store = InMemoryStore::new();
        let user = UserRepository::create(&store, User::new("StasBasov".into(), None, "x".into()))
            .await
            .unwrap();
        let group = GroupRepository::create(
            &store,
            NewGroup {
                title: "Тестовая группа".into(),
                slug: "test-slug".into(),
                description: "Тестовое описание".into(),
            },
        )
        .await
        .unwrap();
        (store, user, group)
    }

    fn new_post(author: &User, text: &str, group: Option<&Group>) -> NewPost {
        NewPost {
            author_id: author.id,
            text: text.into(),
            group_id: group.map(|g| g.id),
        }
    }

    #[tokio::test]
    async fn posts_resolve_author_and_group() {
        let (store, user, group) = seeded().await;
        let post = PostRepository::create(&store, new_post(&user, "hello", Some(&group)))
            .await
            .unwrap();

        assert_eq!(post.author.username, "StasBasov");
        assert_eq!(post.group.as_ref().unwrap().slug, "test-slug");

        let found = PostRepository::find_by_id(&store, post.id).await.unwrap();
        assert_eq!(found.unwrap().text, "hello");
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_windowed() {
        let (store, user, _) = seeded().await;
        for i in 0..13 {
            PostRepository::create(&store, new_post(&user, &format!("post {i}"), None))
                .await
                .unwrap();
        }

        let first = PostRepository::list(&store, PostFilter::All, 10, 0).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].text, "post 12");

        let second = PostRepository::list(&store, PostFilter::All, 10, 10).await.unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second[2].text, "post 0");

        assert_eq!(store.count(PostFilter::All).await.unwrap(), 13);
    }

    #[tokio::test]
    async fn group_filter_excludes_other_groups() {
        let (store, user, group) = seeded().await;
        let other = GroupRepository::create(
            &store,
            NewGroup {
                title: "Другая".into(),
                slug: "other".into(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
        PostRepository::create(&store, new_post(&user, "in group", Some(&group)))
            .await
            .unwrap();
        PostRepository::create(&store, new_post(&user, "elsewhere", Some(&other)))
            .await
            .unwrap();
        PostRepository::create(&store, new_post(&user, "no group", None))
            .await
            .unwrap();

        let posts = PostRepository::list(&store, PostFilter::Group(group.id), 10, 0).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "in group");
    }

    #[tokio::test]
    async fn update_requires_matching_author() {
        let (store, user, group) = seeded().await;
        let post = PostRepository::create(&store, new_post(&user, "before", None))
            .await
            .unwrap();

        let changes = PostChanges {
            text: "after".into(),
            group_id: Some(group.id),
        };
        let denied = store
            .update(post.id, Uuid::new_v4(), changes.clone())
            .await
            .unwrap();
        assert!(denied.is_none());

        let updated = store.update(post.id, user.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.text, "after");
        assert_eq!(updated.author, post.author);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn duplicates_are_rejected() {
        let (store, _, _) = seeded().await;
        let dup_user =
            UserRepository::create(&store, User::new("StasBasov".into(), None, "y".into())).await;
        assert!(matches!(dup_user, Err(DomainError::UserAlreadyExists(_))));

        let dup_group = GroupRepository::create(
            &store,
            NewGroup {
                title: "again".into(),
                slug: "test-slug".into(),
                description: String::new(),
            },
        )
        .await;
        assert!(matches!(dup_group, Err(DomainError::GroupAlreadyExists(_))));
    }
}
