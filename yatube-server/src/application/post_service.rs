use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::forms::PostForm;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::page::{Page, PageRequest, Paginator};
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter};
use crate::domain::user::User;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    paginator: Paginator,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        paginator: Paginator,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            paginator,
        }
    }

    async fn page(&self, filter: PostFilter, request: PageRequest) -> Result<Page<Post>, DomainError> {
        let total = self.posts.count(filter).await?;
        let (limit, offset) = self.paginator.window(request);
        let items = self.posts.list(filter, limit, offset).await?;
        Ok(self.paginator.page(items, request, total))
    }

    pub async fn index(&self, request: PageRequest) -> Result<Page<Post>, DomainError> {
        self.page(PostFilter::All, request).await
    }

    pub async fn group_posts(
        &self,
        slug: &str,
        request: PageRequest,
    ) -> Result<(Group, Page<Post>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
        let page = self.page(PostFilter::Group(group.id), request).await?;
        Ok((group, page))
    }

    pub async fn profile(
        &self,
        username: &str,
        request: PageRequest,
    ) -> Result<(User, Page<Post>), DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        let page = self.page(PostFilter::Author(author.id), request).await?;
        Ok((author, page))
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> Result<i64, DomainError> {
        self.posts.count(PostFilter::Author(author_id)).await
    }

    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        self.groups.list().await
    }

    #[instrument(skip(self, form))]
    pub async fn create_post(&self, author_id: Uuid, form: &PostForm) -> Result<Post, DomainError> {
        let cleaned = form.clean(self.groups.as_ref()).await?;
        let post = self
            .posts
            .create(NewPost {
                author_id,
                text: cleaned.text,
                group_id: cleaned.group_id,
            })
            .await?;
        info!(post_id = post.id, "post published");
        Ok(post)
    }

    pub async fn post_for_edit(&self, editor_id: Uuid, post_id: i64) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        if post.author.id != editor_id {
            return Err(DomainError::NotAuthor { post_id });
        }
        Ok(post)
    }

    #[instrument(skip(self, form))]
    pub async fn edit_post(
        &self,
        editor_id: Uuid,
        post_id: i64,
        form: &PostForm,
    ) -> Result<Post, DomainError> {
        self.post_for_edit(editor_id, post_id).await?;
        let cleaned = form.clean(self.groups.as_ref()).await?;
        let changes = PostChanges {
            text: cleaned.text,
            group_id: cleaned.group_id,
        };
        self.posts
            .update(post_id, editor_id, changes)
            .await?
            .ok_or(DomainError::NotAuthor { post_id })
    }
}
