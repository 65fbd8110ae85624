use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::info;

use crate::application::forms::PostForm;
use crate::application::post_service::PostService;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::page::PageRequest;
use crate::domain::post::Post;
use crate::presentation::dto::{
    FormView, GroupListContext, IndexContext, PostDetailContext, PostFormContext, PostView,
    ProfileContext,
};
use crate::presentation::render::TemplateResponse;
use crate::presentation::routes::{Endpoint, reverse};
use crate::presentation::utils::{AuthenticatedUser, authorize, authorize_user, request_id};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

pub async fn index(
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<TemplateResponse<IndexContext>, DomainError> {
    let page = posts.index(query.request()).await?;
    Ok(TemplateResponse::new(
        Endpoint::Index.template(),
        IndexContext {
            page_obj: page.into(),
        },
    ))
}

pub async fn group_posts(
    posts: web::Data<PostService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<TemplateResponse<GroupListContext>, DomainError> {
    let slug = path.into_inner();
    let (group, page) = posts.group_posts(&slug, query.request()).await?;
    Ok(TemplateResponse::new(
        Endpoint::GroupList.template(),
        GroupListContext {
            group,
            page_obj: page.into(),
        },
    ))
}

pub async fn profile(
    posts: web::Data<PostService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<TemplateResponse<ProfileContext>, DomainError> {
    let username = path.into_inner();
    let (author, page) = posts.profile(&username, query.request()).await?;
    Ok(TemplateResponse::new(
        Endpoint::Profile.template(),
        ProfileContext::new(&author, page),
    ))
}

pub async fn post_detail(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<TemplateResponse<PostDetailContext>, DomainError> {
    let user = authorize(Endpoint::PostDetail, user, &req)?;
    let post = posts.get_post(path.into_inner()).await?;
    let author_posts_count = posts.count_by_author(post.author.id).await?;
    let is_author = user.is_some_and(|u| u.id == post.author.id);
    Ok(TemplateResponse::new(
        Endpoint::PostDetail.template(),
        PostDetailContext {
            title: post.title(),
            post: PostView::from(post),
            author_posts_count,
            is_author,
        },
    ))
}

async fn render_form(
    posts: &PostService,
    form: &PostForm,
    errors: FormErrors,
    editing: Option<i64>,
) -> Result<TemplateResponse<PostFormContext>, DomainError> {
    let groups = posts.group_choices().await?;
    let endpoint = if editing.is_some() {
        Endpoint::PostEdit
    } else {
        Endpoint::PostCreate
    };
    Ok(TemplateResponse::new(
        endpoint.template(),
        PostFormContext {
            form: FormView::post(form, &groups, errors),
            is_edit: editing.is_some(),
            post_id: editing,
        },
    ))
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

pub async fn create_form(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
) -> Result<TemplateResponse<PostFormContext>, DomainError> {
    authorize_user(Endpoint::PostCreate, user, &req)?;
    render_form(&posts, &PostForm::default(), FormErrors::default(), None).await
}

pub async fn create_post(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let user = authorize_user(Endpoint::PostCreate, user, &req)?;
    match posts.create_post(user.id, &form).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = post.id,
                "post created"
            );
            Ok(redirect(reverse::profile(&user.username)))
        }
        Err(DomainError::InvalidForm(errors)) => Ok(render_form(&posts, &form, errors, None)
            .await?
            .respond_to(&req)),
        Err(e) => Err(e),
    }
}

pub async fn edit_form(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<TemplateResponse<PostFormContext>, DomainError> {
    let user = authorize_user(Endpoint::PostEdit, user, &req)?;
    let post_id = path.into_inner();
    let post: Post = posts.post_for_edit(user.id, post_id).await?;
    render_form(
        &posts,
        &PostForm::from_post(&post),
        FormErrors::default(),
        Some(post_id),
    )
    .await
}

pub async fn edit_post(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, DomainError> {
    let user = authorize_user(Endpoint::PostEdit, user, &req)?;
    let post_id = path.into_inner();
    match posts.edit_post(user.id, post_id, &form).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = post.id,
                "post updated"
            );
            Ok(redirect(reverse::post_detail(post.id)))
        }
        Err(DomainError::InvalidForm(errors)) => {
            Ok(render_form(&posts, &form, errors, Some(post_id))
                .await?
                .respond_to(&req))
        }
        Err(e) => Err(e),
    }
}
