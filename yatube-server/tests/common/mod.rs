#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, LOCATION};
use actix_web::test;
use serde_json::Value;

use yatube_server::data::group_repository::GroupRepository;
use yatube_server::data::memory::InMemoryStore;
use yatube_server::data::post_repository::PostRepository;
use yatube_server::data::user_repository::UserRepository;
use yatube_server::domain::group::{Group, NewGroup};
use yatube_server::domain::page::Paginator;
use yatube_server::domain::post::{NewPost, Post, PostFilter};
use yatube_server::domain::user::User;
use yatube_server::infrastructure::security::{JwtKeys, hash_password};
use yatube_server::{AppServices, Repositories};

pub const PASSWORD: &str = "password123";

macro_rules! init_app {
    ($fixture:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(yatube_server::presentation::middleware::IdentityMiddleware)
                .configure(yatube_server::configure($fixture.services.clone())),
        )
        .await
    };
}

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub services: AppServices,
    keys: JwtKeys,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let keys = JwtKeys::new("integration-test-secret".into(), 1).unwrap();
        let services = AppServices::new(
            Repositories::in_memory(store.clone()),
            keys.clone(),
            Paginator::default(),
        );
        Self {
            store,
            services,
            keys,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        let hash = hash_password(PASSWORD).unwrap();
        UserRepository::create(self.store.as_ref(), User::new(username.into(), None, hash))
            .await
            .unwrap()
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        GroupRepository::create(
            self.store.as_ref(),
            NewGroup {
                title: title.into(),
                slug: slug.into(),
                description: "Тестовое описание".into(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        PostRepository::create(
            self.store.as_ref(),
            NewPost {
                author_id: author.id,
                text: text.into(),
                group_id: group.map(|g| g.id),
            },
        )
        .await
        .unwrap()
    }

    pub async fn find_post(&self, id: i64) -> Option<Post> {
        PostRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
    }

    pub async fn post_count(&self) -> i64 {
        PostRepository::count(self.store.as_ref(), PostFilter::All)
            .await
            .unwrap()
    }

    pub async fn all_posts(&self) -> Vec<Post> {
        PostRepository::list(self.store.as_ref(), PostFilter::All, i64::MAX, 0)
            .await
            .unwrap()
    }

    pub fn login_as(&self, user: &User) -> (actix_web::http::header::HeaderName, String) {
        let token = self.keys.generate_token(user.id).unwrap();
        (AUTHORIZATION, format!("Bearer {token}"))
    }
}

pub async fn rendered<B: MessageBody>(resp: ServiceResponse<B>) -> (String, Value) {
    assert_eq!(resp.status(), StatusCode::OK, "expected a rendered page");
    let template = resp
        .headers()
        .get("x-template-name")
        .expect("rendered pages name their template")
        .to_str()
        .unwrap()
        .to_string();
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["template"], template.as_str());
    (template, body["context"].clone())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    assert_eq!(resp.status(), StatusCode::FOUND, "expected a redirect");
    resp.headers()
        .get(LOCATION)
        .expect("redirects carry a location")
        .to_str()
        .unwrap()
        .to_string()
}
