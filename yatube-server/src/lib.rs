pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use crate::application::auth_service::AuthService;
use crate::application::group_service::GroupService;
use crate::application::post_service::PostService;
use crate::data::group_repository::{GroupRepository, PostgresGroupRepository};
use crate::data::memory::InMemoryStore;
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::domain::page::Paginator;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::security::JwtKeys;

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl Repositories {
    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool)),
        })
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store,
        }
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.database_url.as_deref() {
            Some(url) => Self::postgres(url).await,
            None => {
                warn!("DATABASE_URL is not set, data lives in memory only");
                Ok(Self::in_memory(Arc::new(InMemoryStore::new())))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub posts: PostService,
    pub groups: GroupService,
}

impl AppServices {
    pub fn new(repos: Repositories, keys: JwtKeys, paginator: Paginator) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), keys),
            posts: PostService::new(repos.posts, repos.groups.clone(), repos.users, paginator),
            groups: GroupService::new(repos.groups),
        }
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = Repositories::from_config(config).await?;
        info!(posts_per_page = config.posts_per_page, "services ready");
        Ok(Self::new(
            repos,
            JwtKeys::new(config.jwt_secret.clone(), config.session_ttl_hours)?,
            Paginator::new(config.posts_per_page),
        ))
    }
}

pub fn configure(services: AppServices) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.auth.clone()))
            .app_data(web::Data::new(services.posts.clone()))
            .app_data(web::Data::new(services.groups.clone()));
        presentation::routes::register(cfg);
    }
}
