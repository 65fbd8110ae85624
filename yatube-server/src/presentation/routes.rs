use actix_web::web;

use crate::presentation::handlers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Author,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Index,
    GroupList,
    Profile,
    PostDetail,
    CreatePost,
    Signup,
    Login,
    LoggedOut,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Index => "posts/index.html",
            Template::GroupList => "posts/group_list.html",
            Template::Profile => "posts/profile.html",
            Template::PostDetail => "posts/post_detail.html",
            Template::CreatePost => "posts/create_post.html",
            Template::Signup => "users/signup.html",
            Template::Login => "users/login.html",
            Template::LoggedOut => "users/logged_out.html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    GroupList,
    Profile,
    PostDetail,
    PostCreate,
    PostEdit,
    Signup,
    Login,
    Logout,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::Index,
        Endpoint::GroupList,
        Endpoint::Profile,
        Endpoint::PostDetail,
        Endpoint::PostCreate,
        Endpoint::PostEdit,
        Endpoint::Signup,
        Endpoint::Login,
        Endpoint::Logout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Index => "posts:index",
            Endpoint::GroupList => "posts:group_list",
            Endpoint::Profile => "posts:user",
            Endpoint::PostDetail => "posts:post_detail",
            Endpoint::PostCreate => "posts:post_create",
            Endpoint::PostEdit => "posts:post_edit",
            Endpoint::Signup => "users:signup",
            Endpoint::Login => "users:login",
            Endpoint::Logout => "users:logout",
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            Endpoint::Index => "/",
            Endpoint::GroupList => "/group/{slug}/",
            Endpoint::Profile => "/profile/{username}/",
            Endpoint::PostDetail => "/posts/{post_id}/",
            Endpoint::PostCreate => "/create/",
            Endpoint::PostEdit => "/posts/{post_id}/edit/",
            Endpoint::Signup => "/auth/signup/",
            Endpoint::Login => "/auth/login/",
            Endpoint::Logout => "/auth/logout/",
        }
    }

    pub fn template(&self) -> Template {
        match self {
            Endpoint::Index => Template::Index,
            Endpoint::GroupList => Template::GroupList,
            Endpoint::Profile => Template::Profile,
            Endpoint::PostDetail => Template::PostDetail,
            Endpoint::PostCreate | Endpoint::PostEdit => Template::CreatePost,
            Endpoint::Signup => Template::Signup,
            Endpoint::Login => Template::Login,
            Endpoint::Logout => Template::LoggedOut,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Endpoint::PostCreate => Access::Authenticated,
            Endpoint::PostEdit => Access::Author,
            _ => Access::Public,
        }
    }

    fn resource(&self) -> actix_web::Resource {
        let resource = web::resource(self.pattern()).name(self.name());
        match self {
            Endpoint::Index => resource.route(web::get().to(handlers::posts::index)),
            Endpoint::GroupList => resource.route(web::get().to(handlers::posts::group_posts)),
            Endpoint::Profile => resource.route(web::get().to(handlers::posts::profile)),
            Endpoint::PostDetail => resource.route(web::get().to(handlers::posts::post_detail)),
            Endpoint::PostCreate => resource
                .route(web::get().to(handlers::posts::create_form))
                .route(web::post().to(handlers::posts::create_post)),
            Endpoint::PostEdit => resource
                .route(web::get().to(handlers::posts::edit_form))
                .route(web::post().to(handlers::posts::edit_post)),
            Endpoint::Signup => resource
                .route(web::get().to(handlers::auth::signup_form))
                .route(web::post().to(handlers::auth::signup)),
            Endpoint::Login => resource
                .route(web::get().to(handlers::auth::login_form))
                .route(web::post().to(handlers::auth::login)),
            Endpoint::Logout => resource
                .route(web::get().to(handlers::auth::logout))
                .route(web::post().to(handlers::auth::logout)),
        }
    }
}

pub fn register(cfg: &mut web::ServiceConfig) {
    for endpoint in Endpoint::ALL {
        cfg.service(endpoint.resource());
    }
    cfg.route("/health", web::get().to(handlers::health))
        .default_service(web::to(handlers::not_found));
}

pub mod reverse {
    use super::Endpoint;

    pub fn index() -> String {
        Endpoint::Index.pattern().to_string()
    }

    pub fn group_list(slug: &str) -> String {
        format!("/group/{slug}/")
    }

    pub fn profile(username: &str) -> String {
        format!("/profile/{username}/")
    }

    pub fn post_detail(post_id: i64) -> String {
        format!("/posts/{post_id}/")
    }

    pub fn post_create() -> String {
        Endpoint::PostCreate.pattern().to_string()
    }

    pub fn post_edit(post_id: i64) -> String {
        format!("/posts/{post_id}/edit/")
    }

    pub fn login_with_next(next: &str) -> String {
        let next = urlencoding::encode(next).replace("%2F", "/");
        format!("{}?next={}", Endpoint::Login.pattern(), next)
    }
}
