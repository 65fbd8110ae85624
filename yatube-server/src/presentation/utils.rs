use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, error::ErrorUnauthorized};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::User;
use crate::presentation::middleware::RequestId;
use crate::presentation::routes::{Access, Endpoint};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorUnauthorized("missing authenticated user"))),
        }
    }
}

/// Applies the access level the route table declares for `endpoint`.
pub fn authorize(
    endpoint: Endpoint,
    user: Option<AuthenticatedUser>,
    req: &HttpRequest,
) -> Result<Option<AuthenticatedUser>, DomainError> {
    match (endpoint.access(), user) {
        (Access::Public, user) => Ok(user),
        (Access::Authenticated | Access::Author, Some(user)) => Ok(Some(user)),
        (Access::Authenticated | Access::Author, None) => Err(login_required(req)),
    }
}

pub fn authorize_user(
    endpoint: Endpoint,
    user: Option<AuthenticatedUser>,
    req: &HttpRequest,
) -> Result<AuthenticatedUser, DomainError> {
    authorize(endpoint, user, req)?.ok_or_else(|| login_required(req))
}

fn login_required(req: &HttpRequest) -> DomainError {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    DomainError::LoginRequired {
        next: next.to_string(),
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
