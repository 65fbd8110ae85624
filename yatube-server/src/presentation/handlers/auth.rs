use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::forms::{LoginForm, SignupForm};
use crate::domain::error::{DomainError, FormErrors};
use crate::presentation::dto::{FormView, LoggedOutContext, LoginContext, SignupContext};
use crate::presentation::middleware::SESSION_COOKIE;
use crate::presentation::render::TemplateResponse;
use crate::presentation::routes::{Endpoint, reverse};
use crate::presentation::utils::request_id;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn session_cookie(token: String, auth: &AuthService) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(auth.keys().ttl().num_seconds()))
        .finish()
}

fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish()
}

fn signup_page(form: &SignupForm, errors: FormErrors) -> TemplateResponse<SignupContext> {
    TemplateResponse::new(
        Endpoint::Signup.template(),
        SignupContext {
            form: FormView::signup(form, errors),
        },
    )
}

fn login_page(form: &LoginForm, errors: FormErrors) -> TemplateResponse<LoginContext> {
    TemplateResponse::new(
        Endpoint::Login.template(),
        LoginContext {
            form: FormView::login(form, errors),
            next: form.safe_next().map(str::to_string),
        },
    )
}

pub async fn signup_form() -> TemplateResponse<SignupContext> {
    signup_page(&SignupForm::default(), FormErrors::default())
}

pub async fn signup(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, DomainError> {
    let user = match auth.register(&form).await {
        Ok(user) => user,
        Err(DomainError::InvalidForm(errors)) => {
            return Ok(signup_page(&form, errors).respond_to(&req));
        }
        Err(e) => return Err(e),
    };
    let token = auth.issue_token(&user)?;

    info!(request_id = %request_id(&req), user_id = %user.id, "user registered");

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, reverse::index()))
        .cookie(session_cookie(token, &auth))
        .finish())
}

pub async fn login_form(query: web::Query<NextQuery>) -> TemplateResponse<LoginContext> {
    let form = LoginForm {
        next: query.into_inner().next,
        ..LoginForm::default()
    };
    login_page(&form, FormErrors::default())
}

pub async fn login(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, DomainError> {
    let (user, token) = match auth.login(&form).await {
        Ok(found) => found,
        Err(DomainError::InvalidForm(errors)) => {
            return Ok(login_page(&form, errors).respond_to(&req));
        }
        Err(e) => return Err(e),
    };

    info!(request_id = %request_id(&req), username = %user.username, "user logged in");

    let location = form
        .safe_next()
        .map(str::to_string)
        .unwrap_or_else(reverse::index);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, location))
        .cookie(session_cookie(token, &auth))
        .finish())
}

pub async fn logout() -> TemplateResponse<LoggedOutContext> {
    TemplateResponse::new(Endpoint::Logout.template(), LoggedOutContext {})
        .with_cookie(expired_session_cookie())
}
