use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::http::header::HeaderName;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use crate::presentation::routes::Template;

pub static TEMPLATE_HEADER: HeaderName = HeaderName::from_static("x-template-name");

#[derive(Serialize)]
struct RenderedPage<'a, C> {
    template: &'a str,
    context: &'a C,
}

pub struct TemplateResponse<C> {
    template: Template,
    context: C,
    cookies: Vec<Cookie<'static>>,
}

impl<C: Serialize> TemplateResponse<C> {
    pub fn new(template: Template, context: C) -> Self {
        Self {
            template,
            context,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl<C: Serialize> Responder for TemplateResponse<C> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let mut builder = HttpResponse::Ok();
        builder.insert_header((TEMPLATE_HEADER.clone(), self.template.name()));
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder.json(RenderedPage {
            template: self.template.name(),
            context: &self.context,
        })
    }
}
