pub mod auth;
pub mod posts;

use actix_web::{HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::DomainError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, DomainError> {
    Err(DomainError::PageNotFound(req.path().to_string()))
}
