use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::domain::error::DomainError;
use crate::presentation::routes::reverse;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::GroupNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::PageNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::UserAlreadyExists(_) | DomainError::GroupAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            DomainError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            DomainError::LoginRequired { .. } | DomainError::NotAuthor { .. } => StatusCode::FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let redirect = match self {
            DomainError::LoginRequired { next } => Some(reverse::login_with_next(next)),
            DomainError::NotAuthor { post_id } => Some(reverse::post_detail(*post_id)),
            _ => None,
        };
        if let Some(location) = redirect {
            return HttpResponse::Found()
                .insert_header((LOCATION, location))
                .finish();
        }

        // storage details stay in the logs
        let message = match self {
            DomainError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(id) => Some(json!({ "resource": id })),
            DomainError::UserNotFound(name) | DomainError::GroupNotFound(name) => {
                Some(json!({ "resource": name }))
            }
            DomainError::PageNotFound(path) => Some(json!({ "path": path })),
            DomainError::InvalidForm(errors) => Some(json!({ "fields": errors })),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: message.as_str(),
            details,
        })
    }
}
