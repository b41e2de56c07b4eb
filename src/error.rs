use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Outcome of a failed multimedia operation. The message is what the caller
/// sees; persistence causes are logged where they are converted and never
/// reach the response.
#[derive(Error, Debug)]
pub enum MultimediaError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Persistence(&'static str),
}

impl MultimediaError {
    /// Builds a `map_err` adapter that logs the underlying cause and hides it
    /// behind the generic message of the failing operation.
    pub fn persistence<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |cause| {
            log::error!("{} Cause: {}", message, cause);
            MultimediaError::Persistence(message)
        }
    }
}

impl ResponseError for MultimediaError {
    fn status_code(&self) -> StatusCode {
        match self {
            MultimediaError::Validation(_) => StatusCode::BAD_REQUEST,
            MultimediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MultimediaError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "Error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(MultimediaError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MultimediaError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            MultimediaError::Persistence("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn persistence_cause_never_reaches_the_body() {
        let error = MultimediaError::persistence("Fallo genérico.")("disk I/O error: /var/db/secret.db");
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value, json!({ "Error": "Fallo genérico." }));
    }
}
