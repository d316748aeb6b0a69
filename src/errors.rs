use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid form: {0}")]
    Validation(ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Persistence(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Validation(errors) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "message": "Invalid invoice form",
                    "errors": errors
                }))
            }
            AppError::Internal(msg) => {
                log::error!("Request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn validation_error_returns_422_with_field_messages() {
        let mut errors = ValidationErrors::default();
        errors.add("status", "Required");

        let resp = AppError::Validation(errors).error_response();
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
        );

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"]["status"][0], "Required");
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_persistence_maps_to_app_internal() {
        let app_err: AppError = DomainError::Persistence("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn domain_validation_keeps_field_errors() {
        let mut errors = ValidationErrors::default();
        errors.add("amount", "Expected number, received nan");

        let app_err: AppError = DomainError::Validation(errors.clone()).into();
        match app_err {
            AppError::Validation(mapped) => assert_eq!(mapped, errors),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
