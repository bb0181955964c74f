use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use database::DbError;
use listings::ListingError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Listing(ListingError::NotFound { kind, id }) => {
                (StatusCode::NOT_FOUND, format!("No {kind} with id {id}"))
            }
            AppError::Listing(ListingError::Persistence(db_err)) | AppError::Database(db_err) => {
                return database_response(db_err);
            }
            AppError::Listing(err @ ListingError::DanglingReference { .. }) => {
                tracing::error!(error = %err, "Catalog integrity error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The catalog is inconsistent".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

fn database_response(db_err: DbError) -> Response {
    let (status, error_message) = match db_err {
        DbError::InvalidReference(kind, id) => (
            StatusCode::BAD_REQUEST,
            format!("Referenced {kind} {id} does not exist"),
        ),
        other => {
            tracing::error!(error = ?other, "Database error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal database error occurred".to_string(),
            )
        }
    };
    (status, Json(json!({ "error": error_message }))).into_response()
}
