use actix_web::{
    error::BlockingError,
    http::StatusCode,
    HttpResponse, ResponseError,
};
use actix_web_httpauth::headers::www_authenticate::{basic::Basic, WwwAuthenticate};
use log::error;

use crate::models::{payment::FieldErrors, StatusMessage};

pub const NOT_FOUND_MESSAGE: &str = "No Payment matches the given query.";
pub const ADMIN_REALM: &str = "payment-admin";

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),
    #[error("Database query error: {0}")]
    Query(#[from] diesel::result::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Couldn't store receipt: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum PoolSetupError {
    #[error("Couldn't open database: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Couldn't apply migrations: {0}")]
    Migration(String),
}

/// Every failure a handler can produce, already sorted into the HTTP status it maps to.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Invalid payment submission")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    #[error("Authentication credentials were not provided or are invalid.")]
    Unauthorized,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Background task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Repo(_) | ApiError::Storage(_) | ApiError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => HttpResponse::BadRequest().json(errors),
            ApiError::Unauthorized => HttpResponse::Unauthorized()
                .insert_header(WwwAuthenticate(Basic::with_realm(ADMIN_REALM)))
                .json(StatusMessage::failure(self.to_string())),
            ApiError::Repo(_) | ApiError::Storage(_) | ApiError::Blocking(_) => {
                // internals stay in the log, the client only gets a generic message
                error!("{self}");
                HttpResponse::InternalServerError()
                    .json(StatusMessage::failure("Internal server error".to_owned()))
            }
            _ => HttpResponse::build(self.status_code())
                .json(StatusMessage::failure(self.to_string())),
        }
    }
}
