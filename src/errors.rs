//! Error handling for the web views
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::table::TableKind;

#[derive(Debug)]
pub enum ApiError {
    HTTPError(axum::http::Error),
    TemplateError(askama::Error),
    UploadError(MultipartError),
    CsvError(TableKind, csv::Error),
    MissingColumn { kind: TableKind, column: String },
    MissingUploadField,
    NoResults,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::HTTPError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("HTTP error: {e}"),
            )
                .into_response(),
            Self::TemplateError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {e}"),
            )
                .into_response(),
            Self::UploadError(e) => (e.status(), format!("Upload error: {}", e.body_text()))
                .into_response(),
            Self::CsvError(kind, e) => (
                StatusCode::BAD_REQUEST,
                format!("Could not read the {kind}: {e}"),
            )
                .into_response(),
            Self::MissingColumn { kind, column } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("The {kind} is missing the required column '{column}'"),
            )
                .into_response(),
            Self::MissingUploadField => (
                StatusCode::BAD_REQUEST,
                "No file was attached to the upload".to_string(),
            )
                .into_response(),
            Self::NoResults => (
                StatusCode::NOT_FOUND,
                "Please upload your mock test first!".to_string(),
            )
                .into_response(),
        }
    }
}

impl From<axum::http::Error> for ApiError {
    fn from(e: axum::http::Error) -> Self {
        Self::HTTPError(e)
    }
}

impl From<askama::Error> for ApiError {
    fn from(e: askama::Error) -> Self {
        Self::TemplateError(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::UploadError(e)
    }
}
