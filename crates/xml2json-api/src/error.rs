use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use xml2json::Category;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method Not Allowed. Only POST is supported.")]
    MethodNotAllowed,

    #[error("Unsupported Media Type. Please send application/xml or text/xml.")]
    UnsupportedMediaType,

    #[error("No XML data provided in the request body.")]
    EmptyBody,

    #[error("Request body is not valid base64.")]
    InvalidBase64,

    #[error("Invalid XML format provided.")]
    InvalidXml(#[source] Option<xml2json::Error>),

    #[error("XML document exceeds the configured limits.")]
    PayloadTooLarge(#[source] Option<xml2json::Error>),

    #[error("Document not found.")]
    DocumentNotFound,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<xml2json::Error> for ApiError {
    fn from(err: xml2json::Error) -> Self {
        match err.category() {
            Category::EmptyInput | Category::MalformedMarkup => Self::InvalidXml(Some(err)),
            Category::ResourceExceeded => Self::PayloadTooLarge(Some(err)),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::EmptyBody | Self::InvalidBase64 | Self::InvalidXml(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DocumentNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Store(_) | Self::Internal(_) => {
                tracing::error!("internal error: {}", self);
                "An internal server error occurred.".to_string()
            }
            Self::InvalidXml(Some(ref err)) | Self::PayloadTooLarge(Some(ref err)) => {
                tracing::warn!(category = %err.category(), "rejected xml: {err}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
