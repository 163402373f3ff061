use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

pub const DOCUMENT_ID: HeaderName = HeaderName::from_static("x-document-id");

const ACCEPTED_TYPES: [&str; 2] = ["application/xml", "text/xml"];

/// Convert an XML request body to a JSON document
pub async fn convert(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let content_type = header_str(&headers, header::CONTENT_TYPE.as_str()).to_ascii_lowercase();
    tracing::info!(content_type = %content_type, "received convert request");

    if !ACCEPTED_TYPES.iter().any(|accepted| content_type.contains(accepted)) {
        tracing::warn!("unsupported content type: {content_type}");
        return Err(ApiError::UnsupportedMediaType);
    }

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(None)
        } else {
            ApiError::Internal(rejection.body_text())
        }
    })?;
    if body.is_empty() {
        tracing::error!("no xml data found in request body");
        return Err(ApiError::EmptyBody);
    }

    let xml = decode_body(&headers, &body)?;

    let options = Arc::clone(&state.options);
    let style = state.style;
    let (value, output) = tokio::task::spawn_blocking(move || {
        let value = xml2json::convert_with_options(&xml, &options)?;
        let output = xml2json::json::to_string(&value, style);
        Ok::<_, xml2json::Error>((value, output))
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))??;
    tracing::info!(bytes = output.len(), "xml successfully converted to json");

    let document_id = match &state.store {
        Some(store) => Some(store.put(value)?),
        None => None,
    };

    let mut response = json_response(StatusCode::OK, output);
    if let Some(id) = document_id {
        tracing::debug!(%id, "stored converted document");
        let value = HeaderValue::from_str(&id.to_string())
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        response.headers_mut().insert(DOCUMENT_ID, value);
    }
    Ok(response)
}

/// Fallback for every method `/api/convert` does not route
pub async fn method_not_allowed(method: Method) -> ApiError {
    tracing::warn!("unsupported http method: {method}");
    ApiError::MethodNotAllowed
}

/// Fetch a previously converted document from the store
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(store) = &state.store else {
        return Err(ApiError::DocumentNotFound);
    };
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::DocumentNotFound)?;
    let value = store.get(&id)?.ok_or(ApiError::DocumentNotFound)?;

    Ok(json_response(
        StatusCode::OK,
        xml2json::json::to_string(&value, state.style),
    ))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<String> {
    let encoding = header_str(headers, "content-transfer-encoding");
    let bytes = if encoding.trim().eq_ignore_ascii_case("base64") {
        let compact: Vec<u8> = body
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(compact)
            .map_err(|_| ApiError::InvalidBase64)?
    } else {
        body.to_vec()
    };

    if bytes.is_empty() {
        return Err(ApiError::EmptyBody);
    }
    String::from_utf8(bytes).map_err(|_| ApiError::InvalidXml(None))
}
