//! HTTP helper functions for Crux Core
//!
//! This module extracts common HTTP response handling logic from macros
//! into debuggable, testable functions.

use crux_http::{HttpError, Response};

use crate::types::RequestError;

/// Base URL for device API endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// Shells strip this prefix before sending: the browser shell sends the
/// request relative to the page, the console shell joins it to the device URL.
pub const BASE_URL: &str = "https://relative";

/// Client-side bound for every device request.
///
/// Enforced by the shell per request; a request exceeding it resolves with
/// `HttpError::Timeout`.
pub const REQUEST_TIMEOUT_MS: u64 = 2000;

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use ntrip_duo_core::http_helpers::build_url;
/// let url = build_url("/status");
/// assert_eq!(url, "https://relative/status");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Turns a non-success response into `RequestError::HttpStatus`.
pub fn extract_error(response: &mut Response<Vec<u8>>) -> RequestError {
    let status = response.status().to_string();
    let message = response
        .take_body()
        .map(|body| String::from_utf8_lossy(&body).trim().to_string())
        .unwrap_or_default();

    RequestError::HttpStatus { status, message }
}

/// Parse JSON from response body.
///
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: &mut Response<Vec<u8>>,
) -> Result<T, RequestError> {
    if !is_response_success(response) {
        return Err(extract_error(response));
    }

    match response.take_body() {
        Some(body) => {
            serde_json::from_slice(&body).map_err(|e| RequestError::InvalidBody(e.to_string()))
        }
        None => Err(RequestError::InvalidBody("empty response body".to_string())),
    }
}

/// Check response status only (no body parsing).
pub fn check_response_status(response: &mut Response<Vec<u8>>) -> Result<(), RequestError> {
    if is_response_success(response) {
        Ok(())
    } else {
        Err(extract_error(response))
    }
}

/// Classify a transport-level `crux_http` error.
pub fn map_http_error(error: HttpError) -> RequestError {
    match error {
        HttpError::Timeout => RequestError::Timeout,
        HttpError::Http { code, message, .. } => RequestError::HttpStatus {
            status: code.to_string(),
            message,
        },
        HttpError::Json(reason) => RequestError::InvalidBody(reason),
        other => RequestError::NetworkUnavailable(other.to_string()),
    }
}

/// Process HTTP response result and check status only (no JSON parsing)
pub fn process_status_response(
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<(), RequestError> {
    match result {
        Ok(mut response) => check_response_status(&mut response),
        Err(e) => Err(map_http_error(e)),
    }
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, RequestError> {
    match result {
        Ok(mut response) => parse_json_response(&mut response),
        Err(e) => Err(map_http_error(e)),
    }
}

/// Handle request creation error - sets error message and returns render command
///
/// This is used when building an HTTP request fails (e.g., JSON serialization error).
pub fn handle_request_error<M, E>(
    model: &mut M,
    action: &str,
    error: impl std::fmt::Display,
) -> crux_core::Command<crate::Effect, E>
where
    M: crate::model::ModelErrorHandler,
    E: Send + 'static,
{
    model.set_error(format!("Failed to create {action} request: {error}"));
    crux_core::render::render()
}
