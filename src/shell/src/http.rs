use anyhow::{Context, Result};
use crux_http::{
    HttpError,
    protocol::{HttpRequest, HttpResponse, HttpResult},
};
use log::debug;
use ntrip_duo_core::{BASE_URL, REQUEST_TIMEOUT_MS};
use reqwest::{Client, Method, Url};
use std::time::Duration;

/// Executes the core's HTTP effects against the device
#[derive(Clone, Debug)]
pub struct DeviceClient {
    client: Client,
    base_url: Url,
}

impl DeviceClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .build()
            .context("failed to create device HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Device address for a core request url, which carries the `BASE_URL` placeholder.
    pub fn resolve_url(&self, url: &str) -> Result<Url, HttpError> {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url);
        self.base_url
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// Send `request` and translate the outcome for the core.
    ///
    /// Non-2xx responses are passed through unchanged; the core classifies them.
    pub async fn execute(&self, request: &HttpRequest) -> HttpResult {
        match self.send(request).await {
            Ok(response) => HttpResult::Ok(response),
            Err(e) => HttpResult::Err(e),
        }
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.resolve_url(&request.url)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| HttpError::Io(format!("invalid method {}: {e}", request.method)))?;

        debug!("{method} {url}");

        let mut builder = self.client.request(method, url);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse::status(status).body(body.to_vec()).build())
    }
}

fn transport_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Io(error.to_string())
    }
}
