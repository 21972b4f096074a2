//! The single seam between the API client and the network.

use std::{fmt, time::Duration};

use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::{closure::Closure, JsCast};

use crate::{config::ApiConfig, error::ApiError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A request relative to the API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path below the base URL, e.g. `transactions/12/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one request. Any response, whatever its status, is `Ok`;
/// `Err` means no response arrived.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `fetch` through `gloo-net`, aborted once the configured timeout passes.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    config: ApiConfig,
}

impl GlooTransport {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn builder(&self, request: &HttpRequest) -> RequestBuilder {
        let url = self.config.url_for(&request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };

        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(
                request
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
        };

        match &request.bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }
}

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let window =
            web_sys::window().ok_or_else(|| ApiError::Network("no browser window".to_string()))?;
        let controller = web_sys::AbortController::new()
            .map_err(|_| ApiError::Network("could not create abort controller".to_string()))?;
        let signal = controller.signal();

        let abort = Closure::wrap(Box::new(move || controller.abort()) as Box<dyn FnMut()>);
        let timeout_ms = i32::try_from(self.config.timeout.as_millis()).unwrap_or(i32::MAX);
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                abort.as_ref().unchecked_ref(),
                timeout_ms,
            )
            .map_err(|_| ApiError::Network("could not start request timer".to_string()))?;

        // The timer stays armed until the body has been read, so a server
        // that stalls mid-body is cut off too.
        let exchanged = self.exchange(&request, &signal).await;
        window.clear_timeout_with_handle(timer);
        drop(abort);

        exchanged
    }
}

impl GlooTransport {
    async fn exchange(
        &self,
        request: &HttpRequest,
        signal: &web_sys::AbortSignal,
    ) -> Result<HttpResponse, ApiError> {
        let builder = self.builder(request).abort_signal(Some(signal));
        let sent = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|error| ApiError::Encode(error.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response =
            sent.map_err(|error| network_failure(signal.aborted(), self.config.timeout, error))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| network_failure(signal.aborted(), self.config.timeout, error))?;

        Ok(HttpResponse { status, body })
    }
}

/// A fetch that failed after the abort signal fired timed out; anything
/// else keeps the browser's message.
fn network_failure(aborted: bool, timeout: Duration, error: impl fmt::Display) -> ApiError {
    if aborted {
        ApiError::Network(format!("request timed out after {} ms", timeout.as_millis()))
    } else {
        ApiError::Network(error.to_string())
    }
}
