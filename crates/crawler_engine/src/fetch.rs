use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crawler_core::{TransferFailure, DEFAULT_GROWTH_INCREMENT, DEFAULT_INITIAL_CAPACITY};

use crate::CrawlError;

pub const DEFAULT_USER_AGENT: &str = "findpng-crawler/0.1";

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub user_agent: String,
    pub redirect_limit: usize,
    /// Per-transfer deadline; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Keep one cookie jar for the whole run.
    pub cookie_store: bool,
    pub initial_buffer_capacity: usize,
    pub buffer_increment: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            redirect_limit: 5,
            request_timeout: None,
            cookie_store: true,
            initial_buffer_capacity: DEFAULT_INITIAL_CAPACITY,
            buffer_increment: DEFAULT_GROWTH_INCREMENT,
        }
    }
}

pub type BodyStream = BoxStream<'static, Result<Bytes, TransferFailure>>;

/// Response headers of a GET, with the body still to be streamed.
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub effective_url: String,
    pub body: BodyStream,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("effective_url", &self.effective_url)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransferFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(settings: &TransferSettings) -> Result<Self, CrawlError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .cookie_store(settings.cookie_store)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .zstd(true);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CrawlError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransferFailure> {
        let parsed =
            reqwest::Url::parse(url).map_err(|err| TransferFailure::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let effective_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_body_error))
            .boxed();

        Ok(HttpResponse {
            status,
            content_type,
            effective_url,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransferFailure {
    if err.is_timeout() {
        return TransferFailure::Timeout;
    }
    if err.is_redirect() {
        return TransferFailure::TooManyRedirects;
    }
    TransferFailure::Network(err.to_string())
}

fn map_body_error(err: reqwest::Error) -> TransferFailure {
    if err.is_timeout() {
        return TransferFailure::Timeout;
    }
    TransferFailure::Body(err.to_string())
}
