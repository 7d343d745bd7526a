//! JobTech JobSearch API client.
//!
//! ### Endpoints
//!
//! - `GET {base}/search?<params>` returns `{ total: {value}, hits: [ad...] }`
//! - `GET {base}/ad/{id}` returns a single ad; 404 means the ad is unknown
//!
//! ### Authentication
//!
//! The public API works without a key. When one is configured it is sent in
//! the configured header (`X-API-Key` by default).

pub mod error;
pub mod request;
pub mod response;

pub use error::JobtechError;
pub use request::{SearchFilters, SearchParams};
pub use response::SearchResponse;

use async_trait::async_trait;
use jobswipe_core::{AppConfig, JobAd};
use reqwest::StatusCode;
use reqwest::header::{self, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default base URL for the JobSearch API.
const DEFAULT_BASE_URL: &str = "https://jobsearch.api.jobtechdev.se";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "jobswipe/0.1";

/// Longest upstream error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Source of job ads.
///
/// The cache-aside service only talks to upstream through this trait, so it
/// can be driven by a scripted source in tests.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Run a search with an already built parameter set.
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, JobtechError>;

    /// Fetch a single ad by id.
    async fn fetch_ad(&self, id: &str) -> Result<JobAd, JobtechError>;
}

/// JobTech client configuration.
#[derive(Debug, Clone)]
pub struct JobtechConfig {
    /// Base URL (default: https://jobsearch.api.jobtechdev.se).
    pub base_url: String,
    /// Optional API key and the header it is sent in.
    pub api_key: Option<(String, String)>,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: jobswipe/0.x).
    pub user_agent: String,
}

impl Default for JobtechConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for JobtechConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.jobtech_base_url.clone(),
            api_key: config
                .jobtech_api_key_pair()
                .map(|(name, value)| (name.to_string(), value.to_string())),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// JobSearch API client.
#[derive(Debug, Clone)]
pub struct JobtechClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<(HeaderName, HeaderValue)>,
    config: JobtechConfig,
}

impl JobtechClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JobtechConfig) -> Result<Self, JobtechError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| JobtechError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(JobtechError::InvalidUrl(config.base_url.clone()));
        }

        let api_key = config.api_key.as_ref().map(|(name, value)| parse_api_key(name, value)).transpose()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| JobtechError::Network(Arc::new(e)))?;

        Ok(Self { http, base_url, api_key, config })
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, JobtechError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| JobtechError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.get(url).header(header::ACCEPT, "application/json");
        match &self.api_key {
            Some((name, value)) => builder.header(name.clone(), value.clone()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body.
    ///
    /// `not_found` is returned instead of a generic HTTP error on 404.
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self, request: reqwest::RequestBuilder, not_found: Option<JobtechError>,
    ) -> Result<T, JobtechError> {
        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(%status, elapsed = ?start.elapsed(), "JobSearch API response");

        if status == StatusCode::NOT_FOUND
            && let Some(err) = not_found
        {
            return Err(err);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match body.trim() {
                "" => "unknown error".to_string(),
                text => text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            };
            return Err(JobtechError::HttpError { status: status.as_u16(), message });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| JobtechError::Parse(e.to_string()))
    }
}

/// Parse the configured key header up front so requests cannot fail on it.
fn parse_api_key(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), JobtechError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| JobtechError::InvalidHeader(format!("'{name}' is not a valid header name")))?;
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| JobtechError::InvalidHeader(format!("value for '{name}' is not valid")))?;
    value.set_sensitive(true);
    Ok((name, value))
}

#[async_trait]
impl JobSource for JobtechClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, JobtechError> {
        let url = self.endpoint(&["search"])?;
        tracing::debug!(params = ?params.pairs(), "searching JobSearch API");

        let response: SearchResponse = self.fetch_json(self.get(url).query(params.pairs()), None).await?;

        tracing::debug!(hits = response.hits.len(), total = response.total_or_hits(), "search completed");
        Ok(response)
    }

    async fn fetch_ad(&self, id: &str) -> Result<JobAd, JobtechError> {
        let url = self.endpoint(&["ad", id])?;
        tracing::debug!(id, "fetching ad from JobSearch API");

        self.fetch_json(self.get(url), Some(JobtechError::NotFound(id.to_string())))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base, handle)
    }

    fn client(base_url: &str, api_key: Option<(&str, &str)>) -> JobtechClient {
        JobtechClient::new(JobtechConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(|(k, v)| (k.to_string(), v.to_string())),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let result = JobtechClient::new(JobtechConfig { base_url: "not a url".into(), ..Default::default() });
        assert!(matches!(result, Err(JobtechError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_rejects_bad_api_key_header() {
        let result = JobtechClient::new(JobtechConfig {
            api_key: Some(("X Api Key".into(), "k".into())),
            ..Default::default()
        });
        assert!(matches!(result, Err(JobtechError::InvalidHeader(msg)) if msg.contains("X Api Key")));

        let result = JobtechClient::new(JobtechConfig {
            api_key: Some(("X-API-Key".into(), "line\nbreak".into())),
            ..Default::default()
        });
        assert!(matches!(result, Err(JobtechError::InvalidHeader(_))));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://jobsearch.example/v1/", None);
        let url = client.endpoint(&["ad", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://jobsearch.example/v1/ad/a%20b%2Fc");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { jobtech_api_key: Some("k".into()), timeout_ms: 1_500, ..Default::default() };
        let config = JobtechConfig::from(&app);
        assert_eq!(config.api_key, Some(("X-API-Key".to_string(), "k".to_string())));
        assert_eq!(config.timeout, Duration::from_millis(1_500));
        assert_eq!(config.base_url, "https://jobsearch.api.jobtechdev.se");
    }

    #[tokio::test]
    async fn test_search_sends_params_and_key() {
        let (base, server) = serve_once("200 OK", r#"{"total":{"value":7},"hits":[{"id":"a"}]}"#).await;
        let client = client(&base, Some(("X-API-Key", "secret")));
        let params = SearchParams::from_pairs(vec![("q".into(), "rust dev".into()), ("limit".into(), "5".into())]);

        let response = client.search(&params).await.unwrap();
        assert_eq!(response.total_or_hits(), 7);
        assert_eq!(response.job_ids(), vec!["a"]);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /search?q=rust+dev&limit=5 "), "{request}");
        assert!(request.contains("x-api-key: secret"));
        assert!(request.contains("accept: application/json"));
        assert!(request.contains("user-agent: jobswipe/0.1"));
    }

    #[tokio::test]
    async fn test_fetch_ad_not_found() {
        let (base, server) = serve_once("404 Not Found", r#"{"message":"Ad not found"}"#).await;
        let client = client(&base, None);

        let result = client.fetch_ad("abc").await;
        assert!(matches!(result, Err(JobtechError::NotFound(id)) if id == "abc"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /ad/abc "), "{request}");
        assert!(!request.to_lowercase().contains("x-api-key"));
    }

    #[tokio::test]
    async fn test_search_http_error_keeps_body() {
        let (base, _server) = serve_once("503 Service Unavailable", "down for maintenance").await;
        let client = client(&base, None);

        let result = client.search(&SearchParams::default()).await;
        assert!(matches!(
            result,
            Err(JobtechError::HttpError { status: 503, message }) if message == "down for maintenance"
        ));
    }

    #[tokio::test]
    async fn test_search_404_is_generic_http_error() {
        let (base, _server) = serve_once("404 Not Found", "").await;
        let client = client(&base, None);

        let result = client.search(&SearchParams::default()).await;
        assert!(matches!(result, Err(JobtechError::HttpError { status: 404, message }) if message == "unknown error"));
    }

    #[tokio::test]
    async fn test_fetch_ad_parse_error() {
        let (base, _server) = serve_once("200 OK", "[not an ad]").await;
        let client = client(&base, None);

        let result = client.fetch_ad("abc").await;
        assert!(matches!(result, Err(JobtechError::Parse(_))));
    }

    #[tokio::test]
    async fn test_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let result = client(&base, None).fetch_ad("abc").await;
        assert!(matches!(result, Err(JobtechError::Network(_))));
    }
}
