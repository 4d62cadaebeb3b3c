//! HTTP client for the Samanage API.
//!
//! This module provides the `SamanageClient` struct for making
//! Digest-authenticated requests against the Samanage REST endpoints and
//! mapping the JSON responses into [`Record`]s.
//!
//! # Outcomes
//!
//! Every call resolves to an [`ApiResponse`]. A status outside the accepted
//! range is logged at error level and returned as [`ApiResponse::Failed`],
//! not as an `Err`. `Err` is reserved for problems caught before the request
//! is sent (unsupported resource type, bad id) and for transport failures.
//!
//! No retries are attempted.
//!
//! # Security
//!
//! The password is never logged. Failed response bodies are sanitized
//! before logging.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use digest_auth::{AuthContext, HttpMethod, WwwAuthenticateHeader};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE,
};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::Instrument;
use url::Url;

use crate::config::Config;
use crate::error::SamanageError;
use crate::models::{Hardware, Record, ResourceType};

/// The Accept header value for Samanage API v1.2.
pub const SAMANAGE_ACCEPT_HEADER: &str = "application/vnd.samanage.v1.2+json";

/// Page size used when the caller does not set one.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Outcome of a single API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The response body held one record (object) or many (array).
    Records(Vec<Record>),

    /// The call succeeded and the server sent no body.
    Accepted,

    /// The server answered with a status outside the accepted range.
    Failed {
        /// The HTTP status code returned.
        status: StatusCode,
        /// The response body, as text.
        body: String,
    },
}

impl ApiResponse {
    /// Returns true for `Records` and `Accepted`.
    pub fn is_success(&self) -> bool {
        !matches!(self, ApiResponse::Failed { .. })
    }

    /// Returns the parsed records; empty unless this is `Records`.
    pub fn records(&self) -> &[Record] {
        match self {
            ApiResponse::Records(records) => records,
            _ => &[],
        }
    }

    /// Consumes the response, returning the parsed records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            ApiResponse::Records(records) => records,
            _ => Vec::new(),
        }
    }
}

/// Digest credentials plus the last challenge the server sent.
///
/// Once a challenge is cached, every request answers it up front, so only
/// the first request of a session (or one after the nonce goes stale) pays
/// for the 401 round trip.
#[derive(Clone)]
struct DigestSession {
    username: String,
    password: String,
    challenge: Arc<Mutex<Option<WwwAuthenticateHeader>>>,
}

impl DigestSession {
    fn new(config: &Config) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password().to_string(),
            challenge: Arc::new(Mutex::new(None)),
        }
    }

    /// Builds the `Authorization` value for a request, if a challenge is cached.
    fn authorization(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<Option<String>, SamanageError> {
        let mut guard = self
            .challenge
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(challenge) = guard.as_mut() else {
            return Ok(None);
        };

        let context = AuthContext::new_with_method(
            self.username.as_str(),
            self.password.as_str(),
            request_target(url),
            body,
            HttpMethod::from(method.as_str()),
        );

        Ok(Some(challenge.respond(&context)?.to_header_string()))
    }

    /// Parses and caches a `WWW-Authenticate` challenge.
    fn accept_challenge(&self, header: &str) -> Result<(), SamanageError> {
        let challenge = digest_auth::parse(header)?;
        *self
            .challenge
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(challenge);
        Ok(())
    }
}

/// The path and query of a URL, as used in the Digest `uri` field.
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Returns the Digest challenge from a 401 response, if there is one.
fn digest_challenge(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| {
            value
                .get(..6)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
        })
        .map(str::to_string)
}

/// Statuses treated as success.
fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// HTTP client for the Samanage API.
///
/// Holds one persistent connection pool with the vendor headers set, the
/// Digest session, and the tracing span every request runs in.
///
/// # Example
///
/// ```ignore
/// let config = Config::new("admin@example.com", "secret", DEFAULT_BASE_URL)?;
/// let client = SamanageClient::new(&config)?;
///
/// let response = client.get("hardwares", None, &ListParams::new()).await?;
/// for record in response.records() {
///     println!("{}", record);
/// }
/// ```
#[derive(Clone)]
pub struct SamanageClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL for the API, without a trailing slash.
    base_url: String,

    /// Transport timeout, reported in timeout errors.
    timeout: Duration,

    auth: DigestSession,

    /// Span carrying the base URL; every request is instrumented with it.
    span: tracing::Span,
}

impl SamanageClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, SamanageError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SAMANAGE_ACCEPT_HEADER));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(SamanageError::HttpClient)?;

        let span = tracing::info_span!("samanage", base_url = %config.base_url);
        span.in_scope(|| tracing::debug!(username = %config.username, "client created"));

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            auth: DigestSession::new(config),
            span,
        })
    }

    /// Validates that an ID is a numeric string.
    ///
    /// Samanage uses integer IDs for all entities. This also prevents path
    /// traversal via malformed IDs interpolated into URLs.
    fn validate_id(id: &str) -> Result<(), SamanageError> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SamanageError::validation(format!(
                "id must be an integer, got: {:?}",
                id.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Rejects a record whose variant belongs to another resource type.
    ///
    /// Generic records carry no type and may be written anywhere.
    fn check_record_kind(kind: ResourceType, record: &Record) -> Result<(), SamanageError> {
        match record.resource_type() {
            Some(actual) if actual != kind => Err(SamanageError::validation(format!(
                "cannot write a {} record to {}",
                actual.singular(),
                kind
            ))),
            _ => Ok(()),
        }
    }

    fn join(&self, path: &str) -> Result<Url, SamanageError> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    fn resource_url(&self, kind: ResourceType, id: Option<&str>) -> Result<Url, SamanageError> {
        let path = match id {
            Some(id) => {
                Self::validate_id(id)?;
                format!("{}/{}.json", kind, id)
            }
            None => format!("{}.json", kind),
        };
        self.join(&path)
    }

    /// Builds `{base}/{resource_type}.json` or `{base}/{resource_type}/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::UnsupportedResourceType` for an endpoint outside
    /// the registry and `SamanageError::Validation` for a non-numeric id.
    pub fn uri(&self, resource_type: &str, id: Option<&str>) -> Result<Url, SamanageError> {
        self.resource_url(resource_type.parse()?, id)
    }

    /// Builds the URI for a read, with `per_page`, `page` and search pairs
    /// appended as the query string.
    pub fn get_uri(
        &self,
        resource_type: &str,
        id: Option<&str>,
        params: &ListParams,
    ) -> Result<Url, SamanageError> {
        let mut url = self.uri(resource_type, id)?;
        url.query_pairs_mut().extend_pairs(params.query_pairs());
        Ok(url)
    }

    /// Fetches one record (with `id`) or a page of records (without).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let params = ListParams::new().with_per_page(50).with_filter("name", "web01");
    /// let response = client.get("hardwares", None, &params).await?;
    /// ```
    pub async fn get(
        &self,
        resource_type: &str,
        id: Option<&str>,
        params: &ListParams,
    ) -> Result<ApiResponse, SamanageError> {
        let kind: ResourceType = resource_type.parse()?;
        let url = self.get_uri(resource_type, id, params)?;
        self.request(Method::GET, url, Some(kind), None).await
    }

    /// Updates the record with `id`, sending the sparse form of `record`
    /// wrapped under the resource's singular key.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` before any request if `id` is not
    /// an integer or `record` is a variant of another resource type.
    pub async fn put(
        &self,
        resource_type: &str,
        record: &Record,
        id: &str,
    ) -> Result<ApiResponse, SamanageError> {
        let kind: ResourceType = resource_type.parse()?;
        Self::check_record_kind(kind, record)?;
        let url = self.resource_url(kind, Some(id))?;
        let payload = record.to_payload(kind)?;
        self.request(Method::PUT, url, Some(kind), Some(payload))
            .await
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` before any request if `record` is
    /// a variant of another resource type.
    pub async fn post(
        &self,
        resource_type: &str,
        record: &Record,
    ) -> Result<ApiResponse, SamanageError> {
        let kind: ResourceType = resource_type.parse()?;
        Self::check_record_kind(kind, record)?;
        let url = self.resource_url(kind, None)?;
        let payload = record.to_payload(kind)?;
        self.request(Method::POST, url, Some(kind), Some(payload))
            .await
    }

    /// Deletes the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` before any request if `id` is not
    /// an integer.
    pub async fn delete(&self, resource_type: &str, id: &str) -> Result<ApiResponse, SamanageError> {
        let kind: ResourceType = resource_type.parse()?;
        let url = self.resource_url(kind, Some(id))?;
        self.request(Method::DELETE, url, Some(kind), None).await
    }

    /// Fetches an arbitrary path below the base URL.
    ///
    /// The response is parsed as the variant registered for the last path
    /// segment (`.../incidents.json` parses as incidents), falling back to
    /// generic records.
    pub async fn fetch_path(
        &self,
        path: &str,
        params: &ListParams,
    ) -> Result<ApiResponse, SamanageError> {
        let path = path.trim_start_matches('/');
        let mut url = self.join(path)?;
        url.query_pairs_mut().extend_pairs(params.query_pairs());

        let kind = path
            .rsplit('/')
            .next()
            .map(|segment| segment.trim_end_matches(".json"))
            .and_then(|endpoint| endpoint.parse().ok());

        self.request(Method::GET, url, kind, None).await
    }

    /// Lists the incidents attached to a hardware asset.
    pub async fn get_hardware_incidents(
        &self,
        hardware: &Hardware,
        params: &ListParams,
    ) -> Result<ApiResponse, SamanageError> {
        let path = hardware.incidents_path()?;
        self.fetch_path(&path, params).await
    }

    /// Makes a request inside the client's span.
    async fn request(
        &self,
        method: Method,
        url: Url,
        kind: Option<ResourceType>,
        payload: Option<Value>,
    ) -> Result<ApiResponse, SamanageError> {
        self.request_inner(method, url, kind, payload)
            .instrument(self.span.clone())
            .await
    }

    /// Sends the request, interprets the status and maps the body.
    async fn request_inner(
        &self,
        method: Method,
        url: Url,
        kind: Option<ResourceType>,
        payload: Option<Value>,
    ) -> Result<ApiResponse, SamanageError> {
        let body = payload.map(|p| serde_json::to_vec(&p)).transpose()?;

        tracing::debug!(method = %method, uri = %url, "fetching uri");

        let response = self.send(method, &url, body.as_deref()).await?;
        let status = response.status();
        let text = response.text().await.map_err(SamanageError::Http)?;

        if !is_accepted(status) {
            let text = SamanageError::sanitize_message(&text, &self.auth.password);
            tracing::error!(
                status = status.as_u16(),
                "HTTP {}:{}",
                status.as_u16(),
                text
            );
            return Ok(ApiResponse::Failed { status, body: text });
        }

        parse_body(kind, &text)
    }

    /// Sends a request, answering a Digest challenge once if the server
    /// issues one.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<reqwest::Response, SamanageError> {
        let response = self.dispatch(method.clone(), url, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(challenge) = digest_challenge(response.headers()) else {
            return Ok(response);
        };

        tracing::debug!("answering digest challenge");
        self.auth.accept_challenge(&challenge)?;
        self.dispatch(method, url, body).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<reqwest::Response, SamanageError> {
        let mut req = self.http.request(method.clone(), url.clone());

        if let Some(authorization) = self.auth.authorization(&method, url, body)? {
            req = req.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            req = req.body(body.to_vec());
        }

        req.send().await.map_err(|e| {
            if e.is_timeout() {
                return SamanageError::timeout(self.timeout, format!("{} {}", method, url.path()));
            }
            SamanageError::Http(e)
        })
    }
}

/// Maps an accepted response body onto records.
///
/// An empty body (or a bare `""`/`null`) means the call succeeded without
/// returning data. Array elements that are not objects are skipped with a
/// warning; the rest of the page is kept.
fn parse_body(kind: Option<ResourceType>, text: &str) -> Result<ApiResponse, SamanageError> {
    if text.trim().is_empty() {
        return Ok(ApiResponse::Accepted);
    }

    let json: Value = serde_json::from_str(text)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("{}", serde_json::to_string_pretty(&json)?);
    }

    match json {
        Value::Null => Ok(ApiResponse::Accepted),
        Value::String(s) if s.is_empty() => Ok(ApiResponse::Accepted),
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                if !item.is_object() {
                    tracing::warn!(index, element = %item, "skipping non-object element");
                    continue;
                }
                records.push(Record::parse_as(kind, item)?);
            }
            Ok(ApiResponse::Records(records))
        }
        other => Ok(ApiResponse::Records(vec![Record::parse_as(kind, other)?])),
    }
}

/// Query parameters for reads.
///
/// Every call builds its own value, so filters never leak between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    /// Page size; [`DEFAULT_PER_PAGE`] when unset.
    per_page: Option<u32>,

    /// 1-based page number; omitted from the query when unset.
    page: Option<u32>,

    /// Search pairs, sent as-is in insertion order.
    search: Vec<(String, String)>,
}

impl ListParams {
    /// Creates parameters with the default page size and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Selects a page. Pages are not traversed automatically.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Adds a search key/value pair.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search.push((key.into(), value.into()));
        self
    }

    /// Adds every pair of a JSON object as search filters.
    ///
    /// String values are used as-is; other values use their JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` if `json` is not a JSON object.
    pub fn with_search_json(mut self, json: &str) -> Result<Self, SamanageError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SamanageError::validation(format!("search filter is not JSON: {}", e)))?;
        let Value::Object(filters) = value else {
            return Err(SamanageError::validation(
                "search filter must be a JSON object",
            ));
        };

        for (key, value) in filters {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.search.push((key, value));
        }
        Ok(self)
    }

    /// Returns the effective page size.
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Returns the query pairs in the order they are sent.
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("per_page".to_string(), self.per_page().to_string())];
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.extend(self.search.iter().cloned());
        pairs
    }
}
