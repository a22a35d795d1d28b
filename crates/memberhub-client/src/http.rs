//! Shared HTTP plumbing for every domain service.

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use memberhub_core::config::api::ApiConfig;
use memberhub_core::error::{AppError, ErrorKind};
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ApiErrorResponse, PageEnvelope, SearchRequest, SearchResponse};
use memberhub_entity::claim::DocumentUpload;
use memberhub_entity::validation::validate_payload;

/// Thin JSON client for the administration API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpService {
    /// Pooled HTTP client.
    client: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Bearer token attached to every request.
    auth_token: Option<String>,
}

impl HttpService {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Absolute URL for a relative API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET a resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.url(path);
        self.send(Method::GET, &url, self.request(Method::GET, &url))
            .await
    }

    /// POST a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// PATCH a JSON body (partial update).
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// PUT a JSON body (full replacement).
    pub async fn put<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// DELETE a resource, ignoring any response body.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let url = self.url(path);
        let _: serde_json::Value = self
            .send(Method::DELETE, &url, self.request(Method::DELETE, &url))
            .await?;
        Ok(())
    }

    /// POST a [`SearchRequest`] and normalize whichever envelope comes back.
    pub async fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &SearchRequest,
    ) -> AppResult<SearchResponse<T>> {
        request.validate()?;
        let envelope: PageEnvelope<T> = self.post(path, request).await?;
        Ok(envelope.into_response(request.page, request.page_size))
    }

    /// Upload a document as multipart form data.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: &DocumentUpload,
    ) -> AppResult<T> {
        validate_payload(upload)?;

        let file = Part::bytes(upload.content.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| AppError::validation(format!("Invalid MIME type: {e}")))?;

        let form = Form::new()
            .text("documentType", upload.document_type.as_str())
            .text("documentName", upload.document_name.clone())
            .text("mimeType", upload.mime_type.clone())
            .part("file", file);

        let url = self.url(path);
        self.send(
            Method::POST,
            &url,
            self.request(Method::POST, &url).multipart(form),
        )
        .await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let builder = self.request(method.clone(), &url).json(body);
        self.send(method, &url, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        builder: RequestBuilder,
    ) -> AppResult<T> {
        let started = Instant::now();
        debug!(%method, url, "Sending API request");

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        debug!(
            %method,
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response received"
        );

        decode(status, response).await
    }
}

async fn decode<T: DeserializeOwned>(status: StatusCode, response: Response) -> AppResult<T> {
    let body = response.bytes().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(error_from_response(status, &body));
    }

    if body.is_empty() {
        return serde_json::from_slice(b"null").map_err(AppError::from);
    }
    serde_json::from_slice(&body).map_err(AppError::from)
}

/// Map a non-success response onto an [`AppError`].
///
/// Business-rule codes in `400`/`409`/`422` bodies become
/// [`ErrorKind::Business`]; everything else follows the status code.
pub fn error_from_response(status: StatusCode, body: &[u8]) -> AppError {
    let parsed: ApiErrorResponse = serde_json::from_slice(body).unwrap_or_default();

    let kind = match status.as_u16() {
        400 | 409 | 422 if parsed.is_business_code() => ErrorKind::Business,
        other => ErrorKind::from_status(other),
    };

    let message = if parsed.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    } else {
        parsed.message.clone()
    };

    let error = AppError::new(kind, message);
    match parsed.machine_code() {
        Some(code) => error.with_code(code),
        None => error,
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::with_source(ErrorKind::Timeout, format!("Request timed out: {err}"), err)
    } else if err.is_decode() {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Failed to read response: {err}"),
            err,
        )
    } else {
        AppError::with_source(ErrorKind::Transport, format!("Request failed: {err}"), err)
    }
}

/// A search endpoint bound to a fixed path.
///
/// Used for listings that are not the primary collection of a service,
/// such as a wallet's transactions or the signed-in user's submissions.
pub struct SearchEndpoint<T> {
    http: HttpService,
    path: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> SearchEndpoint<T> {
    /// Bind a search path.
    pub fn new(http: HttpService, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            _item: PhantomData,
        }
    }

    /// The bound path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T> Clone for SearchEndpoint<T> {
    fn clone(&self) -> Self {
        Self::new(self.http.clone(), self.path.clone())
    }
}

#[async_trait]
impl<T> SearchSource<T> for SearchEndpoint<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResponse<T>> {
        self.http.search(&self.path, request).await
    }
}
