//! HTTP client for the indexing service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::identity::RepoIdentity;
use crate::poller::StatusSource;

use super::error::ApiError;
use super::types::{status_key, IndexRequest, QueryRequest, RepoStatus, SearchRequest};

/// Header carrying the source-control access token on every call.
const GITHUB_TOKEN_HEADER: &str = "X-GitHub-Token";

/// Client for the remote indexing service.
///
/// One instance per command invocation. Carries the parsed base URL and
/// both credentials; every request gets the bearer and source-control
/// token headers and the client-wide timeout.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_token: String,
    github_token: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|source| ApiError::BaseUrl {
            url: config.base_url.clone(),
            source: Some(source),
        })?;

        Ok(Self {
            http,
            base_url,
            api_token: config.api_token.clone(),
            github_token: config.github_token.clone(),
        })
    }

    /// Submit the repository for indexing. Any 2xx answer is success.
    pub async fn submit_for_indexing(&self, identity: &RepoIdentity) -> Result<(), ApiError> {
        let url = self.endpoint(&["repositories"])?;
        let request = IndexRequest::new(identity);
        debug!(
            "submitting {} ({} branch {}) for indexing",
            identity.owner_repo, identity.remote_kind, identity.branch
        );

        let response = self.authorize(self.http.post(url)).json(&request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(ApiError::IndexRequest {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }

    /// Fetch the indexing status for the repository. Only a 200 counts as
    /// success; its body must parse as a `RepoStatus`.
    pub async fn fetch_status(&self, identity: &RepoIdentity) -> Result<RepoStatus, ApiError> {
        let key = status_key(identity);
        let url = self.endpoint(&["repositories", &key])?;

        let response = self.authorize(self.http.get(url)).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::StatusFetch {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ask a natural-language question about the repository. The response
    /// body is opaque text, returned verbatim.
    pub async fn query(&self, identity: &RepoIdentity, question: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["query"])?;
        let request = QueryRequest::new(identity, question);

        let response = self.authorize(self.http.post(url)).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Query {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.text().await?)
    }

    /// Run a natural-language search over the repository. The response
    /// body is opaque text, returned verbatim.
    pub async fn search(&self, identity: &RepoIdentity, query: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["search"])?;
        let request = SearchRequest::new(identity, query);

        let response = self.authorize(self.http.post(url)).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Search {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.text().await?)
    }

    /// Ask the service to drop a repository from its index.
    ///
    /// The delete contract is not published, so this fails loudly instead
    /// of pretending to succeed.
    pub async fn remove_from_index(&self, _repo: &Path) -> Result<(), ApiError> {
        Err(ApiError::NotImplemented {
            operation: "unindex",
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header(GITHUB_TOKEN_HEADER, &self.github_token)
    }

    /// Endpoint URL under the configured base. Each segment is escaped on
    /// its own, so a `/` inside a segment survives as `%2F`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl {
                url: self.base_url.to_string(),
                source: None,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn fetch_status(&self, identity: &RepoIdentity) -> Result<RepoStatus, ApiError> {
        ApiClient::fetch_status(self, identity).await
    }
}
