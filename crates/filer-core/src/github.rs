//! GitHub REST implementation of the store capabilities.

use crate::config::RepoCoords;
use crate::error::Result;
use crate::store::{
    CreateRecord, ExistingRecord, NewRecord, SearchRecords, StoreError, StoreResult, UpdateRecord,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<ExistingRecord>,
}

/// Error body GitHub attaches to 4xx/5xx responses.
#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    repo: RepoCoords,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>, repo: RepoCoords) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("filer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            repo,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn issues_path(&self) -> String {
        format!("/repos/{}/{}/issues", self.repo.owner, self.repo.repo)
    }

    fn send(req: RequestBuilder) -> StoreResult<Response> {
        let resp = req.send().map_err(|e| StoreError::Http(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
            errors: body.errors,
        })
    }

    fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> StoreResult<T> {
        Self::send(req)?
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl SearchRecords for GitHubClient {
    fn search(&self, query: &str) -> StoreResult<Vec<ExistingRecord>> {
        debug!("GET /search/issues q={query}");
        let req = self
            .request(Method::GET, "/search/issues")
            .query(&[("q", query)]);
        let found: SearchResponse = Self::send_json(req)?;
        Ok(found.items)
    }
}

impl CreateRecord for GitHubClient {
    fn create(&self, record: &NewRecord) -> StoreResult<ExistingRecord> {
        let path = self.issues_path();
        debug!("POST {path}");
        Self::send_json(self.request(Method::POST, &path).json(record))
    }
}

impl UpdateRecord for GitHubClient {
    fn update(&self, id: u64, body: &str) -> StoreResult<()> {
        let path = format!("{}/{id}", self.issues_path());
        debug!("PATCH {path}");
        let req = self
            .request(Method::PATCH, &path)
            .json(&serde_json::json!({ "body": body }));
        Self::send(req)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
