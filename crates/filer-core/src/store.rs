//! Record store capabilities.
//!
//! The reconciler talks to the issue tracker through three independent
//! traits so each operation can be substituted on its own. Every trait is
//! implemented for plain closures, and [`crate::github::GitHubClient`]
//! implements all three.

use crate::config::{RepoCoords, SearchScope};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// An issue as returned by the store's search and create operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    #[serde(rename = "number")]
    pub id: u64,
    pub title: String,
    #[serde(rename = "html_url")]
    pub url: String,
}

impl fmt::Display for ExistingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}: {}", self.title, self.id, self.url)
    }
}

/// Payload of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

// ---------------------------------------------------------------------------
// Search query
// ---------------------------------------------------------------------------

/// Build the free-text search query for issues titled `title` in `repo`.
///
/// `all` omits the state qualifier entirely rather than sending both states.
pub fn search_query(scope: SearchScope, repo: &RepoCoords, title: &str) -> String {
    let qualifier = match scope {
        SearchScope::Open => "is:open ",
        SearchScope::Closed => "is:closed ",
        SearchScope::All => "",
    };
    format!("{qualifier}is:issue repo:{repo} in:title {title}")
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    Create,
    Update,
}

impl StoreAction {
    pub fn verb(&self) -> &'static str {
        match self {
            StoreAction::Create => "creating",
            StoreAction::Update => "updating",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Field-level validation problems attached to the response.
        errors: Vec<serde_json::Value>,
    },

    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    /// The store's message without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            StoreError::Api { message, .. } => message,
            StoreError::Http(m) | StoreError::Decode(m) => m,
        }
    }

    pub fn sub_errors(&self) -> &[serde_json::Value] {
        match self {
            StoreError::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

pub trait SearchRecords {
    /// Run a free-text query, returning results in store order.
    fn search(&self, query: &str) -> StoreResult<Vec<ExistingRecord>>;
}

pub trait CreateRecord {
    fn create(&self, record: &NewRecord) -> StoreResult<ExistingRecord>;
}

pub trait UpdateRecord {
    /// Replace the body of issue `id`. Nothing else on the issue changes.
    fn update(&self, id: u64, body: &str) -> StoreResult<()>;
}

impl<F> SearchRecords for F
where
    F: Fn(&str) -> StoreResult<Vec<ExistingRecord>>,
{
    fn search(&self, query: &str) -> StoreResult<Vec<ExistingRecord>> {
        self(query)
    }
}

impl<F> CreateRecord for F
where
    F: Fn(&NewRecord) -> StoreResult<ExistingRecord>,
{
    fn create(&self, record: &NewRecord) -> StoreResult<ExistingRecord> {
        self(record)
    }
}

impl<F> UpdateRecord for F
where
    F: Fn(u64, &str) -> StoreResult<()>,
{
    fn update(&self, id: u64, body: &str) -> StoreResult<()> {
        self(id, body)
    }
}

/// The three capabilities the reconciler runs against.
#[derive(Clone, Copy)]
pub struct Store<'a> {
    pub search: &'a dyn SearchRecords,
    pub create: &'a dyn CreateRecord,
    pub update: &'a dyn UpdateRecord,
}

impl<'a> Store<'a> {
    /// Use one value for all three operations.
    pub fn from_client<C>(client: &'a C) -> Self
    where
        C: SearchRecords + CreateRecord + UpdateRecord,
    {
        Self {
            search: client,
            create: client,
            update: client,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
