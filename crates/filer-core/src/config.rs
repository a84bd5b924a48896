use crate::error::{FilerError, Result};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_TEMPLATE: &str = ".github/ISSUE_TEMPLATE.md";

// ---------------------------------------------------------------------------
// SearchScope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    Open,
    Closed,
    All,
}

impl SearchScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchScope::Open => "open",
            SearchScope::Closed => "closed",
            SearchScope::All => "all",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchScope {
    type Err = FilerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(SearchScope::Open),
            "closed" => Ok(SearchScope::Closed),
            "all" => Ok(SearchScope::All),
            other => Err(FilerError::InvalidSearchExisting(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateMode
// ---------------------------------------------------------------------------

/// What to do when an issue with the rendered title already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// `update_existing` unset: never search, always create.
    #[default]
    AlwaysCreate,
    /// `update_existing=true`: replace the body of the match.
    UpdateIfFound,
    /// `update_existing=false`: report the match without touching it.
    ReportIfFound,
}

impl UpdateMode {
    /// Parse the raw `update_existing` input. `None` and `""` mean unset.
    pub fn from_input(value: Option<&str>) -> Result<Self> {
        match value.unwrap_or("") {
            "" => Ok(UpdateMode::AlwaysCreate),
            "true" => Ok(UpdateMode::UpdateIfFound),
            "false" => Ok(UpdateMode::ReportIfFound),
            other => Err(FilerError::InvalidUpdateExisting(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReconciliationPolicy {
    pub search_scope: SearchScope,
    pub update_mode: UpdateMode,
}

// ---------------------------------------------------------------------------
// RepoCoords
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCoords {
    pub owner: String,
    pub repo: String,
}

impl RepoCoords {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse `owner/repo`, the form `GITHUB_REPOSITORY` uses.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(FilerError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// ---------------------------------------------------------------------------
// ActionInputs
// ---------------------------------------------------------------------------

/// Raw inputs as the host received them. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub filename: Option<String>,
    pub assignees: Option<String>,
    pub milestone: Option<String>,
    pub search_existing: Option<String>,
    pub update_existing: Option<String>,
    pub repository: Option<String>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub template: String,
    pub assignees: Option<String>,
    pub milestone: Option<String>,
    pub policy: ReconciliationPolicy,
    pub repo: RepoCoords,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ActionInputs {
    /// Check every input before any file or network access happens.
    ///
    /// `search_existing` is checked first, then `update_existing`, then the
    /// repository coordinates.
    pub fn validate(&self) -> Result<RunConfig> {
        let search_scope = match non_empty(&self.search_existing) {
            Some(s) => s.parse()?,
            None => SearchScope::default(),
        };
        let update_mode = UpdateMode::from_input(non_empty(&self.update_existing))?;
        let repo = RepoCoords::parse(non_empty(&self.repository).unwrap_or(""))?;

        Ok(RunConfig {
            template: non_empty(&self.filename)
                .unwrap_or(DEFAULT_TEMPLATE)
                .to_string(),
            assignees: non_empty(&self.assignees).map(str::to_string),
            milestone: non_empty(&self.milestone).map(str::to_string),
            policy: ReconciliationPolicy {
                search_scope,
                update_mode,
            },
            repo,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
