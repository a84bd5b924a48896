//! Create / update / report decision.
//!
//! Each run makes exactly one decision, talking to the store sequentially:
//!
//! ```text
//! AlwaysCreate ─────────────────────────────────────────► create ─► Created
//! UpdateIfFound / ReportIfFound ─► search ─► exact title match?
//!     no  ─► "No existing issue found to update" ────────► create ─► Created
//!     yes ─► ReportIfFound ─────────────────────────────────────► FoundNotUpdated
//!     yes ─► UpdateIfFound ─► update(body only) ─────────────────► Updated
//! ```
//!
//! Search is a fuzzy superset filter; only a case-sensitive exact title
//! match is acted on, and the first one in store order wins.

use crate::config::{ReconciliationPolicy, RepoCoords, UpdateMode};
use crate::error::{FilerError, Result};
use crate::store::{search_query, ExistingRecord, NewRecord, Store, StoreAction, StoreError};
use crate::template::RenderedRecord;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(ExistingRecord),
    Updated(ExistingRecord),
    FoundNotUpdated(ExistingRecord),
}

impl Outcome {
    pub fn record(&self) -> &ExistingRecord {
        match self {
            Outcome::Created(r) | Outcome::Updated(r) | Outcome::FoundNotUpdated(r) => r,
        }
    }
}

/// Fields a create call needs beyond the rendered record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateExtras {
    pub assignees: Vec<String>,
    pub milestone: Option<u64>,
}

pub struct Reconciler<'a> {
    pub store: Store<'a>,
    pub repo: &'a RepoCoords,
    pub policy: ReconciliationPolicy,
    /// Template path, named in diagnostics when a mutation fails.
    pub template: &'a str,
}

impl Reconciler<'_> {
    pub fn run(&self, rendered: &RenderedRecord, extras: &CreateExtras) -> Result<Outcome> {
        let update_found = match self.policy.update_mode {
            UpdateMode::AlwaysCreate => return self.create(rendered, extras),
            UpdateMode::UpdateIfFound => true,
            UpdateMode::ReportIfFound => false,
        };

        let Some(existing) = self.find_existing(&rendered.title)? else {
            info!("No existing issue found to update");
            return self.create(rendered, extras);
        };

        if update_found {
            self.update(existing, &rendered.body)
        } else {
            info!("Existing issue {existing} found but not updated");
            Ok(Outcome::FoundNotUpdated(existing))
        }
    }

    /// Search failures propagate as plain store errors.
    fn find_existing(&self, title: &str) -> Result<Option<ExistingRecord>> {
        let scope = self.policy.search_scope;
        info!("Fetching {scope} issues with title \"{title}\"");
        let query = search_query(scope, self.repo, title);
        let results = self.store.search.search(&query)?;
        Ok(results.into_iter().find(|r| r.title == title))
    }

    fn update(&self, existing: ExistingRecord, body: &str) -> Result<Outcome> {
        info!("Updating existing issue {existing}");
        self.store
            .update
            .update(existing.id, body)
            .map_err(|source| self.failed(StoreAction::Update, source))?;
        info!("Updated issue {existing}");
        Ok(Outcome::Updated(existing))
    }

    fn create(&self, rendered: &RenderedRecord, extras: &CreateExtras) -> Result<Outcome> {
        info!("Creating new issue {}", rendered.title);
        let new = NewRecord {
            title: rendered.title.clone(),
            body: rendered.body.clone(),
            labels: rendered.labels.clone(),
            assignees: extras.assignees.clone(),
            milestone: extras.milestone,
        };
        let created = self
            .store
            .create
            .create(&new)
            .map_err(|source| self.failed(StoreAction::Create, source))?;
        info!("Created issue {created}");
        Ok(Outcome::Created(created))
    }

    fn failed(&self, action: StoreAction, source: StoreError) -> FilerError {
        FilerError::StoreOperation {
            action,
            template: self.template.to_string(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
