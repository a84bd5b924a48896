//! Values exposed to templates.
//!
//! The context is assembled once per run and is never mutated while
//! rendering. Templates see it as:
//!
//! ```text
//! env.*         environment snapshot
//! date          creation instant, epoch milliseconds
//! repo.owner    repository owner
//! repo.repo     repository name
//! action, workflow, job, actor, eventName, sha, ref, runId, runNumber
//! payload.*     triggering event payload ({} when unavailable)
//! ```

use crate::config::RepoCoords;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifiers of the workflow run that invoked us.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInfo {
    pub action: Option<String>,
    pub workflow: Option<String>,
    pub job: Option<String>,
    pub actor: Option<String>,
    pub event_name: Option<String>,
    pub sha: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub run_id: Option<u64>,
    pub run_number: Option<u64>,
    pub payload: serde_json::Value,
}

impl WorkflowInfo {
    /// Read the standard `GITHUB_*` variables from an environment snapshot.
    ///
    /// The payload is left as `{}`; see [`crate::io::read_event_payload`].
    pub fn from_env(env: &BTreeMap<String, String>) -> Self {
        let var = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();
        let number = |key: &str| var(key).and_then(|v| v.parse().ok());
        Self {
            action: var("GITHUB_ACTION"),
            workflow: var("GITHUB_WORKFLOW"),
            job: var("GITHUB_JOB"),
            actor: var("GITHUB_ACTOR"),
            event_name: var("GITHUB_EVENT_NAME"),
            sha: var("GITHUB_SHA"),
            git_ref: var("GITHUB_REF"),
            run_id: number("GITHUB_RUN_ID"),
            run_number: number("GITHUB_RUN_NUMBER"),
            payload: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateContext {
    env: BTreeMap<String, String>,
    #[serde(rename = "date", with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    repo: RepoCoords,
    #[serde(flatten)]
    workflow: WorkflowInfo,
}

impl TemplateContext {
    pub fn new(
        env: BTreeMap<String, String>,
        timestamp: DateTime<Utc>,
        repo: RepoCoords,
        workflow: WorkflowInfo,
    ) -> Self {
        Self {
            env,
            timestamp,
            repo,
            workflow,
        }
    }

    /// The JSON value templates are rendered against.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn env() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("EXAMPLE".to_string(), "foo".to_string()),
            ("GITHUB_ACTION".to_string(), "create-issue".to_string()),
            ("GITHUB_RUN_ID".to_string(), "42".to_string()),
            ("GITHUB_RUN_NUMBER".to_string(), "not-a-number".to_string()),
            ("GITHUB_REF".to_string(), "refs/heads/main".to_string()),
        ])
    }

    #[test]
    fn workflow_from_env() {
        let wf = WorkflowInfo::from_env(&env());
        assert_eq!(wf.action.as_deref(), Some("create-issue"));
        assert_eq!(wf.run_id, Some(42));
        assert_eq!(wf.run_number, None);
        assert!(wf.sha.is_none());
    }

    #[test]
    fn context_value_shape() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let ctx = TemplateContext::new(
            env(),
            ts,
            RepoCoords::new("JasonEtco", "waddup"),
            WorkflowInfo::from_env(&env())
                .with_payload(serde_json::json!({"repository": {"name": "waddup"}})),
        );
        let v = ctx.to_value().unwrap();
        assert_eq!(v["env"]["EXAMPLE"], "foo");
        assert_eq!(v["date"], 1_700_000_000_123_i64);
        assert_eq!(v["repo"]["owner"], "JasonEtco");
        assert_eq!(v["repo"]["repo"], "waddup");
        assert_eq!(v["action"], "create-issue");
        assert_eq!(v["runId"], 42);
        assert_eq!(v["ref"], "refs/heads/main");
        assert_eq!(v["payload"]["repository"]["name"], "waddup");
    }
}
