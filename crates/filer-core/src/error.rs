use crate::store::{StoreAction, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilerError {
    #[error("Invalid value search_existing={0}, must be one of open, closed or all")]
    InvalidSearchExisting(String),

    #[error("Invalid value update_existing={0}, must be one of true or false")]
    InvalidUpdateExisting(String),

    #[error("invalid repository '{0}': expected owner/repo (set GITHUB_REPOSITORY)")]
    InvalidRepository(String),

    #[error("malformed front matter: {0}")]
    MalformedInput(#[source] serde_yaml::Error),

    #[error("front matter is missing the required 'title' attribute")]
    MissingTitle,

    #[error("template error: {0}")]
    Template(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{}\n\n{}", explanation(.action, .template), .source.message())]
    StoreOperation {
        action: StoreAction,
        template: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilerError>;

fn explanation(action: &StoreAction, template: &str) -> String {
    format!(
        "An error occurred while {} the issue. This might be caused by a malformed issue title, \
         or a typo in the labels or assignees. Check {template}!",
        action.verb()
    )
}

impl FilerError {
    /// Diagnostic lines to log before reporting a failed create or update.
    ///
    /// In order: the explanation naming the template and the operation, the
    /// underlying error, then one line per validation problem the store
    /// attached. Empty for every other error kind.
    pub fn diagnostics(&self) -> Vec<String> {
        let FilerError::StoreOperation {
            action,
            template,
            source,
        } = self
        else {
            return Vec::new();
        };
        let mut lines = vec![explanation(action, template), source.to_string()];
        lines.extend(source.sub_errors().iter().map(|e| e.to_string()));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_operation_message_names_template_and_cause() {
        let err = FilerError::StoreOperation {
            action: StoreAction::Update,
            template: "t.md".into(),
            source: StoreError::Http("boom".into()),
        };
        assert_eq!(
            err.to_string(),
            "An error occurred while updating the issue. This might be caused by a malformed \
             issue title, or a typo in the labels or assignees. Check t.md!\n\nboom"
        );
    }

    #[test]
    fn diagnostics_list_each_sub_error() {
        let err = FilerError::StoreOperation {
            action: StoreAction::Create,
            template: "t.md".into(),
            source: StoreError::Api {
                status: 422,
                message: "Validation error".into(),
                errors: vec![
                    serde_json::json!({"field": "assignees"}),
                    serde_json::json!({"field": "labels"}),
                ],
            },
        };
        let lines = err.diagnostics();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("An error occurred while creating the issue."));
        assert_eq!(lines[1], "HTTP 422: Validation error");
        assert_eq!(lines[2], r#"{"field":"assignees"}"#);
        assert_eq!(lines[3], r#"{"field":"labels"}"#);
    }

    #[test]
    fn other_errors_have_no_diagnostics() {
        assert!(FilerError::MissingTitle.diagnostics().is_empty());
    }
}
