//! One end-to-end run: read, render, reconcile, emit.

use crate::config::RunConfig;
use crate::context::TemplateContext;
use crate::document;
use crate::emit::{emit, Outputs};
use crate::error::Result;
use crate::io;
use crate::normalize;
use crate::reconcile::{CreateExtras, Reconciler};
use crate::store::Store;
use crate::template::Renderer;
use std::path::Path;
use tracing::{debug, info};

/// Run the action against `store`.
///
/// The template path in `cfg` is resolved against `workspace`. Nothing is
/// sent to the store until the document has parsed and rendered cleanly.
pub fn run(
    cfg: &RunConfig,
    workspace: &Path,
    ctx: &TemplateContext,
    store: Store<'_>,
) -> Result<Outputs> {
    let raw = io::read_template(&workspace.join(&cfg.template))?;
    let doc = document::parse(&raw)?;
    info!(
        "Front matter for {} is {}",
        cfg.template,
        serde_json::to_string(&doc.attributes)?
    );

    let rendered = Renderer::new().render_record(&doc, ctx)?;
    debug!("Templates compiled: {}", serde_json::to_string(&rendered)?);

    let extras = CreateExtras {
        assignees: normalize::assignees(
            cfg.assignees.as_deref(),
            doc.attributes.assignees.as_ref(),
        ),
        milestone: normalize::milestone(
            cfg.milestone.as_deref(),
            doc.attributes.milestone.as_ref(),
        ),
    };

    let outcome = Reconciler {
        store,
        repo: &cfg.repo,
        policy: cfg.policy,
        template: &cfg.template,
    }
    .run(&rendered, &extras)?;
    Ok(emit(&outcome))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
