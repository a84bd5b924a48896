//! Template rendering.
//!
//! Titles, bodies and labels are Handlebars templates rendered as plain text
//! (no HTML escaping) against a [`TemplateContext`]. Rendering is pure: the
//! same template and context always produce the same output.
//!
//! A `date` helper formats timestamps with a strftime format string:
//!
//! ```text
//! {{date date "%Y-%m-%d"}}   explicit value and format
//! {{date "%A, %B %-d"}}      format the context's `date`
//! {{date date}}              RFC 3339
//! ```
//!
//! Values may be epoch milliseconds or RFC 3339 strings.

use crate::context::TemplateContext;
use crate::document::Document;
use crate::error::{FilerError, Result};
use crate::normalize::normalize;
use chrono::{DateTime, TimeZone, Utc};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

/// The templated parts of a document after rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRecord {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("date", Box::new(date_helper));
        Self { handlebars }
    }

    pub fn render(&self, template: &str, ctx: &TemplateContext) -> Result<String> {
        self.render_value(template, &ctx.to_value()?)
    }

    fn render_value(&self, template: &str, data: &Value) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| FilerError::Template(e.to_string()))
    }

    /// Render the title, body and every label of `doc`.
    pub fn render_record(&self, doc: &Document, ctx: &TemplateContext) -> Result<RenderedRecord> {
        let title = doc
            .attributes
            .title
            .as_deref()
            .ok_or(FilerError::MissingTitle)?;
        let data = ctx.to_value()?;

        let labels = normalize(doc.attributes.labels.as_ref())
            .iter()
            .map(|label| self.render_value(label, &data))
            .collect::<Result<Vec<_>>>()?;

        Ok(RenderedRecord {
            body: self.render_value(&doc.body, &data)?,
            title: self.render_value(title, &data)?,
            labels,
        })
    }
}

// ---------------------------------------------------------------------------
// date helper
// ---------------------------------------------------------------------------

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn timestamp_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_rfc3339(s),
        _ => None,
    }
}

fn date_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let context_date = || ctx.data().get("date").cloned().unwrap_or(Value::Null);
    let (value, format) = match (h.param(0).map(|p| p.value()), h.param(1)) {
        (Some(v), Some(f)) => match f.value().as_str() {
            Some(fmt) => (v.clone(), Some(fmt.to_string())),
            None => {
                return Err(RenderErrorReason::Other(format!(
                    "date: format {} is not a string",
                    f.value()
                ))
                .into())
            }
        },
        // A lone string argument is a format unless it is itself a date.
        (Some(Value::String(s)), None) if parse_rfc3339(s).is_none() => {
            (context_date(), Some(s.clone()))
        }
        (Some(v), None) => (v.clone(), None),
        (None, _) => (context_date(), None),
    };

    let ts = timestamp_of(&value).ok_or_else(|| {
        RenderErrorReason::Other(format!("date: {value} is not a timestamp"))
    })?;

    let rendered = match format {
        Some(fmt) => {
            let mut s = String::new();
            write!(s, "{}", ts.format(&fmt))
                .map_err(|_| RenderErrorReason::Other(format!("date: invalid format '{fmt}'")))?;
            s
        }
        None => ts.to_rfc3339(),
    };
    out.write(&rendered)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
