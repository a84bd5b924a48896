use crate::emit::Outputs;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Read the template document at `path`.
pub fn read_template(path: &Path) -> Result<String> {
    debug!("Reading from file {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

/// Load the triggering event payload, falling back to `{}`.
///
/// A missing or unreadable payload never fails the run; templates that
/// reference it simply render empty values.
pub fn read_event_payload(path: Option<&Path>) -> serde_json::Value {
    let empty = || serde_json::Value::Object(Default::default());
    let Some(path) = path else {
        return empty();
    };
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str(&data).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => value,
        Err(e) => {
            warn!("ignoring event payload {}: {e}", path.display());
            empty()
        }
    }
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    use std::io::Write as _;
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Format one entry for a `GITHUB_OUTPUT` file.
///
/// Single-line values use `name=value`; multi-line values use the heredoc
/// form with a delimiter that does not occur in the value.
pub fn output_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }
    let mut delimiter = String::from("ghadelimiter");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Append all outputs to the `GITHUB_OUTPUT` file at `path`.
pub fn write_outputs(path: &Path, outputs: &Outputs) -> Result<()> {
    let text: String = outputs
        .pairs()
        .iter()
        .map(|(name, value)| output_entry(name, value))
        .collect();
    append_text(path, &text)
}
