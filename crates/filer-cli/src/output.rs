use filer_core::emit::Outputs;
use filer_core::FilerError;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_pairs(outputs: &Outputs) {
    for (name, value) in outputs.pairs() {
        println!("{name}={}", escape_data(&value));
    }
}

/// Report a failed run the way the workflow runner expects.
pub fn print_failure(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// The message a failed run reports.
///
/// Context added in the binary is kept in front of the library error. The
/// library error itself is shown without its source chain, since its own
/// message already carries the underlying cause.
pub fn failure_message(err: &anyhow::Error) -> String {
    let mut parts = Vec::new();
    for cause in err.chain() {
        parts.push(cause.to_string());
        if cause.downcast_ref::<FilerError>().is_some() {
            break;
        }
    }
    parts.join(": ")
}

/// Escape a value for a workflow command line.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
