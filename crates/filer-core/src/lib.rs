pub mod action;
pub mod config;
pub mod context;
pub mod document;
pub mod emit;
pub mod error;
pub mod github;
pub mod io;
pub mod normalize;
pub mod reconcile;
pub mod store;
pub mod template;

#[cfg(test)]
mod testing;

pub use error::{FilerError, Result};
