//! Test doubles shared by the unit tests in this crate.

use crate::store::{
    CreateRecord, ExistingRecord, NewRecord, SearchRecords, StoreError, StoreResult, UpdateRecord,
};
use std::cell::RefCell;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// FakeStore
// ---------------------------------------------------------------------------

/// In-memory store that records every call it receives.
#[derive(Default)]
pub struct FakeStore {
    pub results: Vec<ExistingRecord>,
    pub create_error: Option<StoreError>,
    pub update_error: Option<StoreError>,
    pub search_error: Option<StoreError>,
    pub searches: RefCell<Vec<String>>,
    pub creates: RefCell<Vec<NewRecord>>,
    pub updates: RefCell<Vec<(u64, String)>>,
}

impl FakeStore {
    pub fn with_results(results: Vec<ExistingRecord>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn mutations(&self) -> usize {
        self.creates.borrow().len() + self.updates.borrow().len()
    }
}

pub fn record(id: u64, title: &str) -> ExistingRecord {
    ExistingRecord {
        id,
        title: title.to_string(),
        url: "www".to_string(),
    }
}

impl SearchRecords for FakeStore {
    fn search(&self, query: &str) -> StoreResult<Vec<ExistingRecord>> {
        self.searches.borrow_mut().push(query.to_string());
        match &self.search_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.results.clone()),
        }
    }
}

impl CreateRecord for FakeStore {
    fn create(&self, new: &NewRecord) -> StoreResult<ExistingRecord> {
        self.creates.borrow_mut().push(new.clone());
        match &self.create_error {
            Some(e) => Err(e.clone()),
            None => Ok(record(1, &new.title)),
        }
    }
}

impl UpdateRecord for FakeStore {
    fn update(&self, id: u64, body: &str) -> StoreResult<()> {
        self.updates.borrow_mut().push((id, body.to_string()));
        match &self.update_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub fn validation_error() -> StoreError {
    StoreError::Api {
        status: 422,
        message: "Validation error".to_string(),
        errors: vec![
            serde_json::json!({"resource": "Issue", "field": "assignees", "code": "invalid"}),
            serde_json::json!({"resource": "Issue", "field": "labels", "code": "invalid"}),
        ],
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records formatted log lines.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}
