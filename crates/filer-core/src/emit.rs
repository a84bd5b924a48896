use crate::reconcile::Outcome;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Created,
    Updated,
    Found,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Created => "created",
            Status::Updated => "updated",
            Status::Found => "found",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three named outputs of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outputs {
    pub number: String,
    pub url: String,
    pub status: Status,
}

impl Outputs {
    /// Output names and values, in publication order.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("number", self.number.clone()),
            ("url", self.url.clone()),
            ("status", self.status.to_string()),
        ]
    }
}

pub fn emit(outcome: &Outcome) -> Outputs {
    let status = match outcome {
        Outcome::Created(_) => Status::Created,
        Outcome::Updated(_) => Status::Updated,
        Outcome::FoundNotUpdated(_) => Status::Found,
    };
    let record = outcome.record();
    Outputs {
        number: record.id.to_string(),
        url: record.url.clone(),
        status,
    }
}
