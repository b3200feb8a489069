//! Domain types for the todo service.
//!
//! # Design
//! `Todo` mirrors the single `todo` table. `TodoId` is the raw `{id}` path
//! segment: it is deliberately not parsed as an integer, so whatever the client
//! sends reaches the store and is coerced (or rejected) there.

use serde::Deserialize;

/// A row of the `todo` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub note: String,
}

impl Todo {
    /// Plain-text line used by the List endpoint: `<id>,<note>\n`.
    pub fn line(&self) -> String {
        format!("{},{}\n", self.id, self.note)
    }
}

/// Unvalidated record identifier taken from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
