//! Report records: untyped feed rows and their canonical form.

mod select;

pub use select::{select_reports, select_reports_with, SelectionLimits};

use serde_json::{Map, Value};

use crate::util::safe_text;

/// Feed column names, case-sensitive as published.
pub mod fields {
    pub const ID: &str = "ID";
    pub const TITLE: &str = "title";
    pub const PARAGRAPH: &str = "paragraph";
    pub const CREATED: &str = "created";
    pub const SINCE: &str = "since";
    pub const REPLY: &str = "reply";
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
}

/// One untrusted row from the feed.
///
/// Elements that are not JSON objects become records with no fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Trimmed text of `key`, empty when absent or null.
    pub fn text(&self, key: &str) -> String {
        safe_text(self.0.get(key))
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// Canonical report after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Timestamp text exactly as the feed sent it.
    pub created_at: String,
    /// Human label such as "3 days ago", shown verbatim.
    pub relative_label: String,
    /// Empty when nobody has replied.
    pub reply: String,
    /// Lower-cased category; empty displays as "report".
    pub kind: String,
    /// Lower-cased state; empty displays as "open".
    pub status: String,
}

impl Report {
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            id: raw.text(fields::ID),
            title: raw.text(fields::TITLE),
            body: raw.text(fields::PARAGRAPH),
            created_at: raw.text(fields::CREATED),
            relative_label: raw.text(fields::SINCE),
            reply: raw.text(fields::REPLY),
            kind: raw.text(fields::TYPE).to_lowercase(),
            status: raw.text(fields::STATUS).to_lowercase(),
        }
    }

    pub fn display_kind(&self) -> &str {
        if self.kind.is_empty() {
            "report"
        } else {
            &self.kind
        }
    }

    pub fn display_status(&self) -> &str {
        if self.status.is_empty() {
            "open"
        } else {
            &self.status
        }
    }

    pub fn has_reply(&self) -> bool {
        !self.reply.is_empty()
    }
}
