//! Extracted form records
//!
//! These are the persisted unit of output: one [`FormRecord`] per `<form>`
//! element found on a rendered page.

use serde::{Deserialize, Serialize};

/// One HTML form and its input fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    /// Page the form was found on (not the form's action target)
    pub url: String,

    /// Resolved absolute action URL
    pub action: String,

    /// Lower-cased submission method
    pub method: String,

    /// `input`, `textarea` and `select` descendants in document order
    pub fields: Vec<FieldRecord>,
}

/// One form control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub placeholder: String,

    #[serde(default)]
    pub required: bool,

    /// Option values; only present for selection controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldRecord {
    /// Returns true for `select` controls
    pub fn is_selection(&self) -> bool {
        self.options.is_some()
    }
}
