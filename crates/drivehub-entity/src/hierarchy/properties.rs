//! Value objects attached to file items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Properties extracted from a file's description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperties {
    /// External form URL (`formUrl` key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_url: Option<String>,
    /// Text to place on the clipboard (`copy` key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_text: Option<String>,
    /// Any other scalar keys found in the description.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl FileProperties {
    /// Whether no property was found.
    pub fn is_empty(&self) -> bool {
        self.form_url.is_none() && self.copy_text.is_none() && self.extra.is_empty()
    }

    /// Collapse an empty bag to `None`.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// A decomposed content-file code such as `A-A-2503-0080-01-00-01.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCode {
    /// Leading letter groups (`["A", "A"]`).
    pub letters: Vec<String>,
    /// Four-digit period segment (`"2503"`).
    pub period: String,
    /// Four-digit serial segment (`80`).
    pub serial: u32,
    /// Trailing two-digit segments (`[1, 0, 1]`).
    pub parts: Vec<u32>,
    /// Lowercased file extension, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}
