use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps the category codes devices log to readable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<String, String>);

impl CategoryMap {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// The readable name for `code`, or `code` itself when it is unmapped.
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code.trim()).unwrap_or(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        let entries = [
            ("1", "AGRIC"),
            ("1-2", "LIVESTOCK"),
            ("2", "HEALTH"),
            ("9", "FEEDBACK"),
            ("0", "OTHER"),
            ("$0-1", "TB"),
        ];
        Self(
            entries
                .into_iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        )
    }
}
