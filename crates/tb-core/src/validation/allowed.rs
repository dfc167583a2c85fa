use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Known deployment, village and talking-book names, typically exported
/// from the program's roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedNames {
    pub deployments: BTreeSet<String>,
    pub villages: BTreeSet<String>,
    pub talking_books: BTreeSet<String>,
}

impl AllowedNames {
    pub fn allows_deployment(&self, deployment: &str) -> bool {
        self.deployments.contains(deployment)
    }

    pub fn allows_village(&self, village: &str) -> bool {
        self.villages.contains(village)
    }

    pub fn allows_talking_book(&self, talking_book: &str) -> bool {
        self.talking_books.contains(talking_book)
    }
}
