use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DEPLOYMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)(\D*)$").unwrap());

/// A content deployment such as `2013-05` or `2014-02b`.
///
/// Parsing never fails: an unrecognized string keeps its text in `id` with
/// `year` and `update` set to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeploymentId {
    pub year: u16,
    pub update: u16,
    pub flavor: String,
    pub id: String,
}

impl DeploymentId {
    pub fn parse(text: &str) -> Self {
        let parsed = DEPLOYMENT.captures(text).and_then(|caps| {
            Some((
                caps[1].parse::<u16>().ok()?,
                caps[2].parse::<u16>().ok()?,
                caps[3].to_string(),
            ))
        });

        match parsed {
            Some((year, update, flavor)) => Self {
                year,
                update,
                flavor,
                id: text.to_string(),
            },
            None => Self {
                year: 0,
                update: 0,
                flavor: String::new(),
                id: text.to_string(),
            },
        }
    }

    /// True when the text parsed as `YYYY-UU`.
    pub fn is_valid(&self) -> bool {
        self.year != 0
    }

    /// Placeholder deployment used by loaders that could not read a device.
    pub fn is_unknown(&self) -> bool {
        self.id.eq_ignore_ascii_case("UNKNOWN")
    }

    /// Best guess at the deployment before this one. Years are assumed to
    /// have at most eight updates.
    pub fn guess_previous(&self) -> Self {
        if self.update > 1 {
            Self::parse(&format!("{:04}-{:02}", self.year, self.update - 1))
        } else {
            Self::parse(&format!("{:04}-08", self.year.saturating_sub(1)))
        }
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
