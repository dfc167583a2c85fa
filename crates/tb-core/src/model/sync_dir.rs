use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};
use regex::{Captures, Regex};
use serde::Serialize;

use super::DeploymentId;

/// `2014y05m02d10h11m12s-<uniquifier>`
static MODERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)y(\d+)m(\d+)d(\d+)h(\d+)m(\d+)s-(.*)$").unwrap()
});

/// `5m2d10h11m12s`, year implied by the deployment. Ledger rows carry a
/// `-<device>` suffix.
static LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)m(\d+)d(\d+)h(\d+)m(\d+)s(?:-(.*))?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SyncDirVersion {
    V1,
    V2,
}

/// Identity of one sync directory, parsed from its name.
///
/// Ordered by time, then uniquifier, with the raw name only breaking ties.
/// Names without a time sort first. Equality looks at the name alone.
#[derive(Debug, Clone, Serialize)]
pub struct SyncDirId {
    pub date_time: Option<NaiveDateTime>,
    pub dir_name: String,
    pub uniquifier: String,
    pub version: SyncDirVersion,
}

/// The part of a [`SyncDirId`] ledger entries are keyed and matched by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeKey {
    pub date_time: NaiveDateTime,
    pub uniquifier: String,
}

impl SyncDirId {
    pub fn parse(deployment: &DeploymentId, name: &str) -> Self {
        if let Some(caps) = MODERN.captures(name) {
            return Self {
                date_time: modern_time(&caps),
                dir_name: name.to_string(),
                uniquifier: caps[7].to_string(),
                version: SyncDirVersion::V2,
            };
        }

        if let Some(caps) = LEGACY.captures(name) {
            return Self {
                date_time: legacy_time(&caps, deployment),
                dir_name: name.to_string(),
                uniquifier: caps.get(6).map_or("", |m| m.as_str()).to_string(),
                version: SyncDirVersion::V1,
            };
        }

        Self {
            date_time: None,
            dir_name: name.to_string(),
            uniquifier: String::new(),
            version: SyncDirVersion::V1,
        }
    }

    /// The same id one millisecond later.
    pub fn add_milli(&self) -> Self {
        Self {
            date_time: self.date_time.map(|t| t + TimeDelta::milliseconds(1)),
            ..self.clone()
        }
    }

    pub fn time_key(&self) -> Option<TimeKey> {
        self.date_time.map(|date_time| TimeKey {
            date_time,
            uniquifier: self.uniquifier.clone(),
        })
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps[group].parse().ok()
}

fn at(year: i32, fields: [u32; 5]) -> Option<NaiveDateTime> {
    let [month, day, hour, minute, second] = fields;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn modern_time(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let year = caps[1].parse::<i32>().ok()?;
    at(
        year,
        [
            number(caps, 2)?,
            number(caps, 3)?,
            number(caps, 4)?,
            number(caps, 5)?,
            number(caps, 6)?,
        ],
    )
}

/// A deployment announced in December is often synced in January, and one
/// announced as the first of a year may have been synced the previous
/// November.
///
/// The time is built in the deployment's year and then shifted, so a leap
/// day moved into a common year lands on February 28.
fn legacy_time(caps: &Captures<'_>, deployment: &DeploymentId) -> Option<NaiveDateTime> {
    let fields = [
        number(caps, 1)?,
        number(caps, 2)?,
        number(caps, 3)?,
        number(caps, 4)?,
        number(caps, 5)?,
    ];
    let month = fields[0];
    let time = at(i32::from(deployment.year), fields)?;

    if matches!(month, 1 | 2) && !matches!(deployment.update, 1 | 2) {
        time.checked_add_months(Months::new(12))
    } else if matches!(month, 11 | 12) && deployment.update == 1 {
        time.checked_sub_months(Months::new(12))
    } else {
        Some(time)
    }
}

impl PartialEq for SyncDirId {
    fn eq(&self, other: &Self) -> bool {
        self.dir_name == other.dir_name
    }
}

impl Eq for SyncDirId {}

impl Hash for SyncDirId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dir_name.hash(state);
    }
}

impl PartialOrd for SyncDirId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SyncDirId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date_time
            .cmp(&other.date_time)
            .then_with(|| self.uniquifier.cmp(&other.uniquifier))
            .then_with(|| self.dir_name.cmp(&other.dir_name))
    }
}

impl fmt::Display for SyncDirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name)
    }
}
