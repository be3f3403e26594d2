//! Search / status filtering and date ordering for the applications list.

use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{ApplicationStatus, JobApplication};

pub const ALL_STATUSES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => ALL_STATUSES,
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL_STATUSES {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Case-insensitive substring match on company, title or location.
/// An empty query matches everything.
pub fn matches_query(app: &JobApplication, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        Some(app.company_name.as_str()),
        Some(app.job_title.as_str()),
        app.job_location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Sorts newest first. The sort is stable; a missing date sorts as the epoch.
pub fn sort_newest_first(apps: &mut [JobApplication]) {
    apps.sort_by_key(|app| Reverse(app.date_or_epoch()));
}

pub fn filter_and_sort(
    apps: &[JobApplication],
    query: &str,
    status: StatusFilter,
) -> Vec<JobApplication> {
    let mut visible: Vec<JobApplication> = apps
        .iter()
        .filter(|app| matches_query(app, query) && status.matches(app.application_status))
        .cloned()
        .collect();
    sort_newest_first(&mut visible);
    visible
}
