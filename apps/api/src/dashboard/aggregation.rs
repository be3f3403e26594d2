use serde::Serialize;

use crate::applications::filter::sort_newest_first;
use crate::models::{ApplicationStatus, JobApplication};

pub const RECENT_LIMIT: usize = 5;

/// Pie/bar chart order and colors. Zero-count entries are left out.
const STATUS_SERIES: [(ApplicationStatus, &str); 4] = [
    (ApplicationStatus::Applied, "#BEEB00"),
    (ApplicationStatus::Interviewing, "#E6F47A"),
    (ApplicationStatus::Rejected, "#DF3131"),
    (ApplicationStatus::Offered, "#DFF7B9"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub name: ApplicationStatus,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offered: usize,
    pub rejected: usize,
    pub status_series: Vec<StatusSlice>,
    pub recent: Vec<JobApplication>,
}

impl DashboardStats {
    /// Recomputed from the full list every time; nothing is cached.
    pub fn from_applications(apps: &[JobApplication]) -> Self {
        let count = |status: ApplicationStatus| {
            apps.iter()
                .filter(|app| app.application_status == status)
                .count()
        };

        let status_series = STATUS_SERIES
            .iter()
            .map(|&(name, color)| StatusSlice {
                name,
                value: count(name),
                color,
            })
            .filter(|slice| slice.value > 0)
            .collect();

        let mut recent = apps.to_vec();
        sort_newest_first(&mut recent);
        recent.truncate(RECENT_LIMIT);

        DashboardStats {
            total: apps.len(),
            applied: count(ApplicationStatus::Applied),
            interviewing: count(ApplicationStatus::Interviewing),
            offered: count(ApplicationStatus::Offered),
            rejected: count(ApplicationStatus::Rejected),
            status_series,
            recent,
        }
    }
}
