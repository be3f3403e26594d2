use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::store::{Collection, Entity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown application status '{s}'"))
    }
}

/// Collection `jobapplications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_loose_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_posting_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_location: Option<String>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Entity for JobApplication {
    const COLLECTION: Collection = Collection::JobApplications;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl JobApplication {
    /// Sort key for "most recent first" orderings; a missing date counts as the epoch.
    pub fn date_or_epoch(&self) -> NaiveDate {
        // `NaiveDate::default()` is 1970-01-01.
        self.application_date.unwrap_or_default()
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (keeping its date part).
fn deserialize_loose_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|e| serde::de::Error::custom(format!("invalid applicationDate '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parses_exact_names_only() {
        assert_eq!(
            "Interviewing".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Interviewing
        );
        assert!("interviewing".parse::<ApplicationStatus>().is_err());
        assert!("all".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_absent_optionals_are_omitted_on_the_wire() {
        let app = JobApplication {
            id: Uuid::nil(),
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            application_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            application_status: ApplicationStatus::Applied,
            company_response: None,
            job_posting_url: None,
            job_location: None,
            created_date: None,
            updated_date: None,
        };
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(
            value,
            json!({
                "id": Uuid::nil(),
                "companyName": "Acme",
                "jobTitle": "Engineer",
                "applicationDate": "2025-01-10",
                "applicationStatus": "Applied"
            })
        );
    }

    #[test]
    fn test_sparse_record_deserializes_with_defaults() {
        let app: JobApplication = serde_json::from_value(json!({ "id": Uuid::nil() })).unwrap();
        assert_eq!(app.application_status, ApplicationStatus::Applied);
        assert_eq!(app.application_date, None);
        assert_eq!(app.date_or_epoch(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_timestamp_application_date_keeps_date_part() {
        let app: JobApplication = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "applicationDate": "2025-03-15T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(app.application_date, NaiveDate::from_ymd_opt(2025, 3, 15));
    }

    #[test]
    fn test_null_application_date_is_absent() {
        let app: JobApplication = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "applicationDate": null
        }))
        .unwrap();
        assert_eq!(app.application_date, None);
    }
}
