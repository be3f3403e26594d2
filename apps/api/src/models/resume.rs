use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Collection, Entity};

/// Collection `resumeversions`. Any number of versions may be active at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeVersion {
    pub id: Uuid,
    #[serde(default)]
    pub version_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Entity for ResumeVersion {
    const COLLECTION: Collection = Collection::ResumeVersions;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl ResumeVersion {
    pub fn uploaded_or_epoch(&self) -> DateTime<Utc> {
        self.upload_date.unwrap_or_default()
    }
}
