use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{normalize_optional, ResumeVersion};
use crate::navigation::Route;
use crate::store::{self, RecordStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeForm {
    #[serde(default)]
    pub version_name: String,
    #[serde(default)]
    pub resume_file_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResumeSubmit {
    Saved { id: Uuid, navigate: Route },
    Rejected { reasons: Vec<String> },
    Failed,
}

/// The add resume version page.
pub struct ResumeFormController {
    store: Arc<dyn RecordStore>,
    form: ResumeForm,
    saving: bool,
}

impl ResumeFormController {
    pub fn new(store: Arc<dyn RecordStore>, form: ResumeForm) -> Self {
        Self {
            store,
            form,
            saving: false,
        }
    }

    pub fn form(&self) -> &ResumeForm {
        &self.form
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// `uploaded_at` becomes the version's upload date; it is never edited later.
    pub async fn submit(&mut self, uploaded_at: DateTime<Utc>) -> ResumeSubmit {
        if self.form.version_name.trim().is_empty() {
            return ResumeSubmit::Rejected {
                reasons: vec!["versionName is required".to_string()],
            };
        }
        self.saving = true;

        let resume = ResumeVersion {
            id: Uuid::new_v4(),
            version_name: self.form.version_name.clone(),
            resume_file_url: normalize_optional(&self.form.resume_file_url),
            upload_date: Some(uploaded_at),
            description: normalize_optional(&self.form.description),
            is_active: self.form.is_active,
            file_name: normalize_optional(&self.form.file_name),
            created_date: None,
            updated_date: None,
        };
        match store::create(self.store.as_ref(), &resume).await {
            Ok(stored) => {
                info!("Created resume version {} ({})", stored.id, stored.version_name);
                ResumeSubmit::Saved {
                    id: stored.id,
                    navigate: Route::Resumes,
                }
            }
            Err(e) => {
                error!("Error creating resume: {e}");
                self.saving = false;
                ResumeSubmit::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::UnavailableStore;
    use crate::store::MemoryRecordStore;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_submit_stamps_upload_date_and_normalizes() {
        let mem = Arc::new(MemoryRecordStore::new());
        let at = Utc.with_ymd_and_hms(2025, 5, 4, 12, 0, 0).unwrap();
        let mut ctl = ResumeFormController::new(
            mem.clone(),
            ResumeForm {
                version_name: "Backend focus".to_string(),
                description: "  ".to_string(),
                file_name: "cv.pdf".to_string(),
                ..ResumeForm::default()
            },
        );

        let ResumeSubmit::Saved { id, navigate } = ctl.submit(at).await else {
            panic!("expected the create to succeed");
        };
        assert_eq!(navigate, Route::Resumes);

        let stored: ResumeVersion = store::get_by_id(mem.as_ref(), id).await.unwrap();
        assert_eq!(stored.upload_date, Some(at));
        assert_eq!(stored.description, None);
        assert_eq!(stored.resume_file_url, None);
        assert_eq!(stored.file_name.as_deref(), Some("cv.pdf"));
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn test_version_name_is_required() {
        let mut ctl = ResumeFormController::new(Arc::new(MemoryRecordStore::new()), ResumeForm::default());
        assert!(matches!(ctl.submit(Utc::now()).await, ResumeSubmit::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_failure_resets_saving() {
        let mut ctl = ResumeFormController::new(
            Arc::new(UnavailableStore),
            ResumeForm {
                version_name: "v1".to_string(),
                ..ResumeForm::default()
            },
        );
        assert_eq!(ctl.submit(Utc::now()).await, ResumeSubmit::Failed);
        assert!(!ctl.is_saving());
        assert_eq!(ctl.form().version_name, "v1");
    }
}
