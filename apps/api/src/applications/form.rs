use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{normalize_optional, ApplicationStatus, JobApplication};
use crate::navigation::Route;
use crate::sequencing::EntityLocks;
use crate::store::{self, Entity, RecordStore};

/// Raw form fields, as typed. Optional fields are empty strings until submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub application_date: String,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub company_response: String,
    #[serde(default)]
    pub job_posting_url: String,
    #[serde(default)]
    pub job_location: String,
}

impl ApplicationForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            company_name: String::new(),
            job_title: String::new(),
            application_date: today.format("%Y-%m-%d").to_string(),
            application_status: ApplicationStatus::Applied,
            company_response: String::new(),
            job_posting_url: String::new(),
            job_location: String::new(),
        }
    }

    pub fn from_application(app: &JobApplication) -> Self {
        Self {
            company_name: app.company_name.clone(),
            job_title: app.job_title.clone(),
            application_date: app
                .application_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            application_status: app.application_status,
            company_response: app.company_response.clone().unwrap_or_default(),
            job_posting_url: app.job_posting_url.clone().unwrap_or_default(),
            job_location: app.job_location.clone().unwrap_or_default(),
        }
    }

    /// Names of required fields left blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("companyName", &self.company_name),
            ("jobTitle", &self.job_title),
            ("applicationDate", &self.application_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn parsed_date(&self) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(self.application_date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("applicationDate '{}': {e}", self.application_date))
    }

    fn fields(&self, date: NaiveDate) -> ApplicationFields {
        ApplicationFields {
            company_name: self.company_name.clone(),
            job_title: self.job_title.clone(),
            application_date: date,
            application_status: self.application_status,
            company_response: normalize_optional(&self.company_response),
            job_posting_url: normalize_optional(&self.job_posting_url),
            job_location: normalize_optional(&self.job_location),
        }
    }
}

/// Every user-editable field, sent as one combined write on edit. Cleared
/// optionals serialize as `null`, which the store turns into "absent".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationFields {
    company_name: String,
    job_title: String,
    application_date: NaiveDate,
    application_status: ApplicationStatus,
    company_response: Option<String>,
    job_posting_url: Option<String>,
    job_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Saved { id: Uuid, navigate: Route },
    /// Required fields were blank or malformed; nothing was written.
    Rejected { reasons: Vec<String> },
    /// The write failed. The form stays as typed and can be submitted again.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Edit(Uuid),
}

/// The add and edit application pages.
pub struct ApplicationFormController {
    store: Arc<dyn RecordStore>,
    locks: EntityLocks,
    mode: Mode,
    form: ApplicationForm,
    saving: bool,
}

impl ApplicationFormController {
    pub fn for_create(store: Arc<dyn RecordStore>, locks: EntityLocks, form: ApplicationForm) -> Self {
        Self {
            store,
            locks,
            mode: Mode::Create,
            form,
            saving: false,
        }
    }

    /// Pre-fills the edit form from the stored record. `None` when it cannot
    /// be loaded (missing or fetch failure alike).
    pub async fn for_edit(store: Arc<dyn RecordStore>, locks: EntityLocks, id: Uuid) -> Option<Self> {
        match store::get_by_id::<JobApplication>(store.as_ref(), id).await {
            Ok(app) => Some(Self {
                form: ApplicationForm::from_application(&app),
                store,
                locks,
                mode: Mode::Edit(id),
                saving: false,
            }),
            Err(e) => {
                warn!("Error loading application {id} for edit: {e}");
                None
            }
        }
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn set_form(&mut self, form: ApplicationForm) {
        self.form = form;
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return SubmitOutcome::Rejected {
                reasons: missing.iter().map(|f| format!("{f} is required")).collect(),
            };
        }
        let date = match self.form.parsed_date() {
            Ok(date) => date,
            Err(reason) => return SubmitOutcome::Rejected { reasons: vec![reason] },
        };

        self.saving = true;
        let fields = self.form.fields(date);
        let outcome = match self.mode {
            Mode::Create => self.create(fields).await,
            Mode::Edit(id) => self.edit(id, fields).await,
        };
        if outcome == SubmitOutcome::Failed {
            self.saving = false;
        }
        outcome
    }

    async fn create(&self, fields: ApplicationFields) -> SubmitOutcome {
        let application = JobApplication {
            id: Uuid::new_v4(),
            company_name: fields.company_name,
            job_title: fields.job_title,
            application_date: Some(fields.application_date),
            application_status: fields.application_status,
            company_response: fields.company_response,
            job_posting_url: fields.job_posting_url,
            job_location: fields.job_location,
            created_date: None,
            updated_date: None,
        };
        match store::create(self.store.as_ref(), &application).await {
            Ok(stored) => {
                info!("Created application {}", stored.id());
                SubmitOutcome::Saved {
                    id: stored.id(),
                    navigate: Route::Applications,
                }
            }
            Err(e) => {
                error!("Error creating application: {e}");
                SubmitOutcome::Failed
            }
        }
    }

    async fn edit(&self, id: Uuid, fields: ApplicationFields) -> SubmitOutcome {
        let _guard = self.locks.acquire(id).await;
        match store::update::<JobApplication, _>(self.store.as_ref(), id, &fields).await {
            Ok(_) => {
                info!("Updated application {id}");
                SubmitOutcome::Saved {
                    id,
                    navigate: Route::ApplicationDetail(id),
                }
            }
            Err(e) => {
                error!("Error updating application {id}: {e}");
                SubmitOutcome::Failed
            }
        }
    }
}
