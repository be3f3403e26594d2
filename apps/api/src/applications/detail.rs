use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{ApplicationStatus, JobApplication};
use crate::navigation::Route;
use crate::sequencing::EntityLocks;
use crate::store::{self, RecordStore};

/// The only field a status change writes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPatch {
    application_status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "application", rename_all = "snake_case")]
pub enum DetailState {
    Loading,
    Found(JobApplication),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusUpdate {
    Applied { status: ApplicationStatus },
    Failed,
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    Deleted { navigate: Route },
    /// Stay on the page; the cause is only logged.
    Failed,
    NotLoaded,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailView {
    pub state: DetailState,
    pub edit_route: Route,
    pub back_route: Route,
}

/// One application's page: show it, change its status, delete it.
pub struct ApplicationDetailController {
    store: Arc<dyn RecordStore>,
    locks: EntityLocks,
    id: Uuid,
    state: DetailState,
}

impl ApplicationDetailController {
    pub fn new(store: Arc<dyn RecordStore>, locks: EntityLocks, id: Uuid) -> Self {
        Self {
            store,
            locks,
            id,
            state: DetailState::Loading,
        }
    }

    /// Not-found and fetch failures both end in `NotFound`; nothing is retried.
    pub async fn load(&mut self) {
        self.state = match store::get_by_id::<JobApplication>(self.store.as_ref(), self.id).await {
            Ok(app) => DetailState::Found(app),
            Err(e) if e.is_not_found() => {
                info!("Application {} not found", self.id);
                DetailState::NotFound
            }
            Err(e) => {
                warn!("Error loading application {}: {e}", self.id);
                DetailState::NotFound
            }
        };
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Writes only `applicationStatus`. The local copy changes once the write
    /// has succeeded.
    pub async fn update_status(&mut self, new_status: ApplicationStatus) -> StatusUpdate {
        if !matches!(self.state, DetailState::Found(_)) {
            return StatusUpdate::NotLoaded;
        }
        let result = {
            let _guard = self.locks.acquire(self.id).await;
            store::update::<JobApplication, _>(
                self.store.as_ref(),
                self.id,
                &StatusPatch {
                    application_status: new_status,
                },
            )
            .await
        };

        match result {
            Ok(_) => {
                if let DetailState::Found(app) = &mut self.state {
                    app.application_status = new_status;
                }
                info!("Application {} status set to {new_status}", self.id);
                StatusUpdate::Applied { status: new_status }
            }
            Err(e) if e.is_not_found() => {
                info!("Application {} was deleted before its status change", self.id);
                self.state = DetailState::NotFound;
                StatusUpdate::NotLoaded
            }
            Err(e) => {
                error!("Error updating status of application {}: {e}", self.id);
                StatusUpdate::Failed
            }
        }
    }

    /// Deletes after the user confirmed, then heads back to the list.
    pub async fn delete(&mut self, confirmed: bool) -> DeleteOutcome {
        if !matches!(self.state, DetailState::Found(_)) {
            return DeleteOutcome::NotLoaded;
        }
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }
        let result = {
            let _guard = self.locks.acquire(self.id).await;
            store::delete::<JobApplication>(self.store.as_ref(), self.id).await
        };
        match result {
            Ok(()) => {
                info!("Deleted application {}", self.id);
                DeleteOutcome::Deleted {
                    navigate: Route::Applications,
                }
            }
            Err(e) => {
                error!("Error deleting application {}: {e}", self.id);
                DeleteOutcome::Failed
            }
        }
    }

    pub fn view(&self) -> ApplicationDetailView {
        ApplicationDetailView {
            state: self.state.clone(),
            edit_route: Route::EditApplication(self.id),
            back_route: Route::Applications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::UnavailableStore;
    use crate::store::MemoryRecordStore;
    use chrono::NaiveDate;

    async fn seeded() -> (Arc<MemoryRecordStore>, JobApplication) {
        let mem = Arc::new(MemoryRecordStore::new());
        let app = JobApplication {
            id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            application_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            application_status: ApplicationStatus::Applied,
            company_response: Some("Phone screen booked".to_string()),
            job_posting_url: Some("https://acme.example/jobs/1".to_string()),
            job_location: Some("Berlin".to_string()),
            created_date: None,
            updated_date: None,
        };
        let stored = store::create(mem.as_ref(), &app).await.unwrap();
        (mem, stored)
    }

    #[tokio::test]
    async fn test_status_update_changes_only_status() {
        let (mem, before) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem.clone(), EntityLocks::new(), before.id);
        detail.load().await;

        let outcome = detail.update_status(ApplicationStatus::Interviewing).await;
        assert_eq!(
            outcome,
            StatusUpdate::Applied {
                status: ApplicationStatus::Interviewing
            }
        );

        let after: JobApplication = store::get_by_id(mem.as_ref(), before.id).await.unwrap();
        assert_eq!(after.application_status, ApplicationStatus::Interviewing);
        assert_eq!(
            JobApplication {
                application_status: before.application_status,
                updated_date: before.updated_date,
                ..after.clone()
            },
            before
        );

        let DetailState::Found(local) = detail.state() else {
            panic!("expected a loaded application");
        };
        assert_eq!(local.application_status, ApplicationStatus::Interviewing);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let mem = Arc::new(MemoryRecordStore::new());
        let mut detail = ApplicationDetailController::new(mem, EntityLocks::new(), Uuid::new_v4());
        detail.load().await;
        assert_eq!(detail.state(), &DetailState::NotFound);
        assert_eq!(
            detail.update_status(ApplicationStatus::Offered).await,
            StatusUpdate::NotLoaded
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_found() {
        let mut detail =
            ApplicationDetailController::new(Arc::new(UnavailableStore), EntityLocks::new(), Uuid::new_v4());
        detail.load().await;
        assert_eq!(detail.state(), &DetailState::NotFound);
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_keeps_record() {
        let (mem, app) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem.clone(), EntityLocks::new(), app.id);
        detail.load().await;

        assert_eq!(detail.delete(false).await, DeleteOutcome::Cancelled);
        assert!(store::get_by_id::<JobApplication>(mem.as_ref(), app.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_confirmed_delete_then_fetch_is_not_found() {
        let (mem, app) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem.clone(), EntityLocks::new(), app.id);
        detail.load().await;

        assert_eq!(
            detail.delete(true).await,
            DeleteOutcome::Deleted {
                navigate: Route::Applications
            }
        );
        let err = store::get_by_id::<JobApplication>(mem.as_ref(), app.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_change_after_removal_is_not_loaded() {
        let (mem, app) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem.clone(), EntityLocks::new(), app.id);
        detail.load().await;
        store::delete::<JobApplication>(mem.as_ref(), app.id).await.unwrap();

        assert_eq!(
            detail.update_status(ApplicationStatus::Offered).await,
            StatusUpdate::NotLoaded
        );
        assert_eq!(detail.state(), &DetailState::NotFound);
    }

    #[tokio::test]
    async fn test_status_change_store_failure_is_failed() {
        let (mem, app) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem, EntityLocks::new(), app.id);
        detail.load().await;
        detail.store = Arc::new(UnavailableStore);

        assert_eq!(
            detail.update_status(ApplicationStatus::Offered).await,
            StatusUpdate::Failed
        );
        assert!(matches!(detail.state(), DetailState::Found(_)));
    }

    #[tokio::test]
    async fn test_delete_failure_stays_on_page() {
        let (mem, app) = seeded().await;
        let mut detail = ApplicationDetailController::new(mem.clone(), EntityLocks::new(), app.id);
        detail.load().await;
        // Someone else removed it in the meantime.
        store::delete::<JobApplication>(mem.as_ref(), app.id).await.unwrap();

        assert_eq!(detail.delete(true).await, DeleteOutcome::Failed);
        assert!(matches!(detail.state(), DetailState::Found(_)));
    }
}
