use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::ResumeVersion;
use crate::navigation::Route;
use crate::store::{self, RecordStore};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivePatch {
    is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResumeAction {
    Toggled {
        #[serde(rename = "isActive")]
        is_active: bool,
    },
    Cancelled,
    Deleted,
    Failed,
    /// The id is not in the loaded list.
    Unknown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeListView {
    pub loading: bool,
    pub resumes: Vec<ResumeVersion>,
    pub active_count: usize,
    pub add_route: Route,
}

/// The resume versions page. Every change is followed by a full reload;
/// the local list is never patched in place.
pub struct ResumeListController {
    store: Arc<dyn RecordStore>,
    resumes: Vec<ResumeVersion>,
    loading: bool,
}

impl ResumeListController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            resumes: Vec::new(),
            loading: true,
        }
    }

    /// Newest upload first; a missing upload date sorts as the epoch.
    pub async fn load(&mut self) {
        match store::get_all::<ResumeVersion>(self.store.as_ref()).await {
            Ok(result) => {
                let mut resumes = result.items;
                resumes.sort_by_key(|r| Reverse(r.uploaded_or_epoch()));
                self.resumes = resumes;
            }
            Err(e) => {
                warn!("Error loading resumes: {e}");
                self.resumes.clear();
            }
        }
        self.loading = false;
    }

    pub fn resumes(&self) -> &[ResumeVersion] {
        &self.resumes
    }

    /// Every version currently flagged active. Zero, one or many.
    pub fn active(&self) -> impl Iterator<Item = &ResumeVersion> {
        self.resumes.iter().filter(|r| r.is_active)
    }

    /// Flips `isActive` on one version. Other versions are left alone.
    pub async fn toggle_active(&mut self, id: Uuid) -> ResumeAction {
        let Some(current) = self.resumes.iter().find(|r| r.id == id).map(|r| r.is_active) else {
            return ResumeAction::Unknown;
        };
        let patch = ActivePatch { is_active: !current };
        match store::update::<ResumeVersion, _>(self.store.as_ref(), id, &patch).await {
            Ok(_) => {
                info!("Resume {id} active = {}", patch.is_active);
                self.load().await;
                ResumeAction::Toggled {
                    is_active: patch.is_active,
                }
            }
            Err(e) => {
                error!("Error updating resume {id}: {e}");
                ResumeAction::Failed
            }
        }
    }

    pub async fn delete(&mut self, id: Uuid, confirmed: bool) -> ResumeAction {
        if !self.resumes.iter().any(|r| r.id == id) {
            return ResumeAction::Unknown;
        }
        if !confirmed {
            return ResumeAction::Cancelled;
        }
        match store::delete::<ResumeVersion>(self.store.as_ref(), id).await {
            Ok(()) => {
                info!("Deleted resume {id}");
                self.load().await;
                ResumeAction::Deleted
            }
            Err(e) => {
                error!("Error deleting resume {id}: {e}");
                ResumeAction::Failed
            }
        }
    }

    pub fn view(&self) -> ResumeListView {
        ResumeListView {
            loading: self.loading,
            resumes: self.resumes().to_vec(),
            active_count: self.active().count(),
            add_route: Route::NewResume,
        }
    }
}
