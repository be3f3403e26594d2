use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::dashboard::aggregation::DashboardStats;
use crate::models::JobApplication;
use crate::store::{self, RecordStore};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub loading: bool,
    #[serde(flatten)]
    pub stats: DashboardStats,
}

pub struct DashboardController {
    store: Arc<dyn RecordStore>,
    applications: Vec<JobApplication>,
    loading: bool,
}

impl DashboardController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            applications: Vec::new(),
            loading: true,
        }
    }

    pub async fn load(&mut self) {
        match store::get_all::<JobApplication>(self.store.as_ref()).await {
            Ok(result) => self.applications = result.items,
            Err(e) => {
                warn!("Error loading applications for dashboard: {e}");
                self.applications.clear();
            }
        }
        self.loading = false;
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            loading: self.loading,
            stats: DashboardStats::from_applications(&self.applications),
        }
    }
}
