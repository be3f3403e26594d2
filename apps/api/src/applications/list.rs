use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::applications::filter::{filter_and_sort, StatusFilter};
use crate::models::JobApplication;
use crate::navigation::Route;
use crate::store::{self, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing has been recorded yet.
    NoApplications,
    /// Records exist but the search or status filter hides all of them.
    NoMatches,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListView {
    pub loading: bool,
    pub query: String,
    pub status_filter: StatusFilter,
    pub total: usize,
    pub found: usize,
    pub applications: Vec<JobApplication>,
    pub empty_state: Option<EmptyState>,
    pub add_route: Route,
}

/// The applications list page: every record, narrowed by a search query and a
/// status filter, newest first.
pub struct ApplicationListController {
    store: Arc<dyn RecordStore>,
    applications: Vec<JobApplication>,
    visible: Vec<JobApplication>,
    query: String,
    status_filter: StatusFilter,
    loading: bool,
}

impl ApplicationListController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            applications: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            status_filter: StatusFilter::All,
            loading: true,
        }
    }

    /// Fetches every application. A failed fetch leaves an empty list.
    pub async fn load(&mut self) {
        match store::get_all::<JobApplication>(self.store.as_ref()).await {
            Ok(result) => self.applications = result.items,
            Err(e) => {
                warn!("Error loading applications: {e}");
                self.applications.clear();
            }
        }
        self.loading = false;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.recompute();
    }

    pub fn visible(&self) -> &[JobApplication] {
        &self.visible
    }

    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty() || self.status_filter != StatusFilter::All
    }

    pub fn view(&self) -> ApplicationListView {
        let visible = self.visible();
        let empty_state = match (visible.is_empty(), self.has_active_filters()) {
            (false, _) => None,
            (true, true) => Some(EmptyState::NoMatches),
            (true, false) => Some(EmptyState::NoApplications),
        };
        ApplicationListView {
            loading: self.loading,
            query: self.query.clone(),
            status_filter: self.status_filter,
            total: self.applications.len(),
            found: visible.len(),
            applications: visible.to_vec(),
            empty_state,
            add_route: Route::NewApplication,
        }
    }

    fn recompute(&mut self) {
        self.visible = filter_and_sort(&self.applications, &self.query, self.status_filter);
    }
}
