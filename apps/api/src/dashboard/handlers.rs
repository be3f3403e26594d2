use axum::{extract::State, Json};

use crate::dashboard::controller::{DashboardController, DashboardView};
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let mut dashboard = DashboardController::new(state.store.clone());
    dashboard.load().await;
    Json(dashboard.view())
}
