//! Axum route handlers for the applications pages.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::detail::{
    ApplicationDetailController, ApplicationDetailView, DeleteOutcome, DetailState, StatusUpdate,
};
use crate::applications::filter::StatusFilter;
use crate::applications::form::{ApplicationForm, ApplicationFormController, SubmitOutcome};
use crate::applications::list::{ApplicationListController, ApplicationListView};
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::models::ApplicationStatus;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub application_status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub form: ApplicationForm,
    pub saving: bool,
    pub statuses: [ApplicationStatus; 4],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications?q=&status=
pub async fn handle_list(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListQuery>,
) -> Json<ApplicationListView> {
    let mut list = ApplicationListController::new(state.store.clone());
    list.load().await;
    list.set_query(params.q);
    list.set_status_filter(params.status);
    Json(list.view())
}

/// GET /api/v1/applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ApplicationDetailView>, AppError> {
    let detail = load_detail(&state, id).await?;
    Ok(Json(detail.view()))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<StatusChange>,
) -> Result<Json<ApplicationDetailView>, AppError> {
    let mut detail = load_detail(&state, id).await?;
    match detail.update_status(req.application_status).await {
        StatusUpdate::Applied { .. } => Ok(Json(detail.view())),
        StatusUpdate::Failed => Err(AppError::SaveFailed("the status change".to_string())),
        StatusUpdate::NotLoaded => Err(not_found(id)),
    }
}

/// DELETE /api/v1/applications/:id?confirm=true
pub async fn handle_delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidQuery(params): ValidQuery<ConfirmQuery>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let mut detail = load_detail(&state, id).await?;
    match detail.delete(params.confirm).await {
        DeleteOutcome::Failed => Err(AppError::SaveFailed("the deletion".to_string())),
        DeleteOutcome::NotLoaded => Err(not_found(id)),
        outcome => Ok(Json(outcome)),
    }
}

/// GET /api/v1/applications/new
pub async fn handle_new_form(State(state): State<AppState>) -> Json<FormResponse> {
    let ctl = ApplicationFormController::for_create(
        state.store.clone(),
        state.locks.clone(),
        ApplicationForm::blank(Utc::now().date_naive()),
    );
    Json(form_response(&ctl))
}

/// POST /api/v1/applications
pub async fn handle_create(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<ApplicationForm>,
) -> Result<(StatusCode, Json<SubmitOutcome>), AppError> {
    let mut ctl = ApplicationFormController::for_create(state.store.clone(), state.locks.clone(), form);
    submitted(ctl.submit().await, StatusCode::CREATED)
}

/// GET /api/v1/applications/:id/edit
pub async fn handle_edit_form(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<FormResponse>, AppError> {
    let ctl = ApplicationFormController::for_edit(state.store.clone(), state.locks.clone(), id)
        .await
        .ok_or_else(|| not_found(id))?;
    Ok(Json(form_response(&ctl)))
}

/// PUT /api/v1/applications/:id
pub async fn handle_edit(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(form): ValidJson<ApplicationForm>,
) -> Result<(StatusCode, Json<SubmitOutcome>), AppError> {
    let mut ctl = ApplicationFormController::for_edit(state.store.clone(), state.locks.clone(), id)
        .await
        .ok_or_else(|| not_found(id))?;
    ctl.set_form(form);
    submitted(ctl.submit().await, StatusCode::OK)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_detail(state: &AppState, id: Uuid) -> Result<ApplicationDetailController, AppError> {
    let mut detail = ApplicationDetailController::new(state.store.clone(), state.locks.clone(), id);
    detail.load().await;
    if *detail.state() == DetailState::NotFound {
        return Err(not_found(id));
    }
    Ok(detail)
}

fn form_response(ctl: &ApplicationFormController) -> FormResponse {
    FormResponse {
        form: ctl.form().clone(),
        saving: ctl.is_saving(),
        statuses: ApplicationStatus::ALL,
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

fn submitted(
    outcome: SubmitOutcome,
    success: StatusCode,
) -> Result<(StatusCode, Json<SubmitOutcome>), AppError> {
    match outcome {
        SubmitOutcome::Saved { .. } => Ok((success, Json(outcome))),
        SubmitOutcome::Rejected { reasons } => Err(AppError::Validation(reasons.join("; "))),
        SubmitOutcome::Failed => Err(AppError::SaveFailed("the application".to_string())),
    }
}
