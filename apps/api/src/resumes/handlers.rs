//! Axum route handlers for the resume version pages.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::applications::handlers::ConfirmQuery;
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::resumes::form::{ResumeForm, ResumeFormController, ResumeSubmit};
use crate::resumes::list::{ResumeAction, ResumeListController, ResumeListView};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeActionResponse {
    #[serde(flatten)]
    pub action: ResumeAction,
    pub list: ResumeListView,
}

/// GET /api/v1/resumes
pub async fn handle_list(State(state): State<AppState>) -> Json<ResumeListView> {
    let mut list = ResumeListController::new(state.store.clone());
    list.load().await;
    Json(list.view())
}

#[derive(Debug, Serialize)]
pub struct ResumeFormResponse {
    pub form: ResumeForm,
    pub saving: bool,
}

/// GET /api/v1/resumes/new
pub async fn handle_new_form(State(state): State<AppState>) -> Json<ResumeFormResponse> {
    let ctl = ResumeFormController::new(state.store.clone(), ResumeForm::default());
    Json(ResumeFormResponse {
        form: ctl.form().clone(),
        saving: ctl.is_saving(),
    })
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<ResumeForm>,
) -> Result<(StatusCode, Json<ResumeSubmit>), AppError> {
    let mut ctl = ResumeFormController::new(state.store.clone(), form);
    match ctl.submit(Utc::now()).await {
        outcome @ ResumeSubmit::Saved { .. } => Ok((StatusCode::CREATED, Json(outcome))),
        ResumeSubmit::Rejected { reasons } => Err(AppError::Validation(reasons.join("; "))),
        ResumeSubmit::Failed => Err(AppError::SaveFailed("the resume version".to_string())),
    }
}

/// PATCH /api/v1/resumes/:id/active
pub async fn handle_toggle_active(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ResumeActionResponse>, AppError> {
    let mut list = ResumeListController::new(state.store.clone());
    list.load().await;
    let action = list.toggle_active(id).await;
    respond(id, action, list)
}

/// DELETE /api/v1/resumes/:id?confirm=true
pub async fn handle_delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidQuery(params): ValidQuery<ConfirmQuery>,
) -> Result<Json<ResumeActionResponse>, AppError> {
    let mut list = ResumeListController::new(state.store.clone());
    list.load().await;
    let action = list.delete(id, params.confirm).await;
    respond(id, action, list)
}

fn respond(
    id: Uuid,
    action: ResumeAction,
    list: ResumeListController,
) -> Result<Json<ResumeActionResponse>, AppError> {
    match action {
        ResumeAction::Unknown => Err(AppError::NotFound(format!("Resume version {id} not found"))),
        ResumeAction::Failed => Err(AppError::SaveFailed("the resume version".to_string())),
        action => Ok(Json(ResumeActionResponse {
            action,
            list: list.view(),
        })),
    }
}
