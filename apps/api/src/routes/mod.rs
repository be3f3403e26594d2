pub mod health;
pub mod home;

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::applications::handlers as applications;
use crate::dashboard::handlers as dashboard;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/routes/resolve", get(home::resolve_handler))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list).post(applications::handle_create),
        )
        .route("/api/v1/applications/new", get(applications::handle_new_form))
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get)
                .put(applications::handle_edit)
                .delete(applications::handle_delete),
        )
        .route(
            "/api/v1/applications/:id/edit",
            get(applications::handle_edit_form),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_create),
        )
        .route("/api/v1/resumes/new", get(resumes::handle_new_form))
        .route("/api/v1/resumes/:id", delete(resumes::handle_delete))
        .route("/api/v1/resumes/:id/active", patch(resumes::handle_toggle_active))
        .fallback(home::fallback_handler)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::store::MemoryRecordStore;

    fn app() -> Router {
        let state = AppState::new(Arc::new(MemoryRecordStore::new()), Config::for_tests());
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_application(app: &Router, company: &str, date: &str) -> String {
        let response = send(
            app,
            Method::POST,
            "/api/v1/applications",
            Some(json!({
                "companyName": company,
                "jobTitle": "Engineer",
                "applicationDate": date,
                "applicationStatus": "Applied",
                "jobLocation": ""
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["navigate"], "/applications");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_and_home() {
        let app = app();
        let health = send(&app, Method::GET, "/health", None).await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(json_body(health).await["store"], "memory");

        let home = send(&app, Method::GET, "/", None).await;
        assert_eq!(home.status(), StatusCode::OK);
        assert_eq!(json_body(home).await["links"][0]["route"], "/dashboard");
    }

    #[tokio::test]
    async fn test_unmatched_path_redirects_home() {
        let response = send(&app(), Method::GET, "/nowhere/at/all", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_resolve_page_paths() {
        let app = app();
        let id = uuid::Uuid::new_v4();
        let body = json_body(
            send(&app, Method::GET, &format!("/api/v1/routes/resolve?path=/applications/{id}/edit"), None)
                .await,
        )
        .await;
        assert_eq!(body["route"], format!("/applications/{id}/edit"));

        let body = json_body(
            send(&app, Method::GET, "/api/v1/routes/resolve?path=/profile", None).await,
        )
        .await;
        assert_eq!(body["route"], "/");
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = app();
        let id = create_application(&app, "Acme", "2025-01-10").await;

        let response = send(&app, Method::GET, &format!("/api/v1/applications/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let record = &body["state"]["application"];
        assert_eq!(body["state"]["state"], "found");
        assert_eq!(record["companyName"], "Acme");
        assert_eq!(record["jobTitle"], "Engineer");
        assert_eq!(record["applicationDate"], "2025-01-10");
        assert_eq!(record["applicationStatus"], "Applied");
        assert!(record.get("jobLocation").is_none());
        assert!(record.get("companyResponse").is_none());
        assert!(record.get("jobPostingUrl").is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let app = app();
        create_application(&app, "Acme", "2025-01-01").await;
        create_application(&app, "Globex", "2025-03-15").await;
        create_application(&app, "Initech", "2025-02-01").await;

        let body = json_body(send(&app, Method::GET, "/api/v1/applications", None).await).await;
        let dates: Vec<&str> = body["applications"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["applicationDate"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2025-03-15", "2025-02-01", "2025-01-01"]);

        let body = json_body(
            send(&app, Method::GET, "/api/v1/applications?q=glob&status=Applied", None).await,
        )
        .await;
        assert_eq!(body["found"], 1);
        assert_eq!(body["statusFilter"], "Applied");

        let bad = send(&app, Method::GET, "/api/v1/applications?status=Ghosted", None).await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(bad).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_input_uses_error_envelope() {
        let app = app();
        let id = create_application(&app, "Acme", "2025-01-10").await;

        let bad_status = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/applications/{id}/status"),
            Some(json!({ "applicationStatus": "Ghosted" })),
        )
        .await;
        assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(bad_status).await["error"]["code"], "VALIDATION_ERROR");

        let bad_id = send(&app, Method::GET, "/api/v1/applications/not-a-uuid", None).await;
        assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(bad_id).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_status_change_on_removed_application_is_not_found() {
        let app = app();
        let id = create_application(&app, "Acme", "2025-01-10").await;
        let uri = format!("/api/v1/applications/{id}");
        send(&app, Method::DELETE, &format!("{uri}?confirm=true"), None).await;

        let response = send(
            &app,
            Method::PATCH,
            &format!("{uri}/status"),
            Some(json!({ "applicationStatus": "Offered" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_status_change_and_confirmed_delete() {
        let app = app();
        let id = create_application(&app, "Acme", "2025-01-10").await;
        let uri = format!("/api/v1/applications/{id}");

        let response = send(
            &app,
            Method::PATCH,
            &format!("{uri}/status"),
            Some(json!({ "applicationStatus": "Interviewing" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["state"]["application"]["applicationStatus"], "Interviewing");
        assert_eq!(body["state"]["application"]["companyName"], "Acme");

        let cancelled = json_body(send(&app, Method::DELETE, &uri, None).await).await;
        assert_eq!(cancelled["outcome"], "cancelled");

        let deleted =
            json_body(send(&app, Method::DELETE, &format!("{uri}?confirm=true"), None).await).await;
        assert_eq!(deleted["outcome"], "deleted");
        assert_eq!(deleted["navigate"], "/applications");

        let gone = send(&app, Method::GET, &uri, None).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_flow() {
        let app = app();
        let id = create_application(&app, "Acme", "2025-01-10").await;

        let form = json_body(
            send(&app, Method::GET, &format!("/api/v1/applications/{id}/edit"), None).await,
        )
        .await;
        assert_eq!(form["form"]["jobLocation"], "");

        let mut edited = form["form"].clone();
        edited["jobLocation"] = json!("Lisbon");
        let response = send(
            &app,
            Method::PUT,
            &format!("/api/v1/applications/{id}"),
            Some(edited),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["navigate"], format!("/applications/{id}"));

        let missing = send(
            &app,
            Method::GET,
            &format!("/api/v1/applications/{}/edit", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_required_field_is_rejected() {
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/applications",
            Some(json!({ "companyName": "", "jobTitle": "Engineer", "applicationDate": "2025-01-10" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_resume_flow() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "versionName": "Backend v1", "fileName": "" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let toggled = json_body(
            send(&app, Method::PATCH, &format!("/api/v1/resumes/{id}/active"), None).await,
        )
        .await;
        assert_eq!(toggled["outcome"], "toggled");
        assert_eq!(toggled["isActive"], true);
        assert_eq!(toggled["list"]["activeCount"], 1);
        assert!(toggled["list"]["resumes"][0].get("fileName").is_none());

        let deleted = json_body(
            send(&app, Method::DELETE, &format!("/api/v1/resumes/{id}?confirm=true"), None).await,
        )
        .await;
        assert_eq!(deleted["outcome"], "deleted");
        assert_eq!(deleted["list"]["resumes"], json!([]));
    }

    #[tokio::test]
    async fn test_dashboard_omits_empty_statuses() {
        let app = app();
        create_application(&app, "Acme", "2025-01-10").await;

        let body = json_body(send(&app, Method::GET, "/api/v1/dashboard", None).await).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["applied"], 1);
        assert_eq!(body["offered"], 0);
        let series = body["statusSeries"].as_array().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0]["name"], "Applied");
        assert_eq!(series[0]["color"], "#BEEB00");
    }
}
