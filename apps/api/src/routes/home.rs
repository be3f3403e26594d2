use axum::{
    extract::OriginalUri,
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::ValidQuery;
use crate::navigation::Route;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub service: &'static str,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// GET /
pub async fn home_handler() -> Json<HomeResponse> {
    Json(HomeResponse {
        service: "jobtrack",
        links: vec![
            NavLink {
                label: "Dashboard",
                route: Route::Dashboard,
            },
            NavLink {
                label: "Applications",
                route: Route::Applications,
            },
            NavLink {
                label: "Resumes",
                route: Route::Resumes,
            },
        ],
    })
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub route: Route,
}

/// GET /api/v1/routes/resolve?path=
/// Maps a client page path onto the route table; unknown paths resolve to home.
pub async fn resolve_handler(ValidQuery(params): ValidQuery<ResolveQuery>) -> Json<ResolveResponse> {
    Json(ResolveResponse {
        route: Route::resolve(&params.path),
    })
}

/// Any unmatched path goes back home.
pub async fn fallback_handler(OriginalUri(uri): OriginalUri) -> Redirect {
    debug!("No route for {uri}, redirecting home");
    Redirect::to(&Route::Home.path())
}
