//! Page routes. Controllers name the page to go to next as a `Route`;
//! it is serialized as its path.

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Dashboard,
    Applications,
    ApplicationDetail(Uuid),
    NewApplication,
    EditApplication(Uuid),
    Resumes,
    NewResume,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Applications => "/applications".to_string(),
            Route::ApplicationDetail(id) => format!("/applications/{id}"),
            Route::NewApplication => "/applications/new".to_string(),
            Route::EditApplication(id) => format!("/applications/{id}/edit"),
            Route::Resumes => "/resumes".to_string(),
            Route::NewResume => "/resumes/new".to_string(),
        }
    }

    /// Matches a page path. Anything unmatched, including a malformed id, is Home.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["dashboard"] => Route::Dashboard,
            ["applications"] => Route::Applications,
            ["applications", "new"] => Route::NewApplication,
            ["applications", id] => match Uuid::parse_str(id) {
                Ok(id) => Route::ApplicationDetail(id),
                Err(_) => Route::Home,
            },
            ["applications", id, "edit"] => match Uuid::parse_str(id) {
                Ok(id) => Route::EditApplication(id),
                Err(_) => Route::Home,
            },
            ["resumes"] => Route::Resumes,
            ["resumes", "new"] => Route::NewResume,
            _ => Route::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
