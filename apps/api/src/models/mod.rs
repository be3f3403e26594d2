pub mod application;
pub mod resume;

pub use application::{ApplicationStatus, JobApplication};
pub use resume::ResumeVersion;

/// Empty or whitespace-only form input is stored as absent, never as "".
pub fn normalize_optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
