//! Enrollment domain: enrolling the signed-in student in a course.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};

/// `POST /enroll` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: String,
}

/// `POST /enroll` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a successful enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub course_id: String,
    pub message: String,
}

pub(crate) const DEFAULT_ENROLLED_MESSAGE: &str = "Enrolled successfully! Welcome to the course.";
