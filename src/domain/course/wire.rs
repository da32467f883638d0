//! Wire types for course responses (REST).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw course as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

/// `GET /courses` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoursesResponse {
    #[serde(default)]
    pub courses: Vec<CourseResponse>,
}

/// `GET /courses/{id}` response; also returned by create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseEnvelope {
    #[serde(default)]
    pub course: Option<CourseResponse>,
}
