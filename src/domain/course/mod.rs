//! Course domain: course types, validation, create/update input.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Course ──────────────────────────────────────────────────────────────────

/// A validated course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub instructor: Option<String>,
    /// Remaining seats; `None` when the course does not track capacity.
    pub seats: Option<u32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl Course {
    /// No seats left. Courses without a seat count are never full.
    pub fn is_full(&self) -> bool {
        self.seats == Some(0)
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description available")
    }
}

// ─── CourseInput ─────────────────────────────────────────────────────────────

/// Body for `POST /courses` and `PATCH /courses/{id}`.
///
/// Empty schedule dates are omitted from the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub seats: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl CourseInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn seats(mut self, seats: u32) -> Self {
        self.seats = seats;
        self
    }

    pub fn schedule(
        mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }
}

/// Prefill an edit form from an existing course.
impl From<&Course> for CourseInput {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone().unwrap_or_default(),
            instructor: course.instructor.clone().unwrap_or_default(),
            seats: course.seats.unwrap_or(0),
            starts_at: course.starts_at,
            ends_at: course.ends_at,
        }
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingId,
    MissingTitle,
    NegativeSeats(i64),
    SeatsOverflow(i64),
    /// `startsAt` is not before `endsAt`.
    InvalidSchedule,
    Multiple(String, Vec<ValidationError>),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingId => write!(f, "missing course id"),
            ValidationError::MissingTitle => write!(f, "missing title"),
            ValidationError::NegativeSeats(n) => write!(f, "negative seat count: {}", n),
            ValidationError::SeatsOverflow(n) => write!(f, "seat count out of range: {}", n),
            ValidationError::InvalidSchedule => write!(f, "start date must be before end date"),
            ValidationError::Multiple(id, errors) => {
                write!(f, "course {}: ", id)?;
                let parts: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "{}", parts.join("; "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}
