//! Courses sub-client: browse, search, and (admin) create/edit/delete.

use crate::client::CourseHubClient;
use crate::domain::course::wire::{CourseEnvelope, CourseResponse, CoursesResponse};
use crate::domain::course::{Course, CourseInput, ValidationError};
use crate::error::{HttpError, SdkError};
use crate::http::RequestOptions;

/// Sub-client for course operations.
pub struct Courses<'a> {
    pub(crate) client: &'a CourseHubClient,
}

impl<'a> Courses<'a> {
    /// All courses.
    pub async fn list(&self) -> Result<Vec<Course>, SdkError> {
        self.search("").await
    }

    /// Courses matching `query`. An empty query lists everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Course>, SdkError> {
        let query = query.trim();
        let mut options = RequestOptions::default();
        if !query.is_empty() {
            options = options.query("q", query);
        }

        let resp: CoursesResponse = self.client.http.get("/courses", options).await?;
        resp.courses.into_iter().map(validate).collect()
    }

    /// A single course by id.
    pub async fn get(&self, id: &str) -> Result<Course, SdkError> {
        let resp: CourseEnvelope = self
            .client
            .http
            .get(&course_path(id), RequestOptions::default())
            .await?;
        match resp.course {
            Some(course) => validate(course),
            None => Err(HttpError::NotFound(format!("Course not found: {}", id)).into()),
        }
    }

    /// Create a course. Returns the stored course when the backend echoes it.
    pub async fn create(&self, input: &CourseInput) -> Result<Option<Course>, SdkError> {
        let resp: CourseEnvelope = self.client.http.post("/courses", input).await?;
        tracing::info!(title = %input.title, "course created");
        resp.course.map(validate).transpose()
    }

    /// Update a course. Returns the stored course when the backend echoes it.
    pub async fn update(&self, id: &str, input: &CourseInput) -> Result<Option<Course>, SdkError> {
        let resp: CourseEnvelope = self.client.http.patch(&course_path(id), input).await?;
        tracing::info!(course_id = %id, "course updated");
        resp.course.map(validate).transpose()
    }

    pub async fn delete(&self, id: &str) -> Result<(), SdkError> {
        let _: serde_json::Value = self.client.http.delete(&course_path(id)).await?;
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }
}

fn course_path(id: &str) -> String {
    format!("/courses/{}", urlencoding::encode(id))
}

fn validate(resp: CourseResponse) -> Result<Course, SdkError> {
    Course::try_from(resp).map_err(|e: ValidationError| SdkError::Validation(e.to_string()))
}
