//! Enrollment sub-client.

use crate::client::CourseHubClient;
use crate::domain::course::Course;
use crate::domain::enrollment::{
    EnrollRequest, EnrollResponse, Enrollment, DEFAULT_ENROLLED_MESSAGE,
};
use crate::error::SdkError;

pub struct Enrollments<'a> {
    pub(crate) client: &'a CourseHubClient,
}

impl<'a> Enrollments<'a> {
    /// Enroll the signed-in user in `course_id`.
    pub async fn enroll(&self, course_id: &str) -> Result<Enrollment, SdkError> {
        let request = EnrollRequest {
            course_id: course_id.to_string(),
        };
        let resp: EnrollResponse = self.client.http.post("/enroll", &request).await?;
        tracing::info!(course_id = %course_id, "enrolled");

        Ok(Enrollment {
            course_id: request.course_id,
            message: resp
                .message
                .unwrap_or_else(|| DEFAULT_ENROLLED_MESSAGE.to_string()),
        })
    }

    /// Enroll in an already-fetched course, refusing locally when it is full.
    pub async fn enroll_in(&self, course: &Course) -> Result<Enrollment, SdkError> {
        if course.is_full() {
            return Err(SdkError::Validation(format!(
                "Course is full: {}",
                course.title
            )));
        }
        self.enroll(&course.id).await
    }
}
