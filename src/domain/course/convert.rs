//! Conversion: CourseResponse → Course (TryFrom + validation).

use super::wire::CourseResponse;
use super::{Course, ValidationError};

impl TryFrom<CourseResponse> for Course {
    type Error = ValidationError;

    fn try_from(source: CourseResponse) -> Result<Self, Self::Error> {
        let mut errors: Vec<ValidationError> = Vec::new();

        if source.id.trim().is_empty() {
            errors.push(ValidationError::MissingId);
        }

        let title = source
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                errors.push(ValidationError::MissingTitle);
                String::new()
            });

        let seats = match source.seats {
            None => None,
            Some(n) if n < 0 => {
                errors.push(ValidationError::NegativeSeats(n));
                None
            }
            Some(n) => match u32::try_from(n) {
                Ok(seats) => Some(seats),
                Err(_) => {
                    errors.push(ValidationError::SeatsOverflow(n));
                    None
                }
            },
        };

        if let (Some(start), Some(end)) = (source.starts_at, source.ends_at) {
            if start >= end {
                errors.push(ValidationError::InvalidSchedule);
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::Multiple(source.id, errors));
        }

        Ok(Course {
            id: source.id,
            title,
            description: source.description,
            instructor: source.instructor,
            seats,
            starts_at: source.starts_at,
            ends_at: source.ends_at,
        })
    }
}
