//! crates/course_market_core/src/access.rs
//!
//! The lesson access gate. Evaluated per lesson at request time; the result
//! is never cached on the lesson or enrollment, since the free flag and the
//! enrollment state change independently.

use crate::domain::{Enrollment, Lesson};

/// A lesson is viewable iff it is flagged free, or the caller holds an
/// enrollment for the lesson's course.
pub fn can_view(lesson: &Lesson, enrollment: Option<&Enrollment>) -> bool {
    if lesson.is_free {
        return true;
    }
    enrollment.is_some_and(|e| e.course_id == lesson.course_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn lesson(course_id: Uuid, is_free: bool) -> Lesson {
        Lesson {
            id: Uuid::new_v4(),
            course_id,
            title: "Intro".to_string(),
            description: None,
            video: None,
            duration_minutes: Some(10),
            order_index: 1,
            is_free,
            created_at: Utc::now(),
        }
    }

    fn enrollment(course_id: Uuid) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            learner_id: Uuid::new_v4(),
            course_id,
            enrolled_at: Utc::now(),
            progress: 0,
        }
    }

    #[test]
    fn free_lesson_is_viewable_without_enrollment() {
        let l = lesson(Uuid::new_v4(), true);
        assert!(can_view(&l, None));
    }

    #[test]
    fn paid_lesson_is_not_viewable_without_enrollment() {
        let l = lesson(Uuid::new_v4(), false);
        assert!(!can_view(&l, None));
    }

    #[test]
    fn paid_lesson_is_viewable_with_enrollment() {
        let course_id = Uuid::new_v4();
        let l = lesson(course_id, false);
        assert!(can_view(&l, Some(&enrollment(course_id))));
    }

    #[test]
    fn enrollment_for_another_course_does_not_grant_access() {
        let l = lesson(Uuid::new_v4(), false);
        assert!(!can_view(&l, Some(&enrollment(Uuid::new_v4()))));
    }
}
