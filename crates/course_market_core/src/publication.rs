//! crates/course_market_core/src/publication.rs
//!
//! The course publication rule. The lifecycle has exactly two states,
//! draft and published. Publishing requires at least one lesson;
//! un-publishing is always allowed.

use crate::ports::{PortError, PortResult};

/// Checks the minimum-content invariant for `draft -> published`.
pub fn ensure_publishable(lesson_count: usize) -> PortResult<()> {
    if lesson_count == 0 {
        return Err(PortError::Validation(
            "a course needs at least one lesson before it can be published".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;

    #[test]
    fn course_without_lessons_cannot_be_published() {
        assert!(matches!(
            ensure_publishable(0),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn course_with_a_lesson_can_be_published() {
        assert!(ensure_publishable(1).is_ok());
        assert!(ensure_publishable(12).is_ok());
    }
}
