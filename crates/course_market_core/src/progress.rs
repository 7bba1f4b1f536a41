//! crates/course_market_core/src/progress.rs
//!
//! The course-progress calculator. Progress is always recomputed from the
//! course's current lesson set and the enrollment's completion marks; it is
//! never incrementally patched, so it stays correct when lessons are added
//! or removed after enrollment.

use uuid::Uuid;

use crate::domain::LessonProgress;

/// Percentage of completed lessons, rounded half-up, in [0, 100].
///
/// A course with no lessons is 0% complete.
pub fn percentage(total_lessons: usize, completed_lessons: usize) -> u8 {
    if total_lessons == 0 {
        return 0;
    }
    // Integer round-half-up of 100 * completed / total.
    let total = total_lessons as u64;
    let completed = completed_lessons as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Counts completion marks whose lesson still belongs to the course.
///
/// Marks left behind by a deleted lesson are excluded, so the numerator can
/// never exceed the number of current lessons.
pub fn completed_lessons(lesson_ids: &[Uuid], marks: &[LessonProgress]) -> usize {
    marks
        .iter()
        .filter(|m| m.completed && lesson_ids.contains(&m.lesson_id))
        .count()
}

/// Recomputes an enrollment's percentage from the course's current lessons
/// and the enrollment's completion marks.
pub fn course_progress(lesson_ids: &[Uuid], marks: &[LessonProgress]) -> u8 {
    percentage(lesson_ids.len(), completed_lessons(lesson_ids, marks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mark(lesson_id: Uuid, completed: bool) -> LessonProgress {
        LessonProgress {
            id: Uuid::new_v4(),
            enrollment_id: Uuid::new_v4(),
            lesson_id,
            completed,
            completed_at: completed.then(Utc::now),
        }
    }

    #[test]
    fn empty_course_is_zero_percent() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn percentage_stays_within_bounds() {
        for total in 0..20 {
            for completed in 0..=total {
                let p = percentage(total, completed);
                assert!(p <= 100, "percentage({total}, {completed}) = {p}");
            }
        }
    }

    #[test]
    fn three_lesson_course_rounds_as_expected() {
        assert_eq!(percentage(3, 1), 33);
        assert_eq!(percentage(3, 2), 67);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5% -> 13
        assert_eq!(percentage(8, 1), 13);
        // 1/2 = 50% exactly
        assert_eq!(percentage(2, 1), 50);
    }

    #[test]
    fn orphaned_marks_are_excluded() {
        let kept = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let marks = vec![mark(kept, true), mark(deleted, true)];

        // Only `kept` remains in the course; the orphaned mark must not count.
        assert_eq!(completed_lessons(&[kept], &marks), 1);
        assert_eq!(course_progress(&[kept], &marks), 100);
    }

    #[test]
    fn incomplete_marks_do_not_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let marks = vec![mark(a, true), mark(b, false)];
        assert_eq!(course_progress(&[a, b], &marks), 50);
    }

    #[test]
    fn lesson_deletion_rebases_the_denominator() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let marks = vec![mark(a, true), mark(b, true)];

        assert_eq!(course_progress(&[a, b, c], &marks), 67);
        // Trainer deletes lesson c: 2 of 2 remaining lessons are complete.
        assert_eq!(course_progress(&[a, b], &marks), 100);
    }
}
