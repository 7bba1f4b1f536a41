pub mod access;
pub mod domain;
pub mod ports;
pub mod progress;
pub mod publication;
pub mod video;

pub use domain::{
    Course, CourseDetail, CourseSummary, CourseUpdate, Credentials, EnrolledCourse, Enrollment,
    Lesson, LessonDetail, LessonProgress, Level, NewCourse, NewLesson, Profile, ProfileUpdate,
    Role, TrainerStats,
};
pub use ports::{DataService, PortError, PortResult, VideoHandle, VideoService};
pub use video::VideoRef;
