pub mod grading;

pub use grading::{
    DEFAULT_EXAM_DURATION_SECS, DEFAULT_PAGE_SIZE, DEFAULT_QUESTIONS_PER_EXAM,
    MAX_BULK_QUESTIONS, MAX_PAGE_SIZE, PASS_THRESHOLD_PERCENT,
};
