/// Minimum percentage for an attempt to be labelled as passed.
///
/// Display-only: the scoring engine never consults it. Both the result view
/// and the attempt listing read this value.
pub const PASS_THRESHOLD_PERCENT: i32 = 60;

/// Countdown length of a quiz session (15 minutes).
pub const DEFAULT_EXAM_DURATION_SECS: u32 = 900;

/// Number of questions requested from the question store per session.
pub const DEFAULT_QUESTIONS_PER_EXAM: usize = 10;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Largest batch accepted by a single bulk question upload.
pub const MAX_BULK_QUESTIONS: usize = 500;

pub fn is_passing(percentage: i32) -> bool {
    percentage >= PASS_THRESHOLD_PERCENT
}
