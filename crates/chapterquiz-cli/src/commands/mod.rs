pub mod chapters;
pub mod grade;
pub mod init;
pub mod last;
pub mod validate;

use chapterquiz_core::results::AttemptResult;

/// `score/total (pct%)` for a recorded attempt.
pub(crate) fn format_attempt(attempt: &AttemptResult) -> String {
    format!(
        "{}/{} ({}%)",
        attempt.score,
        attempt.total,
        attempt.percent()
    )
}

/// Submission time in the local timezone.
pub(crate) fn format_time(attempt: &AttemptResult) -> String {
    attempt
        .time
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
