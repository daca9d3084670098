//! chapterquiz-report: Rendering of graded attempts.

pub mod html;

pub use html::{generate_html, write_html_report, ChapterReview};
