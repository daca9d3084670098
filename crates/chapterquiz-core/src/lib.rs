//! chapterquiz-core: Question model, scoring engine, and quiz session.
//!
//! This crate defines the question data model, the pure scoring logic, the
//! session state machine that gates submission, and the persistence seam
//! for last-attempt results. Loading from disk or HTTP lives in
//! `chapterquiz-sources`.

pub mod answers;
pub mod catalog;
pub mod error;
pub mod model;
pub mod parser;
pub mod results;
pub mod scoring;
pub mod session;
pub mod store;
pub mod traits;
