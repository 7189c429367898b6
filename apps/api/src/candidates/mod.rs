// Candidates: resume upload, text extraction, archival.

pub mod handlers;
pub mod resume;
