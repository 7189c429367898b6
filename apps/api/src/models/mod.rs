pub mod candidate;
pub mod job;
