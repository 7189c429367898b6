// Job postings: listing, creation with skill extraction, seeding from a placeholder source.

pub mod handlers;
pub mod seed;
