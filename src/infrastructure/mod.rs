//! Infrastructure layer - External service implementations

pub mod book;
pub mod cache;
pub mod enrichment;
pub mod observability;
