//! In-memory query entry points.
//!
//! # Responsibility
//! - Filter, sort, and paginate the full book collection when a query cannot
//!   be pushed down to storage.
//! - Keep result shaping pure and storage-agnostic.

pub mod engine;
