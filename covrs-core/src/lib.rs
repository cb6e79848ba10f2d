//! # Core models and utilities for covrs.
//!
//! This crate holds the pieces shared by every covrs member crate: the
//! [`GenomicInterval`](models::GenomicInterval) coordinate model, BED-like
//! record parsing, genome-size discovery and gzip-aware readers.
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::CoreError;
pub use models::{BedRecord, GenomicInterval, Strand};
