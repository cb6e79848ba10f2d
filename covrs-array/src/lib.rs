//! # Dense genomic signal arrays.
//!
//! A [`GenomicArray`] is a per-chromosome dense matrix of numeric signal,
//! keyed by `(position, strand, condition)`. It is populated exactly once
//! through a loader callback passed to [`create_genomic_array`] and treated
//! as read-mostly afterwards. Two storage backends exist: plain in-memory
//! arrays, and an npy-file cache that lets a dataset be re-opened without
//! re-running ingestion.
pub mod array;
pub mod element;
pub mod errors;
pub mod storage;

pub use array::GenomicArray;
pub use element::Element;
pub use errors::StoreError;
pub use storage::{Storage, create_genomic_array};
