//! # Coverage tensors over genomic signal.
//!
//! This crate turns heterogeneous genome-scale sources into one uniform,
//! indexable tensor representation. Three ingestion pipelines populate a
//! [`GenomicArray`](covrs_array::GenomicArray):
//!
//! - [`Cover::from_bam`]: per-position read counts from aligned-read files,
//!   stranded (forward starts / reverse ends);
//! - [`Cover::from_bigwig`]: resolution-averaged continuous signal;
//! - [`Cover::from_bed`]: binary, scored or categorical annotation flags.
//!
//! The resulting [`Cover`] maps window indices to dense
//! `(windows, positions, strands, conditions)` tensors, applying flank
//! extension, strand-aware orientation and boundary padding on the fly.
pub mod cover;
pub mod errors;
pub mod indices;
pub mod ingest;
pub mod windows;

pub use cover::{Cover, DimMode};
pub use errors::CoverError;
pub use indices::Indices;
pub use ingest::{BamConfig, BedConfig, BedMode, BigWigConfig};
pub use windows::WindowIndex;
