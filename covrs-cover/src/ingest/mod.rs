//! The three ingestion pipelines that populate a signal store: read
//! counting from bam files, signal averaging from bigwig files and
//! annotation flagging from bed files. Each pipeline is driven by a
//! configuration struct and exposed as a factory constructor on
//! [`Cover`](crate::Cover).
pub mod bam;
pub mod bed;
pub mod bigwig;

pub use bam::BamConfig;
pub use bed::{BedConfig, BedMode};
pub use bigwig::BigWigConfig;

use std::path::PathBuf;

use covrs_core::utils::remove_all_extensions;

/// Default condition labels: the source file names with every extension
/// stripped, in input order.
pub(crate) fn default_conditions(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| remove_all_extensions(p)).collect()
}
