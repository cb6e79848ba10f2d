//! Annotation-flagging ingestion from bed files.
//!
//! Annotated intervals are painted into the store as constants. Three
//! modes are supported: `Binary` marks presence with a one per source
//! file, `Score` paints the score column instead, and `Categorical`
//! one-hot encodes the integer score of a single source file across
//! `max_score + 1` conditions.
use std::collections::HashMap;
use std::path::PathBuf;

use indicatif::ProgressBar;

use covrs_array::{Element, GenomicArray, Storage, create_genomic_array};
use covrs_core::models::{BedRecord, GenomicInterval, bed::read_bed_records};
use covrs_core::utils::genome_size_from_bed;

use crate::cover::{Cover, DimMode};
use crate::errors::CoverError;
use crate::ingest::default_conditions;
use crate::windows::WindowIndex;

/// How annotated intervals are rendered into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedMode {
    /// 1 wherever an interval overlaps, per source file.
    #[default]
    Binary,
    /// The score column of each interval, per source file.
    Score,
    /// One-hot encoding of the integer score; single source file only.
    Categorical,
}

/// Configuration for [`Cover::from_bed`].
pub struct BedConfig {
    pub name: String,
    /// Annotation bed files. One condition per file, except in
    /// categorical mode where the score values define the conditions.
    pub bedfiles: Vec<PathBuf>,
    /// Bed file with the regions of interest to tile into windows.
    pub regions: PathBuf,
    pub genome_size: Option<HashMap<String, u64>>,
    pub conditions: Option<Vec<String>>,
    pub binsize: u64,
    pub stepsize: u64,
    pub resolution: u64,
    /// Flank width in store bins.
    pub flank: usize,
    pub mode: BedMode,
    pub storage: Storage,
    pub overwrite: bool,
    pub cache_dir: Option<PathBuf>,
    pub dim_mode: DimMode,
}

impl BedConfig {
    pub fn new<S, P>(name: S, bedfiles: Vec<PathBuf>, regions: P) -> BedConfig
    where
        S: Into<String>,
        P: Into<PathBuf>,
    {
        BedConfig {
            name: name.into(),
            bedfiles,
            regions: regions.into(),
            genome_size: None,
            conditions: None,
            binsize: 200,
            stepsize: 200,
            resolution: 200,
            flank: 0,
            mode: BedMode::default(),
            storage: Storage::default(),
            overwrite: false,
            cache_dir: None,
            dim_mode: DimMode::All,
        }
    }
}

impl<T: Element> Cover<T> {
    /// Build a coverage dataset by flagging annotated intervals.
    pub fn from_bed(config: BedConfig) -> Result<Cover<T>, CoverError> {
        if config.bedfiles.is_empty() {
            return Err(CoverError::Core(covrs_core::CoreError::EmptyRegions(
                "no bed files supplied".to_string(),
            )));
        }

        let index = WindowIndex::from_bed(
            &config.regions,
            config.binsize,
            config.stepsize,
            config.resolution,
        )?;

        let conditions = match config.mode {
            BedMode::Categorical => categorical_conditions(&config)?,
            _ => match config.conditions {
                Some(ref conditions) => conditions.clone(),
                None => default_conditions(&config.bedfiles),
            },
        };

        let mut gsize = match config.genome_size {
            Some(ref gsize) => gsize.clone(),
            None => genome_size_from_bed(
                &config.regions,
                config.flank as u64 * config.resolution,
            )?,
        };
        for len in gsize.values_mut() {
            *len /= config.resolution;
        }

        let resolution = config.resolution;
        let mode = config.mode;
        let cache = config.cache_dir.as_ref().map(|dir| dir.join(&config.name));
        let array = create_genomic_array(
            &gsize,
            conditions,
            false,
            config.storage,
            cache.as_deref(),
            config.overwrite,
            |array| flag_annotations_into(array, &config.bedfiles, resolution, mode),
        )?;

        // Absent annotation reads as -1 where representable, 0 otherwise.
        let padding = T::from(-1).unwrap_or_else(T::zero);

        Ok(Cover::new(
            config.name,
            array,
            index,
            config.flank,
            padding,
            config.dim_mode,
        ))
    }
}

/// Condition labels `"0" ..= "max_score"` for categorical encoding.
/// Requires exactly one source file with a score on every record.
fn categorical_conditions(config: &BedConfig) -> Result<Vec<String>, CoverError> {
    let [bedfile] = config.bedfiles.as_slice() else {
        return Err(CoverError::CategoricalSingleSource);
    };

    let mut max_class = 0u64;
    for record in read_bed_records(bedfile)? {
        let score = record
            .score
            .ok_or(CoverError::MissingScore("categorical"))?;
        max_class = max_class.max(score.max(0.0) as u64);
    }

    Ok((0..=max_class).map(|c| c.to_string()).collect())
}

fn flag_annotations_into<T: Element>(
    array: &mut GenomicArray<T>,
    bedfiles: &[PathBuf],
    resolution: u64,
    mode: BedMode,
) -> Result<(), CoverError> {
    let bar = ProgressBar::new(bedfiles.len() as u64);
    for (file_idx, path) in bedfiles.iter().enumerate() {
        bar.inc(1);
        for record in read_bed_records(path)? {
            paint_record(array, &record, file_idx, resolution, mode)?;
        }
    }
    bar.finish();

    Ok(())
}

fn paint_record<T: Element>(
    array: &mut GenomicArray<T>,
    record: &BedRecord,
    file_idx: usize,
    resolution: u64,
    mode: BedMode,
) -> Result<(), CoverError> {
    let iv = &record.interval;
    let len = match array.chrom_len(&iv.chrom) {
        Some(len) => len,
        None => return Ok(()),
    };

    let start = iv.start / resolution;
    let end = iv.end / resolution;
    if start >= len as u64 {
        eprintln!("{} outside of genome, skipped", iv);
        return Ok(());
    }

    let scaled = GenomicInterval::new(iv.chrom.clone(), start, end, iv.strand);
    match mode {
        BedMode::Binary => array.fill_interval(&scaled, file_idx, T::one())?,
        BedMode::Score => {
            let score = record.score.ok_or(CoverError::MissingScore("score"))?;
            let value = T::from(score).unwrap_or_else(T::zero);
            array.fill_interval(&scaled, file_idx, value)?;
        }
        BedMode::Categorical => {
            let score = record
                .score
                .ok_or(CoverError::MissingScore("categorical"))?;
            array.fill_interval(&scaled, score.max(0.0) as usize, T::one())?;
        }
    }

    Ok(())
}
