//! Read-counting ingestion from indexed bam files.
//!
//! Each alignment passing the mapping-quality filter contributes a single
//! count at its 5' position: the alignment start for forward reads and
//! the alignment end for reverse reads. The resulting store is stranded,
//! with the two read orientations kept in separate layers.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use noodles::bam;
use noodles::core::Region;
use noodles::sam::alignment::Record as SamRecord;

use covrs_array::{Element, GenomicArray, Storage, create_genomic_array};
use covrs_core::models::{GenomicInterval, Strand};

use crate::cover::{Cover, DimMode};
use crate::errors::CoverError;
use crate::ingest::default_conditions;
use crate::windows::WindowIndex;

/// Configuration for [`Cover::from_bam`].
pub struct BamConfig {
    /// Dataset name, also the cache subdirectory for npy storage.
    pub name: String,
    /// Indexed bam files, one per condition.
    pub bamfiles: Vec<PathBuf>,
    /// Bed file with the regions of interest to tile into windows.
    pub regions: PathBuf,
    /// Chromosome lengths. When absent they are taken from the header of
    /// the first bam file.
    pub genome_size: Option<HashMap<String, u64>>,
    /// Condition labels. Defaults to the bam file names without extensions.
    pub conditions: Option<Vec<String>>,
    /// Alignments below this mapping quality are dropped. Alignments with
    /// an undefined mapping quality always pass.
    pub min_mapq: u8,
    pub binsize: u64,
    pub stepsize: u64,
    pub flank: usize,
    pub storage: Storage,
    pub overwrite: bool,
    pub cache_dir: Option<PathBuf>,
}

impl BamConfig {
    pub fn new<S, P>(name: S, bamfiles: Vec<PathBuf>, regions: P) -> BamConfig
    where
        S: Into<String>,
        P: Into<PathBuf>,
    {
        BamConfig {
            name: name.into(),
            bamfiles,
            regions: regions.into(),
            genome_size: None,
            conditions: None,
            min_mapq: 0,
            binsize: 200,
            stepsize: 200,
            flank: 0,
            storage: Storage::default(),
            overwrite: false,
            cache_dir: None,
        }
    }
}

impl<T: Element> Cover<T> {
    /// Build a coverage dataset by counting aligned reads from bam files.
    pub fn from_bam(config: BamConfig) -> Result<Cover<T>, CoverError> {
        let first = config
            .bamfiles
            .first()
            .ok_or_else(|| CoverError::Bam("no bam files supplied".to_string()))?;

        let index = WindowIndex::from_bed(&config.regions, config.binsize, config.stepsize, 1)?;

        let conditions = match config.conditions {
            Some(ref conditions) => conditions.clone(),
            None => default_conditions(&config.bamfiles),
        };

        let gsize = match config.genome_size {
            Some(ref gsize) => gsize.clone(),
            None => genome_size_from_bam(first)?,
        };

        let cache = config.cache_dir.as_ref().map(|dir| dir.join(&config.name));
        let array = create_genomic_array(
            &gsize,
            conditions,
            true,
            config.storage,
            cache.as_deref(),
            config.overwrite,
            |array| count_reads_into(array, &config.bamfiles, config.min_mapq),
        )?;

        Ok(Cover::new(
            config.name,
            array,
            index,
            config.flank,
            T::zero(),
            DimMode::All,
        ))
    }
}

/// Chromosome lengths from the reference dictionary of a bam header.
pub fn genome_size_from_bam(path: &Path) -> Result<HashMap<String, u64>, CoverError> {
    let mut reader = bam::io::reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;

    let mut gsize = HashMap::new();
    for (name, reference) in header.reference_sequences() {
        gsize.insert(name.to_string(), usize::from(reference.length()) as u64);
    }

    Ok(gsize)
}

/// Whether an alignment's mapping quality clears the threshold. An
/// undefined quality (255 on the wire, `None` here) passes any threshold.
pub(crate) fn passes_mapq(mapq: Option<u8>, min_mapq: u8) -> bool {
    mapq.unwrap_or(u8::MAX) >= min_mapq
}

/// Apply one qualifying alignment to the per-position strand tallies.
///
/// Forward reads count at their start, reverse reads at their exclusive
/// end. A reverse read without a defined end falls back to its start.
/// Positions beyond the chromosome are dropped.
pub(crate) fn tally_read<T: Element>(
    forward: &mut [T],
    reverse: &mut [T],
    start: usize,
    end: Option<usize>,
    is_reverse: bool,
) {
    if is_reverse {
        let pos = end.unwrap_or(start);
        if let Some(slot) = reverse.get_mut(pos) {
            *slot = *slot + T::one();
        }
    } else if let Some(slot) = forward.get_mut(start) {
        *slot = *slot + T::one();
    }
}

fn count_reads_into<T: Element>(
    array: &mut GenomicArray<T>,
    bamfiles: &[PathBuf],
    min_mapq: u8,
) -> Result<(), CoverError> {
    let chroms: Vec<String> = array.chroms().map(str::to_string).collect();

    for (condition, path) in bamfiles.iter().enumerate() {
        let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(path)?;
        let header = reader.read_header()?;

        let bar = ProgressBar::new(chroms.len() as u64);
        for chrom in &chroms {
            bar.inc(1);
            let len = match array.chrom_len(chrom) {
                Some(len) => len,
                None => continue,
            };

            let region: Region = chrom
                .parse()
                .map_err(|e| CoverError::Bam(format!("invalid region {}: {}", chrom, e)))?;
            let query = match reader.query(&header, &region) {
                Ok(query) => query,
                Err(..) => {
                    eprintln!("{} absent from {}, skipping", chrom, path.display());
                    continue;
                }
            };

            let mut forward = vec![T::zero(); len];
            let mut reverse = vec![T::zero(); len];
            for result in query {
                let record = result?;

                if !passes_mapq(record.mapping_quality().map(|q| q.get()), min_mapq) {
                    continue;
                }

                let start = match record.alignment_start().transpose()? {
                    Some(position) => position.get() - 1,
                    None => continue,
                };
                // 1-based inclusive end == 0-based exclusive end.
                let end = SamRecord::alignment_end(&record)
                    .transpose()?
                    .map(|position| position.get());

                tally_read(
                    &mut forward,
                    &mut reverse,
                    start,
                    end,
                    record.flags().is_reverse_complemented(),
                );
            }

            let span = |strand| GenomicInterval::new(chrom.clone(), 0, len as u64, strand);
            array.write_track(&span(Strand::Forward), condition, &forward)?;
            array.write_track(&span(Strand::Reverse), condition, &reverse)?;
        }
        bar.finish();
    }

    Ok(())
}
