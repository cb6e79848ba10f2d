//! Signal-averaging ingestion from bigwig files.
//!
//! Per-base signal is read for every window and collapsed into
//! resolution-sized bins by averaging, with missing values treated as
//! zero. The resulting store is unstranded and holds the bin means at
//! `1 / resolution` of the genomic coordinate density.
use std::collections::HashMap;
use std::path::PathBuf;

use bigtools::BigWigRead;
use indicatif::ProgressBar;

use covrs_array::{Element, GenomicArray, Storage, create_genomic_array};
use covrs_core::utils::genome_size_from_bed;

use crate::cover::{Cover, DimMode};
use crate::errors::CoverError;
use crate::ingest::default_conditions;
use crate::windows::WindowIndex;

/// Configuration for [`Cover::from_bigwig`].
pub struct BigWigConfig {
    pub name: String,
    /// Bigwig files, one per condition.
    pub bigwigfiles: Vec<PathBuf>,
    /// Bed file with the regions of interest to tile into windows.
    pub regions: PathBuf,
    /// Chromosome lengths in genomic coordinates. When absent they are
    /// derived from the regions file, extended by the flank.
    pub genome_size: Option<HashMap<String, u64>>,
    pub conditions: Option<Vec<String>>,
    pub binsize: u64,
    pub stepsize: u64,
    /// Averaging bin width. The store holds one value per `resolution`
    /// bases.
    pub resolution: u64,
    /// Flank width in store bins.
    pub flank: usize,
    pub storage: Storage,
    pub overwrite: bool,
    pub cache_dir: Option<PathBuf>,
    pub dim_mode: DimMode,
}

impl BigWigConfig {
    pub fn new<S, P>(name: S, bigwigfiles: Vec<PathBuf>, regions: P) -> BigWigConfig
    where
        S: Into<String>,
        P: Into<PathBuf>,
    {
        BigWigConfig {
            name: name.into(),
            bigwigfiles,
            regions: regions.into(),
            genome_size: None,
            conditions: None,
            binsize: 200,
            stepsize: 200,
            resolution: 200,
            flank: 0,
            storage: Storage::default(),
            overwrite: false,
            cache_dir: None,
            dim_mode: DimMode::All,
        }
    }
}

impl<T: Element> Cover<T> {
    /// Build a coverage dataset by averaging bigwig signal per bin.
    pub fn from_bigwig(config: BigWigConfig) -> Result<Cover<T>, CoverError> {
        if config.bigwigfiles.is_empty() {
            return Err(CoverError::BigWig("no bigwig files supplied".to_string()));
        }

        let index = WindowIndex::from_bed(
            &config.regions,
            config.binsize,
            config.stepsize,
            config.resolution,
        )?;

        let conditions = match config.conditions {
            Some(ref conditions) => conditions.clone(),
            None => default_conditions(&config.bigwigfiles),
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
        let windows = index.clone();
        let cache = config.cache_dir.as_ref().map(|dir| dir.join(&config.name));
        let array = create_genomic_array(
            &gsize,
            conditions,
            false,
            config.storage,
            cache.as_deref(),
            config.overwrite,
            |array| average_signal_into(array, &config.bigwigfiles, &windows, resolution),
        )?;

        Ok(Cover::new(
            config.name,
            array,
            index,
            config.flank,
            T::zero(),
            config.dim_mode,
        ))
    }
}

/// Collapse per-base values into `resolution`-sized bins by averaging.
/// NaN entries (unmapped bases) count as zero. A trailing partial bin is
/// averaged over its actual width.
pub(crate) fn mean_by_resolution(values: &[f32], resolution: usize) -> Vec<f32> {
    values
        .chunks(resolution)
        .map(|chunk| {
            let sum: f32 = chunk.iter().map(|v| if v.is_nan() { 0.0 } else { *v }).sum();
            sum / chunk.len() as f32
        })
        .collect()
}

fn average_signal_into<T: Element>(
    array: &mut GenomicArray<T>,
    bigwigfiles: &[PathBuf],
    windows: &WindowIndex,
    resolution: u64,
) -> Result<(), CoverError> {
    for (condition, path) in bigwigfiles.iter().enumerate() {
        let file = path.to_string_lossy().to_string();
        let mut reader =
            BigWigRead::open_file(&file).map_err(|e| CoverError::BigWig(e.to_string()))?;

        let bar = ProgressBar::new(windows.len() as u64);
        for window in windows.iter() {
            bar.inc(1);
            if array.chrom_len(&window.chrom).is_none() {
                eprintln!("{} absent from genome, skipping {}", window.chrom, window);
                continue;
            }

            let start = (window.start * resolution) as u32;
            let end = (window.end * resolution) as u32;
            let values = reader
                .values(&window.chrom, start, end)
                .map_err(|e| CoverError::BigWig(e.to_string()))?;

            let binned: Vec<T> = mean_by_resolution(&values, resolution as usize)
                .into_iter()
                .map(|v| T::from(v).unwrap_or_else(T::zero))
                .collect();
            array.write_track(&window, condition, &binned)?;
        }
        bar.finish();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    use bigtools::beddata::BedParserStreamingIterator;
    use bigtools::{BigWigWrite, Value};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;
    use tokio::runtime;

    #[rstest]
    fn test_mean_by_resolution_constant_signal() {
        let values = vec![2.0f32; 10];
        assert_eq!(mean_by_resolution(&values, 5), vec![2.0, 2.0]);
    }

    #[rstest]
    fn test_mean_by_resolution_averages_within_bins() {
        let values = vec![1.0, 3.0, 0.0, 8.0];
        assert_eq!(mean_by_resolution(&values, 2), vec![2.0, 4.0]);
    }

    #[rstest]
    fn test_mean_by_resolution_nan_counts_as_zero() {
        let values = vec![4.0, f32::NAN];
        assert_eq!(mean_by_resolution(&values, 2), vec![2.0]);
    }

    #[rstest]
    fn test_mean_by_resolution_trailing_partial_bin() {
        let values = vec![1.0, 1.0, 4.0];
        assert_eq!(mean_by_resolution(&values, 2), vec![1.0, 4.0]);
    }

    fn write_test_bigwig(path: &Path, chrom_len: u32, spans: &[(u32, u32, f32)]) {
        let chrom_map = HashMap::from([("chr1".to_string(), chrom_len)]);
        let out_file = path.to_string_lossy().to_string();
        let mut out = BigWigWrite::create_file(out_file, chrom_map).unwrap();
        out.options.channel_size = 0;
        let runtime = runtime::Builder::new_current_thread().build().unwrap();

        let entries: Vec<_> = spans
            .iter()
            .map(|&(start, end, value)| {
                Ok::<_, std::io::Error>(("chr1".to_string(), Value { start, end, value }))
            })
            .collect();
        let data = BedParserStreamingIterator::wrap_iter(entries.into_iter(), true);
        out.write(data, runtime).unwrap();
    }

    #[rstest]
    fn test_from_bigwig_bin_means() {
        let dir = tempdir().unwrap();
        let bw = dir.path().join("signal.bw");
        write_test_bigwig(&bw, 1000, &[(0, 400, 2.0), (400, 600, 6.0)]);

        let regions = dir.path().join("regions.bed");
        let mut file = File::create(&regions).unwrap();
        writeln!(file, "chr1\t0\t1000").unwrap();

        let mut config = BigWigConfig::new("signal", vec![bw], &regions);
        config.binsize = 200;
        config.stepsize = 200;
        config.resolution = 200;
        let cover: Cover<f32> = Cover::from_bigwig(config).unwrap();

        assert_eq!(cover.len(), 5);
        assert_eq!(cover.shape(), [5, 1, 1, 1]);
        assert_eq!(cover.conditions(), ["signal"]);

        let data = cover.fetch(..).unwrap();
        let means: Vec<f32> = (0..5).map(|i| data[[i, 0, 0, 0]]).collect();
        assert_eq!(means, vec![2.0, 2.0, 6.0, 0.0, 0.0]);
    }

    #[rstest]
    fn test_from_bigwig_finer_resolution() {
        let dir = tempdir().unwrap();
        let bw = dir.path().join("signal.bw");
        write_test_bigwig(&bw, 200, &[(0, 100, 4.0)]);

        let regions = dir.path().join("regions.bed");
        let mut file = File::create(&regions).unwrap();
        writeln!(file, "chr1\t0\t200").unwrap();

        let mut config = BigWigConfig::new("fine", vec![bw], &regions);
        config.binsize = 200;
        config.stepsize = 200;
        config.resolution = 50;
        let cover: Cover<f32> = Cover::from_bigwig(config).unwrap();

        // One window of four store bins.
        assert_eq!(cover.shape(), [1, 4, 1, 1]);
        let data = cover.fetch(0).unwrap();
        let bins: Vec<f32> = (0..4).map(|i| data[[0, i, 0, 0]]).collect();
        assert_eq!(bins, vec![4.0, 4.0, 0.0, 0.0]);
    }

    #[rstest]
    fn test_from_bigwig_without_files_is_rejected() {
        let dir = tempdir().unwrap();
        let regions = dir.path().join("regions.bed");
        let mut file = File::create(&regions).unwrap();
        writeln!(file, "chr1\t0\t200").unwrap();

        let result: Result<Cover<f32>, _> =
            Cover::from_bigwig(BigWigConfig::new("empty", vec![], &regions));
        assert!(matches!(result, Err(CoverError::BigWig(_))));
    }
}
