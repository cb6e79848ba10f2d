use std::path::Path;

use covrs_core::models::{GenomicInterval, Strand, bed::read_bed_records};

use crate::errors::CoverError;

///
/// Enumerates fixed-size, fixed-step windows over a set of input regions.
///
/// Each region of at least `binsize` base pairs contributes windows starting
/// at `start, start + stepsize, ...` as long as the window fits inside the
/// region. Window coordinates are stored resolution-scaled (`start /
/// resolution`), so they address a signal store whose positions are
/// `resolution`-sized bins. With `resolution == 1` the coordinates are raw
/// base pairs.
///
/// Precondition (documented, not checked): `resolution` divides `binsize`
/// and `stepsize`.
///
#[derive(Debug, Clone)]
pub struct WindowIndex {
    chroms: Vec<String>,
    starts: Vec<u64>,
    strands: Vec<Strand>,
    binsize: u64,
    stepsize: u64,
    resolution: u64,
}

impl WindowIndex {
    ///
    /// Build a window index from a BED-like region file.
    ///
    /// # Arguments
    /// - path: region file (plain or gzip'd bed)
    /// - binsize: window width in base pairs
    /// - stepsize: distance between window starts in base pairs
    /// - resolution: base pairs per stored bin
    ///
    pub fn from_bed<P: AsRef<Path>>(
        path: P,
        binsize: u64,
        stepsize: u64,
        resolution: u64,
    ) -> Result<WindowIndex, CoverError> {
        if binsize == 0 || stepsize == 0 || resolution == 0 {
            return Err(CoverError::InvalidBinParameters);
        }

        let records = read_bed_records(path)?;

        let mut chroms = Vec::new();
        let mut starts = Vec::new();
        let mut strands = Vec::new();

        for record in records {
            let iv = record.interval;
            if iv.width() < binsize {
                continue;
            }

            let mut pos = iv.start;
            while pos + binsize <= iv.end {
                chroms.push(iv.chrom.clone());
                starts.push(pos / resolution);
                strands.push(iv.strand);
                pos += stepsize;
            }
        }

        Ok(WindowIndex {
            chroms,
            starts,
            strands,
            binsize,
            stepsize,
            resolution,
        })
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Window width in store-native bins (at least 1).
    pub fn bin_width(&self) -> u64 {
        (self.binsize / self.resolution).max(1)
    }

    /// The `idx`-th window as a resolution-scaled interval.
    pub fn get(&self, idx: usize) -> Option<GenomicInterval> {
        let start = *self.starts.get(idx)?;
        Some(GenomicInterval::new(
            self.chroms[idx].clone(),
            start,
            start + self.bin_width(),
            self.strands[idx],
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = GenomicInterval> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    pub fn binsize(&self) -> u64 {
        self.binsize
    }

    pub fn stepsize(&self) -> u64 {
        self.stepsize
    }

    pub fn resolution(&self) -> u64 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::NamedTempFile;

    fn write_bed(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".bed").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[rstest]
    fn test_window_enumeration() {
        // 1000 bp region, 200 bp windows, 200 bp steps -> 5 windows
        let file = write_bed("chr1\t0\t1000\n");
        let index = WindowIndex::from_bed(file.path(), 200, 200, 1).unwrap();

        assert_eq!(index.len(), 5);
        let first = index.get(0).unwrap();
        assert_eq!((first.start, first.end), (0, 200));
        let last = index.get(4).unwrap();
        assert_eq!((last.start, last.end), (800, 1000));
        assert!(index.get(5).is_none());
    }

    #[rstest]
    fn test_overlapping_windows_with_smaller_step() {
        let file = write_bed("chr1\t0\t400\n");
        let index = WindowIndex::from_bed(file.path(), 200, 100, 1).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1).unwrap().start, 100);
    }

    #[rstest]
    fn test_resolution_scaling() {
        let file = write_bed("chr1\t0\t1200\n");
        let index = WindowIndex::from_bed(file.path(), 600, 600, 200).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.bin_width(), 3);
        let window = index.get(1).unwrap();
        assert_eq!((window.start, window.end), (3, 6));
    }

    #[rstest]
    fn test_strand_is_carried() {
        let file = write_bed("chr1\t0\t200\tfeature\t0\t-\n");
        let index = WindowIndex::from_bed(file.path(), 200, 200, 1).unwrap();
        assert_eq!(index.get(0).unwrap().strand, Strand::Reverse);
    }

    #[rstest]
    fn test_short_regions_are_skipped() {
        let file = write_bed("chr1\t0\t150\nchr2\t0\t200\n");
        let index = WindowIndex::from_bed(file.path(), 200, 200, 1).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0).unwrap().chrom, "chr2");
    }

    #[rstest]
    #[case(0, 200, 200)]
    #[case(200, 0, 200)]
    #[case(200, 200, 0)]
    fn test_zero_parameters_are_rejected(
        #[case] binsize: u64,
        #[case] stepsize: u64,
        #[case] resolution: u64,
    ) {
        let file = write_bed("chr1\t0\t1000\n");
        assert!(matches!(
            WindowIndex::from_bed(file.path(), binsize, stepsize, resolution),
            Err(CoverError::InvalidBinParameters)
        ));
    }
}
