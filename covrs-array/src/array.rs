use std::collections::HashMap;

use ndarray::{Array3, s};

use covrs_core::models::{GenomicInterval, Strand};

use crate::element::Element;
use crate::errors::StoreError;

///
/// A per-chromosome dense signal store.
///
/// For every chromosome the array holds a matrix of shape
/// `(length, strand_dim, n_conditions)` where `strand_dim` is 2 for
/// stranded stores (forward, reverse) and 1 otherwise. Coordinates are in
/// the store's native unit; callers working at a coarser resolution must
/// rescale before touching the array.
///
/// Writes happen during ingestion only; afterwards the array is shared
/// read-only, so [`GenomicArray::read_range`] taking `&self` makes
/// concurrent readers safe.
///
#[derive(Debug, Clone)]
pub struct GenomicArray<T: Element> {
    tracks: HashMap<String, Array3<T>>,
    conditions: Vec<String>,
    stranded: bool,
}

impl<T: Element> GenomicArray<T> {
    /// Allocate a zero-filled array sized by the genome-size mapping.
    pub fn zeros(
        genome_size: &HashMap<String, u64>,
        conditions: Vec<String>,
        stranded: bool,
    ) -> Self {
        let strand_dim = if stranded { 2 } else { 1 };
        let tracks = genome_size
            .iter()
            .map(|(chrom, &len)| {
                (
                    chrom.clone(),
                    Array3::zeros((len as usize, strand_dim, conditions.len())),
                )
            })
            .collect();

        GenomicArray {
            tracks,
            conditions,
            stranded,
        }
    }

    pub(crate) fn from_tracks(
        tracks: HashMap<String, Array3<T>>,
        conditions: Vec<String>,
        stranded: bool,
    ) -> Self {
        GenomicArray {
            tracks,
            conditions,
            stranded,
        }
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn stranded(&self) -> bool {
        self.stranded
    }

    pub fn strand_dim(&self) -> usize {
        if self.stranded { 2 } else { 1 }
    }

    pub fn chrom_len(&self, chrom: &str) -> Option<usize> {
        self.tracks.get(chrom).map(|t| t.shape()[0])
    }

    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(|c| c.as_str())
    }

    pub(crate) fn tracks(&self) -> &HashMap<String, Array3<T>> {
        &self.tracks
    }

    /// Which strand slot an interval writes to. Unstranded stores collapse
    /// everything onto slot 0.
    fn slot(&self, strand: Strand) -> usize {
        match strand {
            Strand::Reverse if self.stranded => 1,
            _ => 0,
        }
    }

    ///
    /// Range-write a vector of values along the position axis, at the
    /// interval's strand slot and the given condition layer.
    ///
    /// The write is clipped to the chromosome length and to the interval's
    /// own width; surplus values are dropped.
    ///
    pub fn write_track(
        &mut self,
        interval: &GenomicInterval,
        condition: usize,
        values: &[T],
    ) -> Result<(), StoreError> {
        let n_conditions = self.conditions.len();
        if condition >= n_conditions {
            return Err(StoreError::ConditionOutOfRange {
                index: condition,
                len: n_conditions,
            });
        }

        let slot = self.slot(interval.strand);
        let track = self
            .tracks
            .get_mut(&interval.chrom)
            .ok_or_else(|| StoreError::UnknownChromosome(interval.chrom.clone()))?;

        let len = track.shape()[0];
        let start = interval.start as usize;
        if start >= len {
            return Ok(());
        }

        let stop = (interval.end as usize).min(len).min(start + values.len());
        for (offset, pos) in (start..stop).enumerate() {
            track[[pos, slot, condition]] = values[offset];
        }

        Ok(())
    }

    /// Write one constant over an interval (clipped like
    /// [`GenomicArray::write_track`]).
    pub fn fill_interval(
        &mut self,
        interval: &GenomicInterval,
        condition: usize,
        value: T,
    ) -> Result<(), StoreError> {
        let n_conditions = self.conditions.len();
        if condition >= n_conditions {
            return Err(StoreError::ConditionOutOfRange {
                index: condition,
                len: n_conditions,
            });
        }

        let slot = self.slot(interval.strand);
        let track = self
            .tracks
            .get_mut(&interval.chrom)
            .ok_or_else(|| StoreError::UnknownChromosome(interval.chrom.clone()))?;

        let len = track.shape()[0];
        let start = (interval.start as usize).min(len);
        let stop = (interval.end as usize).min(len);
        track
            .slice_mut(s![start..stop, slot, condition])
            .fill(value);

        Ok(())
    }

    ///
    /// Read the in-bounds portion of `[start, end)` over the full strand and
    /// condition axes.
    ///
    /// Coordinates outside `[0, chromosome_length)` are clipped rather than
    /// reported as an error; a read over an unknown chromosome or a fully
    /// out-of-bounds range yields an array with zero rows. The caller is
    /// responsible for padding whatever the clip removed.
    ///
    pub fn read_range(&self, chrom: &str, start: i64, end: i64) -> Array3<T> {
        let empty = || Array3::zeros((0, self.strand_dim(), self.conditions.len()));

        let track = match self.tracks.get(chrom) {
            Some(track) => track,
            None => return empty(),
        };

        let len = track.shape()[0] as i64;
        let lo = start.clamp(0, len);
        let hi = end.clamp(lo, len);
        if lo == hi {
            return empty();
        }

        track.slice(s![lo as usize..hi as usize, .., ..]).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn genome_size() -> HashMap<String, u64> {
        HashMap::from([("chr1".to_string(), 10), ("chr2".to_string(), 5)])
    }

    fn conditions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[rstest]
    fn test_zeros_shape(genome_size: HashMap<String, u64>) {
        let array: GenomicArray<i32> = GenomicArray::zeros(&genome_size, conditions(3), true);

        assert_eq!(array.chrom_len("chr1"), Some(10));
        assert_eq!(array.chrom_len("chr2"), Some(5));
        assert_eq!(array.chrom_len("chrX"), None);
        assert_eq!(array.strand_dim(), 2);
        assert_eq!(array.conditions().len(), 3);
    }

    #[rstest]
    fn test_write_and_read_round_trip(genome_size: HashMap<String, u64>) {
        let mut array: GenomicArray<i32> = GenomicArray::zeros(&genome_size, conditions(2), true);

        let forward = GenomicInterval::new("chr1", 2, 6, Strand::Forward);
        let reverse = GenomicInterval::new("chr1", 2, 6, Strand::Reverse);
        array.write_track(&forward, 0, &[1, 2, 3, 4]).unwrap();
        array.write_track(&reverse, 1, &[5, 6, 7, 8]).unwrap();

        let data = array.read_range("chr1", 2, 6);
        assert_eq!(data.shape(), &[4, 2, 2]);
        assert_eq!(data[[0, 0, 0]], 1);
        assert_eq!(data[[3, 0, 0]], 4);
        assert_eq!(data[[0, 1, 1]], 5);
        assert_eq!(data[[3, 1, 1]], 8);
        // untouched slots stay zero
        assert_eq!(data[[0, 1, 0]], 0);
        assert_eq!(data[[0, 0, 1]], 0);
    }

    #[rstest]
    fn test_unstranded_reverse_writes_to_slot_zero(genome_size: HashMap<String, u64>) {
        let mut array: GenomicArray<i32> = GenomicArray::zeros(&genome_size, conditions(1), false);

        let reverse = GenomicInterval::new("chr1", 0, 2, Strand::Reverse);
        array.write_track(&reverse, 0, &[9, 9]).unwrap();

        let data = array.read_range("chr1", 0, 2);
        assert_eq!(data.shape(), &[2, 1, 1]);
        assert_eq!(data[[0, 0, 0]], 9);
    }

    #[rstest]
    fn test_read_range_clips_out_of_bounds(genome_size: HashMap<String, u64>) {
        let mut array: GenomicArray<f32> = GenomicArray::zeros(&genome_size, conditions(1), false);
        let iv = GenomicInterval::new("chr2", 0, 5, Strand::Unstranded);
        array.write_track(&iv, 0, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        // negative start is clipped to 0
        let data = array.read_range("chr2", -3, 2);
        assert_eq!(data.shape()[0], 2);
        assert_eq!(data[[0, 0, 0]], 1.0);

        // end past the chromosome is clipped to its length
        let data = array.read_range("chr2", 3, 12);
        assert_eq!(data.shape()[0], 2);
        assert_eq!(data[[1, 0, 0]], 5.0);

        // fully out of bounds and unknown chromosomes read as empty
        assert_eq!(array.read_range("chr2", 7, 12).shape()[0], 0);
        assert_eq!(array.read_range("chrX", 0, 5).shape()[0], 0);
    }

    #[rstest]
    fn test_fill_interval(genome_size: HashMap<String, u64>) {
        let mut array: GenomicArray<i32> = GenomicArray::zeros(&genome_size, conditions(2), false);

        let iv = GenomicInterval::new("chr1", 4, 20, Strand::Unstranded);
        array.fill_interval(&iv, 1, 7).unwrap();

        let data = array.read_range("chr1", 0, 10);
        assert_eq!(data[[3, 0, 1]], 0);
        assert_eq!(data[[4, 0, 1]], 7);
        assert_eq!(data[[9, 0, 1]], 7);
        assert_eq!(data[[4, 0, 0]], 0);
    }

    #[rstest]
    fn test_write_errors(genome_size: HashMap<String, u64>) {
        let mut array: GenomicArray<i32> = GenomicArray::zeros(&genome_size, conditions(1), false);

        let unknown = GenomicInterval::new("chrX", 0, 5, Strand::Unstranded);
        assert!(matches!(
            array.write_track(&unknown, 0, &[1]),
            Err(StoreError::UnknownChromosome(_))
        ));

        let iv = GenomicInterval::new("chr1", 0, 5, Strand::Unstranded);
        assert!(matches!(
            array.write_track(&iv, 3, &[1]),
            Err(StoreError::ConditionOutOfRange { index: 3, len: 1 })
        ));
    }
}
