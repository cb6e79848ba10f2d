use std::fmt;

use ndarray::{Array4, s};

use covrs_array::{Element, GenomicArray};
use covrs_core::models::Strand;

use crate::errors::CoverError;
use crate::indices::Indices;
use crate::windows::WindowIndex;

/// How much of a window a fetch returns along the position axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimMode {
    /// The full flanked, binned window.
    #[default]
    All,
    /// A single position. The flank still shifts which position is read,
    /// but the returned sequence length is always 1.
    First,
}

/// A batch transform applied to every fetched tensor, in registration order.
/// Transforms must preserve the tensor's shape; this is the author's
/// responsibility and is not enforced.
pub type Transform<T> = Box<dyn Fn(Array4<T>) -> Array4<T> + Send + Sync>;

///
/// An indexable coverage dataset: a populated [`GenomicArray`] plus the
/// [`WindowIndex`] that maps integer indices to genomic windows.
///
/// `cover.fetch(i)` returns a dense tensor of shape
/// `(indices, positions, strands, conditions)`; see [`Cover::fetch`] for
/// the retrieval contract. Everything but the transform list is fixed at
/// construction.
///
pub struct Cover<T: Element> {
    name: String,
    array: GenomicArray<T>,
    index: WindowIndex,
    flank: usize,
    padding_value: T,
    dim_mode: DimMode,
    transforms: Vec<Transform<T>>,
}

impl<T: Element> Cover<T> {
    ///
    /// Wrap a populated array and window index into a coverage view.
    ///
    /// The factory constructors ([`Cover::from_bam`], [`Cover::from_bigwig`],
    /// [`Cover::from_bed`]) are the usual entry points; this one exists for
    /// synthetic stores and tests.
    ///
    pub fn new<S: Into<String>>(
        name: S,
        array: GenomicArray<T>,
        index: WindowIndex,
        flank: usize,
        padding_value: T,
        dim_mode: DimMode,
    ) -> Cover<T> {
        Cover {
            name: name.into(),
            array,
            index,
            flank,
            padding_value,
            dim_mode,
            transforms: Vec::new(),
        }
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered condition labels; the order is the tensor's last axis order.
    pub fn conditions(&self) -> &[String] {
        self.array.conditions()
    }

    pub fn flank(&self) -> usize {
        self.flank
    }

    pub fn stranded(&self) -> bool {
        self.array.stranded()
    }

    pub fn padding_value(&self) -> T {
        self.padding_value
    }

    pub fn dim_mode(&self) -> DimMode {
        self.dim_mode
    }

    pub fn window_index(&self) -> &WindowIndex {
        &self.index
    }

    /// Append a transform to the post-retrieval pipeline.
    pub fn push_transform<F>(&mut self, transform: F)
    where
        F: Fn(Array4<T>) -> Array4<T> + Send + Sync + 'static,
    {
        self.transforms.push(Box::new(transform));
    }

    /// Positions per fetched window along the sequence axis.
    fn seq_len(&self) -> usize {
        match self.dim_mode {
            DimMode::All => 2 * self.flank + self.index.bin_width() as usize,
            DimMode::First => 1,
        }
    }

    /// Dataset shape `(windows, positions, strands, conditions)`.
    pub fn shape(&self) -> [usize; 4] {
        [
            self.len(),
            self.seq_len(),
            self.array.strand_dim(),
            self.conditions().len(),
        ]
    }

    ///
    /// Fetch the tensor rows for the given indices, in input order.
    ///
    /// For each window the interval is extended by `flank` on both sides
    /// (under [`DimMode::First`] only the shifted start position is read),
    /// the in-bounds portion of the store is copied in and everything the
    /// chromosome boundary clipped away stays at the padding value.
    /// Minus-strand windows are reversed along both the position axis and
    /// the strand axis, producing the orientation a reverse-complemented
    /// region is expected to have. Registered transforms run last, over the
    /// whole batch.
    ///
    pub fn fetch<I: Into<Indices>>(&self, index: I) -> Result<Array4<T>, CoverError> {
        let indices = index.into().resolve(self.len())?;

        let [_, seq_len, strand_dim, n_conditions] = self.shape();
        let mut data = Array4::from_elem(
            (indices.len(), seq_len, strand_dim, n_conditions),
            self.padding_value,
        );

        for (row, &idx) in indices.iter().enumerate() {
            let window = self
                .index
                .get(idx)
                .ok_or(CoverError::IndexOutOfRange {
                    index: idx,
                    len: self.len(),
                })?;

            let start = window.start as i64 - self.flank as i64;
            let end = match self.dim_mode {
                DimMode::All => window.end as i64 + self.flank as i64,
                DimMode::First => start + 1,
            };

            let values = self.array.read_range(&window.chrom, start, end);
            let avail = values.shape()[0].min(seq_len);
            data.slice_mut(s![row, ..avail, .., ..])
                .assign(&values.slice(s![..avail, .., ..]));

            if window.strand == Strand::Reverse {
                let reversed = data.slice(s![row, ..;-1, ..;-1, ..]).to_owned();
                data.slice_mut(s![row, .., .., ..]).assign(&reversed);
            }
        }

        for transform in &self.transforms {
            data = transform(data);
        }

        Ok(data)
    }
}

impl<T: Element> fmt::Debug for Cover<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cover")
            .field("name", &self.name)
            .field("windows", &self.len())
            .field("flank", &self.flank)
            .field("stranded", &self.stranded())
            .field("dim_mode", &self.dim_mode)
            .field("conditions", &self.conditions())
            .field("transforms", &self.transforms.len())
            .finish()
    }
}
