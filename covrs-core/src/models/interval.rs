use std::fmt::{self, Display};

/// Orientation of a genomic feature.
///
/// BED column 6 maps `+` to [`Strand::Forward`], `-` to [`Strand::Reverse`]
/// and anything else (usually `.`) to [`Strand::Unstranded`].
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl Strand {
    pub fn from_symbol(symbol: &str) -> Strand {
        match symbol {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unstranded,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unstranded => '.',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

///
/// A half-open genomic coordinate range `[start, end)` on a chromosome,
/// with an optional orientation.
///
/// Depending on context the coordinates are either raw base pairs or
/// resolution-scaled bins; the interval itself does not know which.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

impl GenomicInterval {
    pub fn new<S: Into<String>>(chrom: S, start: u64, end: u64, strand: Strand) -> Self {
        debug_assert!(start <= end, "interval start must not exceed end");
        GenomicInterval {
            chrom: chrom.into(),
            start,
            end,
            strand,
        }
    }

    /// Width of the interval in its native coordinate unit.
    pub fn width(&self) -> u64 {
        self.end - self.start
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.chrom, self.start, self.end, self.strand
        )
    }
}
