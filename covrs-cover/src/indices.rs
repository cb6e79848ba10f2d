use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::errors::CoverError;

///
/// The polymorphic index argument of [`Cover::fetch`](crate::Cover::fetch):
/// a single window, a slice-like span with open bounds, or an explicit
/// list. Normalized to an ordered sequence of window indices before use;
/// unsupported shapes are unrepresentable, so the only index errors left
/// are a zero step and out-of-range positions.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    Single(usize),
    Span {
        start: Option<usize>,
        stop: Option<usize>,
        step: usize,
    },
    List(Vec<usize>),
}

impl Indices {
    /// A span with an explicit step; open bounds default to `0` and the
    /// view's length at resolution time.
    pub fn span(start: Option<usize>, stop: Option<usize>, step: usize) -> Indices {
        Indices::Span { start, stop, step }
    }

    /// Normalize to concrete window indices against a view of `len` windows.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>, CoverError> {
        let check = |idx: usize| {
            if idx < len {
                Ok(idx)
            } else {
                Err(CoverError::IndexOutOfRange { index: idx, len })
            }
        };

        match self {
            Indices::Single(idx) => Ok(vec![check(*idx)?]),
            Indices::Span { start, stop, step } => {
                if *step == 0 {
                    return Err(CoverError::ZeroStep);
                }
                let start = start.unwrap_or(0);
                let stop = stop.unwrap_or(len);
                (start..stop).step_by(*step).map(check).collect()
            }
            Indices::List(list) => list.iter().map(|&idx| check(idx)).collect(),
        }
    }
}

impl From<usize> for Indices {
    fn from(idx: usize) -> Self {
        Indices::Single(idx)
    }
}

impl From<Range<usize>> for Indices {
    fn from(range: Range<usize>) -> Self {
        Indices::span(Some(range.start), Some(range.end), 1)
    }
}

impl From<RangeTo<usize>> for Indices {
    fn from(range: RangeTo<usize>) -> Self {
        Indices::span(None, Some(range.end), 1)
    }
}

impl From<RangeFrom<usize>> for Indices {
    fn from(range: RangeFrom<usize>) -> Self {
        Indices::span(Some(range.start), None, 1)
    }
}

impl From<RangeFull> for Indices {
    fn from(_: RangeFull) -> Self {
        Indices::span(None, None, 1)
    }
}

impl From<Vec<usize>> for Indices {
    fn from(list: Vec<usize>) -> Self {
        Indices::List(list)
    }
}

impl From<&[usize]> for Indices {
    fn from(list: &[usize]) -> Self {
        Indices::List(list.to_vec())
    }
}
