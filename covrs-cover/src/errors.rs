use thiserror::Error;

use covrs_array::StoreError;
use covrs_core::CoreError;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("binsize, stepsize and resolution must all be positive")]
    InvalidBinParameters,

    #[error("Only one annotation file is allowed with categorical mode")]
    CategoricalSingleSource,

    #[error("Score field must be available with mode \"{0}\"")]
    MissingScore(&'static str),

    #[error("Slice step must be positive")]
    ZeroStep,

    #[error("Window index {index} out of range for {len} windows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Bam error: {0}")]
    Bam(String),

    #[error("BigWig error: {0}")]
    BigWig(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
