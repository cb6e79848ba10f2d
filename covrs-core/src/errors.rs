use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Can't read file: {0}")]
    FileRead(String),

    #[error("Error parsing region: {0}")]
    RegionParse(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyRegions(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
