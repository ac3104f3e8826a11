use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreedingError {
    #[error("Herd error: {0}")]
    Herd(String),

    #[error("Genotype error: {0}")]
    Genotype(String),

    #[error("Traversal cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BreedingError>;
