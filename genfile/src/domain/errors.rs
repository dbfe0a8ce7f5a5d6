use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Target size {target} is below the format minimum of {minimum} bytes")]
    SizeTooSmall { target: u64, minimum: u64 },

    #[error("Unsupported file extension: {0:?}")]
    UnsupportedFormat(String),

    #[error("Invalid size specification: {0:?}")]
    InvalidSizeSpec(String),

    #[error("Serialized {actual} bytes for a target of {target}; refusing to truncate")]
    Overshoot { actual: u64, target: u64 },

    #[error("Size reconciliation did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: u32 },

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<dwg_container::WriteError> for GenError {
    fn from(err: dwg_container::WriteError) -> Self {
        match err {
            dwg_container::WriteError::SizeTooSmall { target, required } => {
                GenError::SizeTooSmall {
                    target,
                    minimum: required,
                }
            }
            other => GenError::Encoding(other.to_string()),
        }
    }
}
