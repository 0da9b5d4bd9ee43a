use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidPageSize(u32),
    InvalidPriceRange { min: f64, max: f64 },
    UnknownSortOrder(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidPageSize(size) => {
                write!(f, "invalid page size: {size} (must be at least 1)")
            }
            ModelError::InvalidPriceRange { min, max } => {
                write!(f, "invalid price range: {min}..{max}")
            }
            ModelError::UnknownSortOrder(raw) => {
                write!(f, "unknown sort order: {raw}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
