pub mod error;
pub mod metric;
pub mod ratios;
pub mod types;

#[cfg(feature = "comparator")]
pub mod comparator;

#[cfg(feature = "ma")]
pub mod ma;

#[cfg(feature = "growth")]
pub mod growth;

pub use error::CompsError;
pub use metric::Metric;
pub use types::*;

/// Standard result type for all comps-engine operations
pub type CompsResult<T> = Result<T, CompsError>;
