use std::panic::Location;

use thiserror::Error;

/// Rejected input to [`AliasTable::new`](crate::AliasTable::new).
#[derive(Debug, Error)]
pub enum ProbError {
    #[error("weights slice is empty")]
    Empty,
    #[error("weights contain a negative value at index {index}: {value}")]
    Negative { index: usize, value: f64 },
    #[error("weights contain a non-finite value at index {index}")]
    NonFinite { index: usize },
    #[error("sum of weights is zero")]
    ZeroSum,
    #[error("table has {len} entries, more than a u32 alias can address")]
    TooLarge { len: usize },
}

/// Everything that can stop a generation run. All of these are fatal.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `rank^alpha` (or the normalizer) left the representable range.
    #[error("zipf weight for rank {rank} with alpha {alpha} is not representable")]
    NumericOverflow { rank: u64, alpha: f64 },

    #[error("failed to allocate {what} ({len} entries)")]
    ResourceExhaustion { what: &'static str, len: usize },

    #[error("{op} failed at {location}: {source}")]
    Io {
        op: &'static str,
        location: &'static Location<'static>,
        #[source]
        source: std::io::Error,
    },

    #[error("verification failed: {0}")]
    Verify(String),

    #[error(transparent)]
    Prob(#[from] ProbError),
}

impl GenError {
    /// Wrap an I/O error, recording the caller's source location.
    #[track_caller]
    pub fn io(op: &'static str, source: std::io::Error) -> Self {
        GenError::Io {
            op,
            location: Location::caller(),
            source,
        }
    }
}

/// Allocate a `len`-long vector filled with `value`, reporting failure
/// instead of aborting.
pub(crate) fn try_filled<T: Clone>(
    len: usize,
    value: T,
    what: &'static str,
) -> Result<Vec<T>, GenError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| GenError::ResourceExhaustion { what, len })?;
    v.resize(len, value);
    Ok(v)
}
