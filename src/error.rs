use thiserror::Error;

/// Problems decoding a backend month response.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid month response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("month response contains no day records")]
    Empty,
    #[error("day {index} belongs to {found}, expected {expected}")]
    MixedMonths {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Why a list of day records cannot be laid out as a month.
/// The grid builder recovers from all of these with a placeholder grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedMonth {
    #[error("no day records")]
    Empty,
    #[error("record {index} has day {found}, expected {expected}")]
    NonConsecutive { index: usize, found: u32, expected: u32 },
    #[error("record {index} belongs to a different month")]
    MixedMonths { index: usize },
    #[error("{found} days where the month has {expected}")]
    LengthMismatch { expected: u32, found: u32 },
    #[error("{0} days is not a plausible month length")]
    LengthOutOfRange(u32),
    #[error("first record has no valid Gregorian date")]
    InvalidDate,
}
