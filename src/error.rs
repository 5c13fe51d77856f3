//! Error types for the ACISM crate.
//!
//! Only construction and configuration can fail. Scanning a compiled
//! automaton never produces an error; a callback stops a scan early by
//! returning [`std::ops::ControlFlow::Break`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcismError>;

#[derive(Error, Debug)]
pub enum AcismError {
    /// The packed transition word cannot hold the `next` field for this
    /// pattern set: table size plus pattern count plus symbol bits exceed
    /// the word width.
    #[error(
        "Capacity overflow: transition words need {required_bits} bits but only {available_bits} are available"
    )]
    CapacityOverflow {
        required_bits: u32,
        available_bits: u32,
    },

    /// Memory for a construction-time or compiled structure could not be
    /// reserved.
    #[error("Allocation failed: could not reserve {requested} entries for {what}")]
    AllocationFailed {
        what: &'static str,
        requested: usize,
    },

    /// A limit from [`CompileConfig`](crate::CompileConfig) was exceeded.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcismError {
    /// Returns true for failures caused by the size of the pattern set
    /// rather than by the environment or the caller's configuration text.
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            AcismError::CapacityOverflow { .. } | AcismError::ResourceLimitExceeded(_)
        )
    }
}

impl From<serde_yaml::Error> for AcismError {
    fn from(err: serde_yaml::Error) -> Self {
        AcismError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for AcismError {
    fn from(err: serde_json::Error) -> Self {
        AcismError::InvalidConfig(err.to_string())
    }
}

/// Reserve room for `additional` more elements, mapping failure to
/// [`AcismError::AllocationFailed`] tagged with `what`.
pub(crate) fn try_reserve<T>(
    vec: &mut Vec<T>,
    additional: usize,
    what: &'static str,
) -> Result<()> {
    vec.try_reserve_exact(additional)
        .map_err(|_| AcismError::AllocationFailed {
            what,
            requested: additional,
        })
}

/// Allocate a vector of `len` copies of `value` without aborting on OOM.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    try_reserve(&mut vec, len, what)?;
    vec.resize(len, value);
    Ok(vec)
}
