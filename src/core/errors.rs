use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate.
///
/// Parse errors (`InvalidPrefix`) are recoverable per item: the input readers
/// log and skip the offending token. Everything else aborts the current
/// operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed address text or out-of-range prefix length.
    #[error("invalid IP prefix: {0:?}")]
    InvalidPrefix(String),

    /// Target prefix length for a subdivision is not longer than the source
    /// prefix, or exceeds the address-family width.
    #[error("invalid target prefix length /{length} for {network}")]
    InvalidLength { network: IpNetwork, length: u8 },

    /// An operation that requires a single address family received mixed
    /// IPv4/IPv6 input.
    #[error("cannot mix IPv4 and IPv6 networks in this operation")]
    FamilyMismatch,

    /// Splitter invariant violation: the hole is not inside the cover.
    #[error("{hole} is not contained in {cover}")]
    NotContained { cover: IpNetwork, hole: IpNetwork },

    /// An address range does not correspond to one power-of-two-aligned
    /// CIDR block.
    #[error("address range {start:#x}-{end:#x} is not an aligned CIDR block")]
    NotAligned { start: u128, end: u128 },

    /// A hard input or output size limit was exceeded.
    #[error("{0}")]
    ResourceExceeded(String),

    /// Incompatible or incomplete command-line usage not expressible as a
    /// clap constraint.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
