/*-------------------------------------------------------------------------------------------------
  prefixopt: CIDR set-algebra engine

  Computes canonical, non-redundant representations of IPv4/IPv6 network
  collections and derived relationships between them: nested-subnet removal,
  supernet aggregation, set difference with automatic subnet splitting,
  intersection classification, symmetric difference, subdivision,
  reserved-range filtering, and containment lookup.
-------------------------------------------------------------------------------------------------*/

pub mod core;

/*--------------------------------------------------------------------------------------
  Library Interface
--------------------------------------------------------------------------------------*/

pub use crate::core::aggregate::aggregate;
pub use crate::core::bogon::{BogonCategory, FilterRules, BOGON_TABLE};
pub use crate::core::check::find_covering;
pub use crate::core::diff::{diff, DiffReport};
pub use crate::core::errors::{Error, Result};
pub use crate::core::intersect::{intersect, IntersectionReport};
pub use crate::core::network::{
    address_count, compare, contains, from_range, overlaps, parse_prefix, AddressRange,
};
pub use crate::core::normalize::{normalize, sort_networks, NormalizeMode};
pub use crate::core::pipeline::{process_networks, PipelineOptions};
pub use crate::core::prefix_type::PrefixType;
pub use crate::core::splitter::exclude_network;
pub use crate::core::stats::{summarize, StatsSummary};
pub use crate::core::subnet::{subdivide, subnet_count, Subnets};
pub use crate::core::subtract::{subtract_networks, MAX_OUTPUT_FRAGMENTS};
