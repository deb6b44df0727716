use crate::core::aggregate::aggregate;
use crate::core::network::{self, address_count};
use crate::core::normalize::{normalize, NormalizeMode};
use crate::core::pipeline::family_count;
use crate::core::prefix_type::PrefixType;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Statistics
-------------------------------------------------------------------------------------------------*/

/// Aggregate statistics over a network set.
///
/// `unique_address_count` is computed per family over the normalized set, so
/// duplicates and nested entries are counted once; the raw counterpart sums
/// over the input as given. Counts saturate at the u128 bound (`::/0` alone
/// covers the entire IPv6 space).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub raw_count: usize,
    pub aggregated_count: usize,
    pub ipv4_count: usize,
    pub ipv6_count: usize,
    pub raw_address_count: u128,
    pub unique_address_count: u128,
    /// Shortest and longest prefix length seen, per (v4, v6) in the input;
    /// None when the family is absent.
    pub ipv4_prefix_range: Option<(u8, u8)>,
    pub ipv6_prefix_range: Option<(u8, u8)>,
}

impl StatsSummary {
    /// Ratio of raw entries to aggregated entries. 1.0 means the input was
    /// already minimal; 0.0 when the input is empty.
    pub fn compression_ratio(&self) -> f64 {
        if self.aggregated_count == 0 {
            0.0
        } else {
            self.raw_count as f64 / self.aggregated_count as f64
        }
    }
}

fn prefix_range(networks: &[IpNetwork], family: PrefixType) -> Option<(u8, u8)> {
    networks
        .iter()
        .filter(|n| network::family(n) == family)
        .map(|n| n.prefix())
        .fold(None, |acc, prefix| match acc {
            None => Some((prefix, prefix)),
            Some((lo, hi)) => Some((lo.min(prefix), hi.max(prefix))),
        })
}

/// Compute summary statistics for a set of networks.
pub fn summarize(networks: &[IpNetwork]) -> StatsSummary {
    let normalized = normalize(networks.to_vec(), NormalizeMode::RemoveNested);
    let aggregated = aggregate(normalized.clone());

    let raw_address_count = networks
        .iter()
        .fold(0u128, |sum, n| sum.saturating_add(address_count(n)));
    let unique_address_count = normalized
        .iter()
        .fold(0u128, |sum, n| sum.saturating_add(address_count(n)));

    StatsSummary {
        raw_count: networks.len(),
        aggregated_count: aggregated.len(),
        ipv4_count: family_count(networks, PrefixType::IPv4),
        ipv6_count: family_count(networks, PrefixType::IPv6),
        raw_address_count,
        unique_address_count,
        ipv4_prefix_range: prefix_range(networks, PrefixType::IPv4),
        ipv6_prefix_range: prefix_range(networks, PrefixType::IPv6),
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
