use crate::core::aggregate::aggregate;
use crate::core::bogon::FilterRules;
use crate::core::normalize::{normalize, NormalizeMode};
use crate::core::prefix_type::PrefixType;
use ipnetwork::IpNetwork;
use log::{debug, trace};

/*-------------------------------------------------------------------------------------------------
  Processing Pipeline
-------------------------------------------------------------------------------------------------*/

/// Stages applied to a network collection, in fixed order: family filter,
/// reserved-range filter, sort, nested removal (or dedupe), aggregation.
/// Each command enables the stages its recipe calls for.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub ipv4_only: bool,
    pub ipv6_only: bool,
    pub rules: FilterRules,
    pub sort: bool,
    pub remove_nested: bool,
    pub aggregate: bool,
}

impl PipelineOptions {
    /// The full canonicalization recipe: remove nesting, then aggregate.
    pub fn optimize() -> Self {
        PipelineOptions {
            sort: true,
            remove_nested: true,
            aggregate: true,
            ..PipelineOptions::default()
        }
    }

    /// Sort and drop exact duplicates, preserving nesting.
    pub fn dedupe_only() -> Self {
        PipelineOptions {
            sort: true,
            ..PipelineOptions::default()
        }
    }
}

/// Run a network collection through the enabled pipeline stages.
pub fn process_networks(networks: Vec<IpNetwork>, options: &PipelineOptions) -> Vec<IpNetwork> {
    let input_count = networks.len();

    let mut networks: Vec<IpNetwork> = networks
        .into_iter()
        .filter(|n| {
            if options.ipv4_only && matches!(n, IpNetwork::V6(_)) {
                trace!("dropping {n}: IPv6 excluded");
                return false;
            }
            if options.ipv6_only && matches!(n, IpNetwork::V4(_)) {
                trace!("dropping {n}: IPv4 excluded");
                return false;
            }
            if !options.rules.is_empty() && options.rules.matches(n) {
                trace!("dropping {n}: matches reserved-range filter");
                return false;
            }
            true
        })
        .collect();

    if options.remove_nested {
        networks = normalize(networks, NormalizeMode::RemoveNested);
    } else if options.sort {
        networks = normalize(networks, NormalizeMode::DedupeOnly);
    }

    if options.aggregate {
        if !options.remove_nested {
            // Aggregation assumes a nesting-free input.
            networks = normalize(networks, NormalizeMode::RemoveNested);
        }
        networks = aggregate(networks);
    }

    debug!("pipeline: {input_count} input networks, {} output", networks.len());
    networks
}

/// Count networks of one family, for reporting.
pub fn family_count(networks: &[IpNetwork], family: PrefixType) -> usize {
    networks
        .iter()
        .filter(|n| crate::core::network::family(n) == family)
        .count()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
