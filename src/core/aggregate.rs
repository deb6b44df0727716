use crate::core::network;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Aggregator
-------------------------------------------------------------------------------------------------*/

/// True iff `lower` and `upper` are siblings: equal prefix length, bases
/// differing only in the bit that separates a parent's two halves, with
/// `lower` holding the clear bit. Callers pass them in sorted order.
fn is_sibling(lower: &IpNetwork, upper: &IpNetwork) -> bool {
    if network::family(lower) != network::family(upper)
        || lower.prefix() != upper.prefix()
        || lower.prefix() == 0
    {
        return false;
    }
    let shift = network::family(lower).width() - lower.prefix();
    let lower_bits = network::base(lower) >> shift;
    let upper_bits = network::base(upper) >> shift;
    lower_bits & 1 == 0 && lower_bits + 1 == upper_bits
}

/// The parent network one bit shorter than `child`, sharing its base.
fn parent_of(child: &IpNetwork) -> IpNetwork {
    let prefix = child.prefix() - 1;
    let shift = network::family(child).width() - prefix;
    let base = if shift >= 128 {
        0
    } else {
        (network::base(child) >> shift) << shift
    };
    network::from_parts(network::family(child), base, prefix)
}

/// Merge adjacent sibling networks of a normalized set into minimal
/// supernets.
///
/// Input must be normalized (sorted, no duplicate or nested entries); the
/// output covers exactly the same address space with the fewest networks.
///
/// Single left-to-right pass over a pending stack. When the incoming network
/// is the sibling of the stack top, both are replaced by their parent, which
/// is then re-checked against the new top (bubble-up). Each merge shortens
/// the prefix by one, so the bubble-up depth is bounded by the address width
/// and the pass stays O(N) amortized. Nothing is emitted until the pass
/// completes, so no network leaves the aggregator while a further merge is
/// still possible.
pub fn aggregate(networks: Vec<IpNetwork>) -> Vec<IpNetwork> {
    let mut pending: Vec<IpNetwork> = Vec::with_capacity(networks.len());

    for next in networks {
        let mut current = next;
        while let Some(top) = pending.last() {
            if is_sibling(top, &current) {
                current = parent_of(top);
                pending.pop();
            } else {
                break;
            }
        }
        pending.push(current);
    }

    pending
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::parse_prefix;
    use crate::core::normalize::{normalize, NormalizeMode};

    fn nets(texts: &[&str]) -> Vec<IpNetwork> {
        texts.iter().map(|t| parse_prefix(t).unwrap()).collect()
    }

    fn strings(networks: &[IpNetwork]) -> Vec<String> {
        networks.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_sibling_pair_merges_to_parent() {
        let result = aggregate(nets(&["192.168.0.0/24", "192.168.1.0/24"]));
        assert_eq!(strings(&result), vec!["192.168.0.0/23"]);
    }

    #[test]
    fn test_bubble_up_merge() {
        // Four consecutive /24s collapse all the way to a /22.
        let result = aggregate(nets(&[
            "192.168.0.0/24",
            "192.168.1.0/24",
            "192.168.2.0/24",
            "192.168.3.0/24",
        ]));
        assert_eq!(strings(&result), vec!["192.168.0.0/22"]);
    }

    #[test]
    fn test_gap_prevents_merge() {
        let result = aggregate(nets(&["192.168.0.0/24", "192.168.2.0/24"]));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_adjacent_but_not_siblings() {
        // .1/32 and .2/32 are adjacent yet belong to different /31 parents.
        let result = aggregate(nets(&["10.0.0.1/32", "10.0.0.2/32"]));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_ipv6_aggregation() {
        let result = aggregate(nets(&["2001:db8::/48", "2001:db8:1::/48"]));
        assert_eq!(strings(&result), vec!["2001:db8::/47"]);
    }

    #[test]
    fn test_families_never_merge() {
        let result = aggregate(nets(&["10.0.0.0/24", "2001:db8::/48"]));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_coverage_equivalence() {
        // Aggregating a normalized set never changes the covered address
        // count.
        let raw = nets(&[
            "10.0.0.0/24",
            "10.0.1.0/24",
            "10.0.0.5/32",
            "192.168.0.0/16",
            "192.168.1.0/24",
        ]);
        let normalized = normalize(raw, NormalizeMode::RemoveNested);
        let before: u128 = normalized
            .iter()
            .map(crate::core::network::address_count)
            .sum();
        let aggregated = aggregate(normalized);
        let after: u128 = aggregated
            .iter()
            .map(crate::core::network::address_count)
            .sum();
        assert_eq!(before, after);
    }
}
