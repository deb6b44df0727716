use crate::core::network;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Containment Query ("check")
-------------------------------------------------------------------------------------------------*/

/// Find every network in `set` that contains `target`, including an exact
/// match of the target itself.
///
/// The result is ordered broadest first (prefix length ascending, then base
/// address ascending). The set is scanned as-is; callers wanting nested
/// entries reported must not normalize it first.
pub fn find_covering(set: &[IpNetwork], target: &IpNetwork) -> Vec<IpNetwork> {
    let mut covering: Vec<IpNetwork> = set
        .iter()
        .filter(|candidate| network::contains(candidate, target))
        .copied()
        .collect();

    covering.sort_by(|a, b| {
        a.prefix()
            .cmp(&b.prefix())
            .then_with(|| network::base(a).cmp(&network::base(b)))
    });
    covering.dedup();
    covering
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
