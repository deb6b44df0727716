use crate::core::network;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Normalizer
-------------------------------------------------------------------------------------------------*/

/// How the normalizer treats nested entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Drop exact duplicates and every network wholly contained in another.
    RemoveNested,
    /// Drop exact duplicates only, preserving nesting. Used by the
    /// keep-comments mode, where a nested entry may carry its own comment.
    DedupeOnly,
}

/// Sort networks in place by the engine-wide total order.
pub fn sort_networks(networks: &mut [IpNetwork]) {
    networks.sort_by(network::compare);
}

/// Sort a sequence of networks and remove duplicate (and, in
/// [`NormalizeMode::RemoveNested`], nested) entries.
///
/// A single check against the last kept network suffices: the total order
/// places a covering network before everything it contains, and once the
/// most recent kept entry does not contain the candidate, no earlier kept
/// entry can (kept entries are pairwise non-nested and strictly ordered).
pub fn normalize(mut networks: Vec<IpNetwork>, mode: NormalizeMode) -> Vec<IpNetwork> {
    sort_networks(&mut networks);

    let mut kept: Vec<IpNetwork> = Vec::with_capacity(networks.len());
    for candidate in networks {
        if let Some(top) = kept.last() {
            if *top == candidate {
                continue;
            }
            if mode == NormalizeMode::RemoveNested && network::contains(top, &candidate) {
                continue;
            }
        }
        kept.push(candidate);
    }
    kept
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
