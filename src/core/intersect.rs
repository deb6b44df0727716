use crate::core::network::{self, AddressRange};
use crate::core::normalize::{normalize, NormalizeMode};
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Intersection
-------------------------------------------------------------------------------------------------*/

/// Classified intersections between two network sets.
///
/// `exact` holds pairs naming the same network; `partial` holds pairs whose
/// address ranges intersect without being identical (one nested in the
/// other, or differing in prefix length), together with the overlapping
/// span. Pairs appear in ascending order of the A-side network.
#[derive(Debug, Default)]
pub struct IntersectionReport {
    pub exact: Vec<(IpNetwork, IpNetwork)>,
    pub partial: Vec<(IpNetwork, IpNetwork, AddressRange)>,
}

impl IntersectionReport {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.partial.is_empty()
    }

    /// All networks participating in any intersection, both sides, deduped
    /// and sorted.
    pub fn participating_networks(&self) -> Vec<IpNetwork> {
        let mut networks: Vec<IpNetwork> = self
            .exact
            .iter()
            .flat_map(|(a, b)| [*a, *b])
            .chain(self.partial.iter().flat_map(|(a, b, _)| [*a, *b]))
            .collect();
        networks = normalize(networks, NormalizeMode::DedupeOnly);
        networks
    }
}

/// Find every intersecting pair between two sets.
///
/// Both inputs are normalized first (each set internally free of nesting),
/// then swept in lockstep over the total order: whichever side's current
/// range ends first advances, so each element is visited once and the sweep
/// never degenerates into an O(N×M) pairing.
pub fn intersect(set_a: Vec<IpNetwork>, set_b: Vec<IpNetwork>) -> IntersectionReport {
    let set_a = normalize(set_a, NormalizeMode::RemoveNested);
    let set_b = normalize(set_b, NormalizeMode::RemoveNested);

    let mut report = IntersectionReport::default();
    let mut i = 0;
    let mut j = 0;

    while i < set_a.len() && j < set_b.len() {
        let a = &set_a[i];
        let b = &set_b[j];
        let family_a = network::family(a);
        let family_b = network::family(b);

        if family_a < family_b {
            i += 1;
            continue;
        }
        if family_b < family_a {
            j += 1;
            continue;
        }

        let range_a = AddressRange::of(a);
        let range_b = AddressRange::of(b);

        if range_a.end < range_b.start {
            i += 1;
            continue;
        }
        if range_b.end < range_a.start {
            j += 1;
            continue;
        }

        if a == b {
            report.exact.push((*a, *b));
        } else {
            let overlap = range_a
                .intersection(&range_b)
                .expect("ranges checked to overlap");
            report.partial.push((*a, *b, overlap));
        }

        // Advance whichever side ends first; both when they end together
        // (within one normalized set nothing else can reach this end).
        if range_a.end < range_b.end {
            i += 1;
        } else if range_b.end < range_a.end {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }

    report
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
