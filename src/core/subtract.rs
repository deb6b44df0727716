use crate::core::aggregate::aggregate;
use crate::core::errors::{Error, Result};
use crate::core::network::{self, AddressRange};
use crate::core::normalize::{normalize, sort_networks, NormalizeMode};
use crate::core::splitter::exclude_network;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Set Difference
-------------------------------------------------------------------------------------------------*/

/// Ceiling on the number of fragments a subtraction may produce before the
/// operation is aborted instead of running the process out of memory.
pub const MAX_OUTPUT_FRAGMENTS: usize = 2_000_000;

/// Subtract the address space of `excludes` from every network in `sources`.
///
/// The excludes are normalized and aggregated into a sorted list of disjoint
/// blocks; the sources are sorted by the same total order. A forward-only
/// cursor then skips excludes that end before the current source starts, so
/// the sweep is O(N + M) plus the cost of the actual hole punching. Sources
/// with no overlapping exclude pass through unchanged.
///
/// The output is a flat fragment list: fragments of one source are never
/// re-aggregated with fragments of another, so the caller sees exactly what
/// remains of each original block.
pub fn subtract_networks(
    sources: Vec<IpNetwork>,
    excludes: Vec<IpNetwork>,
) -> Result<Vec<IpNetwork>> {
    let mut sources = sources;
    sort_networks(&mut sources);

    let excludes = aggregate(normalize(excludes, NormalizeMode::RemoveNested));
    if excludes.is_empty() {
        return Ok(sources);
    }

    let mut results: Vec<IpNetwork> = Vec::with_capacity(sources.len());
    let mut exclude_idx = 0;

    for source in sources {
        let source_family = network::family(&source);
        let source_range = AddressRange::of(&source);

        // Skip excludes that lie entirely before this source. They can
        // never matter again because the sources are sorted.
        while let Some(exclude) = excludes.get(exclude_idx) {
            let exclude_family = network::family(exclude);
            if exclude_family < source_family {
                exclude_idx += 1;
                continue;
            }
            if exclude_family > source_family {
                break;
            }
            if AddressRange::of(exclude).end < source_range.start {
                exclude_idx += 1;
            } else {
                break;
            }
        }

        // Carve every overlapping exclude out of this source.
        let mut fragments = vec![source];
        let mut idx = exclude_idx;

        while idx < excludes.len() && !fragments.is_empty() {
            let exclude = &excludes[idx];
            let exclude_family = network::family(exclude);
            if exclude_family > source_family {
                break;
            }
            if exclude_family == source_family
                && network::base(exclude) > source_range.end
            {
                // Everything further is to the right of this source.
                break;
            }

            let mut next_pass: Vec<IpNetwork> = Vec::with_capacity(fragments.len());
            for fragment in fragments {
                if !network::overlaps(&fragment, exclude) {
                    next_pass.push(fragment);
                } else if network::contains(exclude, &fragment) {
                    // Fragment fully removed.
                } else {
                    // CIDR blocks that overlap without either containing the
                    // other cannot exist, so the exclude is strictly inside.
                    next_pass.extend(exclude_network(&fragment, exclude)?);
                }
            }
            fragments = next_pass;
            idx += 1;
        }

        results.extend(fragments);

        if results.len() > MAX_OUTPUT_FRAGMENTS {
            return Err(Error::ResourceExceeded(format!(
                "subtraction produced more than {MAX_OUTPUT_FRAGMENTS} fragments; \
                 operation stopped"
            )));
        }
    }

    Ok(results)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
