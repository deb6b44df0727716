use crate::core::errors::{Error, Result};
use crate::core::network;
use crate::core::normalize::sort_networks;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Range Splitter
-------------------------------------------------------------------------------------------------*/

/// Carve `hole` out of `cover`, returning the minimal set of networks whose
/// union is exactly `cover` minus `hole`.
///
/// Binary subdivision: at each prefix length from `cover.prefix() + 1` down
/// to `hole.prefix()`, exactly one half of the current block contains the
/// hole; the other half is emitted unchanged and the descent continues into
/// the containing half. At most `hole.prefix() - cover.prefix()` fragments
/// come out, each maximal. Expressed as a loop with a cursor, so the depth
/// is bounded by the address width with no recursion.
///
/// Fails with [`Error::FamilyMismatch`] across families and
/// [`Error::NotContained`] when the hole lies outside the cover; both
/// indicate a caller bug, not bad user input.
pub fn exclude_network(cover: &IpNetwork, hole: &IpNetwork) -> Result<Vec<IpNetwork>> {
    if network::family(cover) != network::family(hole) {
        return Err(Error::FamilyMismatch);
    }
    if !network::contains(cover, hole) {
        return Err(Error::NotContained {
            cover: *cover,
            hole: *hole,
        });
    }

    let family = network::family(cover);
    let hole_base = network::base(hole);
    let mut fragments: Vec<IpNetwork> = Vec::new();
    let mut current_base = network::base(cover);

    for new_prefix in (cover.prefix() + 1)..=hole.prefix() {
        let half_size = 1u128 << (family.width() - new_prefix);
        let upper_base = current_base + half_size;

        if hole_base < upper_base {
            // Hole sits in the lower half; keep the upper.
            fragments.push(network::from_parts(family, upper_base, new_prefix));
        } else {
            fragments.push(network::from_parts(family, current_base, new_prefix));
            current_base = upper_base;
        }
    }

    sort_networks(&mut fragments);
    Ok(fragments)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::{address_count, overlaps, parse_prefix};

    fn net(text: &str) -> IpNetwork {
        parse_prefix(text).unwrap()
    }

    fn strings(networks: &[IpNetwork]) -> Vec<String> {
        networks.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_hole_punching() {
        let fragments = exclude_network(&net("10.0.0.0/29"), &net("10.0.0.3/32")).unwrap();
        assert_eq!(
            strings(&fragments),
            vec!["10.0.0.0/31", "10.0.0.2/32", "10.0.0.4/30"]
        );
    }

    #[test]
    fn test_equal_hole_leaves_nothing() {
        let fragments = exclude_network(&net("10.0.0.0/24"), &net("10.0.0.0/24")).unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_half_split() {
        let fragments = exclude_network(&net("10.0.0.0/24"), &net("10.0.0.0/25")).unwrap();
        assert_eq!(strings(&fragments), vec!["10.0.0.128/25"]);
    }

    #[test]
    fn test_not_contained_is_an_error() {
        assert!(matches!(
            exclude_network(&net("10.0.0.0/24"), &net("10.0.1.0/25")),
            Err(Error::NotContained { .. })
        ));
    }

    #[test]
    fn test_family_mismatch_is_an_error() {
        assert!(matches!(
            exclude_network(&net("10.0.0.0/8"), &net("2001:db8::/32")),
            Err(Error::FamilyMismatch)
        ));
    }

    #[test]
    fn test_fragments_plus_hole_tile_the_cover() {
        let cover = net("192.168.0.0/20");
        let hole = net("192.168.5.64/26");
        let fragments = exclude_network(&cover, &hole).unwrap();

        // Fragment count is bounded by the prefix-length difference.
        assert!(fragments.len() <= (hole.prefix() - cover.prefix()) as usize);

        // Coverage: fragments + hole account for every address of the cover.
        let covered: u128 = fragments.iter().map(address_count).sum::<u128>() + address_count(&hole);
        assert_eq!(covered, address_count(&cover));

        // Disjointness: no fragment overlaps another or the hole.
        for (i, a) in fragments.iter().enumerate() {
            assert!(!overlaps(a, &hole));
            for b in fragments.iter().skip(i + 1) {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn test_ipv6_hole_punching() {
        let fragments = exclude_network(&net("2001:db8::/32"), &net("2001:db8:8000::/33")).unwrap();
        assert_eq!(strings(&fragments), vec!["2001:db8::/33"]);
    }
}
