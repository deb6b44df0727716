use crate::core::errors::{Error, Result};
use crate::core::prefix_type::PrefixType;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/*-------------------------------------------------------------------------------------------------
  Network Model
-------------------------------------------------------------------------------------------------*/

/*
    The IpNetwork type accepts interface-style CIDR input ("10.0.0.1/24")
    without reducing it to the network prefix (host bits stay set). Every
    network entering the engine passes through canonical() so that the
    base address always has all bits beyond the prefix length cleared —
    the ordering and sibling-merge arithmetic depend on it.

    All address math is done on u128: an IPv4 address occupies the low 32
    bits. The family tag keeps the two spaces apart.
*/

/// Address family of a network.
pub fn family(network: &IpNetwork) -> PrefixType {
    match network {
        IpNetwork::V4(_) => PrefixType::IPv4,
        IpNetwork::V6(_) => PrefixType::IPv6,
    }
}

/// Network base address as a fixed-width unsigned integer.
pub fn base(network: &IpNetwork) -> u128 {
    match network {
        IpNetwork::V4(ipv4_network) => u32::from(ipv4_network.network()) as u128,
        IpNetwork::V6(ipv6_network) => u128::from(ipv6_network.network()),
    }
}

/// Reduce a network to canonical form: host bits beyond the prefix length
/// cleared.
pub fn canonical(network: IpNetwork) -> IpNetwork {
    match network {
        IpNetwork::V4(ipv4_network) => IpNetwork::V4(
            Ipv4Network::new(ipv4_network.network(), ipv4_network.prefix())
                .expect("prefix length already validated"),
        ),
        IpNetwork::V6(ipv6_network) => IpNetwork::V6(
            Ipv6Network::new(ipv6_network.network(), ipv6_network.prefix())
                .expect("prefix length already validated"),
        ),
    }
}

/// Build a canonical network from a family, base address, and prefix length.
pub(crate) fn from_parts(family: PrefixType, base: u128, prefix: u8) -> IpNetwork {
    match family {
        PrefixType::IPv4 => IpNetwork::V4(
            Ipv4Network::new(Ipv4Addr::from(base as u32), prefix)
                .expect("prefix length bounded by caller"),
        ),
        PrefixType::IPv6 => IpNetwork::V6(
            Ipv6Network::new(Ipv6Addr::from(base), prefix)
                .expect("prefix length bounded by caller"),
        ),
    }
}

/// Parse a single prefix string into a canonical network.
///
/// A bare address ("10.0.0.1", "2001:db8::1") becomes a host network
/// (/32 or /128). Fails with [`Error::InvalidPrefix`] on malformed input or
/// an out-of-range prefix length.
pub fn parse_prefix(text: &str) -> Result<IpNetwork> {
    let text = text.trim();

    if let Ok(network) = text.parse::<IpNetwork>() {
        return Ok(canonical(network));
    }

    if let Ok(address) = text.parse::<IpAddr>() {
        return Ok(IpNetwork::from(address));
    }

    Err(Error::InvalidPrefix(text.to_string()))
}

/*--------------------------------------------------------------------------------------
  Total Ordering
--------------------------------------------------------------------------------------*/

/// Sort key implementing the engine-wide total order: IPv4 before IPv6, then
/// base address ascending, then prefix length ascending (a supernet sorts
/// before a subnet sharing its base).
pub fn sort_key(network: &IpNetwork) -> (PrefixType, u128, u8) {
    (family(network), base(network), network.prefix())
}

/// Compare two networks by the engine-wide total order.
pub fn compare(a: &IpNetwork, b: &IpNetwork) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/*--------------------------------------------------------------------------------------
  Containment and Overlap
--------------------------------------------------------------------------------------*/

/// True iff `inner` is the same network as `outer` or a subnet of it.
/// Always false across address families.
pub fn contains(outer: &IpNetwork, inner: &IpNetwork) -> bool {
    if family(outer) != family(inner) || inner.prefix() < outer.prefix() {
        return false;
    }
    let outer_range = AddressRange::of(outer);
    let inner_base = base(inner);
    outer_range.start <= inner_base && inner_base <= outer_range.end
}

/// True iff the address ranges of `a` and `b` intersect at all.
pub fn overlaps(a: &IpNetwork, b: &IpNetwork) -> bool {
    if family(a) != family(b) {
        return false;
    }
    let range_a = AddressRange::of(a);
    let range_b = AddressRange::of(b);
    range_a.start <= range_b.end && range_b.start <= range_a.end
}

/// Number of addresses covered by a network, saturating at the u128 bound
/// (::/0 covers the whole IPv6 space).
pub fn address_count(network: &IpNetwork) -> u128 {
    let host_bits = family(network).width() - network.prefix();
    if host_bits >= 128 {
        u128::MAX
    } else {
        1u128 << host_bits
    }
}

/*-------------------------------------------------------------------------------------------------
  Address Range
-------------------------------------------------------------------------------------------------*/

/// Inclusive span of addresses within one family.
///
/// Internal representation used by the splitter, intersection sweep, and
/// stats engine to reason about contiguous spans without forcing bit-aligned
/// boundaries at every intermediate step. Converted back to aligned networks
/// via [`from_range`] before crossing a public boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub family: PrefixType,
    pub start: u128,
    pub end: u128,
}

impl AddressRange {
    /// The span covered by a network.
    pub fn of(network: &IpNetwork) -> Self {
        let host_bits = family(network).width() - network.prefix();
        let host_mask = if host_bits >= 128 {
            u128::MAX
        } else {
            (1u128 << host_bits) - 1
        };
        let start = base(network);
        AddressRange {
            family: family(network),
            start,
            end: start | host_mask,
        }
    }

    /// Intersection of two spans, if they share a family and overlap.
    pub fn intersection(&self, other: &AddressRange) -> Option<AddressRange> {
        if self.family != other.family {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(AddressRange {
                family: self.family,
                start,
                end,
            })
        } else {
            None
        }
    }
}

/// Convert an inclusive address range back into the single network it
/// covers. Fails with [`Error::NotAligned`] when the span is not exactly one
/// power-of-two-aligned block.
pub fn from_range(range: &AddressRange) -> Result<IpNetwork> {
    let not_aligned = Error::NotAligned {
        start: range.start,
        end: range.end,
    };

    if range.end < range.start {
        return Err(not_aligned);
    }
    let size = (range.end - range.start).checked_add(1);

    let prefix = match size {
        // end - start + 1 == 2^128: the whole IPv6 space.
        None => 0u8,
        Some(size) => {
            if !size.is_power_of_two() || range.start % size != 0 {
                return Err(not_aligned);
            }
            let host_bits = size.trailing_zeros() as u8;
            if host_bits > range.family.width() {
                return Err(not_aligned);
            }
            range.family.width() - host_bits
        }
    };

    Ok(from_parts(range.family, range.start, prefix))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
