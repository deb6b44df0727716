use crate::core::errors::{Error, Result};
use crate::core::network;
use crate::core::prefix_type::PrefixType;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Subdivider ("split")
-------------------------------------------------------------------------------------------------*/

/// Lazy enumeration of the subnets of a network at a fixed longer prefix
/// length, in ascending base-address order.
///
/// A pure function of its inputs: the iterator holds only the family, the
/// stride, a cursor, and the count remaining, so it can be rebuilt (and
/// therefore restarted) at any time without touching the parent network
/// again.
#[derive(Debug, Clone)]
pub struct Subnets {
    family: PrefixType,
    prefix: u8,
    stride: u128,
    next_base: u128,
    remaining: u128,
}

impl Iterator for Subnets {
    type Item = IpNetwork;

    fn next(&mut self) -> Option<IpNetwork> {
        if self.remaining == 0 {
            return None;
        }
        let subnet = network::from_parts(self.family, self.next_base, self.prefix);
        self.remaining -= 1;
        // The final wrapping add falls off the end of the address space for
        // a full-width parent; remaining hits zero first so it is never read.
        self.next_base = self.next_base.wrapping_add(self.stride);
        Some(subnet)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).ok();
        (n.unwrap_or(usize::MAX), n)
    }
}

/// Enumerate all subnets of `network` at prefix length `new_length`.
///
/// Fails with [`Error::InvalidLength`] when `new_length` does not strictly
/// lengthen the prefix or exceeds the family width. The subnet count is
/// `2^(new_length - prefix)`; the iterator is lazy, so callers impose their
/// own ceiling before collecting.
pub fn subdivide(network: &IpNetwork, new_length: u8) -> Result<Subnets> {
    let family = network::family(network);
    if new_length <= network.prefix() || new_length > family.width() {
        return Err(Error::InvalidLength {
            network: *network,
            length: new_length,
        });
    }

    let depth = new_length - network.prefix();
    let remaining = if depth >= 128 {
        u128::MAX // ::/0 into /128s; unreachable in practice before a ceiling trips
    } else {
        1u128 << depth
    };

    Ok(Subnets {
        family,
        prefix: new_length,
        stride: 1u128 << (family.width() - new_length),
        next_base: network::base(network),
        remaining,
    })
}

/// Number of subnets `subdivide` would produce, saturating at the u128
/// bound (a 128-bit depth reports `u128::MAX`, one short of the true
/// 2^128, same as the iterator itself). Lets callers check a ceiling
/// without constructing the iterator.
pub fn subnet_count(network: &IpNetwork, new_length: u8) -> u128 {
    if new_length <= network.prefix() {
        return 0;
    }
    let depth = new_length - network.prefix();
    if depth >= 128 {
        u128::MAX
    } else {
        1u128 << depth
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
