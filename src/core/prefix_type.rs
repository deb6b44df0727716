/*-------------------------------------------------------------------------------------------------
  Prefix Type
-------------------------------------------------------------------------------------------------*/

/// IP address family (IPv4 or IPv6) tag carried by [`AddressRange`] and used
/// by the family filters.
///
/// [`AddressRange`]: crate::core::network::AddressRange
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrefixType {
    IPv4,
    IPv6,
}

impl PrefixType {
    pub fn is_ipv4(&self) -> bool {
        match self {
            PrefixType::IPv4 => true,
            PrefixType::IPv6 => false,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            PrefixType::IPv4 => false,
            PrefixType::IPv6 => true,
        }
    }

    /// Address width in bits: 32 for IPv4, 128 for IPv6.
    pub fn width(&self) -> u8 {
        match self {
            PrefixType::IPv4 => 32,
            PrefixType::IPv6 => 128,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
