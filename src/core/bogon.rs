use crate::core::network;
use ipnetwork::IpNetwork;
use lazy_static::lazy_static;

/*-------------------------------------------------------------------------------------------------
  Bogon / Reserved-Range Filter
-------------------------------------------------------------------------------------------------*/

/// Category a reserved range belongs to, so the filter can be enabled per
/// category or wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BogonCategory {
    Private,
    Loopback,
    LinkLocal,
    Multicast,
    Reserved,
    Unspecified,
}

lazy_static! {
    /// Static per-family table of reserved networks, initialized once and
    /// never mutated. Sources: RFC 1918, RFC 6598, RFC 5737, RFC 3849,
    /// RFC 4193, and the IANA special-purpose registries.
    pub static ref BOGON_TABLE: Vec<(BogonCategory, IpNetwork)> = {
        use BogonCategory::*;
        [
            // IPv4
            (Unspecified, "0.0.0.0/32"),
            (Reserved, "0.0.0.0/8"),
            (Private, "10.0.0.0/8"),
            (Reserved, "100.64.0.0/10"),
            (Loopback, "127.0.0.0/8"),
            (LinkLocal, "169.254.0.0/16"),
            (Private, "172.16.0.0/12"),
            (Reserved, "192.0.0.0/24"),
            (Reserved, "192.0.2.0/24"),
            (Private, "192.168.0.0/16"),
            (Reserved, "198.18.0.0/15"),
            (Reserved, "198.51.100.0/24"),
            (Reserved, "203.0.113.0/24"),
            (Multicast, "224.0.0.0/4"),
            (Reserved, "240.0.0.0/4"),
            // IPv6
            (Unspecified, "::/128"),
            (Loopback, "::1/128"),
            (Reserved, "::ffff:0:0/96"),
            (Reserved, "64:ff9b::/96"),
            (Reserved, "100::/64"),
            (Reserved, "2001::/23"),
            (Reserved, "2001:db8::/32"),
            (Reserved, "2002::/16"),
            (Private, "fc00::/7"),
            (LinkLocal, "fe80::/10"),
            (Multicast, "ff00::/8"),
        ]
        .into_iter()
        .map(|(category, text)| {
            (category, text.parse().expect("bogon table entry is valid CIDR"))
        })
        .collect()
    };
}

/// Which reserved-range categories the filter removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterRules {
    pub exclude_private: bool,
    pub exclude_loopback: bool,
    pub exclude_link_local: bool,
    pub exclude_multicast: bool,
    pub exclude_reserved: bool,
    pub exclude_unspecified: bool,
}

impl FilterRules {
    /// Every category enabled: the `--bogons` switch.
    pub fn bogons() -> Self {
        FilterRules {
            exclude_private: true,
            exclude_loopback: true,
            exclude_link_local: true,
            exclude_multicast: true,
            exclude_reserved: true,
            exclude_unspecified: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterRules::default()
    }

    fn enabled(&self, category: BogonCategory) -> bool {
        match category {
            BogonCategory::Private => self.exclude_private,
            BogonCategory::Loopback => self.exclude_loopback,
            BogonCategory::LinkLocal => self.exclude_link_local,
            BogonCategory::Multicast => self.exclude_multicast,
            BogonCategory::Reserved => self.exclude_reserved,
            BogonCategory::Unspecified => self.exclude_unspecified,
        }
    }

    /// True iff `candidate` touches any enabled table entry of its family.
    ///
    /// Partial overlap is enough to drop the whole network: the filter
    /// removes unwanted entries outright, it never splits them (that is
    /// what `exclude` is for).
    pub fn matches(&self, candidate: &IpNetwork) -> bool {
        BOGON_TABLE.iter().any(|(category, entry)| {
            self.enabled(*category) && network::overlaps(entry, candidate)
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::parse_prefix;

    fn net(text: &str) -> IpNetwork {
        parse_prefix(text).unwrap()
    }

    #[test]
    fn test_bogons_drop_reserved_keep_public() {
        let rules = FilterRules::bogons();

        assert!(!rules.matches(&net("8.8.8.8/32")));
        assert!(!rules.matches(&net("1.1.1.1/32")));
        assert!(rules.matches(&net("192.168.1.0/24")));
        assert!(rules.matches(&net("127.0.0.1/32")));
        assert!(rules.matches(&net("169.254.1.1/32")));
        assert!(rules.matches(&net("224.0.0.1/32")));
        assert!(rules.matches(&net("fe80::1/128")));
    }

    #[test]
    fn test_partial_overlap_drops_whole_network() {
        // 0.0.0.0/0 overlaps every reserved range, so it goes entirely.
        let rules = FilterRules::bogons();
        assert!(rules.matches(&net("0.0.0.0/0")));

        // A block straddling the RFC 1918 boundary is dropped outright.
        assert!(rules.matches(&net("192.160.0.0/12")));
    }

    #[test]
    fn test_single_category() {
        let rules = FilterRules {
            exclude_private: true,
            ..FilterRules::default()
        };

        assert!(rules.matches(&net("10.1.2.3/32")));
        assert!(!rules.matches(&net("127.0.0.1/32"))); // loopback not enabled
        assert!(!rules.matches(&net("8.8.8.8/32")));
    }

    #[test]
    fn test_empty_rules_match_nothing() {
        let rules = FilterRules::default();
        assert!(rules.is_empty());
        assert!(!rules.matches(&net("192.168.0.0/16")));
    }

    #[test]
    fn test_families_independent() {
        let rules = FilterRules::bogons();
        // Public IPv6 is untouched by the IPv4 entries.
        assert!(!rules.matches(&net("2600::/32")));
        assert!(rules.matches(&net("2001:db8::1/128")));
    }
}
