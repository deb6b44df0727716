use crate::core::aggregate::aggregate;
use crate::core::errors::Result;
use crate::core::normalize::{normalize, NormalizeMode};
use crate::core::subtract::subtract_networks;
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Symmetric Difference ("diff")
-------------------------------------------------------------------------------------------------*/

/// Changes between two network sets, evaluated on aggregated address
/// coverage rather than literal entries: one /23 in the old set equals two
/// /24s in the new set covering the same range, and reports no change.
#[derive(Debug, Default)]
pub struct DiffReport {
    /// Coverage present in the new set but not the old.
    pub added: Vec<IpNetwork>,
    /// Coverage present in the old set but not the new.
    pub removed: Vec<IpNetwork>,
    /// Coverage present in both.
    pub unchanged: Vec<IpNetwork>,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

fn union_closure(networks: Vec<IpNetwork>) -> Vec<IpNetwork> {
    aggregate(normalize(networks, NormalizeMode::RemoveNested))
}

/// Compare two sets after independently aggregating each.
///
/// `added = new* - old*`, `removed = old* - new*`, and
/// `unchanged = old* - removed` (the coverage common to both). Each section
/// is re-aggregated for presentation, so
/// `diff(a, b).added == diff(b, a).removed` holds for all inputs.
pub fn diff(new_set: Vec<IpNetwork>, old_set: Vec<IpNetwork>) -> Result<DiffReport> {
    let new_closure = union_closure(new_set);
    let old_closure = union_closure(old_set);

    let added = subtract_networks(new_closure.clone(), old_closure.clone())?;
    let removed = subtract_networks(old_closure.clone(), new_closure)?;
    let unchanged = subtract_networks(old_closure, removed.clone())?;

    Ok(DiffReport {
        added: union_closure(added),
        removed: union_closure(removed),
        unchanged: union_closure(unchanged),
    })
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::parse_prefix;

    fn nets(texts: &[&str]) -> Vec<IpNetwork> {
        texts.iter().map(|t| parse_prefix(t).unwrap()).collect()
    }

    fn strings(networks: &[IpNetwork]) -> Vec<String> {
        networks.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_basic_diff() {
        let report = diff(
            nets(&["10.0.0.0/8", "2.2.2.2/32"]),
            nets(&["10.0.0.0/8", "1.1.1.1/32"]),
        )
        .unwrap();

        assert_eq!(strings(&report.added), vec!["2.2.2.2/32"]);
        assert_eq!(strings(&report.removed), vec!["1.1.1.1/32"]);
        assert_eq!(strings(&report.unchanged), vec!["10.0.0.0/8"]);
    }

    #[test]
    fn test_semantic_equality_of_shapes() {
        // Two /24s equal the /23 covering the same range.
        let report = diff(
            nets(&["192.168.0.0/24", "192.168.1.0/24"]),
            nets(&["192.168.0.0/23"]),
        )
        .unwrap();

        assert!(!report.has_changes());
        assert_eq!(strings(&report.unchanged), vec!["192.168.0.0/23"]);
    }

    #[test]
    fn test_partial_shrink() {
        let report = diff(nets(&["10.0.0.0/9"]), nets(&["10.0.0.0/8"])).unwrap();

        assert!(report.added.is_empty());
        assert_eq!(strings(&report.removed), vec!["10.128.0.0/9"]);
        assert_eq!(strings(&report.unchanged), vec!["10.0.0.0/9"]);
    }

    #[test]
    fn test_diff_symmetry() {
        let set_a = nets(&["10.0.0.0/24", "192.168.0.0/16", "2001:db8::/32"]);
        let set_b = nets(&["10.0.0.0/23", "172.16.0.0/12"]);

        let forward = diff(set_a.clone(), set_b.clone()).unwrap();
        let backward = diff(set_b, set_a).unwrap();

        assert_eq!(strings(&forward.added), strings(&backward.removed));
        assert_eq!(strings(&forward.removed), strings(&backward.added));
        assert_eq!(strings(&forward.unchanged), strings(&backward.unchanged));
    }

    #[test]
    fn test_identical_sets() {
        let report = diff(nets(&["10.0.0.0/8"]), nets(&["10.0.0.0/8"])).unwrap();
        assert!(!report.has_changes());
    }
}
