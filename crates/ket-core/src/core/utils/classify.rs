use crate::core::models::molecule::Molecule;
use crate::core::models::sgroup::{SGroup, SGroupKind};
use crate::core::tables::CIP_SGROUP_NAME;
use std::collections::BTreeSet;

/// True for data S-groups that only carry a CIP descriptor annotation.
///
/// Such groups are written as atom stereo labels instead of regular S-groups.
pub fn is_stereo_descriptor_group(group: &SGroup) -> bool {
    matches!(&group.kind, SGroupKind::Data(data) if data.name == CIP_SGROUP_NAME)
}

/// Member atom sets of every S-group in declaration order, followed by the
/// component partitions of a query molecule.
///
/// Sets are independent: an atom may appear in several of them.
pub fn collect_group_member_sets(molecule: &Molecule) -> Vec<BTreeSet<usize>> {
    let mut sets: Vec<BTreeSet<usize>> = molecule
        .sgroups
        .iter()
        .map(|sg| sg.atoms.iter().copied().collect())
        .collect();
    if let Some(query) = &molecule.query {
        sets.extend(query.component_neighbors());
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::sgroup::DataSGroup;
    use nalgebra::Point3;

    #[test]
    fn cip_data_group_is_detected() {
        assert!(is_stereo_descriptor_group(&SGroup::cip_descriptor(0, "R")));
    }

    #[test]
    fn other_groups_are_not_descriptor_groups() {
        assert!(!is_stereo_descriptor_group(&SGroup::data("MW", "12", vec![0])));
        assert!(!is_stereo_descriptor_group(&SGroup::new(SGroupKind::Generic, vec![0])));
        let lowercase = SGroup::new(
            SGroupKind::Data(DataSGroup {
                name: "indigo_cip_desc".into(),
                ..Default::default()
            }),
            vec![0],
        );
        assert!(!is_stereo_descriptor_group(&lowercase));
    }

    #[test]
    fn member_sets_follow_group_order_and_may_overlap() {
        let mut mol = Molecule::new();
        for _ in 0..4 {
            mol.add_atom(Atom::new("C", Point3::origin()));
        }
        mol.sgroups.push(SGroup::new(SGroupKind::Generic, vec![2, 1, 2]));
        mol.sgroups.push(SGroup::new(SGroupKind::Generic, vec![1, 3]));
        let sets = collect_group_member_sets(&mol);
        assert_eq!(sets, vec![BTreeSet::from([1, 2]), BTreeSet::from([1, 3])]);
    }

    #[test]
    fn query_molecules_append_component_partitions() {
        let mut mol = Molecule::new_query();
        for _ in 0..3 {
            mol.add_atom(Atom::new("C", Point3::origin()));
        }
        mol.sgroups.push(SGroup::new(SGroupKind::Generic, vec![0]));
        mol.query.as_mut().unwrap().components = vec![0, 1, 1];
        let sets = collect_group_member_sets(&mol);
        assert_eq!(sets, vec![BTreeSet::from([0]), BTreeSet::from([1, 2])]);
    }
}
