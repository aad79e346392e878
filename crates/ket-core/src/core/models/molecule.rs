use super::atom::{Atom, AtomKind};
use super::ids::TemplateId;
use super::meta::MetaObject;
use super::sgroup::{SGroup, SGroupKind};
use super::stereo::StereoCenter;
use super::template::TemplatePool;
use super::topology::{Bond, BondOrder, BondProps};
use crate::core::utils::geometry::Rect2;
use nalgebra::Point2;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A set of atom and bond indices, used for highlights and the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSelection {
    pub atoms: BTreeSet<usize>,
    pub bonds: BTreeSet<usize>,
}

impl IndexSelection {
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.bonds.is_empty()
    }
}

/// Query-molecule data that is not attached to a single atom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryData {
    /// Component-level grouping number of every atom; 0 means ungrouped.
    pub components: Vec<u32>,
}

impl QueryData {
    /// Groups atoms sharing the same non-zero component number, in ascending
    /// component order.
    pub fn component_neighbors(&self) -> Vec<BTreeSet<usize>> {
        let mut groups: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();
        for (atom, &component) in self.components.iter().enumerate() {
            if component > 0 {
                groups.entry(component).or_default().insert(atom);
            }
        }
        groups.into_values().collect()
    }
}

/// A molecule (or query molecule) graph with everything the KET format carries
/// alongside it.
///
/// Atoms and bonds are addressed by their position; indices are stable for as
/// long as the molecule is not rebuilt. Bonds can only be added between existing
/// atoms, while S-groups, stereocenters and selections are free-form and are
/// validated when the molecule is serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Cached adjacency: `(neighbour atom, bond index)` per atom, in bond order.
    adjacency: Vec<Vec<(usize, usize)>>,
    pub stereocenters: Vec<StereoCenter>,
    pub sgroups: Vec<SGroup>,
    pub templates: TemplatePool,
    pub meta_objects: Vec<MetaObject>,
    pub highlight: IndexSelection,
    pub selection: IndexSelection,
    /// Present for query molecules.
    pub query: Option<QueryData>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty query molecule.
    pub fn new_query() -> Self {
        Self {
            query: Some(QueryData::default()),
            ..Self::default()
        }
    }

    pub fn is_query(&self) -> bool {
        self.query.is_some()
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        if let Some(query) = &mut self.query {
            query.components.resize(self.atoms.len(), 0);
        }
        self.atoms.len() - 1
    }

    /// Adds a plain bond between two existing atoms.
    ///
    /// # Return
    ///
    /// The index of the new bond, or of the existing bond if the two atoms were
    /// already bonded. `None` if either atom does not exist or both ends are the
    /// same atom.
    pub fn add_bond(&mut self, begin: usize, end: usize, order: BondOrder) -> Option<usize> {
        self.push_bond(Bond::new(begin, end, order))
    }

    /// Adds a fully specified bond; same rules as [`Molecule::add_bond`].
    pub fn push_bond(&mut self, bond: Bond) -> Option<usize> {
        if bond.begin >= self.atoms.len() || bond.end >= self.atoms.len() || bond.begin == bond.end
        {
            return None;
        }
        if let Some(existing) = self.find_bond(bond.begin, bond.end) {
            return Some(existing);
        }
        let index = self.bonds.len();
        self.bonds.push(bond);
        self.adjacency[bond.begin].push((bond.end, index));
        self.adjacency[bond.end].push((bond.begin, index));
        Some(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    /// Order, stereo marker and CIP descriptor of a bond. Endpoints stay as
    /// they were validated by [`Molecule::push_bond`].
    pub fn bond_mut(&mut self, index: usize) -> Option<BondProps<'_>> {
        let Bond {
            order, stereo, cip, ..
        } = self.bonds.get_mut(index)?;
        Some(BondProps { order, stereo, cip })
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Neighbours of an atom in the order their bonds were added.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(atom)
            .into_iter()
            .flatten()
            .map(|&(neighbor, _)| neighbor)
    }

    pub fn find_bond(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|&&(neighbor, _)| neighbor == b)
            .map(|&(_, bond)| bond)
    }

    pub fn stereocenter(&self, atom: usize) -> Option<&StereoCenter> {
        self.stereocenters.iter().find(|sc| sc.atom == atom)
    }

    /// 2D bounding box of the given atoms; indices outside the molecule are ignored.
    pub fn bounding_box(&self, atoms: &[usize]) -> Option<Rect2> {
        Rect2::from_points(
            atoms
                .iter()
                .filter_map(|&i| self.atoms.get(i))
                .map(|a| Point2::new(a.position.x, a.position.y)),
        )
    }

    /// Builds the sub-molecule spanned by `atoms`, renumbering atoms in the
    /// given order.
    ///
    /// Bonds, stereocenters, S-groups and selections are kept when everything
    /// they refer to lies inside the fragment. Only the templates used by the
    /// fragment's atoms are copied, renumbered in order of first use;
    /// meta-objects are not carried over.
    pub fn extract(&self, atoms: &[usize]) -> Molecule {
        let mut sub = Molecule {
            query: self.query.as_ref().map(|_| QueryData::default()),
            ..Molecule::default()
        };
        let template_map = self.copy_templates(atoms, &mut sub.templates);

        let mut atom_map: HashMap<usize, usize> = HashMap::new();
        for &old in atoms {
            if atom_map.contains_key(&old) {
                continue;
            }
            if let Some(atom) = self.atoms.get(old) {
                let new = sub.add_atom(atom.clone());
                atom_map.insert(old, new);
            }
        }

        let remap_template = |id: &mut TemplateId| {
            if let Some(&new) = template_map.get(&*id) {
                *id = new;
            }
        };
        for atom in &mut sub.atoms {
            match &mut atom.kind {
                AtomKind::Element => {}
                AtomKind::RSite {
                    rgroups,
                    attachment_order,
                } => {
                    rgroups.iter_mut().for_each(remap_template);
                    attachment_order.retain_mut(|entry| match atom_map.get(&entry.atom) {
                        Some(&new) => {
                            entry.atom = new;
                            true
                        }
                        None => false,
                    });
                }
                AtomKind::Template { template } => remap_template(template),
            }
        }

        if let (Some(query), Some(sub_query)) = (&self.query, &mut sub.query) {
            for (&old, &new) in &atom_map {
                sub_query.components[new] = query.components.get(old).copied().unwrap_or(0);
            }
        }

        let mut bond_map: HashMap<usize, usize> = HashMap::new();
        for (old, bond) in self.bonds.iter().enumerate() {
            if let (Some(&begin), Some(&end)) = (atom_map.get(&bond.begin), atom_map.get(&bond.end))
            {
                let remapped = Bond { begin, end, ..*bond };
                if let Some(new) = sub.push_bond(remapped) {
                    bond_map.insert(old, new);
                }
            }
        }

        sub.stereocenters = self
            .stereocenters
            .iter()
            .filter_map(|sc| {
                atom_map.get(&sc.atom).map(|&atom| StereoCenter { atom, ..*sc })
            })
            .collect();

        sub.sgroups = self
            .sgroups
            .iter()
            .filter_map(|sg| remap_sgroup(sg, &atom_map))
            .collect();

        sub.highlight = remap_selection(&self.highlight, &atom_map, &bond_map);
        sub.selection = remap_selection(&self.selection, &atom_map, &bond_map);
        sub
    }

    /// Copies the templates referenced by `atoms` into `pool` and returns the
    /// old-to-new id map. Ids with no template behind them are mapped past the
    /// end of `pool`, so they stay dangling in the copy.
    fn copy_templates(
        &self,
        atoms: &[usize],
        pool: &mut TemplatePool,
    ) -> HashMap<TemplateId, TemplateId> {
        let mut map = HashMap::new();
        let mut missing = Vec::new();
        let referenced = atoms
            .iter()
            .filter_map(|&i| self.atoms.get(i))
            .flat_map(|atom| atom.template_refs());
        for id in referenced {
            if map.contains_key(&id) || missing.contains(&id) {
                continue;
            }
            match self.templates.get(id) {
                Some(template) => {
                    map.insert(id, pool.add(template.clone()));
                }
                None => missing.push(id),
            }
        }
        for (offset, id) in missing.into_iter().enumerate() {
            map.insert(id, TemplateId(pool.len() + offset));
        }
        map
    }
}

fn remap_sgroup(sgroup: &SGroup, atom_map: &HashMap<usize, usize>) -> Option<SGroup> {
    let map = |i: &usize| atom_map.get(i).copied();
    let atoms = sgroup.atoms.iter().map(map).collect::<Option<Vec<_>>>()?;
    let kind = match &sgroup.kind {
        SGroupKind::Superatom {
            label,
            expanded,
            attachment_points,
        } => {
            let mut points = Vec::with_capacity(attachment_points.len());
            for ap in attachment_points {
                let mut ap = ap.clone();
                ap.atom = map(&ap.atom)?;
                ap.leaving_atom = match ap.leaving_atom {
                    Some(leaving) => Some(map(&leaving)?),
                    None => None,
                };
                points.push(ap);
            }
            SGroupKind::Superatom {
                label: label.clone(),
                expanded: *expanded,
                attachment_points: points,
            }
        }
        SGroupKind::Multiple {
            multiplier,
            parent_atoms,
        } => SGroupKind::Multiple {
            multiplier: *multiplier,
            parent_atoms: parent_atoms.iter().map(map).collect::<Option<Vec<_>>>()?,
        },
        other => other.clone(),
    };
    Some(SGroup { atoms, kind })
}

fn remap_selection(
    selection: &IndexSelection,
    atom_map: &HashMap<usize, usize>,
    bond_map: &HashMap<usize, usize>,
) -> IndexSelection {
    IndexSelection {
        atoms: selection
            .atoms
            .iter()
            .filter_map(|i| atom_map.get(i).copied())
            .collect(),
        bonds: selection
            .bonds
            .iter()
            .filter_map(|i| bond_map.get(i).copied())
            .collect(),
    }
}
