//! Reaction layout bookkeeping.
//!
//! Before a reaction is written, each of its molecules is split into connected
//! fragments, and every fragment, plus sign and arrow becomes a
//! [`ReactionComponent`]. Molecule components are then sorted into reaction
//! areas relative to the nearest arrow and grouped into [`MolSumm`] summary
//! blocks, one per (arrow, area) pair. The whole structure lives for one save
//! pass only.

use crate::core::models::ids::SummaryId;
use crate::core::models::meta::{ArrowKind, MetaObject};
use crate::core::models::molecule::Molecule;
use crate::core::models::reaction::{Reaction, ReactionRole};
use crate::core::utils::classify::collect_group_member_sets;
use crate::core::utils::geometry::{
    MIN_MOL_SIZE, PRODUCT_AREA, REACTANT_AREA, Rect2, distance_to_segment, point_side,
    side_of_line,
};
use nalgebra::Point2;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Area of a reaction diagram a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionArea {
    Reactant,
    ReagentAbove,
    ReagentBelow,
    Product,
}

impl ReactionArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reactant => "reactant",
            Self::ReagentAbove => "reagent-above",
            Self::ReagentBelow => "reagent-below",
            Self::Product => "product",
        }
    }

    pub fn role(self) -> ReactionRole {
        match self {
            Self::Reactant => ReactionRole::Reactant,
            Self::ReagentAbove | Self::ReagentBelow => ReactionRole::Reagent,
            Self::Product => ReactionRole::Product,
        }
    }

    /// Area implied by a declared role when the diagram has no arrow.
    pub fn from_role(role: ReactionRole) -> Option<Self> {
        match role {
            ReactionRole::Reactant => Some(Self::Reactant),
            ReactionRole::Reagent => Some(Self::ReagentAbove),
            ReactionRole::Product => Some(Self::Product),
            ReactionRole::Undefined => None,
        }
    }

    /// Classifies a point against an arrow.
    pub fn classify(point: &Point2<f64>, begin: &Point2<f64>, end: &Point2<f64>) -> Self {
        match point_side(point, begin, end) {
            REACTANT_AREA => Self::Reactant,
            PRODUCT_AREA => Self::Product,
            _ if side_of_line(point, begin, end) >= 0.0 => Self::ReagentAbove,
            _ => Self::ReagentBelow,
        }
    }
}

impl fmt::Display for ReactionArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reactant" => Ok(Self::Reactant),
            "reagent-above" => Ok(Self::ReagentAbove),
            "reagent-below" => Ok(Self::ReagentBelow),
            "product" => Ok(Self::Product),
            _ => Err(format!("unknown reaction area '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Molecule,
    Plus,
    Arrow(ArrowKind),
}

/// Link from a component to the summary bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLink {
    /// Not part of any area, or an arrow nothing was placed against.
    NotConnected,
    /// An arrow that at least one area was placed against.
    Connected,
    /// A molecule component placed in this summary block.
    Summary(SummaryId),
}

/// Summary block of one reaction area relative to one arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct MolSumm {
    pub bbox: Rect2,
    /// Component indexes of the member molecules.
    pub indexes: Vec<usize>,
    pub area: ReactionArea,
    /// Component indexes of the arrows pointing out of this block.
    pub arrows_to: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionComponent {
    pub kind: ComponentKind,
    pub bbox: Rect2,
    /// Index of the source molecule for molecule components, of the source
    /// meta-object for plus signs and arrows.
    pub index: usize,
    /// The fragment, renumbered from zero. Only set for molecule components.
    pub molecule: Option<Molecule>,
    /// Arrow begin and end, or the plus position.
    pub coordinates: Vec<Point2<f64>>,
    pub summary: SummaryLink,
}

/// Components and summary blocks of one reaction.
#[derive(Debug, Clone, Default)]
pub struct ReactionLayout {
    pub components: Vec<ReactionComponent>,
    summaries: SlotMap<SummaryId, MolSumm>,
    order: Vec<SummaryId>,
}

impl ReactionLayout {
    pub fn build(reaction: &Reaction) -> Self {
        let mut layout = Self::default();

        for (mol_index, entry) in reaction.molecules.iter().enumerate() {
            let molecule = &entry.molecule;
            for fragment in split_fragments(molecule) {
                let Some(bbox) = molecule.bounding_box(&fragment) else {
                    continue;
                };
                layout.components.push(ReactionComponent {
                    kind: ComponentKind::Molecule,
                    bbox: bbox.with_min_size(MIN_MOL_SIZE),
                    index: mol_index,
                    molecule: Some(molecule.extract(&fragment)),
                    coordinates: Vec::new(),
                    summary: SummaryLink::NotConnected,
                });
            }
        }

        for (meta_index, meta) in reaction.meta_objects.iter().enumerate() {
            let (kind, coordinates) = match meta {
                MetaObject::Plus(plus) => (ComponentKind::Plus, vec![plus.position]),
                MetaObject::Arrow(arrow) => {
                    (ComponentKind::Arrow(arrow.kind), vec![arrow.begin, arrow.end])
                }
                _ => continue,
            };
            let Some(bbox) = Rect2::from_points(coordinates.iter().copied()) else {
                continue;
            };
            layout.components.push(ReactionComponent {
                kind,
                bbox: bbox.with_min_size(MIN_MOL_SIZE),
                index: meta_index,
                molecule: None,
                coordinates,
                summary: SummaryLink::NotConnected,
            });
        }

        layout.assign_areas(reaction);
        debug!(
            components = layout.components.len(),
            summaries = layout.order.len(),
            "Reaction layout built."
        );
        layout
    }

    /// Summary blocks in creation order.
    pub fn summaries(&self) -> impl Iterator<Item = (SummaryId, &MolSumm)> {
        self.order
            .iter()
            .filter_map(|&id| self.summaries.get(id).map(|s| (id, s)))
    }

    pub fn summary(&self, id: SummaryId) -> Option<&MolSumm> {
        self.summaries.get(id)
    }

    /// Position of a summary block in creation order.
    pub fn summary_position(&self, id: SummaryId) -> Option<usize> {
        self.order.iter().position(|&s| s == id)
    }

    fn assign_areas(&mut self, reaction: &Reaction) {
        let arrows: Vec<(usize, Point2<f64>, Point2<f64>)> = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c.kind, ComponentKind::Arrow(_)))
            .filter_map(|(i, c)| match c.coordinates.as_slice() {
                [begin, end] => Some((i, *begin, *end)),
                _ => None,
            })
            .collect();

        let mut blocks: HashMap<(Option<usize>, ReactionArea), SummaryId> = HashMap::new();

        for index in 0..self.components.len() {
            let component = &self.components[index];
            if component.kind != ComponentKind::Molecule {
                continue;
            }
            let center = component.bbox.center();
            let placement = nearest_arrow(&arrows, &center)
                .map(|(arrow, begin, end)| {
                    (Some(arrow), ReactionArea::classify(&center, &begin, &end))
                })
                .or_else(|| {
                    let role = reaction
                        .molecules
                        .get(component.index)
                        .map(|m| m.role)
                        .unwrap_or_default();
                    ReactionArea::from_role(role).map(|area| (None, area))
                });
            let Some((arrow, area)) = placement else {
                trace!(component = index, "Component left outside every area.");
                continue;
            };

            let bbox = component.bbox;
            let id = *blocks.entry((arrow, area)).or_insert_with(|| {
                let id = self.summaries.insert(MolSumm {
                    bbox,
                    indexes: Vec::new(),
                    area,
                    arrows_to: Vec::new(),
                });
                self.order.push(id);
                id
            });
            if let Some(summary) = self.summaries.get_mut(id) {
                summary.bbox = summary.bbox.union(&bbox);
                summary.indexes.push(index);
                if let Some(arrow) = arrow {
                    if area != ReactionArea::Product && !summary.arrows_to.contains(&arrow) {
                        summary.arrows_to.push(arrow);
                    }
                }
            }
            self.components[index].summary = SummaryLink::Summary(id);
            if let Some(arrow) = arrow {
                self.components[arrow].summary = SummaryLink::Connected;
            }
        }
    }
}

fn nearest_arrow(
    arrows: &[(usize, Point2<f64>, Point2<f64>)],
    point: &Point2<f64>,
) -> Option<(usize, Point2<f64>, Point2<f64>)> {
    arrows
        .iter()
        .map(|&(i, b, e)| (distance_to_segment(point, &b, &e), (i, b, e)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, arrow)| arrow)
}

/// Splits a molecule into fragments: atoms connected by bonds, merged with
/// every S-group and query component that spans them.
///
/// Fragments are returned in ascending order of their smallest atom index, each
/// with its atoms in ascending order. Group indices outside the molecule are
/// ignored here; the saver reports them.
pub fn split_fragments(molecule: &Molecule) -> Vec<Vec<usize>> {
    let n = molecule.atom_count();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    fn union(parent: &mut [usize], a: usize, b: usize) {
        let (ra, rb) = (find(parent, a), find(parent, b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            parent[high] = low;
        }
    }

    for bond in molecule.bonds() {
        union(&mut parent, bond.begin, bond.end);
    }
    for set in collect_group_member_sets(molecule) {
        let mut members = set.into_iter().filter(|&a| a < n);
        if let Some(first) = members.next() {
            for atom in members {
                union(&mut parent, first, atom);
            }
        }
    }

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut fragments: Vec<Vec<usize>> = Vec::new();
    for atom in 0..n {
        let root = find(&mut parent, atom);
        let slot = *slots.entry(root).or_insert_with(|| {
            fragments.push(Vec::new());
            fragments.len() - 1
        });
        fragments[slot].push(atom);
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::sgroup::{SGroup, SGroupKind};
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn chain_at(x: f64, y: f64, n: usize) -> Molecule {
        let mut mol = Molecule::new();
        for i in 0..n {
            mol.add_atom(Atom::new("C", Point3::new(x + i as f64, y, 0.0)));
        }
        for i in 1..n {
            mol.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn fragments_follow_bonds() {
        let mut mol = chain_at(0.0, 0.0, 2);
        let c = mol.add_atom(Atom::new("O", Point3::new(5.0, 0.0, 0.0)));
        let d = mol.add_atom(Atom::new("N", Point3::new(6.0, 0.0, 0.0)));
        mol.add_bond(c, d, BondOrder::Double).unwrap();
        assert_eq!(split_fragments(&mol), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn groups_merge_fragments_and_ignore_missing_atoms() {
        let mut mol = chain_at(0.0, 0.0, 2);
        mol.add_atom(Atom::new("Na", Point3::new(4.0, 0.0, 0.0)));
        mol.add_atom(Atom::new("Cl", Point3::new(6.0, 0.0, 0.0)));
        mol.sgroups
            .push(SGroup::new(SGroupKind::Generic, vec![3, 1, 999]));
        assert_eq!(split_fragments(&mol), vec![vec![0, 1, 3], vec![2]]);
    }

    #[test]
    fn query_components_merge_fragments() {
        let mut mol = Molecule::new_query();
        for i in 0..3 {
            mol.add_atom(Atom::new("C", Point3::new(i as f64 * 3.0, 0.0, 0.0)));
        }
        mol.query.as_mut().unwrap().components = vec![1, 0, 1];
        assert_eq!(split_fragments(&mol), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn classify_maps_masks_to_areas() {
        let begin = Point2::new(0.0, 0.0);
        let end = Point2::new(4.0, 0.0);
        let area = |x, y| ReactionArea::classify(&Point2::new(x, y), &begin, &end);
        assert_eq!(area(-3.0, 0.0), ReactionArea::Reactant);
        assert_eq!(area(8.0, 0.0), ReactionArea::Product);
        assert_eq!(area(2.0, 1.0), ReactionArea::ReagentAbove);
        assert_eq!(area(2.0, -1.0), ReactionArea::ReagentBelow);
    }

    #[test]
    fn layout_places_components_around_the_arrow() {
        let mut rxn = Reaction::new();
        rxn.add_reactant(chain_at(-6.0, 0.0, 2));
        rxn.add_reactant(chain_at(-3.0, 0.0, 1));
        rxn.add_product(chain_at(8.0, 0.0, 3));
        rxn.add_reagent(chain_at(1.5, 1.5, 2));
        rxn.meta_objects.push(MetaObject::plus(Point2::new(-4.0, 0.0)));
        rxn.meta_objects.push(MetaObject::arrow(
            ArrowKind::FilledTriangle,
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
        ));

        let layout = ReactionLayout::build(&rxn);
        assert_eq!(layout.components.len(), 6);
        let arrow_index = 5;
        assert_eq!(
            layout.components[arrow_index].kind,
            ComponentKind::Arrow(ArrowKind::FilledTriangle)
        );
        assert_eq!(layout.components[arrow_index].summary, SummaryLink::Connected);
        assert_eq!(layout.components[4].summary, SummaryLink::NotConnected);

        let summaries: Vec<&MolSumm> = layout.summaries().map(|(_, s)| s).collect();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].area, ReactionArea::Reactant);
        assert_eq!(summaries[0].indexes, vec![0, 1]);
        assert_eq!(summaries[0].arrows_to, vec![arrow_index]);
        assert_eq!(summaries[1].area, ReactionArea::Product);
        assert!(summaries[1].arrows_to.is_empty());
        assert_eq!(summaries[2].area, ReactionArea::ReagentAbove);
        assert_eq!(summaries[2].arrows_to, vec![arrow_index]);

        let reactant_box = summaries[0].bbox;
        assert_eq!(reactant_box.min.x, -6.0);
        assert_eq!(reactant_box.max.x, -2.75);
    }

    #[test]
    fn summary_links_resolve_through_the_arena() {
        let mut rxn = Reaction::new();
        rxn.add_reactant(chain_at(-5.0, 0.0, 2));
        rxn.meta_objects.push(MetaObject::arrow(
            ArrowKind::OpenAngle,
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
        ));
        let layout = ReactionLayout::build(&rxn);
        let SummaryLink::Summary(id) = layout.components[0].summary else {
            panic!("reactant was not linked");
        };
        assert_eq!(layout.summary_position(id), Some(0));
        assert_eq!(layout.summary(id).unwrap().area, ReactionArea::Reactant);
    }

    #[test]
    fn without_arrows_declared_roles_decide() {
        let mut rxn = Reaction::new();
        rxn.add_product(chain_at(0.0, 0.0, 1));
        rxn.add_molecule(ReactionRole::Undefined, chain_at(3.0, 0.0, 1));
        rxn.add_reactant(chain_at(6.0, 0.0, 1));
        let layout = ReactionLayout::build(&rxn);
        let areas: Vec<ReactionArea> = layout.summaries().map(|(_, s)| s.area).collect();
        assert_eq!(areas, vec![ReactionArea::Product, ReactionArea::Reactant]);
        assert_eq!(layout.components[1].summary, SummaryLink::NotConnected);
        assert!(layout.summaries().all(|(_, s)| s.arrows_to.is_empty()));
    }

    #[test]
    fn multi_fragment_molecule_yields_one_component_per_fragment() {
        let mut mol = chain_at(-6.0, 0.0, 2);
        mol.add_atom(Atom::new("O", Point3::new(-2.0, 0.0, 0.0)));
        let mut rxn = Reaction::new();
        rxn.add_reactant(mol);
        let layout = ReactionLayout::build(&rxn);
        assert_eq!(layout.components.len(), 2);
        assert!(layout.components.iter().all(|c| c.index == 0));
        let second = layout.components[1].molecule.as_ref().unwrap();
        assert_eq!(second.atom_count(), 1);
        assert_eq!(second.atoms()[0].label, "O");
        let bbox = layout.components[1].bbox;
        assert_eq!((bbox.width(), bbox.height()), MIN_MOL_SIZE);
    }

    #[test]
    fn area_names_round_trip() {
        for area in [
            ReactionArea::Reactant,
            ReactionArea::ReagentAbove,
            ReactionArea::ReagentBelow,
            ReactionArea::Product,
        ] {
            assert_eq!(area.as_str().parse::<ReactionArea>(), Ok(area));
        }
        assert!("catalyst".parse::<ReactionArea>().is_err());
    }
}
