use super::meta::{MetaObject, ReactionArrow, ReactionPlus};
use super::molecule::Molecule;

/// Declared role of a molecule inside a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReactionRole {
    Reactant,
    Product,
    Reagent,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionMolecule {
    pub role: ReactionRole,
    pub molecule: Molecule,
}

/// A reaction diagram: role-tagged molecules plus the arrows, plus signs and
/// other annotations drawn around them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reaction {
    pub molecules: Vec<ReactionMolecule>,
    pub meta_objects: Vec<MetaObject>,
}

impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_molecule(&mut self, role: ReactionRole, molecule: Molecule) -> usize {
        self.molecules.push(ReactionMolecule { role, molecule });
        self.molecules.len() - 1
    }

    pub fn add_reactant(&mut self, molecule: Molecule) -> usize {
        self.add_molecule(ReactionRole::Reactant, molecule)
    }

    pub fn add_product(&mut self, molecule: Molecule) -> usize {
        self.add_molecule(ReactionRole::Product, molecule)
    }

    pub fn add_reagent(&mut self, molecule: Molecule) -> usize {
        self.add_molecule(ReactionRole::Reagent, molecule)
    }

    pub fn molecules_with_role(&self, role: ReactionRole) -> impl Iterator<Item = &Molecule> {
        self.molecules
            .iter()
            .filter(move |m| m.role == role)
            .map(|m| &m.molecule)
    }

    pub fn arrows(&self) -> impl Iterator<Item = &ReactionArrow> {
        self.meta_objects.iter().filter_map(|m| match m {
            MetaObject::Arrow(arrow) => Some(arrow),
            _ => None,
        })
    }

    pub fn pluses(&self) -> impl Iterator<Item = &ReactionPlus> {
        self.meta_objects.iter().filter_map(|m| match m {
            MetaObject::Plus(plus) => Some(plus),
            _ => None,
        })
    }
}
