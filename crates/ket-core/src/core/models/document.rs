use super::molecule::Molecule;
use super::reaction::Reaction;

/// One top-level structure of a KET document.
#[derive(Debug, Clone, PartialEq)]
pub enum KetNode {
    Molecule(Molecule),
    Reaction(Reaction),
}

/// Everything one KET document holds, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KetDocument {
    pub nodes: Vec<KetNode>,
}

impl KetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push_molecule(&mut self, molecule: Molecule) {
        self.nodes.push(KetNode::Molecule(molecule));
    }

    pub fn push_reaction(&mut self, reaction: Reaction) {
        self.nodes.push(KetNode::Reaction(reaction));
    }
}

impl From<Molecule> for KetDocument {
    fn from(molecule: Molecule) -> Self {
        Self {
            nodes: vec![KetNode::Molecule(molecule)],
        }
    }
}

impl From<Reaction> for KetDocument {
    fn from(reaction: Reaction) -> Self {
        Self {
            nodes: vec![KetNode::Reaction(reaction)],
        }
    }
}
