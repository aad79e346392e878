use super::ids::TemplateId;
use nalgebra::Point3;
use std::str::FromStr;

/// One entry of an R-site attachment order: the neighbour atom bonded through
/// attachment point `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentOrder {
    pub atom: usize,
    pub id: u8,
}

/// What an atom node stands for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AtomKind {
    /// A plain element or pseudo-atom given by its label.
    #[default]
    Element,
    /// An R-group placeholder referring to one or more R-group templates.
    RSite {
        rgroups: Vec<TemplateId>,
        attachment_order: Vec<AttachmentOrder>,
    },
    /// An instance of a T-group template (monomer, abbreviation).
    Template { template: TemplateId },
}

/// Aromaticity constraint of a query atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aromaticity {
    Aromatic,
    Aliphatic,
}

impl Aromaticity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aromatic => "aromatic",
            Self::Aliphatic => "aliphatic",
        }
    }
}

impl FromStr for Aromaticity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aromatic" => Ok(Self::Aromatic),
            "aliphatic" => Ok(Self::Aliphatic),
            _ => Err(()),
        }
    }
}

/// Query-specific constraints attached to an atom of a query molecule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryAtomProps {
    pub aromaticity: Option<Aromaticity>,
    /// Number of SSSR rings the atom must belong to.
    pub ring_membership: Option<u8>,
    /// Size of the smallest ring the atom must belong to.
    pub ring_size: Option<u8>,
    /// Total number of connections.
    pub connectivity: Option<u8>,
    /// A raw SMARTS expression, used when the other fields cannot express the query.
    pub custom_query: Option<String>,
}

impl QueryAtomProps {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An atom node of a molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol or pseudo-atom label (e.g. "C", "Cl", "Ph").
    pub label: String,
    pub kind: AtomKind,
    /// Formal charge.
    pub charge: i32,
    /// Mass number; 0 means natural abundance.
    pub isotope: u32,
    pub radical: u8,
    /// Diagram coordinates. The codec never computes layout, it only carries them.
    pub position: Point3<f64>,
    /// Stereo parity flag as found in connection-table formats.
    pub stereo_parity: u8,
    /// Attachment point bitmask for fragment atoms: 1 primary, 2 secondary.
    pub attachment_points: u8,
    pub query: Option<QueryAtomProps>,
}

impl Atom {
    /// Creates an element atom with default values for every other field.
    ///
    /// # Arguments
    ///
    /// * `label` - The element symbol or pseudo-atom label.
    /// * `position` - The diagram coordinates of the atom.
    pub fn new(label: &str, position: Point3<f64>) -> Self {
        Self {
            label: label.to_string(),
            kind: AtomKind::Element,
            charge: 0,
            isotope: 0,
            radical: 0,
            position,
            stereo_parity: 0,
            attachment_points: 0,
            query: None,
        }
    }

    /// Creates an R-site placeholder referring to the given R-group templates.
    pub fn rsite(rgroups: Vec<TemplateId>, position: Point3<f64>) -> Self {
        Self {
            kind: AtomKind::RSite {
                rgroups,
                attachment_order: Vec::new(),
            },
            ..Self::new("R#", position)
        }
    }

    /// Creates an atom standing for an instance of a T-group template.
    pub fn template(template: TemplateId, label: &str, position: Point3<f64>) -> Self {
        Self {
            kind: AtomKind::Template { template },
            ..Self::new(label, position)
        }
    }

    pub fn is_rsite(&self) -> bool {
        matches!(self.kind, AtomKind::RSite { .. })
    }

    /// Templates this atom refers to: the R-groups of an R-site or the template
    /// of a template instance.
    pub fn template_refs(&self) -> impl Iterator<Item = TemplateId> + '_ {
        let ids: &[TemplateId] = match &self.kind {
            AtomKind::Element => &[],
            AtomKind::RSite { rgroups, .. } => rgroups,
            AtomKind::Template { template } => std::slice::from_ref(template),
        };
        ids.iter().copied()
    }
}
