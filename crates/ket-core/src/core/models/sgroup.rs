use crate::core::tables::CIP_SGROUP_NAME;
use nalgebra::Point2;
use std::str::FromStr;

/// Head-to-tail, head-to-head or either-unknown connectivity of a repeating unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    #[default]
    HeadToTail,
    HeadToHead,
    EitherUnknown,
}

impl Connectivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeadToTail => "HT",
            Self::HeadToHead => "HH",
            Self::EitherUnknown => "EU",
        }
    }
}

impl FromStr for Connectivity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HT" => Ok(Self::HeadToTail),
            "HH" => Ok(Self::HeadToHead),
            "EU" => Ok(Self::EitherUnknown),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSGroup {
    pub name: String,
    pub data: String,
    /// Whether `position` is absolute or relative to the group atoms.
    pub absolute: bool,
    /// Whether the data label is drawn attached to the atoms.
    pub attached: bool,
    pub position: Option<Point2<f64>>,
}

/// Attachment point of a superatom: the atom inside the group, the optional
/// leaving atom outside it and the point's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperatomAttachment {
    pub atom: usize,
    pub leaving_atom: Option<usize>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SGroupKind {
    Data(DataSGroup),
    Superatom {
        label: String,
        expanded: bool,
        attachment_points: Vec<SuperatomAttachment>,
    },
    RepeatingUnit {
        subscript: String,
        connectivity: Connectivity,
    },
    Multiple {
        multiplier: u32,
        parent_atoms: Vec<usize>,
    },
    Generic,
}

impl SGroupKind {
    /// Three-letter type code used in the serialized `type` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Data(_) => "DAT",
            Self::Superatom { .. } => "SUP",
            Self::RepeatingUnit { .. } => "SRU",
            Self::Multiple { .. } => "MUL",
            Self::Generic => "GEN",
        }
    }
}

/// A typed subset of a molecule's atoms.
///
/// Member atoms keep their declaration order so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SGroup {
    pub atoms: Vec<usize>,
    pub kind: SGroupKind,
}

impl SGroup {
    pub fn new(kind: SGroupKind, atoms: Vec<usize>) -> Self {
        Self { atoms, kind }
    }

    pub fn data(name: &str, data: &str, atoms: Vec<usize>) -> Self {
        Self::new(
            SGroupKind::Data(DataSGroup {
                name: name.to_string(),
                data: data.to_string(),
                ..Default::default()
            }),
            atoms,
        )
    }

    /// A data group carrying the CIP descriptor of `atom`, e.g. `"(R)"`.
    pub fn cip_descriptor(atom: usize, token: &str) -> Self {
        Self::data(CIP_SGROUP_NAME, &format!("({})", token), vec![atom])
    }

    /// Every atom index this group refers to, members first.
    pub fn referenced_atoms(&self) -> impl Iterator<Item = usize> + '_ {
        let extra: Vec<usize> = match &self.kind {
            SGroupKind::Superatom {
                attachment_points, ..
            } => attachment_points
                .iter()
                .flat_map(|ap| std::iter::once(ap.atom).chain(ap.leaving_atom))
                .collect(),
            SGroupKind::Multiple { parent_atoms, .. } => parent_atoms.clone(),
            _ => Vec::new(),
        };
        self.atoms.iter().copied().chain(extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_are_three_letter_tags() {
        assert_eq!(SGroupKind::Data(DataSGroup::default()).code(), "DAT");
        assert_eq!(SGroupKind::Generic.code(), "GEN");
        assert_eq!(
            SGroupKind::Multiple {
                multiplier: 2,
                parent_atoms: vec![]
            }
            .code(),
            "MUL"
        );
    }

    #[test]
    fn cip_descriptor_group_wraps_token_in_parentheses() {
        let group = SGroup::cip_descriptor(4, "S");
        match &group.kind {
            SGroupKind::Data(data) => {
                assert_eq!(data.name, CIP_SGROUP_NAME);
                assert_eq!(data.data, "(S)");
            }
            _ => panic!("expected a data group"),
        }
        assert_eq!(group.atoms, vec![4]);
    }

    #[test]
    fn referenced_atoms_include_attachment_and_parent_atoms() {
        let sup = SGroup::new(
            SGroupKind::Superatom {
                label: "Boc".into(),
                expanded: false,
                attachment_points: vec![SuperatomAttachment {
                    atom: 1,
                    leaving_atom: Some(9),
                    id: "1".into(),
                }],
            },
            vec![1, 2, 3],
        );
        assert_eq!(sup.referenced_atoms().collect::<Vec<_>>(), vec![1, 2, 3, 1, 9]);

        let mul = SGroup::new(
            SGroupKind::Multiple {
                multiplier: 2,
                parent_atoms: vec![0],
            },
            vec![0, 1],
        );
        assert_eq!(mul.referenced_atoms().collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn connectivity_round_trips_through_code() {
        for c in [
            Connectivity::HeadToTail,
            Connectivity::HeadToHead,
            Connectivity::EitherUnknown,
        ] {
            assert_eq!(c.as_str().parse::<Connectivity>(), Ok(c));
        }
        assert!("XX".parse::<Connectivity>().is_err());
    }
}
