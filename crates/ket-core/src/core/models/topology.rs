//! Bonds and their KET numeric codes.

use super::stereo::CipDescriptor;

/// Bond type, numbered as in the KET `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
    SingleOrDouble = 5,
    SingleOrAromatic = 6,
    DoubleOrAromatic = 7,
    Any = 8,
    Coordination = 9,
    Hydrogen = 10,
}

impl BondOrder {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Aromatic),
            5 => Some(Self::SingleOrDouble),
            6 => Some(Self::SingleOrAromatic),
            7 => Some(Self::DoubleOrAromatic),
            8 => Some(Self::Any),
            9 => Some(Self::Coordination),
            10 => Some(Self::Hydrogen),
            _ => None,
        }
    }
}

/// Wedge / hash marker of a bond, numbered as in the KET `stereo` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondStereo {
    #[default]
    None = 0,
    Up = 1,
    CisTrans = 3,
    Either = 4,
    Down = 6,
}

impl BondStereo {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Up),
            3 => Some(Self::CisTrans),
            4 => Some(Self::Either),
            6 => Some(Self::Down),
            _ => None,
        }
    }
}

/// A bond between two atoms of the same molecule.
///
/// Endpoints are checked when the bond is added to a
/// [`Molecule`](super::molecule::Molecule) and cannot be changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
    pub stereo: BondStereo,
    /// E/Z descriptor of a double bond.
    pub cip: CipDescriptor,
}

impl Bond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self {
            begin,
            end,
            order,
            stereo: BondStereo::None,
            cip: CipDescriptor::None,
        }
    }
}

/// Editable properties of a bond already inside a molecule.
#[derive(Debug)]
pub struct BondProps<'a> {
    pub order: &'a mut BondOrder,
    pub stereo: &'a mut BondStereo,
    pub cip: &'a mut CipDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_type_codes_match_ket_numbering() {
        for code in 1..=10u8 {
            assert_eq!(BondOrder::from_code(code).unwrap().code(), code);
        }
        assert_eq!(BondOrder::from_code(4), Some(BondOrder::Aromatic));
        assert_eq!(BondOrder::Hydrogen.code(), 10);
        assert!(BondOrder::from_code(0).is_none());
        assert!(BondOrder::from_code(11).is_none());
    }

    #[test]
    fn bond_stereo_codes_skip_unused_values() {
        for code in [0u8, 1, 3, 4, 6] {
            assert_eq!(BondStereo::from_code(code).unwrap().code(), code);
        }
        assert!(BondStereo::from_code(2).is_none());
        assert!(BondStereo::from_code(5).is_none());
    }

    #[test]
    fn new_bond_has_no_stereo_marks() {
        let bond = Bond::new(3, 7, BondOrder::Double);
        assert_eq!((bond.begin, bond.end), (3, 7));
        assert_eq!(bond.stereo, BondStereo::None);
        assert_eq!(bond.cip, CipDescriptor::None);
    }
}
