use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stereochemical descriptor code as produced by the CIP calculator.
///
/// Only the six chemical descriptors carry a textual token; [`CipDescriptor::None`]
/// and [`CipDescriptor::Unknown`] mark centers the calculator did not (or could
/// not) resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum CipDescriptor {
    #[default]
    None = 0,
    Unknown = 1,
    S = 2,
    R = 3,
    /// Pseudoasymmetric `s`.
    PseudoS = 4,
    /// Pseudoasymmetric `r`.
    PseudoR = 5,
    E = 6,
    Z = 7,
}

impl CipDescriptor {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Unknown),
            2 => Some(Self::S),
            3 => Some(Self::R),
            4 => Some(Self::PseudoS),
            5 => Some(Self::PseudoR),
            6 => Some(Self::E),
            7 => Some(Self::Z),
            _ => None,
        }
    }
}

/// Enhanced-stereo grouping of a stereocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StereoKind {
    /// Absolute configuration.
    #[default]
    Abs,
    /// Either the drawn configuration or its inverse, group `n`.
    Or(u32),
    /// A mixture of both configurations, group `n`.
    And(u32),
    /// Configuration unknown.
    Any,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid stereo group label '{0}'")]
pub struct ParseStereoKindError(pub String);

impl fmt::Display for StereoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abs => write!(f, "abs"),
            Self::Or(n) => write!(f, "or{}", n),
            Self::And(n) => write!(f, "&{}", n),
            Self::Any => write!(f, "any"),
        }
    }
}

impl FromStr for StereoKind {
    type Err = ParseStereoKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStereoKindError(s.to_string());
        match s {
            "abs" => Ok(Self::Abs),
            "any" => Ok(Self::Any),
            _ => {
                if let Some(n) = s.strip_prefix("or") {
                    n.parse().map(Self::Or).map_err(|_| err())
                } else if let Some(n) = s.strip_prefix('&') {
                    n.parse().map(Self::And).map_err(|_| err())
                } else {
                    Err(err())
                }
            }
        }
    }
}

/// A stereocenter on one atom of a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StereoCenter {
    pub atom: usize,
    pub kind: StereoKind,
    pub descriptor: CipDescriptor,
}

impl StereoCenter {
    pub fn new(atom: usize, kind: StereoKind, descriptor: CipDescriptor) -> Self {
        Self {
            atom,
            kind,
            descriptor,
        }
    }

    pub fn absolute(atom: usize, descriptor: CipDescriptor) -> Self {
        Self::new(atom, StereoKind::Abs, descriptor)
    }
}
