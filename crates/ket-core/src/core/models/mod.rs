//! # Core Models Module
//!
//! Data structures for everything a KET document can describe: molecules and
//! query molecules, reactions, fragment templates, substructure groups,
//! stereocenters and non-molecular diagram annotations.
//!
//! ## Key Components
//!
//! - [`atom`] / [`topology`] - Atoms, bonds and their KET codes
//! - [`molecule`] - The molecule graph with its groups, selections and template pool
//! - [`sgroup`] - Substructure groups (data, superatom, repeating unit, multiple, generic)
//! - [`stereo`] - Stereocenters and CIP descriptor codes
//! - [`template`] - The R-group / T-group template arena
//! - [`meta`] / [`text`] - Shapes, arrows, plus signs and rich-text blocks
//! - [`reaction`] / [`document`] - Reactions and whole documents
//! - [`ids`] - Handle types for templates and layout summary blocks
//!
//! ## Usage
//!
//! ```ignore
//! use ketcodec::core::models::{atom::Atom, molecule::Molecule, topology::BondOrder};
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
//! let o = mol.add_atom(Atom::new("O", Point3::new(1.0, 0.0, 0.0)));
//! mol.add_bond(c, o, BondOrder::Double);
//! ```

pub mod atom;
pub mod document;
pub mod ids;
pub mod meta;
pub mod molecule;
pub mod reaction;
pub mod sgroup;
pub mod stereo;
pub mod template;
pub mod text;
pub mod topology;
