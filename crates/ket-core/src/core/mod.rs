//! # Core Module
//!
//! Stateless building blocks of the KET codec: the structural model, the fixed
//! lookup tables and the low-level output primitives.
//!
//! ## Architecture
//!
//! - **Structural Model** ([`models`]) - Molecules, reactions, S-groups, fragment
//!   templates, stereocenters and diagram meta-objects
//! - **Lookup Tables** ([`tables`]) - Compile-time maps between CIP descriptors,
//!   text style names and arrow modes and their textual tokens
//! - **Utilities** ([`utils`]) - Geometry used for reaction area placement and
//!   S-group classification helpers
//! - **I/O Primitives** ([`io`]) - The dual-mode JSON writer and the
//!   [`StructureFile`](io::traits::StructureFile) trait
//!
//! Nothing in this module keeps per-pass state; everything here can be shared
//! freely between threads as long as the structures themselves are not mutated.

pub mod io;
pub mod models;
pub mod tables;
pub mod utils;
