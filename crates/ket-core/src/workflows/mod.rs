//! # Workflows Module
//!
//! One-call entry points of the codec.
//!
//! - [`ket::save_ket`] / [`ket::save_ket_to`] - serialize a document with a given
//!   [`SaverConfig`](crate::engine::config::SaverConfig)
//! - [`ket::load_ket`] - parse a document back
//! - [`ket::KetFile`] - the same operations behind the
//!   [`StructureFile`](crate::core::io::traits::StructureFile) trait, for readers,
//!   writers and paths
//!
//! Every call returns the diagnostics of its pass next to the result. Each runs
//! inside its own `tracing` span; installing a subscriber is left to the caller.

pub mod ket;
