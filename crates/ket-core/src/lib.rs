//! # ketcodec
//!
//! Structural model and KET exchange-format codec for molecules, reactions and
//! diagram annotations.
//!
//! KET is the JSON document format used by chemical structure editors: a `root`
//! node list referring to molecule and reaction entries that carry atoms, bonds,
//! stereocenters, S-groups, fragment templates, rich-text and shape annotations,
//! and reaction arrows and plus signs.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Reaction`,
//!   `MetaObject`), compile-time lookup tables and the dual-mode JSON writer.
//!
//! - **[`engine`]: The Logic Core.** Per-pass machinery: the saver that walks a
//!   structure and drives the writer, the reaction layout bookkeeping that sorts
//!   components into reactant, reagent and product areas, the loader, and the
//!   diagnostics and error types shared by them.
//!
//! - **[`workflows`]: The Public API.** One-call entry points that save a
//!   document to text or a sink, load it back, or go through files.
//!
//! Local problems in the input (a dangling atom index, an unknown descriptor, a
//! malformed text payload) never abort a pass; they are reported as
//! [`Diagnostics`](engine::diagnostics::Diagnostics) next to the result.

pub mod core;
pub mod engine;
pub mod workflows;
