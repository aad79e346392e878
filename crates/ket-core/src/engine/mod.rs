//! # Engine Module
//!
//! Per-pass machinery of the KET codec. Everything here lives for one save or
//! load pass: a pass is configured by a [`config::SaverConfig`], records local
//! problems in [`diagnostics::Diagnostics`] and fails only with the fatal
//! errors of [`error`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Output mode, indentation, float precision and
//!   stereo label options, from a builder or a TOML file
//! - **Diagnostics** ([`diagnostics`]) - Local, recoverable findings of a pass
//! - **Error Handling** ([`error`]) - Fatal save and load errors
//! - **Reaction Layout** ([`layout`]) - Fragment components, reaction areas and
//!   summary blocks of a reaction diagram
//! - **Saver** ([`saver`]) - Walks a document and emits it through the JSON writer
//! - **Loader** ([`loader`]) - Rebuilds a document from KET text

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod loader;
pub mod saver;
