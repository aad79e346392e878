//! Output primitives and the file-format interface.
//!
//! [`writer`] renders JSON from a stream of emission events in either compact
//! or indented form. [`traits`] defines the interface every structure file
//! format implements.

pub mod traits;
pub mod writer;
