//! Fixed lookup tables shared by every save and load pass.
//!
//! All tables are compile-time `phf` maps: built once, never mutated, and
//! freely readable from any thread.

use crate::core::models::meta::ArrowKind;
use crate::core::models::stereo::CipDescriptor;
use crate::core::models::text::TextStyle;
use phf::{Map, phf_map};

/// Format identifier written in the document root.
pub const KET_FORMAT: &str = "ket";

/// Name of the data S-group that carries a CIP descriptor for its atom.
pub const CIP_SGROUP_NAME: &str = "INDIGO_CIP_DESC";

/// Prefix and suffix of the custom font size style, e.g. `CUSTOM_FONT_SIZE_18px`.
pub const CUSTOM_FONT_SIZE_PREFIX: &str = "CUSTOM_FONT_SIZE_";
pub const CUSTOM_FONT_SIZE_UNITS: &str = "px";

static TOKEN_TO_CIP: Map<&'static str, CipDescriptor> = phf_map! {
    "R" => CipDescriptor::R,
    "S" => CipDescriptor::S,
    "r" => CipDescriptor::PseudoR,
    "s" => CipDescriptor::PseudoS,
    "E" => CipDescriptor::E,
    "Z" => CipDescriptor::Z,
};

static CIP_TO_TOKEN: Map<u8, &'static str> = phf_map! {
    3u8 => "R",
    2u8 => "S",
    5u8 => "r",
    4u8 => "s",
    6u8 => "E",
    7u8 => "Z",
};

pub(crate) static TEXT_STYLES: Map<&'static str, TextStyle> = phf_map! {
    "BOLD" => TextStyle::Bold,
    "ITALIC" => TextStyle::Italic,
    "SUPERSCRIPT" => TextStyle::Superscript,
    "SUBSCRIPT" => TextStyle::Subscript,
};

#[rustfmt::skip]
pub(crate) static ARROW_MODES: Map<&'static str, ArrowKind> = phf_map! {
    "open-angle" => ArrowKind::OpenAngle,
    "filled-triangle" => ArrowKind::FilledTriangle,
    "filled-bow" => ArrowKind::FilledBow,
    "dashed-open-angle" => ArrowKind::DashedOpenAngle,
    "failed" => ArrowKind::Failed,
    "both-ends-filled-triangle" => ArrowKind::BothEndsFilledTriangle,
    "equilibrium-filled-half-bow" => ArrowKind::EquilibriumFilledHalfBow,
    "equilibrium-filled-triangle" => ArrowKind::EquilibriumFilledTriangle,
    "equilibrium-open-angle" => ArrowKind::EquilibriumOpenAngle,
    "unbalanced-equilibrium-filled-half-bow" => ArrowKind::UnbalancedEquilibriumFilledHalfBow,
    "unbalanced-equilibrium-large-filled-half-bow" => ArrowKind::UnbalancedEquilibriumLargeFilledHalfBow,
    "unbalanced-equilibrium-open-half-angle" => ArrowKind::UnbalancedEquilibriumOpenHalfAngle,
    "unbalanced-equilibrium-filled-half-triangle" => ArrowKind::UnbalancedEquilibriumFilledHalfTriangle,
    "elliptical-arc-arrow-filled-bow" => ArrowKind::EllipticalArcFilledBow,
    "elliptical-arc-arrow-filled-triangle" => ArrowKind::EllipticalArcFilledTriangle,
    "elliptical-arc-arrow-open-angle" => ArrowKind::EllipticalArcOpenAngle,
    "elliptical-arc-arrow-open-half-angle" => ArrowKind::EllipticalArcOpenHalfAngle,
};

/// Resolves a one-character CIP token to its descriptor.
///
/// Returns `None` for anything outside the six known tokens; the caller decides
/// whether to skip or report it.
pub fn cip_from_token(token: &str) -> Option<CipDescriptor> {
    TOKEN_TO_CIP.get(token).copied()
}

/// Returns the token of a descriptor, or `None` for `None`/`Unknown`.
pub fn cip_token(descriptor: CipDescriptor) -> Option<&'static str> {
    CIP_TO_TOKEN.get(&descriptor.code()).copied()
}
