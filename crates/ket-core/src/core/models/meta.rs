//! Non-molecular diagram elements: shapes, text blocks, reaction arrows and plus signs.

use super::text::TextObject;
use crate::core::tables::ARROW_MODES;
use nalgebra::Point2;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable type tag of a meta-object variant.
///
/// Tags are assigned explicitly and never derived from display names, so they
/// survive cloning and a save/load round trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MetaObjectKind {
    SimpleObject = 1,
    Text = 2,
    ReactionArrow = 3,
    ReactionPlus = 4,
}

impl MetaObjectKind {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeMode {
    Ellipse,
    Rectangle,
    Line,
}

impl ShapeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
            Self::Rectangle => "rectangle",
            Self::Line => "line",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown diagram element mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for ShapeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ellipse" => Ok(Self::Ellipse),
            "rectangle" => Ok(Self::Rectangle),
            "line" => Ok(Self::Line),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Visual style of a reaction arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ArrowKind {
    #[default]
    OpenAngle,
    FilledTriangle,
    FilledBow,
    DashedOpenAngle,
    Failed,
    BothEndsFilledTriangle,
    EquilibriumFilledHalfBow,
    EquilibriumFilledTriangle,
    EquilibriumOpenAngle,
    UnbalancedEquilibriumFilledHalfBow,
    UnbalancedEquilibriumLargeFilledHalfBow,
    UnbalancedEquilibriumOpenHalfAngle,
    UnbalancedEquilibriumFilledHalfTriangle,
    EllipticalArcFilledBow,
    EllipticalArcFilledTriangle,
    EllipticalArcOpenAngle,
    EllipticalArcOpenHalfAngle,
}

impl ArrowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAngle => "open-angle",
            Self::FilledTriangle => "filled-triangle",
            Self::FilledBow => "filled-bow",
            Self::DashedOpenAngle => "dashed-open-angle",
            Self::Failed => "failed",
            Self::BothEndsFilledTriangle => "both-ends-filled-triangle",
            Self::EquilibriumFilledHalfBow => "equilibrium-filled-half-bow",
            Self::EquilibriumFilledTriangle => "equilibrium-filled-triangle",
            Self::EquilibriumOpenAngle => "equilibrium-open-angle",
            Self::UnbalancedEquilibriumFilledHalfBow => "unbalanced-equilibrium-filled-half-bow",
            Self::UnbalancedEquilibriumLargeFilledHalfBow => {
                "unbalanced-equilibrium-large-filled-half-bow"
            }
            Self::UnbalancedEquilibriumOpenHalfAngle => "unbalanced-equilibrium-open-half-angle",
            Self::UnbalancedEquilibriumFilledHalfTriangle => {
                "unbalanced-equilibrium-filled-half-triangle"
            }
            Self::EllipticalArcFilledBow => "elliptical-arc-arrow-filled-bow",
            Self::EllipticalArcFilledTriangle => "elliptical-arc-arrow-filled-triangle",
            Self::EllipticalArcOpenAngle => "elliptical-arc-arrow-open-angle",
            Self::EllipticalArcOpenHalfAngle => "elliptical-arc-arrow-open-half-angle",
        }
    }

    /// Elliptical arc arrows are the only ones that carry an arc height.
    pub fn is_elliptical(self) -> bool {
        matches!(
            self,
            Self::EllipticalArcFilledBow
                | Self::EllipticalArcFilledTriangle
                | Self::EllipticalArcOpenAngle
                | Self::EllipticalArcOpenHalfAngle
        )
    }
}

impl fmt::Display for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrowKind {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ARROW_MODES
            .get(s)
            .copied()
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Ellipse, rectangle or line spanned by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleShape {
    pub mode: ShapeMode,
    pub corners: (Point2<f64>, Point2<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionArrow {
    pub kind: ArrowKind,
    pub begin: Point2<f64>,
    pub end: Point2<f64>,
    /// Arc height; only meaningful for elliptical arc arrows.
    pub height: f64,
}

impl ReactionArrow {
    pub fn new(kind: ArrowKind, begin: Point2<f64>, end: Point2<f64>) -> Self {
        Self {
            kind,
            begin,
            end,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionPlus {
    pub position: Point2<f64>,
}

/// A diagram annotation. `clone()` yields an independent deep copy.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaObject {
    Shape(SimpleShape),
    Text(TextObject),
    Arrow(ReactionArrow),
    Plus(ReactionPlus),
}

impl MetaObject {
    pub fn kind(&self) -> MetaObjectKind {
        match self {
            Self::Shape(_) => MetaObjectKind::SimpleObject,
            Self::Text(_) => MetaObjectKind::Text,
            Self::Arrow(_) => MetaObjectKind::ReactionArrow,
            Self::Plus(_) => MetaObjectKind::ReactionPlus,
        }
    }

    /// Name written in the `type` field of the serialized element.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Shape(shape) => shape.mode.as_str(),
            Self::Text(_) => "text",
            Self::Arrow(_) => "arrow",
            Self::Plus(_) => "plus",
        }
    }

    pub fn shape(mode: ShapeMode, a: Point2<f64>, b: Point2<f64>) -> Self {
        Self::Shape(SimpleShape {
            mode,
            corners: (a, b),
        })
    }

    pub fn arrow(kind: ArrowKind, begin: Point2<f64>, end: Point2<f64>) -> Self {
        Self::Arrow(ReactionArrow::new(kind, begin, end))
    }

    pub fn plus(position: Point2<f64>) -> Self {
        Self::Plus(ReactionPlus { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn kind_tags_are_explicit_and_distinct() {
        let tags = [
            MetaObjectKind::SimpleObject.tag(),
            MetaObjectKind::Text.tag(),
            MetaObjectKind::ReactionArrow.tag(),
            MetaObjectKind::ReactionPlus.tag(),
        ];
        assert_eq!(tags, [1, 2, 3, 4]);
    }

    #[test]
    fn clone_preserves_kind_and_is_independent() {
        let original = MetaObject::arrow(
            ArrowKind::EllipticalArcOpenAngle,
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
        );
        let mut copy = original.clone();
        assert_eq!(copy.kind(), original.kind());
        if let MetaObject::Arrow(arrow) = &mut copy {
            arrow.height = 2.5;
        }
        assert_ne!(copy, original);
        match original {
            MetaObject::Arrow(arrow) => assert_eq!(arrow.height, 0.0),
            _ => panic!("variant changed"),
        }
    }

    #[test]
    fn type_names_follow_variant() {
        let p = Point2::new(1.0, 1.0);
        assert_eq!(MetaObject::shape(ShapeMode::Ellipse, p, p).type_name(), "ellipse");
        assert_eq!(MetaObject::shape(ShapeMode::Line, p, p).type_name(), "line");
        assert_eq!(MetaObject::plus(p).type_name(), "plus");
        assert_eq!(MetaObject::arrow(ArrowKind::Failed, p, p).type_name(), "arrow");
        let text = MetaObject::Text(TextObject::from_plain(Point3::origin(), "a", &[]));
        assert_eq!(text.type_name(), "text");
        assert_eq!(text.kind(), MetaObjectKind::Text);
    }

    #[test]
    fn arrow_kind_parses_every_mode_name() {
        assert_eq!(
            "unbalanced-equilibrium-large-filled-half-bow".parse::<ArrowKind>(),
            Ok(ArrowKind::UnbalancedEquilibriumLargeFilledHalfBow)
        );
        assert_eq!("open-angle".parse::<ArrowKind>(), Ok(ArrowKind::OpenAngle));
        assert!("zigzag".parse::<ArrowKind>().is_err());
    }

    #[test]
    fn only_arc_arrows_are_elliptical() {
        assert!(ArrowKind::EllipticalArcOpenHalfAngle.is_elliptical());
        assert!(!ArrowKind::EquilibriumOpenAngle.is_elliptical());
    }

    #[test]
    fn shape_mode_round_trips_through_its_name() {
        for mode in [ShapeMode::Ellipse, ShapeMode::Rectangle, ShapeMode::Line] {
            assert_eq!(mode.as_str().parse::<ShapeMode>(), Ok(mode));
        }
    }
}
