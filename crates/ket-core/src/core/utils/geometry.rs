use nalgebra::{Point2, Vector2};

/// Area mask of a point lying before the arrow tail.
pub const REACTANT_AREA: u8 = 0;
/// Bit set when the point projects past the arrow tail.
pub const REAGENT_ABOVE_BIT: u8 = 1;
/// Bit set when the point projects past the arrow head.
pub const REAGENT_BELOW_BIT: u8 = 2;
/// Area mask of a point lying beyond the arrow head.
pub const PRODUCT_AREA: u8 = REAGENT_ABOVE_BIT | REAGENT_BELOW_BIT;

/// Smallest extent given to a component bounding box along each axis.
pub const MIN_MOL_SIZE: (f64, f64) = (0.5, 0.5);

/// Classifies a point against the directed segment `begin -> end`.
///
/// Both `point - begin` and `point - end` are projected onto `begin - end`.
/// A strictly negative first projection sets [`REAGENT_ABOVE_BIT`], a strictly
/// negative second projection sets [`REAGENT_BELOW_BIT`]. Zero projections count
/// as non-negative, so `begin` itself maps to [`REACTANT_AREA`] and `end` maps to
/// [`REAGENT_ABOVE_BIT`] alone.
pub fn point_side(point: &Point2<f64>, begin: &Point2<f64>, end: &Point2<f64>) -> u8 {
    let arrow_vec = begin - end;
    let dt1 = (point - begin).dot(&arrow_vec);
    let dt2 = (point - end).dot(&arrow_vec);

    let mut mask = 0;
    if dt1 < 0.0 {
        mask |= REAGENT_ABOVE_BIT;
    }
    if dt2 < 0.0 {
        mask |= REAGENT_BELOW_BIT;
    }
    mask
}

/// Signed area of the triangle `begin, end, point` (twice over).
///
/// Positive when `point` is on the left of the direction `begin -> end`.
pub fn side_of_line(point: &Point2<f64>, begin: &Point2<f64>, end: &Point2<f64>) -> f64 {
    let dir = end - begin;
    let rel = point - begin;
    dir.x * rel.y - dir.y * rel.x
}

pub fn distance_to_segment(point: &Point2<f64>, begin: &Point2<f64>, end: &Point2<f64>) -> f64 {
    let dir = end - begin;
    let len_sq = dir.norm_squared();
    if len_sq == 0.0 {
        return (point - begin).norm();
    }
    let t = ((point - begin).dot(&dir) / len_sq).clamp(0.0, 1.0);
    (point - (begin + dir * t)).norm()
}

/// Axis-aligned rectangle used for component bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect2 {
    /// Creates a rectangle spanning two arbitrary corners.
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns the tightest rectangle around the points, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |rect, p| {
            rect.union(&Self::new(p, p))
        }))
    }

    pub fn union(&self, other: &Rect2) -> Rect2 {
        Rect2 {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Grows the rectangle symmetrically around its center until each side
    /// reaches at least the given size.
    pub fn with_min_size(&self, size: (f64, f64)) -> Rect2 {
        let center = self.center();
        let half = Vector2::new(self.width().max(size.0), self.height().max(size.1)) / 2.0;
        Rect2 {
            min: center - half,
            max: center + half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn point_side_marks_reactant_before_the_tail() {
        assert_eq!(point_side(&p(-3.0, 0.5), &p(0.0, 0.0), &p(4.0, 0.0)), REACTANT_AREA);
    }

    #[test]
    fn point_side_marks_product_past_the_head() {
        assert_eq!(point_side(&p(7.0, -1.0), &p(0.0, 0.0), &p(4.0, 0.0)), PRODUCT_AREA);
    }

    #[test]
    fn point_side_on_perpendicular_bisector_is_between_the_ends() {
        let mask = point_side(&p(2.0, 5.0), &p(0.0, 0.0), &p(4.0, 0.0));
        assert_eq!(mask, REAGENT_ABOVE_BIT);
        let below = point_side(&p(2.0, -5.0), &p(0.0, 0.0), &p(4.0, 0.0));
        assert_eq!(below, REAGENT_ABOVE_BIT);
    }

    #[test]
    fn point_side_at_endpoints_yields_boundary_bits() {
        let begin = p(1.0, 1.0);
        let end = p(-2.0, 3.0);
        assert_eq!(point_side(&begin, &begin, &end), REACTANT_AREA);
        assert_eq!(point_side(&end, &begin, &end), REAGENT_ABOVE_BIT);
    }

    #[test]
    fn point_side_depends_only_on_sign_not_magnitude() {
        let begin = p(0.0, 0.0);
        let end = p(1.0, 0.0);
        assert_eq!(
            point_side(&p(0.5, 0.0), &begin, &end),
            point_side(&p(0.5, 1000.0), &begin, &end)
        );
        assert_eq!(
            point_side(&p(1e6, 0.0), &begin, &end),
            point_side(&p(1.0001, 0.0), &begin, &end)
        );
    }

    #[test]
    fn side_of_line_is_positive_on_the_left() {
        assert!(side_of_line(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0)) > 0.0);
        assert!(side_of_line(&p(1.0, -1.0), &p(0.0, 0.0), &p(2.0, 0.0)) < 0.0);
    }

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let d = distance_to_segment(&p(-3.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
        let d = distance_to_segment(&p(5.0, 2.0), &p(0.0, 0.0), &p(10.0, 0.0));
        assert!((d - 2.0).abs() < 1e-12);
        let d = distance_to_segment(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rect_from_points_and_union() {
        let r = Rect2::from_points([p(1.0, 2.0), p(-1.0, 5.0), p(0.0, 0.0)]).unwrap();
        assert_eq!(r.min, p(-1.0, 0.0));
        assert_eq!(r.max, p(1.0, 5.0));
        assert!(Rect2::from_points(Vec::new()).is_none());

        let u = r.union(&Rect2::new(p(3.0, 3.0), p(2.0, -2.0)));
        assert_eq!(u.min, p(-1.0, -2.0));
        assert_eq!(u.max, p(3.0, 5.0));
    }

    #[test]
    fn with_min_size_expands_degenerate_boxes_around_center() {
        let r = Rect2::new(p(2.0, 2.0), p(2.0, 2.0)).with_min_size(MIN_MOL_SIZE);
        assert_eq!(r.min, p(1.75, 1.75));
        assert_eq!(r.max, p(2.25, 2.25));

        let big = Rect2::new(p(0.0, 0.0), p(4.0, 0.1)).with_min_size(MIN_MOL_SIZE);
        assert_eq!(big.width(), 4.0);
        assert!((big.height() - 0.5).abs() < 1e-12);
    }
}
