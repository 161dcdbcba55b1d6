//! Typed drawing primitives and their parametric evaluation

use crate::{
    BBox, EPSILON, EPSILON_SQRT, Error, PI, PathCmd, Point, Scalar, Transform,
    utils::quadratic_solve,
};
use std::fmt;

/// Set of operations common to all parametric primitives.
pub trait Curve: Sized {
    /// Point at which curve starts
    fn start(&self) -> Point;

    /// Point at which curve ends
    fn end(&self) -> Point;

    /// Evaluate curve at parameter value `t` (0.0 is the start, 1.0 the end).
    ///
    /// The parameter is not clamped, callers may extrapolate outside `(0.0..=1.0)`.
    fn at(&self, t: Scalar) -> Point;

    /// First derivative with respect to `t`, not normalized
    fn tangent_at(&self, t: Scalar) -> Point;

    /// Arc length of the curve
    fn length(&self) -> Scalar;

    /// Apply affine transformation to the curve
    fn transform(&self, tr: Transform) -> Self;

    /// Identical curve but directed from end to start, instead of start to end.
    fn reverse(&self) -> Self;

    /// Split the curve at prameter value `t`
    fn split_at(&self, t: Scalar) -> (Self, Self);

    /// Optimized version of `Curve::split_at(0.5)`
    fn split(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Extend provided `init` bounding box with the bounding box of the curve
    fn bbox(&self, init: Option<BBox>) -> BBox;
}

// -----------------------------------------------------------------------------
// Line
// -----------------------------------------------------------------------------

/// Line segment curve
#[derive(Clone, Copy, PartialEq)]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    /// Start and end points of the line
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    /// Direction vector associated with the line segment
    pub fn direction(&self) -> Point {
        self.end() - self.start()
    }

    /// Find intersection of two lines
    ///
    /// Returns pair of `t` parameters for this line and the other line.
    /// Found by solving `self.at(t0) == other.at(t1)`, the parameters are not
    /// restricted to the `(0.0..=1.0)` segment ranges.
    pub fn intersect(&self, other: Line) -> Option<(Scalar, Scalar)> {
        let Line([Point([x1, y1]), Point([x2, y2])]) = *self;
        let Line([Point([x3, y3]), Point([x4, y4])]) = other;
        let det = (x4 - x3) * (y1 - y2) - (x1 - x2) * (y4 - y3);
        if det.abs() < EPSILON {
            return None;
        }
        let t0 = ((y3 - y4) * (x1 - x3) + (x4 - x3) * (y1 - y3)) / det;
        let t1 = ((y1 - y2) * (x1 - x3) + (x2 - x1) * (y1 - y3)) / det;
        Some((t0, t1))
    }
}

impl Curve for Line {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[1]
    }

    fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = self;
        (1.0 - t) * p0 + t * p1
    }

    fn tangent_at(&self, _t: Scalar) -> Point {
        self.direction()
    }

    fn length(&self) -> Scalar {
        let Self([p0, p1]) = self;
        p0.dist(*p1)
    }

    fn transform(&self, tr: Transform) -> Self {
        let Line([p0, p1]) = self;
        Self([tr.apply(*p0), tr.apply(*p1)])
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1]) = *self;
        Self([p1, p0])
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, p1]) = self;
        let mid = self.at(t);
        (Self([*p0, mid]), Self([mid, *p1]))
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1]) = *self;
        BBox::new(p0, p1).union_opt(init)
    }
}

// -----------------------------------------------------------------------------
// Circular arc
// -----------------------------------------------------------------------------

/// Circular arc defined by three on-arc points: start, an intermediate point
/// and end.
///
/// Evaluation reconstructs the circle through the three points, then walks
/// the angular span from the start towards the end passing through the
/// intermediate point. Collinear points degenerate to linear interpolation
/// between start and end.
#[derive(Clone, Copy, PartialEq)]
pub struct Arc(pub [Point; 3]);

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Arc([p0, p1, p2]) = self;
        write!(f, "Arc {:?} {:?} {:?}", p0, p1, p2)
    }
}

impl Arc {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into(), p2.into()])
    }

    pub fn points(&self) -> [Point; 3] {
        self.0
    }

    /// Center and radius of the circle through the three points,
    /// `None` when the points are collinear
    pub fn center_radius(&self) -> Option<(Point, Scalar)> {
        let Self([p0, p1, p2]) = *self;
        let d01 = p1 - p0;
        let d12 = p2 - p1;
        let det = d01.cross(d12);
        if det.abs() < EPSILON {
            return None;
        }
        // the center is on both perpendicular bisectors:
        // d01 · c = d01 · mid(p0, p1) and d12 · c = d12 · mid(p1, p2)
        let b0 = d01.dot(p0.midpoint(p1));
        let b1 = d12.dot(p1.midpoint(p2));
        let center = Point::new(
            (b0 * d12.y() - d01.y() * b1) / det,
            (d01.x() * b1 - b0 * d12.x()) / det,
        );
        Some((center, center.dist(p0)))
    }

    /// Center, radius, start angle and signed sweep covering the arc
    fn angles(&self) -> Option<(Point, Scalar, Scalar, Scalar)> {
        let Self([p0, p1, p2]) = *self;
        let (center, radius) = self.center_radius()?;
        let start = (p0 - center).angle();
        let to_mid = (p1 - center).angle() - start;
        let to_end = (p2 - center).angle() - start;
        let (to_mid, to_end) = (to_mid.rem_euclid(2.0 * PI), to_end.rem_euclid(2.0 * PI));
        let sweep = if to_end < EPSILON {
            // start and end coincide, the intermediate point forces a full turn
            2.0 * PI
        } else if to_mid <= to_end {
            to_end
        } else {
            to_end - 2.0 * PI
        };
        Some((center, radius, start, sweep))
    }
}

impl Curve for Arc {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[2]
    }

    fn at(&self, t: Scalar) -> Point {
        match self.angles() {
            None => Line::new(self.start(), self.end()).at(t),
            Some((center, radius, start, sweep)) => {
                let (sin, cos) = (start + t * sweep).sin_cos();
                center + Point::new(radius * cos, radius * sin)
            }
        }
    }

    fn tangent_at(&self, t: Scalar) -> Point {
        match self.angles() {
            None => self.end() - self.start(),
            Some((_, radius, start, sweep)) => {
                let (sin, cos) = (start + t * sweep).sin_cos();
                radius * sweep * Point::new(-sin, cos)
            }
        }
    }

    fn length(&self) -> Scalar {
        match self.angles() {
            None => self.start().dist(self.end()),
            Some((_, radius, _, sweep)) => radius * sweep.abs(),
        }
    }

    fn transform(&self, tr: Transform) -> Self {
        let Arc([p0, p1, p2]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2)])
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2]) = *self;
        Self([p2, p1, p0])
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, _, p2]) = *self;
        let mid = self.at(t);
        (
            Self([p0, self.at(0.5 * t), mid]),
            Self([mid, self.at(t + 0.5 * (1.0 - t)), p2]),
        )
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let bbox = BBox::new(self.start(), self.end())
            .union_opt(init)
            .extend(self.0[1]);
        let Some((center, radius, start, sweep)) = self.angles() else {
            return bbox;
        };
        // extend by the axis extreme points falling inside the sweep
        let mut bbox = bbox;
        for quadrant in 0..4 {
            let angle = quadrant as Scalar * PI / 2.0;
            let delta = if sweep >= 0.0 {
                (angle - start).rem_euclid(2.0 * PI)
            } else {
                (start - angle).rem_euclid(2.0 * PI)
            };
            if delta <= sweep.abs() {
                let (sin, cos) = angle.sin_cos();
                bbox = bbox.extend(center + Point::new(radius * cos, radius * sin));
            }
        }
        bbox
    }
}

// -----------------------------------------------------------------------------
// Cubic bezier curve
// -----------------------------------------------------------------------------

/// Cubic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
#[derive(Clone, Copy, PartialEq)]
pub struct Cubic(pub [Point; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    pub fn points(&self) -> [Point; 4] {
        self.0
    }

    /// First and last non-degenerate control polygon sides, used to recover
    /// tangent directions when handles coincide with the anchors
    pub fn ends(&self) -> (Line, Line) {
        let ps = self.points();
        let mut start = 0;
        for i in 0..3 {
            if !ps[i].is_close_to(ps[i + 1]) {
                start = i;
                break;
            }
        }
        let mut end = 3;
        for i in (1..4).rev() {
            if !ps[i].is_close_to(ps[i - 1]) {
                end = i;
                break;
            }
        }
        (
            Line::new(ps[start], ps[start + 1]),
            Line::new(ps[end - 1], ps[end]),
        )
    }

    /// Find all extermities of the curve `curve'(t)_x = 0 || curve'(t)_y = 0`
    fn extremities(&self) -> impl Iterator<Item = Scalar> {
        let Self([p0, p1, p2, p3]) = *self;
        let Point([a0, a1]) = -1.0 * p0 + 3.0 * p1 - 3.0 * p2 + 1.0 * p3;
        let Point([b0, b1]) = 2.0 * p0 - 4.0 * p1 + 2.0 * p2;
        let Point([c0, c1]) = -1.0 * p0 + p1;

        quadratic_solve(a0, b0, c0)
            .chain(quadratic_solve(a1, b1, c1))
            .filter(|t| *t >= 0.0 && *t <= 1.0)
    }
}

impl Curve for Cubic {
    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Point {
        // at(t) =
        //   (1 - t) ^ 3 * p0 +
        //   3 * (1 - t) ^ 2 * t * p1 +
        //   3 * (1 - t) * t ^ 2 * p2 +
        //   t ^ 3 * p3
        let Self([p0, p1, p2, p3]) = self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        t_3 * p0 + 3.0 * t1 * t_2 * p1 + 3.0 * t2 * t_1 * p2 + t3 * p3
    }

    fn tangent_at(&self, t: Scalar) -> Point {
        // curve'(t) = 3 [(1 - t)^2 (p1 - p0) + 2 (1 - t) t (p2 - p1) + t^2 (p3 - p2)]
        let Self([p0, p1, p2, p3]) = *self;
        let (t1, t_1) = (t, 1.0 - t);
        3.0 * (t_1 * t_1 * (p1 - p0) + 2.0 * t1 * t_1 * (p2 - p1) + t1 * t1 * (p3 - p2))
    }

    fn length(&self) -> Scalar {
        cubic_length_rec(self, 0)
    }

    fn transform(&self, tr: Transform) -> Self {
        let Cubic([p0, p1, p2, p3]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2), tr.apply(*p3)])
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        // https://pomax.github.io/bezierinfo/#matrixsplit
        let Self([p0, p1, p2, p3]) = self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        let mid = t_3 * p0 + 3.0 * t1 * t_2 * p1 + 3.0 * t2 * t_1 * p2 + t3 * p3;
        let c0 = Self([
            *p0,
            t_1 * p0 + t * p1,
            t_2 * p0 + 2.0 * t * t_1 * p1 + t2 * p2,
            mid,
        ]);
        let c1 = Self([
            mid,
            t_2 * p1 + 2.0 * t * t_1 * p2 + t2 * p3,
            t_1 * p2 + t * p3,
            *p3,
        ]);
        (c0, c1)
    }

    /// Optimized version of `split_at(0.5)`
    fn split(&self) -> (Self, Self) {
        let Self([p0, p1, p2, p3]) = *self;
        let mid = 0.125 * p0 + 0.375 * p1 + 0.375 * p2 + 0.125 * p3;
        let c0 = Self([
            p0,
            0.5 * p0 + 0.5 * p1,
            0.25 * p0 + 0.5 * p1 + 0.25 * p2,
            mid,
        ]);
        let c1 = Self([
            mid,
            0.25 * p1 + 0.5 * p2 + 0.25 * p3,
            0.5 * p2 + 0.5 * p3,
            p3,
        ]);
        (c0, c1)
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2, p3]) = self;
        let bbox = BBox::new(*p0, *p3).union_opt(init);
        if bbox.contains(*p1) && bbox.contains(*p2) {
            return bbox;
        }
        self.extremities()
            .fold(bbox, |bbox, t| bbox.extend(self.at(t)))
    }
}

/// Approximate arc length by adaptive subdivision.
///
/// For a nearly flat curve `(chord + control polygon) / 2` is accurate, the
/// gap between the two bounds drives the refinement.
fn cubic_length_rec(cubic: &Cubic, depth: usize) -> Scalar {
    let [p0, p1, p2, p3] = cubic.points();
    let chord = p0.dist(p3);
    let poly = p0.dist(p1) + p1.dist(p2) + p2.dist(p3);
    if poly - chord < EPSILON_SQRT * (1.0 + poly) || depth >= 12 {
        return (poly + chord) / 2.0;
    }
    let (c0, c1) = cubic.split();
    cubic_length_rec(&c0, depth + 1) + cubic_length_rec(&c1, depth + 1)
}

// -----------------------------------------------------------------------------
// Primitive
// -----------------------------------------------------------------------------

/// `Primitive` is a single typed drawing command with its geometry, an enum of
/// either `Line`, `Arc`, `Curve` or `Close`.
///
/// The first point of the inner curve is the primitive origin, owned by the
/// preceding primitive in the segment. A `Close` carries the implicit line
/// back to the segment origin and is treated as a line for all evaluation
/// purposes.
#[derive(Clone, Copy, PartialEq)]
pub enum Primitive {
    Line(Line),
    Arc(Arc),
    Curve(Cubic),
    Close(Line),
}

impl Primitive {
    /// Number of geometry points owned by the primitive, excluding the origin
    pub fn points_count(&self) -> usize {
        match self {
            Primitive::Line(_) | Primitive::Close(_) => 1,
            Primitive::Arc(_) => 2,
            Primitive::Curve(_) => 3,
        }
    }

    /// Origin of the primitive, the point where it starts
    pub fn org(&self) -> Point {
        self.start()
    }

    /// Move the origin of the primitive
    pub fn set_org(&mut self, point: Point) {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.0[0] = point,
            Primitive::Arc(arc) => arc.0[0] = point,
            Primitive::Curve(cubic) => cubic.0[0] = point,
        }
    }

    /// Owned geometry point at 1-based `index`, negative indexes address from
    /// the end (`-1` is the endpoint). Out of range indexes produce `None`.
    pub fn point(&self, index: isize) -> Option<Point> {
        let offset = resolve_index(index, self.points_count())?;
        Some(self.owned_points()[offset])
    }

    /// Replace the owned geometry point at 1-based `index`.
    ///
    /// The endpoint of a `Close` is implied by the segment origin and can not
    /// be replaced.
    pub fn set_point(&mut self, index: isize, point: Point) -> Result<(), Error> {
        let offset = resolve_index(index, self.points_count()).ok_or(Error::NotFound(index))?;
        match self {
            Primitive::Close(_) => Err(Error::Unsupported(
                "close endpoint is implied by the segment origin",
            )),
            Primitive::Line(line) => {
                line.0[offset + 1] = point;
                Ok(())
            }
            Primitive::Arc(arc) => {
                arc.0[offset + 1] = point;
                Ok(())
            }
            Primitive::Curve(cubic) => {
                cubic.0[offset + 1] = point;
                Ok(())
            }
        }
    }

    /// Raw path record corresponding to this primitive, the origin is dropped
    /// as it is owned by the preceding primitive
    pub fn to_cmd(&self) -> PathCmd {
        match self {
            Primitive::Line(line) => PathCmd::Line(line.end()),
            Primitive::Arc(arc) => {
                let [_, p1, p2] = arc.points();
                PathCmd::Arc(p1, p2)
            }
            Primitive::Curve(cubic) => {
                let [_, p1, p2, p3] = cubic.points();
                PathCmd::Curve(p1, p2, p3)
            }
            Primitive::Close(_) => PathCmd::Close,
        }
    }

    /// Fail fast with `InvalidOperand` when any of the points, origin
    /// included, is unset
    pub fn ensure_set(&self) -> Result<(), Error> {
        let unset = match self {
            Primitive::Line(line) | Primitive::Close(line) => {
                line.points().iter().any(|p| p.is_unset())
            }
            Primitive::Arc(arc) => arc.points().iter().any(|p| p.is_unset()),
            Primitive::Curve(cubic) => cubic.points().iter().any(|p| p.is_unset()),
        };
        if unset {
            Err(Error::InvalidOperand)
        } else {
            Ok(())
        }
    }

    fn owned_points(&self) -> &[Point] {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => &line.0[1..],
            Primitive::Arc(arc) => &arc.0[1..],
            Primitive::Curve(cubic) => &cubic.0[1..],
        }
    }
}

/// Convert 1-based (or negative from the end) index to an offset in `0..len`
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index > 0 && index as usize <= len {
        Some(index as usize - 1)
    } else if index < 0 && index.unsigned_abs() <= len {
        Some(len - index.unsigned_abs())
    } else {
        None
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Line(line) => line.fmt(f),
            Primitive::Arc(arc) => arc.fmt(f),
            Primitive::Curve(cubic) => cubic.fmt(f),
            Primitive::Close(line) => {
                let Line([p0, p1]) = line;
                write!(f, "Close {:?} {:?}", p0, p1)
            }
        }
    }
}

impl Curve for Primitive {
    fn start(&self) -> Point {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.start(),
            Primitive::Arc(arc) => arc.start(),
            Primitive::Curve(cubic) => cubic.start(),
        }
    }

    fn end(&self) -> Point {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.end(),
            Primitive::Arc(arc) => arc.end(),
            Primitive::Curve(cubic) => cubic.end(),
        }
    }

    fn at(&self, t: Scalar) -> Point {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.at(t),
            Primitive::Arc(arc) => arc.at(t),
            Primitive::Curve(cubic) => cubic.at(t),
        }
    }

    fn tangent_at(&self, t: Scalar) -> Point {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.tangent_at(t),
            Primitive::Arc(arc) => arc.tangent_at(t),
            Primitive::Curve(cubic) => cubic.tangent_at(t),
        }
    }

    fn length(&self) -> Scalar {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.length(),
            Primitive::Arc(arc) => arc.length(),
            Primitive::Curve(cubic) => cubic.length(),
        }
    }

    fn transform(&self, tr: Transform) -> Self {
        match self {
            Primitive::Line(line) => Primitive::Line(line.transform(tr)),
            Primitive::Arc(arc) => Primitive::Arc(arc.transform(tr)),
            Primitive::Curve(cubic) => Primitive::Curve(cubic.transform(tr)),
            Primitive::Close(line) => Primitive::Close(line.transform(tr)),
        }
    }

    fn reverse(&self) -> Self {
        match self {
            Primitive::Line(line) => Primitive::Line(line.reverse()),
            Primitive::Arc(arc) => Primitive::Arc(arc.reverse()),
            Primitive::Curve(cubic) => Primitive::Curve(cubic.reverse()),
            Primitive::Close(line) => Primitive::Close(line.reverse()),
        }
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => {
                let (l0, l1) = line.split_at(t);
                (Primitive::Line(l0), Primitive::Line(l1))
            }
            Primitive::Arc(arc) => {
                let (a0, a1) = arc.split_at(t);
                (Primitive::Arc(a0), Primitive::Arc(a1))
            }
            Primitive::Curve(cubic) => {
                let (c0, c1) = cubic.split_at(t);
                (Primitive::Curve(c0), Primitive::Curve(c1))
            }
        }
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        match self {
            Primitive::Line(line) | Primitive::Close(line) => line.bbox(init),
            Primitive::Arc(arc) => arc.bbox(init),
            Primitive::Curve(cubic) => cubic.bbox(init),
        }
    }
}

impl From<Line> for Primitive {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Primitive {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Cubic> for Primitive {
    fn from(cubic: Cubic) -> Self {
        Self::Curve(cubic)
    }
}
