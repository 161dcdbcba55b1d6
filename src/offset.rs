//! Parallel offset of primitives

use crate::{Arc, Cubic, Curve, EPSILON, Error, Line, Point, Primitive, Result, Scalar};

/// Strategy used to approximate the offset of a cubic bezier curve.
///
/// The true offset of a bezier curve is not a bezier curve, every algorithm
/// rebuilds a cubic that approximates it while keeping the exact offset
/// endpoints and end tangent directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffsetAlgorithm {
    /// Least squares fit of the handle lengths against sampled offset points
    #[default]
    Baioca,
    /// Handle lengths solved so the curve passes through the exact offset
    /// midpoint
    Handcraft,
    /// Offset of the control polygon sides, no error control
    Geometrical,
}

/// Point of the offset curve at parameter `t`, the source point shifted by
/// `dist` along the curve normal
pub fn curve_offset_at(curve: &Cubic, t: Scalar, dist: Scalar) -> Result<Point> {
    if curve.points().iter().any(|p| p.is_unset()) {
        return Err(Error::InvalidOperand);
    }
    let normal = curve
        .tangent_at(t)
        .normal()
        .normalize()
        .ok_or(Error::Degenerate("vanishing tangent"))?;
    Ok(curve.at(t) + dist * normal)
}

pub(crate) fn primitive_offset(
    prim: &Primitive,
    dist: Scalar,
    algorithm: OffsetAlgorithm,
) -> Result<Primitive> {
    prim.ensure_set()?;
    match prim {
        Primitive::Line(line) => Ok(Primitive::Line(line_offset(line, dist)?)),
        // the closing line becomes explicit, its offset no longer ends at
        // the segment origin
        Primitive::Close(line) => Ok(Primitive::Line(line_offset(line, dist)?)),
        Primitive::Arc(arc) => Ok(Primitive::Arc(arc_offset(arc, dist)?)),
        Primitive::Curve(cubic) => Ok(Primitive::Curve(cubic_offset(cubic, dist, algorithm)?)),
    }
}

fn line_offset(line: &Line, dist: Scalar) -> Result<Line> {
    let shift = dist
        * line
            .direction()
            .normal()
            .normalize()
            .ok_or(Error::Degenerate("zero length line"))?;
    let [p0, p1] = line.points();
    Ok(Line::new(p0 + shift, p1 + shift))
}

/// Offset of a circular arc is an exact circular arc, each of the three
/// defining points moves along its local normal
fn arc_offset(arc: &Arc, dist: Scalar) -> Result<Arc> {
    let mut points = arc.points();
    for (point, t) in points.iter_mut().zip([0.0, 0.5, 1.0]) {
        let normal = arc
            .tangent_at(t)
            .normal()
            .normalize()
            .ok_or(Error::Degenerate("vanishing tangent"))?;
        *point = *point + dist * normal;
    }
    let [p0, p1, p2] = points;
    Ok(Arc::new(p0, p1, p2))
}

/// Cubic approximating the parallel offset of `cubic` at distance `dist`
pub fn cubic_offset(cubic: &Cubic, dist: Scalar, algorithm: OffsetAlgorithm) -> Result<Cubic> {
    if cubic.points().iter().any(|p| p.is_unset()) {
        return Err(Error::InvalidOperand);
    }
    match algorithm {
        OffsetAlgorithm::Geometrical => geometrical_offset(cubic, dist),
        OffsetAlgorithm::Handcraft => handcraft_offset(cubic, dist),
        OffsetAlgorithm::Baioca => baioca_offset(cubic, dist),
    }
}

/// Offset each side of the control polygon and intersect adjacent sides to
/// recover the control points, in the manner of Tiller and Hanson
fn geometrical_offset(cubic: &Cubic, dist: Scalar) -> Result<Cubic> {
    // result of `polyline_offset` handles closed and open polylines, for
    // the control polygon of a cubic it always produces four points
    let mut points = cubic.points();
    if !polyline_offset(&mut points, dist) {
        return Err(Error::Degenerate("zero length control polygon"));
    }
    let [p0, p1, p2, p3] = points;
    Ok(Cubic::new(p0, p1, p2, p3))
}

/// Offset polyline specified by points `ps`, and distance `dist`
///
/// Implementation correctly handles repeated points. Returns false if
/// polyline is empty or contains only repeated points.
fn polyline_offset(ps: &mut [Point], dist: Scalar) -> bool {
    if ps.is_empty() {
        return false;
    }
    // find first non-repeating point
    let mut prev = match ps.iter().position(|p| !p.is_close_to(ps[0])) {
        None => return false,
        Some(index) => {
            let prev = Line::new(ps[index - 1], ps[index]);
            let offset = match prev.direction().normal().normalize() {
                None => return false,
                Some(normal) => dist * normal,
            };
            for p in &mut ps[..index] {
                *p = *p + offset;
            }
            prev
        }
    };
    // offset all the points
    let mut index = 1;
    while index < ps.len() {
        let next = match ps[index..].iter().position(|p| !p.is_close_to(ps[index])) {
            None => {
                // offset all remaining points
                let offset = match prev.direction().normal().normalize() {
                    None => return false,
                    Some(normal) => dist * normal,
                };
                for p in &mut ps[index..] {
                    *p = *p + offset;
                }
                return true;
            }
            Some(next_index) => {
                let next = Line::new(ps[index + next_index - 1], ps[index + next_index]);
                // offset repeated points
                let offset = match prev.direction().normal().normalize() {
                    None => return false,
                    Some(normal) => dist * normal,
                };
                for p in &mut ps[index..index + next_index - 1] {
                    *p = *p + offset;
                }
                index += next_index;
                next
            }
        };
        // find intersection between two offset lines
        let prev_offset = line_offset(&prev, dist)
            .expect("non repeating points produce non degenerate offsets");
        let next_offset = line_offset(&next, dist)
            .expect("non repeating points produce non degenerate offsets");
        ps[index - 1] = match prev_offset.intersect(next_offset) {
            Some((t, _)) => prev_offset.at(t),
            None => prev_offset.end(),
        };
        prev = next;
    }
    // offset last point
    match prev.direction().normal().normalize() {
        None => false,
        Some(normal) => {
            if let Some(last) = ps.last_mut() {
                *last = *last + dist * normal;
            }
            true
        }
    }
}

/// Offset endpoints exactly, then choose handle lengths along the end
/// tangents so the curve passes through the exact offset midpoint
fn handcraft_offset(cubic: &Cubic, dist: Scalar) -> Result<Cubic> {
    let (head, tail) = cubic.ends();
    let u0 = head
        .direction()
        .normalize()
        .ok_or(Error::Degenerate("zero length control polygon"))?;
    let u3 = tail
        .direction()
        .normalize()
        .ok_or(Error::Degenerate("zero length control polygon"))?;
    let p0 = cubic.start() + dist * u0.normal();
    let p3 = cubic.end() + dist * u3.normal();
    let mid = curve_offset_at(cubic, 0.5, dist)?;

    // at(1/2) = (p0 + p3) / 8 + 3 (p1 + p2) / 8 with p1 = p0 + r0 u0 and
    // p2 = p3 - r3 u3 reduces to r0 u0 - r3 u3 = (8 mid - 4 p0 - 4 p3) / 3
    let rhs = (8.0 * mid - 4.0 * p0 - 4.0 * p3) / 3.0;
    let det = u0.cross(-1.0 * u3);
    if det.abs() < EPSILON {
        // tangents are parallel, the midpoint constraint is singular
        tracing::debug!("parallel end tangents, falling back to control polygon offset");
        return geometrical_offset(cubic, dist);
    }
    let r0 = rhs.cross(-1.0 * u3) / det;
    let r3 = u0.cross(rhs) / det;
    Ok(Cubic::new(p0, p0 + r0 * u0, p3 - r3 * u3, p3))
}

/// Seed the handle lengths with the midpoint fit, then refine them by least
/// squares against foot points of exact offset samples.
///
/// The offset curve is parametrized differently from the source, so the
/// residual of each sample is taken against its closest point on the current
/// candidate rather than at the matching parameter. A refinement step is
/// kept only when it reduces the worst sample distance, the seed is the
/// fallback.
fn baioca_offset(cubic: &Cubic, dist: Scalar) -> Result<Cubic> {
    let (head, tail) = cubic.ends();
    let u0 = head
        .direction()
        .normalize()
        .ok_or(Error::Degenerate("zero length control polygon"))?;
    let u3 = tail
        .direction()
        .normalize()
        .ok_or(Error::Degenerate("zero length control polygon"))?;
    let seed = handcraft_offset(cubic, dist)?;
    let p0 = seed.start();
    let p3 = seed.end();
    let samples: Vec<Point> = curve_offset_samples(cubic, dist, 17).collect();
    if samples.is_empty() {
        return Ok(seed);
    }

    let mut fit = seed;
    let mut best = worst_sample_dist(&fit, &samples);
    for _ in 0..4 {
        // minimize sum |b(s_i) - q_i|^2 over the handle lengths r0 and r3,
        // where q_i are the exact offset points, s_i their foot point
        // parameters on the current candidate, and b the candidate with
        // p1 = p0 + r0 u0 and p2 = p3 - r3 u3
        let mut a00 = 0.0;
        let mut a01 = 0.0;
        let mut a11 = 0.0;
        let mut c0 = 0.0;
        let mut c1 = 0.0;
        for q in samples.iter().copied() {
            let s = closest_param(&fit, q);
            let (s1, s_1) = (s, 1.0 - s);
            let b0 = s_1 * s_1 * s_1;
            let b1 = 3.0 * s_1 * s_1 * s1;
            let b2 = 3.0 * s_1 * s1 * s1;
            let b3 = s1 * s1 * s1;
            // residual e = f r0 + g r3 - rhs
            let f = b1 * u0;
            let g = -b2 * u3;
            let rhs = q - (b0 + b1) * p0 - (b2 + b3) * p3;
            a00 += f.dot(f);
            a01 += f.dot(g);
            a11 += g.dot(g);
            c0 += f.dot(rhs);
            c1 += g.dot(rhs);
        }
        let det = a00 * a11 - a01 * a01;
        if det.abs() < EPSILON {
            tracing::debug!("singular normal equations, keeping the midpoint fit");
            break;
        }
        let r0 = (c0 * a11 - a01 * c1) / det;
        let r3 = (a00 * c1 - a01 * c0) / det;
        let candidate = Cubic::new(p0, p0 + r0 * u0, p3 - r3 * u3, p3);
        let error = worst_sample_dist(&candidate, &samples);
        if error >= best {
            break;
        }
        best = error;
        fit = candidate;
    }
    Ok(fit)
}

/// Parameter of the point on the curve closest to `point`, on a dense grid
fn closest_param(curve: &Cubic, point: Point) -> Scalar {
    let mut best = (Scalar::INFINITY, 0.0);
    for i in 0..=64 {
        let t = i as Scalar / 64.0;
        let d = curve.at(t).dist_sq(point);
        if d < best.0 {
            best = (d, t);
        }
    }
    best.1
}

/// Largest distance from any of the sample points to the curve
fn worst_sample_dist(curve: &Cubic, samples: &[Point]) -> Scalar {
    samples.iter().fold(0.0, |worst, q| {
        worst.max(curve.at(closest_param(curve, *q)).dist(*q))
    })
}

/// Offset points of the curve sampled at `count` evenly spaced parameters,
/// skipping parameters where the tangent vanishes
pub fn curve_offset_samples(
    cubic: &Cubic,
    dist: Scalar,
    count: usize,
) -> impl Iterator<Item = Point> + '_ {
    (0..count).filter_map(move |i| {
        let t = if count < 2 {
            0.0
        } else {
            i as Scalar / (count - 1) as Scalar
        };
        curve_offset_at(cubic, t, dist).ok()
    })
}
