//! Intersection of primitives and tangent based joining

use crate::{Curve, Error, Line, Point, Primitive, Result, Scalar};

/// Default bounding box size at which subdivision stops
pub const DEFAULT_TOLERANCE: Scalar = 1e-6;

fn is_line_like(prim: &Primitive) -> bool {
    matches!(prim, Primitive::Line(_) | Primitive::Close(_))
}

fn as_line(prim: &Primitive) -> Line {
    match prim {
        Primitive::Line(line) | Primitive::Close(line) => *line,
        _ => Line::new(prim.start(), prim.end()),
    }
}

/// Find intersection points of two primitives.
///
/// Two straight primitives are intersected analytically as infinite lines,
/// producing at most one point. Any pair involving a curved primitive falls
/// back to recursive bounding box subdivision: the pair is split in half
/// until the boxes shrink below `tolerance`, the centers of the remaining
/// box overlaps are the intersection points.
pub fn primitive_intersect(p0: &Primitive, p1: &Primitive, tolerance: Scalar) -> Vec<Point> {
    // an unset point poisons every bounding box and subdivision never
    // terminates, reject it at entry
    if p0.ensure_set().is_err() || p1.ensure_set().is_err() {
        return Vec::new();
    }
    if is_line_like(p0) && is_line_like(p1) {
        let l0 = as_line(p0);
        return match l0.intersect(as_line(p1)) {
            None => Vec::new(),
            Some((t0, _)) => vec![l0.at(t0)],
        };
    }

    let mut queue = vec![(*p0, *p1)];
    let mut result: Vec<Point> = Vec::new();
    while let Some((s0, s1)) = queue.pop() {
        let b0 = s0.bbox(None);
        let b1 = s1.bbox(None);
        let Some(overlap) = b0.intersect(b1) else {
            continue;
        };
        let b0_small = b0.width() < tolerance && b0.height() < tolerance;
        let b1_small = b1.width() < tolerance && b1.height() < tolerance;
        if b0_small && b1_small {
            let candidate = overlap.diag_mid();
            // subdivision finds the same point many times, keep one
            if result
                .iter()
                .all(|found| found.dist(candidate) > 4.0 * tolerance)
            {
                result.push(candidate);
            }
            continue;
        }
        let (s00, s01) = s0.split();
        let (s10, s11) = s1.split();
        queue.push((s00, s10));
        queue.push((s00, s11));
        queue.push((s01, s10));
        queue.push((s01, s11));
    }
    result
}

/// Join two consecutive primitives by extending them to the intersection of
/// their end tangents.
///
/// The endpoint of `p0` and the origin of `p1` are both moved to the point
/// where the tangent ray leaving `p0` meets the tangent ray entering `p1`.
/// Primitives that already meet are left untouched. Parallel or vanishing
/// tangents make the join impossible and leave both primitives unmodified.
pub fn join(p0: &mut Primitive, p1: &mut Primitive) -> Result<()> {
    p0.ensure_set()?;
    p1.ensure_set()?;
    if p0.end() == p1.start() {
        return Ok(());
    }
    let t0 = p0.tangent_at(1.0);
    let t1 = p1.tangent_at(0.0);
    if t0.normalize().is_none() || t1.normalize().is_none() {
        return Err(Error::Degenerate("vanishing tangent at join"));
    }
    let ray0 = Line::new(p0.end(), p0.end() + t0);
    let ray1 = Line::new(p1.start(), p1.start() + t1);
    let Some((t, _)) = ray0.intersect(ray1) else {
        return Err(Error::Degenerate("parallel tangents at join"));
    };
    let point = ray0.at(t);
    p0.set_point(-1, point)?;
    p1.set_org(point);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cubic;

    #[test]
    fn test_line_line() {
        let l0: Primitive = Line::new((0.0, 0.0), (4.0, 4.0)).into();
        let l1: Primitive = Line::new((0.0, 4.0), (4.0, 0.0)).into();
        assert_eq!(
            primitive_intersect(&l0, &l1, DEFAULT_TOLERANCE),
            vec![Point::new(2.0, 2.0)]
        );

        let parallel: Primitive = Line::new((0.0, 1.0), (4.0, 5.0)).into();
        assert!(primitive_intersect(&l0, &parallel, DEFAULT_TOLERANCE).is_empty());

        // straight primitives intersect as infinite lines
        let short: Primitive = Line::new((3.0, 0.0), (3.0, 1.0)).into();
        assert_eq!(
            primitive_intersect(&l0, &short, DEFAULT_TOLERANCE),
            vec![Point::new(3.0, 3.0)]
        );
    }

    #[test]
    fn test_curve_line() {
        // arch with y(t) = 6 t (1 - t) and x(t) = 3 t
        let arch: Primitive = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let line: Primitive = Line::new((0.0, 1.0), (3.0, 1.0)).into();
        let mut found = primitive_intersect(&arch, &line, DEFAULT_TOLERANCE);
        found.sort_by(|a, b| a.x().total_cmp(&b.x()));
        assert_eq!(found.len(), 2);

        let sqrt3 = (3.0 as Scalar).sqrt();
        assert!(found[0].dist(Point::new((3.0 - sqrt3) / 2.0, 1.0)) < 1e-3);
        assert!(found[1].dist(Point::new((3.0 + sqrt3) / 2.0, 1.0)) < 1e-3);
    }

    #[test]
    fn test_curve_curve() {
        let arch: Primitive = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let valley: Primitive =
            Cubic::new((0.0, 2.0), (1.0, 0.0), (2.0, 0.0), (3.0, 2.0)).into();
        let found = primitive_intersect(&arch, &valley, DEFAULT_TOLERANCE);
        assert_eq!(found.len(), 2);
        for point in found {
            // both curves are mirror images around y = 1
            assert!((point.y() - 1.0).abs() < 1e-3, "{:?}", point);
        }
    }

    #[test]
    fn test_curve_miss() {
        let arch: Primitive = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let above: Primitive = Line::new((0.0, 3.0), (3.0, 3.0)).into();
        assert!(primitive_intersect(&arch, &above, DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn test_unset_point_rejected() {
        let bad: Primitive =
            Cubic::new(Point::UNSET, (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let line: Primitive = Line::new((0.0, 1.0), (3.0, 1.0)).into();
        assert!(primitive_intersect(&bad, &line, DEFAULT_TOLERANCE).is_empty());
        assert!(primitive_intersect(&line, &bad, DEFAULT_TOLERANCE).is_empty());

        let bad_line: Primitive = Line::new(Point::UNSET, Point::new(1.0, 0.0)).into();
        assert!(primitive_intersect(&bad_line, &line, DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn test_join_lines() {
        let mut p0: Primitive = Line::new((0.0, 0.0), (2.0, 0.0)).into();
        let mut p1: Primitive = Line::new((3.0, 1.0), (3.0, 3.0)).into();
        join(&mut p0, &mut p1).unwrap();
        assert_eq!(p0.end(), Point::new(3.0, 0.0));
        assert_eq!(p1.org(), Point::new(3.0, 0.0));

        // joined primitives are a fixed point
        let (p0_before, p1_before) = (p0, p1);
        join(&mut p0, &mut p1).unwrap();
        assert_eq!(p0, p0_before);
        assert_eq!(p1, p1_before);
    }

    #[test]
    fn test_join_parallel() {
        let mut p0: Primitive = Line::new((0.0, 0.0), (2.0, 0.0)).into();
        let mut p1: Primitive = Line::new((3.0, 1.0), (5.0, 1.0)).into();
        let p1_before = p1;
        assert_eq!(
            join(&mut p0, &mut p1),
            Err(Error::Degenerate("parallel tangents at join"))
        );
        assert_eq!(p1, p1_before);
    }

    #[test]
    fn test_join_unset() {
        let mut p0: Primitive = Line::new(Point::UNSET, Point::new(2.0, 0.0)).into();
        let mut p1: Primitive = Line::new((3.0, 1.0), (3.0, 3.0)).into();
        assert_eq!(join(&mut p0, &mut p1), Err(Error::InvalidOperand));
    }
}
