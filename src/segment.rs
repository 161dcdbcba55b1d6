//! Segment is a single connected run of primitives inside a path

use crate::{
    Curve, Line, Path, PathCmd, Point, Primitive, Result, Scalar, Transform,
    intersect::{self, DEFAULT_TOLERANCE},
    offset::{OffsetAlgorithm, primitive_offset},
};

/// Connected run of drawing commands sharing one origin.
///
/// Borrows the command slice from its path, the slice never contains a move
/// and holds a close only as its last command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    origin: Point,
    cmds: &'a [PathCmd],
}

impl<'a> Segment<'a> {
    pub(crate) fn new(origin: Point, cmds: &'a [PathCmd]) -> Self {
        Self { origin, cmds }
    }

    /// Point at which segment starts
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Drawing commands of the segment, without the leading move
    pub fn cmds(&self) -> &'a [PathCmd] {
        self.cmds
    }

    pub fn start(&self) -> Point {
        self.origin
    }

    /// Endpoint of the last primitive, equals the origin for closed segments
    pub fn end(&self) -> Point {
        self.primitives()
            .last()
            .map_or(self.origin, |prim| prim.end())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.cmds.last(), Some(PathCmd::Close))
    }

    /// Iterator over typed primitives of the segment
    pub fn primitives(&self) -> PrimitiveIter<'a> {
        PrimitiveIter {
            origin: self.origin,
            seg_origin: self.origin,
            cmds: self.cmds,
            index: 0,
        }
    }

    pub fn primitives_count(&self) -> usize {
        self.cmds.len()
    }

    /// Sum of the arc lengths of all primitives
    pub fn length(&self) -> Scalar {
        self.primitives().map(|prim| prim.length()).sum()
    }

    /// Standalone path tracing only this segment
    pub fn to_path(&self) -> Path {
        let mut cmds = Vec::with_capacity(self.cmds.len() + 1);
        cmds.push(PathCmd::Move(self.origin));
        cmds.extend_from_slice(self.cmds);
        Path::new(cmds)
    }

    /// Standalone path tracing this segment with `tr` applied
    pub fn transformed(&self, tr: Transform) -> Path {
        let mut path = self.to_path();
        path.transform(tr);
        path
    }

    /// Standalone path tracing this segment from its end to its start.
    ///
    /// A closed segment stays closed, the explicit closing line of the input
    /// becomes the implicit one of the output.
    pub fn reversed(&self) -> Path {
        let prims: Vec<_> = self.primitives().collect();
        let closed = self.is_closed();
        let mut cmds = Vec::with_capacity(prims.len() + 1);
        cmds.push(PathCmd::Move(self.end()));
        for prim in prims.iter().rev() {
            let reversed = match prim {
                Primitive::Close(line) => Primitive::Line(line.reverse()),
                prim => prim.reverse(),
            };
            cmds.push(reversed.to_cmd());
        }
        if closed {
            if let Some(last @ PathCmd::Line(_)) = cmds.last_mut() {
                *last = PathCmd::Close;
            }
        }
        Path::new(cmds)
    }

    /// Segment shifted by `dist` along the local normal.
    ///
    /// Every primitive is offset on its own, then consecutive primitives are
    /// joined back by extending them to the intersection of their end
    /// tangents. Positive distance shifts towards the left of the direction
    /// of travel.
    pub fn offset(&self, dist: Scalar, algorithm: OffsetAlgorithm) -> Result<Path> {
        let mut prims = Vec::with_capacity(self.cmds.len());
        for prim in self.primitives() {
            prims.push(primitive_offset(&prim, dist, algorithm)?);
        }
        for index in 1..prims.len() {
            let (head, tail) = prims.split_at_mut(index);
            let p0 = &mut head[index - 1];
            let p1 = &mut tail[0];
            if let Err(error) = intersect::join(p0, p1) {
                // leave a corner gap rather than fail the whole offset
                tracing::debug!(?error, index, "offset join skipped");
            }
        }
        let mut cmds = Vec::with_capacity(prims.len() + 1);
        if let Some(first) = prims.first() {
            cmds.push(PathCmd::Move(first.org()));
        }
        cmds.extend(prims.iter().map(|prim| prim.to_cmd()));
        Ok(Path::new(cmds))
    }

    /// Points where this segment intersects the other one, at most `max` of
    /// them
    pub fn intersections(&self, other: &Segment<'_>, max: usize) -> Vec<Point> {
        let mut result = Vec::new();
        'outer: for p0 in self.primitives() {
            for p1 in other.primitives() {
                for point in intersect::primitive_intersect(&p0, &p1, DEFAULT_TOLERANCE) {
                    if result.len() >= max {
                        break 'outer;
                    }
                    result.push(point);
                }
            }
        }
        result
    }
}

/// Iterator over typed primitives of a segment, threads the endpoint of each
/// command as the origin of the next one
#[derive(Debug, Clone)]
pub struct PrimitiveIter<'a> {
    origin: Point,
    seg_origin: Point,
    cmds: &'a [PathCmd],
    index: usize,
}

impl PrimitiveIter<'_> {
    /// Rewind the iterator back to the first primitive
    pub fn reset(&mut self) {
        self.origin = self.seg_origin;
        self.index = 0;
    }
}

impl Iterator for PrimitiveIter<'_> {
    type Item = Primitive;

    fn next(&mut self) -> Option<Self::Item> {
        let cmd = self.cmds.get(self.index)?;
        self.index += 1;
        let prim = match *cmd {
            PathCmd::Line(p) => Primitive::Line(Line::new(self.origin, p)),
            PathCmd::Arc(p1, p2) => Primitive::Arc(crate::Arc::new(self.origin, p1, p2)),
            PathCmd::Curve(p1, p2, p3) => {
                Primitive::Curve(crate::Cubic::new(self.origin, p1, p2, p3))
            }
            PathCmd::Close => Primitive::Close(Line::new(self.origin, self.seg_origin)),
            PathCmd::Move(_) => unreachable!("segments never contain moves"),
        };
        self.origin = prim.end();
        Some(prim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, PI, SegmentIndex, assert_approx_eq};

    fn single_segment(path: &Path) -> Segment<'_> {
        path.segment(SegmentIndex::First).unwrap()
    }

    #[test]
    fn test_primitives() {
        let mut builder = Path::builder();
        builder
            .move_to((0.0, 0.0))
            .line_to((2.0, 0.0))
            .arc_to((3.0, 1.0), (2.0, 2.0))
            .close();
        let path = builder.build();
        let segment = single_segment(&path);
        let prims: Vec<_> = segment.primitives().collect();
        assert_eq!(prims.len(), 3);
        assert_eq!(
            prims[0],
            Primitive::Line(Line::new((0.0, 0.0), (2.0, 0.0)))
        );
        assert_eq!(prims[0].end(), prims[1].org());
        assert_eq!(
            prims[2],
            Primitive::Close(Line::new((2.0, 2.0), (0.0, 0.0)))
        );
        assert_eq!(segment.end(), segment.origin());
    }

    #[test]
    fn test_to_path_round_trip() {
        let mut builder = Path::builder();
        builder
            .move_to((1.0, 2.0))
            .curve_to((2.0, 3.0), (3.0, 3.0), (4.0, 2.0))
            .line_to((5.0, 0.0));
        let path = builder.build();
        let segment = single_segment(&path);
        assert_eq!(segment.to_path(), path);
    }

    #[test]
    fn test_length() {
        let mut builder = Path::builder();
        builder
            .move_to((0.0, 0.0))
            .line_to((3.0, 0.0))
            .arc_to((4.0, 1.0), (5.0, 0.0))
            .close();
        let path = builder.build();
        let segment = single_segment(&path);
        // line 3 + half circle of radius 1 + closing line 5
        assert_approx_eq!(segment.length(), 3.0 + PI + 5.0, 1e-9);
    }

    #[test]
    fn test_reversed_closed() {
        let mut builder = Path::builder();
        builder
            .move_to((0.0, 0.0))
            .line_to((4.0, 0.0))
            .line_to((4.0, 4.0))
            .close();
        let path = builder.build();
        let segment = single_segment(&path);
        let reversed = segment.reversed();
        assert_eq!(
            reversed.cmds(),
            &[
                PathCmd::Move(Point::new(0.0, 0.0)),
                PathCmd::Line(Point::new(4.0, 4.0)),
                PathCmd::Line(Point::new(4.0, 0.0)),
                PathCmd::Close,
            ]
        );
        assert!(single_segment(&reversed).is_closed());
        assert_eq!(single_segment(&reversed).reversed(), path);
    }

    #[test]
    fn test_offset_line() {
        let mut builder = Path::builder();
        builder.move_to((0.0, 0.0)).line_to((4.0, 0.0));
        let path = builder.build();
        let offset = single_segment(&path)
            .offset(1.0, OffsetAlgorithm::Geometrical)
            .unwrap();
        assert_eq!(
            offset.cmds(),
            &[
                PathCmd::Move(Point::new(0.0, 1.0)),
                PathCmd::Line(Point::new(4.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_offset_unset_point() {
        let mut builder = Path::builder();
        builder.move_to((0.0, 0.0)).line_to(Point::UNSET);
        let path = builder.build();
        let result = single_segment(&path).offset(1.0, OffsetAlgorithm::Geometrical);
        assert_eq!(result, Err(Error::InvalidOperand));
    }

    #[test]
    fn test_offset_corner_joined() {
        let mut builder = Path::builder();
        builder
            .move_to((0.0, 0.0))
            .line_to((4.0, 0.0))
            .line_to((4.0, 4.0));
        let path = builder.build();
        // travelling right then up, the left side is the inner corner
        let offset = single_segment(&path)
            .offset(1.0, OffsetAlgorithm::Geometrical)
            .unwrap();
        assert_eq!(
            offset.cmds(),
            &[
                PathCmd::Move(Point::new(0.0, 1.0)),
                PathCmd::Line(Point::new(3.0, 1.0)),
                PathCmd::Line(Point::new(3.0, 4.0)),
            ]
        );
    }

    #[test]
    fn test_intersections() {
        let mut b0 = Path::builder();
        b0.move_to((0.0, 0.0)).line_to((4.0, 4.0));
        let p0 = b0.build();
        let mut b1 = Path::builder();
        b1.move_to((0.0, 4.0)).line_to((4.0, 0.0));
        let p1 = b1.build();
        let found =
            single_segment(&p0).intersections(&single_segment(&p1), 16);
        assert_eq!(found, vec![Point::new(2.0, 2.0)]);

        let mut b2 = Path::builder();
        b2.move_to((0.0, 1.0)).line_to((4.0, 5.0));
        let p2 = b2.build();
        let none = single_segment(&p0).intersections(&single_segment(&p2), 16);
        assert!(none.is_empty());
    }

    #[test]
    fn test_intersections_max() {
        let mut b0 = Path::builder();
        b0.move_to((0.0, 1.0)).line_to((8.0, 1.0));
        let line = b0.build();
        let mut b1 = Path::builder();
        b1.move_to((0.0, 0.0))
            .curve_to((1.0, 2.0), (2.0, 2.0), (3.0, 0.0))
            .curve_to((4.0, 2.0), (5.0, 2.0), (6.0, 0.0));
        let arches = b1.build();
        let capped = single_segment(&line).intersections(&single_segment(&arches), 1);
        assert_eq!(capped.len(), 1);
    }
}
