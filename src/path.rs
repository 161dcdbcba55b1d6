//! Path is a collection of drawing commands split into segments

use crate::{Point, Segment, Transform};
use std::fmt;

/// Raw drawing command of a path.
///
/// Commands only carry the points they introduce, the starting point of each
/// drawing command is the endpoint of the previous one.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCmd {
    /// Move the current position without drawing, starts a new segment
    Move(Point),
    /// Straight line to the point
    Line(Point),
    /// Circular arc through the intermediate point to the endpoint
    Arc(Point, Point),
    /// Cubic bezier curve with two control points and an endpoint
    Curve(Point, Point, Point),
    /// Straight line back to the start of the segment
    Close,
}

impl fmt::Debug for PathCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCmd::Move(p) => write!(f, "Move {:?}", p),
            PathCmd::Line(p) => write!(f, "Line {:?}", p),
            PathCmd::Arc(p1, p2) => write!(f, "Arc {:?} {:?}", p1, p2),
            PathCmd::Curve(p1, p2, p3) => write!(f, "Curve {:?} {:?} {:?}", p1, p2, p3),
            PathCmd::Close => write!(f, "Close"),
        }
    }
}

/// Collection of raw drawing commands
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cmds.iter()).finish()
    }
}

impl Path {
    pub fn new(cmds: Vec<PathCmd>) -> Self {
        Self { cmds }
    }

    pub fn empty() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn cmds(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn into_cmds(self) -> Vec<PathCmd> {
        self.cmds
    }

    /// Apply affine transformation to every point of the path in place
    pub fn transform(&mut self, tr: Transform) {
        for cmd in self.cmds.iter_mut() {
            match cmd {
                PathCmd::Move(p) | PathCmd::Line(p) => *p = tr.apply(*p),
                PathCmd::Arc(p1, p2) => {
                    *p1 = tr.apply(*p1);
                    *p2 = tr.apply(*p2);
                }
                PathCmd::Curve(p1, p2, p3) => {
                    *p1 = tr.apply(*p1);
                    *p2 = tr.apply(*p2);
                    *p3 = tr.apply(*p3);
                }
                PathCmd::Close => {}
            }
        }
    }

    /// Path with all segments reversed, each traced from its end to its start
    pub fn reverse(&self) -> Path {
        let mut cmds = Vec::with_capacity(self.cmds.len());
        for segment in self.segments() {
            cmds.extend(segment.reversed().into_cmds());
        }
        Path::new(cmds)
    }

    /// Iterator over segments of the path
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            origin: Point::new(0.0, 0.0),
            cmds: &self.cmds,
            index: 0,
        }
    }

    pub fn segments_count(&self) -> usize {
        self.segments().count()
    }

    /// Segment of the path addressed by `index`, `None` when the path does
    /// not contain that many segments
    pub fn segment(&self, index: SegmentIndex) -> Option<Segment<'_>> {
        match index {
            SegmentIndex::First => self.segments().next(),
            SegmentIndex::Last => self.segments().last(),
            SegmentIndex::Nth(0) => None,
            SegmentIndex::Nth(nth) => self.segments().nth(nth - 1),
        }
    }
}

impl Extend<PathCmd> for Path {
    fn extend<T: IntoIterator<Item = PathCmd>>(&mut self, cmds: T) {
        self.cmds.extend(cmds)
    }
}

impl FromIterator<PathCmd> for Path {
    fn from_iter<T: IntoIterator<Item = PathCmd>>(iter: T) -> Self {
        Path::new(iter.into_iter().collect())
    }
}

/// 1-based segment address, with shortcuts for the boundary segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentIndex {
    First,
    Last,
    Nth(usize),
}

/// Iterator over segments of a path
///
/// A segment is a maximal run of drawing commands not interrupted by a move.
/// Redundant moves collapse, only the last one before a drawing command
/// defines the segment origin. A close terminates the segment it belongs to.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    origin: Point,
    cmds: &'a [PathCmd],
    index: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(PathCmd::Move(p)) = self.cmds.get(self.index) {
            self.origin = *p;
            self.index += 1;
        }
        let start = self.index;
        while let Some(cmd) = self.cmds.get(self.index) {
            match cmd {
                PathCmd::Move(_) => break,
                PathCmd::Close => {
                    self.index += 1;
                    break;
                }
                _ => self.index += 1,
            }
        }
        if self.index == start {
            return None;
        }
        Some(Segment::new(self.origin, &self.cmds[start..self.index]))
    }
}

/// Path builder similar to Canvas/Cairo interface
///
/// Drawing commands before any move start implicitly from the current
/// position, which is `(0, 0)` for a fresh builder.
#[derive(Clone)]
pub struct PathBuilder {
    position: Point,
    subpath_start: Point,
    has_current: bool,
    cmds: Vec<PathCmd>,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
            has_current: false,
            cmds: Vec::new(),
        }
    }

    /// Build the path
    pub fn build(self) -> Path {
        Path::new(self.cmds)
    }

    /// Current position of the builder
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move current position, starting a new segment
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.position = p.into();
        self.subpath_start = self.position;
        self.has_current = true;
        self.cmds.push(PathCmd::Move(self.position));
        self
    }

    /// Straight line from the current position
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.start_if_needed();
        self.position = p.into();
        self.cmds.push(PathCmd::Line(self.position));
        self
    }

    /// Circular arc from the current position through `mid` to `end`
    pub fn arc_to(&mut self, mid: impl Into<Point>, end: impl Into<Point>) -> &mut Self {
        self.start_if_needed();
        self.position = end.into();
        self.cmds.push(PathCmd::Arc(mid.into(), self.position));
        self
    }

    /// Cubic bezier curve from the current position
    pub fn curve_to(
        &mut self,
        c1: impl Into<Point>,
        c2: impl Into<Point>,
        end: impl Into<Point>,
    ) -> &mut Self {
        self.start_if_needed();
        self.position = end.into();
        self.cmds
            .push(PathCmd::Curve(c1.into(), c2.into(), self.position));
        self
    }

    /// Close current segment with a line back to its start
    pub fn close(&mut self) -> &mut Self {
        self.cmds.push(PathCmd::Close);
        self.position = self.subpath_start;
        self.has_current = false;
        self
    }

    fn start_if_needed(&mut self) {
        if !self.has_current {
            self.subpath_start = self.position;
            self.has_current = true;
            self.cmds.push(PathCmd::Move(self.position));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut builder = Path::builder();
        builder
            .move_to((1.0, 1.0))
            .line_to((3.0, 1.0))
            .arc_to((4.0, 2.0), (3.0, 3.0))
            .close();
        let path = builder.build();
        assert_eq!(
            path.cmds(),
            &[
                PathCmd::Move(Point::new(1.0, 1.0)),
                PathCmd::Line(Point::new(3.0, 1.0)),
                PathCmd::Arc(Point::new(4.0, 2.0), Point::new(3.0, 3.0)),
                PathCmd::Close,
            ]
        );
        assert_eq!(path.segments_count(), 1);
    }

    #[test]
    fn test_builder_implicit_move() {
        let mut builder = Path::builder();
        builder.line_to((2.0, 0.0));
        let path = builder.build();
        assert_eq!(
            path.cmds(),
            &[
                PathCmd::Move(Point::new(0.0, 0.0)),
                PathCmd::Line(Point::new(2.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_segments() {
        let mut builder = Path::builder();
        builder
            .move_to((5.0, 5.0)) // redundant, collapsed by the following move
            .move_to((0.0, 0.0))
            .line_to((1.0, 0.0))
            .line_to((1.0, 1.0))
            .close()
            .move_to((3.0, 3.0))
            .curve_to((4.0, 4.0), (5.0, 4.0), (6.0, 3.0));
        let path = builder.build();

        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].origin(), Point::new(0.0, 0.0));
        assert!(segments[0].is_closed());
        assert_eq!(segments[1].origin(), Point::new(3.0, 3.0));
        assert!(!segments[1].is_closed());

        assert_eq!(path.segment(SegmentIndex::First), Some(segments[0]));
        assert_eq!(path.segment(SegmentIndex::Last), Some(segments[1]));
        assert_eq!(path.segment(SegmentIndex::Nth(2)), Some(segments[1]));
        assert_eq!(path.segment(SegmentIndex::Nth(0)), None);
        assert_eq!(path.segment(SegmentIndex::Nth(3)), None);
    }

    #[test]
    fn test_trailing_move_produces_no_segment() {
        let mut builder = Path::builder();
        builder.move_to((1.0, 1.0)).line_to((2.0, 2.0)).move_to((3.0, 3.0));
        let path = builder.build();
        assert_eq!(path.segments_count(), 1);
    }

    #[test]
    fn test_transform() {
        let mut builder = Path::builder();
        builder.move_to((1.0, 0.0)).line_to((2.0, 0.0));
        let mut path = builder.build();
        path.transform(Transform::default().translate(0.0, 3.0));
        assert_eq!(
            path.cmds(),
            &[
                PathCmd::Move(Point::new(1.0, 3.0)),
                PathCmd::Line(Point::new(2.0, 3.0)),
            ]
        );
    }

    #[test]
    fn test_reverse() {
        let mut builder = Path::builder();
        builder
            .move_to((0.0, 0.0))
            .line_to((1.0, 0.0))
            .line_to((1.0, 1.0));
        let path = builder.build();
        let reversed = path.reverse();
        assert_eq!(
            reversed.cmds(),
            &[
                PathCmd::Move(Point::new(1.0, 1.0)),
                PathCmd::Line(Point::new(1.0, 0.0)),
                PathCmd::Line(Point::new(0.0, 0.0)),
            ]
        );
        assert_eq!(reversed.reverse(), path);

        let seg = path.segment(SegmentIndex::First).unwrap();
        let rev_seg = reversed.segment(SegmentIndex::First).unwrap();
        assert_eq!(seg.start(), rev_seg.end());
        assert_eq!(seg.end(), rev_seg.start());
    }
}
