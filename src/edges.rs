//! Silhouette edge extraction from a path outline

use crate::{
    Curve, EPSILON_SQRT, PI, Path, PathCmd, Point, Primitive, Scalar, SegmentIndex, Transform,
};
use std::rc::{Rc, Weak};

/// Corners sharper than this angle (in radians) produce an edge vertex
pub const DEFAULT_CRITICAL_ANGLE: Scalar = PI / 45.0;

/// Derives the silhouette edges of an outline path.
///
/// Walks the first segment of the source path and collects the points where
/// two consecutive primitives meet at a sharp corner, or where the incoming
/// tangent is perpendicular to the symmetry axis. Vertexes facing each other
/// across the axis are paired into straight edge lines.
///
/// The source path is referenced weakly, so an edge set never keeps its
/// outline alive. The derived path is cached and recomputed lazily when the
/// source or any parameter changes.
#[derive(Debug, Clone)]
pub struct Edges {
    source: Option<Weak<Path>>,
    critical_angle: Scalar,
    axis_angle: Scalar,
    cache: Option<Path>,
}

impl Default for Edges {
    fn default() -> Self {
        Self {
            source: None,
            critical_angle: DEFAULT_CRITICAL_ANGLE,
            axis_angle: 0.0,
            cache: None,
        }
    }
}

impl Edges {
    pub fn new(source: &Rc<Path>) -> Self {
        Self {
            source: Some(Rc::downgrade(source)),
            ..Self::default()
        }
    }

    /// Outline path the edges are derived from, `None` when the source was
    /// never set or has been dropped
    pub fn source(&self) -> Option<Rc<Path>> {
        self.source.as_ref()?.upgrade()
    }

    pub fn set_source(&mut self, source: &Rc<Path>) {
        self.source = Some(Rc::downgrade(source));
        self.cache = None;
    }

    pub fn clear_source(&mut self) {
        self.source = None;
        self.cache = None;
    }

    pub fn critical_angle(&self) -> Scalar {
        self.critical_angle
    }

    /// Change the corner angle above which a vertex is considered sharp
    pub fn set_critical_angle(&mut self, angle: Scalar) {
        if self.critical_angle != angle {
            self.critical_angle = angle;
            self.cache = None;
        }
    }

    pub fn axis_angle(&self) -> Scalar {
        self.axis_angle
    }

    /// Rotate the symmetry axis the outline is mirrored around
    pub fn set_axis_angle(&mut self, angle: Scalar) {
        if self.axis_angle != angle {
            self.axis_angle = angle;
            self.cache = None;
        }
    }

    /// Derived edge path, computed on first access and cached.
    ///
    /// A dropped source invalidates the cache, the same as changing any of
    /// the parameters.
    pub fn path(&mut self) -> &Path {
        if let Some(weak) = self.source.as_ref() {
            if weak.upgrade().is_none() {
                tracing::debug!("edge source dropped, clearing");
                self.source = None;
                self.cache = None;
            }
        }
        if self.cache.is_none() {
            let path = self.compute_path();
            self.cache = Some(path);
        }
        self.cache.get_or_insert_with(Path::empty)
    }

    fn compute_path(&self) -> Path {
        let Some(source) = self.source.as_ref().and_then(Weak::upgrade) else {
            return Path::empty();
        };
        let Some(segment) = source.segment(SegmentIndex::First) else {
            return Path::empty();
        };

        // sharpness is measured as the squared distance between the unit
        // tangents on both sides of the junction
        let threshold = 2.0 * self.critical_angle.sin().powi(2);
        let unrotate = Transform::default().rotate(-self.axis_angle);
        let rotate = Transform::default().rotate(self.axis_angle);

        let mut vertices: Vec<Point> = Vec::new();
        let mut prev: Option<Primitive> = None;
        for prim in segment.primitives() {
            if let Some(prev) = prev {
                let before = prev.tangent_at(1.0).normalize();
                let after = prim.tangent_at(0.0).normalize();
                let sharp = match (before, after) {
                    (Some(before), Some(after)) => before.dist_sq(after) > threshold,
                    _ => false,
                };
                let vertical = after
                    .map(|after| unrotate.apply_vector(after).x().abs() < EPSILON_SQRT)
                    .unwrap_or(false);
                if sharp || vertical {
                    vertices.push(unrotate.apply(prim.start()));
                }
            }
            prev = Some(prim);
        }

        // consecutive vertices sharing an abscissa describe the same feature
        // seen from both sides of a vertical tangent, keep the farther one
        let mut collapsed: Vec<Point> = Vec::new();
        for vertex in vertices {
            match collapsed.last_mut() {
                Some(last) if (last.x() - vertex.x()).abs() <= EPSILON_SQRT => {
                    if vertex.y().abs() > last.y().abs() {
                        *last = vertex;
                    }
                }
                _ => collapsed.push(vertex),
            }
        }

        // pair each vertex with the first following one at the same abscissa
        let mut used = vec![false; collapsed.len()];
        let mut cmds = Vec::new();
        for i in 0..collapsed.len() {
            if used[i] {
                continue;
            }
            for j in i + 1..collapsed.len() {
                if used[j] {
                    continue;
                }
                if (collapsed[i].x() - collapsed[j].x()).abs() <= EPSILON_SQRT {
                    used[i] = true;
                    used[j] = true;
                    cmds.push(PathCmd::Move(rotate.apply(collapsed[i])));
                    cmds.push(PathCmd::Line(rotate.apply(collapsed[j])));
                    break;
                }
            }
        }
        tracing::debug!(
            vertices = collapsed.len(),
            edges = cmds.len() / 2,
            "derived silhouette edges"
        );
        Path::new(cmds)
    }
}
