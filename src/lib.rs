//! CAD oriented path manipulation library
//!
//! Paths are built from typed primitives (lines, circular arcs and cubic
//! bezier curves) grouped into connected segments. On top of the basic
//! parametric evaluation the library provides intersection of primitives,
//! tangent based joining, parallel offsetting of whole segments with a
//! choice of curve approximation algorithms, and extraction of silhouette
//! edges from symmetric outlines.
#![deny(warnings)]

mod edges;
mod error;
mod geometry;
mod intersect;
mod offset;
mod path;
mod primitive;
mod segment;
mod utils;

pub use edges::{DEFAULT_CRITICAL_ANGLE, Edges};
pub use error::{Error, Result};
pub use geometry::{BBox, EPSILON, EPSILON_SQRT, PI, Point, Scalar, Transform, scalar_fmt};
pub use intersect::{DEFAULT_TOLERANCE, join, primitive_intersect};
pub use offset::{OffsetAlgorithm, cubic_offset, curve_offset_at, curve_offset_samples};
pub use path::{Path, PathBuilder, PathCmd, SegmentIndex, Segments};
pub use primitive::{Arc, Cubic, Curve, Line, Primitive};
pub use segment::{PrimitiveIter, Segment};
