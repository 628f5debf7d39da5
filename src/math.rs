//! The minimal point abstraction the kernel needs from a geometry layer.


use std::fmt::Debug;

use cgmath::{BaseFloat, Matrix3, Matrix4, Point2, Point3, Transform, Vector3};
use num_traits::One;


/// A positional value stored per vertex.
///
/// The kernel never inspects a point: it only copies, stores, compares and
/// returns it. The only operation it asks of a point is to apply an affine
/// transformation, which is used by [`Hull::transform`][crate::Hull::transform].
///
/// This trait is implemented for `cgmath::Point2` (transformed by a
/// homogeneous `Matrix3`) and `cgmath::Point3` (transformed by a `Matrix4`).
pub trait Point: Clone + PartialEq + Debug {
    /// The affine transformation type that can be applied to this point.
    type Transform;

    /// Returns this point transformed by `t`.
    fn transformed(&self, t: &Self::Transform) -> Self;
}

impl<S: BaseFloat> Point for Point2<S> {
    type Transform = Matrix3<S>;

    fn transformed(&self, t: &Self::Transform) -> Self {
        let h = *t * Vector3::new(self.x, self.y, One::one());
        Point2::new(h.x / h.z, h.y / h.z)
    }
}

impl<S: BaseFloat> Point for Point3<S> {
    type Transform = Matrix4<S>;

    fn transformed(&self, t: &Self::Transform) -> Self {
        t.transform_point(*self)
    }
}
