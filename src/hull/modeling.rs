//! High level modeling operations built from Euler operators.

use crate::{
    circulator::Ring,
    handle::HalfEdgeId,
    refs::{Face, Vertex},
};
use super::{Hull, TopologyError};


impl<P> Hull<P> {
    /// Adds a simple polygon without holes as a new connected component.
    ///
    /// The returned face is bounded by one half edge per polygon edge and its
    /// ring visits the points in the given order, starting with the first
    /// one. The other side of the boundary is the null face. The points
    /// should be in CCW order.
    ///
    /// Fails with `TooFewPoints` if fewer than 2 points are given. Two
    /// points result in a face bounded by two half edges.
    pub fn add_polygon<I>(&mut self, points: I) -> Result<Face, TopologyError>
    where
        I: IntoIterator<Item = P>,
    {
        let mut points = points.into_iter();
        let (p0, p1) = match (points.next(), points.next()) {
            (Some(p0), Some(p1)) => (p0, p1),
            (Some(_), None) => return Err(TopologyError::TooFewPoints(1)),
            _ => return Err(TopologyError::TooFewPoints(0)),
        };

        let e0 = self.make_shell_impl(p0, p1);
        let mut e = e0.mate();
        let mut count = 2;
        for p in points {
            e = self.make_edge_vertex_impl(p, e);
            count += 1;
        }
        self.make_edge_face_impl(e0, e)?;

        log::debug!("added polygon with {} points as {:?}", count, self.face(e0));
        Ok(self.face_handle(e0))
    }

    /// Creates a new hull containing only the given polygon. See
    /// [`Hull::add_polygon`].
    pub fn from_polygon<I>(points: I) -> Result<(Self, Face), TopologyError>
    where
        I: IntoIterator<Item = P>,
    {
        let mut hull = Self::new();
        let face = hull.add_polygon(points)?;
        Ok((hull, face))
    }
}

impl Face {
    /// Splits this face into triangles by inserting a new vertex at `point`
    /// and connecting it to every corner of the face.
    ///
    /// ```text
    ///   o-------o        o-------o
    ///   |       |        |\     /|
    ///   |       |   =>   |  \ /  |
    ///   |       |        |  / \  |
    ///   |       |        |/     \|
    ///   o-------o        o-------o
    /// ```
    ///
    /// An N-gon turns into N triangles, adding one vertex and N edges. The
    /// first triangle keeps the id of this face. As the boundary of the face
    /// is rewired, this handle is not valid anymore afterwards.
    ///
    /// Returns the new vertex. Fails with `StaleHandle` if this handle is not
    /// valid and with `NullFace` if this is the null face.
    pub fn split<P>(self, hull: &mut Hull<P>, point: P) -> Result<Vertex, TopologyError> {
        if !self.is_valid(hull) {
            return Err(TopologyError::StaleHandle);
        }
        if self.is_null() {
            return Err(TopologyError::NullFace);
        }

        let edge = self.edge().id();
        let start = hull.origin(edge);
        let first = hull.make_edge_vertex_impl(point, edge);

        let mut ne: HalfEdgeId = first;
        let mut e = hull.next(hull.next(ne));
        while hull.origin(e) != start {
            ne = hull.make_edge_face_impl(e, ne)?;
            debug_assert_eq!(hull.next(ne), e);
            e = hull.next(e);
        }

        log::debug!(
            "split {:?} at new {:?} into {} triangles",
            self.id(),
            hull.origin(first),
            hull.ring(first, Ring::Vertex).count(),
        );
        Ok(hull.vertex_handle(first))
    }
}
