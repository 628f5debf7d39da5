//! Versioned handles to elements within a hull.
//!
//! A handle is a slot id paired with the value the hull's version counter had
//! when the handle was created. It does not borrow the hull: every query takes
//! the hull as argument. This allows keeping handles around while the hull is
//! mutated and asking them afterwards whether they still describe the hull
//! correctly (`is_valid`).
//!
//! Validity is conservative. A handle becomes invalid as soon as the slot it
//! points to is written, even if the write did not change anything relevant
//! for the handle.

use std::hash::{Hash, Hasher};

use crate::{
    circulator::{Circulator, Ring},
    handle::{FaceId, HalfEdgeId, VertexId},
    hull::Hull,
    store::Version,
};


// ===============================================================================================
// ===== HalfEdge
// ===============================================================================================

/// Handle to a half edge.
///
/// Two half edge handles are equal if they point to the same slot,
/// regardless of their captured version.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    id: HalfEdgeId,
    version: Version,
}

impl PartialEq for HalfEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HalfEdge {}

impl Hash for HalfEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl HalfEdge {
    pub(crate) fn new<P>(hull: &Hull<P>, id: HalfEdgeId) -> Self {
        Self {
            id,
            version: hull.version(),
        }
    }

    /// The raw id of the half edge slot.
    pub fn id(&self) -> HalfEdgeId {
        self.id
    }

    /// The version of the hull at the time this handle was created.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns `true` if neither this half edge nor its mate were modified
    /// or removed since this handle was created.
    pub fn is_valid<P>(&self, hull: &Hull<P>) -> bool {
        hull.contains_half_edge(self.id) && [self.id, self.id.mate()].iter().all(|&he| {
            hull.store.edge_version(he).map_or(false, |stamp| self.version >= stamp)
        })
    }

    pub fn mate<P>(&self, hull: &Hull<P>) -> Option<HalfEdge> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(HalfEdge::new(hull, hull.mate(self.id)))
    }

    pub fn next<P>(&self, hull: &Hull<P>) -> Option<HalfEdge> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(HalfEdge::new(hull, hull.next(self.id)))
    }

    pub fn prev<P>(&self, hull: &Hull<P>) -> Option<HalfEdge> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(HalfEdge::new(hull, hull.prev(self.id)))
    }

    /// The vertex this half edge starts at.
    pub fn origin<P>(&self, hull: &Hull<P>) -> Option<Vertex> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(hull.vertex_handle(self.id))
    }

    /// The vertex this half edge points to.
    pub fn target<P>(&self, hull: &Hull<P>) -> Option<Vertex> {
        self.mate(hull).and_then(|mate| mate.origin(hull))
    }

    /// The face left of this half edge. This might be the null face.
    pub fn face<P>(&self, hull: &Hull<P>) -> Option<Face> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(hull.face_handle(self.id))
    }

    /// Returns `true` if the face on either side of this edge is the null
    /// face. Invalid handles are never on the border.
    pub fn is_border<P>(&self, hull: &Hull<P>) -> bool {
        if !self.is_valid(hull) {
            return false;
        }
        hull.face(self.id).is_null() || hull.face(self.id.mate()).is_null()
    }
}


// ===============================================================================================
// ===== Vertex
// ===============================================================================================

/// Handle to a vertex, represented by one of its outgoing half edges.
///
/// Equality and hashing only look at the vertex id, so handles created from
/// different outgoing half edges of the same vertex compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    edge: HalfEdge,
    id: VertexId,
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Vertex {
    pub(crate) fn new<P>(hull: &Hull<P>, edge: HalfEdge) -> Self {
        Self {
            edge,
            id: hull.origin(edge.id()),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    /// The outgoing half edge this handle was created from.
    pub fn edge(&self) -> HalfEdge {
        self.edge
    }

    pub fn is_valid<P>(&self, hull: &Hull<P>) -> bool {
        self.edge.is_valid(hull)
    }

    pub fn position<'a, P>(&self, hull: &'a Hull<P>) -> Option<&'a P> {
        if !self.is_valid(hull) {
            return None;
        }
        Some(hull.position(self.id))
    }

    /// Circulates the outgoing half edges of this vertex in CCW order.
    pub fn edges<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, HalfEdge> {
        Circulator::new(hull, self.edge, Ring::Vertex)
    }

    /// Circulates the faces around this vertex in CCW order. The null face
    /// is included if the vertex is on the border.
    pub fn faces<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, Face> {
        self.edges(hull).map(|hull, he| he.face(hull))
    }

    /// Circulates the vertices connected to this vertex by an edge, in CCW
    /// order.
    pub fn neighbors<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, Vertex> {
        self.edges(hull).map(|hull, he| he.target(hull))
    }
}


// ===============================================================================================
// ===== Face
// ===============================================================================================

/// Handle to a face (possibly the null face), represented by one of the half
/// edges of its boundary.
///
/// Equality and hashing only look at the face id.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    edge: HalfEdge,
    id: FaceId,
    version: Version,
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Face {}

impl Hash for Face {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Face {
    pub(crate) fn new<P>(hull: &Hull<P>, edge: HalfEdge) -> Self {
        Self {
            edge,
            id: hull.face(edge.id()),
            version: hull.version(),
        }
    }

    pub fn id(&self) -> FaceId {
        self.id
    }

    /// The boundary half edge this handle was created from.
    pub fn edge(&self) -> HalfEdge {
        self.edge
    }

    /// Returns `true` if the underlying half edge is valid and the face slot
    /// was not reallocated since this handle was created. A face whose slot
    /// was freed is never valid.
    pub fn is_valid<P>(&self, hull: &Hull<P>) -> bool {
        if !self.edge.is_valid(hull) {
            return false;
        }
        if self.id.is_null() {
            return true;
        }
        hull.store.face_version(self.id).map_or(false, |stamp| self.version >= stamp)
    }

    /// Returns `true` if this is the null face, the face outside of the
    /// border.
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// Circulates the boundary half edges of this face in CCW order.
    pub fn edges<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, HalfEdge> {
        Circulator::new(hull, self.edge, Ring::Face)
    }

    /// Circulates the origins of the boundary half edges in CCW order.
    pub fn vertices<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, Vertex> {
        self.edges(hull).map(|hull, he| he.origin(hull))
    }

    /// Circulates the faces on the other side of the boundary edges. The null
    /// face is yielded for border edges.
    pub fn neighbors<'a, P>(&self, hull: &'a Hull<P>) -> Circulator<'a, P, Face> {
        self.edges(hull).map(|hull, he| he.mate(hull).and_then(|mate| mate.face(hull)))
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cgmath::Point2;
    use super::*;

    fn square() -> (Hull<Point2<f32>>, Face) {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        Hull::from_polygon(points).unwrap()
    }

    #[test]
    fn navigation() {
        let (hull, face) = square();
        let e = face.edge();

        assert_eq!(e.next(&hull).unwrap().prev(&hull), Some(e));
        assert_eq!(e.mate(&hull).unwrap().mate(&hull), Some(e));
        assert_eq!(
            e.target(&hull).unwrap().position(&hull),
            Some(&Point2::new(1.0, 0.0)),
        );
        assert!(e.is_border(&hull));
        assert!(e.mate(&hull).unwrap().face(&hull).unwrap().is_null());
    }

    #[test]
    fn identity_ignores_representative() {
        let (hull, face) = square();
        let e = face.edge();
        let other = e.prev(&hull).unwrap().mate(&hull).unwrap();

        assert_ne!(e, other);
        assert_eq!(e.origin(&hull), other.origin(&hull));
        assert_eq!(e.face(&hull), e.next(&hull).unwrap().face(&hull));

        let set: HashSet<_> = face.vertices(&hull).sequence().collect();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&other.origin(&hull).unwrap()));
    }

    #[test]
    fn touching_the_mate_invalidates() {
        let (mut hull, face) = square();
        let e = face.edge();
        let unrelated = e.next(&hull).unwrap().next(&hull).unwrap();
        assert!(e.is_valid(&hull));

        // The new vertex is spliced in before `e.mate()`, which rewires the
        // `next` link of the mate's predecessor and the `prev` link of the
        // mate itself.
        let mate = e.mate(&hull).unwrap();
        hull.make_edge_vertex(Point2::new(0.5, -1.0), mate);

        assert!(!e.is_valid(&hull));
        assert!(!face.is_valid(&hull));
        assert_eq!(e.next(&hull), None);
        assert_eq!(e.origin(&hull), None);
        assert!(unrelated.is_valid(&hull));
        hull.check_integrity();
    }

    #[test]
    fn freed_face_is_invalid() {
        let (mut hull, face) = square();
        let survivor = face.edge().next(&hull).unwrap().id();
        hull.kill_edge_face(face.edge()).unwrap();

        assert_eq!(hull.face_count(), 0);
        let null = hull.half_edge(survivor).face(&hull).unwrap();
        assert!(null.is_null());
        assert!(null.is_valid(&hull));
        assert!(!face.is_valid(&hull));
    }
}
