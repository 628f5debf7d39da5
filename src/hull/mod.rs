//! Everything related to the [`Hull`].

// # Some notes for developers about this implementation
//
// - Twins are stored implicitly: a pair always occupies the slots 2k and
//   2k + 1 of the half edge table, so `mate` is a bit flip and never needs to
//   be stored.
// - Every write to a half edge slot stamps it with a fresh value of the
//   global version counter. Handles remember the counter value from when they
//   were created; a handle is stale as soon as its slot (or its twin) carries
//   a newer stamp.
// - The low level setters in this module do not keep any invariant except
//   `next`/`prev` symmetry. Only the Euler operators (`euler.rs`) are allowed
//   to call them, and each of them leaves the hull consistent.

use std::fmt;

use failure::Fail;
use fxhash::{FxHashMap, FxHashSet};
use optional::Optioned as Opt;

use crate::{
    circulator::Ring,
    handle::{hsize, Handle, HalfEdgeId, FaceId, VertexId},
    math::Point,
    refs::{HalfEdge, Face, Vertex},
    store::{SlotStore, Version},
};

mod euler;
mod modeling;


// ===============================================================================================
// ===== Errors
// ===============================================================================================

/// A violated precondition of a topological operation.
///
/// Operations returning this error check all preconditions before touching
/// the hull, so the hull is unchanged when an error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
pub enum TopologyError {
    #[fail(display = "half edges {:?} and {:?} do not start at the same vertex", _0, _1)]
    OriginMismatch(HalfEdgeId, HalfEdgeId),

    #[fail(display = "half edge {:?} is a loop, its origin cannot be removed", _0)]
    SelfLoop(HalfEdgeId),

    #[fail(display = "half edge {:?} cannot be reached from {:?} by walking around the face", _1, _0)]
    DifferentRings(HalfEdgeId, HalfEdgeId),

    #[fail(display = "both sides of half edge {:?} belong to the same face", _0)]
    SameFace(HalfEdgeId),

    #[fail(display = "half edges {:?} and {:?} are adjacent to different faces", _0, _1)]
    DifferentFaces(HalfEdgeId, HalfEdgeId),

    #[fail(display = "half edges {:?} and {:?} already lie on the same ring", _0, _1)]
    SameRing(HalfEdgeId, HalfEdgeId),

    #[fail(display = "half edges {:?} and {:?} already belong to the same face", _0, _1)]
    SharedFace(HalfEdgeId, HalfEdgeId),

    #[fail(display = "the face of {:?} lies directly across half edge {:?}", _1, _0)]
    AdjacentFaces(HalfEdgeId, HalfEdgeId),

    #[fail(display = "removing half edge {:?} would not split its ring into two", _0)]
    NotABridge(HalfEdgeId),

    #[fail(display = "the operation is not defined for the null face")]
    NullFace,

    #[fail(display = "the handle refers to an element that was modified after the handle was created")]
    StaleHandle,

    #[fail(display = "a polygon needs at least 2 points, but {} were given", _0)]
    TooFewPoints(usize),
}


// ===============================================================================================
// ===== Hull
// ===============================================================================================

/// A polygon mesh stored as a half edge data structure.
///
/// The hull stores positions per vertex and pure connectivity otherwise:
/// faces are just labels of half edge rings. The connectivity can only be
/// changed through the Euler operators (like [`Hull::make_shell`] or
/// [`Hull::make_edge_face`]) which keep the following invariants:
///
/// 1. `mate(mate(e)) == e`,
/// 2. `next(prev(e)) == e` and `prev(next(e)) == e`,
/// 3. `target(e) == origin(mate(e))`,
/// 4. all half edges of one `next` ring have the same face, which is either
///    [`FaceId::NULL`] or a live face,
/// 5. no live element refers to a freed slot.
///
/// Elements are referred to either by raw slot ids ([`HalfEdgeId`],
/// [`VertexId`], [`FaceId`]) or by versioned handles ([`HalfEdge`],
/// [`Vertex`], [`Face`]). The latter can tell whether the element they point
/// to was modified since the handle was created. Handles do not borrow the
/// hull; every query takes it as an argument.
///
/// # Example
///
/// ```
/// use cgmath::Point2;
/// use hull::Hull;
///
/// let square = [
///     Point2::new(1.0, 1.0),
///     Point2::new(-1.0, 1.0),
///     Point2::new(-1.0, -1.0),
///     Point2::new(1.0, -1.0),
/// ];
/// let (mut hull, face) = Hull::from_polygon(square.iter().cloned()).unwrap();
/// assert_eq!(hull.face_count(), 1);
///
/// let center = face.split(&mut hull, Point2::new(0.0, 0.0)).unwrap();
/// assert_eq!(hull.face_count(), 4);
/// assert_eq!(center.neighbors(&hull).sequence().count(), 4);
/// ```
pub struct Hull<P> {
    pub(crate) store: SlotStore<P>,
}

impl<P> Default for Hull<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> Clone for Hull<P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<P> fmt::Debug for Hull<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Hull(edges: {}, vertices: {}, faces: {})",
            self.edge_count(),
            self.vertex_count(),
            self.face_count(),
        )
    }
}

impl<P> Hull<P> {
    /// Creates an empty hull without any vertex.
    pub fn new() -> Self {
        Self {
            store: SlotStore::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> hsize {
        self.store.num_vertices() as hsize
    }

    /// Number of full edges.
    pub fn edge_count(&self) -> hsize {
        (self.store.num_half_edges() / 2) as hsize
    }

    /// Number of half edges, always twice [`Hull::edge_count`].
    pub fn half_edge_count(&self) -> hsize {
        self.store.num_half_edges() as hsize
    }

    /// Number of faces. The null face is not counted.
    pub fn face_count(&self) -> hsize {
        self.store.num_faces() as hsize
    }

    /// Returns `true` if the hull does not contain any vertex.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// The current value of the global version counter. It increases with
    /// every structural modification.
    pub fn version(&self) -> Version {
        self.store.version()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.store.contains_vertex(v)
    }

    pub fn contains_half_edge(&self, he: HalfEdgeId) -> bool {
        self.store.contains_half_edge(he)
    }

    pub fn contains_face(&self, f: FaceId) -> bool {
        self.store.contains_face(f)
    }

    /// Creates a handle to the given live half edge. Panics if the half edge
    /// does not exist.
    pub fn half_edge(&self, he: HalfEdgeId) -> HalfEdge {
        self.check_half_edge(he);
        HalfEdge::new(self, he)
    }

    /// Returns an iterator over one half edge (the one with the even index)
    /// of every edge, in slot order.
    pub fn edges(&self) -> impl Iterator<Item = HalfEdge> + '_ {
        self.edge_ids().map(move |he| HalfEdge::new(self, he))
    }

    fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.store.half_edge_slots())
            .step_by(2)
            .map(HalfEdgeId::from_usize)
            .filter(move |&he| self.store.contains_half_edge(he))
    }

    /// All live half edges in slot order.
    fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.store.half_edge_slots())
            .map(HalfEdgeId::from_usize)
            .filter(move |&he| self.store.contains_half_edge(he))
    }


    // ===========================================================================================
    // ===== Low level accessors
    // ===========================================================================================

    /// Makes sure the given half edge exists. If that's not the case, this
    /// method panics.
    fn check_half_edge(&self, he: HalfEdgeId) {
        if !self.store.contains_half_edge(he) {
            panic!(
                "{:?} was passed to a hull, but this half edge does not exist in this hull \
                    (out of range or freed)",
                he,
            );
        }
    }

    fn check_vertex(&self, v: VertexId) {
        if !self.store.contains_vertex(v) {
            panic!(
                "{:?} was passed to a hull, but this vertex does not exist in this hull \
                    (out of range or freed)",
                v,
            );
        }
    }

    fn check_face(&self, f: FaceId) {
        if !f.is_null() && !self.store.contains_face(f) {
            panic!(
                "{:?} was passed to a hull, but this face does not exist in this hull \
                    (out of range or freed)",
                f,
            );
        }
    }

    /// Returns the vertex the given half edge starts at.
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.check_half_edge(he);
        self.store.half_edge(he)
            .and_then(|r| r.origin.into_option())
            .unwrap_or_else(|| panic!("bug: origin of {:?} was read before it was set", he))
    }

    /// Returns the vertex the given half edge points to.
    pub fn target(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.mate(he))
    }

    /// Returns the twin of the given half edge.
    pub fn mate(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.check_half_edge(he);
        he.mate()
    }

    /// Returns the half edge following the given one in its ring.
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.check_half_edge(he);
        self.store.half_edge(he)
            .and_then(|r| r.next.into_option())
            .unwrap_or_else(|| panic!("bug: next of {:?} was read before it was set", he))
    }

    /// Returns the half edge preceding the given one in its ring.
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.check_half_edge(he);
        self.store.half_edge(he)
            .and_then(|r| r.prev.into_option())
            .unwrap_or_else(|| panic!("bug: prev of {:?} was read before it was set", he))
    }

    /// Returns the face left of the given half edge, possibly
    /// [`FaceId::NULL`].
    pub fn face(&self, he: HalfEdgeId) -> FaceId {
        self.check_half_edge(he);
        self.store.half_edge(he).map(|r| r.face).unwrap_or(FaceId::NULL)
    }

    /// Returns the position of the given vertex.
    pub fn position(&self, v: VertexId) -> &P {
        self.check_vertex(v);
        match self.store.position(v) {
            Some(pos) => pos,
            None => unreachable!(),
        }
    }


    // ===========================================================================================
    // ===== Low level mutators
    // ===========================================================================================

    pub(crate) fn set_origin(&mut self, he: HalfEdgeId, v: VertexId) {
        self.check_half_edge(he);
        self.check_vertex(v);
        let version = self.store.bump();
        if let Some(r) = self.store.half_edge_mut(he, version) {
            r.origin = Opt::some(v);
        }
    }

    pub(crate) fn set_target(&mut self, he: HalfEdgeId, v: VertexId) {
        self.set_origin(he.mate(), v);
    }

    /// Sets `next(he) = n` and `prev(n) = he`. Both slots are stamped.
    pub(crate) fn set_next(&mut self, he: HalfEdgeId, n: HalfEdgeId) {
        self.check_half_edge(he);
        self.check_half_edge(n);
        let version = self.store.bump();
        if let Some(r) = self.store.half_edge_mut(he, version) {
            r.next = Opt::some(n);
        }
        if let Some(r) = self.store.half_edge_mut(n, version) {
            r.prev = Opt::some(he);
        }
    }

    /// Sets `prev(he) = p` and `next(p) = he`. Both slots are stamped.
    pub(crate) fn set_prev(&mut self, he: HalfEdgeId, p: HalfEdgeId) {
        self.set_next(p, he);
    }

    pub(crate) fn set_face(&mut self, he: HalfEdgeId, f: FaceId) {
        self.check_half_edge(he);
        self.check_face(f);
        let version = self.store.bump();
        if let Some(r) = self.store.half_edge_mut(he, version) {
            r.face = f;
        }
    }


    // ===========================================================================================
    // ===== Allocation
    // ===========================================================================================

    pub(crate) fn add_vertex(&mut self, pos: P) -> VertexId {
        self.store.alloc_vertex(pos)
    }

    pub(crate) fn remove_vertex(&mut self, v: VertexId) {
        self.check_vertex(v);
        self.store.free_vertex(v);
    }

    /// Adds a pair of half edges and returns the one going from `from` to
    /// `to`. The `next`/`prev` links of both are unset and have to be wired
    /// by the caller; the faces are null.
    pub(crate) fn add_edge(&mut self, from: VertexId, to: VertexId) -> HalfEdgeId {
        self.check_vertex(from);
        self.check_vertex(to);
        let he = self.store.alloc_edge();
        self.set_origin(he, from);
        self.set_target(he, to);
        he
    }

    pub(crate) fn remove_edge(&mut self, he: HalfEdgeId) {
        self.check_half_edge(he);
        self.store.free_edge(he);
    }

    pub(crate) fn add_face(&mut self) -> FaceId {
        self.store.alloc_face()
    }

    pub(crate) fn remove_face(&mut self, f: FaceId) {
        assert!(!f.is_null(), "bug: attempt to free the null face");
        self.check_face(f);
        self.store.free_face(f);
    }


    // ===========================================================================================
    // ===== Raw rings
    // ===========================================================================================

    /// Returns an iterator over the ring of raw half edge ids starting at
    /// `start`. The iterator stops right before it would yield `start` again.
    pub(crate) fn ring(&self, start: HalfEdgeId, ring: Ring) -> RawRing<'_, P> {
        self.check_half_edge(start);
        RawRing::NonEmpty {
            hull: self,
            ring,
            current: start,
            start,
        }
    }

    /// Returns `true` if `needle` can be reached from `start` by following
    /// `next` links.
    pub(crate) fn face_ring_contains(&self, start: HalfEdgeId, needle: HalfEdgeId) -> bool {
        self.ring(start, Ring::Face).any(|he| he == needle)
    }

    /// Returns every live half edge labeled with `f`, on all of its rings
    /// (the outer boundary and any holes).
    pub(crate) fn face_half_edges(&self, f: FaceId) -> Vec<HalfEdgeId> {
        self.half_edge_ids().filter(|&he| self.face(he) == f).collect()
    }
}


// ===============================================================================================
// ===== Exports and whole-hull operations
// ===============================================================================================

impl<P: Point> Hull<P> {
    /// Returns the position of every vertex slot, indexed by [`VertexId`].
    ///
    /// Slots of removed vertices are not compacted away but reported as
    /// `None`, so that the ids in [`Hull::triangle_indices`] and
    /// [`Hull::line_indices`] can be used as indices into this array.
    pub fn vertex_array(&self) -> Vec<Option<P>> {
        self.store.slot_positions().map(|p| p.cloned()).collect()
    }

    /// Returns three vertex ids per triangle for all non-null faces.
    ///
    /// Triangles are reported with the orientation of their face ring.
    /// Faces with more than three vertices are fan triangulated around the
    /// first vertex of their ring. Degenerate faces with fewer than three
    /// vertices are skipped. Faces with holes (more than one ring) are
    /// skipped as well: a fan over one ring would cover the others.
    pub fn triangle_indices(&self) -> Vec<hsize> {
        // Collect all rings of non-null faces first, so that faces with holes
        // are known before anything is emitted.
        let mut visited = FxHashSet::default();
        let mut ring_counts: FxHashMap<FaceId, usize> = FxHashMap::default();
        let mut rings = Vec::new();
        for start in self.half_edge_ids() {
            let face = self.face(start);
            if face.is_null() || visited.contains(&start) {
                continue;
            }

            let ring: Vec<_> = self.ring(start, Ring::Face).collect();
            visited.extend(ring.iter().cloned());
            *ring_counts.entry(face).or_insert(0) += 1;
            rings.push((face, ring));
        }

        let mut out = Vec::with_capacity(self.face_count() as usize * 3);
        for (face, ring) in rings {
            let num_rings = ring_counts.get(&face).cloned().unwrap_or(0);
            if num_rings > 1 {
                log::warn!(
                    "skipping ring of {:?} in triangle export: the face has {} rings",
                    face,
                    num_rings,
                );
                continue;
            }

            let ring: Vec<_> = ring.into_iter().map(|he| self.origin(he)).collect();
            if ring.len() < 3 {
                log::warn!(
                    "skipping degenerate {:?} with {} vertices in triangle export",
                    face,
                    ring.len(),
                );
                continue;
            }
            if ring.len() > 3 {
                log::debug!("fan triangulating {:?} with {} vertices", face, ring.len());
            }

            for i in 1..ring.len() - 1 {
                out.extend_from_slice(&[ring[0].idx(), ring[i].idx(), ring[i + 1].idx()]);
            }
        }

        out
    }

    /// Returns the origin and target vertex id of one half edge per edge.
    pub fn line_indices(&self) -> Vec<hsize> {
        let out: Vec<_> = self.edge_ids()
            .flat_map(|he| vec![self.origin(he).idx(), self.target(he).idx()])
            .collect();

        debug_assert_eq!(out.len(), self.edge_count() as usize * 2);
        out
    }

    /// Applies the affine transformation `t` to the position of every
    /// vertex. The connectivity is not touched, so no handle becomes stale.
    pub fn transform(&mut self, t: &P::Transform) {
        for pos in self.store.positions_mut() {
            *pos = pos.transformed(t);
        }
    }

    /// Checks that all invariants of the hull hold and panics with a
    /// descriptive message otherwise.
    ///
    /// This walks the whole hull and is meant for tests and debugging.
    pub fn check_integrity(&self) {
        let slots = self.store.half_edge_slots();

        for he in (0..slots).map(HalfEdgeId::from_usize) {
            let record = match self.store.half_edge(he) {
                Some(record) => *record,
                None => {
                    if self.store.contains_half_edge(he.mate()) {
                        panic!("bug: {:?} is free, but its mate {:?} is not", he, he.mate());
                    }
                    continue;
                }
            };

            // Make sure all references point to live slots.
            let origin = record.origin.into_option()
                .unwrap_or_else(|| panic!("bug: origin of {:?} is unset", he));
            if !self.store.contains_vertex(origin) {
                panic!(
                    "bug (broken reference): [{:?}].origin = {:?}, but that vertex does not exist!",
                    he,
                    origin,
                );
            }
            let next = record.next.into_option()
                .unwrap_or_else(|| panic!("bug: next of {:?} is unset", he));
            let prev = record.prev.into_option()
                .unwrap_or_else(|| panic!("bug: prev of {:?} is unset", he));
            for &(name, link) in &[("next", next), ("prev", prev)] {
                if !self.store.contains_half_edge(link) {
                    panic!(
                        "bug (broken reference): [{:?}].{} = {:?}, but that half edge does \
                            not exist!",
                        he,
                        name,
                        link,
                    );
                }
            }
            if !record.face.is_null() && !self.store.contains_face(record.face) {
                panic!(
                    "bug (broken reference): [{:?}].face = {:?}, but that face does not exist!",
                    he,
                    record.face,
                );
            }

            // Check `next <-> prev` connection.
            if self.prev(next) != he {
                panic!(
                    "bug: [{:?}].next = {:?}, but [{:?}].prev = {:?} (should be {:?})",
                    he,
                    next,
                    next,
                    self.prev(next),
                    he,
                );
            }
            if self.next(prev) != he {
                panic!(
                    "bug: [{:?}].prev = {:?}, but [{:?}].next = {:?} (should be {:?})",
                    he,
                    prev,
                    prev,
                    self.next(prev),
                    he,
                );
            }

            // The ring continues at the target of this half edge.
            if self.origin(next) != self.target(he) {
                panic!(
                    "bug: [{:?}].next = {:?}, but {:?} ends at {:?} while {:?} starts at {:?}",
                    he,
                    next,
                    he,
                    self.target(he),
                    next,
                    self.origin(next),
                );
            }
        }

        // Walk all face rings to make sure each has a single face label.
        let mut visited = FxHashSet::default();
        let mut labeled_faces = FxHashSet::default();
        for start in (0..slots).map(HalfEdgeId::from_usize) {
            if !self.store.contains_half_edge(start) || visited.contains(&start) {
                continue;
            }

            let face = self.face(start);
            labeled_faces.insert(face);
            for he in self.ring(start, Ring::Face) {
                if self.face(he) != face {
                    panic!(
                        "bug: while walking around {:?} starting from {:?}, {:?} was \
                            encountered and its face is {:?}",
                        face,
                        start,
                        he,
                        self.face(he),
                    );
                }

                if !visited.insert(he) {
                    panic!(
                        "bug: encountered {:?} while walking around {:?}, but it was \
                            already visited!",
                        he,
                        face,
                    );
                }
            }
        }

        // Every live face labels at least one ring.
        for f in (0..self.store.face_slots()).map(FaceId::from_usize) {
            if self.store.contains_face(f) && !labeled_faces.contains(&f) {
                panic!("bug: {:?} is live, but no half edge is adjacent to it", f);
            }
        }
    }
}


// ===============================================================================================
// ===== Raw ring iterator
// ===============================================================================================

/// Iterator over raw half edge ids of one ring. Created by [`Hull::ring`].
#[derive(Debug)]
pub(crate) enum RawRing<'a, P> {
    Empty,
    NonEmpty {
        hull: &'a Hull<P>,
        ring: Ring,
        current: HalfEdgeId,
        start: HalfEdgeId,
    },
}

impl<P> Iterator for RawRing<'_, P> {
    type Item = HalfEdgeId;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        match *self {
            RawRing::Empty => None,
            RawRing::NonEmpty { hull, ring, ref mut current, start } => {
                let out = *current;

                // Advance iterator
                let next = match ring {
                    Ring::Vertex => hull.next(out.mate()),
                    Ring::Face => hull.next(out),
                };
                if next == start {
                    // If we reached the start edge again, we are done and set
                    // the iterator to `Empty`.
                    *self = RawRing::Empty;
                } else {
                    *current = next;
                }

                Some(out)
            }
        }
    }
}

// Vertex and face handles are only created via the hull, so their
// constructors live here.
impl<P> Hull<P> {
    pub(crate) fn vertex_handle(&self, he: HalfEdgeId) -> Vertex {
        Vertex::new(self, HalfEdge::new(self, he))
    }

    pub(crate) fn face_handle(&self, he: HalfEdgeId) -> Face {
        Face::new(self, HalfEdge::new(self, he))
    }
}
