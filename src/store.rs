//! The slot store: flat tables holding everything a [`Hull`][crate::Hull]
//! knows.
//!
//! Every table is a `StableVec`: removing an element leaves a hole at its
//! index instead of shifting the following elements, so slot ids stay stable.
//! These holes are the free slots. Allocation always fills the lowest hole
//! before growing a table.
//!
//! The store knows nothing about connectivity. It only allocates, frees and
//! stamps slots. Keeping the topology consistent is the job of the hull's
//! Euler operators.

use std::fmt;

use optional::Optioned as Opt;
use stable_vec::StableVec;

use crate::handle::{Handle, HalfEdgeId, FaceId, VertexId};


/// Value of the global modification counter of a hull.
pub type Version = u64;

/// Connectivity information stored per half edge.
///
/// A freshly allocated record has all link fields unset and the null face;
/// the Euler operator allocating it has to wire it up.
#[derive(Clone, Copy)]
pub(crate) struct HalfEdgeRecord {
    pub(crate) origin: Opt<VertexId>,
    pub(crate) prev: Opt<HalfEdgeId>,
    pub(crate) next: Opt<HalfEdgeId>,
    pub(crate) face: FaceId,
}

impl HalfEdgeRecord {
    fn unset() -> Self {
        Self {
            origin: Opt::none(),
            prev: Opt::none(),
            next: Opt::none(),
            face: FaceId::NULL,
        }
    }
}

impl fmt::Debug for HalfEdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "HalfEdge {{ origin: {:?}, prev: {:?}, next: {:?}, face: {:?} }}",
            self.origin,
            self.prev,
            self.next,
            self.face,
        )
    }
}

/// Returns the index of the lowest hole in `vec`, if there is one.
fn first_hole<T>(vec: &StableVec<T>) -> Option<usize> {
    vec.first_empty_slot_from(0).filter(|&idx| idx < vec.next_push_index())
}


/// The tables of a hull plus its global version counter.
pub(crate) struct SlotStore<P> {
    vertices: StableVec<P>,
    half_edges: StableVec<HalfEdgeRecord>,

    /// One stamp per half edge slot ever allocated. Stamps survive freeing a
    /// slot so that stale handles to it keep being detected.
    edge_versions: Vec<Version>,

    /// Version stamp per live face slot. Faces have no other payload.
    faces: StableVec<Version>,

    version: Version,
}

impl<P> SlotStore<P> {
    pub(crate) fn new() -> Self {
        Self {
            vertices: StableVec::new(),
            half_edges: StableVec::new(),
            edge_versions: Vec::new(),
            faces: StableVec::new(),
            version: 0,
        }
    }

    /// The current value of the global version counter.
    #[inline(always)]
    pub(crate) fn version(&self) -> Version {
        self.version
    }

    /// Increments the global version counter and returns the new value.
    #[inline(always)]
    pub(crate) fn bump(&mut self) -> Version {
        self.version += 1;
        self.version
    }

    pub(crate) fn num_vertices(&self) -> usize {
        self.vertices.num_elements()
    }

    pub(crate) fn num_half_edges(&self) -> usize {
        self.half_edges.num_elements()
    }

    pub(crate) fn num_faces(&self) -> usize {
        self.faces.num_elements()
    }

    /// Number of half edge slots, live or free.
    pub(crate) fn half_edge_slots(&self) -> usize {
        self.half_edges.next_push_index()
    }

    /// Number of face slots, live or free.
    pub(crate) fn face_slots(&self) -> usize {
        self.faces.next_push_index()
    }

    pub(crate) fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.has_element_at(v.to_usize())
    }

    pub(crate) fn contains_half_edge(&self, he: HalfEdgeId) -> bool {
        self.half_edges.has_element_at(he.to_usize())
    }

    pub(crate) fn contains_face(&self, f: FaceId) -> bool {
        !f.is_null() && self.faces.has_element_at(f.to_usize())
    }


    // ===== Vertices =====================================================

    pub(crate) fn alloc_vertex(&mut self, pos: P) -> VertexId {
        match first_hole(&self.vertices) {
            Some(idx) => {
                self.vertices.insert(idx, pos);
                VertexId::from_usize(idx)
            }
            None => VertexId::from_usize(self.vertices.push(pos)),
        }
    }

    pub(crate) fn free_vertex(&mut self, v: VertexId) {
        let removed = self.vertices.remove(v.to_usize());
        assert!(removed.is_some(), "bug: freeing {:?} twice", v);
    }

    pub(crate) fn position(&self, v: VertexId) -> Option<&P> {
        self.vertices.get(v.to_usize())
    }

    /// Returns the position stored in every vertex slot, `None` for free
    /// slots.
    pub(crate) fn slot_positions(&self) -> impl Iterator<Item = Option<&P>> + '_ {
        (0..self.vertices.next_push_index()).map(move |idx| self.vertices.get(idx))
    }

    pub(crate) fn positions_mut(&mut self) -> impl Iterator<Item = &mut P> + '_ {
        self.vertices.values_mut()
    }


    // ===== Half edges ===================================================

    /// Allocates a pair of twin half edges with unset links and returns the
    /// one with the lower index. Both slots are stamped with a fresh version.
    pub(crate) fn alloc_edge(&mut self) -> HalfEdgeId {
        let version = self.bump();
        let lower = match first_hole(&self.half_edges) {
            Some(idx) => {
                // Twins are always freed together, so holes come in pairs
                // starting at an even index.
                assert!(idx % 2 == 0, "bug: half edge hole at odd index {}", idx);
                self.half_edges.insert(idx, HalfEdgeRecord::unset());
                self.half_edges.insert(idx + 1, HalfEdgeRecord::unset());
                idx
            }
            None => {
                let idx = self.half_edges.push(HalfEdgeRecord::unset());
                self.half_edges.push(HalfEdgeRecord::unset());
                self.edge_versions.push(0);
                self.edge_versions.push(0);
                idx
            }
        };

        self.edge_versions[lower] = version;
        self.edge_versions[lower + 1] = version;
        HalfEdgeId::from_usize(lower)
    }

    /// Frees both half edges of the pair `he` belongs to.
    pub(crate) fn free_edge(&mut self, he: HalfEdgeId) {
        let version = self.bump();
        for &h in &[he, he.mate()] {
            let removed = self.half_edges.remove(h.to_usize());
            assert!(removed.is_some(), "bug: freeing {:?} twice", h);
            self.edge_versions[h.to_usize()] = version;
        }
    }

    pub(crate) fn half_edge(&self, he: HalfEdgeId) -> Option<&HalfEdgeRecord> {
        self.half_edges.get(he.to_usize())
    }

    /// Gives mutable access to a half edge record and stamps the slot with
    /// the given version.
    pub(crate) fn half_edge_mut(
        &mut self,
        he: HalfEdgeId,
        version: Version,
    ) -> Option<&mut HalfEdgeRecord> {
        let record = self.half_edges.get_mut(he.to_usize())?;
        self.edge_versions[he.to_usize()] = version;
        Some(record)
    }

    /// The stamp of the given half edge slot. `None` if the slot was never
    /// allocated.
    pub(crate) fn edge_version(&self, he: HalfEdgeId) -> Option<Version> {
        self.edge_versions.get(he.to_usize()).cloned()
    }


    // ===== Faces ========================================================

    pub(crate) fn alloc_face(&mut self) -> FaceId {
        let version = self.bump();
        match first_hole(&self.faces) {
            Some(idx) => {
                self.faces.insert(idx, version);
                FaceId::from_usize(idx)
            }
            None => FaceId::from_usize(self.faces.push(version)),
        }
    }

    pub(crate) fn free_face(&mut self, f: FaceId) {
        self.bump();
        let removed = self.faces.remove(f.to_usize());
        assert!(removed.is_some(), "bug: freeing {:?} twice", f);
    }

    /// The stamp of the given face slot. `None` for free slots and the null
    /// face.
    pub(crate) fn face_version(&self, f: FaceId) -> Option<Version> {
        if f.is_null() {
            return None;
        }
        self.faces.get(f.to_usize()).cloned()
    }
}

impl<P: Clone> Clone for SlotStore<P> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            half_edges: self.half_edges.clone(),
            edge_versions: self.edge_versions.clone(),
            faces: self.faces.clone(),
            version: self.version,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_slots_are_reused() {
        let mut store = SlotStore::new();
        let a = store.alloc_vertex('a');
        let b = store.alloc_vertex('b');
        let c = store.alloc_vertex('c');
        assert_eq!((a.idx(), b.idx(), c.idx()), (0, 1, 2));

        store.free_vertex(b);
        assert_eq!(store.num_vertices(), 2);
        assert_eq!(store.slot_positions().count(), 3);
        assert_eq!(store.position(b), None);

        let d = store.alloc_vertex('d');
        assert_eq!(d, b);
        assert_eq!(store.position(d), Some(&'d'));

        let positions: Vec<_> = store.slot_positions().collect();
        assert_eq!(positions, vec![Some(&'a'), Some(&'d'), Some(&'c')]);
    }

    #[test]
    fn edges_are_allocated_in_pairs() {
        let mut store = SlotStore::<()>::new();
        let e0 = store.alloc_edge();
        let e1 = store.alloc_edge();
        assert_eq!(e0.idx(), 0);
        assert_eq!(e1.idx(), 2);
        assert_eq!(store.num_half_edges(), 4);
        assert!(store.half_edge(e1.mate()).unwrap().next.is_none());
        assert!(store.half_edge(e1).unwrap().face.is_null());

        let before = store.edge_version(e0).unwrap();
        store.free_edge(e0.mate());
        assert_eq!(store.num_half_edges(), 2);
        assert!(!store.contains_half_edge(e0));
        assert!(store.edge_version(e0).unwrap() > before);
        assert!(store.edge_version(e0.mate()).unwrap() > before);

        let e2 = store.alloc_edge();
        assert_eq!(e2, e0);
        assert_eq!(store.half_edge_slots(), 4);
    }

    #[test]
    fn freed_faces_lose_their_stamp() {
        let mut store = SlotStore::<()>::new();
        let f0 = store.alloc_face();
        let f1 = store.alloc_face();
        assert!(store.face_version(f1).unwrap() > store.face_version(f0).unwrap());

        store.free_face(f0);
        assert_eq!(store.face_version(f0), None);
        assert!(!store.contains_face(f0));
        assert_eq!(store.face_version(FaceId::NULL), None);
        assert_eq!(store.num_faces(), 1);

        let v = store.version();
        let f2 = store.alloc_face();
        assert_eq!(f2, f0);
        assert!(store.face_version(f2).unwrap() > v);
    }
}
