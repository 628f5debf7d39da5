//! The Euler operators: the only way to change the connectivity of a hull.
//!
//! Each operator exists twice: a public method taking versioned handles and a
//! crate-internal `*_impl` method working on raw slot ids. The public method
//! panics if a handle is stale and otherwise just forwards to the raw one.
//! Inside an operator, links are always read right before they are needed
//! because earlier writes of the same operator can change them (this matters
//! for loops and dangling edges).

use smallvec::SmallVec;

use crate::{
    circulator::Ring,
    handle::{FaceId, HalfEdgeId},
    refs::HalfEdge,
};
use super::{Hull, TopologyError};


impl<P> Hull<P> {
    /// Makes sure the handle is still valid and returns its id. Panics
    /// otherwise.
    fn check_handle(&self, he: HalfEdge) -> HalfEdgeId {
        if !he.is_valid(self) {
            panic!(
                "stale handle {:?} (version {}) was passed to an Euler operator, but the hull \
                    was modified since (current version {})",
                he.id(),
                he.version(),
                self.version(),
            );
        }
        he.id()
    }

    /// Collects the outgoing half edges around `origin(from)`, starting with
    /// `from` and stopping right before `until`. Panics if `until` is not
    /// part of the vertex ring.
    fn vertex_fan(&self, from: HalfEdgeId, until: HalfEdgeId) -> SmallVec<[HalfEdgeId; 8]> {
        let mut fan = SmallVec::new();
        for he in self.ring(from, Ring::Vertex) {
            if he == until {
                return fan;
            }
            fan.push(he);
        }

        panic!("bug: {:?} is not part of the vertex ring of {:?}", until, from);
    }


    // ===========================================================================================
    // ===== Make shell
    // ===========================================================================================

    /// Creates two vertices at `p0` and `p1` connected by a new edge. The
    /// edge forms an isolated 2-cycle with the null face on both sides.
    ///
    /// Returns the half edge from `p0` to `p1`.
    pub fn make_shell(&mut self, p0: P, p1: P) -> HalfEdge {
        let he = self.make_shell_impl(p0, p1);
        HalfEdge::new(self, he)
    }

    pub(crate) fn make_shell_impl(&mut self, p0: P, p1: P) -> HalfEdgeId {
        let v0 = self.add_vertex(p0);
        let v1 = self.add_vertex(p1);
        let ne = self.add_edge(v0, v1);
        let me = ne.mate();

        self.set_next(ne, me);
        self.set_prev(ne, me);

        log::trace!("make_shell: {:?} from {:?} to {:?}", ne, v0, v1);
        ne
    }


    // ===========================================================================================
    // ===== Make/kill edge vertex
    // ===========================================================================================

    /// Creates a new vertex at `p` and an edge from it to `origin(e)`. The
    /// new pair is spliced into the ring of `e` right before `e` and inherits
    /// the face of `e`.
    ///
    /// ```text
    ///                           p
    ///                          ^ |
    ///                       me | | ne
    ///                          | v
    ///   ---- prev(e) ---->  origin(e)  ---- e ---->
    /// ```
    ///
    /// Returns the new half edge leaving `p`. The new vertex has degree one,
    /// so `mate` of the returned half edge is its predecessor.
    pub fn make_edge_vertex(&mut self, p: P, e: HalfEdge) -> HalfEdge {
        let e = self.check_handle(e);
        let ne = self.make_edge_vertex_impl(p, e);
        HalfEdge::new(self, ne)
    }

    pub(crate) fn make_edge_vertex_impl(&mut self, p: P, e: HalfEdgeId) -> HalfEdgeId {
        let u = self.origin(e);
        let f = self.face(e);
        let v = self.add_vertex(p);
        let ne = self.add_edge(v, u);
        let me = ne.mate();

        let prev = self.prev(e);
        self.set_next(prev, me);
        self.set_next(me, ne);
        self.set_next(ne, e);

        self.set_face(ne, f);
        self.set_face(me, f);

        log::trace!("make_edge_vertex: {:?} from new {:?} to {:?}, before {:?}", ne, v, u, e);
        ne
    }

    /// Splits the common origin `u` of `e0` and `e1` into two vertices.
    ///
    /// The outgoing half edges around `u` from `e0` up to (excluding) `e1`
    /// move to a new vertex at `p`; `e1` and the rest stay at `u`. A new
    /// edge from `p` to `u` joins the two. If `e0 == e1`, this is
    /// [`Hull::make_edge_vertex`].
    ///
    /// Returns the new half edge leaving `p`, which lies in the ring of `e1`.
    /// Fails with `OriginMismatch` if the two half edges do not start at the
    /// same vertex.
    pub fn make_edge_vertex_split(
        &mut self,
        p: P,
        e0: HalfEdge,
        e1: HalfEdge,
    ) -> Result<HalfEdge, TopologyError> {
        let e0 = self.check_handle(e0);
        let e1 = self.check_handle(e1);
        let ne = self.make_edge_vertex_split_impl(p, e0, e1)?;
        Ok(HalfEdge::new(self, ne))
    }

    pub(crate) fn make_edge_vertex_split_impl(
        &mut self,
        p: P,
        e0: HalfEdgeId,
        e1: HalfEdgeId,
    ) -> Result<HalfEdgeId, TopologyError> {
        if e0 == e1 {
            return Ok(self.make_edge_vertex_impl(p, e0));
        }
        let u = self.origin(e0);
        if u != self.origin(e1) {
            return Err(TopologyError::OriginMismatch(e0, e1));
        }

        let fan = self.vertex_fan(e0, e1);
        let e2 = self.prev(e0);
        let e3 = self.prev(e1);
        let f0 = self.face(e0);
        let f1 = self.face(e1);

        let v = self.add_vertex(p);
        let ne = self.add_edge(v, u);
        let me = ne.mate();

        for &he in &fan {
            self.set_origin(he, v);
        }

        self.set_next(e2, me);
        self.set_next(me, e0);
        self.set_next(ne, e1);
        self.set_next(e3, ne);

        self.set_face(ne, f1);
        self.set_face(me, f0);

        log::trace!(
            "make_edge_vertex_split: {:?} from new {:?} to {:?}, moved {} half edges",
            ne,
            v,
            u,
            fan.len(),
        );
        Ok(ne)
    }

    /// Removes `e` together with its origin vertex. This is the inverse of
    /// [`Hull::make_edge_vertex`] and [`Hull::make_edge_vertex_split`]: all
    /// other half edges of the removed vertex are merged into `target(e)`.
    ///
    /// If the edge is an isolated 2-cycle (as created by
    /// [`Hull::make_shell`]), both vertices are removed. Fails with
    /// `SelfLoop` if `e` starts and ends at the same vertex.
    pub fn kill_edge_vertex(&mut self, e: HalfEdge) -> Result<(), TopologyError> {
        let e = self.check_handle(e);
        self.kill_edge_vertex_impl(e)
    }

    pub(crate) fn kill_edge_vertex_impl(&mut self, e: HalfEdgeId) -> Result<(), TopologyError> {
        let u = self.origin(e);
        let v = self.target(e);
        if u == v {
            return Err(TopologyError::SelfLoop(e));
        }

        let me = e.mate();
        let e0 = self.next(me);
        let e3 = self.prev(e);

        // All other outgoing half edges of `u`. Their origin moves to `v`.
        let moved: SmallVec<[HalfEdgeId; 8]> = self.ring(e, Ring::Vertex).skip(1).collect();

        self.remove_vertex(u);

        if e0 == e {
            // `u` has degree one
            if self.next(e) == me {
                self.remove_vertex(v);
                log::trace!("kill_edge_vertex: removed isolated {:?} with {:?} and {:?}", e, u, v);
            } else {
                let prev = self.prev(me);
                let next = self.next(e);
                self.set_next(prev, next);
                log::trace!("kill_edge_vertex: removed dangling {:?} with {:?}", e, u);
            }
            self.remove_edge(e);
            return Ok(());
        }

        for &he in &moved {
            self.set_origin(he, v);
        }

        let prev = self.prev(me);
        self.set_next(prev, e0);
        let next = self.next(e);
        self.set_next(e3, next);

        self.remove_edge(e);

        log::trace!("kill_edge_vertex: removed {:?}, merged {:?} into {:?}", e, u, v);
        Ok(())
    }


    // ===========================================================================================
    // ===== Make/kill edge face
    // ===========================================================================================

    /// Creates a loop edge at `origin(e)`, inserted into the ring of `e`
    /// right before `e`. The inner side of the loop gets a new face, the
    /// outer side keeps the face of `e`.
    ///
    /// Returns the inner half edge, whose `next` is itself.
    pub fn make_edge_face_loop(&mut self, e: HalfEdge) -> HalfEdge {
        let e = self.check_handle(e);
        let ne = self.make_edge_face_loop_impl(e);
        HalfEdge::new(self, ne)
    }

    pub(crate) fn make_edge_face_loop_impl(&mut self, e: HalfEdgeId) -> HalfEdgeId {
        let v = self.origin(e);
        let f = self.face(e);
        let e1 = self.prev(e);
        let ne = self.add_edge(v, v);
        let me = ne.mate();

        self.set_next(me, e);
        self.set_next(e1, me);
        self.set_next(ne, ne);

        let nf = self.add_face();
        self.set_face(ne, nf);
        self.set_face(me, f);

        log::trace!("make_edge_face_loop: {:?} at {:?} with new {:?}", ne, v, nf);
        ne
    }

    /// Creates an edge from `origin(e1)` to `origin(e0)`, splitting the ring
    /// both half edges lie on into two.
    ///
    /// The ring starting with the new half edge, which continues with `e0`,
    /// gets a new face. The other ring (containing the mate and `e1`) keeps
    /// the old face.
    ///
    /// ```text
    ///        e0                          e0
    ///   o ----------> o             o ----------> o
    ///   ^             |             ^ ^    new  / |
    ///   |     f       |     =>      |  \ ne    /  |
    ///   |             v             |   \  f  v   v
    ///   o <---------- o             o <---------- o
    ///        e1                           e1
    /// ```
    ///
    /// If `e0 == e1`, this is [`Hull::make_edge_face_loop`]. Fails with
    /// `DifferentRings` if `e1` cannot be reached from `e0` via `next`.
    pub fn make_edge_face(
        &mut self,
        e0: HalfEdge,
        e1: HalfEdge,
    ) -> Result<HalfEdge, TopologyError> {
        let e0 = self.check_handle(e0);
        let e1 = self.check_handle(e1);
        let ne = self.make_edge_face_impl(e0, e1)?;
        Ok(HalfEdge::new(self, ne))
    }

    pub(crate) fn make_edge_face_impl(
        &mut self,
        e0: HalfEdgeId,
        e1: HalfEdgeId,
    ) -> Result<HalfEdgeId, TopologyError> {
        if e0 == e1 {
            return Ok(self.make_edge_face_loop_impl(e0));
        }
        if !self.face_ring_contains(e0, e1) {
            return Err(TopologyError::DifferentRings(e0, e1));
        }

        let f = self.face(e0);
        debug_assert_eq!(self.face(e1), f);

        let ne = self.add_edge(self.origin(e1), self.origin(e0));
        let me = ne.mate();

        let p1 = self.prev(e1);
        self.set_next(p1, ne);
        self.set_next(me, e1);
        let p0 = self.prev(e0);
        self.set_next(p0, me);
        self.set_next(ne, e0);

        let nf = self.add_face();
        let ring: SmallVec<[HalfEdgeId; 8]> = self.ring(ne, Ring::Face).collect();
        for he in ring {
            self.set_face(he, nf);
        }
        self.set_face(me, f);

        debug_assert_eq!(self.face(e0), nf);
        debug_assert_eq!(self.face(e1), f);

        log::trace!("make_edge_face: {:?} splits {:?}, new {:?}", ne, f, nf);
        Ok(ne)
    }

    /// Removes the edge `e` and merges the faces on both of its sides into
    /// one. This is the inverse of [`Hull::make_edge_face`].
    ///
    /// The face of `mate(e)` survives and the face of `e` is freed, except
    /// when the face of `e` is the null face: the null face always survives.
    /// Hole rings of the freed face become hole rings of the surviving one.
    /// Fails with `SameFace` if both sides already belong to one face.
    pub fn kill_edge_face(&mut self, e: HalfEdge) -> Result<(), TopologyError> {
        let e = self.check_handle(e);
        self.kill_edge_face_impl(e)
    }

    pub(crate) fn kill_edge_face_impl(&mut self, e: HalfEdgeId) -> Result<(), TopologyError> {
        if self.face(e) == self.face(e.mate()) {
            return Err(TopologyError::SameFace(e));
        }
        let (e, me) = if self.face(e).is_null() { (e.mate(), e) } else { (e, e.mate()) };
        let f = self.face(me);
        let dead = self.face(e);

        // Relabel every ring of the dead face, including its holes.
        let relabel: SmallVec<[HalfEdgeId; 8]> = self.face_half_edges(dead)
            .into_iter()
            .filter(|&he| he != e)
            .collect();
        for he in relabel {
            self.set_face(he, f);
        }

        let prev = self.prev(e);
        let next = self.next(me);
        self.set_next(prev, next);
        let prev = self.prev(me);
        let next = self.next(e);
        self.set_next(prev, next);

        self.remove_face(dead);
        self.remove_edge(e);

        log::trace!("kill_edge_face: removed {:?}, merged {:?} into {:?}", e, dead, f);
        Ok(())
    }


    // ===========================================================================================
    // ===== Make edge kill ring / kill edge make ring
    // ===========================================================================================

    /// Creates a bridge edge from `origin(e0)` to `origin(e1)` joining two
    /// distinct rings of the same face (for example the outer boundary and a
    /// hole) into one.
    ///
    /// Returns the new half edge leaving `origin(e0)`. Fails with
    /// `DifferentFaces` if `e0` and `e1` do not belong to the same face and
    /// with `SameRing` if they are already on the same ring.
    pub fn make_edge_kill_ring(
        &mut self,
        e0: HalfEdge,
        e1: HalfEdge,
    ) -> Result<HalfEdge, TopologyError> {
        let e0 = self.check_handle(e0);
        let e1 = self.check_handle(e1);
        let ne = self.make_edge_kill_ring_impl(e0, e1)?;
        Ok(HalfEdge::new(self, ne))
    }

    pub(crate) fn make_edge_kill_ring_impl(
        &mut self,
        e0: HalfEdgeId,
        e1: HalfEdgeId,
    ) -> Result<HalfEdgeId, TopologyError> {
        let f = self.face(e0);
        if self.face(e1) != f {
            return Err(TopologyError::DifferentFaces(e0, e1));
        }
        if self.face_ring_contains(e0, e1) {
            return Err(TopologyError::SameRing(e0, e1));
        }

        let ne = self.add_edge(self.origin(e0), self.origin(e1));
        let me = ne.mate();

        let p1 = self.prev(e1);
        self.set_next(p1, me);
        let p0 = self.prev(e0);
        self.set_next(p0, ne);
        self.set_next(ne, e1);
        self.set_next(me, e0);

        self.set_face(ne, f);
        self.set_face(me, f);

        log::trace!("make_edge_kill_ring: bridge {:?} in {:?}", ne, f);
        Ok(ne)
    }

    /// Removes the bridge edge `e`, splitting its ring into two rings of the
    /// same face. This is the inverse of [`Hull::make_edge_kill_ring`].
    ///
    /// Fails with `NotABridge` if the two sides of `e` belong to different
    /// faces or rings, or if `e` dangles (one of its ends has no other
    /// edge).
    pub fn kill_edge_make_ring(&mut self, e: HalfEdge) -> Result<(), TopologyError> {
        let e = self.check_handle(e);
        self.kill_edge_make_ring_impl(e)
    }

    pub(crate) fn kill_edge_make_ring_impl(&mut self, e: HalfEdgeId) -> Result<(), TopologyError> {
        let me = e.mate();
        let f = self.face(e);
        let is_bridge = self.face(me) == f
            && self.next(e) != me
            && self.next(me) != e
            && self.face_ring_contains(e, me);
        if !is_bridge {
            return Err(TopologyError::NotABridge(e));
        }

        let prev = self.prev(e);
        let next = self.next(me);
        self.set_next(prev, next);
        let prev = self.prev(me);
        let next = self.next(e);
        self.set_next(prev, next);

        self.remove_edge(e);

        log::trace!("kill_edge_make_ring: removed bridge {:?} in {:?}", e, f);
        Ok(())
    }


    // ===========================================================================================
    // ===== Kill face make ring hole
    // ===========================================================================================

    /// Removes the face of `e0` by relabeling its ring to the face of `e1`.
    /// The ring stays as it is and becomes a hole ring of that face, as do
    /// the hole rings the removed face had. No `next`/`prev` links are
    /// touched.
    ///
    /// Fails if the face of `e0` is the null face, if `e0` and `e1` already
    /// belong to the same face or if the face of `e1` is directly across
    /// `e0`.
    pub fn kill_face_make_ring_hole(
        &mut self,
        e0: HalfEdge,
        e1: HalfEdge,
    ) -> Result<(), TopologyError> {
        let e0 = self.check_handle(e0);
        let e1 = self.check_handle(e1);
        self.kill_face_make_ring_hole_impl(e0, e1)
    }

    pub(crate) fn kill_face_make_ring_hole_impl(
        &mut self,
        e0: HalfEdgeId,
        e1: HalfEdgeId,
    ) -> Result<(), TopologyError> {
        let f: FaceId = self.face(e1);
        let f0 = self.face(e0);
        if f0.is_null() {
            return Err(TopologyError::NullFace);
        }
        if f0 == f {
            return Err(TopologyError::SharedFace(e0, e1));
        }
        if self.face(e0.mate()) == f {
            return Err(TopologyError::AdjacentFaces(e0, e1));
        }

        // Holes of the dead face become holes of `f` as well.
        for he in self.face_half_edges(f0) {
            self.set_face(he, f);
        }
        self.remove_face(f0);

        log::trace!("kill_face_make_ring_hole: {:?} is now a hole of {:?}", f0, f);
        Ok(())
    }
}
