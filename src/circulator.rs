//! Lazy traversal of the half edges around a vertex or a face.

use std::{fmt, iter::FusedIterator, rc::Rc};

use crate::{
    hull::Hull,
    refs::HalfEdge,
};


/// The two kinds of rings a circulator can walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ring {
    /// All half edges leaving one vertex, in CCW order. Steps via
    /// `mate().next()`.
    Vertex,

    /// All half edges bounding one face, in CCW order. Steps via `next()`.
    Face,
}

impl Ring {
    /// Returns the half edge after `he` in this ring or `None` if `he` is not
    /// valid anymore.
    pub fn step<P>(self, hull: &Hull<P>, he: HalfEdge) -> Option<HalfEdge> {
        match self {
            Ring::Vertex => he.mate(hull).and_then(|mate| mate.next(hull)),
            Ring::Face => he.next(hull),
        }
    }
}

type Transform<'a, P, T> = Rc<dyn Fn(&'a Hull<P>, HalfEdge) -> Option<T> + 'a>;

/// Walks one ring of a hull, starting at the *principal* half edge, and maps
/// each half edge through a transformation.
///
/// A circulator can be consumed in two ways:
///
/// - As `Iterator` directly, it keeps circling the ring. Take as many
///   elements as you need.
/// - [`Circulator::sequence`] returns an iterator doing exactly one round
///   from the principal half edge. This is what you usually want.
///
/// Both stop early when the principal or the current half edge is not valid
/// anymore, or when the transformation returns `None`. Check
/// [`Circulator::is_valid`] to tell these cases apart.
pub struct Circulator<'a, P, T> {
    hull: &'a Hull<P>,
    principal: HalfEdge,
    current: Option<HalfEdge>,
    ring: Ring,
    transform: Transform<'a, P, T>,
}

impl<'a, P> Circulator<'a, P, HalfEdge> {
    pub(crate) fn new(hull: &'a Hull<P>, principal: HalfEdge, ring: Ring) -> Self {
        Self {
            hull,
            principal,
            current: Some(principal),
            ring,
            transform: Rc::new(|_: &'a Hull<P>, he: HalfEdge| Some(he)),
        }
    }
}

impl<'a, P, T: 'a> Circulator<'a, P, T> {
    /// The half edge this circulator starts at.
    pub fn principal(&self) -> HalfEdge {
        self.principal
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Returns `true` if the principal half edge is still valid. An invalid
    /// circulator does not yield any elements.
    pub fn is_valid(&self) -> bool {
        self.principal.is_valid(self.hull)
    }

    /// Returns a new circulator over the same ring that additionally maps all
    /// elements through `f`. Elements for which `f` returns `None` end the
    /// iteration.
    pub fn map<U, F>(self, f: F) -> Circulator<'a, P, U>
    where
        F: Fn(&'a Hull<P>, T) -> Option<U> + 'a,
    {
        let inner = self.transform;
        Circulator {
            hull: self.hull,
            principal: self.principal,
            current: self.current,
            ring: self.ring,
            transform: Rc::new(move |hull: &'a Hull<P>, he: HalfEdge| {
                inner(hull, he).and_then(|t| f(hull, t))
            }),
        }
    }

    /// Returns an iterator doing exactly one round around the ring, starting
    /// at the principal half edge. It can be called repeatedly and always
    /// starts from the beginning, regardless of how far this circulator was
    /// advanced.
    pub fn sequence(&self) -> Sequence<'_, 'a, P, T> {
        Sequence {
            circulator: self,
            current: Some(self.principal),
        }
    }
}

impl<P, T> Clone for Circulator<'_, P, T> {
    fn clone(&self) -> Self {
        Self {
            hull: self.hull,
            principal: self.principal,
            current: self.current,
            ring: self.ring,
            transform: self.transform.clone(),
        }
    }
}

impl<P, T> fmt::Debug for Circulator<'_, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Circulator")
            .field("principal", &self.principal)
            .field("current", &self.current)
            .field("ring", &self.ring)
            .finish()
    }
}

impl<'a, P, T: 'a> Iterator for Circulator<'a, P, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        if !self.principal.is_valid(self.hull) || !current.is_valid(self.hull) {
            self.current = None;
            return None;
        }

        let out = (self.transform)(self.hull, current);
        self.current = match out {
            Some(_) => self.ring.step(self.hull, current),
            None => None,
        };
        out
    }
}

impl<'a, P, T: 'a> FusedIterator for Circulator<'a, P, T> {}


/// One round around a ring. Created by [`Circulator::sequence`].
pub struct Sequence<'c, 'a, P, T> {
    circulator: &'c Circulator<'a, P, T>,
    current: Option<HalfEdge>,
}

impl<'c, 'a, P, T: 'a> Iterator for Sequence<'c, 'a, P, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.circulator;
        let current = self.current?;
        if !c.principal.is_valid(c.hull) || !current.is_valid(c.hull) {
            self.current = None;
            return None;
        }

        // Stop when arriving at the principal edge again. This terminates
        // even on a broken ring that never comes back, as long as it is
        // finite.
        let out = (c.transform)(c.hull, current);
        self.current = match out {
            Some(_) => c.ring.step(c.hull, current).filter(|&next| next != c.principal),
            None => None,
        };
        out
    }
}

impl<'c, 'a, P, T: 'a> FusedIterator for Sequence<'c, 'a, P, T> {}


#[cfg(test)]
mod tests {
    use cgmath::Point2;
    use super::*;

    fn triangle() -> (Hull<Point2<f64>>, HalfEdge) {
        let (hull, face) = Hull::from_polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]).unwrap();
        (hull, face.edge())
    }

    #[test]
    fn sequence_does_one_round() {
        let (hull, e) = triangle();
        let c = Circulator::new(&hull, e, Ring::Face);
        assert_eq!(c.sequence().count(), 3);
        assert_eq!(c.sequence().next(), Some(e));

        // Restartable
        assert_eq!(c.sequence().count(), 3);
    }

    #[test]
    fn iterator_keeps_circling() {
        let (hull, e) = triangle();
        let edges: Vec<_> = Circulator::new(&hull, e, Ring::Face).take(7).collect();
        assert_eq!(edges.len(), 7);
        assert_eq!(edges[0], edges[3]);
        assert_eq!(edges[6], e);
        assert_ne!(edges[0], edges[1]);
    }

    #[test]
    fn vertex_ring_of_border_vertex() {
        let (hull, e) = triangle();
        let c = Circulator::new(&hull, e, Ring::Vertex);
        let out: Vec<_> = c.sequence().collect();

        // One inner and one outer half edge leave each corner.
        assert_eq!(out.len(), 2);
        for he in out {
            assert_eq!(hull.origin(he.id()), hull.origin(e.id()));
        }
    }

    #[test]
    fn map_chains_lazily() {
        let (hull, e) = triangle();
        let positions: Vec<_> = Circulator::new(&hull, e, Ring::Face)
            .map(|hull, he| he.origin(hull))
            .map(|hull, v| v.position(hull).cloned())
            .sequence()
            .collect();

        assert_eq!(positions, vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
    }

    #[test]
    fn none_from_transform_ends_iteration() {
        let (hull, e) = triangle();
        let second = e.next(&hull).unwrap();
        let c = Circulator::new(&hull, e, Ring::Face)
            .map(move |_, he| if he == second { None } else { Some(he) });

        // The third edge would map to `Some` again, but is never reached.
        let mut seq = c.sequence();
        assert_eq!(seq.next(), Some(e));
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);

        let mut endless = c.clone();
        assert_eq!(endless.next(), Some(e));
        assert_eq!(endless.next(), None);
        assert_eq!(endless.next(), None);

        fn fused<I: FusedIterator>(_: &I) {}
        fused(&seq);
        fused(&endless);
    }

    #[test]
    fn stale_principal_stops_silently() {
        let (mut hull, e) = triangle();
        let id = e.id();
        hull.make_edge_vertex(Point2::new(-1.0, -1.0), e);

        let c = Circulator::new(&hull, e, Ring::Face);
        assert!(!c.is_valid());
        assert_eq!(c.sequence().count(), 0);

        let fresh = Circulator::new(&hull, hull.half_edge(id), Ring::Face);
        assert!(fresh.is_valid());
        assert_eq!(fresh.sequence().count(), 5);
    }
}
