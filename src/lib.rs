//! A half edge topology kernel.
//!
//! This crate stores polygonal surfaces (planar subdivisions in 2D or
//! polyhedral surfaces in 3D) as a half edge data structure, the [`Hull`].
//! Its connectivity can only be changed through a closed set of *Euler
//! operators* like [`Hull::make_edge_vertex`] or [`Hull::make_edge_face`],
//! each of which leaves the hull in a consistent state. Higher level
//! operations ([`Hull::add_polygon`], [`Face::split`]) are built from them.
//!
//! Elements are referred to by versioned handles ([`HalfEdge`], [`Vertex`],
//! [`Face`]). The hull has a global version counter and stamps every slot it
//! writes, so a handle can tell whether the part of the hull it points to was
//! changed after the handle was created. Rings around vertices and faces are
//! traversed with a [`Circulator`].
//!
//! ```
//! use cgmath::Point2;
//! use hull::Hull;
//!
//! let mut hull = Hull::new();
//! let face = hull.add_polygon(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//! ]).unwrap();
//!
//! let corners: Vec<_> = face.vertices(&hull)
//!     .map(|hull, v| v.position(hull).cloned())
//!     .sequence()
//!     .collect();
//! assert_eq!(corners[1], Point2::new(1.0, 0.0));
//!
//! assert_eq!(hull.triangle_indices(), vec![0, 1, 2]);
//! assert_eq!(hull.line_indices().len(), 6);
//! ```
//!
//! # Features
//!
//! - `large-handle`: use `u64` instead of `u32` as slot index type
//!   ([`hsize`]).


pub mod circulator;
pub mod handle;
pub mod hull;
pub mod math;
pub mod refs;
mod store;

pub use self::{
    circulator::{Circulator, Ring},
    handle::{hsize, FaceId, HalfEdgeId, Handle, VertexId},
    hull::{Hull, TopologyError},
    math::Point,
    refs::{Face, HalfEdge, Vertex},
    store::Version,
};
