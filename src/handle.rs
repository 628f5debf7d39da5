//! Raw slot ids of the elements stored in a [`Hull`][crate::Hull].
//!
//! These ids are plain indices into the tables of a hull. They carry no
//! version information and thus cannot tell whether the slot they refer to
//! was modified or freed in the meantime. The versioned handles built on top
//! of them live in [`refs`][crate::refs].

use std::fmt;

use static_assertions::assert_eq_size;


/// The integer type used for all slot ids.
///
/// This is `u32` by default and `u64` if the `large-handle` feature is
/// enabled.
#[cfg(not(feature = "large-handle"))]
#[allow(non_camel_case_types)]
pub type hsize = u32;

/// The integer type used for all slot ids.
#[cfg(feature = "large-handle")]
#[allow(non_camel_case_types)]
pub type hsize = u64;


/// Common functionality of all slot id types.
pub trait Handle: 'static + Copy + fmt::Debug + Eq + Ord {
    /// Creates a slot id from the given index.
    fn new(idx: hsize) -> Self;

    /// Returns the index of this id.
    fn idx(&self) -> hsize;

    /// Creates a slot id from the given `usize`. Panics if the value does not
    /// fit into `hsize`.
    #[inline(always)]
    fn from_usize(raw: usize) -> Self {
        assert!(raw <= hsize::max_value() as usize, "slot index {} overflows `hsize`", raw);
        Self::new(raw as hsize)
    }

    /// Returns the index of this id as `usize`.
    #[inline(always)]
    fn to_usize(&self) -> usize {
        self.idx() as usize
    }
}

macro_rules! make_handle_type {
    ($(#[$attr:meta])* $name:ident, $short:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(hsize);

        impl Handle for $name {
            #[inline(always)]
            fn new(idx: hsize) -> Self {
                $name(idx)
            }

            #[inline(always)]
            fn idx(&self) -> hsize {
                self.0
            }
        }

        // `hsize::max_value()` is never a valid slot: the tables would not
        // fit into memory long before that.
        impl optional::Noned for $name {
            fn is_none(&self) -> bool {
                self.0 == hsize::max_value()
            }
            fn get_none() -> Self {
                $name(hsize::max_value())
            }
        }

        impl optional::OptEq for $name {
            fn opt_eq(&self, other: &Self) -> bool {
                self == other
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}{}", $short, self.idx())
            }
        }
    }
}

make_handle_type!(
    /// Id of a vertex slot.
    VertexId, "V"
);
make_handle_type!(
    /// Id of a half edge slot. Twins always occupy the slots `2k` and
    /// `2k + 1`.
    HalfEdgeId, "HE"
);
make_handle_type!(
    /// Id of a face slot. [`FaceId::NULL`] denotes the unbounded face.
    FaceId, "F"
);

assert_eq_size!(optional::Optioned<HalfEdgeId>, HalfEdgeId);
assert_eq_size!(optional::Optioned<VertexId>, VertexId);

impl HalfEdgeId {
    /// Returns the id of the twin half edge.
    ///
    /// Twins are always stored next to each other and the first one has an
    /// even index. Flipping the lowest bit thus yields the twin.
    #[inline(always)]
    pub fn mate(self) -> Self {
        HalfEdgeId(self.0 ^ 1)
    }

    /// Returns the index of the full edge (the twin pair) this half edge
    /// belongs to.
    #[inline(always)]
    pub fn edge_idx(self) -> hsize {
        self.0 / 2
    }

    /// Returns the half edge of the given pair with the lower index.
    #[inline(always)]
    pub fn lower_half_of(edge_idx: hsize) -> Self {
        HalfEdgeId(edge_idx * 2)
    }
}

impl FaceId {
    /// The sentinel id of the unbounded (boundary) face. It is never stored
    /// in the face table and is not counted as a face.
    pub const NULL: FaceId = FaceId(hsize::max_value());

    /// Returns `true` if this is [`FaceId::NULL`].
    #[inline(always)]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}
