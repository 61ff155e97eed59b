//! Backing-store selection for externally owned memory.
//!
//! Given a [`MemoryHandle`] and a `direct` hint, [`create`] picks the
//! concrete realization:
//!
//! - `direct` and the raw singleton is available and the handle has a
//!   stable address: raw-backed, the fastest path
//! - `direct` but no raw capability (or no address): buffer-window over
//!   the same handle, no copy
//! - not `direct`: eager copy into a fresh array, written back to the
//!   origin on release
//!
//! Raw-access unavailability is not an error; it is the documented
//! fallback trigger, handled entirely here so call sites never probe the
//! singleton themselves.

use ndaccess_index::{Coordinates, Index, StrideIndex};

use crate::element::Element;
use crate::handle::MemoryHandle;
use crate::indexer::Indexer;
use crate::storage::{RawStore, WindowStore, WritebackStore};

/// Which realization [`create`] selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Direct access at the handle's address.
    Raw,
    /// Access through the handle's element-typed window.
    Window,
    /// An owned copy, written back on release.
    Copied,
}

/// An indexer over externally owned memory, in whichever realization the
/// factory selected.
///
/// The accessor surface mirrors [`Indexer`]; every call dispatches to the
/// selected arm. For the `Copied` arm the documented contract applies:
/// the indexer is the sole mutable view of the window during its
/// lifetime, mutations are invisible in the origin until [`release`]
/// (or drop), and visible immediately after.
///
/// [`release`]: SourceIndexer::release
pub enum SourceIndexer<E, H, I = StrideIndex>
where
    E: Element,
    H: MemoryHandle<E::Repr>,
    I: Index,
{
    Raw(Indexer<E, RawStore<E::Repr, H>, I>),
    Window(Indexer<E, WindowStore<E::Repr, H>, I>),
    Copied(Indexer<E, WritebackStore<E::Repr, H>, I>),
}

/// Creates an indexer over the handle's accessible window.
///
/// `direct` asks for in-place access; without it the window is copied up
/// front and written back on release.
pub fn create<E, H, I>(handle: H, index: I, direct: bool) -> SourceIndexer<E, H, I>
where
    E: Element,
    H: MemoryHandle<E::Repr>,
    I: Index,
{
    if direct {
        match ndaccess_raw::instance() {
            Some(raw) if handle.address() != 0 => {
                SourceIndexer::Raw(Indexer::new(RawStore::new(handle, raw), index))
            }
            _ => SourceIndexer::Window(Indexer::new(WindowStore::new(handle), index)),
        }
    } else {
        SourceIndexer::Copied(Indexer::new(WritebackStore::new(handle), index))
    }
}

impl<E, H, I> SourceIndexer<E, H, I>
where
    E: Element,
    H: MemoryHandle<E::Repr>,
    I: Index,
{
    /// Which realization was selected.
    pub fn kind(&self) -> BackendKind {
        match self {
            SourceIndexer::Raw(_) => BackendKind::Raw,
            SourceIndexer::Window(_) => BackendKind::Window,
            SourceIndexer::Copied(_) => BackendKind::Copied,
        }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        match self {
            SourceIndexer::Raw(ix) => ix.rank(),
            SourceIndexer::Window(ix) => ix.rank(),
            SourceIndexer::Copied(ix) => ix.rank(),
        }
    }

    /// Extent of each dimension.
    pub fn sizes(&self) -> &[i64] {
        match self {
            SourceIndexer::Raw(ix) => ix.sizes(),
            SourceIndexer::Window(ix) => ix.sizes(),
            SourceIndexer::Copied(ix) => ix.sizes(),
        }
    }

    /// Extent of dimension `dim`.
    pub fn size(&self, dim: usize) -> i64 {
        match self {
            SourceIndexer::Raw(ix) => ix.size(dim),
            SourceIndexer::Window(ix) => ix.size(dim),
            SourceIndexer::Copied(ix) => ix.size(dim),
        }
    }

    /// Linear offset of a coordinate tuple.
    pub fn index_of<C: Coordinates>(&self, coords: C) -> i64 {
        match self {
            SourceIndexer::Raw(ix) => ix.index_of(coords),
            SourceIndexer::Window(ix) => ix.index_of(coords),
            SourceIndexer::Copied(ix) => ix.index_of(coords),
        }
    }

    /// Reads the element at `coords`.
    pub fn get<C: Coordinates>(&self, coords: C) -> E::Value {
        match self {
            SourceIndexer::Raw(ix) => ix.get(coords),
            SourceIndexer::Window(ix) => ix.get(coords),
            SourceIndexer::Copied(ix) => ix.get(coords),
        }
    }

    /// Writes the element at `coords`.
    pub fn put<C: Coordinates>(&mut self, coords: C, value: E::Value) {
        match self {
            SourceIndexer::Raw(ix) => ix.put(coords, value),
            SourceIndexer::Window(ix) => ix.put(coords, value),
            SourceIndexer::Copied(ix) => ix.put(coords, value),
        }
    }

    /// Reads `dst.len()` elements starting at `coords`.
    pub fn get_slice<C: Coordinates>(&self, coords: C, dst: &mut [E::Value]) {
        match self {
            SourceIndexer::Raw(ix) => ix.get_slice(coords, dst),
            SourceIndexer::Window(ix) => ix.get_slice(coords, dst),
            SourceIndexer::Copied(ix) => ix.get_slice(coords, dst),
        }
    }

    /// Writes `src.len()` elements starting at `coords`.
    pub fn put_slice<C: Coordinates>(&mut self, coords: C, src: &[E::Value]) {
        match self {
            SourceIndexer::Raw(ix) => ix.put_slice(coords, src),
            SourceIndexer::Window(ix) => ix.put_slice(coords, src),
            SourceIndexer::Copied(ix) => ix.put_slice(coords, src),
        }
    }

    /// Writes back any buffered state and consumes the accessor.
    pub fn release(self) {
        match self {
            SourceIndexer::Raw(ix) => ix.release(),
            SourceIndexer::Window(ix) => ix.release(),
            SourceIndexer::Copied(ix) => ix.release(),
        }
    }
}
