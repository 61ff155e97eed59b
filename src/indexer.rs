//! The generic multidimensional accessor.
//!
//! An [`Indexer`] binds one element encoding, one backing store and one
//! index strategy. Every access funnels its coordinate tuple through the
//! strategy to a linear offset, which the store bounds-checks and applies.
//! One generic definition replaces the per-width, per-store accessor
//! family a handwritten implementation would need; the width-specific
//! behavior lives entirely in the [`Element`] and
//! [`Primitive`](ndaccess_raw::Primitive) glue.

use std::marker::PhantomData;

use ndaccess_index::{Coordinates, Index, StrideIndex};

use crate::codec;
use crate::element::Element;
use crate::storage::{ByteStorage, SliceStore, Storage};

/// A typed multidimensional accessor over one backing store.
///
/// `E` is the element encoding, `S` the backing store, `I` the index
/// strategy. Scalar access takes any [`Coordinates`] arity; bulk access
/// copies a contiguous run starting at the computed linear offset,
/// advancing by 1 per element (the innermost dimension is assumed to have
/// unit stride, as with [`ndaccess_index::default_strides`] layouts).
pub struct Indexer<E: Element, S: Storage<E::Repr>, I: Index = StrideIndex> {
    index: I,
    store: S,
    _element: PhantomData<E>,
}

impl<E: Element, S: Storage<E::Repr>, I: Index> Indexer<E, S, I> {
    /// Binds a store to an index strategy.
    pub fn new(store: S, index: I) -> Self {
        Self {
            index,
            store,
            _element: PhantomData,
        }
    }

    /// The bound index strategy.
    #[inline]
    pub fn index(&self) -> &I {
        &self.index
    }

    /// The bound backing store.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.index.rank()
    }

    /// Extent of each dimension.
    #[inline]
    pub fn sizes(&self) -> &[i64] {
        self.index.sizes()
    }

    /// Extent of dimension `dim`.
    #[inline]
    pub fn size(&self, dim: usize) -> i64 {
        self.index.size(dim)
    }

    /// `sizes()[0]`.
    #[inline]
    pub fn rows(&self) -> i64 {
        self.index.size(0)
    }

    /// `sizes()[1]`.
    #[inline]
    pub fn cols(&self) -> i64 {
        self.index.size(1)
    }

    /// `sizes()[1]`.
    #[inline]
    pub fn width(&self) -> i64 {
        self.index.size(1)
    }

    /// `sizes()[0]`.
    #[inline]
    pub fn height(&self) -> i64 {
        self.index.size(0)
    }

    /// `sizes()[2]`.
    #[inline]
    pub fn channels(&self) -> i64 {
        self.index.size(2)
    }

    /// Linear offset of a coordinate tuple.
    #[inline]
    pub fn index_of<C: Coordinates>(&self, coords: C) -> i64 {
        coords.linearize(&self.index)
    }

    /// Reads the element at `coords`.
    #[inline]
    pub fn get<C: Coordinates>(&self, coords: C) -> E::Value {
        E::decode(self.store.load(self.index_of(coords)))
    }

    /// Writes the element at `coords`.
    #[inline]
    pub fn put<C: Coordinates>(&mut self, coords: C, value: E::Value) {
        let offset = self.index_of(coords);
        self.store.store(offset, E::encode(value));
    }

    /// Reads `dst.len()` elements starting at `coords`.
    ///
    /// Java-style `(offset, length)` windows are expressed by passing a
    /// subslice.
    pub fn get_slice<C: Coordinates>(&self, coords: C, dst: &mut [E::Value]) {
        let start = self.index_of(coords);
        for (n, slot) in dst.iter_mut().enumerate() {
            *slot = E::decode(self.store.load(start + n as i64));
        }
    }

    /// Writes `src.len()` elements starting at `coords`.
    pub fn put_slice<C: Coordinates>(&mut self, coords: C, src: &[E::Value]) {
        let start = self.index_of(coords);
        for (n, value) in src.iter().enumerate() {
            self.store.store(start + n as i64, E::encode(*value));
        }
    }

    /// Rebinds the same storage to a different index strategy.
    pub fn reindex<I2: Index>(self, index: I2) -> Indexer<E, S, I2> {
        Indexer {
            index,
            store: self.store,
            _element: PhantomData,
        }
    }

    /// Writes back any buffered state and consumes the accessor.
    ///
    /// For copy-based stores this propagates mutations to the origin;
    /// for direct stores it only ends the borrow. Either way the indexer
    /// cannot be used afterwards.
    pub fn release(self) {
        self.store.release();
    }
}

impl<'a, E: Element, I: Index> Indexer<E, SliceStore<'a, E::Repr>, I> {
    /// Creates an array-backed indexer over a borrowed slice.
    pub fn over_slice(data: &'a mut [E::Repr], index: I) -> Self {
        Self::new(SliceStore::new(data), index)
    }
}

// ============================================================================
// Reinterpreting accessors
// ============================================================================

/// Wider-type access into byte-unit indexers.
///
/// These bypass the index strategy entirely: offsets are *byte* positions
/// into the backing store, bounds-checked against
/// `len - width_in_bytes + 1`, and values are assembled in machine byte
/// order.
impl<E, S, I> Indexer<E, S, I>
where
    E: Element<Repr = u8>,
    S: ByteStorage,
    I: Index,
{
    /// Reads an `i16` at byte offset `byte`.
    #[inline]
    pub fn get_i16(&self, byte: i64) -> i16 {
        self.store.load_wide(byte)
    }

    /// Writes an `i16` at byte offset `byte`.
    #[inline]
    pub fn put_i16(&mut self, byte: i64, value: i16) {
        self.store.store_wide(byte, value);
    }

    /// Reads a `u16` at byte offset `byte`.
    #[inline]
    pub fn get_u16(&self, byte: i64) -> u16 {
        self.store.load_wide(byte)
    }

    /// Writes a `u16` at byte offset `byte`.
    #[inline]
    pub fn put_u16(&mut self, byte: i64, value: u16) {
        self.store.store_wide(byte, value);
    }

    /// Reads an `i32` at byte offset `byte`.
    #[inline]
    pub fn get_i32(&self, byte: i64) -> i32 {
        self.store.load_wide(byte)
    }

    /// Writes an `i32` at byte offset `byte`.
    #[inline]
    pub fn put_i32(&mut self, byte: i64, value: i32) {
        self.store.store_wide(byte, value);
    }

    /// Reads an `i64` at byte offset `byte`.
    #[inline]
    pub fn get_i64(&self, byte: i64) -> i64 {
        self.store.load_wide(byte)
    }

    /// Writes an `i64` at byte offset `byte`.
    #[inline]
    pub fn put_i64(&mut self, byte: i64, value: i64) {
        self.store.store_wide(byte, value);
    }

    /// Reads an `f32` at byte offset `byte`.
    #[inline]
    pub fn get_f32(&self, byte: i64) -> f32 {
        self.store.load_wide(byte)
    }

    /// Writes an `f32` at byte offset `byte`.
    #[inline]
    pub fn put_f32(&mut self, byte: i64, value: f32) {
        self.store.store_wide(byte, value);
    }

    /// Reads an `f64` at byte offset `byte`.
    #[inline]
    pub fn get_f64(&self, byte: i64) -> f64 {
        self.store.load_wide(byte)
    }

    /// Writes an `f64` at byte offset `byte`.
    #[inline]
    pub fn put_f64(&mut self, byte: i64, value: f64) {
        self.store.store_wide(byte, value);
    }

    /// Reads a half-precision value at byte offset `byte` as `f32`.
    #[inline]
    pub fn get_half(&self, byte: i64) -> f32 {
        codec::half::to_f32(self.store.load_wide(byte))
    }

    /// Writes an `f32` as half-precision at byte offset `byte`.
    #[inline]
    pub fn put_half(&mut self, byte: i64, value: f32) {
        self.store.store_wide(byte, codec::half::from_f32(value));
    }

    /// Reads a bfloat16 value at byte offset `byte` as `f32`.
    #[inline]
    pub fn get_bf16(&self, byte: i64) -> f32 {
        codec::bf16::to_f32(self.store.load_wide(byte))
    }

    /// Writes an `f32` as bfloat16 at byte offset `byte`.
    #[inline]
    pub fn put_bf16(&mut self, byte: i64, value: f32) {
        self.store.store_wide(byte, codec::bf16::from_f32(value));
    }
}

// ============================================================================
// Tests
// ============================================================================
