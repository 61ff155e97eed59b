//! Backing-store realizations.
//!
//! A [`Storage`] is a bounds-checked linear sequence of one primitive
//! unit. The indexer layer never touches memory itself; it computes a
//! linear offset and hands it to one of the realizations here:
//!
//! - [`SliceStore`]: a borrowed contiguous slice
//! - [`WindowStore`]: the `position()..limit()` window of a
//!   [`MemoryHandle`], every access going through the handle
//! - [`RawStore`]: direct access at `address() + position() * BYTES`
//!   through the process-wide raw singleton
//! - [`WritebackStore`]: an owned copy of the window, written back to the
//!   origin on release
//!
//! Every realization checks `0 <= i < len()` *before* touching memory and
//! panics naming the offending index. A zero-length store constructs and
//! releases fine; any access panics, because no index into an empty
//! resource is valid.

use std::marker::PhantomData;

use ndaccess_raw::{Primitive, Raw};

use crate::handle::MemoryHandle;

/// Validates a linear offset against an accessible extent.
///
/// Returns `i` unchanged so it can wrap an access expression. Panics
/// before any memory is touched otherwise.
#[inline]
#[track_caller]
pub fn check_index(i: i64, size: i64) -> i64 {
    if i < 0 || i >= size {
        panic!("index out of range: {i} (accessible extent {size})");
    }
    i
}

// ============================================================================
// Storage trait
// ============================================================================

/// A bounds-checked linear sequence of storage units.
pub trait Storage<P: Primitive> {
    /// Number of accessible units.
    fn len(&self) -> i64;

    /// Whether no unit is accessible.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the unit at linear offset `i`.
    fn load(&self, i: i64) -> P;

    /// Writes the unit at linear offset `i`.
    fn store(&mut self, i: i64, value: P);

    /// Writes back any buffered state and invalidates the store.
    ///
    /// Most realizations have nothing to do; [`WritebackStore`] copies its
    /// array back to the origin here. Consuming `self` makes stale access
    /// a compile error rather than a runtime one.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

// ============================================================================
// Byte-width reinterpretation
// ============================================================================

/// Wider-unit access into byte storage.
///
/// Reinterpreting accessors bypass the index strategy and address the
/// store directly at *byte* offsets, bounds-checked against
/// `len() - width + 1`. The default implementations assemble values from
/// single-byte traffic in machine byte order; contiguous realizations
/// override them with direct unaligned reads.
pub trait ByteStorage: Storage<u8> {
    /// Reads a `P` spanning `P::BYTES` bytes at byte offset `byte`.
    fn load_wide<P: Primitive>(&self, byte: i64) -> P
    where
        Self: Sized,
    {
        check_index(byte, self.len() - P::BYTES as i64 + 1);
        let mut bytes = [0u8; 8];
        for (k, slot) in bytes[..P::BYTES].iter_mut().enumerate() {
            *slot = self.load(byte + k as i64);
        }
        P::from_ne(&bytes)
    }

    /// Writes a `P` spanning `P::BYTES` bytes at byte offset `byte`.
    fn store_wide<P: Primitive>(&mut self, byte: i64, value: P)
    where
        Self: Sized,
    {
        check_index(byte, self.len() - P::BYTES as i64 + 1);
        let mut bytes = [0u8; 8];
        value.write_ne(&mut bytes);
        for (k, b) in bytes[..P::BYTES].iter().enumerate() {
            self.store(byte + k as i64, *b);
        }
    }
}

// ============================================================================
// SliceStore
// ============================================================================

/// Storage over a borrowed contiguous slice.
#[derive(Debug)]
pub struct SliceStore<'a, P: Primitive> {
    data: &'a mut [P],
}

impl<'a, P: Primitive> SliceStore<'a, P> {
    /// Wraps a borrowed slice.
    pub fn new(data: &'a mut [P]) -> Self {
        Self { data }
    }

    /// The underlying slice.
    #[inline]
    pub fn data(&self) -> &[P] {
        self.data
    }
}

impl<P: Primitive> Storage<P> for SliceStore<'_, P> {
    #[inline]
    fn len(&self) -> i64 {
        self.data.len() as i64
    }

    #[inline]
    fn load(&self, i: i64) -> P {
        self.data[check_index(i, self.data.len() as i64) as usize]
    }

    #[inline]
    fn store(&mut self, i: i64, value: P) {
        self.data[check_index(i, self.data.len() as i64) as usize] = value;
    }
}

impl ByteStorage for SliceStore<'_, u8> {
    fn load_wide<P: Primitive>(&self, byte: i64) -> P {
        check_index(byte, self.len() - P::BYTES as i64 + 1);
        match ndaccess_raw::instance() {
            Some(raw) => P::load_in(raw, self.data, byte),
            None => {
                let mut bytes = [0u8; 8];
                bytes[..P::BYTES]
                    .copy_from_slice(&self.data[byte as usize..byte as usize + P::BYTES]);
                P::from_ne(&bytes)
            }
        }
    }

    fn store_wide<P: Primitive>(&mut self, byte: i64, value: P) {
        check_index(byte, self.len() - P::BYTES as i64 + 1);
        match ndaccess_raw::instance() {
            Some(raw) => value.store_in(raw, self.data, byte),
            None => {
                let mut bytes = [0u8; 8];
                value.write_ne(&mut bytes);
                self.data[byte as usize..byte as usize + P::BYTES]
                    .copy_from_slice(&bytes[..P::BYTES]);
            }
        }
    }
}

// ============================================================================
// WindowStore
// ============================================================================

/// Storage over the accessible window of a memory handle.
///
/// Every access goes through the handle's element-typed `get`/`put`, so
/// this realization works without any raw access capability.
#[derive(Debug)]
pub struct WindowStore<P: Primitive, H: MemoryHandle<P>> {
    handle: H,
    len: i64,
    _unit: PhantomData<P>,
}

impl<P: Primitive, H: MemoryHandle<P>> WindowStore<P, H> {
    /// Wraps the accessible window of `handle`.
    pub fn new(handle: H) -> Self {
        let len = handle.limit() - handle.position();
        Self {
            handle,
            len,
            _unit: PhantomData,
        }
    }

    /// The wrapped handle.
    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

impl<P: Primitive, H: MemoryHandle<P>> Storage<P> for WindowStore<P, H> {
    #[inline]
    fn len(&self) -> i64 {
        self.len
    }

    #[inline]
    fn load(&self, i: i64) -> P {
        self.handle.get(check_index(i, self.len))
    }

    #[inline]
    fn store(&mut self, i: i64, value: P) {
        let i = check_index(i, self.len);
        self.handle.put(i, value);
    }
}

impl<H: MemoryHandle<u8>> ByteStorage for WindowStore<u8, H> {}

// ============================================================================
// RawStore
// ============================================================================

/// Storage at a raw address through the process-wide raw singleton.
///
/// The base address is `handle.address() + handle.position() * BYTES` and
/// the accessible extent is `handle.limit() - handle.position()`. The
/// handle is retained so the address stays valid for the store's
/// lifetime.
pub struct RawStore<P: Primitive, H: MemoryHandle<P>> {
    raw: &'static dyn Raw,
    base: u64,
    len: i64,
    _origin: H,
    _unit: PhantomData<P>,
}

impl<P: Primitive, H: MemoryHandle<P>> std::fmt::Debug for RawStore<P, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawStore")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish()
    }
}

impl<P: Primitive, H: MemoryHandle<P>> RawStore<P, H> {
    /// Binds direct access to the handle's window.
    ///
    /// The handle must report a nonzero address; the factory falls back
    /// to [`WindowStore`] instead of constructing this.
    pub fn new(handle: H, raw: &'static dyn Raw) -> Self {
        debug_assert!(handle.address() != 0);
        let base = handle.address() + handle.position() as u64 * P::BYTES as u64;
        let len = handle.limit() - handle.position();
        Self {
            raw,
            base,
            len,
            _origin: handle,
            _unit: PhantomData,
        }
    }
}

impl<P: Primitive, H: MemoryHandle<P>> Storage<P> for RawStore<P, H> {
    #[inline]
    fn len(&self) -> i64 {
        self.len
    }

    #[inline]
    fn load(&self, i: i64) -> P {
        let i = check_index(i, self.len);
        // SAFETY: 0 <= i < len, and the handle contract keeps
        // base..base + len * BYTES valid for our lifetime.
        unsafe { P::load(self.raw, self.base + i as u64 * P::BYTES as u64) }
    }

    #[inline]
    fn store(&mut self, i: i64, value: P) {
        let i = check_index(i, self.len);
        // SAFETY: as in `load`.
        unsafe { value.store(self.raw, self.base + i as u64 * P::BYTES as u64) }
    }
}

impl<H: MemoryHandle<u8>> ByteStorage for RawStore<u8, H> {
    fn load_wide<P: Primitive>(&self, byte: i64) -> P {
        let byte = check_index(byte, self.len - P::BYTES as i64 + 1);
        // SAFETY: byte + P::BYTES <= len, inside the handle's span.
        unsafe { P::load(self.raw, self.base + byte as u64) }
    }

    fn store_wide<P: Primitive>(&mut self, byte: i64, value: P) {
        let byte = check_index(byte, self.len - P::BYTES as i64 + 1);
        // SAFETY: as in `load_wide`.
        unsafe { value.store(self.raw, self.base + byte as u64) }
    }
}

// ============================================================================
// WritebackStore
// ============================================================================

/// An owned copy of a handle's window, written back on release.
///
/// Until [`Storage::release`] runs, mutations live only in the copy and
/// the origin is untouched; release writes every element back at the
/// origin's position. Dropping the store without releasing it performs
/// the same writeback, so forgetting the call cannot silently lose
/// writes.
#[derive(Debug)]
pub struct WritebackStore<P: Primitive, H: MemoryHandle<P>> {
    array: Vec<P>,
    origin: Option<H>,
}

impl<P: Primitive, H: MemoryHandle<P>> WritebackStore<P, H> {
    /// Eagerly copies the handle's accessible window.
    pub fn new(handle: H) -> Self {
        let count = (handle.limit() - handle.position()).max(0);
        let mut array = Vec::with_capacity(count as usize);
        for i in 0..count {
            array.push(handle.get(i));
        }
        Self {
            array,
            origin: Some(handle),
        }
    }

    fn flush(&mut self) {
        if let Some(origin) = self.origin.as_mut() {
            for (i, value) in self.array.iter().enumerate() {
                origin.put(i as i64, *value);
            }
        }
        self.origin = None;
    }
}

impl<P: Primitive, H: MemoryHandle<P>> Storage<P> for WritebackStore<P, H> {
    #[inline]
    fn len(&self) -> i64 {
        self.array.len() as i64
    }

    #[inline]
    fn load(&self, i: i64) -> P {
        self.array[check_index(i, self.array.len() as i64) as usize]
    }

    #[inline]
    fn store(&mut self, i: i64, value: P) {
        let i = check_index(i, self.array.len() as i64);
        self.array[i as usize] = value;
    }

    fn release(mut self) {
        self.flush();
    }
}

impl<P: Primitive, H: MemoryHandle<P>> Drop for WritebackStore<P, H> {
    fn drop(&mut self) {
        self.flush();
    }
}

impl<H: MemoryHandle<u8>> ByteStorage for WritebackStore<u8, H> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::SliceHandle;

    #[test]
    fn test_slice_store_round_trip() {
        let mut data = vec![0i32; 6];
        let mut store = SliceStore::new(&mut data);
        store.store(4, -9);
        assert_eq!(store.load(4), -9);
        assert_eq!(store.len(), 6);
    }

    #[test]
    #[should_panic(expected = "index out of range: 6")]
    fn test_slice_store_overrun() {
        let mut data = vec![0i32; 6];
        let store = SliceStore::new(&mut data);
        store.load(6);
    }

    #[test]
    #[should_panic(expected = "index out of range: -1")]
    fn test_slice_store_negative() {
        let mut data = vec![0i32; 6];
        let store = SliceStore::new(&mut data);
        store.load(-1);
    }

    #[test]
    fn test_window_store_uses_handle_window() {
        let mut data = vec![10u16, 20, 30, 40, 50];
        let handle = SliceHandle::new(&mut data, 1, 4).unwrap();
        let mut store = WindowStore::new(handle);
        assert_eq!(store.len(), 3);
        assert_eq!(store.load(0), 20);
        store.store(2, 99);
        assert_eq!(store.load(2), 99);
    }

    #[test]
    #[should_panic(expected = "index out of range: 3")]
    fn test_window_store_overrun() {
        let mut data = vec![0u16; 5];
        let handle = SliceHandle::new(&mut data, 1, 4).unwrap();
        let store = WindowStore::new(handle);
        store.load(3);
    }

    #[cfg(feature = "raw")]
    #[test]
    fn test_raw_store_round_trip() {
        let mut data = vec![0f64; 8];
        let handle = SliceHandle::new(&mut data, 2, 8).unwrap();
        let raw = ndaccess_raw::instance().unwrap();
        let mut store = RawStore::new(handle, raw);
        assert_eq!(store.len(), 6);
        store.store(0, 1.25);
        store.store(5, -4.5);
        assert_eq!(store.load(0), 1.25);
        assert_eq!(store.load(5), -4.5);
        drop(store);
        assert_eq!(data[2], 1.25);
        assert_eq!(data[7], -4.5);
    }

    #[cfg(feature = "raw")]
    #[test]
    #[should_panic(expected = "index out of range: 6")]
    fn test_raw_store_overrun() {
        let mut data = vec![0f64; 8];
        let handle = SliceHandle::new(&mut data, 2, 8).unwrap();
        let raw = ndaccess_raw::instance().unwrap();
        let store = RawStore::new(handle, raw);
        store.load(6);
    }

    #[test]
    fn test_writeback_invisible_until_release() {
        let mut data = vec![1i32, 2, 3, 4];
        {
            let handle = SliceHandle::full(&mut data);
            let mut store = WritebackStore::new(handle);
            store.store(1, 20);
            store.store(3, 40);
            assert_eq!(store.load(1), 20);
            store.release();
        }
        assert_eq!(data, vec![1, 20, 3, 40]);
    }

    #[test]
    fn test_writeback_respects_position() {
        let mut data = vec![1i32, 2, 3, 4, 5];
        {
            let handle = SliceHandle::new(&mut data, 2, 5).unwrap();
            let mut store = WritebackStore::new(handle);
            assert_eq!(store.len(), 3);
            assert_eq!(store.load(0), 3);
            store.store(0, -3);
            store.release();
        }
        assert_eq!(data, vec![1, 2, -3, 4, 5]);
    }

    #[test]
    fn test_writeback_on_drop() {
        let mut data = vec![1u8, 2, 3];
        {
            let handle = SliceHandle::full(&mut data);
            let mut store = WritebackStore::new(handle);
            store.store(0, 11);
        }
        assert_eq!(data[0], 11);
    }

    #[test]
    fn test_zero_length_store() {
        let mut data: Vec<i16> = vec![];
        let handle = SliceHandle::full(&mut data);
        let store = WritebackStore::new(handle);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        store.release();
    }

    #[test]
    #[should_panic(expected = "index out of range: 0")]
    fn test_zero_length_store_access_panics() {
        let mut data: Vec<i16> = vec![];
        let store = SliceStore::new(&mut data);
        store.load(0);
    }

    #[test]
    fn test_wide_access_slice() {
        let mut data = vec![0u8; 12];
        let mut store = SliceStore::new(&mut data);
        store.store_wide(2, 0x1122_3344i32);
        assert_eq!(store.load_wide::<i32>(2), 0x1122_3344);
        store.store_wide(4, -1.5f64);
        assert_eq!(store.load_wide::<f64>(4), -1.5);
    }

    #[test]
    fn test_wide_access_window_matches_slice() {
        let mut a = vec![0u8; 8];
        let mut b = vec![0u8; 8];
        let mut slice_store = SliceStore::new(&mut a);
        let mut window_store = WindowStore::new(SliceHandle::full(&mut b));
        slice_store.store_wide(1, 0x0102_0304_0506_0708i64);
        window_store.store_wide(1, 0x0102_0304_0506_0708i64);
        assert_eq!(
            slice_store.load_wide::<i64>(1),
            window_store.load_wide::<i64>(1)
        );
        assert_eq!(slice_store.data()[1..], b[1..]);
    }

    #[test]
    #[should_panic(expected = "index out of range: 5")]
    fn test_wide_access_tail_overrun() {
        // 8 bytes leave offsets 0..=4 for an i32.
        let mut data = vec![0u8; 8];
        let store = SliceStore::new(&mut data);
        store.load_wide::<i32>(5);
    }
}
