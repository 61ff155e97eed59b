//! The owning-memory handle interface.
//!
//! The access layer does not manage memory. It consumes a handle supplied
//! by whatever owns the resource (an allocator, an FFI binding, a mapped
//! file) and only asks three questions of it: where the memory is, which
//! window of it is accessible, and how to read or write an element through
//! the owner's own bounds discipline.

use ndaccess_raw::{ByteOrder, Primitive};

use crate::storage::check_index;
use crate::{AccessError, Result};

/// A handle to externally owned memory.
///
/// `position()..limit()` is the accessible element window; `get`/`put`
/// take indices *relative to `position()`* and are expected to convert
/// between the resource's byte layout and the unit type. `address()` is
/// the absolute address of element 0 of the resource, or 0 when the
/// resource has no stable address (in which case only window access is
/// possible).
///
/// # Safety
///
/// When `address()` is nonzero, implementations guarantee that
/// `address()..address() + limit() * BYTES` stays valid, readable and
/// writable memory for the handle's lifetime. Raw-backed accessors
/// dereference inside that span without further cooperation from the
/// handle.
pub unsafe trait MemoryHandle<P: Primitive> {
    /// Absolute address of element 0, or 0 when none is available.
    fn address(&self) -> u64;

    /// First accessible element.
    fn position(&self) -> i64;

    /// One past the last accessible element.
    fn limit(&self) -> i64;

    /// Reads the element `i` positions past `position()`.
    fn get(&self, i: i64) -> P;

    /// Writes the element `i` positions past `position()`.
    fn put(&mut self, i: i64, value: P);
}

/// A memory handle over a borrowed slice.
///
/// This is the in-process stand-in for an externally owned resource: the
/// slice plays the contiguous block, and position/limit carve the
/// accessible window out of it.
#[derive(Debug)]
pub struct SliceHandle<'a, P: Primitive> {
    ptr: *mut P,
    data: &'a mut [P],
    position: i64,
    limit: i64,
}

impl<'a, P: Primitive> SliceHandle<'a, P> {
    /// Creates a handle with an explicit accessible window.
    pub fn new(data: &'a mut [P], position: i64, limit: i64) -> Result<Self> {
        let len = data.len() as i64;
        if position < 0 || position > limit || limit > len {
            return Err(AccessError::InvalidWindow {
                position,
                limit,
                len,
            });
        }
        let ptr = data.as_mut_ptr();
        Ok(Self {
            ptr,
            data,
            position,
            limit,
        })
    }

    /// Creates a handle whose window spans the whole slice.
    pub fn full(data: &'a mut [P]) -> Self {
        let limit = data.len() as i64;
        let ptr = data.as_mut_ptr();
        Self {
            ptr,
            data,
            position: 0,
            limit,
        }
    }
}

// SAFETY: the pointer is captured from the borrowed slice, which stays
// alive (and exclusively borrowed) for 'a, so the address contract holds
// for the handle's lifetime.
unsafe impl<P: Primitive> MemoryHandle<P> for SliceHandle<'_, P> {
    #[inline]
    fn address(&self) -> u64 {
        self.ptr as u64
    }

    #[inline]
    fn position(&self) -> i64 {
        self.position
    }

    #[inline]
    fn limit(&self) -> i64 {
        self.limit
    }

    #[inline]
    fn get(&self, i: i64) -> P {
        check_index(i, self.limit - self.position);
        self.data[(self.position + i) as usize]
    }

    #[inline]
    fn put(&mut self, i: i64, value: P) {
        check_index(i, self.limit - self.position);
        self.data[(self.position + i) as usize] = value;
    }
}

/// A memory handle over raw bytes in a declared byte order.
///
/// This is the window realization for resources whose layout is not the
/// machine's: every element-typed access converts through the byte order
/// given at construction. When the order is native the handle exposes its
/// address and qualifies for raw-backed access; in a foreign order it
/// reports no address, so the factory keeps all traffic on the converting
/// window path.
#[derive(Debug)]
pub struct OrderedBytesHandle<'a, P: Primitive> {
    ptr: *mut u8,
    bytes: &'a mut [u8],
    order: ByteOrder,
    position: i64,
    limit: i64,
    _unit: std::marker::PhantomData<P>,
}

impl<'a, P: Primitive> OrderedBytesHandle<'a, P> {
    /// Creates a handle whose window spans every whole element in `bytes`.
    pub fn new(bytes: &'a mut [u8], order: ByteOrder) -> Self {
        let limit = (bytes.len() / P::BYTES) as i64;
        let ptr = bytes.as_mut_ptr();
        Self {
            ptr,
            bytes,
            order,
            position: 0,
            limit,
            _unit: std::marker::PhantomData,
        }
    }

    /// Creates a handle with an explicit accessible element window.
    pub fn with_window(
        bytes: &'a mut [u8],
        order: ByteOrder,
        position: i64,
        limit: i64,
    ) -> Result<Self> {
        let len = (bytes.len() / P::BYTES) as i64;
        if position < 0 || position > limit || limit > len {
            return Err(AccessError::InvalidWindow {
                position,
                limit,
                len,
            });
        }
        let ptr = bytes.as_mut_ptr();
        Ok(Self {
            ptr,
            bytes,
            order,
            position,
            limit,
            _unit: std::marker::PhantomData,
        })
    }

    /// The declared byte order of the resource.
    #[inline]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    fn byte_offset(&self, i: i64) -> i64 {
        (self.position + i) * P::BYTES as i64
    }
}

// SAFETY: a nonzero address is only reported for the native byte order,
// and is captured from the exclusively borrowed byte slice, which covers
// limit() whole elements for 'a.
unsafe impl<P: Primitive> MemoryHandle<P> for OrderedBytesHandle<'_, P> {
    #[inline]
    fn address(&self) -> u64 {
        // A foreign-order resource must not be read natively; withholding
        // the address keeps the factory on the converting window path.
        if self.order.is_native() {
            self.ptr as u64
        } else {
            0
        }
    }

    #[inline]
    fn position(&self) -> i64 {
        self.position
    }

    #[inline]
    fn limit(&self) -> i64 {
        self.limit
    }

    fn get(&self, i: i64) -> P {
        check_index(i, self.limit - self.position);
        let offset = self.byte_offset(i);
        match ndaccess_raw::for_order(self.order) {
            Some(raw) => P::load_in(raw, self.bytes, offset),
            None => {
                let value = P::from_ne(&self.bytes[offset as usize..]);
                if self.order.is_native() {
                    value
                } else {
                    value.swap_bytes()
                }
            }
        }
    }

    fn put(&mut self, i: i64, value: P) {
        check_index(i, self.limit - self.position);
        let offset = self.byte_offset(i);
        match ndaccess_raw::for_order(self.order) {
            Some(raw) => value.store_in(raw, self.bytes, offset),
            None => {
                let value = if self.order.is_native() {
                    value
                } else {
                    value.swap_bytes()
                };
                value.write_ne(&mut self.bytes[offset as usize..]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window() {
        let mut data = vec![1i32, 2, 3, 4];
        let handle = SliceHandle::full(&mut data);
        assert_eq!(handle.position(), 0);
        assert_eq!(handle.limit(), 4);
        assert_eq!(handle.get(2), 3);
        assert_ne!(handle.address(), 0);
    }

    #[test]
    fn test_windowed_access_is_position_relative() {
        let mut data = vec![10i64, 20, 30, 40, 50];
        let mut handle = SliceHandle::new(&mut data, 1, 4).unwrap();
        assert_eq!(handle.get(0), 20);
        assert_eq!(handle.get(2), 40);
        handle.put(1, -1);
        assert_eq!(data[2], -1);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut data = vec![0u8; 4];
        assert!(SliceHandle::new(&mut data, 3, 2).is_err());
        let mut data = vec![0u8; 4];
        assert!(SliceHandle::new(&mut data, 0, 5).is_err());
        let mut data = vec![0u8; 4];
        assert!(SliceHandle::new(&mut data, -1, 2).is_err());
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_window_overrun_panics() {
        let mut data = vec![0f32; 4];
        let handle = SliceHandle::new(&mut data, 1, 3).unwrap();
        handle.get(2);
    }

    #[test]
    fn test_ordered_bytes_big_endian() {
        let mut bytes = vec![0x3f, 0x80, 0x00, 0x00, 0xc0, 0x00, 0x00, 0x00];
        let handle = OrderedBytesHandle::<f32>::new(&mut bytes, ByteOrder::BigEndian);
        assert_eq!(handle.limit(), 2);
        assert_eq!(handle.get(0), 1.0);
        assert_eq!(handle.get(1), -2.0);
    }

    #[test]
    fn test_ordered_bytes_little_endian() {
        let mut bytes = vec![0x00, 0x00, 0x80, 0x3f];
        let handle = OrderedBytesHandle::<f32>::new(&mut bytes, ByteOrder::LittleEndian);
        assert_eq!(handle.get(0), 1.0);
    }

    #[test]
    fn test_ordered_bytes_put_round_trip() {
        let mut bytes = vec![0u8; 8];
        {
            let mut handle =
                OrderedBytesHandle::<i32>::new(&mut bytes, ByteOrder::BigEndian);
            handle.put(0, 0x0102_0304);
            assert_eq!(handle.get(0), 0x0102_0304);
        }
        // Stored big-endian regardless of the machine order.
        assert_eq!(&bytes[..4], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_ordered_bytes_address_gated_by_order() {
        let foreign = match ByteOrder::native() {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        };
        let mut bytes = vec![0u8; 8];
        let handle = OrderedBytesHandle::<i16>::new(&mut bytes, ByteOrder::native());
        assert_ne!(handle.address(), 0);
        let mut bytes = vec![0u8; 8];
        let handle = OrderedBytesHandle::<i16>::new(&mut bytes, foreign);
        assert_eq!(handle.address(), 0);
    }

    #[test]
    fn test_ordered_bytes_window() {
        let mut bytes = vec![0u8; 12];
        bytes[4..8].copy_from_slice(&0x0a0b_0c0du32.to_be_bytes());
        let handle =
            OrderedBytesHandle::<u32>::with_window(&mut bytes, ByteOrder::BigEndian, 1, 3)
                .unwrap();
        assert_eq!(handle.get(0), 0x0a0b_0c0d);
    }
}
