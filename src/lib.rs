//! Uniform multidimensional element access over slices, buffer windows,
//! and raw memory.
//!
//! This crate is the addressing layer beneath a tensor or binary-codec
//! library: it maps coordinate tuples to linear offsets and applies them
//! to whatever actually holds the data, with one coherent surface across
//! element encodings, ranks, strides and hyperslab selections.
//!
//! # Core Types
//!
//! - [`Indexer`]: a typed accessor binding one element encoding, one
//!   backing store and one index strategy
//! - [`StrideIndex`] / [`HyperslabIndex`] / [`OneIndex`]: coordinate
//!   mapping strategies (re-exported from `ndaccess-index`)
//! - [`SliceStore`] / [`WindowStore`] / [`RawStore`] / [`WritebackStore`]:
//!   backing-store realizations
//! - [`create`]: factory selecting a realization for an externally owned
//!   [`MemoryHandle`], with copy-and-write-back as the non-direct
//!   fallback
//!
//! # Element encodings
//!
//! Signed and unsigned integers of four widths, both float widths,
//! `bool` as a 1-byte unit, and the packed 16-bit float encodings
//! [`Half`] and [`Bfloat16`] exposed as `f32` through exact bit-level
//! codecs ([`codec`]).
//!
//! # Example
//!
//! ```rust
//! use ndaccess::{Indexer, StrideIndex};
//!
//! let mut data = vec![0f32; 6];
//! let mut ix = Indexer::<f32, _, _>::over_slice(&mut data, StrideIndex::new([2, 3]));
//! ix.put((1, 2), 6.5);
//! assert_eq!(ix.get((1, 2)), 6.5);
//! ```
//!
//! # Hyperslab selections
//!
//! ```rust
//! use ndaccess::{HyperslabIndex, Indexer};
//!
//! // Blocks of 3 contiguous elements, repeated twice with a gap of 4,
//! // starting at offset 1: selects 1,2,3 then 5,6,7.
//! let mut data: Vec<i32> = (0..120).collect();
//! let index = HyperslabIndex::new([120], [1], [4], [2], [3]).unwrap();
//! let ix = Indexer::<i32, _, _>::over_slice(&mut data, index);
//! assert_eq!(ix.get(3), 5);
//! ```
//!
//! # Concurrency
//!
//! Single-threaded and synchronous throughout. Nothing here is safe for
//! concurrent mutation of one indexer or one memory region; callers
//! serialize externally or partition ranges.

pub mod codec;
mod element;
mod factory;
mod handle;
mod indexer;
mod storage;
pub mod types;

// ============================================================================
// Element encodings
// ============================================================================
pub use element::{Bfloat16, Element, Half};

// ============================================================================
// Handles and backing stores
// ============================================================================
pub use handle::{MemoryHandle, OrderedBytesHandle, SliceHandle};
pub use storage::{
    check_index, ByteStorage, RawStore, SliceStore, Storage, WindowStore, WritebackStore,
};

// ============================================================================
// Accessors and factory
// ============================================================================
pub use factory::{create, BackendKind, SourceIndexer};
pub use indexer::Indexer;

// ============================================================================
// Re-exports from the member crates
// ============================================================================
pub use ndaccess_index::{
    default_strides, Coordinates, HyperslabIndex, Index, IndexError, OneIndex, StrideIndex,
};
pub use ndaccess_raw::{ByteOrder, Native, Primitive, Raw, Swapped};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while constructing handles or accessors.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The accessible window does not fit the resource.
    #[error("invalid window: position {position}..limit {limit} over {len} elements")]
    InvalidWindow { position: i64, limit: i64, len: i64 },

    /// An index strategy could not be constructed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Result type for handle and accessor construction.
pub type Result<T> = std::result::Result<T, AccessError>;
