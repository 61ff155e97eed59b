//! Per-element accessor aliases.
//!
//! One alias per element encoding, all over slice-backed storage, for
//! call sites that name accessors by their element rather than spelling
//! the generic out. The unsigned widths are reinterpreted views of the
//! same stored units as their signed counterparts; byte-width accessors
//! (`ByteIndexer`, `UByteIndexer`, `BooleanIndexer`) all run over 1-byte
//! units and carry the reinterpreting accessors.

use ndaccess_index::StrideIndex;

use crate::element::{Bfloat16, Half};
use crate::indexer::Indexer;
use crate::storage::SliceStore;

pub type ByteIndexer<'a, I = StrideIndex> = Indexer<i8, SliceStore<'a, u8>, I>;
pub type UByteIndexer<'a, I = StrideIndex> = Indexer<u8, SliceStore<'a, u8>, I>;
pub type ShortIndexer<'a, I = StrideIndex> = Indexer<i16, SliceStore<'a, i16>, I>;
pub type UShortIndexer<'a, I = StrideIndex> = Indexer<u16, SliceStore<'a, u16>, I>;
pub type IntIndexer<'a, I = StrideIndex> = Indexer<i32, SliceStore<'a, i32>, I>;
pub type UIntIndexer<'a, I = StrideIndex> = Indexer<u32, SliceStore<'a, u32>, I>;
pub type LongIndexer<'a, I = StrideIndex> = Indexer<i64, SliceStore<'a, i64>, I>;
pub type ULongIndexer<'a, I = StrideIndex> = Indexer<u64, SliceStore<'a, u64>, I>;
pub type FloatIndexer<'a, I = StrideIndex> = Indexer<f32, SliceStore<'a, f32>, I>;
pub type DoubleIndexer<'a, I = StrideIndex> = Indexer<f64, SliceStore<'a, f64>, I>;
pub type BooleanIndexer<'a, I = StrideIndex> = Indexer<bool, SliceStore<'a, u8>, I>;
pub type HalfIndexer<'a, I = StrideIndex> = Indexer<Half, SliceStore<'a, u16>, I>;
pub type Bfloat16Indexer<'a, I = StrideIndex> = Indexer<Bfloat16, SliceStore<'a, u16>, I>;
