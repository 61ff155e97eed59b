//! Hyperslab selections over strided storage.

use crate::{default_strides, Index, IndexError, Result};

/// A rectangular, possibly strided and blocked sub-selection of an array.
///
/// A hyperslab is the access pattern used by scientific array formats to
/// address a subset of a dataset. Per dimension it is defined by four
/// parameters:
///
/// - `offset`: origin of the selection in the underlying coordinates
/// - `stride`: number of underlying elements between the starts of
///   consecutive blocks; a stride of 1 selects every element, 2 every
///   second element, and so on
/// - `count`: number of blocks selected
/// - `block`: number of contiguous elements in each block
///
/// The externally visible extent of dimension `d` is therefore
/// `count[d] * block[d]`, and that value replaces `sizes[d]` at
/// construction. The underlying strides are computed from the *original*
/// sizes, so a selection coordinate `c` reaches underlying coordinate
/// `offset[d] + stride[d] * (c / block[d]) + (c % block[d])` before the
/// usual strided formula applies.
///
/// A `block[d]` of zero is rejected at construction: there is no meaningful
/// division of a selection coordinate by an empty block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperslabIndex {
    sizes: Vec<i64>,
    strides: Vec<i64>,
    offsets: Vec<i64>,
    slab_strides: Vec<i64>,
    counts: Vec<i64>,
    blocks: Vec<i64>,
}

impl HyperslabIndex {
    /// Creates a hyperslab selection over storage of the given sizes.
    ///
    /// `sizes` describes the underlying array; the constructed index
    /// reports the selection extents `counts[d] * blocks[d]` instead.
    pub fn new(
        sizes: impl Into<Vec<i64>>,
        offsets: impl Into<Vec<i64>>,
        slab_strides: impl Into<Vec<i64>>,
        counts: impl Into<Vec<i64>>,
        blocks: impl Into<Vec<i64>>,
    ) -> Result<Self> {
        let mut sizes = sizes.into();
        let offsets = offsets.into();
        let slab_strides = slab_strides.into();
        let counts = counts.into();
        let blocks = blocks.into();

        let rank = sizes.len();
        for len in [offsets.len(), slab_strides.len(), counts.len(), blocks.len()] {
            if len != rank {
                return Err(IndexError::RankMismatch(rank, len));
            }
        }
        for (dim, &block) in blocks.iter().enumerate() {
            if block == 0 {
                return Err(IndexError::ZeroBlock { dim });
            }
        }

        // Underlying strides come from the original sizes; the visible
        // size of each dimension is the selection extent.
        let strides = default_strides(&sizes);
        for d in 0..rank {
            sizes[d] = counts[d] * blocks[d];
        }

        Ok(Self {
            sizes,
            strides,
            offsets,
            slab_strides,
            counts,
            blocks,
        })
    }

    /// Origin of the selection per dimension.
    #[inline]
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Distance between block starts per dimension.
    #[inline]
    pub fn slab_strides(&self) -> &[i64] {
        &self.slab_strides
    }

    /// Number of blocks per dimension.
    #[inline]
    pub fn counts(&self) -> &[i64] {
        &self.counts
    }

    /// Contiguous elements per block per dimension.
    #[inline]
    pub fn blocks(&self) -> &[i64] {
        &self.blocks
    }

    #[inline]
    fn map(&self, d: usize, c: i64) -> i64 {
        self.offsets[d] + self.slab_strides[d] * (c / self.blocks[d]) + (c % self.blocks[d])
    }
}

impl Index for HyperslabIndex {
    #[inline]
    fn rank(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    fn sizes(&self) -> &[i64] {
        &self.sizes
    }

    #[inline]
    fn index1(&self, i: i64) -> i64 {
        self.map(0, i) * self.strides[0]
    }

    #[inline]
    fn index2(&self, i: i64, j: i64) -> i64 {
        self.map(0, i) * self.strides[0] + self.map(1, j) * self.strides[1]
    }

    #[inline]
    fn index3(&self, i: i64, j: i64, k: i64) -> i64 {
        self.map(0, i) * self.strides[0]
            + self.map(1, j) * self.strides[1]
            + self.map(2, k) * self.strides[2]
    }

    fn index(&self, coords: &[i64]) -> i64 {
        let mut offset = 0;
        for (d, &c) in coords.iter().enumerate() {
            offset += self.map(d, c) * self.strides[d];
        }
        offset
    }
}
