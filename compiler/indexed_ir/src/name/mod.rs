//! Interned identifiers for template, scope and member names.

use std::fmt;

/// A name interned in a `StringInterner`.
///
/// The `u32` packs the interner shard into its top 4 bits and the index
/// within that shard into the remaining 28. Two names from one interner are
/// equal exactly when their strings are.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, present in every interner.
    pub const EMPTY: Name = Name(0);

    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    pub const NUM_SHARDS: usize = 16;

    const SHARD_SHIFT: u32 = 28;

    #[inline]
    pub(crate) const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << Self::SHARD_SHIFT) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::SHARD_SHIFT) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}
