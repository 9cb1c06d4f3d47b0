//! Specialization handles.
//!
//! `Spec` is THE canonical type representation: every declared template and
//! every explicit specialization is referenced by one. Types compare by
//! handle equality (O(1)); two handles are equal exactly when they denote the
//! same `(template, param)` pair of the same family.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies the `TypeFamily` that produced a handle.
///
/// Handles from one family are rejected by every other family, which is how
/// queries detect type confusion instead of answering for the wrong registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct FamilyTag(u32);

static NEXT_FAMILY_TAG: AtomicU32 = AtomicU32::new(1);

impl FamilyTag {
    /// Allocate a tag no other family in this process carries.
    pub(crate) fn fresh() -> Self {
        Self(NEXT_FAMILY_TAG.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A canonical specialization handle.
///
/// Layout of `slot`: shard (4 bits) + local index (28 bits), mirroring how
/// the specialization cache is sharded.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Spec {
    family: FamilyTag,
    slot: u32,
}

impl Spec {
    /// Maximum local index per cache shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    #[inline]
    pub(crate) const fn from_shard_local(family: FamilyTag, shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Self {
            family,
            slot: (shard << 28) | local,
        }
    }

    /// The family this handle belongs to.
    #[inline]
    pub const fn family(self) -> FamilyTag {
        self.family
    }

    #[inline]
    pub(crate) const fn shard(self) -> usize {
        (self.slot >> 28) as usize
    }

    #[inline]
    pub(crate) const fn local(self) -> usize {
        (self.slot & Self::MAX_LOCAL) as usize
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spec(family={}, shard={}, local={})",
            self.family.0,
            self.shard(),
            self.local()
        )
    }
}
