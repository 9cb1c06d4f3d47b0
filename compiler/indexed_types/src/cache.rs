//! Sharded specialization cache.
//!
//! Maps `(template, param)` keys to their canonical slot. The check-then-insert
//! sequence runs under the shard's write lock, so two threads requesting the
//! same key can never construct two different slots.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use crate::{FamilyError, Param, Spec, TemplateId};

/// Number of shards for the specialization cache.
pub(crate) const NUM_SHARDS: usize = 16;

/// Cache key: the template a specialization came from and its parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SpecKey {
    pub root: TemplateId,
    pub param: Param,
}

/// Where a key landed and whether this call created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Slot {
    pub shard: u32,
    pub local: u32,
    pub inserted: bool,
}

struct CacheShard {
    /// Map from key to local index for deduplication.
    map: FxHashMap<SpecKey, u32>,
    /// Keys by local index.
    keys: Vec<SpecKey>,
}

impl CacheShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            keys: Vec::new(),
        }
    }
}

pub(crate) struct SpecCache {
    shards: [RwLock<CacheShard>; NUM_SHARDS],
    len: AtomicUsize,
    /// Entries each shard may hold.
    shard_capacity: usize,
}

impl SpecCache {
    pub fn new() -> Self {
        Self::with_shard_capacity(Spec::MAX_LOCAL as usize + 1)
    }

    pub fn with_shard_capacity(shard_capacity: usize) -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(CacheShard::new())),
            len: AtomicUsize::new(0),
            shard_capacity,
        }
    }

    #[inline]
    fn shard_for(key: &SpecKey) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash = hasher.finish() as usize;
        hash % NUM_SHARDS
    }

    /// Return the slot for `key`, inserting it if this is the first request.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn get_or_insert(&self, key: SpecKey) -> Result<Slot, FamilyError> {
        let shard_idx = Self::shard_for(&key);
        let shard = &self.shards[shard_idx];

        // Fast path: already cached
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&key) {
                return Ok(Slot {
                    shard: shard_idx as u32,
                    local,
                    inserted: false,
                });
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(&key) {
            return Ok(Slot {
                shard: shard_idx as u32,
                local,
                inserted: false,
            });
        }

        let local = Some(guard.keys.len())
            .filter(|&count| count < self.shard_capacity)
            .and_then(|count| u32::try_from(count).ok())
            .filter(|&local| local <= Spec::MAX_LOCAL)
            .ok_or(FamilyError::CacheOverflow { shard: shard_idx })?;

        guard.keys.push(key.clone());
        guard.map.insert(key, local);
        self.len.fetch_add(1, Ordering::Relaxed);

        Ok(Slot {
            shard: shard_idx as u32,
            local,
            inserted: true,
        })
    }

    /// The key stored at a slot, if the slot exists.
    pub fn key_at(&self, shard: usize, local: usize) -> Option<SpecKey> {
        let guard = self.shards.get(shard)?.read();
        guard.keys.get(local).cloned()
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }
}
