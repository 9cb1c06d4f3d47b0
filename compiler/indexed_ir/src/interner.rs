//! Sharded string interner for template and member names.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// Shard exceeded capacity (over 268 million strings per shard).
    #[error("interner shard {shard_idx} exceeded capacity: {count} strings, max is {max}", max = Name::MAX_LOCAL)]
    ShardOverflow { shard_idx: usize, count: usize },
}

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded string interner for concurrent access.
///
/// # Thread Safety
/// Uses `RwLock` per shard; a `&StringInterner` can be shared across threads.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner holding only the empty string.
    pub fn new() -> Self {
        // The empty string must live in shard 0 so it maps to `Name::EMPTY`.
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash = hasher.finish() as usize;
        hash % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        // Strings live as long as the process; leaking gives them 'static lifetime.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Find the `Name` of an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Name::new(shard_idx_u32, local))
    }

    /// Look up the string for a `Name`.
    ///
    /// Returns `None` for a `Name` this interner never produced.
    pub fn resolve(&self, name: Name) -> Option<&'static str> {
        let guard = self.shards.get(name.shard())?.read();
        guard.strings.get(name.local()).copied()
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner only holds the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned string names.
///
/// Lets rendering code accept any name source without depending on
/// `StringInterner` directly.
pub trait StringLookup {
    /// Look up the string for an interned name, `"<?>"` if unknown.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        self.resolve(name).unwrap_or("<?>")
    }
}
