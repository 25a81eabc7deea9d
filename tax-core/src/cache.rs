//! Short-lived memoization of whole-return results.
//!
//! Front ends recompute after every edit, often with an unchanged record.
//! The cache is keyed on the entire [`TaxReturn`], so any change to any
//! field is a miss; there is no partial-result reuse.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{TaxCalculation, TaxReturn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: TaxCalculation,
    inserted_at: Instant,
}

/// Caller-owned cache for [`crate::TaxEngine::calculate_cached`].
///
/// Entries expire after a TTL. When full, expired entries are dropped
/// first, then the oldest. A cache must serve a single engine, since the
/// key does not include the rate tables.
#[derive(Debug, Clone)]
pub struct CalculationCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<TaxReturn, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl Default for CalculationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationCache {
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn with_ttl(
        mut self,
        ttl: Duration,
    ) -> Self {
        self.ttl = ttl;
        self
    }

    /// Capacity is at least one entry.
    pub fn with_capacity(
        mut self,
        capacity: usize,
    ) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    /// Drops every entry and resets the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Returns the cached result for `key` if fresh, otherwise computes,
    /// stores and returns it. Errors are returned as-is and not cached.
    pub fn get_or_compute<F, E>(
        &mut self,
        key: &TaxReturn,
        compute: F,
    ) -> Result<TaxCalculation, E>
    where
        F: FnOnce(&TaxReturn) -> Result<TaxCalculation, E>,
    {
        if let Some(entry) = self.entries.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                self.hits += 1;
                debug!(hits = self.hits, "calculation cache hit");
                return Ok(entry.result.clone());
            }
            self.entries.remove(key);
        }

        self.misses += 1;
        debug!(misses = self.misses, "calculation cache miss");
        let result = compute(key)?;
        self.insert(key.clone(), result.clone());
        Ok(result)
    }

    fn insert(
        &mut self,
        key: TaxReturn,
        result: TaxCalculation,
    ) {
        if self.entries.len() >= self.capacity {
            self.evict();
        }
        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    fn evict(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
