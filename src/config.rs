//! Configuration for the performance-estimation core.
//!
//! Configuration is an abstract string→value map under the
//! `plugin.perfEst.` namespace (e.g. `plugin.perfEst.memory.layout`).
//! [`ConfigMap`] is that map made concrete; [`apply_config`] is the single
//! parsing code path every caller goes through, whether they start from a
//! hand-built map or from a deserialized [`Config`] tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::PerfEstError;

/// A flat configuration map, keyed by dotted path under `plugin.perfEst.`
/// (the `plugin.perfEst.` prefix is stripped by convention; callers pass
/// keys like `memory.layout`, not the fully qualified form).
///
/// A `BTreeMap` is used rather than a `HashMap` for deterministic
/// iteration, which keeps `Debug` output and test fixtures stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    /// Creates an empty configuration map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a key/value pair, returning the map for chained construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a key/value pair in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.0.insert(key.into(), value.into());
    }

    /// Looks up a raw string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Looks up and parses a value, returning `None` if the key is absent
    /// or fails to parse as `T`.
    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(|v| v.parse::<T>().ok())
    }

    /// Looks up and parses a required value, failing with
    /// [`PerfEstError::InvalidConfiguration`] if it is absent or malformed.
    pub fn require<T: FromStr>(&self, key: &str) -> Result<T, PerfEstError> {
        self.0
            .get(key)
            .ok_or_else(|| PerfEstError::InvalidConfiguration {
                reason: format!("missing required key `{key}`"),
            })?
            .parse::<T>()
            .map_err(|_| PerfEstError::InvalidConfiguration {
                reason: format!("key `{key}` failed to parse"),
            })
    }

    /// Returns all keys with the given prefix, without the prefix.
    pub fn keys_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .keys()
            .filter_map(move |k| k.strip_prefix(prefix))
    }
}

impl fmt::Display for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.0 {
            writeln!(f, "{k} = {v}")?;
        }
        Ok(())
    }
}

/// Configuration for a single cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheLevelConfig {
    /// Number of sets.
    pub nblocks: usize,
    /// Associativity (ways per set).
    pub nways: usize,
    /// Block size in words (default 1 word = 4 bytes).
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Hit delay in cycles.
    pub cache_hit_delay: i32,
    /// Miss delay in cycles.
    pub cache_miss_delay: i32,
}

const fn default_block_size() -> usize {
    1
}

const fn default_addrspace_upper() -> u64 {
    u64::MAX
}

/// Address-space and memory-model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Ordered list of cache level names (`memory.layout`).
    pub layout: Vec<String>,
    /// Inclusive lower bound of the cacheable address space.
    #[serde(default)]
    pub addrspace_lower: u64,
    /// Exclusive upper bound of the cacheable address space.
    #[serde(default = "default_addrspace_upper")]
    pub addrspace_upper: u64,
    /// Delay charged for accesses outside `[lower, upper)`.
    #[serde(default)]
    pub not_cachable_delay: i32,
    /// Per-level configuration, keyed by the names in `layout`.
    #[serde(default)]
    pub levels: BTreeMap<String, CacheLevelConfig>,
}

/// Root configuration type; use [`ConfigMap`] directly, or deserialize a
/// [`Config`] from JSON and flatten it with [`Config::to_config_map`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Memory-hierarchy configuration.
    pub memory: MemoryConfig,
}

impl Config {
    /// Flattens a structured [`Config`] into the dotted-key [`ConfigMap`]
    /// that [`apply_config`] consumes. This is the only place a `Config`
    /// is turned into keys — there is exactly one parsing code path.
    #[must_use]
    pub fn to_config_map(&self) -> ConfigMap {
        let mut map = ConfigMap::new();
        map.set("memory.layout", self.memory.layout.join(" "));
        map.set("memory.addrspace.lower", self.memory.addrspace_lower.to_string());
        map.set("memory.addrspace.upper", self.memory.addrspace_upper.to_string());
        map.set(
            "memory.delay.notCachable",
            self.memory.not_cachable_delay.to_string(),
        );
        for (name, level) in &self.memory.levels {
            map.set(format!("memory.{name}.nblocks"), level.nblocks.to_string());
            map.set(format!("memory.{name}.nways"), level.nways.to_string());
            map.set(
                format!("memory.{name}.blockSize"),
                level.block_size.to_string(),
            );
            map.set(
                format!("memory.{name}.delay.cacheHit"),
                level.cache_hit_delay.to_string(),
            );
            map.set(
                format!("memory.{name}.delay.cacheMiss"),
                level.cache_miss_delay.to_string(),
            );
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_map_round_trips_typed_values() {
        let map = ConfigMap::new().with("memory.l1.nways", "4");
        assert_eq!(map.get::<usize>("memory.l1.nways"), Some(4));
        assert_eq!(map.get::<usize>("memory.l1.missing"), None);
    }

    #[test]
    fn require_fails_on_missing_key() {
        let map = ConfigMap::new();
        let err = map.require::<u64>("memory.addrspace.lower").unwrap_err();
        assert!(matches!(err, PerfEstError::InvalidConfiguration { .. }));
    }

    #[test]
    fn keys_under_strips_prefix() {
        let map = ConfigMap::new()
            .with("memory.l1.nways", "4")
            .with("memory.l2.nways", "8")
            .with("notmemory.x", "1");
        let mut under: Vec<_> = map.keys_under("memory.").collect();
        under.sort_unstable();
        assert_eq!(under, vec!["l1.nways", "l2.nways"]);
    }

    #[test]
    fn structured_config_flattens_to_expected_keys() {
        let mut levels = BTreeMap::new();
        let _ = levels.insert(
            "l1".to_string(),
            CacheLevelConfig {
                nblocks: 64,
                nways: 4,
                block_size: 1,
                cache_hit_delay: 1,
                cache_miss_delay: 10,
            },
        );
        let config = Config {
            memory: MemoryConfig {
                layout: vec!["l1".to_string()],
                addrspace_lower: 0,
                addrspace_upper: 0x1000_0000,
                not_cachable_delay: 100,
                levels,
            },
        };
        let map = config.to_config_map();
        assert_eq!(map.get_str("memory.layout"), Some("l1"));
        assert_eq!(map.get::<usize>("memory.l1.nways"), Some(4));
        assert_eq!(map.get::<i32>("memory.l1.delay.cacheMiss"), Some(10));
    }
}
