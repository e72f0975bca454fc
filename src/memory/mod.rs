//! Configurable multi-level set-associative D-cache: address space,
//! ordered cache levels, and configuration loading.
//!
//! Grounded in `ConfigurableMemoryModel::getDelay`/`applyConfig`/
//! `registerCache` (`ConfigurableMemoryModel.cpp`).

pub mod cache;
pub mod eviction;
pub mod histogram;
pub mod validity;

use tracing::{info, warn};

use crate::config::ConfigMap;
use crate::error::PerfEstError;

pub use cache::{CacheDelays, CacheLevel, TagMemory};
pub use eviction::{EvictionStrategy, Lfsr};
pub use validity::{NotInvalid, ValidityStrategy};

/// Maximum number of cache levels a single memory model may register.
/// The original plugin has no such limit; this crate adds one so a
/// misconfigured `memory.layout` (e.g. accidental duplication) fails
/// fast with `OutOfCapacity` rather than silently allocating unbounded
/// tag memory.
pub const MAX_LEVELS: usize = 16;

/// The half-open cacheable address range `[lower, upper)`.
#[derive(Debug, Clone, Copy)]
pub struct AddressSpace {
    lower: u64,
    upper: u64,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self {
            lower: 0,
            upper: u64::MAX,
        }
    }
}

impl AddressSpace {
    /// Returns `true` if `addr` falls within `[lower, upper)`.
    #[must_use]
    pub const fn is_cachable(&self, addr: u64) -> bool {
        addr >= self.lower && addr < self.upper
    }
}

/// An ordered list of cache levels plus the address space and
/// non-cacheable-access delay that gate them.
pub struct MemoryModel {
    levels: Vec<CacheLevel>,
    address_space: AddressSpace,
    not_cachable_delay: i32,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            address_space: AddressSpace::default(),
            not_cachable_delay: 0,
        }
    }
}

impl MemoryModel {
    /// Registers a cache level, failing if [`MAX_LEVELS`] is already
    /// reached.
    pub fn register_level(&mut self, level: CacheLevel) -> Result<(), PerfEstError> {
        if self.levels.len() >= MAX_LEVELS {
            return Err(PerfEstError::OutOfCapacity {
                name: level.name().to_string(),
                capacity: MAX_LEVELS,
            });
        }
        info!(name = level.name(), "registered cache level");
        self.levels.push(level);
        Ok(())
    }

    #[must_use]
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Resolves the delay for a fetch of `addr`: the non-cacheable delay
    /// if `addr` falls outside the address space, otherwise the
    /// accumulated delay of walking levels in order until a hit (or the
    /// last level's miss delay if none hit).
    pub fn get_delay(&mut self, addr: u64) -> i32 {
        if !self.address_space.is_cachable(addr) {
            return self.not_cachable_delay;
        }
        let mut delay = 0;
        for level in &mut self.levels {
            if level.fetch(addr, &mut delay) {
                break;
            }
        }
        delay
    }

    /// Loads `memory.layout` and per-level geometry/delay keys from
    /// `config`, then the address space and non-cacheable delay.
    /// Validates `lower <= upper`.
    pub fn apply_config(&mut self, config: &ConfigMap) -> Result<(), PerfEstError> {
        let layout = config.get_str("memory.layout").unwrap_or_default();
        for name in layout.split_whitespace() {
            self.register_from_config(config, name)?;
        }
        if self.levels.is_empty() {
            warn!("memory.layout registered zero cache levels");
        }

        let lower: u64 = config.get("memory.addrspace.lower").unwrap_or(0);
        let upper: u64 = config.get("memory.addrspace.upper").unwrap_or(u64::MAX);
        if lower > upper {
            return Err(PerfEstError::InvalidConfiguration {
                reason: format!("address space lower bound 0x{lower:x} exceeds upper bound 0x{upper:x}"),
            });
        }
        self.address_space = AddressSpace { lower, upper };
        self.not_cachable_delay = config.get("memory.delay.notCachable").unwrap_or(0);
        Ok(())
    }

    fn register_from_config(&mut self, config: &ConfigMap, name: &str) -> Result<(), PerfEstError> {
        let block_size: usize = config
            .get(&format!("memory.{name}.blockSize"))
            .unwrap_or(1);
        let nblocks: usize = config.require(&format!("memory.{name}.nblocks"))?;
        let nways: usize = config.require(&format!("memory.{name}.nways"))?;
        let hit: i32 = config.require(&format!("memory.{name}.delay.cacheHit"))?;
        let miss: i32 = config.require(&format!("memory.{name}.delay.cacheMiss"))?;

        let tag_memory = TagMemory::new(nways, nblocks, block_size);
        let level = CacheLevel::new(
            name,
            tag_memory,
            CacheDelays { hit, miss },
            Box::new(Lfsr::default()),
            Box::new(NotInvalid),
        );
        self.register_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_model(layout: &str) -> MemoryModel {
        let mut config = ConfigMap::new().with("memory.layout", layout);
        for name in layout.split_whitespace() {
            config.set(format!("memory.{name}.nblocks"), "4");
            config.set(format!("memory.{name}.nways"), "2");
            config.set(format!("memory.{name}.delay.cacheHit"), "1");
            config.set(format!("memory.{name}.delay.cacheMiss"), "10");
        }
        let mut model = MemoryModel::default();
        model.apply_config(&config).unwrap();
        model
    }

    #[test]
    fn address_outside_range_returns_not_cachable_delay_unchanged() {
        let config = ConfigMap::new()
            .with("memory.layout", "")
            .with("memory.addrspace.lower", "4096")
            .with("memory.addrspace.upper", "8192")
            .with("memory.delay.notCachable", "50");
        let mut model = MemoryModel::default();
        model.apply_config(&config).unwrap();
        assert_eq!(model.get_delay(0), 50);
    }

    #[test]
    fn invalid_address_space_fails_apply_config() {
        let config = ConfigMap::new()
            .with("memory.layout", "")
            .with("memory.addrspace.lower", "8192")
            .with("memory.addrspace.upper", "4096");
        let mut model = MemoryModel::default();
        assert!(matches!(
            model.apply_config(&config),
            Err(PerfEstError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn single_level_miss_then_hit() {
        let mut model = configured_model("l1");
        assert_eq!(model.get_delay(0x100), 10);
        assert_eq!(model.get_delay(0x100), 1);
    }

    #[test]
    fn two_levels_accumulate_delay_on_double_miss() {
        let mut model = configured_model("l1 l2");
        // first access misses both levels (l1 miss=10, l2 miss=10)
        assert_eq!(model.get_delay(0x9999), 20);
    }
}
