//! Per-cache-level histogram export: one CSV row per set, summarizing
//! hits/evictions/ways-used across all ways of that set.
//!
//! Grounded in `Cache::~Cache`'s `OUTPUT_STATISTICS` histogram writer in
//! `ConfigurableMemoryModel.cpp`, minus the process-wide, destructor-timed
//! file path derivation: here the histogram is rendered to a `String`
//! (the crate performs no file I/O) and the memory model's owner decides
//! where, if anywhere, to persist it: the histogram is attached to the
//! owning model rather than emitted from a global with no teardown
//! ordering.

use super::cache::CacheLevel;

/// Renders `level`'s per-set histogram as CSV text with header
/// `index,ways-used,hits,evictions` (set index in hex, remaining fields
/// decimal), one row per set.
#[must_use]
pub fn render_csv(level: &CacheLevel) -> String {
    let tag_memory = level.tag_memory();
    let mut out = String::from("index,ways-used,hits,evictions\n");
    for index in 0..tag_memory.nblocks() {
        let start = index * tag_memory.nways();
        let mut hits = 0u64;
        let mut evictions = 0u64;
        let mut ways_used = 0u64;
        for way in 0..tag_memory.nways() {
            let entry = &tag_memory.entries()[start + way];
            if entry.hits > 0 {
                ways_used += 1;
            }
            hits += entry.hits;
            evictions += entry.evictions;
        }
        out.push_str(&format!("{index:x},{ways_used},{hits},{evictions}\n"));
    }
    out
}
