//! Worked end-to-end scenarios for the performance-estimation core,
//! driven through the public [`Backend`]/[`PerformanceModel`] surface
//! exactly as a host simulator would.

use perfest_core::channel::{self, Window};
use perfest_core::config::ConfigMap;
use perfest_core::{Backend, PerformanceModel};

const ADDI: i32 = 10;
const ADD: i32 = 0;
const LW: i32 = 38;

fn window() -> Window {
    Window::new(channel::MIN_WINDOW)
}

// ══════════════════════════════════════════════════════════
// 1. Empty trace
// ══════════════════════════════════════════════════════════

#[test]
fn empty_trace_retires_nothing_at_cycle_zero() {
    let mut model = PerformanceModel::new();
    let window = window();
    model.execute_block(&window, 0).unwrap();
    assert_eq!(model.retired(), 0);
    assert_eq!(model.cycle_count(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Single addi
// ══════════════════════════════════════════════════════════

#[test]
fn single_addi_retires_at_cycle_seven() {
    // addi x1, x0, 1: default config is zero-latency everywhere except
    // the mandatory per-stage +1s, so the seven stages (PcGen..Com) each
    // contribute exactly one cycle.
    let mut model = PerformanceModel::new();
    let mut w = window();
    w.write(ADDI, 0x1000, 0, 0, 1, 0, 0);
    model.execute_block(&w, 1).unwrap();
    assert_eq!(model.retired(), 1);
    assert_eq!(model.cycle_count(), 7);
}

// ══════════════════════════════════════════════════════════
// 3. Two independent addis: pipelined issue
// ══════════════════════════════════════════════════════════

#[test]
fn second_independent_addi_pipelines_behind_the_first() {
    // addi x1, x0, 1; addi x2, x0, 1 — neither reads the other's result.
    // The second still retires strictly after the first (in-order, single
    // commit port per cycle) but well short of a second full seven-stage
    // traversal from a cold pipeline.
    let mut model = PerformanceModel::new();
    let mut w = window();
    w.write(ADDI, 0x1000, 0, 0, 1, 0, 0);
    w.advance();
    w.write(ADDI, 0x1004, 0, 0, 2, 0, 0);
    model.execute_block(&w, 2).unwrap();
    assert_eq!(model.retired(), 2);
    assert_eq!(model.cycle_count(), 9);
}

// ══════════════════════════════════════════════════════════
// 4. Memory latency stalls a dependent consumer
// ══════════════════════════════════════════════════════════

fn load_then_dependent_add(not_cachable_delay: i32) -> u64 {
    // Restrict the cacheable range to nothing so every access takes the
    // configured non-cacheable delay, regardless of address.
    let config = ConfigMap::new()
        .with("memory.layout", "")
        .with("memory.addrspace.lower", "0")
        .with("memory.addrspace.upper", "0")
        .with("memory.delay.notCachable", not_cachable_delay.to_string());
    let mut backend = Backend::new();
    let mut w = window();
    backend.connect_channel(&w).unwrap();
    backend.apply_config(&config).unwrap();
    backend.initialize().unwrap();

    w.write(LW, 0x1000, 2, 0, 1, 0, 0x2000); // lw x1, 0(x2)
    backend.execute(&w, 0).unwrap();
    w.advance();
    w.write(ADD, 0x1004, 1, 1, 3, 0, 0); // add x3, x1, x1
    backend.execute(&w, 1).unwrap();

    backend.finalize().cycle_count
}

#[test]
fn higher_memory_latency_delays_retirement_by_exactly_its_extra_cost() {
    let baseline = load_then_dependent_add(0);
    let stalled = load_then_dependent_add(20);
    assert_eq!(stalled, baseline + 20);
}

// ══════════════════════════════════════════════════════════
// 5. Capacity forces an eviction under a tight set-associative cache
// ══════════════════════════════════════════════════════════

#[test]
fn two_way_one_set_cache_evicts_the_third_distinct_tag() {
    // nways=2, nblocks=1: three addresses with distinct tags all map to
    // the single set, so the third access must evict one of the first two.
    let config = ConfigMap::new()
        .with("memory.layout", "l1")
        .with("memory.l1.nblocks", "1")
        .with("memory.l1.nways", "2")
        .with("memory.l1.delay.cacheHit", "1")
        .with("memory.l1.delay.cacheMiss", "10");
    let mut backend = Backend::new();
    let mut w = window();
    backend.connect_channel(&w).unwrap();
    backend.apply_config(&config).unwrap();
    backend.initialize().unwrap();

    for (i, addr) in [0u64, 0x1_0000, 0, 0x2_0000].into_iter().enumerate() {
        if i > 0 {
            w.advance();
        }
        w.write(LW, 0x1000 + (i as u64) * 4, 2, 0, 1, 0, addr);
        backend.execute(&w, i).unwrap();
    }

    let report = backend.finalize();
    assert_eq!(report.histograms.len(), 1);
    assert_eq!(report.histograms[0].name, "l1");
    let csv = &report.histograms[0].csv;
    let row = csv.lines().nth(1).unwrap();
    let mut fields = row.split(',');
    let _index = fields.next();
    let _ways_used = fields.next();
    let hits: u64 = fields.next().unwrap().parse().unwrap();
    let evictions: u64 = fields.next().unwrap().parse().unwrap();
    assert_eq!(hits, 1); // the repeated access to address 0
    assert_eq!(evictions, 1); // the fourth access evicts one of the first two
}

// ══════════════════════════════════════════════════════════
// 6. Addresses outside the cacheable range bypass the cache entirely
// ══════════════════════════════════════════════════════════

#[test]
fn address_outside_cacheable_range_never_allocates_a_line() {
    let config = ConfigMap::new()
        .with("memory.layout", "l1")
        .with("memory.l1.nblocks", "4")
        .with("memory.l1.nways", "2")
        .with("memory.l1.delay.cacheHit", "1")
        .with("memory.l1.delay.cacheMiss", "10")
        .with("memory.addrspace.lower", "4096")
        .with("memory.addrspace.upper", "8192")
        .with("memory.delay.notCachable", "50");
    let mut backend = Backend::new();
    let mut w = window();
    backend.connect_channel(&w).unwrap();
    backend.apply_config(&config).unwrap();
    backend.initialize().unwrap();

    // Address 0 falls outside [0x1000, 0x2000): every repeat access pays
    // the flat non-cacheable delay, never hitting.
    w.write(LW, 0x1000, 2, 0, 1, 0, 0);
    backend.execute(&w, 0).unwrap();
    w.advance();
    w.write(LW, 0x1004, 2, 0, 1, 0, 0);
    backend.execute(&w, 1).unwrap();

    let report = backend.finalize();
    let csv = &report.histograms[0].csv;
    // No set should report any hit or eviction: nothing was ever cached.
    for line in csv.lines().skip(1) {
        let mut fields = line.split(',');
        let _index = fields.next();
        let _ways_used = fields.next();
        let hits: u64 = fields.next().unwrap().parse().unwrap();
        let evictions: u64 = fields.next().unwrap().parse().unwrap();
        assert_eq!(hits, 0);
        assert_eq!(evictions, 0);
    }
}
