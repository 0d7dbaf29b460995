use lazy_static::lazy_static;
use prometheus::{Gauge, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Price query metrics
    pub static ref PRICE_READS: IntCounter = IntCounter::new(
        "oracle_price_reads_total",
        "Total number of read-only price queries served by the proxy"
    ).expect("valid metric definition");

    pub static ref PRICE_WRITES: IntCounter = IntCounter::new(
        "oracle_price_writes_total",
        "Total number of write-path price queries served by the proxy"
    ).expect("valid metric definition");

    pub static ref LAST_PRICE: Gauge = Gauge::new(
        "oracle_last_price",
        "Last price returned by the proxy"
    ).expect("valid metric definition");

    pub static ref UPSTREAM_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "oracle_upstream_failures_total",
            "Upstream price reads that failed or returned zero"
        ),
        &["upstream"]
    ).expect("valid metric definition");

    // Implementation rotation metrics
    pub static ref ORACLE_SWAPS: IntCounter = IntCounter::new(
        "oracle_implementation_swaps_total",
        "Total number of accepted implementation swaps"
    ).expect("valid metric definition");

    pub static ref ORACLE_SWAPS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "oracle_implementation_swaps_rejected_total",
            "Rejected implementation swaps by reason"
        ),
        &["reason"]
    ).expect("valid metric definition");
}

pub fn register_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(PRICE_READS.clone()))?;
    REGISTRY.register(Box::new(PRICE_WRITES.clone()))?;
    REGISTRY.register(Box::new(LAST_PRICE.clone()))?;
    REGISTRY.register(Box::new(UPSTREAM_FAILURES.clone()))?;
    REGISTRY.register(Box::new(ORACLE_SWAPS.clone()))?;
    REGISTRY.register(Box::new(ORACLE_SWAPS_REJECTED.clone()))?;
    Ok(())
}
