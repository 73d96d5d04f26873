//! Metrics collection.
//!
//! # Metrics
//! - `vyos_cache_lookups_total` (counter): cache reads by `result` (hit, miss)
//! - `vyos_remote_fetches_total` (counter): whole-tree fetches by `outcome`
//! - `vyos_cache_invalidations_total` (counter)
//! - `vyos_mutations_total` (counter): remote mutations by `kind`
//! - `vyos_batch_operations` (histogram): operations per submitted batch
//!
//! These go through the `metrics` facade and are no-ops until the embedding
//! application installs a recorder. The `vyos-config` binary does not
//! install one; a long-running host that wants them exported sets its own
//! (for example a Prometheus exporter) before building a `ConfigCache`.

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("vyos_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_remote_fetch(outcome: &'static str) {
    metrics::counter!("vyos_remote_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_invalidation() {
    metrics::counter!("vyos_cache_invalidations_total").increment(1);
}

pub fn record_mutation(kind: &'static str) {
    metrics::counter!("vyos_mutations_total", "kind" => kind).increment(1);
}

pub fn record_batch(ops: usize) {
    metrics::histogram!("vyos_batch_operations").record(ops as f64);
}
