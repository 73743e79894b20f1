//! Telemetry metric name constants.
//!
//! Centralised metric names for skjold operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skjold_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `kind` — request class: "navigation" or "asset"
//! - `source` — where the response came from: "network", "cache" or "offline"
//! - `strategy` — asset strategy: "stale_while_revalidate" or "cache_first"

/// Total fetch events routed.
///
/// Labels: `kind`, `source`.
pub const FETCH_TOTAL: &str = "skjold_fetch_total";

/// Time spent routing a fetch event, in seconds.
///
/// Labels: `kind`.
pub const FETCH_DURATION_SECONDS: &str = "skjold_fetch_duration_seconds";

/// Total cache hits while routing.
///
/// Labels: `strategy`.
pub const CACHE_HITS_TOTAL: &str = "skjold_cache_hits_total";

/// Total cache misses while routing.
///
/// Labels: `strategy`.
pub const CACHE_MISSES_TOTAL: &str = "skjold_cache_misses_total";

/// Total response snapshots written to the active generation.
pub const CACHE_WRITES_TOTAL: &str = "skjold_cache_writes_total";

/// Total failed cache writes. These never fail the request.
pub const CACHE_WRITE_FAILURES_TOTAL: &str = "skjold_cache_write_failures_total";

/// Total network failures observed by the router.
///
/// Labels: `kind`.
pub const NETWORK_FAILURES_TOTAL: &str = "skjold_network_failures_total";

/// Total synthesized `503 Offline` navigation responses.
pub const OFFLINE_RESPONSES_TOTAL: &str = "skjold_offline_responses_total";

/// Total manifest entries stored during install.
pub const PRECACHED_ENTRIES_TOTAL: &str = "skjold_precached_entries_total";

/// Total cache generations deleted during activation.
pub const GENERATIONS_DELETED_TOTAL: &str = "skjold_generations_deleted_total";
