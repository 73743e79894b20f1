//! Tests for metrics emitted by routing and lifecycle.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use reqwest::Url;

use skjold::telemetry;
use skjold::{
    AssetStrategy, CacheStorage, EnvironmentMode, LifecycleManager, MemoryCacheStorage, Network,
    NoopHost, Request, RequestRouter, Response, Result, SkjoldError,
};

const ORIGIN: &str = "https://app.example.com/";

// ============================================================================
// Mock networks
// ============================================================================

struct OkNetwork;

#[async_trait]
impl Network for OkNetwork {
    async fn fetch(&self, _request: &Request) -> Result<Response> {
        Ok(Response::new(200, "ok"))
    }
}

struct DownNetwork;

#[async_trait]
impl Network for DownNetwork {
    async fn fetch(&self, _request: &Request) -> Result<Response> {
        Err(SkjoldError::Network("offline".into()))
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values matching a name and carrying label `label=value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

fn router(network: Arc<dyn Network>, storage: MemoryCacheStorage) -> RequestRouter {
    RequestRouter::new(
        Arc::new(storage),
        network,
        "v1",
        &url("/"),
        AssetStrategy::StaleWhileRevalidate,
    )
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn network_response_records_fetch_and_write() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let router = router(Arc::new(OkNetwork), MemoryCacheStorage::new());
                router.route(&Request::get(url("/app.js"))).await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::FETCH_TOTAL, "source", "network"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_WRITES_TOTAL), 1);
    assert!(
        has_histogram(&snapshot, telemetry::FETCH_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn offline_navigation_records_offline_response() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let router = router(Arc::new(DownNetwork), MemoryCacheStorage::new());
                router.route(&Request::navigate(url("/"))).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::OFFLINE_RESPONSES_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::NETWORK_FAILURES_TOTAL, "kind", "navigation"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, "strategy", "network_first"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_fallback_records_hit() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let storage = MemoryCacheStorage::new();
                let online = router(Arc::new(OkNetwork), storage.clone());
                online.route(&Request::get(url("/app.js"))).await.unwrap();
                let offline = router(Arc::new(DownNetwork), storage);
                offline.route(&Request::get(url("/app.js"))).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::CACHE_HITS_TOTAL,
            "strategy",
            "stale_while_revalidate"
        ),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::FETCH_TOTAL, "source", "cache"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn activation_records_deleted_generations() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let storage = MemoryCacheStorage::new();
                for name in ["v0", "v1", "v2"] {
                    storage.open(name).await.unwrap();
                }
                let lifecycle = LifecycleManager::new(
                    EnvironmentMode::Production,
                    "v2",
                    Vec::new(),
                    true,
                    Arc::new(storage),
                    Arc::new(OkNetwork),
                    Arc::new(NoopHost),
                );
                lifecycle.activate().await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::GENERATIONS_DELETED_TOTAL), 2);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let router = router(Arc::new(OkNetwork), MemoryCacheStorage::new());
    router.route(&Request::get(url("/app.js"))).await.unwrap();
}
