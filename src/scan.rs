//! Scan orchestration.
//!
//! Fans out one probing task per port under the admission gate, collects
//! results as they complete in whatever order the network settles them,
//! and reduces everything into a [`ScanSummary`] with open ports in
//! ascending order.

use crate::gate::AdmissionGate;
use crate::probe::{ProbeResult, Prober};
use crate::resolver::ScanTarget;
use crate::services;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How many port tasks the stream keeps pending at once. The gate bounds
/// the real concurrency; this only caps scheduler bookkeeping.
const MAX_PENDING: usize = 1000;

/// Default number of simultaneous probes.
pub const DEFAULT_CONCURRENCY: usize = 200;

/// Default per-port deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Read-only configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum simultaneous probes; values below 1 are clamped by the gate.
    pub concurrency: usize,
    /// Per-port deadline covering connect plus banner read.
    pub timeout: Duration,
    /// Whether open ports get a banner read.
    pub grab_banners: bool,
    /// Cancellation signal observed by queued and in-flight probes. The
    /// default token never fires.
    pub cancel: CancellationToken,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            grab_banners: false,
            cancel: CancellationToken::new(),
        }
    }
}

/// Final result of a scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Original target input.
    pub target: String,
    /// Address all probes connected to.
    pub addr: IpAddr,
    /// Reverse name of the address, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_name: Option<String>,
    /// Number of ports probed.
    pub ports_scanned: usize,
    /// Number of open ports found.
    pub open_count: usize,
    /// Wall-clock duration of the scan.
    pub duration_ms: u64,
    /// Open ports in ascending order, annotated with service names.
    pub open: Vec<ProbeResult>,
}

/// Probe every port in `ports` against the target and summarize.
///
/// Each port gets exactly one probe. Per-port transport trouble never
/// aborts the run; a port that refused, reset, or timed out is simply not
/// open. Results stream through `events` (every settled probe, in
/// completion order) when a sender is supplied; the summary's open list is
/// always sorted by port regardless of completion order.
pub async fn run_scan<P: Prober + 'static>(
    prober: Arc<P>,
    target: &ScanTarget,
    ports: &[u16],
    options: &ScanOptions,
    events: Option<UnboundedSender<ProbeResult>>,
) -> ScanSummary {
    let started = Instant::now();
    let gate = AdmissionGate::new(options.concurrency);
    let addr = target.addr;

    debug!(
        target = %target,
        ports = ports.len(),
        concurrency = gate.capacity(),
        "starting scan"
    );

    let results: Vec<ProbeResult> = stream::iter(ports.to_vec())
        .map(|port| {
            let gate = gate.clone();
            let prober = Arc::clone(&prober);
            let cancel = options.cancel.clone();
            let events = events.clone();

            async move {
                let mut result = probe_port(&gate, prober.as_ref(), addr, port, &cancel).await;
                if result.open {
                    result.service = services::lookup(port).map(str::to_owned);
                }
                if let Some(tx) = &events {
                    // A dropped receiver just means nobody is watching live.
                    let _ = tx.send(result.clone());
                }
                result
            }
        })
        .buffer_unordered(MAX_PENDING)
        .collect()
        .await;

    let ports_scanned = results.len();
    let mut open: Vec<ProbeResult> = results.into_iter().filter(|r| r.open).collect();
    open.sort_unstable_by_key(|r| r.port);

    let duration = started.elapsed();
    debug!(open = open.len(), ?duration, "scan finished");

    ScanSummary {
        target: target.host.clone(),
        addr,
        reverse_name: target.reverse_name.clone(),
        ports_scanned,
        open_count: open.len(),
        duration_ms: duration.as_millis() as u64,
        open,
    }
}

/// One unit of work: hold a gate slot for exactly the duration of the
/// probe. The slot is released when `_slot` drops, on every path out.
async fn probe_port<P: Prober + ?Sized>(
    gate: &AdmissionGate,
    prober: &P,
    addr: IpAddr,
    port: u16,
    cancel: &CancellationToken,
) -> ProbeResult {
    let _slot = tokio::select! {
        biased;
        _ = cancel.cancelled() => return ProbeResult::closed(port),
        slot = gate.admit() => slot,
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => ProbeResult::closed(port),
        result = prober.probe(addr, port) => result,
    }
}
