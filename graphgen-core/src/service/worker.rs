//! Worker loop: waits on the pause signal or the input queue, generates, and
//! publishes results.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, select};
use tracing::{debug, error, info_span, warn};

use super::gate::PauseGate;
use crate::{
    dispatch::generate,
    request::{GraphRequest, GraphResult},
};

/// Channels and shared state owned by one worker thread.
pub(super) struct Worker {
    pub(super) index: usize,
    pub(super) requests: Receiver<GraphRequest>,
    pub(super) results: Sender<GraphResult>,
    pub(super) pause: Receiver<()>,
    pub(super) gate: Arc<PauseGate>,
}

impl Worker {
    /// Runs until the input queue is closed and drained.
    pub(super) fn run(self) {
        let _span = info_span!("worker", index = self.index).entered();
        debug!("worker started");
        loop {
            if self.pause.try_recv().is_ok() {
                self.gate.park();
                continue;
            }
            select! {
                recv(self.pause) -> token => {
                    if token.is_err() {
                        break;
                    }
                    self.gate.park();
                }
                recv(self.requests) -> request => match request {
                    Ok(request) => self.process(&request),
                    Err(_) => break,
                },
            }
        }
        debug!("worker exiting");
    }

    /// Generates one request. Failures and panics are logged and the request
    /// is dropped without a result.
    pub(super) fn process(&self, request: &GraphRequest) {
        let id = request.id;
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| generate(request)));
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(result)) => {
                record_completed(elapsed);
                debug!(id, elapsed_ms = elapsed.as_millis(), "request completed");
                if self.results.send(result).is_err() {
                    warn!(id, "result queue closed, discarding result");
                }
            }
            Ok(Err(err)) => {
                record_dropped();
                warn!(
                    id,
                    kind = %request.kind,
                    code = %err.code(),
                    class = ?err.class(),
                    error = %err,
                    "generation failed, dropping request"
                );
            }
            Err(_) => {
                record_dropped();
                error!(id, kind = %request.kind, "generation panicked, dropping request");
            }
        }
    }
}

#[cfg(feature = "metrics")]
fn record_completed(elapsed: Duration) {
    metrics::counter!("graphgen_requests_completed").increment(1);
    metrics::histogram!("graphgen_generation_seconds").record(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
const fn record_completed(_elapsed: Duration) {}

#[cfg(feature = "metrics")]
fn record_dropped() {
    metrics::counter!("graphgen_requests_dropped").increment(1);
}

#[cfg(not(feature = "metrics"))]
const fn record_dropped() {}
