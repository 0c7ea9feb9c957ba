//! Fixed-size worker pool that turns queued requests into graphs.
//!
//! Requests enter a bounded input queue and results leave through a bounded
//! output queue; both block when full, which is how backpressure reaches
//! producers and workers. Pausing hands one token to every worker through a
//! rendezvous channel and parks it on a shared gate until resumed.

mod config;
mod gate;
mod worker;

use std::{fmt, sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

pub use self::config::{DEFAULT_WORKERS, ServiceBuilder, ServiceConfig};
use self::{gate::PauseGate, worker::Worker};
use crate::{
    error::{ServiceError, ServiceOperation},
    request::{GraphRequest, GraphResult},
};

/// Lifecycle state of a [`GenerationService`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceState {
    /// Constructed; workers not yet launched.
    Created,
    /// Workers are consuming the input queue.
    Running,
    /// Every worker is parked until resumed.
    Paused,
    /// The input queue is closed and the workers have exited. Terminal.
    Stopped,
}

impl ServiceState {
    /// Returns the lowercase state name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Lifecycle {
    state: ServiceState,
    requests: Option<Sender<GraphRequest>>,
    results: Option<Sender<GraphResult>>,
    pause_tokens: Option<Receiver<()>>,
    workers: Vec<thread::JoinHandle<()>>,
}

/// Runs graph generation on a pool of worker threads.
///
/// Requests that fail validation are rejected synchronously by
/// [`Self::push`]. Requests that fail during generation, including by
/// panicking, are logged and dropped: no result is published and nothing is
/// retried. Callers that need to know about such failures must track pushed
/// ids and time out the ones that never come back.
///
/// Results are published on a bounded queue. A consumer has to drain
/// [`Self::results`] while the service runs, otherwise workers block once the
/// queue fills and [`Self::pause`] or [`Self::stop`] wait for them.
///
/// # Examples
/// ```
/// use graphgen_core::{
///     GenerationService, Graph, GraphKind, GraphRequest, ServiceBuilder,
/// };
///
/// let config = ServiceBuilder::new().with_workers(1).build()?;
/// let service = GenerationService::new(config);
/// service.start()?;
/// service.push(GraphRequest::new(2233, GraphKind::Complete, 3, 255))?;
/// let result = service.results().recv()?;
/// assert_eq!(result.id, 2233);
/// assert!((0..3).all(|node| result.graph.degree(node) == 2));
/// service.stop()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GenerationService {
    config: ServiceConfig,
    lifecycle: Mutex<Lifecycle>,
    queued: Receiver<GraphRequest>,
    results: Receiver<GraphResult>,
    pause: Sender<()>,
    gate: Arc<PauseGate>,
}

impl fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationService")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("queued", &self.queued.len())
            .finish_non_exhaustive()
    }
}

impl GenerationService {
    /// Creates a service in the [`ServiceState::Created`] state.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let capacity = config.queue_capacity().get();
        let (requests_tx, requests_rx) = bounded(capacity);
        let (results_tx, results_rx) = bounded(capacity);
        let (pause_tx, pause_rx) = bounded(0);
        Self {
            config,
            lifecycle: Mutex::new(Lifecycle {
                state: ServiceState::Created,
                requests: Some(requests_tx),
                results: Some(results_tx),
                pause_tokens: Some(pause_rx),
                workers: Vec::new(),
            }),
            queued: requests_rx,
            results: results_rx,
            pause: pause_tx,
            gate: Arc::new(PauseGate::default()),
        }
    }

    /// Returns the configuration the service was built with.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        self.lifecycle.lock().state
    }

    /// Launches the worker threads.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidState`] unless the service is
    /// [`ServiceState::Created`], and [`ServiceError::WorkerSpawn`] when a
    /// thread cannot be spawned. A spawn failure stops the workers already
    /// launched and leaves the service [`ServiceState::Stopped`].
    #[instrument(
        name = "service.start",
        err,
        skip(self),
        fields(workers = self.config.workers().get()),
    )]
    pub fn start(&self) -> Result<(), ServiceError> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != ServiceState::Created {
            return Err(invalid_state(ServiceOperation::Start, lifecycle.state));
        }
        let (Some(results), Some(pause_tokens)) =
            (lifecycle.results.take(), lifecycle.pause_tokens.take())
        else {
            return Err(invalid_state(ServiceOperation::Start, lifecycle.state));
        };

        for index in 0..self.config.workers().get() {
            let worker = Worker {
                index,
                requests: self.queued.clone(),
                results: results.clone(),
                pause: pause_tokens.clone(),
                gate: Arc::clone(&self.gate),
            };
            let spawned = thread::Builder::new()
                .name(format!("graphgen-worker-{index}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => lifecycle.workers.push(handle),
                Err(source) => {
                    lifecycle.state = ServiceState::Stopped;
                    lifecycle.requests = None;
                    let workers = std::mem::take(&mut lifecycle.workers);
                    drop(lifecycle);
                    join_all(workers)?;
                    return Err(ServiceError::WorkerSpawn {
                        worker: index,
                        source,
                    });
                }
            }
        }

        lifecycle.state = ServiceState::Running;
        info!("generation service started");
        Ok(())
    }

    /// Parks every worker and returns once all of them are parked.
    ///
    /// A worker finishes the request it is generating before parking, so no
    /// result is published between this call returning and [`Self::resume`].
    /// Requests may still be pushed while paused.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidState`] unless the service is
    /// [`ServiceState::Running`], and [`ServiceError::WorkerPanicked`] when a
    /// worker has exited and cannot take its token.
    #[instrument(name = "service.pause", err, skip(self))]
    pub fn pause(&self) -> Result<(), ServiceError> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != ServiceState::Running {
            return Err(invalid_state(ServiceOperation::Pause, lifecycle.state));
        }

        self.gate.close();
        for worker in 0..lifecycle.workers.len() {
            if self.pause.send(()).is_err() {
                self.gate.open();
                return Err(ServiceError::WorkerPanicked { worker });
            }
        }
        lifecycle.state = ServiceState::Paused;
        debug!("all workers parked");
        Ok(())
    }

    /// Releases every parked worker.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidState`] unless the service is
    /// [`ServiceState::Paused`].
    #[instrument(name = "service.resume", err, skip(self))]
    pub fn resume(&self) -> Result<(), ServiceError> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != ServiceState::Paused {
            return Err(invalid_state(ServiceOperation::Resume, lifecycle.state));
        }
        self.gate.open();
        lifecycle.state = ServiceState::Running;
        debug!("workers released");
        Ok(())
    }

    /// Validates `request` and enqueues it, blocking while the input queue is
    /// full.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidState`] before [`Self::start`] or after
    /// [`Self::stop`], and [`ServiceError::InvalidRequest`] when the request
    /// fails its admission checks.
    pub fn push(&self, request: GraphRequest) -> Result<(), ServiceError> {
        let sender = self.accepting_sender()?;
        self.admit(&request)?;
        self.send(&sender, request)
    }

    /// Enqueues a whole batch after checking its size, every request, and the
    /// free room in the input queue.
    ///
    /// The room check is advisory: concurrent producers can still fill the
    /// queue, in which case the remaining pushes block.
    ///
    /// # Errors
    /// Returns [`ServiceError::BatchTooLarge`] when the batch exceeds the
    /// configured maximum, [`ServiceError::InsufficientCapacity`] when
    /// [`Self::free_band`] is smaller than the batch, and the errors of
    /// [`Self::push`]. Nothing is enqueued when any check fails.
    #[instrument(
        name = "service.push_batch",
        err,
        skip(self, batch),
        fields(requested = batch.len()),
    )]
    pub fn push_batch(&self, batch: Vec<GraphRequest>) -> Result<(), ServiceError> {
        let sender = self.accepting_sender()?;
        let max_batch_size = self.config.limits().max_batch_size;
        if batch.len() > max_batch_size {
            return Err(ServiceError::BatchTooLarge {
                requested: batch.len(),
                max_batch_size,
            });
        }
        for request in &batch {
            self.admit(request)?;
        }
        let free = self.free_band();
        if free < batch.len() {
            return Err(ServiceError::InsufficientCapacity {
                requested: batch.len(),
                free,
            });
        }
        for request in batch {
            self.send(&sender, request)?;
        }
        Ok(())
    }

    /// Closes the input queue, waits for the workers to drain it, and joins
    /// them. A paused service is resumed first.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidState`] unless the service is running
    /// or paused, and [`ServiceError::WorkerPanicked`] when a worker thread
    /// terminated abnormally.
    #[instrument(name = "service.stop", err, skip(self))]
    pub fn stop(&self) -> Result<(), ServiceError> {
        let workers = {
            let mut lifecycle = self.lifecycle.lock();
            match lifecycle.state {
                ServiceState::Running => {}
                ServiceState::Paused => self.gate.open(),
                state => return Err(invalid_state(ServiceOperation::Stop, state)),
            }
            lifecycle.state = ServiceState::Stopped;
            lifecycle.requests = None;
            std::mem::take(&mut lifecycle.workers)
        };
        join_all(workers)?;
        info!("generation service stopped");
        Ok(())
    }

    /// Returns the number of requests the input queue can take before
    /// [`Self::push`] blocks.
    #[must_use]
    pub fn free_band(&self) -> usize {
        self.config
            .queue_capacity()
            .get()
            .saturating_sub(self.queued.len())
    }

    /// Returns the number of requests waiting in the input queue.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Returns a handle to the output queue.
    ///
    /// The receiver disconnects once the service has stopped and every
    /// published result has been received.
    #[must_use]
    pub fn results(&self) -> Receiver<GraphResult> {
        self.results.clone()
    }

    fn accepting_sender(&self) -> Result<Sender<GraphRequest>, ServiceError> {
        let lifecycle = self.lifecycle.lock();
        match (&lifecycle.state, &lifecycle.requests) {
            (ServiceState::Running | ServiceState::Paused, Some(sender)) => Ok(sender.clone()),
            (state, _) => Err(invalid_state(ServiceOperation::Push, *state)),
        }
    }

    fn admit(&self, request: &GraphRequest) -> Result<(), ServiceError> {
        request
            .validate(&self.config.limits())
            .map_err(|source| ServiceError::InvalidRequest {
                id: request.id,
                source,
            })
    }

    fn send(
        &self,
        sender: &Sender<GraphRequest>,
        request: GraphRequest,
    ) -> Result<(), ServiceError> {
        let id = request.id;
        sender
            .send(request)
            .map_err(|_| invalid_state(ServiceOperation::Push, self.state()))?;
        debug!(id, "request queued");
        Ok(())
    }
}

impl Drop for GenerationService {
    /// Closes the input queue and releases parked workers without joining
    /// them; they exit once the queue drains.
    fn drop(&mut self) {
        let lifecycle = self.lifecycle.get_mut();
        if matches!(lifecycle.state, ServiceState::Running | ServiceState::Paused) {
            warn!("generation service dropped without stop, detaching workers");
            lifecycle.state = ServiceState::Stopped;
            lifecycle.requests = None;
            self.gate.open();
        }
    }
}

fn invalid_state(operation: ServiceOperation, state: ServiceState) -> ServiceError {
    ServiceError::InvalidState { operation, state }
}

fn join_all(workers: Vec<thread::JoinHandle<()>>) -> Result<(), ServiceError> {
    let mut outcome = Ok(());
    for (worker, handle) in workers.into_iter().enumerate() {
        if handle.join().is_err() && outcome.is_ok() {
            outcome = Err(ServiceError::WorkerPanicked { worker });
        }
    }
    outcome
}

#[cfg(test)]
mod tests;
