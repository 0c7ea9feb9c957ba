//! Explicit configuration for [`super::GenerationService`].

use std::num::NonZeroUsize;

use crate::{
    error::ServiceError,
    request::{DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_NODES, RequestLimits},
};

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Validated settings for a generation service.
///
/// Both queues share `queue_capacity`. Unless overridden it is
/// `workers * max_batch_size * 2`, enough for every worker to have two full
/// batches in flight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServiceConfig {
    workers: NonZeroUsize,
    queue_capacity: NonZeroUsize,
    max_nodes: NonZeroUsize,
    max_batch_size: NonZeroUsize,
}

impl ServiceConfig {
    /// Returns the number of worker threads.
    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Returns the bound shared by the input and output queues.
    #[must_use]
    pub const fn queue_capacity(&self) -> NonZeroUsize {
        self.queue_capacity
    }

    /// Returns the admission limits derived from this configuration.
    #[must_use]
    pub const fn limits(&self) -> RequestLimits {
        RequestLimits {
            max_nodes: self.max_nodes.get(),
            max_batch_size: self.max_batch_size.get(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        const fn non_zero(value: usize) -> NonZeroUsize {
            match NonZeroUsize::new(value) {
                Some(value) => value,
                None => NonZeroUsize::MIN,
            }
        }
        Self {
            workers: non_zero(DEFAULT_WORKERS),
            queue_capacity: non_zero(DEFAULT_WORKERS * DEFAULT_MAX_BATCH_SIZE * 2),
            max_nodes: non_zero(DEFAULT_MAX_NODES),
            max_batch_size: non_zero(DEFAULT_MAX_BATCH_SIZE),
        }
    }
}

/// Configures and validates a [`ServiceConfig`].
///
/// # Examples
/// ```
/// use graphgen_core::ServiceBuilder;
///
/// let config = ServiceBuilder::new()
///     .with_workers(2)
///     .with_max_batch_size(10)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.workers().get(), 2);
/// assert_eq!(config.queue_capacity().get(), 40);
/// assert_eq!(config.limits().max_nodes, 100);
/// ```
#[derive(Clone, Debug)]
pub struct ServiceBuilder {
    workers: usize,
    queue_capacity: Option<usize>,
    max_nodes: usize,
    max_batch_size: usize,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: None,
            max_nodes: DEFAULT_MAX_NODES,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl ServiceBuilder {
    /// Creates a builder populated with the default profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of worker threads.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Overrides the derived queue capacity.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Overrides the largest accepted node count.
    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Overrides the largest accepted batch.
    #[must_use]
    pub const fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Returns the configured worker count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Validates the settings.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidConfig`] when any setting is zero or the
    /// derived queue capacity overflows.
    pub fn build(self) -> Result<ServiceConfig, ServiceError> {
        let workers = positive("workers", self.workers)?;
        let max_nodes = positive("max_nodes", self.max_nodes)?;
        let max_batch_size = positive("max_batch_size", self.max_batch_size)?;
        let capacity = match self.queue_capacity {
            Some(capacity) => capacity,
            None => workers
                .get()
                .checked_mul(max_batch_size.get())
                .and_then(|slots| slots.checked_mul(2))
                .ok_or_else(|| ServiceError::InvalidConfig {
                    reason: "derived queue capacity overflows usize".to_owned(),
                })?,
        };
        let queue_capacity = positive("queue_capacity", capacity)?;

        Ok(ServiceConfig {
            workers,
            queue_capacity,
            max_nodes,
            max_batch_size,
        })
    }
}

fn positive(setting: &str, value: usize) -> Result<NonZeroUsize, ServiceError> {
    NonZeroUsize::new(value).ok_or_else(|| ServiceError::InvalidConfig {
        reason: format!("{setting} must be greater than zero"),
    })
}
