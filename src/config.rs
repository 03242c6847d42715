// config.rs: Compile-time defaults and the runtime pool configuration.
//
// The constants are the documented defaults. `PoolConfig` carries the values
// actually used to build a dispatcher; the process-wide runtime builds one
// from the environment (see `PoolConfig::from_env`) unless the caller
// installs its own through `runtime::init`.

use tracing::warn;

use crate::error::{Error, Result};
use crate::growth::GrowthPolicy;

// Level used when the caller passes no options.
// Accepted raw levels are 0, 1 and 3; 3 maps to the strongest setting.
pub const DEFAULT_LEVEL: i32 = 3;

// Default number of worker threads (0 = one per logical core).
// Overridden by DEFLATE_DISPATCH_WORKERS.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Upper bound on worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Jobs that may wait in the queue on top of the ones being executed.
// Overridden by DEFLATE_DISPATCH_QUEUE.
pub const QUEUE_SIZE_DEFAULT: usize = 64;

// Initial decompression estimate is this multiple of the input length.
pub const DECOMPRESS_RATIO_DEFAULT: usize = 4;

// Capacity multiplier applied on every "insufficient output space" retry.
pub const GROWTH_FACTOR_DEFAULT: usize = 2;

// No output buffer starts smaller than this, whatever the input length.
pub const MIN_CAPACITY: usize = 64;

// Largest output buffer the invoker will allocate (4 GiB - 1).
pub const MAX_CAPACITY_DEFAULT: usize = u32::MAX as usize;

pub const ENV_WORKERS: &str = "DEFLATE_DISPATCH_WORKERS";
pub const ENV_QUEUE: &str = "DEFLATE_DISPATCH_QUEUE";

/// Settings for one [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker threads; 0 selects one per logical core.
    pub nb_workers: usize,
    /// Queue slots beyond the running jobs. Submissions past
    /// `nb_workers + queue_size` in-flight jobs fail with `QueueFull`.
    pub queue_size: usize,
    pub growth: GrowthPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            nb_workers: NB_WORKERS_DEFAULT,
            queue_size: QUEUE_SIZE_DEFAULT,
            growth: GrowthPolicy::default(),
        }
    }
}

impl PoolConfig {
    pub fn with_workers(mut self, nb_workers: usize) -> Self {
        self.nb_workers = nb_workers;
        self
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Defaults, overridden by `DEFLATE_DISPATCH_WORKERS` and
    /// `DEFLATE_DISPATCH_QUEUE` when they hold a valid unsigned integer.
    pub fn from_env() -> Self {
        let mut config = PoolConfig::default();
        if let Some(n) = env_usize(ENV_WORKERS) {
            config.nb_workers = n;
        }
        if let Some(n) = env_usize(ENV_QUEUE) {
            config.queue_size = n;
        }
        config
    }

    /// Worker count after resolving 0 to the number of logical cores.
    pub fn resolved_workers(&self) -> usize {
        match self.nb_workers {
            0 => num_cpus::get().clamp(1, NB_WORKERS_MAX),
            n => n,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nb_workers > NB_WORKERS_MAX {
            return Err(Error::InvalidConfig(format!(
                "nb_workers {} exceeds the maximum of {NB_WORKERS_MAX}",
                self.nb_workers
            )));
        }
        if self.queue_size == 0 {
            return Err(Error::InvalidConfig("queue_size must be at least 1".into()));
        }
        self.growth.validate()
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}
