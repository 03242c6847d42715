//! Process-wide dispatcher used by the free functions in [`crate::api`].
//!
//! The dispatcher is created once, either explicitly through [`init`] or
//! lazily on first use. [`shutdown`] drains and releases its worker pool;
//! the runtime is never re-initialized afterwards, so async calls fail with
//! [`Error::PoolShutdown`] while sync calls keep working.

use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::config::PoolConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};

static RUNTIME: OnceLock<Dispatcher> = OnceLock::new();

/// Held while a dispatcher is being built, so at most one worker pool is
/// ever started for the process.
static INIT_GATE: Mutex<()> = Mutex::new(());

/// Installs the process-wide dispatcher built from `config`.
///
/// Fails with [`Error::AlreadyInitialized`] if a dispatcher is already in
/// place, including one created lazily by an earlier call.
pub fn init(config: PoolConfig) -> Result<()> {
    let _gate = INIT_GATE.lock().unwrap_or_else(PoisonError::into_inner);
    if RUNTIME.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }
    let dispatcher = Dispatcher::with_config(&config)?;
    RUNTIME.set(dispatcher).map_err(|_| Error::AlreadyInitialized)?;
    debug!(?config, "runtime initialized");
    Ok(())
}

/// The process-wide dispatcher, creating it on first use.
pub fn dispatcher() -> Result<&'static Dispatcher> {
    if let Some(dispatcher) = RUNTIME.get() {
        return Ok(dispatcher);
    }
    let _gate = INIT_GATE.lock().unwrap_or_else(PoisonError::into_inner);
    // Another thread may have finished initialization while we waited.
    if let Some(dispatcher) = RUNTIME.get() {
        return Ok(dispatcher);
    }
    let config = default_config();
    let dispatcher = Dispatcher::with_config(&config)?;
    debug!(?config, "runtime initialized lazily");
    Ok(RUNTIME.get_or_init(|| dispatcher))
}

/// `true` once a dispatcher has been installed.
pub fn is_initialized() -> bool {
    RUNTIME.get().is_some()
}

/// Drains in-flight async work and releases the worker threads. No-op if
/// the runtime was never initialized.
pub fn shutdown() {
    if let Some(dispatcher) = RUNTIME.get() {
        dispatcher.shutdown();
    }
}

#[cfg(feature = "env-config")]
fn default_config() -> PoolConfig {
    PoolConfig::from_env()
}

#[cfg(not(feature = "env-config"))]
fn default_config() -> PoolConfig {
    PoolConfig::default()
}
