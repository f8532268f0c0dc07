//! Process-wide engine readiness
//!
//! `EngineLoader` is an explicit state cell. The first caller of
//! `ensure_ready` runs the initializer; callers arriving while it runs wait
//! for that attempt and share its outcome. Only success is sticky: after a
//! failure the next caller starts a fresh attempt.

use crate::errors::{engine_init, Result};
use crate::sqlite::SqliteEngine;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use templog_core::errors::{ExError, TempLogError};
use templog_core::{log_op_end, log_op_error, log_op_start};
use tracing::{info, warn};

/// File name of the engine resource in either resource directory
pub const ENGINE_RESOURCE: &str = "engine.toml";

/// Environment variable selecting the resource branch
pub const ENV_MODE: &str = "TEMPLOG_ENV";

/// Environment variable overriding the packaged resource directory
pub const ENV_RESOURCE_DIR: &str = "TEMPLOG_RESOURCE_DIR";

enum EngineState<E> {
    Uninitialized,
    Initializing,
    Ready(Arc<E>),
    Failed(ExError),
}

pub struct EngineLoader<E> {
    state: Mutex<EngineState<E>>,
    settled: Condvar,
}

impl<E> EngineLoader<E> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::Uninitialized),
            settled: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the ready engine, running `init` if no attempt has succeeded yet
    ///
    /// # Errors
    ///
    /// The error of the attempt this call ran or waited on.
    pub fn ensure_ready<F>(&self, init: F) -> Result<Arc<E>>
    where
        F: FnOnce() -> Result<E>,
    {
        let mut state = self.lock();
        let mut waited = false;
        loop {
            let in_flight = match &*state {
                EngineState::Ready(engine) => return Ok(Arc::clone(engine)),
                EngineState::Failed(err) if waited => return Err(err.clone()),
                EngineState::Initializing => true,
                EngineState::Uninitialized | EngineState::Failed(_) => false,
            };
            if !in_flight {
                break;
            }
            state = self
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            waited = true;
        }
        *state = EngineState::Initializing;
        drop(state);

        let start = Instant::now();
        log_op_start!("ensure_ready");
        let mut guard = ResetOnUnwind {
            loader: self,
            armed: true,
        };
        let outcome = init();
        guard.armed = false;

        let mut state = self.lock();
        let result = match outcome {
            Ok(engine) => {
                let engine = Arc::new(engine);
                *state = EngineState::Ready(Arc::clone(&engine));
                log_op_end!(
                    "ensure_ready",
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Ok(engine)
            }
            Err(err) => {
                *state = EngineState::Failed(err.clone());
                log_op_error!(
                    "ensure_ready",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        };
        drop(state);
        self.settled.notify_all();
        result
    }

    /// The ready engine
    ///
    /// # Errors
    ///
    /// `EngineNotInitialized` unless an `ensure_ready` call has succeeded.
    pub fn get(&self) -> Result<Arc<E>> {
        match &*self.lock() {
            EngineState::Ready(engine) => Ok(Arc::clone(engine)),
            _ => Err(TempLogError::EngineNotInitialized.into()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock(), EngineState::Ready(_))
    }
}

impl<E> Default for EngineLoader<E> {
    fn default() -> Self {
        Self::new()
    }
}

// An initializer that panics must not leave waiters blocked on `Initializing`.
struct ResetOnUnwind<'a, E> {
    loader: &'a EngineLoader<E>,
    armed: bool,
}

impl<E> Drop for ResetOnUnwind<'_, E> {
    fn drop(&mut self) {
        if self.armed {
            *self.loader.lock() = EngineState::Uninitialized;
            self.loader.settled.notify_all();
        }
    }
}

/// Which resource directory the loader reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Interpret a `TEMPLOG_ENV` value; unset or unknown follows the build profile
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::to_ascii_lowercase).as_deref() {
            Some("development") | Some("dev") => BuildMode::Development,
            Some("production") | Some("prod") => BuildMode::Production,
            _ if cfg!(debug_assertions) => BuildMode::Development,
            _ => BuildMode::Production,
        }
    }

    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(ENV_MODE).ok().as_deref())
    }
}

/// Where the engine resource is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub mode: BuildMode,
    /// Resource directory inside the source tree
    pub dev_resource_dir: PathBuf,
    /// Resource directory shipped next to the executable
    pub packaged_resource_dir: PathBuf,
}

impl LoaderConfig {
    pub fn from_env() -> Self {
        let packaged_resource_dir = std::env::var_os(ENV_RESOURCE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_packaged_dir);
        Self {
            mode: BuildMode::from_env(),
            dev_resource_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources"),
            packaged_resource_dir,
        }
    }

    pub fn resolve_resource_path(&self) -> PathBuf {
        match self.mode {
            BuildMode::Development => self.dev_resource_dir.join(ENGINE_RESOURCE),
            BuildMode::Production => self.packaged_resource_dir.join(ENGINE_RESOURCE),
        }
    }
}

fn default_packaged_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
        .unwrap_or_else(|| PathBuf::from("resources"))
}

/// Initialize the SQLite engine from the resolved resource, or from
/// built-in defaults when the resource is absent
///
/// # Errors
///
/// `EngineInit` when the resource exists but cannot be read or parsed, or
/// the engine probe fails.
pub fn initialize_sqlite(config: &LoaderConfig) -> Result<SqliteEngine> {
    let path = config.resolve_resource_path();
    match std::fs::read(&path) {
        Ok(bytes) => {
            info!(path = %path.display(), mode = ?config.mode, "loading engine resource");
            SqliteEngine::from_resource(&bytes)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                mode = ?config.mode,
                "engine resource not found, using built-in defaults"
            );
            SqliteEngine::builtin()
        }
        Err(err) => Err(engine_init(format!(
            "failed to read engine resource {}: {}",
            path.display(),
            err
        ))),
    }
}

static ENGINE: EngineLoader<SqliteEngine> = EngineLoader::new();

/// Make the process-wide engine ready, initializing it on first success
///
/// # Errors
///
/// `EngineInit` when initialization fails; a later call retries.
pub fn ensure_ready() -> Result<Arc<SqliteEngine>> {
    ENGINE.ensure_ready(|| initialize_sqlite(&LoaderConfig::from_env()))
}

/// The process-wide engine
///
/// # Errors
///
/// `EngineNotInitialized` before `ensure_ready` has succeeded.
pub fn engine() -> Result<Arc<SqliteEngine>> {
    ENGINE.get()
}
