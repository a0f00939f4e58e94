//! Tuning context: who answers "what frequency is note n right now?".
//!
//! A [`TuningHost`] holds the currently loaded [`TuningSource`] and may have it
//! swapped at any time by whatever manages tunings. Readers register a
//! [`TuningClient`]; registration fails if nothing is loaded, and the client
//! deregisters itself when dropped.

pub mod resolver;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chordagon_types::{TuningParams, TuningSystem};

pub use resolver::{angle_for_frequency, TuningResolver, REFERENCE_FREQUENCY};

/// Maps a MIDI note number to a frequency in Hz.
pub trait TuningSource: Send + Sync {
    fn frequency_of(&self, note: u8) -> f64;

    fn describe(&self) -> String {
        "custom tuning".to_string()
    }
}

impl TuningSource for TuningParams {
    fn frequency_of(&self, note: u8) -> f64 {
        TuningParams::frequency_of(self, note)
    }

    fn describe(&self) -> String {
        match self.system {
            TuningSystem::ScaleJI => format!(
                "{} in {} ({}) (A4 = {} Hz)",
                self.system.name(),
                self.key.name(),
                self.ji_flavor.name(),
                self.tuning_a4
            ),
            _ => format!("{} (A4 = {} Hz)", self.system.name(), self.tuning_a4),
        }
    }
}

impl<F> TuningSource for F
where
    F: Fn(u8) -> f64 + Send + Sync,
{
    fn frequency_of(&self, note: u8) -> f64 {
        self(note)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuningError {
    /// Registration attempted before any tuning source was loaded.
    NoTuningLoaded,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTuningLoaded => write!(f, "no tuning loaded; cannot register a tuning client"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Shared owner of the current tuning source.
pub struct TuningHost {
    source: RwLock<Option<Arc<dyn TuningSource>>>,
    clients: AtomicUsize,
}

impl TuningHost {
    /// A host with nothing loaded yet.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            source: RwLock::new(None),
            clients: AtomicUsize::new(0),
        })
    }

    pub fn with_source(source: impl TuningSource + 'static) -> Arc<Self> {
        let host = Self::new();
        host.set_source(Arc::new(source));
        host
    }

    /// Replace the loaded tuning. Notes already on screen keep the angle they
    /// were given; only later note-ons see the new tuning.
    pub fn set_source(&self, source: Arc<dyn TuningSource>) {
        log::info!(target: "tuning", "loaded {}", source.describe());
        let mut guard = self.source.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(source);
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Acquire)
    }

    pub fn register_client(self: &Arc<Self>) -> Result<TuningClient, TuningError> {
        if !self.is_loaded() {
            return Err(TuningError::NoTuningLoaded);
        }
        let count = self.clients.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!(target: "tuning", "client registered ({} active)", count);
        Ok(TuningClient {
            host: Arc::clone(self),
        })
    }

    fn current(&self) -> Option<Arc<dyn TuningSource>> {
        self.source
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// A registered reader of a [`TuningHost`]. Deregisters on drop.
pub struct TuningClient {
    host: Arc<TuningHost>,
}

impl TuningClient {
    /// Frequency of `note` under whatever tuning is loaded at call time.
    pub fn frequency_of(&self, note: u8) -> Option<f64> {
        self.host.current().map(|source| source.frequency_of(note))
    }
}

impl Drop for TuningClient {
    fn drop(&mut self) {
        let remaining = self.host.clients.fetch_sub(1, Ordering::AcqRel) - 1;
        log::debug!(target: "tuning", "client deregistered ({} active)", remaining);
    }
}
