//! Bounded note event queue between MIDI driver callbacks and the frame loop.
//!
//! Any number of [`NoteSender`]s (one per connected input port) push events
//! without blocking; the single [`NoteQueue`] drains whatever is buffered once
//! per frame. A full queue drops the incoming event: a late note is worth less
//! to the display than a fresh one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use chordagon_types::NoteEvent;

/// Producer handle. Cheap to clone; each MIDI connection owns one.
#[derive(Clone)]
pub struct NoteSender {
    tx: Sender<NoteEvent>,
    dropped: Arc<AtomicU64>,
}

impl NoteSender {
    /// Enqueue `event` without blocking. Returns `false` if it was dropped
    /// because the queue is full or the consumer is gone.
    pub fn send(&self, event: NoteEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer end of the note event queue.
pub struct NoteQueue {
    rx: Receiver<NoteEvent>,
    tx: Sender<NoteEvent>,
    dropped: Arc<AtomicU64>,
    dropped_reported: u64,
}

impl NoteQueue {
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self {
            rx,
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            dropped_reported: 0,
        }
    }

    /// A new producer handle for this queue.
    pub fn sender(&self) -> NoteSender {
        NoteSender {
            tx: self.tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(usize::MAX)
    }

    /// Every event buffered right now, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<NoteEvent> {
        self.rx.try_iter().collect()
    }

    /// Total events dropped on a full queue since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Events dropped since the previous call.
    pub fn take_dropped(&mut self) -> u64 {
        let total = self.dropped();
        let fresh = total - self.dropped_reported;
        self.dropped_reported = total;
        fresh
    }
}
