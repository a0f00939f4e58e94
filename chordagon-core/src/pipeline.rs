//! NotePipeline: the consumer side of the event queue.
//!
//! Constructed once at startup with a registered tuning client, then driven
//! once per frame by the render loop. Producers only ever see [`NoteSender`]s.

use std::sync::Arc;

use chordagon_types::NoteEvent;

use crate::config::Config;
use crate::interval::EdgeTable;
use crate::notes::{ActiveNoteSet, ApplyOutcome, NoteFrame, MAX_NOTES};
use crate::queue::{NoteQueue, NoteSender};
use crate::tuning::{TuningError, TuningHost, TuningResolver};

pub struct NotePipeline {
    queue: NoteQueue,
    notes: ActiveNoteSet,
    resolver: TuningResolver,
    edges: EdgeTable,
}

impl NotePipeline {
    /// Fails if `tuning` has nothing loaded; callers should treat that as fatal.
    pub fn new(queue_capacity: usize, tuning: &Arc<TuningHost>) -> Result<Self, TuningError> {
        let resolver = TuningResolver::new(tuning.register_client()?);
        Ok(Self {
            queue: NoteQueue::bounded(queue_capacity),
            notes: ActiveNoteSet::new(),
            resolver,
            edges: EdgeTable::new(MAX_NOTES),
        })
    }

    pub fn from_config(config: &Config, tuning: &Arc<TuningHost>) -> Result<Self, TuningError> {
        Self::new(config.queue_capacity(), tuning)
    }

    /// A producer handle for one input source.
    pub fn sender(&self) -> NoteSender {
        self.queue.sender()
    }

    /// Drain everything queued since the last frame, apply it in order, and
    /// return the resulting frame.
    pub fn update(&mut self) -> NoteFrame {
        let dropped = self.queue.take_dropped();
        if dropped > 0 {
            log::warn!(target: "frame", "event queue full, {} note events lost", dropped);
        }
        for event in self.queue.drain() {
            self.apply(&event);
        }
        self.notes.frame()
    }

    /// Apply a single event directly, bypassing the queue.
    pub fn apply(&mut self, event: &NoteEvent) -> ApplyOutcome {
        let resolver = &self.resolver;
        let outcome = self.notes.apply(event, |note| resolver.angle_of(note));
        log::debug!(
            target: "notes",
            "{:?} note {} vel {} ch {} @{}us -> {:?} ({} active)",
            event.kind,
            event.note,
            event.velocity,
            event.channel,
            event.timestamp_us,
            outcome,
            self.notes.len()
        );
        outcome
    }

    pub fn frame(&self) -> NoteFrame {
        self.notes.frame()
    }

    pub fn notes(&self) -> &ActiveNoteSet {
        &self.notes
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    /// Release every note. Used when the inputs go away, since their
    /// note-offs never will arrive.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordagon_types::TuningParams;

    #[test]
    fn construction_requires_loaded_tuning() {
        let host = TuningHost::new();
        assert!(matches!(
            NotePipeline::new(64, &host),
            Err(TuningError::NoTuningLoaded)
        ));
    }

    #[test]
    fn dropping_pipeline_deregisters() {
        let host = TuningHost::with_source(TuningParams::default());
        let pipeline = NotePipeline::new(64, &host).unwrap();
        assert_eq!(host.client_count(), 1);
        drop(pipeline);
        assert_eq!(host.client_count(), 0);
    }

    #[test]
    fn update_applies_queued_events_in_order() {
        let host = TuningHost::with_source(TuningParams::default());
        let mut pipeline = NotePipeline::new(64, &host).unwrap();
        let tx = pipeline.sender();
        tx.send(NoteEvent::note_on(60, 100));
        tx.send(NoteEvent::note_off(60));
        tx.send(NoteEvent::note_on(60, 90));

        let frame = pipeline.update();
        assert_eq!(frame.notes(), &[60]);
        assert_eq!(pipeline.update(), frame);
    }

    #[test]
    fn queue_capacity_comes_from_config() {
        let host = TuningHost::with_source(TuningParams::default());
        let pipeline = NotePipeline::from_config(&Config::load_from(None), &host).unwrap();
        let tx = pipeline.sender();
        for _ in 0..200 {
            tx.send(NoteEvent::note_on(1, 1));
        }
        assert_eq!(pipeline.dropped_events(), 72);
    }
}
