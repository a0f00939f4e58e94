//! The set of notes currently on screen.
//!
//! Keyed by MIDI note number and kept in ascending order, so the rank of a note
//! in the set is its slot in the frame. Holds at most [`MAX_NOTES`]; a note-on
//! arriving while full is dropped, not queued.

use std::collections::BTreeMap;

use chordagon_types::NoteEvent;

/// Maximum simultaneously displayed notes
pub const MAX_NOTES: usize = 16;

/// What a single event did to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new note became active
    Inserted,
    /// An already active note was re-triggered and got a fresh angle
    Replaced,
    /// A note was released
    Removed,
    /// Note-on refused: set full, or the tuning had no usable frequency
    Rejected,
    /// Release for a note that was not active
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveNoteSet {
    notes: BTreeMap<u8, f64>,
}

impl ActiveNoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.notes.len() >= MAX_NOTES
    }

    pub fn contains(&self, note: u8) -> bool {
        self.notes.contains_key(&note)
    }

    pub fn angle(&self, note: u8) -> Option<f64> {
        self.notes.get(&note).copied()
    }

    /// Active notes with their angles, lowest note first.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.notes.iter().map(|(&note, &angle)| (note, angle))
    }

    /// Apply one event. `angle_of` is only consulted for a note-on that will be
    /// accepted, and at most once.
    pub fn apply<F>(&mut self, event: &NoteEvent, angle_of: F) -> ApplyOutcome
    where
        F: FnOnce(u8) -> Option<f64>,
    {
        if event.is_release() {
            return self.remove(event.note);
        }
        // the capacity check comes first, even for a re-trigger
        if self.is_full() {
            log::debug!(target: "notes", "set full, dropping note-on {}", event.note);
            return ApplyOutcome::Rejected;
        }
        match angle_of(event.note) {
            Some(angle) => self.insert(event.note, angle),
            None => ApplyOutcome::Rejected,
        }
    }

    fn insert(&mut self, note: u8, angle: f64) -> ApplyOutcome {
        match self.notes.insert(note, angle) {
            Some(_) => ApplyOutcome::Replaced,
            None => ApplyOutcome::Inserted,
        }
    }

    pub fn remove(&mut self, note: u8) -> ApplyOutcome {
        match self.notes.remove(&note) {
            Some(_) => ApplyOutcome::Removed,
            None => ApplyOutcome::Ignored,
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Dense snapshot for the renderer.
    pub fn frame(&self) -> NoteFrame {
        let mut frame = NoteFrame::default();
        for (slot, (note, angle)) in self.iter().enumerate() {
            frame.notes[slot] = note;
            frame.angles[slot] = angle;
        }
        frame.count = self.len();
        frame
    }
}

/// Per-frame output: angles packed into the leading `count` slots in ascending
/// note order. Slots past `count` are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoteFrame {
    angles: [f64; MAX_NOTES],
    notes: [u8; MAX_NOTES],
    count: usize,
}

impl NoteFrame {
    pub fn count(&self) -> usize {
        self.count
    }

    /// The meaningful angles, one per slot.
    pub fn angles(&self) -> &[f64] {
        &self.angles[..self.count]
    }

    /// The whole fixed-size buffer, for uploading as a uniform array.
    pub fn angle_buffer(&self) -> &[f64; MAX_NOTES] {
        &self.angles
    }

    /// Note number occupying each slot.
    pub fn notes(&self) -> &[u8] {
        &self.notes[..self.count]
    }

    /// Number of meaningful edges, `k(k-1)/2`.
    pub fn edge_count(&self) -> usize {
        self.count * self.count.saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle(note: u8) -> Option<f64> {
        Some(note as f64 * 0.5)
    }

    #[test]
    fn note_on_then_off() {
        let mut set = ActiveNoteSet::new();
        assert_eq!(set.apply(&NoteEvent::note_on(60, 100), angle), ApplyOutcome::Inserted);
        assert_eq!(set.angle(60), Some(30.0));
        assert_eq!(set.apply(&NoteEvent::note_off(60), angle), ApplyOutcome::Removed);
        assert!(set.is_empty());
    }

    #[test]
    fn velocity_zero_matches_note_off() {
        let mut a = ActiveNoteSet::new();
        let mut b = ActiveNoteSet::new();
        for set in [&mut a, &mut b] {
            set.apply(&NoteEvent::note_on(60, 100), angle);
            set.apply(&NoteEvent::note_on(67, 100), angle);
        }
        a.apply(&NoteEvent::note_on(60, 0), angle);
        b.apply(&NoteEvent::note_off(60), angle);
        assert_eq!(a.frame(), b.frame());
        assert_eq!(a.frame().notes(), &[67]);
    }

    #[test]
    fn releases_skip_tuning_even_when_full() {
        let mut set = ActiveNoteSet::new();
        for note in 0..MAX_NOTES as u8 {
            set.apply(&NoteEvent::note_on(note, 1), angle);
        }
        let no_tuning = |_| panic!("a release must not resolve a frequency");

        let release = NoteEvent::note_on(4, 0);
        assert!(release.is_release());
        assert_eq!(set.apply(&release, no_tuning), ApplyOutcome::Removed);
        assert_eq!(set.apply(&NoteEvent::note_off(5), no_tuning), ApplyOutcome::Removed);
        assert_eq!(set.len(), MAX_NOTES - 2);
    }

    #[test]
    fn note_off_for_absent_note_is_noop() {
        let mut set = ActiveNoteSet::new();
        set.apply(&NoteEvent::note_on(48, 10), angle);
        let before = set.frame();
        assert_eq!(set.apply(&NoteEvent::note_off(50), angle), ApplyOutcome::Ignored);
        assert_eq!(set.apply(&NoteEvent::note_on(50, 0), angle), ApplyOutcome::Ignored);
        assert_eq!(set.frame(), before);
    }

    #[test]
    fn retrigger_overwrites_angle() {
        let mut set = ActiveNoteSet::new();
        set.apply(&NoteEvent::note_on(60, 100), |_| Some(1.0));
        let outcome = set.apply(&NoteEvent::note_on(60, 80), |_| Some(2.0));
        assert_eq!(outcome, ApplyOutcome::Replaced);
        assert_eq!(set.angle(60), Some(2.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn full_set_rejects_without_resolving() {
        let mut set = ActiveNoteSet::new();
        for note in 0..MAX_NOTES as u8 {
            set.apply(&NoteEvent::note_on(note, 1), angle);
        }
        assert!(set.is_full());

        let outcome = set.apply(&NoteEvent::note_on(100, 50), |_| {
            panic!("tuning must not be consulted when full")
        });
        assert_eq!(outcome, ApplyOutcome::Rejected);
        assert_eq!(set.len(), MAX_NOTES);
        assert!(!set.contains(100));

        // a re-trigger while full is refused too; the old angle stays
        let outcome = set.apply(&NoteEvent::note_on(3, 50), |_| Some(99.0));
        assert_eq!(outcome, ApplyOutcome::Rejected);
        assert_eq!(set.angle(3), Some(1.5));
    }

    #[test]
    fn unresolvable_note_is_rejected() {
        let mut set = ActiveNoteSet::new();
        assert_eq!(set.apply(&NoteEvent::note_on(60, 100), |_| None), ApplyOutcome::Rejected);
        assert!(set.is_empty());
    }

    #[test]
    fn frame_is_dense_and_sorted_by_note() {
        let mut set = ActiveNoteSet::new();
        for note in [72, 60, 67, 64] {
            set.apply(&NoteEvent::note_on(note, 100), angle);
        }
        set.apply(&NoteEvent::note_off(64), angle);

        let frame = set.frame();
        assert_eq!(frame.count(), 3);
        assert_eq!(frame.notes(), &[60, 67, 72]);
        assert_eq!(frame.angles(), &[30.0, 33.5, 36.0]);
        assert!(frame.angle_buffer()[3..].iter().all(|&a| a == 0.0));
        assert_eq!(frame.edge_count(), 3);
    }

    #[test]
    fn empty_frame() {
        let frame = ActiveNoteSet::new().frame();
        assert_eq!(frame.count(), 0);
        assert!(frame.angles().is_empty());
        assert_eq!(frame.edge_count(), 0);
    }

    #[test]
    fn clear_empties_set() {
        let mut set = ActiveNoteSet::new();
        set.apply(&NoteEvent::note_on(1, 1), angle);
        set.clear();
        assert!(set.is_empty());
    }
}
