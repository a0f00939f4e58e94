use serde::{Deserialize, Serialize};

/// Which edge of a note an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteEventKind {
    NoteOn,
    NoteOff,
}

/// A note-on or note-off received from a hardware input.
///
/// A `NoteOn` with velocity 0 is kept as-is; the active note set treats it as
/// a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    /// MIDI note number (0-127)
    pub note: u8,
    /// MIDI velocity (0-127)
    pub velocity: u8,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Driver timestamp in microseconds (driver-specific epoch)
    pub timestamp_us: u64,
}

impl NoteEvent {
    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteEventKind::NoteOn,
            note,
            velocity,
            channel: 0,
            timestamp_us: 0,
        }
    }

    pub fn note_off(note: u8) -> Self {
        Self {
            kind: NoteEventKind::NoteOff,
            note,
            velocity: 0,
            channel: 0,
            timestamp_us: 0,
        }
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_timestamp(mut self, timestamp_us: u64) -> Self {
        self.timestamp_us = timestamp_us;
        self
    }

    /// True for note-offs and for note-ons with velocity 0.
    pub fn is_release(&self) -> bool {
        match self.kind {
            NoteEventKind::NoteOff => true,
            NoteEventKind::NoteOn => self.velocity == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_zero_note_on_is_release() {
        assert!(NoteEvent::note_on(60, 0).is_release());
        assert!(!NoteEvent::note_on(60, 1).is_release());
        assert!(NoteEvent::note_off(60).is_release());
    }

    #[test]
    fn builders_set_channel_and_timestamp() {
        let ev = NoteEvent::note_on(64, 90).with_channel(3).with_timestamp(1234);
        assert_eq!(ev.channel, 3);
        assert_eq!(ev.timestamp_us, 1234);
        assert_eq!(ev.kind, NoteEventKind::NoteOn);
    }
}
