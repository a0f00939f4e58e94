//! # chordagon-types
//!
//! Shared type definitions for Chordagon: note events as they arrive from
//! MIDI drivers, musical enums used by configuration, and the pure tuning math
//! that turns a MIDI note number into a frequency.

pub mod music;
pub mod note;
pub mod tuning;

pub use music::{JIFlavor, Key, TuningSystem};
pub use note::{NoteEvent, NoteEventKind};
pub use tuning::TuningParams;
