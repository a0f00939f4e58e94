//! # chordagon-core
//!
//! The real-time pitch-event pipeline behind Chordagon, a microtonal chord
//! visualizer. Note events from any number of MIDI inputs flow through a
//! bounded queue into a set of at most 16 active notes; each note gets an angle
//! on the pitch circle from the loaded tuning, and each pair of notes gets an
//! interval class used to color the line between them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chordagon_core::config::Config;
//! use chordagon_core::pipeline::NotePipeline;
//! use chordagon_core::tuning::TuningHost;
//!
//! let config = Config::load();
//! let tuning = TuningHost::with_source(config.tuning());
//! let mut pipeline = NotePipeline::from_config(&config, &tuning)?;
//!
//! // hand pipeline.sender() to each input, then once per frame:
//! let frame = pipeline.update();
//! for (edge, color) in pipeline.edges().colors(&frame) {
//!     // draw a line between slots edge.i and edge.j
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`queue`] — multi-producer bounded event queue, drop-on-full
//! - [`midi`] — `midir` connections, one per input port, and note message parsing
//! - [`tuning`] — `TuningHost`/`TuningClient` registration and the note-to-angle resolver
//! - [`notes`] — the active note set and the per-frame `NoteFrame`
//! - [`interval`] — interval class folding and the slot-pair edge table
//! - [`pipeline`] — `NotePipeline`, the per-frame consumer
//! - [`config`] — TOML configuration (embedded defaults + user override)

pub mod config;
pub mod interval;
pub mod midi;
pub mod notes;
pub mod pipeline;
pub mod queue;
pub mod tuning;

pub use notes::MAX_NOTES;
