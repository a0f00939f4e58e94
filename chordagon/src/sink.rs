//! Where finished frames go. The real renderer lives outside this repository;
//! `LogSink` stands in for it and records what would be drawn.

use std::f64::consts::TAU;
use std::fmt::Write;

use chordagon_core::interval::EdgeTable;
use chordagon_core::notes::NoteFrame;

pub trait FrameSink {
    fn present(&mut self, frame: &NoteFrame, edges: &EdgeTable);
}

/// Logs a frame whenever it differs from the previous one.
#[derive(Default)]
pub struct LogSink {
    last: Option<NoteFrame>,
    presented: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames that differed from their predecessor.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &NoteFrame, edges: &EdgeTable) {
        if self.last.as_ref() == Some(frame) {
            return;
        }
        self.last = Some(*frame);
        self.presented += 1;
        log::info!(target: "frame", "{}", describe_frame(frame, edges));
    }
}

/// Position on the pitch circle in cents above A, `0..1200`.
pub fn circle_cents(angle: f64) -> f64 {
    (angle / TAU * 1200.0).rem_euclid(1200.0)
}

pub fn describe_frame(frame: &NoteFrame, edges: &EdgeTable) -> String {
    if frame.count() == 0 {
        return "silence".to_string();
    }
    let mut out = String::new();
    let points: Vec<String> = frame
        .notes()
        .iter()
        .zip(frame.angles())
        .map(|(note, &angle)| format!("{}@{:.1}c", note, circle_cents(angle)))
        .collect();
    let _ = write!(out, "{} notes [{}]", frame.count(), points.join(" "));
    if frame.edge_count() > 0 {
        let colors: Vec<String> = edges
            .colors(frame)
            .map(|(edge, color)| format!("{}-{}:{:.3}", edge.i, edge.j, color))
            .collect();
        let _ = write!(out, " edges [{}]", colors.join(" "));
    }
    out
}
