//! Interval classes and the edge enumeration they are drawn along.

use std::f64::consts::PI;

use crate::notes::{NoteFrame, MAX_NOTES};

/// Fold the distance between two pitch-circle angles into `[0, 1]`.
///
/// Unison and octaves map to 0, the tritone to 1, and an interval and its
/// inversion to the same value regardless of which note is higher.
pub fn classify(a: f64, b: f64) -> f64 {
    let x = ((b - a).abs() / PI).rem_euclid(2.0);
    if x < 1.0 {
        x
    } else {
        2.0 - x
    }
}

/// A pair of slot indices, `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub i: usize,
    pub j: usize,
}

/// Every unordered slot pair for `n` slots, ordered by `j` then `i`:
/// (0,1), (0,2), (1,2), (0,3), ...
///
/// With that order the pairs among the first `k` slots are exactly the first
/// `k(k-1)/2` entries, which is what lets a frame with `k` active notes draw a
/// prefix of one static table.
#[derive(Debug, Clone)]
pub struct EdgeTable {
    slots: usize,
    edges: Vec<Edge>,
}

impl EdgeTable {
    pub fn new(slots: usize) -> Self {
        let edges = (1..slots)
            .flat_map(|j| (0..j).map(move |i| Edge { i, j }))
            .collect();
        Self { slots, edges }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges between occupied slots when the first `k` are occupied.
    pub fn active(&self, k: usize) -> &[Edge] {
        let k = k.min(self.slots);
        &self.edges[..k * k.saturating_sub(1) / 2]
    }

    /// Flattened `[i0, j0, i1, j1, ...]` for an element buffer.
    pub fn element_indices(&self) -> Vec<u32> {
        self.edges
            .iter()
            .flat_map(|e| [e.i as u32, e.j as u32])
            .collect()
    }

    /// `(edge, color)` for each meaningful edge of `frame`.
    pub fn colors<'a>(&'a self, frame: &'a NoteFrame) -> impl Iterator<Item = (Edge, f64)> + 'a {
        let angles = frame.angles();
        self.active(frame.count())
            .iter()
            .map(move |&edge| (edge, classify(angles[edge.i], angles[edge.j])))
    }
}

impl Default for EdgeTable {
    fn default() -> Self {
        Self::new(MAX_NOTES)
    }
}
