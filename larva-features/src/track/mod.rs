use crate::geometry::Position;
use bitvec::prelude::BitVec;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub mod continuity;
pub mod head_vote;
pub mod preprocess;

pub use continuity::{continuity_swaps, swap_needed};
pub use head_vote::HeadVote;
pub use preprocess::{merge_equal_time, sort_by_time, TimeOrdered};

/// Measurements of one frame before head resolution. `end_a` and `end_b`
/// are the two skeleton ends in whatever order the frame reported them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    pub end_a: Position,
    pub end_b: Position,
    pub center: Position,
    pub centroid: Position,
    pub time: f64,
}

impl FrameObservation {
    pub fn swapped(&self) -> Self {
        FrameObservation {
            end_a: self.end_b,
            end_b: self.end_a,
            ..*self
        }
    }

    /// Field-wise mean of two observations.
    pub fn averaged(&self, other: &Self) -> Self {
        let mid = |a: Position, b: Position| Position::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        FrameObservation {
            end_a: mid(self.end_a, other.end_a),
            end_b: mid(self.end_b, other.end_b),
            center: mid(self.center, other.center),
            centroid: mid(self.centroid, other.centroid),
            time: (self.time + other.time) / 2.0,
        }
    }
}

impl TimeOrdered for FrameObservation {
    fn time(&self) -> f64 {
        self.time
    }

    fn merge(&self, other: &Self) -> Self {
        self.averaged(other)
    }
}

/// One frame after head resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadTailFrame {
    pub head: Position,
    pub tail: Position,
    pub center: Position,
    pub centroid: Position,
    pub time: f64,
}

/// Result of resolving the head of one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrack {
    /// Whether the `end_a` column (after continuity alignment) is the head.
    pub head_is_a: bool,
    /// Frames whose ends were exchanged to keep identities continuous.
    pub swaps: BitVec,
    pub frames: Vec<HeadTailFrame>,
}

/// Resolves head and tail over a recording in three passes: frame-to-frame
/// continuity, a vote over the first frames, and one global relabel.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointTracker {
    pub sort_by_time: bool,
    pub merge_equal_time: bool,
}

impl EndpointTracker {
    pub fn new(sort_by_time: bool, merge_equal_time: bool) -> Self {
        EndpointTracker {
            sort_by_time,
            merge_equal_time,
        }
    }

    /// Optional sort and equal-time merge.
    pub fn prepare<T: TimeOrdered>(&self, mut frames: Vec<T>) -> Vec<T> {
        if self.sort_by_time {
            sort_by_time(&mut frames);
        }
        if self.merge_equal_time {
            frames = merge_equal_time(frames);
        }
        frames
    }

    /// Pass 1: exchanges ends where needed so that `end_a` and `end_b` follow
    /// the same physical end over the whole recording.
    pub fn align(frames: &[FrameObservation]) -> (Vec<FrameObservation>, BitVec) {
        let swaps = continuity_swaps(frames);
        let aligned = frames
            .iter()
            .zip(swaps.iter().by_vals())
            .map(|(frame, swap)| if swap { frame.swapped() } else { *frame })
            .collect();
        (aligned, swaps)
    }

    /// Pass 3: renames the aligned ends to head and tail.
    pub fn relabel(frames: &[FrameObservation], head_is_a: bool) -> Vec<HeadTailFrame> {
        frames
            .iter()
            .map(|frame| {
                let (head, tail) = if head_is_a {
                    (frame.end_a, frame.end_b)
                } else {
                    (frame.end_b, frame.end_a)
                };
                HeadTailFrame {
                    head,
                    tail,
                    center: frame.center,
                    centroid: frame.centroid,
                    time: frame.time,
                }
            })
            .collect()
    }

    /// Pass 2: decides from the first aligned frames whether `end_a` is the
    /// head.
    pub fn vote(aligned: &[FrameObservation]) -> bool {
        let vote = HeadVote::tally(aligned);
        let head_is_a = vote.head_is_a();
        info!(
            "Head resolved to end {} ({} vs {} tail votes over {} comparisons).",
            if head_is_a { "A" } else { "B" },
            vote.end_a_tail_votes,
            vote.end_b_tail_votes,
            vote.comparisons
        );
        head_is_a
    }

    pub fn resolve(&self, frames: Vec<FrameObservation>) -> ResolvedTrack {
        let frames = self.prepare(frames);
        let (aligned, swaps) = Self::align(&frames);
        debug!(
            "Continuity pass exchanged ends in {} of {} frames.",
            swaps.count_ones(),
            aligned.len()
        );

        let head_is_a = Self::vote(&aligned);

        ResolvedTrack {
            head_is_a,
            swaps,
            frames: Self::relabel(&aligned, head_is_a),
        }
    }

    /// Resolves independent recordings in parallel.
    pub fn resolve_all(&self, tracks: Vec<Vec<FrameObservation>>) -> Vec<ResolvedTrack> {
        tracks
            .into_par_iter()
            .map(|frames| self.resolve(frames))
            .collect()
    }
}
