use crate::geometry::Position;
use crate::track::HeadTailFrame;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub mod angle;
pub mod reference;

pub use angle::{absolute_angle, angle_diff, UNDEFINED_ANGLE};
pub use reference::select_reference;

/// Added to the summed segment lengths to account for the end pixels.
pub(crate) const LENGTH_CORRECTION: f64 = 2.0;
/// Distance reported when no reference point is available.
pub(crate) const NO_REFERENCE_DISTANCE: f64 = -1.0;

define_columns! {
    /// Columns appended by the feature stage, in output order.
    pub enum KinematicFeature {
        AbsAngle => "alphaAbs",
        RelAngle => "alpha (body angle)",
        HeadAngle => "theta (head angle)",
        ReorientSpeed => "reorientSpeed",
        VCentroid => "v_centroid",
        VHead => "v_head",
        VCenter => "v_center",
        DistToReference => "distToContainer",
        Length => "length",
    }
}

/// Derived motion descriptors of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicFrame {
    /// Body axis (tail to center) against the x-axis.
    pub abs_angle: f64,
    /// Body axis accumulated frame by frame, without wrapping.
    pub rel_angle: f64,
    /// Head axis (center to head) relative to the body axis.
    pub head_angle: f64,
    pub reorient_speed: f64,
    pub v_centroid: f64,
    pub v_head: f64,
    /// Displacement of the center since the previous frame. Not divided by
    /// the elapsed time, unlike the other two speeds.
    pub v_center: f64,
    pub dist_to_reference: f64,
    pub length: f64,
}

impl KinematicFrame {
    pub fn value(&self, feature: KinematicFeature) -> f64 {
        match feature {
            KinematicFeature::AbsAngle => self.abs_angle,
            KinematicFeature::RelAngle => self.rel_angle,
            KinematicFeature::HeadAngle => self.head_angle,
            KinematicFeature::ReorientSpeed => self.reorient_speed,
            KinematicFeature::VCentroid => self.v_centroid,
            KinematicFeature::VHead => self.v_head,
            KinematicFeature::VCenter => self.v_center,
            KinematicFeature::DistToReference => self.dist_to_reference,
            KinematicFeature::Length => self.length,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        KinematicFeature::ALL.iter().map(|f| self.value(*f)).collect()
    }
}

/// What the feature computation remembers from the previous frame.
///
/// `abs_angle` only ever holds a defined angle: frames with an undefined body
/// axis leave it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub head: Position,
    pub tail: Position,
    pub center: Position,
    pub centroid: Position,
    pub abs_angle: f64,
    pub rel_angle: f64,
    pub time: f64,
}

impl MotionState {
    /// State before the first frame: positions and angles at zero, time equal
    /// to the first frame's, so the first frame reports no speed.
    pub fn initial(first_time: f64) -> Self {
        MotionState {
            time: first_time,
            ..MotionState::default()
        }
    }

    /// Computes the descriptors of `frame` and the state for the next one.
    pub fn step(&self, frame: &HeadTailFrame, reference: Option<Position>) -> (MotionState, KinematicFrame) {
        let abs_angle = absolute_angle(frame.tail, frame.center);
        let rel_angle = self.rel_angle + angle_diff(self.abs_angle, abs_angle);
        let head_angle = angle_diff(abs_angle, absolute_angle(frame.center, frame.head));

        let dt = frame.time - self.time;
        let per_time = |distance: f64| if dt != 0.0 { distance / dt } else { 0.0 };

        let reorient_speed = per_time((rel_angle - self.rel_angle).abs());
        let v_centroid = per_time(frame.centroid.distance(&self.centroid));
        let v_head = per_time(frame.head.distance(&self.head));
        let v_center = if dt != 0.0 {
            frame.center.distance(&self.center)
        } else {
            0.0
        };

        let dist_to_reference = reference
            .map(|r| frame.center.distance(&r))
            .unwrap_or(NO_REFERENCE_DISTANCE);
        let length = frame.tail.distance(&frame.center)
            + frame.center.distance(&frame.head)
            + LENGTH_CORRECTION;

        let next = MotionState {
            head: frame.head,
            tail: frame.tail,
            center: frame.center,
            centroid: frame.centroid,
            abs_angle: if abs_angle == UNDEFINED_ANGLE {
                self.abs_angle
            } else {
                abs_angle
            },
            rel_angle,
            time: frame.time,
        };

        (
            next,
            KinematicFrame {
                abs_angle,
                rel_angle,
                head_angle,
                reorient_speed,
                v_centroid,
                v_head,
                v_center,
                dist_to_reference,
                length,
            },
        )
    }
}

/// Computes the motion descriptors of a head-resolved recording in one
/// left-to-right pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicFeatureComputer {
    pub reference: Option<Position>,
}

impl KinematicFeatureComputer {
    pub fn new(reference: Option<Position>) -> Self {
        KinematicFeatureComputer { reference }
    }

    /// One descriptor per frame, or `None` for recordings of fewer than two
    /// frames, which are left as they are.
    pub fn compute(&self, frames: &[HeadTailFrame]) -> Option<Vec<KinematicFrame>> {
        if frames.len() < 2 {
            debug!("Recording of {} frames is too short for features.", frames.len());
            return None;
        }

        let initial = MotionState::initial(frames[0].time);
        let descriptors = frames
            .iter()
            .enumerate()
            .scan(initial, |state, (index, frame)| {
                let (next, descriptor) = state.step(frame, self.reference);
                *state = next;
                debug!("Feature pass: frame {}/{}", index + 1, frames.len());
                Some(descriptor)
            })
            .collect();
        Some(descriptors)
    }

    /// Computes independent recordings in parallel.
    pub fn compute_all(&self, tracks: &[Vec<HeadTailFrame>]) -> Vec<Option<Vec<KinematicFrame>>> {
        tracks.par_iter().map(|frames| self.compute(frames)).collect()
    }
}
