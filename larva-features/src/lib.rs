#![cfg_attr(debug_assertions, allow(warnings))]

#[macro_use]
mod columns_macro;

pub mod geometry;
pub mod kinematics;
pub mod mask;
pub mod pipeline;
pub mod settings;
pub mod skeleton;
pub mod table;
pub mod track;

pub use geometry::{Pixel, Point, Position};
pub use kinematics::{KinematicFeatureComputer, KinematicFrame};
pub use mask::{BitMask, ForegroundConvention, PixelSet};
pub use pipeline::{compute_features, process_batch, resolve_head, segment_table, HeadResolution};
pub use settings::PipelineSettings;
pub use skeleton::SkeletonPath;
pub use table::{Cell, ConfigurationError, Row, Table};
pub use track::{EndpointTracker, FrameObservation, HeadTailFrame, ResolvedTrack};
