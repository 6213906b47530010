//! Table-level stages: masks to segment rows, head resolution and motion
//! features.

use crate::geometry::Position;
use crate::kinematics::{select_reference, KinematicFeature, KinematicFeatureComputer};
use crate::mask::BitMask;
use crate::settings::{FeatureSettings, HeadSettings, PipelineSettings, SkeletonSettings};
use crate::skeleton::SegmentFeatures;
use crate::table::{Cell, ColumnMapping, ConfigurationError, Role, Row, Table};
use crate::track::{sort_by_time, EndpointTracker, TimeOrdered};
use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;

/// A table row paired with the value of its time column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRow {
    pub time: f64,
    pub row: Row,
}

impl TimeOrdered for TimedRow {
    fn time(&self) -> f64 {
        self.time
    }

    fn merge(&self, other: &Self) -> Self {
        TimedRow {
            time: self.time,
            row: self.row.merged(&other.row),
        }
    }
}

fn timed_rows(table: &Table, mapping: &ColumnMapping) -> Result<Vec<TimedRow>, ConfigurationError> {
    table
        .rows
        .iter()
        .map(|row| {
            Ok(TimedRow {
                time: mapping.value(table, row, Role::Time)?,
                row: row.clone(),
            })
        })
        .collect()
}

/// Outcome of [`resolve_head`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadResolution {
    pub table: Table,
    /// `None` when the table was too short and passed through unchanged.
    pub head_is_a: Option<bool>,
}

fn resolved_label(role: Role, head_is_a: bool) -> &'static str {
    match (role, head_is_a) {
        (Role::EndAX, true) | (Role::EndBX, false) => "Head X",
        (Role::EndAY, true) | (Role::EndBY, false) => "Head Y",
        (Role::EndAX, false) | (Role::EndBX, true) => "Tail X",
        (Role::EndAY, false) | (Role::EndBY, true) => "Tail Y",
        (Role::CenterX, _) => "Center X",
        (Role::CenterY, _) => "Center Y",
        (Role::CentroidX, _) => "Centroid X",
        (Role::CentroidY, _) => "Centroid Y",
        (Role::Time, _) => "Time",
    }
}

fn renamed_columns(table: &Table, mapping: &ColumnMapping, head_is_a: bool) -> Vec<String> {
    let mut columns = table.columns.clone();
    for role in Role::ALL {
        columns[mapping.index(*role)] = resolved_label(*role, head_is_a).to_string();
    }
    columns
}

/// Decides which end column holds the head and rewrites the table so the
/// end columns follow one physical end and carry `Head`/`Tail` names.
///
/// Rows are optionally sorted and merged by time first. Tables of fewer than
/// two rows are returned unchanged.
pub fn resolve_head(table: &Table, settings: &HeadSettings) -> Result<HeadResolution> {
    let mapping = ColumnMapping::resolve(table, &settings.columns)?;
    if table.len() < 2 {
        warn!("Table of {} rows is too short for head resolution.", table.len());
        return Ok(HeadResolution {
            table: table.clone(),
            head_is_a: None,
        });
    }

    let tracker = EndpointTracker::new(settings.sort_by_time, settings.merge_equal_time);
    let rows = tracker.prepare(timed_rows(table, &mapping)?);
    let observations = rows
        .iter()
        .map(|timed| mapping.observation(table, &timed.row))
        .collect::<Result<Vec<_>, _>>()?;

    let (aligned, swaps) = EndpointTracker::align(&observations);
    let head_is_a = EndpointTracker::vote(&aligned);

    let mut resolved = Table::new(renamed_columns(table, &mapping, head_is_a));
    for (index, (timed, swap)) in rows.into_iter().zip(swaps.iter().by_vals()).enumerate() {
        let mut row = timed.row;
        if swap {
            mapping.swap_ends(&mut row);
        }
        resolved.push_row(row)?;
        debug!("Head resolution: row {}/{}", index + 1, observations.len());
    }

    info!(
        "Resolved head of {} rows ({} exchanged).",
        resolved.len(),
        swaps.count_ones()
    );
    Ok(HeadResolution {
        table: resolved,
        head_is_a: Some(head_is_a),
    })
}

/// Reads the reference point from an auxiliary table whose first two columns
/// are X and Y.
pub fn reference_point(table: &Table, first_row: bool) -> Result<Option<Position>, ConfigurationError> {
    if !(1..=2).contains(&table.len()) {
        debug!("Reference table of {} rows is ignored.", table.len());
        return Ok(None);
    }

    let points = table
        .rows
        .iter()
        .map(|row| match (row.cell(0).as_f64(), row.cell(1).as_f64()) {
            (Some(x), Some(y)) => Ok(Position::new(x, y)),
            _ => Err(ConfigurationError::InvalidReference {
                row: row.key.clone(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(select_reference(&points, first_row))
}

/// Appends the motion descriptors of a head-resolved table, one column per
/// [`KinematicFeature`]. Input columns are kept. Tables of fewer than two
/// rows are returned unchanged.
pub fn compute_features(table: &Table, reference: Option<&Table>, settings: &FeatureSettings) -> Result<Table> {
    let mapping = ColumnMapping::resolve(table, &settings.columns)?;
    let reference = match reference {
        Some(reference) => reference_point(reference, settings.reference_first_row)?,
        None => None,
    };
    if table.len() < 2 {
        warn!("Table of {} rows is too short for motion features.", table.len());
        return Ok(table.clone());
    }

    let mut rows = timed_rows(table, &mapping)?;
    if settings.sort_by_time {
        sort_by_time(&mut rows);
    }
    let frames = rows
        .iter()
        .map(|timed| mapping.head_tail_frame(table, &timed.row))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(descriptors) = KinematicFeatureComputer::new(reference).compute(&frames) else {
        return Ok(table.clone());
    };

    let mut columns = table.columns.clone();
    columns.extend(KinematicFeature::ALL.iter().map(|f| f.label().to_string()));
    let mut output = Table::new(columns);
    for (timed, descriptor) in rows.into_iter().zip(descriptors) {
        let mut row = timed.row;
        row.cells
            .extend(descriptor.values().into_iter().map(Cell::Double));
        output.push_row(row)?;
    }
    Ok(output)
}

/// Builds one row of enabled segment features per mask. Masks that cannot be
/// ordered repeat the previous row's values.
pub fn segment_table(masks: &[BitMask], settings: &SkeletonSettings) -> Table {
    let mut features = SegmentFeatures::new(settings);
    let columns = features.enabled().map(|f| f.label().to_string()).collect();
    let mut table = Table::new(columns);

    for (index, mask) in masks.iter().enumerate() {
        if !features.update(mask) {
            debug!("Mask {} kept the previous segment features.", index);
        }
        let cells = features
            .values()
            .into_iter()
            .map(|(_, value)| Cell::Double(value))
            .collect();
        table.rows.push(Row::new(format!("Row{}", index), cells));
    }
    table
}

/// Head resolution followed by feature computation for independent
/// recordings, processed in parallel. Recordings too short for head
/// resolution are returned as they are.
pub fn process_batch(
    tables: &[Table],
    reference: Option<&Table>,
    settings: &PipelineSettings,
) -> Vec<Result<Table>> {
    tables
        .par_iter()
        .map(|table| {
            let resolved = resolve_head(table, &settings.head)?;
            if resolved.head_is_a.is_none() {
                return Ok(resolved.table);
            }
            compute_features(&resolved.table, reference, &settings.features)
        })
        .collect()
}
