use crate::mask::ForegroundConvention;
use crate::skeleton::SegmentFeature;
use serde::{Deserialize, Serialize};

/// Column names bound to the nine roles of a frame observation.
///
/// Before head resolution the two ends are anonymous (`End1`, `End2`); the
/// feature stage binds `end_a` to the head and `end_b` to the tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleNames {
    pub end_a_x: String,
    pub end_a_y: String,
    pub end_b_x: String,
    pub end_b_y: String,
    pub center_x: String,
    pub center_y: String,
    pub centroid_x: String,
    pub centroid_y: String,
    pub time: String,
}

impl RoleNames {
    fn with_ends(a: &str, b: &str, time: &str) -> Self {
        RoleNames {
            end_a_x: format!("{} X", a),
            end_a_y: format!("{} Y", a),
            end_b_x: format!("{} X", b),
            end_b_y: format!("{} Y", b),
            center_x: "Center X".to_string(),
            center_y: "Center Y".to_string(),
            centroid_x: "Centroid X".to_string(),
            centroid_y: "Centroid Y".to_string(),
            time: time.to_string(),
        }
    }

    pub fn ends() -> Self {
        Self::with_ends("End1", "End2", "Centroid Time")
    }

    pub fn head_tail() -> Self {
        Self::with_ends("Head", "Tail", "Time")
    }

    /// Names in role order.
    pub fn as_array(&self) -> [&str; 9] {
        [
            &self.end_a_x,
            &self.end_a_y,
            &self.end_b_x,
            &self.end_b_y,
            &self.center_x,
            &self.center_y,
            &self.centroid_x,
            &self.centroid_y,
            &self.time,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonSettings {
    pub foreground: ForegroundConvention,
    pub features: Vec<SegmentFeature>,
}

impl Default for SkeletonSettings {
    fn default() -> Self {
        SkeletonSettings {
            foreground: ForegroundConvention::default(),
            features: SegmentFeature::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadSettings {
    pub columns: RoleNames,
    pub sort_by_time: bool,
    pub merge_equal_time: bool,
}

impl Default for HeadSettings {
    fn default() -> Self {
        HeadSettings {
            columns: RoleNames::ends(),
            sort_by_time: true,
            merge_equal_time: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    pub columns: RoleNames,
    pub sort_by_time: bool,
    /// With a two-row reference table, measure against the first row.
    pub reference_first_row: bool,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        FeatureSettings {
            columns: RoleNames::head_tail(),
            sort_by_time: true,
            reference_first_row: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub skeleton: SkeletonSettings,
    pub head: HeadSettings,
    pub features: FeatureSettings,
}
