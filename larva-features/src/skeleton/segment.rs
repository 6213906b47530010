use crate::geometry::Pixel;
use crate::mask::{BitMask, ForegroundConvention};
use crate::settings::SkeletonSettings;
use crate::skeleton::SkeletonPath;
use bitvec::prelude::BitVec;

define_columns! {
    /// Per-mask values reported by [`SegmentFeatures`].
    pub enum SegmentFeature {
        End1X => "End1 X",
        End1Y => "End1 Y",
        End2X => "End2 X",
        End2Y => "End2 Y",
        CenterX => "Center X",
        CenterY => "Center Y",
    }
}

impl SegmentFeature {
    fn is_end(&self) -> bool {
        matches!(
            self,
            SegmentFeature::End1X
                | SegmentFeature::End1Y
                | SegmentFeature::End2X
                | SegmentFeature::End2Y
        )
    }
}

/// End and center positions of the larva skeleton, frame after frame.
///
/// Frames whose mask cannot be ordered keep the values of the previous frame.
/// Reported coordinates are 1-based.
#[derive(Debug, Clone)]
pub struct SegmentFeatures {
    enabled: BitVec,
    convention: ForegroundConvention,
    end1: Pixel,
    end2: Pixel,
    center: Pixel,
}

impl SegmentFeatures {
    pub fn new(settings: &SkeletonSettings) -> Self {
        let mut enabled = BitVec::repeat(false, SegmentFeature::ALL.len());
        for feature in &settings.features {
            enabled.set(feature.index(), true);
        }

        SegmentFeatures {
            enabled,
            convention: settings.foreground,
            end1: Pixel::default(),
            end2: Pixel::default(),
            center: Pixel::default(),
        }
    }

    pub fn is_enabled(&self, feature: SegmentFeature) -> bool {
        self.enabled[feature.index()]
    }

    pub fn enabled(&self) -> impl Iterator<Item = SegmentFeature> + '_ {
        SegmentFeature::ALL
            .iter()
            .copied()
            .filter(|f| self.is_enabled(*f))
    }

    /// Recomputes the enabled values from `mask`. Returns `false` when the
    /// previous values were kept.
    pub fn update(&mut self, mask: &BitMask) -> bool {
        let ends = self.enabled().any(|f| f.is_end());
        let center = self.enabled().any(|f| !f.is_end());
        if !ends && !center {
            return false;
        }

        let Some(path) = SkeletonPath::extract(mask, self.convention) else {
            return false;
        };
        if ends {
            (self.end1, self.end2) = path.extremities();
        }
        if center {
            self.center = path.midpoint();
        }
        true
    }

    pub fn value(&self, feature: SegmentFeature) -> f64 {
        let coordinate = match feature {
            SegmentFeature::End1X => self.end1.x,
            SegmentFeature::End1Y => self.end1.y,
            SegmentFeature::End2X => self.end2.x,
            SegmentFeature::End2Y => self.end2.y,
            SegmentFeature::CenterX => self.center.x,
            SegmentFeature::CenterY => self.center.y,
        };
        (coordinate + 1) as f64
    }

    /// Values of the enabled features, in column order.
    pub fn values(&self) -> Vec<(SegmentFeature, f64)> {
        self.enabled().map(|f| (f, self.value(f))).collect()
    }
}
