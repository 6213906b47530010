use crate::geometry::Pixel;
use crate::mask::{BitMask, ForegroundConvention, PixelSet};
use bitvec::bitvec;
use bitvec::prelude::Lsb0;
use hashbrown::HashMap;
use log::{debug, warn};
use rayon::prelude::*;
use std::ops::Deref;

pub mod segment;

pub use segment::{SegmentFeature, SegmentFeatures};

/// Masks with more active dimensions than this are not ordered.
pub(crate) const MAX_MASK_DIMENSIONS: usize = 2;

/// Foreground pixels of a thinned larva ordered from one end to the other.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonPath {
    points: Vec<Pixel>,
    placed: usize,
    pixel_count: usize,
}

impl Deref for SkeletonPath {
    type Target = Vec<Pixel>;

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl SkeletonPath {
    /// Orders the foreground pixels of `mask`.
    ///
    /// Returns `None` for masks with more than two active dimensions.
    pub fn extract(mask: &BitMask, convention: ForegroundConvention) -> Option<Self> {
        let active = mask.active_dimensions();
        if active > MAX_MASK_DIMENSIONS {
            warn!(
                "Skeleton can only be calculated on 2-dimensional masks, got {} dimensions.",
                active
            );
            return None;
        }
        Some(Self::order(&mask.pixel_set(convention)))
    }

    /// Orders every mask of a recording. Masks are independent, so the work
    /// is spread over the rayon pool; the output keeps the input order.
    pub fn extract_all(masks: &[BitMask], convention: ForegroundConvention) -> Vec<Option<Self>> {
        masks
            .par_iter()
            .map(|mask| Self::extract(mask, convention))
            .collect()
    }

    /// Greedy walk over the pixel set.
    ///
    /// The walk starts at the first pixel (in enumeration order) that has
    /// exactly one 8-neighbour and repeatedly steps to the first remaining
    /// pixel within Chebyshev distance 1 of the last placed one. It stops
    /// when every pixel is placed or no candidate is left. The path always
    /// holds one slot per pixel; slots the walk did not reach stay at the
    /// origin.
    ///
    /// Without a one-neighbour pixel the path starts at the origin and the
    /// walk begins there.
    pub fn order(pixels: &PixelSet) -> Self {
        let points = pixels.points();
        match points {
            [] => return Self::degenerate(Pixel::default()),
            [single] => return Self::degenerate(*single),
            _ => {}
        }

        // Enumeration index of every pixel; the smallest unvisited index in a
        // neighbourhood is the pixel a linear scan would find first.
        let index: HashMap<Pixel, usize> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (*p, i))
            .collect();
        let mut visited = bitvec![usize, Lsb0; 0; points.len()];
        let mut path = Vec::with_capacity(points.len());

        let start = points.iter().position(|p| {
            p.neighbours()
                .filter(|n| index.contains_key(n))
                .count()
                == 1
        });
        match start {
            Some(i) => {
                visited.set(i, true);
                path.push(points[i]);
            }
            None => {
                debug!("No skeleton end found among {} pixels.", points.len());
                path.push(Pixel::default());
            }
        }

        while path.len() < points.len() {
            let Some(last) = path.last().copied() else {
                break;
            };
            let next = last
                .neighbourhood()
                .filter_map(|n| index.get(&n).copied())
                .filter(|&i| !visited[i])
                .min();

            match next {
                Some(i) => {
                    visited.set(i, true);
                    path.push(points[i]);
                }
                None => break,
            }
        }

        let placed = path.len();
        if placed < points.len() {
            debug!(
                "Skeleton walk stopped after {} of {} pixels.",
                placed,
                points.len()
            );
            path.resize(points.len(), Pixel::default());
        }

        SkeletonPath {
            points: path,
            placed,
            pixel_count: points.len(),
        }
    }

    fn degenerate(point: Pixel) -> Self {
        SkeletonPath {
            points: vec![point, point],
            placed: 0,
            pixel_count: 0,
        }
    }

    /// Whether the walk stopped before placing every pixel.
    pub fn is_truncated(&self) -> bool {
        self.placed < self.pixel_count
    }

    /// Both path ends, first and last.
    pub fn extremities(&self) -> (Pixel, Pixel) {
        (
            self.points.first().copied().unwrap_or_default(),
            self.points.last().copied().unwrap_or_default(),
        )
    }

    pub fn midpoint_index(&self) -> usize {
        self.points.len() / 2
    }

    pub fn midpoint(&self) -> Pixel {
        self.points
            .get(self.midpoint_index())
            .copied()
            .unwrap_or_default()
    }
}
