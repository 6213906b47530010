use crate::geometry::Pixel;
use anyhow::{anyhow, Result};
use bitvec::prelude::BitVec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Which bit value marks a pixel as part of the larva.
///
/// Upstream thinning writes the skeleton as cleared bits, so `Cleared` is the
/// default. `Set` reads the mask the conventional way.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForegroundConvention {
    #[default]
    Cleared,
    Set,
}

impl ForegroundConvention {
    pub fn is_foreground(&self, bit: bool) -> bool {
        match self {
            ForegroundConvention::Cleared => !bit,
            ForegroundConvention::Set => bit,
        }
    }
}

/// Binary mask of one frame, stored with dimension 0 varying fastest.
///
/// `min` is the position of the first stored element, so coordinates produced
/// from the mask are absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct BitMask {
    min: Vec<i64>,
    dims: Vec<usize>,
    bits: BitVec,
}

impl BitMask {
    pub fn new(min: Vec<i64>, dims: Vec<usize>, bits: BitVec) -> Result<Self> {
        if min.len() != dims.len() {
            return Err(anyhow!(
                "Mask offset has {} dimensions but extent has {}.",
                min.len(),
                dims.len()
            ));
        }
        let expected = dims.iter().try_fold(1usize, |acc, d| acc.checked_mul(*d));
        match expected {
            Some(expected) if expected == bits.len() => {}
            Some(expected) => {
                return Err(anyhow!(
                    "Mask length mismatch: {} vs {}",
                    bits.len(),
                    expected
                ))
            }
            None => {
                return Err(anyhow!(
                    "Mask length mismatch: {} vs extent {:?}",
                    bits.len(),
                    dims
                ))
            }
        }

        Ok(BitMask { min, dims, bits })
    }

    /// A 2-D mask with its top-left pixel at `min`.
    pub fn planar(min: Pixel, width: usize, height: usize, bits: BitVec) -> Result<Self> {
        Self::new(vec![min.x, min.y], vec![width, height], bits)
    }

    pub fn num_dimensions(&self) -> usize {
        self.dims.len()
    }

    pub fn dimension(&self, d: usize) -> usize {
        self.dims.get(d).copied().unwrap_or(1)
    }

    pub fn min(&self, d: usize) -> i64 {
        self.min.get(d).copied().unwrap_or(0)
    }

    /// Number of dimensions with an extent larger than one.
    pub fn active_dimensions(&self) -> usize {
        self.dims.iter().filter(|&&d| d > 1).count()
    }

    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    /// Membership test on the first two axes, in absolute coordinates.
    /// Higher axes are read at their first slice.
    pub fn is_foreground(&self, x: i64, y: i64, convention: ForegroundConvention) -> bool {
        let local_x = x - self.min(0);
        let local_y = y - self.min(1);
        if local_x < 0 || local_y < 0 {
            return false;
        }
        let (local_x, local_y) = (local_x as usize, local_y as usize);
        if local_x >= self.dimension(0) || local_y >= self.dimension(1) {
            return false;
        }

        let index = local_y * self.dimension(0) + local_x;
        self.bits
            .get(index)
            .map_or(false, |bit| convention.is_foreground(*bit))
    }

    /// Collects the foreground pixels in storage order.
    pub fn pixel_set(&self, convention: ForegroundConvention) -> PixelSet {
        let offset = Pixel::new(self.min(0), self.min(1));
        let width = self.dimension(0).max(1);
        let height = self.dimension(1).max(1);

        let points = self
            .bits
            .iter()
            .by_vals()
            .enumerate()
            .filter(|(_, bit)| convention.is_foreground(*bit))
            .map(|(index, _)| {
                let x = (index % width) as i64;
                let y = ((index / width) % height) as i64;
                Pixel::new(offset.x + x, offset.y + y)
            })
            .collect();

        PixelSet { offset, points }
    }
}

/// Foreground pixels of one mask in enumeration order, together with the
/// mask's minimum corner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PixelSet {
    offset: Pixel,
    points: Vec<Pixel>,
}

impl PixelSet {
    /// Builds a set from arbitrary points. Repeated points are dropped,
    /// keeping the first occurrence.
    pub fn from_points(offset: Pixel, points: impl IntoIterator<Item = Pixel>) -> Self {
        let mut seen = HashSet::new();
        let points = points.into_iter().filter(|p| seen.insert(*p)).collect();
        PixelSet { offset, points }
    }

    pub fn offset(&self) -> Pixel {
        self.offset
    }

    pub fn points(&self) -> &[Pixel] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of `point` relative to the mask's minimum corner.
    pub fn to_local(&self, point: Pixel) -> Pixel {
        point - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::bitvec;
    use bitvec::prelude::Lsb0;

    #[test]
    fn cleared_bits_are_foreground_by_default() {
        let mask = BitMask::planar(Pixel::new(0, 0), 2, 2, bitvec![1, 0, 1, 1]).unwrap();
        let pixels = mask.pixel_set(ForegroundConvention::default());
        assert_eq!(pixels.points(), &[Pixel::new(1, 0)]);

        let pixels = mask.pixel_set(ForegroundConvention::Set);
        assert_eq!(
            pixels.points(),
            &[Pixel::new(0, 0), Pixel::new(0, 1), Pixel::new(1, 1)]
        );
    }

    #[test]
    fn coordinates_are_absolute() {
        let mask = BitMask::planar(Pixel::new(10, 20), 3, 2, bitvec![1, 1, 1, 1, 1, 0]).unwrap();
        let pixels = mask.pixel_set(ForegroundConvention::Cleared);
        assert_eq!(pixels.points(), &[Pixel::new(12, 21)]);
        assert_eq!(pixels.to_local(Pixel::new(12, 21)), Pixel::new(2, 1));
        assert!(mask.is_foreground(12, 21, ForegroundConvention::Cleared));
        assert!(!mask.is_foreground(0, 0, ForegroundConvention::Cleared));
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(BitMask::planar(Pixel::new(0, 0), 3, 3, bitvec![0; 4]).is_err());
        assert!(BitMask::new(vec![0], vec![2, 2], bitvec![0; 4]).is_err());
    }

    #[test]
    fn rejects_overflowing_extent() {
        let dims = vec![usize::MAX, 2];
        assert!(BitMask::new(vec![0, 0], dims, bitvec![0; 4]).is_err());
    }

    #[test]
    fn counts_active_dimensions() {
        let mask = BitMask::new(vec![0, 0, 0], vec![2, 2, 1], bitvec![0; 4]).unwrap();
        assert_eq!(mask.active_dimensions(), 2);
        let stack = BitMask::new(vec![0, 0, 0], vec![2, 2, 2], bitvec![0; 8]).unwrap();
        assert_eq!(stack.active_dimensions(), 3);
    }

    #[test]
    fn from_points_drops_repeats() {
        let set = PixelSet::from_points(
            Pixel::default(),
            [Pixel::new(1, 1), Pixel::new(2, 2), Pixel::new(1, 1)],
        );
        assert_eq!(set.len(), 2);
    }
}
