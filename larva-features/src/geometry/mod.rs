use num::Num;
use serde::{Deserialize, Serialize};
use std::ops::Sub;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point<T: Num> {
    pub x: T,
    pub y: T,
}

/// Integer pixel coordinate of a mask.
pub type Pixel = Point<i64>;
/// Real-valued position read from a measurement table.
pub type Position = Point<f64>;

impl<T: Num> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Num> Sub for Point<T> {
    type Output = Point<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Position {
    /// Euclidean distance.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Pixel {
    /// Chebyshev distance between two pixels.
    pub fn chebyshev(&self, other: &Pixel) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The 3x3 block centred on this pixel, the pixel itself included,
    /// in row-major order.
    pub fn neighbourhood(self) -> impl Iterator<Item = Pixel> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| Pixel::new(self.x + dx, self.y + dy)))
    }

    /// The eight pixels at Chebyshev distance 1.
    pub fn neighbours(self) -> impl Iterator<Item = Pixel> {
        self.neighbourhood().filter(move |p| *p != self)
    }
}
