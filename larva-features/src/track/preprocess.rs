//! Sorting and equal-time merging of frame sequences.

use log::debug;

/// A frame-like record carrying a time stamp that can be merged with a
/// neighbour reporting the same time.
pub trait TimeOrdered {
    fn time(&self) -> f64;

    fn merge(&self, other: &Self) -> Self
    where
        Self: Sized;
}

/// Stable ascending sort by time.
pub fn sort_by_time<T: TimeOrdered>(frames: &mut [T]) {
    frames.sort_by(|a, b| a.time().total_cmp(&b.time()));
}

/// Collapses runs of adjacent frames with identical time. A merged frame is
/// compared again with its successor, so a run of three is folded left to
/// right.
pub fn merge_equal_time<T: TimeOrdered>(frames: Vec<T>) -> Vec<T> {
    let total = frames.len();
    let mut merged: Vec<T> = Vec::with_capacity(total);

    for frame in frames {
        match merged.last_mut() {
            Some(last) if last.time() == frame.time() => {
                *last = last.merge(&frame);
            }
            _ => merged.push(frame),
        }
    }

    if merged.len() < total {
        debug!("Merged {} equal-time frames.", total - merged.len());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::track::tests::frame;

    #[test]
    fn merge_averages_equal_time_pair() {
        let frames = vec![
            frame((0.0, 0.0), (4.0, 2.0), (2.0, 1.0), 0.0),
            frame((1.0, 1.0), (5.0, 3.0), (3.0, 2.0), 0.5),
            frame((3.0, 1.0), (7.0, 5.0), (5.0, 4.0), 0.5),
        ];
        let merged = merge_equal_time(frames);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].end_a, Position::new(2.0, 1.0));
        assert_eq!(merged[1].end_b, Position::new(6.0, 4.0));
        assert_eq!(merged[1].center, Position::new(4.0, 3.0));
        assert_eq!(merged[1].time, 0.5);
    }

    #[test]
    fn merge_folds_runs_left_to_right() {
        let frames = vec![
            frame((0.0, 0.0), (0.0, 0.0), (0.0, 0.0), 1.0),
            frame((4.0, 0.0), (0.0, 0.0), (0.0, 0.0), 1.0),
            frame((8.0, 0.0), (0.0, 0.0), (0.0, 0.0), 1.0),
        ];
        let merged = merge_equal_time(frames);

        assert_eq!(merged.len(), 1);
        // ((0 + 4) / 2 + 8) / 2
        assert_eq!(merged[0].end_a.x, 5.0);
    }

    #[test]
    fn sort_is_stable() {
        let mut frames = vec![
            frame((1.0, 0.0), (0.0, 0.0), (0.0, 0.0), 2.0),
            frame((2.0, 0.0), (0.0, 0.0), (0.0, 0.0), 1.0),
            frame((3.0, 0.0), (0.0, 0.0), (0.0, 0.0), 2.0),
        ];
        sort_by_time(&mut frames);

        let order: Vec<_> = frames.iter().map(|f| f.end_a.x).collect();
        assert_eq!(order, vec![2.0, 1.0, 3.0]);
    }
}
