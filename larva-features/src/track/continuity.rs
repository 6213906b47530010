use crate::track::FrameObservation;
use bitvec::prelude::BitVec;
use log::debug;

/// Whether the ends of `curr` must be exchanged to follow the ends of `prev`.
///
/// Both frames are moved into their own center's coordinate system, so only
/// the body's shape is compared and not its displacement.
pub fn swap_needed(prev: &FrameObservation, curr: &FrameObservation) -> bool {
    let prev_a = prev.end_a - prev.center;
    let prev_b = prev.end_b - prev.center;
    let curr_a = curr.end_a - curr.center;
    let curr_b = curr.end_b - curr.center;

    let d11 = prev_a.distance(&curr_a);
    let d12 = prev_a.distance(&curr_b);
    let d21 = prev_b.distance(&curr_a);
    let d22 = prev_b.distance(&curr_b);

    if d11 == d11.min(d12) && d22 == d21.min(d22) {
        false
    } else if d12 == d11.min(d12) && d21 == d21.min(d22) {
        true
    } else {
        let smallest = d11.min(d12).min(d21.min(d22));
        !(d11 == smallest || d22 == smallest)
    }
}

/// Marks the frames whose ends are exchanged. Each frame is compared with its
/// predecessor as emitted, i.e. after that predecessor's own exchange.
pub fn continuity_swaps(frames: &[FrameObservation]) -> BitVec {
    let mut swaps = BitVec::repeat(false, frames.len());
    let mut prev: Option<FrameObservation> = None;

    for (index, frame) in frames.iter().enumerate() {
        let emitted = match &prev {
            Some(prev) if swap_needed(prev, frame) => {
                swaps.set(index, true);
                frame.swapped()
            }
            _ => *frame,
        };
        debug!("Continuity pass: frame {}/{}", index + 1, frames.len());
        prev = Some(emitted);
    }

    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::tests::frame;

    #[test]
    fn same_orientation_keeps_labels() {
        let prev = frame((0.0, 0.0), (4.0, 0.0), (2.0, 0.0), 0.0);
        let curr = frame((1.0, 0.5), (5.0, 0.0), (3.0, 0.0), 1.0);
        assert!(!swap_needed(&prev, &curr));
    }

    #[test]
    fn reported_flip_is_detected() {
        let prev = frame((0.0, 0.0), (4.0, 0.0), (2.0, 0.0), 0.0);
        let curr = frame((5.0, 0.0), (1.0, 0.5), (3.0, 0.0), 1.0);
        assert!(swap_needed(&prev, &curr));
    }

    #[test]
    fn mixed_pairing_falls_back_to_global_minimum() {
        // Both previous ends are closest to current end A.
        let prev = frame((0.0, 0.0), (3.0, 0.0), (0.0, 0.0), 0.0);
        let curr = frame((1.0, 0.0), (-5.0, 0.0), (0.0, 0.0), 1.0);
        // d11 = 1 is the global minimum.
        assert!(!swap_needed(&prev, &curr));

        let curr = frame((2.0, 0.0), (-5.0, 0.0), (0.0, 0.0), 1.0);
        // d21 = 1 is the global minimum.
        assert!(swap_needed(&prev, &curr));
    }

    #[test]
    fn decision_ignores_absolute_labels() {
        let cases = [
            (
                frame((0.0, 0.0), (4.0, 0.0), (2.0, 0.0), 0.0),
                frame((5.0, 0.0), (1.0, 0.5), (3.0, 0.0), 1.0),
            ),
            (
                frame((0.0, 0.0), (3.0, 0.0), (0.0, 0.0), 0.0),
                frame((2.0, 0.0), (-5.0, 0.0), (0.0, 0.0), 1.0),
            ),
            (
                frame((1.0, 3.0), (-2.0, 7.0), (0.0, 5.0), 0.0),
                frame((0.5, 2.0), (2.0, 8.0), (1.0, 5.0), 1.0),
            ),
        ];
        for (prev, curr) in cases {
            assert_eq!(
                swap_needed(&prev, &curr),
                swap_needed(&prev.swapped(), &curr.swapped())
            );
        }
    }

    #[test]
    fn compares_against_emitted_frame() {
        let frames = [
            frame((0.0, 0.0), (4.0, 0.0), (2.0, 0.0), 0.0),
            frame((4.0, 0.0), (0.0, 0.0), (2.0, 0.0), 1.0),
            frame((4.0, 0.0), (0.0, 0.0), (2.0, 0.0), 2.0),
        ];
        let swaps = continuity_swaps(&frames);
        // The second frame is flipped back, so the third must be flipped too.
        assert!(!swaps[0]);
        assert!(swaps[1]);
        assert!(swaps[2]);
    }
}
