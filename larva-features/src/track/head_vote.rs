use crate::track::FrameObservation;

/// Number of leading frames that take part in the head vote.
pub(crate) const ANALYSIS_WINDOW: usize = 50;
/// Below this center displacement the center two frames back is used as the
/// reference point.
pub(crate) const SLOW_MOVEMENT_DISTANCE: f64 = 3.0;

/// Tail votes of both ends over the analysis window.
///
/// An end whose distance to the reference point does not grow between two
/// frames is counted as trailing, i.e. as the tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadVote {
    pub end_a_tail_votes: usize,
    pub end_b_tail_votes: usize,
    pub comparisons: usize,
}

impl HeadVote {
    /// Tallies the votes over the first frames of an aligned recording.
    pub fn tally(frames: &[FrameObservation]) -> Self {
        let window = &frames[..frames.len().min(ANALYSIS_WINDOW)];
        let mut vote = HeadVote::default();

        let Some((first, rest)) = window.split_first() else {
            return vote;
        };
        let mut prev = *first;
        let mut prev_prev_center = first.center;

        for curr in rest {
            let point_of_comparison =
                if prev.center.distance(&curr.center) < SLOW_MOVEMENT_DISTANCE {
                    prev_prev_center
                } else {
                    prev.center
                };

            if prev.end_a.distance(&point_of_comparison) - curr.end_a.distance(&point_of_comparison)
                >= 0.0
            {
                vote.end_a_tail_votes += 1;
            }
            if prev.end_b.distance(&point_of_comparison) - curr.end_b.distance(&point_of_comparison)
                >= 0.0
            {
                vote.end_b_tail_votes += 1;
            }

            prev_prev_center = prev.center;
            prev = *curr;
            vote.comparisons += 1;
        }

        vote
    }

    /// End A is the head unless it collected more tail votes than end B.
    /// Without any comparison the head defaults to end B.
    pub fn head_is_a(&self) -> bool {
        if self.comparisons == 0 {
            return false;
        }
        self.end_a_tail_votes <= self.end_b_tail_votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::tests::frame;

    #[test]
    fn trailing_end_collects_tail_votes() {
        let frames = [
            frame((-1.0, 0.0), (1.0, 0.0), (0.0, 0.0), 0.0),
            frame((0.0, 0.0), (2.0, 0.0), (1.0, 0.0), 1.0),
            frame((1.0, 0.0), (3.0, 0.0), (2.0, 0.0), 2.0),
        ];
        let vote = HeadVote::tally(&frames);

        assert_eq!(vote.comparisons, 2);
        assert_eq!(vote.end_a_tail_votes, 1);
        assert_eq!(vote.end_b_tail_votes, 0);
        assert!(!vote.head_is_a());
    }

    #[test]
    fn fast_movement_compares_with_previous_center() {
        let frames = [
            frame((2.0, 0.0), (-2.0, 0.0), (0.0, 0.0), 0.0),
            frame((7.0, 0.0), (3.0, 0.0), (5.0, 0.0), 1.0),
        ];
        let vote = HeadVote::tally(&frames);

        // Reference is (0, 0): end B moved from 2 to 3 away, end A from 2 to 7.
        assert_eq!(vote.end_a_tail_votes, 0);
        assert_eq!(vote.end_b_tail_votes, 0);
        assert!(vote.head_is_a());
    }

    #[test]
    fn short_tracks_default_to_end_b() {
        assert!(!HeadVote::tally(&[]).head_is_a());
        let single = [frame((0.0, 0.0), (1.0, 0.0), (0.5, 0.0), 0.0)];
        assert!(!HeadVote::tally(&single).head_is_a());
    }

    #[test]
    fn ignores_frames_after_the_window() {
        // End A leads for the whole window, then closes in on a resting
        // center while end B drifts away.
        let mut frames: Vec<_> = (0..ANALYSIS_WINDOW)
            .map(|i| {
                let x = i as f64 * 4.0;
                frame((x + 1.0, 0.0), (x - 1.0, 0.0), (x, 0.0), i as f64)
            })
            .collect();
        let rest = frames.len() as f64 * 4.0;
        frames.extend((0..200).map(|i| {
            let i = i as f64;
            frame(
                (rest + 100.0 - i * 0.1, 0.0),
                (rest - 1.0 - i, 0.0),
                (rest, 0.0),
                ANALYSIS_WINDOW as f64 + i,
            )
        }));
        assert!(!HeadVote::tally(&frames[ANALYSIS_WINDOW..]).head_is_a());

        let vote = HeadVote::tally(&frames);
        assert_eq!(vote.comparisons, ANALYSIS_WINDOW - 1);
        assert!(vote.head_is_a());
    }
}
