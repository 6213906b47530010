use crate::geometry::Position;

/// Angle of a zero-length or otherwise undefined segment.
pub const UNDEFINED_ANGLE: f64 = f64::INFINITY;

/// Signed angle in degrees of the segment `fixed -> movable` against the
/// x-axis, with y growing downwards as in image coordinates.
///
/// Vertical segments give exactly -90 or 90; a segment of length zero gives
/// [`UNDEFINED_ANGLE`].
pub fn absolute_angle(fixed: Position, movable: Position) -> f64 {
    let num = fixed.y - movable.y;
    let denom = movable.x - fixed.x;

    if denom == 0.0 {
        if num < 0.0 {
            -90.0
        } else if num > 0.0 {
            90.0
        } else {
            UNDEFINED_ANGLE
        }
    } else {
        let angle = (num / denom).atan().to_degrees();
        if denom < 0.0 {
            if num < 0.0 {
                angle - 180.0
            } else {
                angle + 180.0
            }
        } else {
            angle
        }
    }
}

/// Signed turn from `fixed` to `movable`, wrapped into [-180, 180].
/// Any undefined operand gives no turn.
pub fn angle_diff(fixed: f64, movable: f64) -> f64 {
    if fixed == UNDEFINED_ANGLE || movable == UNDEFINED_ANGLE {
        return 0.0;
    }

    let fixed = (fixed + 360.0) % 360.0;
    let movable = (movable + 360.0) % 360.0;
    let diff = movable - fixed;
    if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn axis_aligned_segments() {
        assert_eq!(absolute_angle(p(0.0, 0.0), p(1.0, 0.0)), 0.0);
        assert_eq!(absolute_angle(p(0.0, 0.0), p(0.0, 1.0)), -90.0);
        assert_eq!(absolute_angle(p(0.0, 1.0), p(0.0, 0.0)), 90.0);
        assert_eq!(absolute_angle(p(1.0, 0.0), p(0.0, 0.0)), 180.0);
        assert_eq!(absolute_angle(p(2.0, 2.0), p(2.0, 2.0)), UNDEFINED_ANGLE);
    }

    #[test]
    fn quadrants() {
        assert_abs_diff_eq!(absolute_angle(p(0.0, 0.0), p(1.0, -1.0)), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(absolute_angle(p(0.0, 0.0), p(-1.0, -1.0)), 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(absolute_angle(p(0.0, 0.0), p(-1.0, 1.0)), -135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(absolute_angle(p(0.0, 0.0), p(1.0, 1.0)), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn diff_wraps_across_the_seam() {
        assert_abs_diff_eq!(angle_diff(170.0, -170.0), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_diff(-170.0, 170.0), -20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_diff(10.0, 350.0), -20.0, epsilon = 1e-9);
        assert_eq!(angle_diff(45.0, 45.0), 0.0);
    }

    #[test]
    fn diff_is_antisymmetric() {
        let angles = [-179.0, -135.5, -90.0, -12.25, 0.0, 30.0, 89.9, 120.0, 179.5];
        for &a in &angles {
            for &b in &angles {
                let forward = angle_diff(a, b);
                let backward = angle_diff(b, a);
                assert!((-180.0..=180.0).contains(&forward));
                if forward.abs() < 180.0 {
                    assert_abs_diff_eq!(forward, -backward, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn undefined_angle_gives_no_turn() {
        assert_eq!(angle_diff(UNDEFINED_ANGLE, 45.0), 0.0);
        assert_eq!(angle_diff(-120.0, UNDEFINED_ANGLE), 0.0);
        assert_eq!(angle_diff(UNDEFINED_ANGLE, UNDEFINED_ANGLE), 0.0);
    }
}
