use crate::geometry::Position;

/// Picks the reference point out of an auxiliary table of one or two points.
///
/// With two points `first_row` chooses between them; one point is always
/// used. Any other number of points means there is no reference.
pub fn select_reference(points: &[Position], first_row: bool) -> Option<Position> {
    match points {
        [only] => Some(*only),
        [first, second] => Some(if first_row { *first } else { *second }),
        _ => None,
    }
}
