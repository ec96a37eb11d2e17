//! Spread placement table
//!
//! Grid offsets used to fan member tokens out around the party token on
//! explode, and to collapse them back on crunch. The table is
//! hand-authored rather than computed: index 0 sits on the anchor,
//! indices 1..=8 fill the inner ring around it, indices 9..=24 walk the
//! outer ring clockwise starting above the anchor. The visual result is
//! the contract; there is no deeper math behind the ordering.

use crate::scene::GridOffset;

/// Hard ceiling on members per party, driven by the table length.
pub const MAX_PARTY_SIZE: usize = 25;

/// Placement offsets for the i-th member token, relative to the anchor
/// cell. Entry 0 is the anchor itself.
pub const SPREAD_OFFSETS: [GridOffset; MAX_PARTY_SIZE] = [
    // anchor
    (0, 0),
    // inner ring: up, right, down, left, then the diagonals
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    // outer ring, clockwise from the top-left corner area
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (2, -1),
    (2, 0),
    (2, 1),
    (2, 2),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-2, 2),
    (-2, 1),
    (-2, 0),
    (-2, -1),
    (-2, -2),
];

/// Offset for the i-th member, or `None` past the table end.
pub fn offset(index: usize) -> Option<GridOffset> {
    SPREAD_OFFSETS.get(index).copied()
}

/// The first `count` placement offsets (clamped to the table length).
pub fn offsets(count: usize) -> &'static [GridOffset] {
    &SPREAD_OFFSETS[..count.min(MAX_PARTY_SIZE)]
}

/// The i-th member's displacement re-expressed as single-cell steps
/// (diagonals allowed), for hosts that animate the fan-out as a walk
/// instead of an instant jump. The steps always sum to `offset(index)`.
pub fn walk_path(index: usize) -> Vec<GridOffset> {
    offset(index).map(steps_toward).unwrap_or_default()
}

/// Decompose an arbitrary displacement into single-cell steps,
/// diagonal first while both axes have distance left. Used to walk
/// members back onto the anchor on crunch, wherever they stand.
pub fn steps_toward(delta: GridOffset) -> Vec<GridOffset> {
    let mut steps = Vec::new();
    let (mut rx, mut ry) = delta;
    while rx != 0 || ry != 0 {
        let step = (rx.signum(), ry.signum());
        steps.push(step);
        rx -= step.0;
        ry -= step.1;
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_offset_is_anchor() {
        assert_eq!(offset(0), Some((0, 0)));
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let unique: HashSet<GridOffset> = SPREAD_OFFSETS.iter().copied().collect();
        assert_eq!(unique.len(), MAX_PARTY_SIZE);
    }

    #[test]
    fn test_ring_structure() {
        let ring = |(dx, dy): GridOffset| dx.abs().max(dy.abs());
        assert_eq!(ring(SPREAD_OFFSETS[0]), 0);
        assert!(SPREAD_OFFSETS[1..9].iter().all(|&o| ring(o) == 1));
        assert!(SPREAD_OFFSETS[9..].iter().all(|&o| ring(o) == 2));
    }

    #[test]
    fn test_exact_table_values() {
        let dx: Vec<i32> = SPREAD_OFFSETS.iter().map(|o| o.0).collect();
        let dy: Vec<i32> = SPREAD_OFFSETS.iter().map(|o| o.1).collect();
        assert_eq!(
            dx,
            [0, 0, 1, 0, -1, 1, 1, -1, -1, -1, 0, 1, 2, 2, 2, 2, 2, 1, 0, -1, -2, -2, -2, -2, -2]
        );
        assert_eq!(
            dy,
            [0, -1, 0, 1, 0, -1, 1, 1, -1, -2, -2, -2, -2, -1, 0, 1, 2, 2, 2, 2, 2, 1, 0, -1, -2]
        );
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(offset(MAX_PARTY_SIZE), None);
        assert_eq!(offsets(40).len(), MAX_PARTY_SIZE);
        assert_eq!(offsets(3).len(), 3);
    }

    #[test]
    fn test_steps_toward_arbitrary_delta() {
        let steps = steps_toward((-3, 1));
        assert_eq!(steps, vec![(-1, 1), (-1, 0), (-1, 0)]);
        assert!(steps_toward((0, 0)).is_empty());
    }

    #[test]
    fn test_walk_paths_sum_to_offsets() {
        for index in 0..MAX_PARTY_SIZE {
            let steps = walk_path(index);
            let sum = steps.iter().fold((0, 0), |acc, s| (acc.0 + s.0, acc.1 + s.1));
            assert_eq!(Some(sum), offset(index), "walk path mismatch at index {}", index);
            assert!(
                steps.iter().all(|s| s.0.abs() <= 1 && s.1.abs() <= 1 && *s != (0, 0)),
                "non-unit step at index {}",
                index
            );
        }
    }
}
