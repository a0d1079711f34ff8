//! Axial hex coordinates.
//!
//! Edges are numbered 0..5 clockwise starting at the top edge of a
//! flat-topped hex. Every function here is total: it is defined for every
//! integer coordinate and never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Fixed, Vec2Fixed, SQRT_3};

/// Number of edges on a hex.
pub const EDGE_COUNT: usize = 6;

/// Neighbor offsets indexed by edge: top, top-right, bottom-right,
/// bottom, bottom-left, top-left.
pub const NEIGHBOR_OFFSETS: [Axial; EDGE_COUNT] = [
    Axial::new(0, -1),
    Axial::new(1, -1),
    Axial::new(1, 0),
    Axial::new(0, 1),
    Axial::new(-1, 1),
    Axial::new(-1, 0),
];

/// Axial hex coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Axial {
    /// Column axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

impl Axial {
    /// The map center.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a new coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Coordinate across `edge` (taken mod 6).
    #[must_use]
    pub fn neighbor(self, edge: usize) -> Self {
        neighbor(self, edge)
    }

    /// Hex distance from the origin.
    #[must_use]
    pub fn ring(self) -> u32 {
        ring_distance(self)
    }
}

impl fmt::Display for Axial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Coordinate adjacent to `coord` across `edge`.
#[must_use]
pub fn neighbor(coord: Axial, edge: usize) -> Axial {
    let offset = NEIGHBOR_OFFSETS[edge % EDGE_COUNT];
    Axial::new(
        coord.q.wrapping_add(offset.q),
        coord.r.wrapping_add(offset.r),
    )
}

/// Ring distance from the origin: `max(|q|, |r|, |-q-r|)`.
#[must_use]
pub fn ring_distance(coord: Axial) -> u32 {
    let q = i64::from(coord.q);
    let r = i64::from(coord.r);
    let ring = q.abs().max(r.abs()).max((q + r).abs());
    u32::try_from(ring).unwrap_or(u32::MAX)
}

/// Edge on the far side of `edge`.
#[must_use]
pub const fn opposite_edge(edge: usize) -> usize {
    (edge + 3) % EDGE_COUNT
}

/// Edge of `from` that leads directly to `to`, if they are adjacent.
#[must_use]
pub fn edge_towards(from: Axial, to: Axial) -> Option<usize> {
    (0..EDGE_COUNT).find(|&edge| neighbor(from, edge) == to)
}

/// Pixel center of a flat-topped hex of the given size.
///
/// Layout only; the result has no bearing on game rules.
#[must_use]
pub fn to_pixel(coord: Axial, hex_size: u32) -> Vec2Fixed {
    let size = Fixed::saturating_from_num(hex_size);
    let q = Fixed::saturating_from_num(coord.q);
    let r = Fixed::saturating_from_num(coord.r);
    let three_halves = Fixed::from_num(3) / Fixed::from_num(2);
    let half_sqrt_3 = SQRT_3 / Fixed::from_num(2);

    let x = three_halves.saturating_mul(q).saturating_mul(size);
    let y = half_sqrt_3
        .saturating_mul(q)
        .saturating_add(SQRT_3.saturating_mul(r))
        .saturating_mul(size);
    Vec2Fixed::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_offsets_clockwise_from_top() {
        let origin = Axial::ORIGIN;
        assert_eq!(neighbor(origin, 0), Axial::new(0, -1));
        assert_eq!(neighbor(origin, 2), Axial::new(1, 0));
        assert_eq!(neighbor(origin, 5), Axial::new(-1, 0));
        // Edge indices wrap.
        assert_eq!(neighbor(origin, 6), neighbor(origin, 0));
    }

    #[test]
    fn test_ring_distance() {
        assert_eq!(ring_distance(Axial::ORIGIN), 0);
        assert_eq!(ring_distance(Axial::new(0, -2)), 2);
        assert_eq!(ring_distance(Axial::new(2, -2)), 2);
        assert_eq!(ring_distance(Axial::new(-1, 3)), 3);
        assert_eq!(ring_distance(Axial::new(i32::MIN, i32::MIN)), u32::MAX);
    }

    #[test]
    fn test_opposite_edge_is_involution() {
        for edge in 0..EDGE_COUNT {
            assert_eq!(opposite_edge(opposite_edge(edge)), edge);
            assert_ne!(opposite_edge(edge), edge);
        }
    }

    #[test]
    fn test_opposite_neighbor_returns_home() {
        let start = Axial::new(3, -1);
        for edge in 0..EDGE_COUNT {
            let there = neighbor(start, edge);
            assert_eq!(neighbor(there, opposite_edge(edge)), start);
            assert_eq!(edge_towards(start, there), Some(edge));
        }
    }

    #[test]
    fn test_edge_towards_non_adjacent() {
        assert_eq!(edge_towards(Axial::ORIGIN, Axial::new(0, -2)), None);
        assert_eq!(edge_towards(Axial::ORIGIN, Axial::ORIGIN), None);
    }

    #[test]
    fn test_to_pixel_is_deterministic() {
        let coord = Axial::new(2, -1);
        assert_eq!(to_pixel(coord, 60), to_pixel(coord, 60));
        assert_eq!(to_pixel(Axial::ORIGIN, 60), Vec2Fixed::ZERO);
        // x = 1.5 * 2 * 60
        assert_eq!(to_pixel(coord, 60).x, Fixed::from_num(180));
    }

    #[test]
    fn test_to_pixel_saturates_far_coordinates() {
        let far = to_pixel(Axial::new(i32::MAX, i32::MAX), u32::MAX);
        assert_eq!(far.x, Fixed::MAX);
    }
}
