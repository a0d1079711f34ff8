//! Fixed-point values for hex pixel projection.
//!
//! Screen positions are computed in fixed point so every client lays the
//! same board out at the same pixels.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// 32.32 fixed-point number.
pub type Fixed = I32F32;

/// √3 as raw I32F32 bits.
pub const SQRT_3: Fixed = Fixed::from_bits(7_439_101_574);

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// Horizontal position.
    #[serde(with = "raw_bits")]
    pub x: Fixed,
    /// Vertical position, growing downward.
    #[serde(with = "raw_bits")]
    pub y: Fixed,
}

impl Vec2Fixed {
    /// The origin.
    pub const ZERO: Self = Self::new(Fixed::ZERO, Fixed::ZERO);

    /// Position from components.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// Stores a [`Fixed`] as its `i64` bits so values survive a round trip exactly.
mod raw_bits {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Fixed;

    pub fn serialize<S: Serializer>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error> {
        value.to_bits().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        i64::deserialize(deserializer).map(Fixed::from_bits)
    }
}
