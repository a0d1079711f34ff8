//! Proptest strategies for board and economy types.

use galaxy_core::economy::{ResourceType, TRACK_LENGTH};
use galaxy_core::hex::{Axial, EDGE_COUNT};
use galaxy_core::sector::Wormholes;
use galaxy_core::ships::ShipClass;
use proptest::prelude::*;

/// Coordinate within `radius` rings of the center.
pub fn arb_axial(radius: i32) -> impl Strategy<Value = Axial> {
    (-radius..=radius, -radius..=radius)
        .prop_filter("outside radius", move |&(q, r)| (q + r).abs() <= radius)
        .prop_map(|(q, r)| Axial::new(q, r))
}

/// Coordinate on rings 1 through `radius`.
pub fn arb_explorable_axial(radius: i32) -> impl Strategy<Value = Axial> {
    arb_axial(radius).prop_filter("center", |coord| *coord != Axial::ORIGIN)
}

/// Edge index 0..6.
pub fn arb_edge() -> impl Strategy<Value = usize> {
    0..EDGE_COUNT
}

/// Rotation step count 0..6.
pub fn arb_rotation() -> impl Strategy<Value = u8> {
    0u8..6
}

/// Any wormhole pattern, including all closed.
pub fn arb_wormholes() -> impl Strategy<Value = Wormholes> {
    any::<[bool; 6]>().prop_map(Wormholes)
}

/// Any resource type.
pub fn arb_resource_type() -> impl Strategy<Value = ResourceType> {
    prop_oneof![
        Just(ResourceType::Money),
        Just(ResourceType::Science),
        Just(ResourceType::Materials),
    ]
}

/// Any ship class.
pub fn arb_ship_class() -> impl Strategy<Value = ShipClass> {
    prop_oneof![
        Just(ShipClass::Interceptor),
        Just(ShipClass::Cruiser),
        Just(ShipClass::Dreadnought),
        Just(ShipClass::Starbase),
    ]
}

/// Cube count on a population track.
pub fn arb_cubes() -> impl Strategy<Value = u32> {
    0..=TRACK_LENGTH
}
