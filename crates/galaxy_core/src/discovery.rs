//! Discovery tiles: drawing from the pool and decoding resource rewards.

use crate::catalog::DiscoveryReward;
use crate::economy::ResourceType;
use crate::error::{GameError, Result};
use crate::random::RandomSource;

/// Victory points for keeping a discovery tile face down.
pub const DISCOVERY_VICTORY_POINTS: i32 = 2;

/// Draw one tile uniformly from the pool. The pool is not depleted.
pub fn draw_discovery<R: RandomSource>(pool: &[DiscoveryReward], rng: &mut R) -> Option<DiscoveryReward> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.next_index(pool.len())).cloned()
}

/// Decode a `<type>_<amount>` resource reward id.
pub fn parse_resource_reward(id: &str) -> Result<(ResourceType, i32)> {
    let malformed = || GameError::MalformedReward(id.to_string());
    let (kind, amount) = id.rsplit_once('_').ok_or_else(malformed)?;
    let resource = kind.parse::<ResourceType>().map_err(|_| malformed())?;
    let amount = amount.parse::<i32>().map_err(|_| malformed())?;
    if amount < 0 {
        return Err(malformed());
    }
    Ok((resource, amount))
}
