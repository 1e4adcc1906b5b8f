use crate::crypto::entropy::EntropySource;
use crate::error::Result;
use crate::models::session::CoinResult;

/// Maps a random byte to a coin side: even is heads, odd is tails.
///
/// Each side covers exactly 128 of the 256 byte values.
pub fn parity(byte: u8) -> CoinResult {
    if byte % 2 == 0 {
        CoinResult::Heads
    } else {
        CoinResult::Tails
    }
}

/// Flips a coin with one byte drawn from `entropy`.
pub fn flip(entropy: &dyn EntropySource) -> Result<CoinResult> {
    let mut byte = [0u8; 1];
    entropy.fill(&mut byte)?;

    Ok(parity(byte[0]))
}
